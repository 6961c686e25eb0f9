//! Deregulation orchestrator (component C8): wires the variant, alignment
//! engine, feature extractor and scoring model together to answer "how
//! much does this SNV/indel change this miRNA's downregulation of this
//! mRNA target site".
//!
//! Mirrors `SNP::get_deregulation_score` and `miRNA::get_downregulation_score`
//! from the mirSVR reference scorer.

use crate::align::{self, Alignment};
use crate::error::CoreError;
use crate::features;
use crate::nucleotide::ChromosomePosition;
use crate::predictor::StructurePredictor;
use crate::scoring;
use crate::sequence::SplicedSequence;
use crate::variant::Variant;

const ALIGNMENT_WINDOW_LENGTH: u32 = 30;

/// The downregulation score this miRNA exerts over `mrna` through the best
/// of every co-optimal target-site alignment ending at
/// `predicted_three_prime_position`, or `0.0` if no alignment exists
/// (mirroring `miRNA::get_downregulation_score`'s early return).
pub fn downregulation_score(mrna: &SplicedSequence, mirna: &SplicedSequence, predicted_three_prime_position: ChromosomePosition, predictor: &dyn StructurePredictor) -> Result<f64, CoreError> {
    let window = align::window_for_alignment(mrna, predicted_three_prime_position, ALIGNMENT_WINDOW_LENGTH);
    let sites = align::alignments(&window, mirna);
    best_score(mrna, predicted_three_prime_position, &sites, predictor)
}

fn best_score(mrna: &SplicedSequence, p3: ChromosomePosition, sites: &[Alignment], predictor: &dyn StructurePredictor) -> Result<f64, CoreError> {
    let mut best = 0.0_f64;
    let mut any = false;
    for site in sites {
        let feats = features::extract(mrna, p3, site, predictor)?;
        let candidate = scoring::score(&feats);
        best = if any { best.max(candidate) } else { candidate };
        any = true;
    }
    Ok(best)
}

/// The deregulation score of `variant` on the target site `miRNA` forms
/// with `mRNA` at `predicted_three_prime_position`: the wild-type
/// downregulation score minus the mutant's, or exactly `0.0` if the
/// variant touches neither sequence.
pub fn deregulation_score(
    mirna: &SplicedSequence,
    mrna: &SplicedSequence,
    variant: &Variant,
    predicted_three_prime_position: ChromosomePosition,
    predictor: &dyn StructurePredictor,
) -> Result<f64, CoreError> {
    let hits_mirna = variant.matches(mirna);
    let hits_mrna = variant.matches(mrna);
    if !hits_mirna && !hits_mrna {
        return Ok(0.0);
    }

    let wt = downregulation_score(mrna, mirna, predicted_three_prime_position, predictor)?;

    let (mt_mirna, mt_mrna, p3_mt) = if hits_mirna {
        (variant.apply_to(mirna), mrna.clone(), predicted_three_prime_position)
    } else {
        let mutated_mrna = variant.apply_to(mrna);
        let reference_end = variant.anchor() + variant.reference_len();
        let shifted = if predicted_three_prime_position < reference_end {
            predicted_three_prime_position
        } else {
            (predicted_three_prime_position as i64 + variant.shift() as i64) as ChromosomePosition
        };
        (mirna.clone(), mutated_mrna, shifted)
    };

    let mt = downregulation_score(&mt_mrna, &mt_mirna, p3_mt, predictor)?;
    Ok(wt - mt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conservation::ConservationTable;
    use crate::predictor::StubStructurePredictor;
    use crate::sequence::Strand;
    use pretty_assertions::assert_eq;

    fn mrna() -> SplicedSequence {
        SplicedSequence::new("mrna", "AAAAAAAUAAGCUAAAAAAA", "chr1", Strand::Plus, &[1], &[20], &ConservationTable::empty())
    }

    fn mirna() -> SplicedSequence {
        SplicedSequence::new("mirna", "UAGCUU", "chr1", Strand::Plus, &[1], &[6], &ConservationTable::empty())
    }

    #[test]
    fn non_matching_variant_scores_zero() {
        let variant = Variant::new("v1", "chr1", 500, Strand::Plus, "G", "C");
        let predictor = StubStructurePredictor::new(0.5);
        let score = deregulation_score(&mirna(), &mrna(), &variant, 15, &predictor).unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn synonymous_variant_scores_zero() {
        let variant = Variant::new("v1", "chr1", 1, Strand::Plus, "A", "A");
        let predictor = StubStructurePredictor::new(0.5);
        let score = deregulation_score(&mirna(), &mrna(), &variant, 15, &predictor).unwrap();
        assert!(score.abs() < 1e-9);
    }
}
