//! Literal end-to-end scenarios: fixed sequence/variant inputs with a
//! known expected outcome, exercised only through `mirscore_core`'s
//! public API.

use mirscore_core::align;
use mirscore_core::conservation::ConservationTable;
use mirscore_core::features;
use mirscore_core::sequence::{Exon, SplicedSequence, Strand};
use mirscore_core::{deregulation_score, downregulation_score, Base, MatchIdentifier, SeedType, StubStructurePredictor, Variant};
use pretty_assertions::assert_eq;

// The 34-feature layout documented on `features::FEATURE_COUNT`: index 21
// is the conservation feature, indices 25..=33 the nine seed-match flags
// (A1, m2..m9).
const CONSERVATION_FEATURE: usize = 21;
const SEED_MATCH_FIRST: usize = 25;
const THREE_PRIME_FEATURE: usize = 23;

fn mirna_6mer() -> SplicedSequence {
    SplicedSequence::new("mir1", "UAGCUU", "chr1", Strand::Plus, &[1], &[6], &ConservationTable::empty())
}

fn mrna_20nt() -> SplicedSequence {
    SplicedSequence::new("mrna1", "AAAAAAAUAAGCUAAAAAAA", "chr1", Strand::Plus, &[1], &[20], &ConservationTable::empty())
}

#[test]
fn scenario_1_non_matching_variant_scores_zero() {
    let variant = Variant::new("v1", "chr1", 500, Strand::Plus, "G", "C");
    let predictor = StubStructurePredictor::new(0.5);
    let score = deregulation_score(&mirna_6mer(), &mrna_20nt(), &variant, 15, &predictor).unwrap();
    assert_eq!(score, 0.0);
}

#[test]
fn scenario_2_synonymous_variant_scores_zero() {
    let variant = Variant::new("v1", "chr1", 1, Strand::Plus, "A", "A");
    let predictor = StubStructurePredictor::new(0.5);
    let score = deregulation_score(&mirna_6mer(), &mrna_20nt(), &variant, 15, &predictor).unwrap();
    assert!(score.abs() < 1e-9);
}

/// The 23 nt mRNA window ending at chr1:200 whose reverse-complementary
/// diagonal against `EIGHT_MER_MIRNA` is a perfect 8mer: each window base
/// is the Watson-Crick complement of the miRNA base read from its 3' end,
/// i.e. `window[k] = complement(mirna[len + 1 - k])`.
const EIGHT_MER_MIRNA: &str = "UAAUACUGCCGGGUAAUGAUGGA";
const EIGHT_MER_SITE: &str = "UCCAUCAUUACCCGGCAGUAUUA";

fn mrna_with_eight_mer_site() -> SplicedSequence {
    let upstream = "A".repeat(177);
    let downstream = "A".repeat(20);
    let raw = format!("{upstream}{EIGHT_MER_SITE}{downstream}");
    let len = raw.len() as u32;
    let table = ConservationTable::from_rows([("chr1".to_string(), 1, 1.0)]);
    SplicedSequence::new("mrna3", &raw, "chr1", Strand::Plus, &[1], &[len], &table)
}

fn mirna_eight_mer() -> SplicedSequence {
    SplicedSequence::new("mir3", EIGHT_MER_MIRNA, "chr2", Strand::Plus, &[1], &[23], &ConservationTable::empty())
}

#[test]
fn scenario_3_perfect_eight_mer_site() {
    let mrna = mrna_with_eight_mer_site();
    let mirna = mirna_eight_mer();
    let window = align::window_for_alignment(&mrna, 200, 30);
    let found = align::alignments(&window, &mirna);
    let best = found.iter().max_by_key(|a| a.score()).expect("an alignment exists");
    assert_eq!(best.seed_type(), SeedType::EightMer);

    let predictor = StubStructurePredictor::new(0.5);
    let feats = features::extract(&mrna, 200, best, &predictor).unwrap();
    assert_eq!(feats[CONSERVATION_FEATURE], 1.0);
    assert_eq!(&feats[SEED_MATCH_FIRST..SEED_MATCH_FIRST + 9], &[1.0; 9]);
}

#[test]
fn scenario_4_seed_disruption_is_strictly_positive() {
    let mrna = mrna_with_eight_mer_site();
    let mirna = mirna_eight_mer();

    // Column 0 of the 8mer alignment is the mRNA base at chr1:200 (an
    // Adenine); substituting it for Cytosine breaks the A1 bonus without
    // touching any other seed column.
    let variant = Variant::new("v4", "chr1", 200, Strand::Plus, "A", "C");
    let mutant_mrna = variant.apply_to(&mrna);

    let wt_window = align::window_for_alignment(&mrna, 200, 30);
    let wt_best = align::alignments(&wt_window, &mirna).into_iter().max_by_key(|a| a.score()).unwrap();
    assert_eq!(wt_best.seed_type(), SeedType::EightMer);

    let mt_window = align::window_for_alignment(&mutant_mrna, 200, 30);
    let mt_best = align::alignments(&mt_window, &mirna).into_iter().max_by_key(|a| a.score()).unwrap();
    assert_eq!(mt_best.seed_type(), SeedType::SevenMerM8);

    let predictor = StubStructurePredictor::new(0.5);
    let score = deregulation_score(&mirna, &mrna, &variant, 200, &predictor).unwrap();
    assert!(score > 0.0, "disrupting the seed should lower the mutant's downregulation score: got {score}");
}

/// 50 nt single-exon Minus-strand mRNA with an "AC" -> "ACGU" insertion
/// (shift +2) anchored upstream of a G-rich target region. Filler is
/// Guanine throughout so an all-Cytosine miRNA finds a real binding site
/// anywhere in the sequence, letting part (c) compare genuinely non-zero
/// scores rather than two coincidental zeros.
fn mrna_for_indel_scenario() -> SplicedSequence {
    let raw = format!("{}{}{}", "G".repeat(39), "AC", "G".repeat(9));
    SplicedSequence::new("mrna5", &raw, "chr1", Strand::Minus, &[1], &[50], &ConservationTable::empty())
}

fn mirna_poly_c() -> SplicedSequence {
    SplicedSequence::new("mir5", "CCCCC", "chr9", Strand::Plus, &[1], &[5], &ConservationTable::empty())
}

#[test]
fn scenario_5_indel_coordinate_shift() {
    let mrna = mrna_for_indel_scenario();
    let variant = Variant::new("v5", "chr1", 11, Strand::Minus, "AC", "ACGU");
    assert_eq!(variant.shift(), 2);
    assert!(variant.matches(&mrna));

    let mutated = variant.apply_to(&mrna);

    // (a) the exon containing the target has grown by the shift.
    assert_eq!(mutated.exons(), &[Exon::new(1, 52)]);
    assert_eq!(mutated.total_length(), mrna.total_length() + 2);

    // (b) a position upstream of the anchor on the plus strand (chromosome
    // 5, below the reference interval [10, 11]) keeps its chromosome
    // position but moves forward by exactly `shift` in sequence order; a
    // position downstream of the anchor on the plus strand (chromosome 20)
    // is the one that actually shifts, by +2 on the chromosome. The base
    // identity at each probed chromosome position is preserved across the
    // mutation, confirming the renumbering didn't silently relabel a
    // different nucleotide.
    let original_seq_pos = mrna.chromosome_to_sequence(5);
    let mutated_seq_pos = mutated.chromosome_to_sequence(5);
    assert_eq!(mutated_seq_pos, original_seq_pos + 2);
    assert_eq!(
        mutated.nucleotide_at(mutated_seq_pos).unwrap().base(),
        mrna.nucleotide_at(original_seq_pos).unwrap().base()
    );

    assert_eq!(mutated.chromosome_to_sequence(20), 33);
    assert_eq!(mutated.nucleotide_at(33).unwrap().base(), Base::Guanine);

    // (c) the predicted 3' position shifts in the mutant evaluation iff it
    // lies at or past the reference interval's end on the plus strand.
    let mirna = mirna_poly_c();
    let predictor = StubStructurePredictor::new(0.5);
    let reference_end = variant.anchor() + variant.reference_len();
    assert_eq!(reference_end, 12);

    for &p3 in &[5u32, 40u32] {
        let shifted_p3 = if p3 < reference_end { p3 } else { (p3 as i64 + variant.shift() as i64) as u32 };
        let expected = downregulation_score(&mrna, &mirna, p3, &predictor).unwrap()
            - downregulation_score(&mutated, &mirna, shifted_p3, &predictor).unwrap();
        let actual = deregulation_score(&mirna, &mrna, &variant, p3, &predictor).unwrap();
        assert_eq!(actual, expected, "p3={p3} should wire through to the mutant evaluation at {shifted_p3}");
    }
}

/// A 17 nt alignment whose only non-Watson-Crick column is a G:U Wobble
/// (wild-type) at miRNA position 12, changed to a G:C Match (mutant);
/// every other column is a perfect diagonal match.
const WOBBLE_MIRNA: &str = "AAAAAAAAAAAGAAAAA";
const WOBBLE_SITE_WT: &str = "UUUUUCUUUUUUUUUUU";
const WOBBLE_SITE_MT: &str = "UUUUUUUUUUUUUUUUU";

#[test]
fn scenario_6_wobble_versus_match() {
    use mirscore_core::nucleotide::{pair, IndelKind, MatchPosition};

    // The identifier/score half of the scenario, checked directly against
    // the match algebra.
    let wobble = pair(Base::Guanine, Base::Uracil, MatchPosition::ThreePrime, IndelKind::Open);
    assert_eq!(wobble.identifier(), MatchIdentifier::Wobble);
    assert_eq!(wobble.score(), -1);
    let matched = pair(Base::Guanine, Base::Cytosine, MatchPosition::ThreePrime, IndelKind::Open);
    assert_eq!(matched.identifier(), MatchIdentifier::Match);
    assert_eq!(matched.score(), 5);

    // The three-prime feature half: the Wobble sits inside the 4-mer
    // window starting at miRNA position 13, knocking out its leading
    // half-credit neighbour; restoring it to a Match recovers the full
    // window score, which is also the global best (position 13 carries
    // this scan's maximum position weight).
    let mirna = SplicedSequence::new("mir6", WOBBLE_MIRNA, "chr1", Strand::Plus, &[1], &[17], &ConservationTable::empty());
    let predictor = StubStructurePredictor::new(0.5);

    let wt_mrna = SplicedSequence::new("site6wt", WOBBLE_SITE_WT, "chr1", Strand::Plus, &[1], &[17], &ConservationTable::empty());
    let wt_alignment = align::alignments(&wt_mrna, &mirna).into_iter().max_by_key(|a| a.score()).unwrap();
    let wt_features = features::extract(&wt_mrna, 17, &wt_alignment, &predictor).unwrap();

    let mt_mrna = SplicedSequence::new("site6mt", WOBBLE_SITE_MT, "chr1", Strand::Plus, &[1], &[17], &ConservationTable::empty());
    let mt_alignment = align::alignments(&mt_mrna, &mirna).into_iter().max_by_key(|a| a.score()).unwrap();
    let mt_features = features::extract(&mt_mrna, 17, &mt_alignment, &predictor).unwrap();

    assert!((wt_features[THREE_PRIME_FEATURE] - 4.5).abs() < 1e-9);
    assert!((mt_features[THREE_PRIME_FEATURE] - 5.0).abs() < 1e-9);
    assert!(mt_features[THREE_PRIME_FEATURE] > wt_features[THREE_PRIME_FEATURE]);
}
