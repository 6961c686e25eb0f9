//! Feature extraction (component C6): turns one candidate alignment into
//! the 34 real-valued inputs the scoring model consumes.
//!
//! Mirrors `miRNA::downregulation_score_candidate` and its six helper
//! methods from the mirSVR reference scorer, generalized from a fixed
//! `RNAplfold` process call to the [`StructurePredictor`] trait.

use crate::align::{Alignment, SeedType};
use crate::error::CoreError;
use crate::nucleotide::{Base, ChromosomePosition, SequencePosition};
use crate::predictor::StructurePredictor;
use crate::sequence::SplicedSequence;
use log::warn;

/// Index layout matches the source's `feature_count = 34` array, so
/// `DESIGN.md`'s grounding table and any future debugging can cross-reference
/// by position: `0` UTRLength, `1..=20` SS01..SS20, `21` Conservation, `22`
/// A/U content, `23` Three-prime, `24` UTRDist, `25..=33` seed match (A1, m2..m9).
pub const FEATURE_COUNT: usize = 34;

const UTR_LENGTH: usize = 0;
const SS_FIRST: usize = 1;
const SS_COUNT: usize = 20;
const CONSERVATION: usize = 21;
const AU_CONTENT: usize = 22;
const THREE_PRIME: usize = 23;
const UTR_DIST: usize = 24;
const SEED_MATCH_FIRST: usize = 25;

const ACCESSIBILITY_SPAN: u32 = 40;
const ACCESSIBILITY_WINDOW: u32 = 80;
const ACCESSIBILITY_PROBE_WIDTH: u32 = 16;
const ACCESSIBILITY_HALF_RANGE: u32 = 80;
const SCORE_CUTOFF: f64 = 0.000_001;

const AU_FLANK_WIDTH: u32 = 30;
const AU_UPSTREAM_OFFSET: u32 = 8;

const THREE_PRIME_WEIGHTS: [f64; 9] = [0.2424242, 0.3333333, 0.6060606, 0.9090909, 1.0, 0.6060606, 0.4545455, 0.2121212, 0.1818182];

const UTR_DIST_CUTOFF: f64 = 1500.0;

/// Extracts all 34 features for `alignment`, a candidate mRNA:miRNA binding
/// site on the full, unwindowed `mrna` (accessibility, A/U content and
/// UTR-distance all look beyond the short alignment window back into the
/// full transcript) ending at `predicted_three_prime_position`.
pub fn extract(
    mrna: &SplicedSequence,
    predicted_three_prime_position: ChromosomePosition,
    alignment: &Alignment,
    predictor: &dyn StructurePredictor,
) -> Result<[f64; FEATURE_COUNT], CoreError> {
    let seed_type = alignment.seed_type();
    let center = mrna.chromosome_to_sequence(predicted_three_prime_position);

    let mut features = [0.0; FEATURE_COUNT];
    features[UTR_LENGTH] = f64::from(mrna.total_length());

    let accessibility = accessibility_features(mrna, center, predictor)?;
    features[SS_FIRST..SS_FIRST + SS_COUNT].copy_from_slice(&accessibility);

    features[CONSERVATION] = conservation_feature(alignment);
    features[AU_CONTENT] = au_content_feature(mrna, center, seed_type);
    features[THREE_PRIME] = three_prime_feature(alignment);
    features[UTR_DIST] = utr_dist_feature(mrna, center, seed_type);

    let seed_match = seed_match_features(alignment);
    features[SEED_MATCH_FIRST..SEED_MATCH_FIRST + seed_match.len()].copy_from_slice(&seed_match);

    Ok(features)
}

/// SS01..SS20: local accessibility, from a `±80` nt window run through the
/// external predictor. Each feature averages two adjacent probabilities at
/// symmetric offsets from the target centre, skipping the centre itself,
/// per the resolved (not the raw source) windowing rule.
fn accessibility_features(mrna: &SplicedSequence, center: SequencePosition, predictor: &dyn StructurePredictor) -> Result<[f64; SS_COUNT], CoreError> {
    if center == 0 {
        warn!("feature extraction: predicted 3' position does not map onto mRNA -- accessibility features are 0");
        return Ok([0.0; SS_COUNT]);
    }
    let window_start = center.saturating_sub(ACCESSIBILITY_HALF_RANGE).max(1);
    let window_end = (center + ACCESSIBILITY_HALF_RANGE).min(mrna.total_length());
    let window = mrna.subsequence_from_to(window_start, window_end);
    let bases: String = window
        .nucleotides()
        .iter()
        .map(|n| base_char(n.base()))
        .collect();
    let probabilities = predictor.predict(&bases, ACCESSIBILITY_SPAN, ACCESSIBILITY_WINDOW, ACCESSIBILITY_PROBE_WIDTH)?;
    if probabilities.len() != window.total_length() as usize {
        return Err(CoreError::ExternalPredictorFailed(format!(
            "predictor returned {} probabilities for a {}-nucleotide window",
            probabilities.len(),
            window.total_length()
        )));
    }
    let center_in_window = (center - window_start + 1) as i64;

    let mut features = [0.0; SS_COUNT];
    for (k, feature) in features.iter_mut().enumerate() {
        let delta = if k < SS_COUNT / 2 { -20 + 2 * k as i64 } else { 1 + 2 * (k - SS_COUNT / 2) as i64 };
        let first = center_in_window + delta;
        let second = first + 1;
        if first < 1 || second > probabilities.len() as i64 {
            continue;
        }
        let mean = (probabilities[first as usize - 1] + probabilities[second as usize - 1]) / 2.0;
        *feature = -mean.max(SCORE_CUTOFF).ln();
    }
    Ok(features)
}

fn base_char(base: Base) -> char {
    match base {
        Base::Adenine => 'A',
        Base::Cytosine => 'C',
        Base::Guanine => 'G',
        Base::Uracil => 'U',
        Base::Gap => '-',
        Base::Mask => 'X',
    }
}

/// Conservation: mean of the non-gap mRNA columns' conservation scores,
/// collapsing runs of zeros to a single representative zero.
fn conservation_feature(alignment: &Alignment) -> f64 {
    let raw: Vec<f64> = alignment
        .columns()
        .iter()
        .filter(|c| c.mrna_nucleotide().base() != Base::Gap)
        .map(|c| c.mrna_nucleotide().conservation())
        .collect();
    if raw.is_empty() {
        return 0.0;
    }
    let mut collapsed = vec![raw[0]];
    for pair in raw.windows(2) {
        let (prev, cur) = (pair[0], pair[1]);
        if cur != 0.0 || prev != 0.0 {
            collapsed.push(cur);
        }
    }
    collapsed.iter().sum::<f64>() / collapsed.len() as f64
}

fn au_regression(seed_type: SeedType) -> (f64, f64) {
    match seed_type {
        SeedType::EightMer => (0.365, -0.64),
        SeedType::SevenMerM8 => (0.269, -0.5),
        SeedType::SevenMerA1 => (0.236, -0.42),
        SeedType::SixMer => (0.13, -0.241),
    }
}

/// A/U content: weighted fraction of Adenine/Uracil bases in fixed `±30`
/// nt flanks around the seed-match region, the weight-formula distance
/// endpoint (not the flank's extent) shifted by one per seed type.
fn au_content_feature(mrna: &SplicedSequence, center: SequencePosition, seed_type: SeedType) -> f64 {
    let (intercept, slope) = au_regression(seed_type);
    if center == 0 {
        return intercept;
    }
    let upstream_shift = matches!(seed_type, SeedType::SevenMerA1 | SeedType::SixMer) as u32 as f64;
    let downstream_shift = matches!(seed_type, SeedType::EightMer | SeedType::SevenMerA1) as u32 as f64;

    let upstream_end = center.saturating_sub(AU_UPSTREAM_OFFSET);
    let upstream_start = upstream_end.saturating_sub(AU_FLANK_WIDTH);
    let upstream = mrna.subsequence_from_to(upstream_start, upstream_end);
    let upstream_length = f64::from(upstream.total_length());

    let downstream_start = center + 1;
    let downstream_end = downstream_start + AU_FLANK_WIDTH;
    let downstream = mrna.subsequence_from_to(downstream_start, downstream_end);

    let mut score = 0.0;
    let mut max_score = 0.0;
    for n in upstream.nucleotides() {
        let position_score = 1.0 / (upstream_length - f64::from(n.sequence_position()) + 1.0 + upstream_shift);
        if matches!(n.base(), Base::Adenine | Base::Uracil) {
            score += position_score;
        }
        max_score += position_score;
    }
    for n in downstream.nucleotides() {
        let position_score = 1.0 / (f64::from(n.sequence_position()) + downstream_shift);
        if matches!(n.base(), Base::Adenine | Base::Uracil) {
            score += position_score;
        }
        max_score += position_score;
    }
    if max_score == 0.0 {
        return intercept;
    }
    score / max_score * slope + intercept
}

fn is_match(alignment: &Alignment, idx: usize) -> bool {
    alignment.columns().get(idx).is_some_and(|c| c.is_match())
}

/// Three-prime: best-scoring 4-mer window (miRNA positions 9..=17), each
/// scored by its four central columns plus half credit for each adjacent
/// match, weighted by position.
fn three_prime_feature(alignment: &Alignment) -> f64 {
    let mut best = 0.0_f64;
    for start_pos in 9..=17u32 {
        let Some(start_idx) = alignment.columns().iter().position(|c| c.mirna_nucleotide().sequence_position() == start_pos) else {
            continue;
        };
        if start_idx == 0 || start_idx + 4 >= alignment.columns().len() {
            continue;
        }
        let mut four_mer_score = if is_match(alignment, start_idx - 1) { 0.5 } else { 0.0 };
        for offset in 0..4 {
            if is_match(alignment, start_idx + offset) {
                four_mer_score += 1.0;
            }
        }
        if is_match(alignment, start_idx + 4) {
            four_mer_score += 0.5;
        }
        four_mer_score *= THREE_PRIME_WEIGHTS[(start_pos - 9) as usize];
        best = best.max(four_mer_score);
    }
    best
}

fn utr_dist_regression(seed_type: SeedType) -> (f64, f64) {
    match seed_type {
        SeedType::EightMer => (-0.07, 0.000_172),
        SeedType::SevenMerM8 => (-0.037, 0.000_091),
        SeedType::SevenMerA1 => (-0.032, 0.000_072),
        SeedType::SixMer => (-0.018, 0.000_049),
    }
}

/// UTRDist: distance from the seed-match end to the nearer UTR end,
/// clamped to 1500 nt, with a per-seed-type linear regression applied.
fn utr_dist_feature(mrna: &SplicedSequence, center: SequencePosition, seed_type: SeedType) -> f64 {
    let (intercept, slope) = utr_dist_regression(seed_type);
    if center == 0 {
        return intercept;
    }
    let offset = f64::from(seed_type.seed_end_offset());
    let three_prime_distance = f64::from(center) - offset;
    let five_prime_distance = f64::from(mrna.total_length()) - f64::from(center);
    let min_distance = three_prime_distance.min(five_prime_distance).max(0.0);
    min_distance.min(UTR_DIST_CUTOFF) * slope + intercept
}

/// Seed match: element 0 is whether column 0's mRNA base is Adenine,
/// elements 1..=8 whether columns 1..=8 are Match.
fn seed_match_features(alignment: &Alignment) -> [f64; 9] {
    let mut features = [0.0; 9];
    if let Some(first) = alignment.columns().first() {
        features[0] = f64::from(u8::from(first.mrna_nucleotide().base() == Base::Adenine));
    }
    for (i, feature) in features.iter_mut().enumerate().skip(1) {
        *feature = f64::from(u8::from(is_match(alignment, i)));
    }
    features
}
