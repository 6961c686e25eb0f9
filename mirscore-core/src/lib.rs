//! Pure compute library for the mirSVR deregulation score: how much an
//! SNV/indel changes a miRNA's predicted downregulation of a target mRNA
//! site.
//!
//! The pipeline is a chain of pure, immutable-value stages -- nucleotide
//! match algebra, spliced sequence coordinates, variant application, the
//! mRNA:miRNA alignment engine, feature extraction and the scoring model --
//! wired together by [`deregulation::deregulation_score`]. Nothing here
//! touches a process or the filesystem directly except [`io`], whose
//! parsers hand back the same value types the rest of the crate consumes.

pub mod align;
pub mod conservation;
pub mod deregulation;
pub mod error;
pub mod features;
pub mod io;
pub mod nucleotide;
pub mod predictor;
pub mod scoring;
pub mod sequence;
pub mod variant;

pub use align::{Alignment, AlignmentColumn, SeedType};
pub use conservation::ConservationTable;
pub use deregulation::{deregulation_score, downregulation_score};
pub use error::CoreError;
pub use nucleotide::{Base, ChromosomePosition, MatchIdentifier, MatchType, Nucleotide, SequencePosition};
pub use predictor::{StructurePredictor, StubStructurePredictor};
pub use sequence::{Exon, SplicedSequence, Strand};
pub use variant::Variant;
