pub mod boilerplate;
pub mod classifier;
pub mod dedup;
pub mod lexicon;

pub use boilerplate::strip_gutenberg_boilerplate;
pub use classifier::ContaminationDetector;
pub use dedup::{
  Deduped, Deduplicator, DuplicateChecker, DuplicateMatch, Fingerprint, adaptive_threshold, dedupe, fingerprint,
  hamming_distance, jaccard_similarity, normalize, simhash,
};
pub use lexicon::{LEXICON_VERSION, Lexicon, LexiconEntry, PatternCategory, PatternEntry, TermCategory};
