mod extractor;
pub mod rules;

pub use extractor::{extract_natives, ExtractionReport};
pub use rules::{EntryDecision, NativeRules};
