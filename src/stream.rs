pub mod classifier;
pub mod engine;
pub mod processor;
pub mod rewrite;
pub mod wrapper;

pub use classifier::{LineClassifier, LineType};
pub use engine::{ManifestEngine, ManifestOutcome};
pub use processor::StreamProcessor;
pub use rewrite::{RewrittenLine, rewrite_line};
pub use wrapper::{is_direct_video, wrapper_manifest};
