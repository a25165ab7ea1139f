/// Represents the type of a line in an M3U8 playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Tags, comments, and blank lines.
    Other,
    Uri,
}

/// Classifier for M3U8 lines.
pub struct LineClassifier;

impl LineClassifier {
    /// Classify a line. Anything non-blank that does not start with `#` is a URI.
    pub fn classify(line: &str) -> LineType {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            LineType::Other
        } else {
            LineType::Uri
        }
    }
}
