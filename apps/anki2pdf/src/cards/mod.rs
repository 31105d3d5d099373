// Card records: Anki export parsing and field sanitization.

pub mod parser;
pub mod sanitize;

pub use parser::{parse_export_file, ParseStats};

/// One flashcard as read from the export.
///
/// `question` and `answer` are markup strings (inline HTML plus `<br/>` and
/// font-switch directives) ready for the fitted text renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Last segment of the `::`-delimited deck path.
    pub deck: String,
    pub question: String,
    pub answer: String,
}
