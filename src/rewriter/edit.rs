/// A single change to a document buffer, expressed in byte offsets.
///
/// The rewriter never touches files; hosts apply the edit to whatever buffer
/// they hold (an open editor document, a file read from disk).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    /// Nothing to do, the symbol is already imported
    Noop,
    Insert {
        offset: usize,
        text: String,
    },
    Replace {
        start: usize,
        end: usize,
        text: String,
    },
}

impl TextEdit {
    pub fn is_noop(&self) -> bool {
        matches!(self, TextEdit::Noop)
    }

    /// Apply the edit to `document` and return the new text
    pub fn apply(&self, document: &str) -> String {
        match self {
            TextEdit::Noop => document.to_string(),
            TextEdit::Insert { offset, text } => {
                let mut result = String::with_capacity(document.len() + text.len());
                result.push_str(&document[..*offset]);
                result.push_str(text);
                result.push_str(&document[*offset..]);
                result
            }
            TextEdit::Replace { start, end, text } => {
                let mut result = String::with_capacity(document.len() + text.len());
                result.push_str(&document[..*start]);
                result.push_str(text);
                result.push_str(&document[*end..]);
                result
            }
        }
    }
}
