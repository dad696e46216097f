//! Exported-declaration extraction from source text
//!
//! Recognition is lexical: a single regex approximates the shape of an
//! export statement. The scanners only see the `DeclarationExtractor` trait.

use regex::Regex;

use super::errors::ScanError;

/// One matched export statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Full text matched by the pattern
    pub text: String,
    /// Bound identifier, `None` when the match had nothing capturable
    pub name: Option<String>,
    pub is_default: bool,
}

/// Finds candidate exported declarations in a file's text
pub trait DeclarationExtractor: Send + Sync {
    fn extract(&self, source: &str) -> Vec<Declaration>;
}

/// Regex-based extractor for `export [default] [kind] [wrapper(...)] name`.
///
/// The configured wrapper alternation (e.g. `connect|withRouter`) only applies
/// directly in front of a call; the bound name is then the last identifier of
/// the match, so `export default connect(mapState)(Profile)` yields `Profile`.
pub struct ExportPattern {
    regex: Regex,
}

/// Words the pattern can land on after `export default` that never name a
/// binding, as in `export default {` or `export default new Store()`
const RESERVED_WORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "import", "in", "instanceof", "let", "new", "null", "return", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield",
];

const DECLARATION_KINDS: &str =
    r"(?:(?:async\s+)?function\*?|class|interface|let|var|const|type|enum)";

impl ExportPattern {
    pub fn new(higher_order_components: &str) -> Result<Self, ScanError> {
        let wrappers = higher_order_components.trim();

        let wrapper_group = if wrappers.is_empty() {
            String::new()
        } else {
            format!(r"(?:(?:{})\s*\((?:.*[, (])?)?", wrappers)
        };

        let pattern = format!(
            r"\bexport\s?(?P<default>default)?\s?{}? {}(?P<name>[\w$]+)",
            DECLARATION_KINDS, wrapper_group
        );

        let regex = Regex::new(&pattern).map_err(|source| ScanError::InvalidPattern {
            pattern: higher_order_components.to_string(),
            source,
        })?;

        Ok(Self { regex })
    }
}

impl DeclarationExtractor for ExportPattern {
    fn extract(&self, source: &str) -> Vec<Declaration> {
        self.regex
            .captures_iter(source)
            .filter_map(|caps| {
                let matched = caps.get(0)?;
                let text = matched.as_str();

                Some(Declaration {
                    text: text.to_string(),
                    name: caps
                        .name("name")
                        .map(|m| m.as_str())
                        .filter(|name| !RESERVED_WORDS.contains(name))
                        .map(str::to_string),
                    is_default: contains_word(text, "default"),
                })
            })
            .collect()
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$'))
        .any(|token| token == word)
}
