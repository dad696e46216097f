//! Lexical view of the import statements already present in a document

use lazy_static::lazy_static;
use regex::Regex;
use std::ops::Range;

lazy_static! {
    /// `import <clause> from '<path>'` starting at the beginning of a line
    static ref IMPORT_FROM: Regex = Regex::new(
        r#"(?m)^[ \t]*import\s+(?P<clause>[^'";]*?)\s*\bfrom\s*['"](?P<path>[^'"\r\n]+)['"]"#
    )
    .expect("import-from pattern is valid");

    /// Any line starting with the `import` keyword, side-effect imports included
    static ref IMPORT_KEYWORD: Regex =
        Regex::new(r"(?m)^[ \t]*import\b").expect("import keyword pattern is valid");

    static ref FLOW_PRAGMA: Regex =
        Regex::new(r"^/[/*]\s*@flow\b").expect("flow pragma pattern is valid");
}

/// An `import ... from '...'` statement and its byte offsets in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement<'a> {
    pub start: usize,
    pub end: usize,
    pub path: &'a str,
    clause: &'a str,
    clause_start: usize,
}

impl<'a> ImportStatement<'a> {
    /// Absolute offsets of `{` and `}` in the clause, if it has a well-formed
    /// brace group
    pub fn braces(&self) -> Option<(usize, usize)> {
        let open = self.clause.find('{')?;
        let close = self.clause.rfind('}')?;

        if close < open || self.clause[open + 1..close].contains(['{', '}']) {
            return None;
        }
        Some((self.clause_start + open, self.clause_start + close))
    }

    /// Items of the brace group exactly as written, e.g. `a as b`
    pub fn named_items(&self) -> Option<Vec<&'a str>> {
        let open = self.clause.find('{')?;
        let close = self.clause.rfind('}')?;
        if close < open {
            return None;
        }

        Some(
            self.clause[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .collect(),
        )
    }

    /// Default binding in front of the braces, e.g. `React` in `React, { useState }`
    pub fn default_binding(&self) -> Option<&'a str> {
        self.head_bindings()
            .into_iter()
            .find(|binding| !binding.starts_with('*'))
    }

    /// Local name of a `* as ns` binding
    pub fn namespace(&self) -> Option<&'a str> {
        self.head_bindings()
            .into_iter()
            .find(|binding| binding.starts_with('*'))
            .and_then(|binding| binding.split_whitespace().last())
            .filter(|local| *local != "*")
    }

    /// Whether this statement already binds `name` locally
    pub fn binds(&self, name: &str) -> bool {
        let named = self.named_items().unwrap_or_default();

        self.default_binding() == Some(name)
            || self.namespace() == Some(name)
            || named
                .iter()
                .any(|item| item.split_whitespace().last() == Some(name))
    }

    fn head_bindings(&self) -> Vec<&'a str> {
        let head = match self.clause.find('{') {
            Some(open) => &self.clause[..open],
            None => self.clause,
        };
        let head = head.trim();
        let head = head.strip_prefix("type ").unwrap_or(head);

        head.split(',')
            .map(str::trim)
            .filter(|binding| !binding.is_empty())
            .collect()
    }
}

/// Byte ranges of comments and template literals. String literals are
/// skipped so that `//` inside a quoted path does not open a comment.
fn inert_spans(document: &str) -> Vec<Range<usize>> {
    let bytes = document.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                let end = document[i..].find('\n').map_or(bytes.len(), |n| i + n);
                spans.push(i..end);
                i = end;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = document[i + 2..].find("*/").map_or(bytes.len(), |n| i + 2 + n + 2);
                spans.push(i..end);
                i = end;
            }
            quote @ (b'\'' | b'"' | b'`') => {
                let mut j = i + 1;
                while j < bytes.len() && bytes[j] != quote {
                    if bytes[j] == b'\\' {
                        j += 1;
                    } else if bytes[j] == b'\n' && quote != b'`' {
                        break;
                    }
                    j += 1;
                }
                let end = (j + 1).min(bytes.len());
                if quote == b'`' {
                    spans.push(i..end);
                }
                i = end;
            }
            _ => i += 1,
        }
    }

    spans
}

/// Line-leading `import` keywords that are code, not commented out
fn import_keywords(document: &str) -> impl Iterator<Item = regex::Match<'_>> {
    let spans = inert_spans(document);
    IMPORT_KEYWORD
        .find_iter(document)
        .filter(move |keyword| !spans.iter().any(|span| span.contains(&keyword.end())))
}

/// Every `import ... from` statement in document order
pub fn find_imports(document: &str) -> Vec<ImportStatement<'_>> {
    let mut imports: Vec<ImportStatement<'_>> = Vec::new();

    for keyword in import_keywords(document) {
        if imports.last().map_or(false, |last| keyword.start() < last.end) {
            continue;
        }
        let Some(caps) = IMPORT_FROM.captures_at(document, keyword.start()) else {
            continue;
        };
        let (Some(whole), Some(clause), Some(path)) =
            (caps.get(0), caps.name("clause"), caps.name("path"))
        else {
            continue;
        };
        if whole.start() != keyword.start() {
            continue;
        }

        imports.push(ImportStatement {
            start: whole.start(),
            end: whole.end(),
            path: path.as_str(),
            clause: clause.as_str(),
            clause_start: clause.start(),
        });
    }

    imports
}

/// End offset of the last import statement, or of the last line-leading
/// `import` keyword when that statement has no `from` part. Commented-out
/// imports are not considered.
pub fn last_import_end(document: &str) -> Option<usize> {
    let keyword = import_keywords(document).last()?;

    let end = IMPORT_FROM
        .find_at(document, keyword.start())
        .filter(|statement| statement.start() == keyword.start())
        .map(|statement| statement.end())
        .unwrap_or_else(|| keyword.end());

    Some(end)
}

/// Whether the document opens with a `// @flow` or `/* @flow` pragma
pub fn has_flow_pragma(document: &str) -> bool {
    FLOW_PRAGMA.is_match(document)
}
