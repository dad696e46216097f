//! Import statement rewriting
//!
//! Given a document and the record the user picked, decide in order:
//!
//! 1. the module is already imported with this name: no edit
//! 2. an import from the same module has a brace group: add the name to it
//! 3. the document starts with a flow pragma: insert on line 1
//! 4. otherwise insert after the last import, or at the top
//!
//! A merge candidate that does not have the expected shape falls through to
//! insertion, so a document is never left half edited.

mod edit;
pub mod statement;

use std::path::Path;
use tracing::debug;

use crate::config::ImportsConfig;
use crate::symbol::{resolve_import_path, SymbolRecord};

pub use edit::TextEdit;
use statement::{find_imports, has_flow_pragma, last_import_end, ImportStatement};

const LINE_ENDING: &str = "\r\n";

/// Builds the edit that makes a symbol available in a document
#[derive(Debug, Clone)]
pub struct ImportRewriter {
    style: ImportsConfig,
}

impl ImportRewriter {
    pub fn new(style: &ImportsConfig) -> Self {
        Self {
            style: style.clone(),
        }
    }

    /// Edit importing `record` into the document stored at `document_path`
    pub fn edit(&self, document: &str, document_path: &Path, record: &SymbolRecord) -> TextEdit {
        let module_path = resolve_import_path(record, document_path);
        self.edit_for_module(document, record, &module_path)
    }

    /// Convenience: compute and apply the edit
    pub fn rewrite(&self, document: &str, document_path: &Path, record: &SymbolRecord) -> String {
        self.edit(document, document_path, record).apply(document)
    }

    /// Edit importing `record` from an already resolved module path
    pub fn edit_for_module(
        &self,
        document: &str,
        record: &SymbolRecord,
        module_path: &str,
    ) -> TextEdit {
        let module_path = module_path.replace(['"', '\''], "");
        let same_module: Vec<ImportStatement> = find_imports(document)
            .into_iter()
            .filter(|statement| statement.path == module_path)
            .collect();

        if same_module
            .iter()
            .any(|statement| statement.binds(&record.name))
        {
            debug!("{} is already imported from {}", record.name, module_path);
            return TextEdit::Noop;
        }

        if let Some(edit) = same_module
            .iter()
            .find_map(|statement| self.merge(statement, record))
        {
            return edit;
        }

        if !same_module.is_empty() {
            debug!(
                "Import from {} cannot take {}, inserting a new statement",
                module_path, record.name
            );
        }

        self.insert(document, record, &module_path)
    }

    /// `import <binding> from '<path>';` without a line ending
    pub fn statement(&self, record: &SymbolRecord, module_path: &str) -> String {
        let binding = if record.is_default {
            record.name.clone()
        } else {
            self.braces(&record.name)
        };
        let quote = if self.style.double_quotes { '"' } else { '\'' };
        let semicolon = if self.style.semicolon { ";" } else { "" };

        format!(
            "import {} from {}{}{}{}",
            binding,
            quote,
            module_path.replace(['"', '\''], ""),
            quote,
            semicolon
        )
    }

    fn braces(&self, inner: &str) -> String {
        if self.style.space_between_braces {
            format!("{{ {} }}", inner)
        } else {
            format!("{{{}}}", inner)
        }
    }

    /// Extend an existing statement from the same module, if its shape allows
    fn merge(&self, statement: &ImportStatement, record: &SymbolRecord) -> Option<TextEdit> {
        let (open, close) = statement.braces()?;

        if record.is_default {
            if statement.default_binding().is_some() || statement.namespace().is_some() {
                return None;
            }
            return Some(TextEdit::Insert {
                offset: open,
                text: format!("{}, ", record.name),
            });
        }

        let mut items = statement.named_items()?;
        items.push(&record.name);

        Some(TextEdit::Replace {
            start: open,
            end: close + 1,
            text: self.braces(&items.join(", ")),
        })
    }

    fn insert(&self, document: &str, record: &SymbolRecord, module_path: &str) -> TextEdit {
        let statement = self.statement(record, module_path);

        let anchor = if has_flow_pragma(document) {
            Some(0)
        } else {
            last_import_end(document)
        };

        let Some(anchor) = anchor else {
            return TextEdit::Insert {
                offset: 0,
                text: format!("{}{}", statement, LINE_ENDING),
            };
        };

        match document[anchor..].find('\n') {
            Some(newline) => TextEdit::Insert {
                offset: anchor + newline + 1,
                text: format!("{}{}", statement, LINE_ENDING),
            },
            None => TextEdit::Insert {
                offset: document.len(),
                text: format!("{}{}{}", LINE_ENDING, statement, LINE_ENDING),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter() -> ImportRewriter {
        ImportRewriter::new(&ImportsConfig::default())
    }

    fn local(name: &str, origin: &str, is_default: bool) -> SymbolRecord {
        SymbolRecord::local(name, Path::new(origin), is_default)
    }

    const DOC_PATH: &str = "/index.js";

    #[test]
    fn test_insert_into_empty_document() {
        let record = local("Baz", "/x/Baz.ts", false);
        let result = rewriter().rewrite("", Path::new(DOC_PATH), &record);

        assert_eq!(result, "import { Baz } from './x/Baz';\r\n");
    }

    #[test]
    fn test_merge_into_existing_import() {
        let doc = "import { Foo } from './a/Foo';\n\nFoo(Bar);\n";
        let record = local("Bar", "/a/Foo.js", false);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(result, "import { Foo, Bar } from './a/Foo';\n\nFoo(Bar);\n");
    }

    #[test]
    fn test_block_commented_import_is_not_merged_into() {
        let doc = "/*\nimport { Foo } from './a/Foo';\n*/\nconst x = 1;\n";
        let record = local("Bar", "/a/Foo.js", false);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(
            result,
            "import { Bar } from './a/Foo';\r\n/*\nimport { Foo } from './a/Foo';\n*/\nconst x = 1;\n"
        );
    }

    #[test]
    fn test_name_in_commented_import_is_not_resolved() {
        let doc = "import React from 'react';\n/* import { Foo } from './a/Foo'; */\n";
        let record = local("Foo", "/a/Foo.js", false);
        let edit = rewriter().edit(doc, Path::new(DOC_PATH), &record);

        assert!(!edit.is_noop());
        assert_eq!(
            edit.apply(doc),
            "import React from 'react';\nimport { Foo } from './a/Foo';\r\n/* import { Foo } from './a/Foo'; */\n"
        );
    }

    #[test]
    fn test_already_resolved_is_noop() {
        let doc = "import { Foo, Bar } from './a/Foo';\n";
        let record = local("Bar", "/a/Foo.js", false);

        assert!(rewriter().edit(doc, Path::new(DOC_PATH), &record).is_noop());
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let docs = [
            "",
            "import React from 'react';\n\nexport default () => null;\n",
            "// @flow\nconst x = 1;\n",
            "import { Foo } from './a/Foo';",
            "import Other from './a/Foo';\n",
        ];
        let records = [
            local("Bar", "/a/Foo.js", false),
            local("Main", "/a/Foo.js", true),
            SymbolRecord::discovered("useForm", "react-hook-form"),
        ];

        for doc in docs {
            for record in &records {
                let once = rewriter().rewrite(doc, Path::new(DOC_PATH), record);
                let twice = rewriter().rewrite(&once, Path::new(DOC_PATH), record);
                assert_eq!(once, twice, "doc {:?} record {}", doc, record.name);
            }
        }
    }

    #[test]
    fn test_discovered_record_uses_specifier() {
        let doc = "import React from 'react';\n";
        let record = SymbolRecord::discovered("useForm", "react-hook-form");
        let result = rewriter().rewrite(doc, Path::new("/src/deep/Form.tsx"), &record);

        assert_eq!(
            result,
            "import React from 'react';\nimport { useForm } from 'react-hook-form';\r\n"
        );
    }

    #[test]
    fn test_insert_after_last_import() {
        let doc = "import a from 'a';\nimport {\n  b,\n} from 'b';\n\nconst c = a + b;\n";
        let record = local("Util", "/util.js", true);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(
            result,
            "import a from 'a';\nimport {\n  b,\n} from 'b';\nimport Util from './util';\r\n\nconst c = a + b;\n"
        );
    }

    #[test]
    fn test_insert_after_flow_pragma() {
        let doc = "// @flow\nimport a from 'a';\n";
        let record = local("Thing", "/thing.js", false);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(
            result,
            "// @flow\nimport { Thing } from './thing';\r\nimport a from 'a';\n"
        );
    }

    #[test]
    fn test_last_import_without_trailing_newline() {
        let doc = "import a from 'a';";
        let record = local("b", "/b.js", false);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(result, "import a from 'a';\r\nimport { b } from './b';\r\n");
    }

    #[test]
    fn test_default_only_import_falls_back_to_insert() {
        let doc = "import Foo from './Foo';\n";
        let record = local("helper", "/Foo.js", false);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(
            result,
            "import Foo from './Foo';\nimport { helper } from './Foo';\r\n"
        );
    }

    #[test]
    fn test_default_record_merges_before_braces() {
        let doc = "import { helper } from './Foo';\n";
        let record = local("Foo", "/Foo.js", true);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(result, "import Foo, { helper } from './Foo';\n");
    }

    #[test]
    fn test_style_options() {
        let style = ImportsConfig {
            space_between_braces: false,
            double_quotes: true,
            semicolon: false,
        };
        let record = local("Baz", "/x/Baz.ts", false);
        let result = ImportRewriter::new(&style).rewrite("", Path::new(DOC_PATH), &record);

        assert_eq!(result, "import {Baz} from \"./x/Baz\"\r\n");
    }

    #[test]
    fn test_unrelated_content_is_preserved() {
        let doc = "import { Foo } from './a/Foo';\r\nimport x from 'x';\r\n// import { Bar } from './a/Foo';\r\n";
        let record = local("Bar", "/a/Foo.js", false);
        let result = rewriter().rewrite(doc, Path::new(DOC_PATH), &record);

        assert_eq!(
            result,
            "import { Foo, Bar } from './a/Foo';\r\nimport x from 'x';\r\n// import { Bar } from './a/Foo';\r\n"
        );
    }
}
