use anyhow::Result;

use autoimport::config::ImportsConfig;
use autoimport::diagnostic::undefined_symbol;
use autoimport::{Resolution, Workspace};

use crate::helpers::test_harness::TestHarness;

const HOME: &str = "import React from 'react';\nimport { Header } from '../components/Header';\n\nexport default function Home() {\n  return <Button />;\n}\n";

#[tokio::test]
async fn test_fix_inserts_relative_default_import() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("src/components/Button.tsx", "export default class Button {}\n")?;
    let home = harness.create_test_file("src/pages/Home.tsx", HOME)?;

    let workspace = harness.scanned_workspace().await?;
    let Resolution::Unique(record) = workspace.resolve("Button") else {
        panic!("Button should resolve to one file");
    };

    let result = workspace.fix(HOME, &home, &record).apply(HOME);

    assert_eq!(
        result,
        "import React from 'react';\nimport { Header } from '../components/Header';\nimport Button from '../components/Button';\r\n\nexport default function Home() {\n  return <Button />;\n}\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_fix_merges_into_statement_from_same_module() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "src/components/Header.tsx",
        "export const Header = () => null;\nexport const HeaderTitle = () => null;\n",
    )?;
    let home = harness.create_test_file("src/pages/Home.tsx", HOME)?;

    let workspace = harness.scanned_workspace().await?;
    let record = workspace.lookup("HeaderTitle").remove(0);
    let result = workspace.fix(HOME, &home, &record).apply(HOME);

    assert!(result.contains("import { Header, HeaderTitle } from '../components/Header';\n"));
    assert_eq!(result.matches("import").count(), HOME.matches("import").count());

    let again = workspace.fix(&result, &home, &record);
    assert!(again.is_noop());

    Ok(())
}

#[tokio::test]
async fn test_diagnostic_to_discovered_import() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "node_modules/forms/index.js",
        "import { useForm } from 'react-hook-form';\n",
    )?;
    let doc = "// @flow\nconst form = useForm();\n";
    let form = harness.create_test_file("src/deep/nested/Form.js", doc)?;

    let workspace = harness.scanned_workspace().await?;
    let name = undefined_symbol("'useForm' is not defined.").unwrap();
    let Resolution::Unique(record) = workspace.resolve(&name) else {
        panic!("useForm should be discovered");
    };

    let result = workspace.fix(doc, &form, &record).apply(doc);
    assert_eq!(
        result,
        "// @flow\nimport { useForm } from 'react-hook-form';\r\nconst form = useForm();\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_configured_import_style() -> Result<()> {
    let mut harness = TestHarness::new()?;
    harness.config.imports = ImportsConfig {
        space_between_braces: false,
        double_quotes: true,
        semicolon: false,
    };
    harness.create_test_file("lib/api.ts", "export function fetchUser() {}\n")?;
    let app = harness.create_test_file("app.ts", "")?;

    let mut workspace = Workspace::new(harness.path().to_path_buf(), harness.config.clone())?;
    workspace.scan_project().await?;

    let record = workspace.lookup("fetchUser").remove(0);
    let result = workspace.fix("", &app, &record).apply("");
    assert_eq!(result, "import {fetchUser} from \"./lib/api\"\r\n");

    Ok(())
}
