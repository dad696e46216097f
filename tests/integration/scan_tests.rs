use anyhow::Result;
use std::path::Path;

use autoimport::scanner::ExportScanner;
use autoimport::{Resolution, SymbolIndex};

use crate::helpers::test_harness::TestHarness;

fn origin(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_project_scan_indexes_every_export_shape() -> Result<()> {
    let harness = TestHarness::new()?;
    let button = harness.create_test_file(
        "src/components/Button.tsx",
        "export default function Button() {}\nexport interface ButtonProps {}\n",
    )?;
    let nav = harness.create_test_file(
        "src/components/Nav.jsx",
        "class Nav {}\nexport default withRouter(Nav);\nexport const connected = connect(mapState)(Nav);\n",
    )?;
    harness.create_test_file("src/util/math.js", "export async function sum(a, b) {}\nexport enum Mode {}\n")?;
    harness.create_test_file("README.md", "export const nope = 1;")?;

    let workspace = harness.scanned_workspace().await?;

    let records = workspace.lookup("Button");
    assert_eq!(records.len(), 1);
    assert!(records[0].is_default);
    assert_eq!(records[0].origin_path, origin(&button));

    assert!(!workspace.lookup("ButtonProps")[0].is_default);

    let nav_records = workspace.lookup("Nav");
    assert_eq!(nav_records.len(), 1);
    assert!(nav_records[0].is_default);
    assert_eq!(nav_records[0].origin_path, origin(&nav));

    assert_eq!(workspace.lookup("connected").len(), 1);
    assert_eq!(workspace.lookup("sum").len(), 1);
    assert_eq!(workspace.lookup("Mode").len(), 1);
    assert!(workspace.lookup("nope").is_empty());

    let total: usize = workspace
        .index()
        .origins()
        .iter()
        .map(|o| workspace.index().all().iter().filter(|r| &r.origin_path == o).count())
        .sum();
    assert_eq!(total, workspace.count());

    Ok(())
}

#[tokio::test]
async fn test_ignored_trees_are_not_scanned_as_project_files() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(".gitignore", "dist/\n")?;
    harness.create_test_file("dist/bundle.js", "export const Bundled = 1;")?;
    harness.create_test_file("typings/global.d.ts", "export type Global = {};")?;
    harness.create_test_file("node_modules/left-pad/index.js", "export default function leftPad() {}")?;
    harness.create_test_file("src/index.ts", "export const App = 1;")?;

    let workspace = harness.scanned_workspace().await?;

    assert_eq!(workspace.lookup("App").len(), 1);
    assert!(workspace.lookup("Bundled").is_empty());
    assert!(workspace.lookup("Global").is_empty());
    assert!(workspace.lookup("leftPad").is_empty());

    Ok(())
}

#[tokio::test]
async fn test_root_named_like_ignore_pattern_is_still_scanned() -> Result<()> {
    let harness = TestHarness::with_prefix("typings-app")?;
    harness.create_test_file("src/App.ts", "export const App = 1;")?;
    harness.create_test_file("src/typingsHelper.ts", "export const helper = 1;")?;
    harness.create_test_file("typings/global.ts", "export type Global = {};")?;

    let mut workspace = harness.scanned_workspace().await?;

    assert_eq!(workspace.lookup("App").len(), 1);
    assert_eq!(workspace.lookup("helper").len(), 1);
    assert!(workspace.lookup("Global").is_empty());

    let added = harness.create_test_file("src/Late.ts", "export const Late = 1;")?;
    assert!(workspace.file_changed(&added).await.is_some());
    assert_eq!(workspace.lookup("Late").len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_package_scan_registers_discovered_symbols() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file(
        "node_modules/formik/index.js",
        "import React, { useState, useEffect as effect } from 'react';\nimport helper from './helper';\nimport 'style!css';\nimport * as lodash from 'lodash';\n",
    )?;
    harness.create_test_file(
        "node_modules/other/main.js",
        "import { useState } from 'react';\nimport { useForm } from 'react-hook-form';\n",
    )?;
    harness.create_test_file(
        "node_modules/other/dist/deep.js",
        "import { Deep } from 'deep-package';\n",
    )?;

    let workspace = harness.scanned_workspace().await?;

    let react: Vec<String> = ["React", "useState", "effect"]
        .iter()
        .map(|name| {
            let records = workspace.lookup(name);
            assert_eq!(records.len(), 1, "{}", name);
            assert!(records[0].is_discovered);
            assert!(!records[0].is_default);
            records[0].origin_path.clone()
        })
        .collect();
    assert!(react.iter().all(|spec| spec == "react"));

    assert_eq!(workspace.lookup("lodash")[0].origin_path, "lodash");
    assert_eq!(workspace.lookup("useForm")[0].origin_path, "react-hook-form");
    assert!(workspace.lookup("helper").is_empty());
    assert!(workspace.lookup("Deep").is_empty());

    Ok(())
}

#[tokio::test]
async fn test_package_rescan_replaces_previous_names() -> Result<()> {
    let harness = TestHarness::new()?;
    let entry = harness.create_test_file(
        "node_modules/ui/index.js",
        "import { Old } from 'ui-kit';\n",
    )?;

    let mut workspace = harness.scanned_workspace().await?;
    assert_eq!(workspace.lookup("Old").len(), 1);

    std::fs::write(&entry, "import { New } from 'ui-kit';\n")?;
    workspace.scan_packages().await?;

    assert!(workspace.lookup("Old").is_empty());
    assert_eq!(workspace.lookup("New").len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_rescanning_unchanged_file_is_stable() -> Result<()> {
    let harness = TestHarness::new()?;
    let file = harness.create_test_file(
        "lib.ts",
        "export const a = 1;\nexport default class Lib {}\n",
    )?;

    let scanner = ExportScanner::new(&harness.config.scanner)?;
    let mut index = SymbolIndex::new();
    scanner.scan_files(&mut index, vec![file.clone()]).await;
    let once = index.all();

    scanner.rescan_file(&mut index, &file).await;
    scanner.rescan_file(&mut index, &file).await;

    let mut twice = index.all();
    let mut once = once;
    once.sort_by(|a, b| a.name.cmp(&b.name));
    twice.sort_by(|a, b| a.name.cmp(&b.name));
    assert_eq!(once, twice);

    Ok(())
}

#[tokio::test]
async fn test_unreadable_files_do_not_abort_the_scan() -> Result<()> {
    let harness = TestHarness::new()?;
    let good = harness.create_test_file("good.js", "export const good = 1;")?;
    let missing = harness.path().join("missing.js");

    let scanner = ExportScanner::new(&harness.config.scanner)?;
    let mut index = SymbolIndex::new();
    let report = scanner.scan_files(&mut index, vec![missing, good]).await;

    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(index.lookup("good").len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_same_name_in_two_files_is_ambiguous() -> Result<()> {
    let harness = TestHarness::new()?;
    harness.create_test_file("a/format.js", "export function format() {}")?;
    harness.create_test_file("b/format.js", "export function format() {}")?;

    let mut workspace = harness.scanned_workspace().await?;
    assert!(matches!(workspace.resolve("format"), Resolution::Ambiguous(ref r) if r.len() == 2));

    workspace.file_deleted(&harness.path().join("a/format.js"));
    match workspace.resolve("format") {
        Resolution::Unique(record) => assert!(record.origin_path.ends_with("format.js")),
        other => panic!("expected unique, got {:?}", other),
    }

    Ok(())
}
