//! False-positive guards
//!
//! Code that is used through an indirect but legitimate mechanism must not
//! be reported:
//! 1. Aliased imports and destructuring
//! 2. Base classes and interfaces outside the project
//! 3. Object shorthand and callbacks
//! 4. Barrel files and registration modules themselves
//! 5. Declarations with syntax errors

use deadwire::{Config, DeadCodeAnalyzer, DeadCodeCategory, DeadCodeItem};
use std::fs;
use tempfile::TempDir;

fn analyze(files: &[(&str, &str)]) -> Vec<DeadCodeItem> {
    analyze_with(files, Config::default())
}

fn analyze_with(files: &[(&str, &str)], config: Config) -> Vec<DeadCodeItem> {
    let dir: TempDir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("tsconfig.json"), r#"{ "include": ["src", "tests"] }"#).unwrap();
    for (path, contents) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }

    DeadCodeAnalyzer::new(config)
        .expect("Failed to create analyzer")
        .analyze(&dir.path().join("tsconfig.json"))
        .expect("Analysis failed")
}

fn reported(items: &[DeadCodeItem], symbol: &str) -> bool {
    items.iter().any(|item| item.symbol == symbol)
}

// ============================================================================
// Aliases and destructuring
// ============================================================================

#[test]
fn test_aliased_import_counts_as_use() {
    let items = analyze(&[
        ("src/parser.ts", "export class Parser {}\n"),
        (
            "src/main.ts",
            "import { Parser as TsParser } from './parser';\nexport const parser = new TsParser();\n",
        ),
    ]);

    assert!(!reported(&items, "Parser"), "{:?}", items);
}

#[test]
fn test_destructured_method_counts_as_use() {
    let items = analyze(&[
        (
            "src/session.ts",
            "export class Session {\n    close() {}\n}\n",
        ),
        (
            "src/main.ts",
            "import { Session } from './session';\nconst { close } = new Session();\nclose();\n",
        ),
    ]);

    assert!(items.is_empty(), "{:?}", items);
}

// ============================================================================
// Insufficient evidence
// ============================================================================

#[test]
fn test_unknown_base_class_suppresses_protected_methods() {
    let items = analyze(&[
        (
            "src/component.ts",
            r#"import { Component } from 'framework';

export class Banner extends Component {
    protected render() {}
}
"#,
        ),
        ("src/main.ts", "import { Banner } from './component';\nnew Banner();\n"),
    ]);

    assert!(!reported(&items, "Banner.render"), "{:?}", items);
}

#[test]
fn test_unknown_interface_suppresses_all_methods() {
    let items = analyze(&[
        (
            "src/hooks.ts",
            r#"import { OnInit, OnDestroy } from 'framework';

export class Panel implements OnInit, OnDestroy {
    ngOnInit() {}
    ngOnDestroy() {}
}
"#,
        ),
        ("src/main.ts", "import { Panel } from './hooks';\nnew Panel();\n"),
    ]);

    assert!(items.is_empty(), "{:?}", items);
}

#[test]
fn test_public_method_named_like_abstract_is_still_checked() {
    let items = analyze(&[
        (
            "src/jobs.ts",
            r#"export abstract class Job {
    start() {
        this.execute();
    }

    protected abstract execute(): void;
}

export class CleanupJob extends Job {
    protected execute() {}
    purge() {}
}
"#,
        ),
        ("src/main.ts", "import { CleanupJob } from './jobs';\nnew CleanupJob().start();\n"),
    ]);

    let methods: Vec<&str> = items
        .iter()
        .filter(|item| item.category == DeadCodeCategory::DeadMethod)
        .map(|item| item.symbol.as_str())
        .collect();
    assert_eq!(methods, vec!["CleanupJob.purge"]);
}

// ============================================================================
// Values passed around
// ============================================================================

#[test]
fn test_object_shorthand_counts_as_use() {
    let items = analyze(&[
        ("src/handlers.ts", "export function onSave() {}\n"),
        (
            "src/routes.ts",
            "import { onSave } from './handlers';\nexport const routes = { onSave };\n",
        ),
    ]);
    let mut config = Config::default();
    config.detection.dead_functions = true;
    let with_functions = analyze_with(
        &[
            ("src/handlers.ts", "export function onSave() {}\n"),
            (
                "src/routes.ts",
                "import { onSave } from './handlers';\nexport const routes = { onSave };\n",
            ),
        ],
        config,
    );

    assert!(items.is_empty());
    assert!(with_functions.is_empty(), "{:?}", with_functions);
}

#[test]
fn test_class_passed_as_value_counts_as_use() {
    let items = analyze(&[
        ("src/strategy.ts", "export class RetryStrategy {}\n"),
        (
            "src/main.ts",
            "import { RetryStrategy } from './strategy';\nexport const strategies = [RetryStrategy];\n",
        ),
    ]);

    assert!(items.is_empty(), "{:?}", items);
}

// ============================================================================
// Out of scope files
// ============================================================================

#[test]
fn test_barrel_and_registration_files_are_not_analyzed() {
    let items = analyze(&[
        ("src/index.ts", "export class Facade {}\n"),
        (
            "src/di/registerServices.ts",
            "export class LocalModule {}\n",
        ),
    ]);

    assert!(items.is_empty(), "{:?}", items);
}

#[test]
fn test_generated_and_non_source_files_are_not_analyzed() {
    let items = analyze(&[
        ("src/generated/client.ts", "export class ApiClient {}\n"),
        ("tests/fixtures.ts", "export class Fixture {}\n"),
    ]);

    assert!(items.is_empty(), "{:?}", items);
}

#[test]
fn test_exempt_multi_inject_token_not_unresolved() {
    let items = analyze(&[(
        "src/di/registerDiagnostics.ts",
        "container.bind(TOKENS.DIAGNOSTIC_INTEGRATION).to(SentryIntegration);\n",
    )]);

    assert!(items.is_empty(), "{:?}", items);
}

#[test]
fn test_malformed_declaration_is_skipped() {
    let items = analyze(&[(
        "src/broken.ts",
        "export class Broken {\n    run() { let x = ; }\n}\n",
    )]);

    assert!(!reported(&items, "Broken"), "{:?}", items);
    assert!(!reported(&items, "Broken.run"), "{:?}", items);
}
