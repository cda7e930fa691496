//! End-to-end analysis scenarios
//!
//! Each test writes a small TypeScript project into a temp directory and
//! runs the full pipeline over it.

use deadwire::{Config, DeadCodeAnalyzer, DeadCodeCategory, DeadCodeItem};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TOKENS_SOURCE: &str = r#"export const TOKENS = {
    FOO: Symbol.for('FOO'),
    BAR: Symbol.for('BAR'),
    LOGGER: Symbol.for('LOGGER'),
};
"#;

fn project(files: &[(&str, &str)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(
        dir.path().join("tsconfig.json"),
        r#"{
    // project sources and their tests
    "compilerOptions": { "strict": true, },
    "include": ["src", "tests"],
}"#,
    )
    .expect("Failed to write tsconfig");

    for (path, contents) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).expect("Failed to write source");
    }

    let config_path = dir.path().join("tsconfig.json");
    (dir, config_path)
}

fn analyze(config_path: &Path, config: Config) -> Vec<DeadCodeItem> {
    DeadCodeAnalyzer::new(config)
        .expect("Failed to create analyzer")
        .analyze(config_path)
        .expect("Analysis failed")
}

fn of_category(items: &[DeadCodeItem], category: DeadCodeCategory) -> Vec<&DeadCodeItem> {
    items.iter().filter(|item| item.category == category).collect()
}

fn symbols(items: &[DeadCodeItem]) -> Vec<(DeadCodeCategory, &str)> {
    items
        .iter()
        .map(|item| (item.category, item.symbol.as_str()))
        .collect()
}

fn file_name(item: &DeadCodeItem) -> &str {
    item.file.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn scenario_a() -> (TempDir, PathBuf) {
    project(&[
        ("src/di/tokens.ts", TOKENS_SOURCE),
        (
            "src/di/registerServices.ts",
            r#"import { container } from './container';
import { TOKENS } from './tokens';
import { Widget } from '../widget';

container.bind(TOKENS.FOO).to(Widget);
"#,
        ),
        ("src/widget.ts", "export class Widget {\n    render() {}\n}\n"),
    ])
}

#[test]
fn test_scenario_a_unresolved_token() {
    let (_dir, config_path) = scenario_a();
    let items = analyze(&config_path, Config::default());

    let unresolved = of_category(&items, DeadCodeCategory::UnresolvedDiToken);
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].symbol, "TOKENS.FOO");
    assert_eq!(file_name(unresolved[0]), "registerServices.ts");
    assert_eq!(unresolved[0].line, 5);
    assert_eq!(unresolved[0].column, 1);
    assert_eq!(
        unresolved[0].detail.as_deref(),
        Some("TOKENS.FOO → Widget (bound but never resolved)")
    );

    // `.to(Widget)` in the registration module is a call-site by default
    assert!(of_category(&items, DeadCodeCategory::DeadClass).is_empty());
}

#[test]
fn test_scenario_a_dead_class_with_orphan_discount() {
    let (_dir, config_path) = scenario_a();
    let mut config = Config::default();
    config.di.discount_orphaned_registrations = true;
    let items = analyze(&config_path, config);

    let dead = of_category(&items, DeadCodeCategory::DeadClass);
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0].symbol, "Widget");
    assert_eq!(file_name(dead[0]), "widget.ts");
    assert_eq!(
        dead[0].detail.as_deref(),
        Some("Widget (bound to unresolved DI token TOKENS.FOO, zero call-sites)")
    );

    // Members of a dead class are not reported again
    assert!(of_category(&items, DeadCodeCategory::DeadMethod).is_empty());
}

#[test]
fn test_scenario_b_phantom_token_reported_once() {
    let (_dir, config_path) = project(&[
        ("src/di/tokens.ts", TOKENS_SOURCE),
        (
            "src/consumer.ts",
            r#"import { inject } from 'inversify';
import { TOKENS } from './di/tokens';

export class Consumer {
    constructor(@inject(TOKENS.BAR) private readonly bar: unknown) {}
}
"#,
        ),
        (
            "src/other.ts",
            r#"import { inject } from 'inversify';
import { TOKENS } from './di/tokens';

export class Other {
    constructor(@inject(TOKENS.BAR) private readonly bar: unknown) {}
}
"#,
        ),
    ]);
    let items = analyze(&config_path, Config::default());

    let phantom = of_category(&items, DeadCodeCategory::PhantomToken);
    assert_eq!(phantom.len(), 1);
    assert_eq!(phantom[0].symbol, "TOKENS.BAR");
    assert_eq!(file_name(phantom[0]), "consumer.ts");
    assert_eq!(phantom[0].line, 5);
    assert_eq!(
        phantom[0].detail.as_deref(),
        Some("TOKENS.BAR (referenced but never bound)")
    );
}

#[test]
fn test_scenario_c_method_used_only_by_tests() {
    let (_dir, config_path) = project(&[
        ("src/helper.ts", "export class Helper {\n    run(): void {}\n}\n"),
        (
            "src/main.ts",
            "import { Helper } from './helper';\nexport const helper = new Helper();\n",
        ),
        (
            "tests/helper.test.ts",
            "import { Helper } from '../src/helper';\nnew Helper().run();\n",
        ),
    ]);
    let items = analyze(&config_path, Config::default());

    assert_eq!(symbols(&items), vec![(DeadCodeCategory::DeadMethod, "Helper.run")]);
    assert_eq!(file_name(&items[0]), "helper.ts");
    assert_eq!(items[0].line, 2);
}

#[test]
fn test_scenario_d_interface_method_never_called() {
    let (_dir, config_path) = project(&[
        (
            "src/logger.ts",
            r#"export interface Logger {
    warn(message: string): void;
    info(message: string): void;
}

export class ConsoleLogger implements Logger {
    warn(message: string) {
        console.log(message);
    }

    info(message: string) {
        console.log(message);
    }
}
"#,
        ),
        (
            "src/main.ts",
            "import { ConsoleLogger } from './logger';\nconst logger = new ConsoleLogger();\nlogger.info('ready');\n",
        ),
    ]);
    let items = analyze(&config_path, Config::default());

    assert_eq!(
        symbols(&items),
        vec![(DeadCodeCategory::DeadInterfaceMethod, "Logger.warn")]
    );
    assert_eq!(items[0].line, 2);
}

#[test]
fn test_scenario_d_global_console_call_is_not_a_use() {
    let (_dir, config_path) = project(&[
        (
            "src/logger.ts",
            "export interface Logger {\n    warn(message: string): void;\n}\n",
        ),
        ("src/main.ts", "console.warn('boot');\n"),
    ]);
    let items = analyze(&config_path, Config::default());

    assert_eq!(
        symbols(&items),
        vec![(DeadCodeCategory::DeadInterfaceMethod, "Logger.warn")]
    );
}

#[test]
fn test_resolved_bindings_are_quiet() {
    let (_dir, config_path) = project(&[
        ("src/di/tokens.ts", TOKENS_SOURCE),
        (
            "src/di/registerServices.ts",
            r#"import { container } from './container';
import { TOKENS } from './tokens';
import { FileLogger } from '../fileLogger';

container.bind(TOKENS.LOGGER).to(FileLogger).inSingletonScope();
"#,
        ),
        ("src/fileLogger.ts", "export class FileLogger {}\n"),
        (
            "src/app.ts",
            r#"import { container } from './di/container';
import { TOKENS } from './di/tokens';

const logger = container.get<unknown>(TOKENS.LOGGER);
"#,
        ),
    ]);
    let items = analyze(&config_path, Config::default());

    assert!(items.is_empty(), "unexpected findings: {:?}", symbols(&items));
}

#[test]
fn test_analysis_is_idempotent() {
    let (_dir, config_path) = scenario_a();
    let analyzer = DeadCodeAnalyzer::new(Config::default()).unwrap();

    let first = analyzer.analyze(&config_path).unwrap();
    let second = analyzer.analyze(&config_path).unwrap();
    let fresh = analyze(&config_path, Config::default());

    assert_eq!(first, second);
    assert_eq!(first, fresh);
}

#[test]
fn test_allowlisted_classes_and_files_never_reported() {
    let (_dir, config_path) = project(&[
        ("src/widget.ts", "export class Widget {}\nexport class FancyWidget {}\n"),
        ("src/legacy/old.ts", "export class Old {\n    unused() {}\n}\n"),
        ("src/kept.ts", "export class Kept {}\n"),
    ]);

    let mut config = Config::default();
    config.allowlist.classes = vec!["*Widget".to_string()];
    config.allowlist.files = vec!["src/legacy/**".to_string()];
    let items = analyze(&config_path, config);

    assert_eq!(symbols(&items), vec![(DeadCodeCategory::DeadClass, "Kept")]);
}

#[test]
fn test_allowlisted_files_hide_di_findings() {
    let (_dir, config_path) = project(&[
        ("src/di/tokens.ts", TOKENS_SOURCE),
        (
            "src/legacy/registerLegacy.ts",
            r#"import { container } from '../di/container';
import { TOKENS } from '../di/tokens';
import { LegacyService } from './service';

container.bind(TOKENS.FOO).to(LegacyService);
"#,
        ),
        ("src/legacy/service.ts", "export class LegacyService {}\n"),
        (
            "src/legacy/consumer.ts",
            r#"import { inject } from 'inversify';
import { TOKENS } from '../di/tokens';

export class LegacyConsumer {
    constructor(@inject(TOKENS.BAR) private readonly bar: unknown) {}
}
"#,
        ),
    ]);

    let default_items = analyze(&config_path, Config::default());
    assert_eq!(of_category(&default_items, DeadCodeCategory::UnresolvedDiToken).len(), 1);
    assert_eq!(of_category(&default_items, DeadCodeCategory::PhantomToken).len(), 1);

    let mut config = Config::default();
    config.allowlist.files = vec!["src/legacy/**".to_string()];
    config.di.discount_orphaned_registrations = true;
    let items = analyze(&config_path, config);

    assert!(
        items.iter().all(|item| !item.file.to_string_lossy().contains("legacy")),
        "allowlisted files reported: {:?}",
        symbols(&items)
    );
    assert!(of_category(&items, DeadCodeCategory::UnresolvedDiToken).is_empty());
    assert!(of_category(&items, DeadCodeCategory::PhantomToken).is_empty());
}

#[test]
fn test_protected_abstract_override_not_reported() {
    let (_dir, config_path) = project(&[
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
}
"#,
        ),
        (
            "src/main.ts",
            "import { CleanupJob } from './jobs';\nnew CleanupJob().start();\n",
        ),
    ]);
    let items = analyze(&config_path, Config::default());

    assert!(of_category(&items, DeadCodeCategory::DeadMethod).is_empty());
}

#[test]
fn test_interface_implementation_through_inheritance_not_reported() {
    let (_dir, config_path) = project(&[
        (
            "src/disposable.ts",
            "export interface Disposable {\n    dispose(): void;\n}\n",
        ),
        (
            "src/service.ts",
            r#"import { Disposable } from './disposable';

export interface Service extends Disposable {
    start(): void;
}

export class HttpService implements Service {
    start() {}
    dispose() {}
}
"#,
        ),
        (
            "src/main.ts",
            r#"import { HttpService } from './service';
const service = new HttpService();
service.start();
service.dispose();
"#,
        ),
    ]);
    let items = analyze(&config_path, Config::default());

    assert!(items.is_empty(), "unexpected findings: {:?}", symbols(&items));
}

#[test]
fn test_findings_follow_pass_order() {
    let (_dir, config_path) = project(&[
        ("src/di/tokens.ts", TOKENS_SOURCE),
        (
            "src/di/registerServices.ts",
            "import { container } from './container';\nimport { TOKENS } from './tokens';\ncontainer.bind(TOKENS.FOO).to(Widget);\n",
        ),
        ("src/a.ts", "export class Alpha {}\n"),
        (
            "src/b.ts",
            r#"import { inject } from 'inversify';
import { TOKENS } from './di/tokens';
export class Beta {
    constructor(@inject(TOKENS.BAR) private readonly bar: unknown) {}
    idle() {}
}
export function boot(beta: Beta) {
    beta.toString();
}
"#,
        ),
        ("src/main.ts", "import { Beta, boot } from './b';\nboot(new Beta());\n"),
    ]);
    let items = analyze(&config_path, Config::default());

    assert_eq!(
        symbols(&items),
        vec![
            (DeadCodeCategory::UnresolvedDiToken, "TOKENS.FOO"),
            (DeadCodeCategory::PhantomToken, "TOKENS.BAR"),
            (DeadCodeCategory::DeadClass, "Alpha"),
            (DeadCodeCategory::DeadMethod, "Beta.idle"),
        ]
    );
}
