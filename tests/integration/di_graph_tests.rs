//! DI graph extraction over real project models

use deadwire::config::DiConfig;
use deadwire::di::{DiGraph, DiGraphBuilder, ResolutionKind};
use deadwire::ProjectModel;
use std::fs;
use tempfile::TempDir;

fn build(files: &[(&str, &str)]) -> (TempDir, DiGraph) {
    build_with(files, &DiConfig::default())
}

fn build_with(files: &[(&str, &str)], config: &DiConfig) -> (TempDir, DiGraph) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("tsconfig.json"), r#"{ "include": ["src"] }"#).unwrap();
    for (path, contents) in files {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, contents).unwrap();
    }

    let model = ProjectModel::load(&dir.path().join("tsconfig.json")).expect("Failed to load project");
    let graph = DiGraphBuilder::new(config).expect("Invalid DI config").build(&model);
    (dir, graph)
}

fn bindings(graph: &DiGraph) -> Vec<(&str, &str, usize)> {
    graph
        .bindings
        .iter()
        .map(|b| (b.token.as_str(), b.class_name.as_str(), b.line))
        .collect()
}

#[test]
fn test_fluent_chain_yields_one_binding() {
    let (_dir, graph) = build(&[(
        "src/di/registerServices.ts",
        r#"container.bind<Cache>(TOKENS.CACHE).to(MemoryCache).inSingletonScope();
container
    .bind(TOKENS.CLOCK)
    .to(SystemClock)
    .inTransientScope();
"#,
    )]);

    assert_eq!(
        bindings(&graph),
        vec![("CACHE", "MemoryCache", 1), ("CLOCK", "SystemClock", 2)]
    );
}

#[test]
fn test_first_binding_of_token_per_file_wins() {
    let (_dir, graph) = build(&[
        (
            "src/di/registerServices.ts",
            "container.bind(TOKENS.CACHE).to(MemoryCache);\ncontainer.bind(TOKENS.CACHE).to(DiskCache);\n",
        ),
        (
            "src/di/registerTesting.ts",
            "container.bind(TOKENS.CACHE).to(FakeCache);\n",
        ),
    ]);

    assert_eq!(
        bindings(&graph),
        vec![("CACHE", "MemoryCache", 1), ("CACHE", "FakeCache", 1)]
    );
}

#[test]
fn test_registrations_inside_callbacks_are_found() {
    let (_dir, graph) = build(&[(
        "src/di/registerPlugins.ts",
        r#"export function registerPlugins(container: Container) {
    container.load(new ContainerModule((bind) => {
        bind(TOKENS.PLUGIN_A).to(PluginA);
        bind(TOKENS.PLUGIN_B).to(PluginB);
    }));
}
"#,
    )]);

    assert_eq!(
        bindings(&graph),
        vec![("PLUGIN_A", "PluginA", 3), ("PLUGIN_B", "PluginB", 4)]
    );
}

#[test]
fn test_only_registration_files_bind() {
    let (_dir, graph) = build(&[
        ("src/app.ts", "container.bind(TOKENS.CACHE).to(MemoryCache);\n"),
        ("src/di/registerServices.ts", "container.bind(TOKENS.CLOCK).toSelf();\n"),
    ]);

    assert!(graph.bindings.is_empty());
}

#[test]
fn test_resolutions_in_offset_order() {
    let (_dir, graph) = build(&[(
        "src/consumer.ts",
        r#"export class Consumer {
    constructor(
        @multiInject(TOKENS.PLUGIN) private readonly plugins: Plugin[],
        @inject(TOKENS.CLOCK) private readonly clock: Clock,
    ) {}

    cache() {
        return container.get<Cache>(TOKENS.CACHE);
    }
}
"#,
    )]);

    let found: Vec<(&str, usize, ResolutionKind)> = graph
        .resolutions
        .iter()
        .map(|r| (r.token.as_str(), r.line, r.kind))
        .collect();
    assert_eq!(
        found,
        vec![
            ("PLUGIN", 3, ResolutionKind::MultiInject),
            ("CLOCK", 4, ResolutionKind::Inject),
            ("CACHE", 8, ResolutionKind::ContainerLookup),
        ]
    );
}

#[test]
fn test_custom_conventions() {
    let config = DiConfig {
        tokens_namespace: "TYPES".to_string(),
        container_names: vec!["ioc".to_string()],
        lookup_methods: vec!["resolve".to_string()],
        registration_pattern: r"wiring\.ts$".to_string(),
        ..DiConfig::default()
    };
    let (_dir, graph) = build_with(
        &[
            ("src/wiring.ts", "ioc.bind(TYPES.Mailer).to(SmtpMailer);\n"),
            ("src/app.ts", "const mailer = ioc.resolve(TYPES.Mailer);\nconst other = container.get(TOKENS.X);\n"),
        ],
        &config,
    );

    assert_eq!(bindings(&graph), vec![("Mailer", "SmtpMailer", 1)]);
    assert_eq!(graph.resolutions.len(), 1);
    assert_eq!(graph.resolutions[0].token, "Mailer");
}

#[test]
fn test_bound_and_resolved_token_sets() {
    let (_dir, graph) = build(&[
        ("src/di/registerServices.ts", "container.bind(TOKENS.CACHE).to(MemoryCache);\n"),
        ("src/app.ts", "const cache = container.get(TOKENS.CACHE);\nconst x = container.get(TOKENS.MISSING);\n"),
    ]);

    assert!(graph.bound_tokens().contains("CACHE"));
    assert!(graph.resolved_tokens().contains("MISSING"));
    assert!(!graph.bound_tokens().contains("MISSING"));
}
