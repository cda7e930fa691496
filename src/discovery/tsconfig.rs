use crate::error::ConfigurationError;
use serde::Deserialize;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Directories the compiler skips when `exclude` is not given
const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTsConfig {
    extends: Option<Extends>,
    files: Option<Vec<String>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    compiler_options: Option<RawCompilerOptions>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    allow_js: Option<bool>,
    out_dir: Option<String>,
}

/// One file of an `extends` chain, with paths made absolute against the
/// directory of the file that declared them.
#[derive(Debug, Default)]
struct Layer {
    files: Option<Vec<PathBuf>>,
    include: Option<Vec<String>>,
    exclude: Option<Vec<String>>,
    allow_js: Option<bool>,
    out_dir: Option<PathBuf>,
}

impl Layer {
    /// Fields set on `child` win
    fn merge(self, child: Layer) -> Layer {
        Layer {
            files: child.files.or(self.files),
            include: child.include.or(self.include),
            exclude: child.exclude.or(self.exclude),
            allow_js: child.allow_js.or(self.allow_js),
            out_dir: child.out_dir.or(self.out_dir),
        }
    }
}

/// A resolved `tsconfig.json`: which files make up the project
#[derive(Debug, Clone)]
pub struct TsConfig {
    /// Absolute path of the config file
    pub path: PathBuf,

    /// Directory containing the config file
    pub root: PathBuf,

    /// Explicit `files` entries (absolute)
    pub files: Vec<PathBuf>,

    /// Include globs (absolute)
    pub include: Vec<String>,

    /// Exclude globs (absolute)
    pub exclude: Vec<String>,

    /// `compilerOptions.allowJs`
    pub allow_js: bool,
}

impl TsConfig {
    /// Load a config file and everything it `extends`
    pub fn load(path: &Path) -> Result<Self, ConfigurationError> {
        let path = std::fs::canonicalize(path).map_err(|_| ConfigurationError::NotFound {
            path: path.to_path_buf(),
        })?;
        let root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let mut visiting = Vec::new();
        let layer = load_layer(&path, &mut visiting)?;

        let include = match (&layer.files, layer.include) {
            (_, Some(include)) => include,
            (Some(_), None) => Vec::new(),
            (None, None) => vec![absolute_pattern(&root, "**/*")],
        };

        let mut exclude = layer.exclude.unwrap_or_else(|| {
            DEFAULT_EXCLUDES
                .iter()
                .map(|dir| absolute_pattern(&root, dir))
                .collect()
        });
        if let Some(out_dir) = &layer.out_dir {
            exclude.push(directory_pattern(&escape_glob(&out_dir.to_string_lossy())));
        }

        Ok(Self {
            path,
            root,
            files: layer.files.unwrap_or_default(),
            include: include.into_iter().map(|p| expand_directory(&p)).collect(),
            exclude: exclude.into_iter().map(|p| expand_directory(&p)).collect(),
            allow_js: layer.allow_js.unwrap_or(false),
        })
    }

    /// Directories that have to be walked to find every included file
    pub fn walk_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = self.include.iter().map(|p| literal_prefix(p)).collect();
        roots.sort();
        roots.dedup();
        roots
    }
}

fn load_layer(path: &Path, visiting: &mut Vec<PathBuf>) -> Result<Layer, ConfigurationError> {
    if visiting.iter().any(|p| p == path) {
        return Err(ConfigurationError::ExtendsCycle {
            path: path.to_path_buf(),
        });
    }
    visiting.push(path.to_path_buf());

    let source = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = parse_tsconfig(&source).map_err(|e| ConfigurationError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let dir = path.parent().unwrap_or_else(|| Path::new("/"));

    let parents = match raw.extends {
        None => Vec::new(),
        Some(Extends::One(target)) => vec![target],
        Some(Extends::Many(targets)) => targets,
    };

    let mut base = Layer::default();
    for target in parents {
        let Some(parent_path) = resolve_extends(dir, &target)? else {
            debug!("Skipping package config `{}` extended by {}", target, path.display());
            continue;
        };
        base = base.merge(load_layer(&parent_path, visiting)?);
    }

    let options = raw.compiler_options.unwrap_or_default();
    let own = Layer {
        files: raw
            .files
            .map(|files| files.iter().map(|f| normalize(&dir.join(f))).collect()),
        include: raw
            .include
            .map(|patterns| patterns.iter().map(|p| absolute_pattern(dir, p)).collect()),
        exclude: raw
            .exclude
            .map(|patterns| patterns.iter().map(|p| absolute_pattern(dir, p)).collect()),
        allow_js: options.allow_js,
        out_dir: options.out_dir.map(|out| normalize(&dir.join(out))),
    };

    visiting.pop();
    Ok(base.merge(own))
}

/// Relative targets are files; anything else names a package
fn resolve_extends(dir: &Path, target: &str) -> Result<Option<PathBuf>, ConfigurationError> {
    let is_path = target.starts_with("./") || target.starts_with("../") || Path::new(target).is_absolute();
    if !is_path {
        return Ok(None);
    }

    let mut candidate = normalize(&dir.join(target));
    if !candidate.is_file() && candidate.extension().map_or(true, |ext| ext != "json") {
        candidate.as_mut_os_string().push(".json");
    }

    std::fs::canonicalize(&candidate)
        .map(Some)
        .map_err(|_| ConfigurationError::NotFound { path: candidate })
}

/// Parse JSON with comments and trailing commas
fn parse_tsconfig(source: &str) -> serde_json::Result<RawTsConfig> {
    let stripped = strip_jsonc(source.trim_start_matches('\u{feff}'));
    let normalized = remove_trailing_commas(&stripped);
    serde_json::from_str(&normalized)
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match (ch, chars.peek().copied()) {
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            ('/', Some('/')) => {
                // Keep the newline so serde_json positions stay meaningful
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut previous = '\0';
                for next in chars.by_ref() {
                    if next == '\n' {
                        out.push('\n');
                    }
                    if previous == '*' && next == '/' {
                        break;
                    }
                    previous = next;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
        } else if ch == ',' {
            let next = chars.clone().find(|c| !c.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                continue;
            }
        }

        out.push(ch);
    }

    out
}

/// Lexically resolve `.` and `..` without touching the filesystem
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Escape glob metacharacters in a literal path
fn escape_glob(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for ch in literal.chars() {
        match ch {
            '*' | '?' | '[' | ']' | '{' | '}' => {
                out.push('[');
                out.push(ch);
                out.push(']');
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Join a config-relative pattern onto the escaped config directory
fn absolute_pattern(dir: &Path, pattern: &str) -> String {
    let pattern = pattern.trim_start_matches("./");
    let (dots, rest) = split_parent_segments(pattern);
    let mut base = dir.to_path_buf();
    for _ in 0..dots {
        base.pop();
    }
    let base = escape_glob(&base.to_string_lossy());

    if rest.is_empty() {
        base
    } else {
        format!("{}/{}", base.trim_end_matches('/'), rest)
    }
}

/// `../../src/**` -> (2, "src/**")
fn split_parent_segments(pattern: &str) -> (usize, &str) {
    let mut dots = 0;
    let mut rest = pattern;
    while let Some(stripped) = rest.strip_prefix("../") {
        dots += 1;
        rest = stripped;
    }
    if rest == ".." {
        return (dots + 1, "");
    }
    (dots, rest)
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

fn directory_pattern(base: &str) -> String {
    format!("{}/**/*", base.trim_end_matches('/'))
}

/// A pattern whose last segment has no wildcard and no extension names a directory
fn expand_directory(pattern: &str) -> String {
    let last = pattern.rsplit('/').next().unwrap_or(pattern);
    if has_wildcard(last) || last.contains('.') {
        pattern.to_string()
    } else {
        directory_pattern(pattern)
    }
}

/// Leading path components before the first wildcard
fn literal_prefix(pattern: &str) -> PathBuf {
    let mut prefix = PathBuf::from("/");
    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        if has_wildcard(segment) || segment.contains('[') {
            break;
        }
        prefix.push(segment);
    }
    prefix
}
