use super::TsConfig;
use crate::error::ConfigurationError;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Type of source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    /// `.ts`, `.mts`, `.cts`
    TypeScript,
    /// `.tsx`
    Tsx,
    /// `.js`, `.jsx`, `.mjs`, `.cjs` (only with `allowJs`)
    JavaScript,
}

impl FileType {
    /// Determine file type from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension {
            "ts" | "mts" | "cts" => Some(FileType::TypeScript),
            "tsx" => Some(FileType::Tsx),
            "js" | "jsx" | "mjs" | "cjs" => Some(FileType::JavaScript),
            _ => None,
        }
    }

    /// `.d.ts` and friends only describe types
    pub fn is_declaration_file(path: &Path) -> bool {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        [".d.ts", ".d.mts", ".d.cts"]
            .iter()
            .any(|suffix| file_name.ends_with(suffix))
    }
}

/// A file that belongs to the project
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Type of source file
    pub file_type: FileType,
}

/// File finder for discovering the source files of a tsconfig project
pub struct FileFinder<'a> {
    config: &'a TsConfig,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a TsConfig) -> Self {
        Self { config }
    }

    /// Find all project files, sorted and de-duplicated
    pub fn find_files(&self) -> Result<Vec<DiscoveredFile>, ConfigurationError> {
        let include = compile_globs(&self.config.include)?;
        let exclude = compile_globs(&self.config.exclude)?;

        let mut files = Vec::new();
        for root in self.config.walk_roots() {
            if !root.exists() {
                trace!("Include root does not exist: {}", root.display());
                continue;
            }
            debug!("Scanning for files in: {}", root.display());
            files.extend(self.scan_directory(&root, &include, &exclude));
        }

        for explicit in &self.config.files {
            if let Some(file) = self.accept(explicit) {
                files.push(file);
            } else {
                debug!("Skipping listed file: {}", explicit.display());
            }
        }

        files.sort();
        files.dedup_by(|a, b| a.path == b.path);

        debug!("Found {} files", files.len());
        Ok(files)
    }

    /// Scan a single directory for source files
    fn scan_directory(&self, dir: &Path, include: &GlobSet, exclude: &GlobSet) -> Vec<DiscoveredFile> {
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .hidden(true) // Skip hidden files
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        walker
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let path = entry.path();

                if !include.is_match(path) {
                    return None;
                }
                if exclude.is_match(path) {
                    trace!("Excluding: {}", path.display());
                    return None;
                }

                self.accept(path)
            })
            .collect()
    }

    /// Extension, declaration-file and `node_modules` checks
    fn accept(&self, path: &Path) -> Option<DiscoveredFile> {
        let file_type = FileType::from_path(path)?;
        if file_type == FileType::JavaScript && !self.config.allow_js {
            return None;
        }
        if FileType::is_declaration_file(path) {
            return None;
        }
        if path.components().any(|c| c.as_os_str() == "node_modules") {
            return None;
        }
        if !path.is_file() {
            return None;
        }

        trace!("Found {:?}: {}", file_type, path.display());
        Some(DiscoveredFile {
            path: path.to_path_buf(),
            file_type,
        })
    }
}

fn compile_globs(patterns: &[String]) -> Result<GlobSet, ConfigurationError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ConfigurationError::InvalidPattern {
                pattern: pattern.clone(),
                message: e.to_string(),
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigurationError::InvalidPattern {
        pattern: patterns.join(", "),
        message: e.to_string(),
    })
}
