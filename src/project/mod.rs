//! The parsed, indexed view of a TypeScript project.

mod loader;

pub use loader::ProjectLoader;

use crate::discovery::{DiscoveredFile, FileFinder, FileType, TsConfig};
use crate::error::{ConfigurationError, SymbolAnalysisError};
use crate::graph::{Declaration, GraphBuilder, Reference, ReferenceIndex, SymbolGraph};
use crate::parser::{ParseResult, Parser, TypeScriptParser};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A parsed project file
#[derive(Debug)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Type of source file
    pub file_type: FileType,

    /// The tree contains syntax errors
    pub has_errors: bool,

    text: String,
    tree: tree_sitter::Tree,
}

impl SourceFile {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn tree(&self) -> &tree_sitter::Tree {
        &self.tree
    }
}

/// Immutable snapshot of a project: files, declarations and occurrences
#[derive(Debug)]
pub struct ProjectModel {
    config_path: PathBuf,
    root: PathBuf,
    files: Vec<SourceFile>,
    file_index: HashMap<PathBuf, usize>,
    graph: SymbolGraph,
    references: ReferenceIndex,
}

impl ProjectModel {
    /// Resolve a tsconfig, discover its files and parse them
    pub fn load(config_path: &Path) -> Result<Self, ConfigurationError> {
        let config = TsConfig::load(config_path)?;
        let files = FileFinder::new(&config).find_files()?;

        info!(
            "Loading project {} ({} files)",
            config.path.display(),
            files.len()
        );

        Ok(Self::from_files(config.path.clone(), config.root.clone(), &files))
    }

    /// Parse files in parallel; unreadable files are skipped
    pub fn from_files(config_path: PathBuf, root: PathBuf, files: &[DiscoveredFile]) -> Self {
        let parser = TypeScriptParser::new();

        let parsed: Vec<Option<(DiscoveredFile, String, ParseResult)>> = files
            .par_iter()
            .map(|file| {
                let text = match std::fs::read_to_string(&file.path) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Skipping unreadable file {}: {}", file.path.display(), e);
                        return None;
                    }
                };
                match parser.parse(&file.path, &text) {
                    Ok(result) => Some((file.clone(), text, result)),
                    Err(e) => {
                        warn!("Skipping unparsable file {}: {}", file.path.display(), e);
                        None
                    }
                }
            })
            .collect();

        let mut builder = GraphBuilder::new();
        let mut source_files = Vec::with_capacity(parsed.len());
        for (file, text, result) in parsed.into_iter().flatten() {
            if result.has_errors {
                debug!("Syntax errors in {}", file.path.display());
            }
            let has_errors = result.has_errors;
            let tree = builder.add_parsed(result);
            source_files.push(SourceFile {
                path: file.path,
                file_type: file.file_type,
                has_errors,
                text,
                tree,
            });
        }

        let (graph, references) = builder.build();
        let file_index = source_files
            .iter()
            .enumerate()
            .map(|(i, f)| (f.path.clone(), i))
            .collect();

        info!(
            "Project model ready: {} files, {} declarations",
            source_files.len(),
            graph.declaration_count()
        );

        Self {
            config_path,
            root,
            files: source_files,
            file_index,
            graph,
            references,
        }
    }

    /// Files in discovery order
    pub fn source_files(&self) -> &[SourceFile] {
        &self.files
    }

    pub fn file(&self, path: &Path) -> Option<&SourceFile> {
        self.file_index.get(path).map(|&i| &self.files[i])
    }

    pub fn full_text<'a>(&self, file: &'a SourceFile) -> &'a str {
        file.text()
    }

    pub fn graph(&self) -> &SymbolGraph {
        &self.graph
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Directory containing the tsconfig
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path relative to the project root (unchanged when outside it)
    pub fn relative_path<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    /// Every occurrence that may refer to `decl`, its own name included
    pub fn find_references(&self, decl: &Declaration) -> Result<Vec<Reference>, SymbolAnalysisError> {
        if decl.malformed {
            return Err(SymbolAnalysisError::Malformed {
                name: decl.qualified_name.clone(),
                file: decl.location.file.clone(),
                line: decl.location.line,
            });
        }
        if !self.file_index.contains_key(&decl.id.file) {
            return Err(SymbolAnalysisError::UnknownFile {
                name: decl.qualified_name.clone(),
                file: decl.id.file.clone(),
            });
        }

        Ok(self.references.references_to(decl))
    }
}
