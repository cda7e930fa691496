mod file_finder;
mod tsconfig;

pub use file_finder::{DiscoveredFile, FileFinder, FileType};
pub use tsconfig::TsConfig;
