mod common;
mod typescript;

pub use common::{descendants, node_text, ParseResult, Parser};
pub use typescript::TypeScriptParser;
