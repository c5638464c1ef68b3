//! Variable environment, placeholder substitution, and response extraction.

pub mod dynamic;
pub mod environment;
pub mod extract;
pub mod substitution;

pub use dynamic::resolve_dynamic;
pub use environment::{VarValue, VariableEnvironment};
pub use extract::{capture, extract_path, ExtractError};
pub use substitution::{resolve_template, substitute};
