//! Command implementations for the lore CLI
//!
//! Each command lives in its own submodule and exposes an `execute` function.

mod index;
mod patterns;
mod process;
mod related;
mod search;
mod toc;
mod vocab;

pub use index::execute as build_index;
pub use patterns::execute as find_patterns;
pub use process::execute as process_document;
pub use related::execute as find_related;
pub use search::execute as search;
pub use toc::execute as show_toc;
pub use vocab::execute as detect_vocabulary;
