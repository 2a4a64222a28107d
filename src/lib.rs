//! Front-matter parsing and loading for Markdown blog posts.
//!
//! [`parse`] turns one `+++`/`---` fenced document into a [`ContentEntry`].
//! [`loader`] walks a directory of posts and [`index`] builds a JSON listing
//! of what it found.

mod entry;
mod error;
mod fence;
mod fields;
pub mod index;
pub mod loader;
mod metadata;
mod parser;

pub use entry::{ContentEntry, Summary, SUMMARY_DIVIDER};
pub use error::{ErrorKind, FailureCause, LoadError, ParseError};
pub use parser::parse;
