//! teddy: find things in nested JSON.
//!
//! [`search`](search::search) walks a document by key or value and reports
//! every hit with its [`KeyPath`](path::KeyPath). [`records`] builds record
//! lookups on top of it. The remaining modules are the loading, config and
//! logging plumbing plus a couple of small text helpers.

pub mod bytes;
pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod path;
pub mod records;
pub mod search;
pub mod state;
pub mod text;
pub mod tree;
pub mod types;

pub use error::{Error, Result};
pub use path::{KeyPath, PathSegment};
pub use records::{filter_objects, get_info};
pub use search::{search, search_all, search_page};
pub use types::{Match, OwnedMatch, Query, SearchResponse};
