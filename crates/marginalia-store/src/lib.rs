//! Storage, statistics and export for bookmark collections

mod error;
mod io;
pub mod markdown;
mod paths;
mod stats;
mod store;

pub use error::{Result, StoreError};
pub use io::{atomic_write, read_json, write_json};
pub use paths::{Paths, DATA_DIR_NAME};
pub use stats::{AuthorTally, CollectionStats};
pub use store::{load_records, parse_records, BookmarkStore};
