pub mod config;
pub mod error;
pub mod index;
pub mod intersect;
pub mod persist;
pub mod posting;
pub mod shared;
pub mod skip;
pub mod tokenizer;

pub use config::{IndexConfig, SkipStride};
pub use error::{IndexError, Result};
pub use index::{DocumentRecord, Index, Metadata, Stats};
pub use intersect::{intersect, intersect_naive};
pub use posting::{Posting, PostingList};
pub use shared::SharedIndex;
pub use skip::{build_skip_table, SkipTable};

pub type DocId = u32;
/// Zero-based token offset within a document.
pub type Position = u32;
