//! Range-to-predicate synthesis for chunked, resumable table scans: the
//! chunk/bound model, the scan-key value comparator, and the SQL and BSON
//! predicate generators used by migration, backfill, and checksum tools.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod chunk;
pub mod config;
pub mod cursor;
pub mod error;
pub mod key;
pub mod predicate;
pub mod value;

///
/// Prelude
///
/// Prelude contains only scan vocabulary.
/// No errors, cursors, or configuration types are re-exported here.
///

pub mod prelude {
    pub use crate::{
        chunk::{Bound, Chunk, ScanRange, ValueMap},
        predicate::{ScanWhere, SqlDialect, scan_bson, scan_where_sql},
        value::Value,
    };
}
