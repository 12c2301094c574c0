//! Chunk-to-predicate synthesis.
//!
//! A chunk is first planned into backend-neutral terms (`plan`), then
//! rendered either as a parameterized SQL fragment (`sql`) or as a MongoDB
//! filter document (`document`).

mod document;
mod paren;
mod plan;
mod sql;

#[cfg(test)]
mod tests;

// re-exports
pub use document::scan_bson;
pub use paren::remove_redundant_parentheses;
pub use plan::{CmpOp, Conjunction, ScanPlan, Term, plan};
pub use sql::{ScanWhere, SqlDialect, scan_where_sql, scan_where_sql_with};
