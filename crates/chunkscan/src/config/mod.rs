
use crate::{
    cursor::{ChunkSlice, ScanCheckpoint, ScanCursor},
    error::Error,
    key::duplicate_column,
    predicate::{ScanWhere, SqlDialect},
};
use ::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("scan config parse error: {0}")]
    Parse(String),

    #[error("scan_columns must not be empty")]
    EmptyScanColumns,

    #[error("scan column '{column}' is listed more than once")]
    DuplicateScanColumn { column: String },

    #[error("scan column names must not be empty")]
    EmptyColumnName,

    #[error("document_filter is not a valid extended-JSON document: {0}")]
    DocumentFilter(String),
}

///
/// ScanConfig
///
/// Per-table scan settings: the scan key, identifier dialect, and the
/// optional extra filters ANDed into every slice predicate.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScanConfig {
    pub scan_columns: Vec<String>,

    #[serde(default)]
    pub dialect: SqlDialect,

    /// Extra SQL expression, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    /// Extra document filter, as an extended-JSON object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_filter: Option<serde_json::Map<String, serde_json::Value>>,
}

impl ScanConfig {
    #[must_use]
    pub const fn new(scan_columns: Vec<String>) -> Self {
        Self {
            scan_columns,
            dialect: SqlDialect::Mysql,
            filter: None,
            document_filter: None,
        }
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;

        tracing::debug!(
            scan_columns = ?config.scan_columns,
            dialect = ?config.dialect,
            filter = config.filter.is_some(),
            document_filter = config.document_filter.is_some(),
            "scan config loaded"
        );

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan_columns.is_empty() {
            return Err(ConfigError::EmptyScanColumns);
        }
        if self.scan_columns.iter().any(|column| column.trim().is_empty()) {
            return Err(ConfigError::EmptyColumnName);
        }
        if let Some(column) = duplicate_column(&self.scan_columns) {
            return Err(ConfigError::DuplicateScanColumn {
                column: column.to_string(),
            });
        }
        self.document_filter()?;

        Ok(())
    }

    /// The document filter as BSON; `$oid`, `$date` and the other
    /// extended-JSON wrappers become typed values.
    pub fn document_filter(&self) -> Result<Option<Document>, ConfigError> {
        let Some(map) = &self.document_filter else {
            return Ok(None);
        };

        match Bson::try_from(serde_json::Value::Object(map.clone())) {
            Ok(Bson::Document(doc)) => Ok(Some(doc)),
            Ok(other) => Err(ConfigError::DocumentFilter(format!(
                "expected a document, found {:?}",
                other.element_type()
            ))),
            Err(err) => Err(ConfigError::DocumentFilter(err.to_string())),
        }
    }

    /// Cursor over this config's scan key, fresh or resumed from `checkpoint`.
    pub fn cursor(&self, checkpoint: Option<&ScanCheckpoint>) -> Result<ScanCursor, Error> {
        self.validate()?;

        let columns = self.scan_columns.clone();
        let cursor = match checkpoint {
            Some(checkpoint) => ScanCursor::restore(columns, checkpoint)?,
            None => ScanCursor::new(columns)?,
        };

        Ok(cursor)
    }

    /// SQL predicate for `slice` with this config's dialect and filter.
    #[must_use]
    pub fn where_sql(&self, slice: &ChunkSlice) -> ScanWhere {
        slice.where_sql(self.dialect, self.filter.as_deref())
    }

    /// Filter document for `slice` with this config's document filter.
    pub fn filter(&self, slice: &ChunkSlice) -> Result<Document, ConfigError> {
        let extra = self.document_filter()?;

        Ok(slice.filter(extra.as_ref()))
    }
}
