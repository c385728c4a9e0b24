//! Datasource key parsing.
//!
//! Form data refers to the dataset a chart reads from as a composite key
//! `"{id}__{type}"`, e.g. `1__table`. [`DatasourceKey::parse`] splits and
//! validates the key; [`fmt::Display`] renders the composite form back.

use crate::error::{ExploreError, ExploreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of datasource a chart reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasourceType {
    /// A physical or virtual dataset.
    Table,
    /// An ad-hoc SQL query.
    Query,
}

impl DatasourceType {
    /// The wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasourceType::Table => "table",
            DatasourceType::Query => "query",
        }
    }
}

impl fmt::Display for DatasourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed datasource key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasourceKey {
    /// Numeric datasource id.
    pub id: i64,
    /// Datasource kind.
    pub kind: DatasourceType,
}

impl DatasourceKey {
    /// Parse a composite key of the form `"{id}__{type}"`.
    pub fn parse(s: &str) -> ExploreResult<Self> {
        if s.is_empty() {
            return Err(ExploreError::validation("Datasource key cannot be empty"));
        }
        let Some((id, kind)) = s.split_once("__") else {
            return Err(ExploreError::validation(format!(
                "Datasource key '{s}' is missing the '__' separator"
            )));
        };
        let id = id.parse::<i64>().map_err(|_| {
            ExploreError::validation(format!("Datasource id '{id}' is not an integer"))
        })?;
        let kind = match kind {
            "table" => DatasourceType::Table,
            "query" => DatasourceType::Query,
            other => {
                return Err(ExploreError::validation(format!(
                    "Unknown datasource type '{other}'"
                )));
            }
        };
        Ok(Self { id, kind })
    }
}

impl fmt::Display for DatasourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}__{}", self.id, self.kind)
    }
}
