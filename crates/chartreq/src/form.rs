//! Chart form data.

use crate::datasource::DatasourceKey;
use crate::error::{ExploreError, ExploreResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The form state a chart submits: the datasource it reads from, the
/// visualization type, and every other control the explore UI sets.
///
/// Controls the toolkit does not interpret are kept verbatim in `extra`
/// and travel with the form through serialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormData {
    /// Composite datasource key, e.g. `"1__table"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasource: Option<String>,

    /// Visualization type keying the chart metadata registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viz_type: Option<String>,

    /// Saved-chart id, when the form belongs to a saved chart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice_id: Option<i64>,

    /// Any other control set by the chart UI.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FormData {
    /// Create form data for a datasource.
    pub fn new(datasource: impl Into<String>) -> Self {
        Self {
            datasource: Some(datasource.into()),
            ..Self::default()
        }
    }

    /// Set the visualization type.
    pub fn viz_type(mut self, viz_type: impl Into<String>) -> Self {
        self.viz_type = Some(viz_type.into());
        self
    }

    /// Set the saved-chart id.
    pub fn slice_id(mut self, slice_id: i64) -> Self {
        self.slice_id = Some(slice_id);
        self
    }

    /// Set an uninterpreted control.
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Parse the composite datasource key.
    ///
    /// Returns [`ExploreError::MissingDatasource`] when the form has no
    /// datasource at all.
    pub fn datasource_key(&self) -> ExploreResult<DatasourceKey> {
        let key = self
            .datasource
            .as_deref()
            .ok_or(ExploreError::MissingDatasource)?;
        DatasourceKey::parse(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::DatasourceType;
    use serde_json::json;

    #[test]
    fn datasource_key_parses() {
        let form = FormData::new("1__table");
        let key = form.datasource_key().unwrap();
        assert_eq!(key.id, 1);
        assert_eq!(key.kind, DatasourceType::Table);
    }

    #[test]
    fn datasource_key_missing() {
        let form = FormData::default();
        assert!(form.datasource_key().unwrap_err().is_missing_datasource());
    }

    #[test]
    fn extra_controls_flatten_into_json() {
        let form = FormData::new("1__table")
            .viz_type("table")
            .with("row_limit", json!(100));
        let value = serde_json::to_value(&form).unwrap();
        assert_eq!(value["datasource"], json!("1__table"));
        assert_eq!(value["viz_type"], json!("table"));
        assert_eq!(value["row_limit"], json!(100));
        // absent optionals are skipped, not null
        assert!(value.get("slice_id").is_none());
    }

    #[test]
    fn deserialize_keeps_unknown_controls() {
        let form: FormData = serde_json::from_value(json!({
            "datasource": "3__query",
            "viz_type": "big_number",
            "granularity_sqla": "ds",
        }))
        .unwrap();
        assert_eq!(form.datasource.as_deref(), Some("3__query"));
        assert_eq!(form.extra["granularity_sqla"], json!("ds"));
    }
}
