//! Chart data query payloads and per-chart query settings.
//!
//! Modern charts fetch data by POSTing a structured payload (a
//! [`ChartDataPayload`]) to the v1 chart-data API; older visualizations
//! still go through the legacy endpoint. [`query_settings`] decides which
//! path a form takes, and [`build_v1_chart_data_payload`] assembles the
//! payload for the modern one.

use crate::datasource::{DatasourceKey, DatasourceType};
use crate::error::ExploreResult;
use crate::form::FormData;
use crate::registry::ChartMetadataRegistry;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// How a chart data response body is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseMethod {
    /// Plain JSON.
    #[serde(rename = "json")]
    Json,
    /// JSON with arbitrary-precision integers preserved.
    #[serde(rename = "json-bigint")]
    JsonBigint,
}

impl fmt::Display for ParseMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseMethod::Json => "json",
            ParseMethod::JsonBigint => "json-bigint",
        })
    }
}

/// Per-chart request settings derived from the metadata registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySettings {
    /// Whether the chart's data is served by the legacy endpoint.
    pub use_legacy_api: bool,
    /// How the response body is parsed.
    pub parse_method: ParseMethod,
}

/// Decide how a chart's data is fetched and parsed.
///
/// Charts with unregistered metadata (or forms without a viz type) use
/// the v1 API. Response bodies may carry integers wider than 53 bits on
/// either path, so both parse as `json-bigint`.
pub fn query_settings(form: &FormData, registry: &ChartMetadataRegistry) -> QuerySettings {
    let use_legacy_api = form
        .viz_type
        .as_deref()
        .and_then(|viz| registry.get(viz))
        .map(|meta| meta.use_legacy_api)
        .unwrap_or(false);
    QuerySettings {
        use_legacy_api,
        parse_method: ParseMethod::JsonBigint,
    }
}

/// Response body format requested from the chart data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultFormat {
    /// JSON rows.
    #[default]
    Json,
    /// CSV export.
    Csv,
}

/// Which stage of the query pipeline is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// The chart's full post-processed data.
    #[default]
    Full,
    /// The generated query text only.
    Query,
    /// Raw query results.
    Results,
    /// Data samples.
    Samples,
}

/// One filter of a query object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Column being filtered.
    pub col: String,
    /// Filter operator (`==`, `IN`, ...).
    pub op: String,
    /// Comparison value(s); absent for unary operators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub val: Option<Value>,
}

/// One entry of a chart data payload's `queries` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryObject {
    /// Grouping columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,

    /// Requested metrics, verbatim (saved metric names or ad-hoc metric
    /// objects).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<Value>,

    /// Row-level filters.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<QueryFilter>,

    /// Row cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_limit: Option<i64>,

    /// Time range control, verbatim (e.g. `"Last week"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,

    /// Sort direction for the first metric.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_desc: Option<bool>,
}

/// Hook deriving the `queries` array from form data, registered per
/// visualization type.
pub type BuildQuery = Box<dyn Fn(&FormData) -> Vec<QueryObject> + Send + Sync>;

/// A string-keyed store of build-query hooks.
#[derive(Default)]
pub struct BuildQueryRegistry {
    items: HashMap<String, BuildQuery>,
}

impl BuildQueryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a build-query hook under a visualization type. Chainable.
    pub fn register_value<F>(&mut self, key: impl Into<String>, build: F) -> &mut Self
    where
        F: Fn(&FormData) -> Vec<QueryObject> + Send + Sync + 'static,
    {
        self.items.insert(key.into(), Box::new(build));
        self
    }

    /// Look up the hook for a visualization type.
    pub fn get(&self, key: &str) -> Option<&BuildQuery> {
        self.items.get(key)
    }

    /// Check whether a visualization type has a hook.
    pub fn has(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    /// Remove a visualization type's hook. Chainable.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.items.remove(key);
        self
    }
}

impl fmt::Debug for BuildQueryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildQueryRegistry")
            .field("keys", &self.items.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Fallback used for viz types with no registered hook: derive a single
/// query object from the form's common controls.
pub fn default_build_query(form: &FormData) -> Vec<QueryObject> {
    let query = QueryObject {
        columns: string_list(form, "groupby"),
        metrics: form
            .extra
            .get("metrics")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        filters: simple_filters(form),
        row_limit: form.extra.get("row_limit").and_then(Value::as_i64),
        time_range: form
            .extra
            .get("time_range")
            .and_then(Value::as_str)
            .map(str::to_string),
        order_desc: form.extra.get("order_desc").and_then(Value::as_bool),
    };
    vec![query]
}

fn string_list(form: &FormData, key: &str) -> Vec<String> {
    form.extra
        .get(key)
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Lift the form's simple ad-hoc filters into query filters. Free-form
/// SQL filter entries are left to the backend and skipped here.
fn simple_filters(form: &FormData) -> Vec<QueryFilter> {
    let Some(entries) = form.extra.get("adhoc_filters").and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| {
            let entry = entry.as_object()?;
            if entry.get("expressionType").and_then(Value::as_str) != Some("SIMPLE") {
                return None;
            }
            Some(QueryFilter {
                col: entry.get("subject")?.as_str()?.to_string(),
                op: entry.get("operator")?.as_str()?.to_string(),
                val: entry.get("comparator").cloned(),
            })
        })
        .collect()
}

/// Datasource reference of a chart data payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceRef {
    /// Numeric datasource id.
    pub id: i64,
    /// Datasource kind.
    #[serde(rename = "type")]
    pub kind: DatasourceType,
}

impl From<DatasourceKey> for DatasourceRef {
    fn from(key: DatasourceKey) -> Self {
        Self {
            id: key.id,
            kind: key.kind,
        }
    }
}

/// The v1 chart data request payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartDataPayload {
    /// Datasource reference, split out of the composite key.
    pub datasource: DatasourceRef,
    /// Bypass the cache.
    pub force: bool,
    /// One or more query objects; never empty.
    pub queries: Vec<QueryObject>,
    /// The originating form, verbatim.
    pub form_data: FormData,
    /// Requested response format.
    pub result_format: ResultFormat,
    /// Requested pipeline stage.
    pub result_type: ResultType,
}

/// Build the v1 chart data payload for a form.
///
/// Viz types without a registered build-query hook fall back to
/// [`default_build_query`], so the payload always carries at least one
/// query.
pub fn build_v1_chart_data_payload(
    form: &FormData,
    force: bool,
    registry: &BuildQueryRegistry,
) -> ExploreResult<ChartDataPayload> {
    let key = form.datasource_key()?;
    let queries = match form.viz_type.as_deref().and_then(|viz| registry.get(viz)) {
        Some(build) => build(form),
        None => {
            tracing::debug!(
                viz_type = form.viz_type.as_deref().unwrap_or("-"),
                "No build query registered, deriving default query"
            );
            default_build_query(form)
        }
    };
    Ok(ChartDataPayload {
        datasource: key.into(),
        force,
        queries,
        form_data: form.clone(),
        result_format: ResultFormat::Json,
        result_type: ResultType::Full,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ChartMetadata;
    use serde_json::json;

    fn registry() -> ChartMetadataRegistry {
        let mut registry = ChartMetadataRegistry::new();
        registry
            .register_value("my_legacy_viz", ChartMetadata::legacy())
            .register_value("my_v1_viz", ChartMetadata::new());
        registry
    }

    #[test]
    fn legacy_viz_uses_legacy_api() {
        let form = FormData::new("1__table").viz_type("my_legacy_viz");
        let settings = query_settings(&form, &registry());
        assert!(settings.use_legacy_api);
        assert_eq!(settings.parse_method, ParseMethod::JsonBigint);
    }

    #[test]
    fn v1_viz_uses_v1_api() {
        let form = FormData::new("1__table").viz_type("my_v1_viz");
        let settings = query_settings(&form, &registry());
        assert!(!settings.use_legacy_api);
        assert_eq!(settings.parse_method, ParseMethod::JsonBigint);
    }

    #[test]
    fn unregistered_viz_uses_v1_api() {
        let form = FormData::new("1__table").viz_type("undefined_viz");
        assert!(!query_settings(&form, &registry()).use_legacy_api);
    }

    #[test]
    fn missing_viz_type_uses_v1_api() {
        let form = FormData::new("1__table");
        assert!(!query_settings(&form, &registry()).use_legacy_api);
    }

    #[test]
    fn payload_without_registered_build_query_still_has_queries() {
        let form = FormData::new("1__table").viz_type("my_custom_viz");
        let payload =
            build_v1_chart_data_payload(&form, false, &BuildQueryRegistry::new()).unwrap();
        assert_eq!(payload.queries.len(), 1);
        assert_eq!(payload.datasource, DatasourceRef {
            id: 1,
            kind: DatasourceType::Table,
        });
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("queries").is_some());
        assert_eq!(value["result_format"], json!("json"));
        assert_eq!(value["result_type"], json!("full"));
        assert_eq!(value["datasource"], json!({ "id": 1, "type": "table" }));
    }

    #[test]
    fn registered_build_query_wins() {
        let mut builds = BuildQueryRegistry::new();
        builds.register_value("my_custom_viz", |_form: &FormData| {
            vec![QueryObject {
                row_limit: Some(7),
                ..QueryObject::default()
            }]
        });
        let form = FormData::new("1__table").viz_type("my_custom_viz");
        let payload = build_v1_chart_data_payload(&form, true, &builds).unwrap();
        assert!(payload.force);
        assert_eq!(payload.queries[0].row_limit, Some(7));
    }

    #[test]
    fn default_query_reads_common_controls() {
        let form = FormData::new("1__table")
            .with("groupby", json!(["country", "gender"]))
            .with("metrics", json!(["count"]))
            .with("row_limit", json!(100))
            .with("time_range", json!("Last week"))
            .with("adhoc_filters", json!([
                {
                    "expressionType": "SIMPLE",
                    "subject": "gender",
                    "operator": "IN",
                    "comparator": ["boy", "girl"],
                },
                {
                    "expressionType": "SQL",
                    "sqlExpression": "gender = 'boy'",
                },
            ]));

        let queries = default_build_query(&form);
        assert_eq!(queries.len(), 1);
        let query = &queries[0];
        assert_eq!(query.columns, ["country", "gender"]);
        assert_eq!(query.metrics, [json!("count")]);
        assert_eq!(query.row_limit, Some(100));
        assert_eq!(query.time_range.as_deref(), Some("Last week"));
        assert_eq!(query.filters, [QueryFilter {
            col: "gender".to_string(),
            op: "IN".to_string(),
            val: Some(json!(["boy", "girl"])),
        }]);
    }

    #[test]
    fn invalid_datasource_fails_payload_build() {
        let form = FormData::new("nope");
        assert!(build_v1_chart_data_payload(&form, false, &BuildQueryRegistry::new()).is_err());
    }

    #[test]
    fn parse_method_display() {
        assert_eq!(ParseMethod::Json.to_string(), "json");
        assert_eq!(ParseMethod::JsonBigint.to_string(), "json-bigint");
    }
}
