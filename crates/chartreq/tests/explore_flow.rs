//! End-to-end flow: registry setup, query settings, payload assembly,
//! URL construction, and form submission.

use chartreq::{
    BuildQueryRegistry, ChartMetadata, ChartMetadataRegistry, Comparator, DomainPool, Endpoint,
    ExploreResult, ExploreUrlBuilder, FormData, FormSubmitter, build_v1_chart_data_payload,
    explore_chart, query_settings, simple_sql_expression,
};
use serde_json::json;
use std::sync::Mutex;
use url::Url;

#[derive(Default)]
struct RecordingSubmitter {
    calls: Mutex<Vec<(Url, Vec<(String, String)>)>>,
}

impl FormSubmitter for RecordingSubmitter {
    async fn submit_form(&self, url: &Url, fields: &[(String, String)]) -> ExploreResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), fields.to_vec()));
        Ok(())
    }
}

fn form() -> FormData {
    FormData::new("1__table")
        .viz_type("dist_bar")
        .with("groupby", json!(["state"]))
        .with("metrics", json!(["count"]))
        .with("adhoc_filters", json!([{
            "expressionType": "SIMPLE",
            "subject": "gender",
            "operator": "IN",
            "comparator": ["boy", "girl"],
        }]))
}

#[tokio::test]
async fn full_explore_flow() {
    let mut metadata = ChartMetadataRegistry::new();
    metadata.register_value("dist_bar", ChartMetadata::legacy().name("Bar Chart"));

    let form = form();

    // This viz type is registered as legacy.
    let settings = query_settings(&form, &metadata);
    assert!(settings.use_legacy_api);

    // Its filter previews render through the expression helper.
    let filter = &form.extra["adhoc_filters"][0];
    let preview = simple_sql_expression(
        filter["subject"].as_str(),
        filter["operator"].as_str(),
        Some(Comparator::from(vec!["boy", "girl"])),
    );
    assert_eq!(preview, "gender IN ('boy', 'girl')");

    // The v1 payload is still buildable for the same form.
    let payload = build_v1_chart_data_payload(&form, false, &BuildQueryRegistry::new()).unwrap();
    assert_eq!(payload.queries.len(), 1);
    assert_eq!(payload.queries[0].columns, ["state"]);
    assert_eq!(payload.queries[0].filters[0].col, "gender");

    // Data fetches rotate over shard domains.
    let pool = DomainPool::new(["http://localhost/", "d1.example.com", "d2.example.com"]);
    let first = ExploreUrlBuilder::new(&form)
        .endpoint(Endpoint::Json)
        .build_sharded(&pool)
        .unwrap();
    let second = ExploreUrlBuilder::new(&form)
        .endpoint(Endpoint::Json)
        .build_sharded(&pool)
        .unwrap();
    assert_eq!(first.host_str(), Some("d1.example.com"));
    assert_eq!(second.host_str(), Some("d2.example.com"));
    assert_eq!(first.path(), "/superset/explore_json/");

    // Opening the chart posts the serialized form to the explore page.
    let submitter = RecordingSubmitter::default();
    let origin = Url::parse("http://localhost/").unwrap();
    let posted_to = explore_chart(&submitter, &form, &origin).await.unwrap();
    assert_eq!(posted_to.as_str(), "http://localhost/explore/");

    let calls = submitter.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let round_trip: FormData = serde_json::from_str(&calls[0].1[0].1).unwrap();
    assert_eq!(round_trip.datasource.as_deref(), Some("1__table"));
    assert_eq!(round_trip.viz_type.as_deref(), Some("dist_bar"));
}
