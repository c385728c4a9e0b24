//! # chartreq
//!
//! Chart data request plumbing for a BI frontend's "explore" (chart
//! building) flow.
//!
//! ## Features
//!
//! - **Filter expressions**: render simple SQL filter fragments for
//!   ad-hoc filter previews ([`simple_sql_expression`])
//! - **Explore URLs**: build the request URL for an endpoint, preserving
//!   the current page's query parameters ([`ExploreUrlBuilder`])
//! - **Domain sharding**: rotate chart data fetches over a pool of
//!   alternate domains ([`DomainPool`])
//! - **Query settings**: decide legacy vs v1 chart data API per
//!   visualization type ([`query_settings`], [`ChartMetadataRegistry`])
//! - **Query payloads**: assemble v1 chart data payloads
//!   ([`build_v1_chart_data_payload`])
//! - **Form submission**: POST a chart form to the explore page
//!   ([`explore_chart`], [`FormSubmitter`])
//!
//! ```
//! use chartreq::simple_sql_expression;
//!
//! let sql = simple_sql_expression(Some("country"), Some("IN"), Some(vec!["FR", "DE"].into()));
//! assert_eq!(sql, "country IN ('FR', 'DE')");
//! ```

pub mod client;
pub mod datasource;
pub mod domains;
pub mod endpoint;
pub mod error;
pub mod expr;
pub mod form;
pub mod payload;
pub mod registry;

pub use client::{FormSubmitter, explore_chart};
pub use datasource::{DatasourceKey, DatasourceType};
pub use domains::DomainPool;
pub use endpoint::{Endpoint, ExploreUrlBuilder, StandaloneMode};
pub use error::{ExploreError, ExploreResult};
pub use expr::{Comparator, SqlScalar, numeric_literal, simple_sql_expression};
pub use form::FormData;
pub use payload::{
    BuildQuery, BuildQueryRegistry, ChartDataPayload, DatasourceRef, ParseMethod, QueryFilter,
    QueryObject, QuerySettings, ResultFormat, ResultType, build_v1_chart_data_payload,
    default_build_query, query_settings,
};
pub use registry::{ChartMetadata, ChartMetadataRegistry};

#[cfg(feature = "client")]
pub use client::HttpFormSubmitter;
