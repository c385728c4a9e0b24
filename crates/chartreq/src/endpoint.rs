//! Explore request URL construction.
//!
//! [`ExploreUrlBuilder`] assembles the URL a chart form is submitted to:
//! the directory is decided by the [`Endpoint`], query parameters from the
//! current page URL are preserved, and endpoint flags (`force`, `csv`,
//! `standalone`, ...) are appended in a fixed order.

use crate::domains::DomainPool;
use crate::error::{ExploreError, ExploreResult};
use crate::form::FormData;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

/// The explore endpoint a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    /// The interactive explore page.
    #[default]
    Base,
    /// Chart data as JSON.
    Json,
    /// Chart data as CSV.
    Csv,
    /// The generated query text, without running it.
    Query,
    /// Full query results.
    Results,
    /// Raw data samples.
    Samples,
    /// The explore page in standalone (embedded) mode.
    Standalone,
}

impl Endpoint {
    /// The URI directory serving this endpoint.
    ///
    /// Data endpoints are served by the legacy `explore_json` directory;
    /// the page endpoints by `/explore/`.
    pub fn directory(&self) -> &'static str {
        match self {
            Endpoint::Json
            | Endpoint::Csv
            | Endpoint::Query
            | Endpoint::Results
            | Endpoint::Samples => "/superset/explore_json/",
            Endpoint::Base | Endpoint::Standalone => "/explore/",
        }
    }
}

/// Standalone rendering mode for embedded pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandaloneMode {
    /// Hide the navigation bar.
    HideNav = 1,
    /// Hide the navigation bar and the submenu.
    HideNavAndSubMenu = 2,
}

impl StandaloneMode {
    /// The value carried in the `standalone` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            StandaloneMode::HideNav => "1",
            StandaloneMode::HideNavAndSubMenu => "2",
        }
    }
}

/// Builder for explore request URLs.
///
/// # Example
/// ```
/// use chartreq::{Endpoint, ExploreUrlBuilder, FormData};
/// use url::Url;
///
/// let form = FormData::new("1__table");
/// let origin = Url::parse("http://localhost/").unwrap();
/// let url = ExploreUrlBuilder::new(&form)
///     .endpoint(Endpoint::Csv)
///     .build(&origin)
///     .unwrap();
/// assert_eq!(url.as_str(), "http://localhost/superset/explore_json/?csv=true");
/// ```
#[derive(Debug, Clone)]
pub struct ExploreUrlBuilder<'a> {
    form: &'a FormData,
    endpoint: Endpoint,
    force: bool,
    cur_url: Option<&'a str>,
    standalone: StandaloneMode,
}

impl<'a> ExploreUrlBuilder<'a> {
    /// Create a builder for a form submission.
    pub fn new(form: &'a FormData) -> Self {
        Self {
            form,
            endpoint: Endpoint::Base,
            force: false,
            cur_url: None,
            standalone: StandaloneMode::HideNav,
        }
    }

    /// Set the target endpoint.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Bypass the cache for this request.
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Preserve the query parameters of the page the request originates
    /// from. Only its query string contributes; the origin always comes
    /// from `build`/`build_sharded`.
    pub fn cur_url(mut self, cur_url: &'a str) -> Self {
        self.cur_url = Some(cur_url);
        self
    }

    /// Standalone mode used when the endpoint is [`Endpoint::Standalone`].
    pub fn standalone(mut self, mode: StandaloneMode) -> Self {
        self.standalone = mode;
        self
    }

    /// Build the URL against an explicit origin (scheme + host).
    pub fn build(&self, origin: &Url) -> ExploreResult<Url> {
        self.build_from(origin.clone())
    }

    /// Build the URL against the next shard of a domain pool.
    pub fn build_sharded(&self, pool: &DomainPool) -> ExploreResult<Url> {
        let domain = pool
            .next_shard()
            .ok_or_else(|| ExploreError::validation("Domain pool is empty"))?;
        self.build_from(parse_origin(domain)?)
    }

    fn build_from(&self, mut url: Url) -> ExploreResult<Url> {
        if self.form.datasource.is_none() {
            return Err(ExploreError::MissingDatasource);
        }
        url.set_path(self.endpoint.directory());
        url.set_query(None);
        url.set_fragment(None);

        let mut pairs: Vec<(String, String)> = Vec::new();
        if let Some(cur) = self.cur_url {
            let cur = parse_origin(cur)?;
            for (k, v) in cur.query_pairs() {
                pairs.push((k.into_owned(), v.into_owned()));
            }
        }
        if let Some(slice_id) = self.form.slice_id {
            pairs.push(("form_data".into(), json!({ "slice_id": slice_id }).to_string()));
        }
        if self.endpoint == Endpoint::Standalone {
            pairs.push(("standalone".into(), self.standalone.as_query_value().into()));
        }
        if self.force {
            pairs.push(("force".into(), "true".into()));
        }
        match self.endpoint {
            Endpoint::Csv => pairs.push(("csv".into(), "true".into())),
            Endpoint::Query => pairs.push(("query".into(), "true".into())),
            Endpoint::Results => pairs.push(("results".into(), "true".into())),
            Endpoint::Samples => pairs.push(("samples".into(), "true".into())),
            Endpoint::Base | Endpoint::Json | Endpoint::Standalone => {}
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }
}

/// Parse an origin leniently: bare hostnames (`"domain1.com"`) are read
/// as `http://` URLs.
fn parse_origin(s: &str) -> ExploreResult<Url> {
    match Url::parse(s) {
        Ok(url) if url.has_host() => Ok(url),
        Ok(_) | Err(url::ParseError::RelativeUrlWithoutBase) => {
            Ok(Url::parse(&format!("http://{s}"))?)
        }
        Err(e) => Err(e.into()),
    }
}
