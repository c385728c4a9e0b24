//! Form submission for chart requests.
//!
//! The explore page is opened by POSTing the serialized form data to it,
//! not by packing the form into the URL (forms routinely outgrow URL
//! length limits). [`FormSubmitter`] is the seam between URL/payload
//! assembly and the transport; [`HttpFormSubmitter`] is the bundled
//! `reqwest`-backed implementation.

use crate::endpoint::{Endpoint, ExploreUrlBuilder};
use crate::error::ExploreResult;
use crate::form::FormData;
use url::Url;

/// A sink for `application/x-www-form-urlencoded` submissions.
///
/// Implemented by [`HttpFormSubmitter`]; tests substitute recording
/// fakes.
pub trait FormSubmitter: Send + Sync {
    /// Submit `fields` to `url` as a form POST.
    fn submit_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> impl std::future::Future<Output = ExploreResult<()>> + Send;
}

/// Default request timeout for the bundled submitter.
#[cfg(feature = "client")]
const DEFAULT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// `reqwest`-backed form submitter.
///
/// Non-2xx responses surface as errors.
#[cfg(feature = "client")]
#[derive(Debug, Clone)]
pub struct HttpFormSubmitter {
    client: reqwest::Client,
}

#[cfg(feature = "client")]
impl HttpFormSubmitter {
    /// Create a submitter with the default request timeout.
    pub fn new() -> ExploreResult<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a submitter with an explicit request timeout.
    pub fn with_timeout(timeout: std::time::Duration) -> ExploreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chartreq/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[cfg(feature = "client")]
impl FormSubmitter for HttpFormSubmitter {
    async fn submit_form(&self, url: &Url, fields: &[(String, String)]) -> ExploreResult<()> {
        self.client
            .post(url.clone())
            .form(fields)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Submit a chart form to the explore page.
///
/// The full form data is serialized to JSON into a single `form_data`
/// field and posted to the base explore URL on `origin`. Returns the URL
/// the form was posted to.
pub async fn explore_chart<S: FormSubmitter>(
    submitter: &S,
    form: &FormData,
    origin: &Url,
) -> ExploreResult<Url> {
    let url = ExploreUrlBuilder::new(form)
        .endpoint(Endpoint::Base)
        .build(origin)?;
    let body = serde_json::to_string(form)?;
    tracing::debug!(
        url = %url,
        viz_type = form.viz_type.as_deref().unwrap_or("-"),
        "Submitting chart form"
    );
    submitter
        .submit_form(&url, &[("form_data".to_string(), body)])
        .await?;
    Ok(url)
}
