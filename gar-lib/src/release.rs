use crate::credentials::Credentials;
use crate::error::RetrievalError;
use crate::http_client::{HttpClient, accept, build_request};
use crate::logging::spinner_style;
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Deserializer};
use std::fmt;
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use url::Url;

const RELEASE_MEDIA_TYPE: &str = "application/vnd.github.v3.text-match+json";

/// Identifies the release whose assets are retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalTarget {
    pub owner: String,
    pub repository: String,
    pub tag: String,
}

impl RetrievalTarget {
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            tag: tag.into(),
        }
    }
}

impl fmt::Display for RetrievalTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repository, self.tag)
    }
}

/// A downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Asset {
    #[serde(deserialize_with = "non_empty_name")]
    pub name: String,
    #[serde(rename = "url")]
    pub content_url: Url,
}

/// Matches the fields of the GitHub API release response that are used
#[derive(Debug, Deserialize)]
struct ReleaseJson {
    #[serde(default)]
    assets: Option<Vec<Asset>>,
}

fn non_empty_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    if name.is_empty() {
        return Err(serde::de::Error::custom("asset name is empty"));
    }
    Ok(name)
}

/// Address of the release metadata for `target`.
///
/// Each identifier becomes exactly one percent-encoded path segment.
pub fn tag_url(api_origin: &Url, target: &RetrievalTarget) -> Result<Url, RetrievalError> {
    // GET /repos/:owner/:repo/releases/tags/:tag
    let mut url = api_origin.clone();
    url.path_segments_mut()
        .map_err(|_| RetrievalError::InvalidRequest {
            url: api_origin.to_string(),
            reason: "API origin cannot be used as a base URL".to_string(),
        })?
        .pop_if_empty()
        .extend([
            "repos",
            target.owner.as_str(),
            target.repository.as_str(),
            "releases",
            "tags",
            target.tag.as_str(),
        ]);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Resolves the release named by `target` to its assets, in the order the
/// server lists them.
#[instrument(skip_all, fields(release = %target))]
pub async fn resolve<C: HttpClient>(
    client: &C,
    api_origin: &Url,
    target: &RetrievalTarget,
    credentials: &Credentials,
) -> Result<Vec<Asset>, RetrievalError> {
    let current_span = tracing::Span::current();
    if let Ok(style) = spinner_style("{msg}") {
        current_span.pb_set_style(&style);
    }
    current_span.pb_set_message(&format!("Resolving release {target}..."));

    let url = tag_url(api_origin, target)?;
    tracing::debug!("Requesting release metadata from {}", url);

    let request = accept(
        build_request(Method::GET, url.as_str(), credentials)?,
        RELEASE_MEDIA_TYPE,
    );

    let response = client
        .execute(request)
        .await
        .map_err(|source| RetrievalError::Transport {
            asset: None,
            source,
        })?;

    if response.status() != StatusCode::OK {
        return Err(RetrievalError::Status {
            asset: None,
            code: response.status().as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|source| RetrievalError::Transport {
            asset: None,
            source,
        })?;
    let release: ReleaseJson =
        serde_json::from_slice(&body).map_err(|source| RetrievalError::Decode { source })?;

    let assets = release.assets.unwrap_or_default();
    tracing::debug!("Release {} has {} assets", target, assets.len());
    Ok(assets)
}
