use crate::credentials::Credentials;
use crate::error::RetrievalError;
use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, Request, Response};
use url::Url;

/// Scheme label placed in front of the token in the `Authorization` header.
const AUTH_SCHEME: &str = "Token";

/// Executes fully built HTTP requests.
pub trait HttpClient {
    fn execute(
        &self,
        request: Request,
    ) -> impl Future<Output = reqwest::Result<Response>> + Send;
}

impl HttpClient for Client {
    async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        Client::execute(self, request).await
    }
}

/// Builds the client used for every request of a run.
pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("gar/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Builds a request for `url` that authenticates with `credentials`.
///
/// The token is not validated; an empty one still yields a request, which the
/// server is expected to reject.
pub fn build_request(
    method: Method,
    url: &str,
    credentials: &Credentials,
) -> Result<Request, RetrievalError> {
    let parsed = Url::parse(url).map_err(|e| RetrievalError::InvalidRequest {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let mut auth = HeaderValue::from_str(&format!("{AUTH_SCHEME} {}", credentials.token()))
        .map_err(|e| RetrievalError::InvalidRequest {
            url: url.to_string(),
            reason: format!("token is not a valid header value: {e}"),
        })?;
    auth.set_sensitive(true);

    let mut request = Request::new(method, parsed);
    request.headers_mut().insert(AUTHORIZATION, auth);
    Ok(request)
}

/// Sets the `Accept` header of an already built request.
pub(crate) fn accept(mut request: Request, media_type: &'static str) -> Request {
    request
        .headers_mut()
        .insert(ACCEPT, HeaderValue::from_static(media_type));
    request
}
