use crate::http_client::HttpClient;
use reqwest::header::HeaderMap;
use reqwest::{Body, Method, Request, Response};
use std::collections::HashMap;
use std::io;
use std::sync::Mutex;

/// Canned reply for one URL.
#[derive(Debug, Clone)]
pub struct MockResponse {
    status: u16,
    body: Vec<u8>,
    /// The body stream fails after `body` has been delivered.
    broken: bool,
}

impl MockResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
            broken: false,
        }
    }

    /// A 200 response whose connection drops after `body` has been sent.
    pub fn truncated(body: impl Into<Vec<u8>>) -> Self {
        Self {
            broken: true,
            ..Self::ok(body)
        }
    }

    fn to_response(&self) -> Response {
        let body = if self.broken {
            let chunks: Vec<Result<Vec<u8>, io::Error>> = vec![
                Ok(self.body.clone()),
                Err(io::Error::new(
                    io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )),
            ];
            Body::wrap_stream(futures_util::stream::iter(chunks))
        } else {
            Body::from(self.body.clone())
        };

        let response = http::Response::builder()
            .status(self.status)
            .body(body)
            .expect("mock response is valid");
        Response::from(response)
    }
}

/// What the client under test sent.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
}

/// Serves canned responses by URL and records every request. Unknown URLs
/// get an empty 404.
#[derive(Default)]
pub struct MockHttpClient {
    routes: HashMap<String, MockResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, response: MockResponse) -> Self {
        self.routes.insert(url.to_string(), response);
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

impl HttpClient for MockHttpClient {
    async fn execute(&self, request: Request) -> reqwest::Result<Response> {
        let url = request.url().to_string();
        self.requests.lock().unwrap().push(RecordedRequest {
            method: request.method().clone(),
            url: url.clone(),
            headers: request.headers().clone(),
        });

        Ok(match self.routes.get(&url) {
            Some(response) => response.to_response(),
            None => MockResponse::status(404, Vec::new()).to_response(),
        })
    }
}
