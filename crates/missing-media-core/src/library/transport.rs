use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use url::Url;

use crate::error::Error;

/// Status and body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking GET. Implementations send `Accept: application/json` and map
/// failures to reach the server to [`Error::Connectivity`]; any response that
/// arrives, whatever its status, is returned as `Ok`.
pub trait HttpTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error>;
}

impl<T: HttpTransport + ?Sized> HttpTransport for &T {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        (**self).get(url)
    }
}

/// Transport over `reqwest`'s blocking client, with its default timeouts.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, Error> {
        let client = Client::builder().build().map_err(|e| {
            Error::Configuration(format!("unable to build HTTP client: {}", e.without_url()))
        })?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn get(&self, url: &Url) -> Result<HttpResponse, Error> {
        let unreachable = |e: reqwest::Error| Error::Connectivity {
            host: url.origin().ascii_serialization(),
            // the url carries the token
            reason: e.without_url().to_string(),
        };

        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(unreachable)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(unreachable)?;

        Ok(HttpResponse { status, body })
    }
}
