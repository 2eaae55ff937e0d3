use crate::error::Result;
use reqwest::blocking::Client;
use std::time::Duration;

/// Status and body of a completed GET
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking HTTP GET, shared by every download worker.
///
/// `Err` is a transport failure; a non-2xx status comes back as a response.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<FetchResponse>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let response = self.client.get(url).send()?;
        let status = response.status();

        // Error pages are not worth buffering
        let body = if status.is_success() {
            response.bytes()?.to_vec()
        } else {
            Vec::new()
        };

        Ok(FetchResponse {
            status: status.as_u16(),
            body,
        })
    }
}
