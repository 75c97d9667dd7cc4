use thiserror::Error;

pub static MANIFEST_PATH: &str = "/api/clients";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures below HTTP. A non-2xx status still counts as a [`Response`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {url} failed: {cause}")]
    Transport {
        url: String,
        #[source]
        cause: Box<ureq::Error>,
    },
    #[error("Failed to read response body from {url}: {cause}")]
    BodyRead {
        url: String,
        #[source]
        cause: std::io::Error,
    },
}

pub trait Fetch {
    fn get(&self, path: &str) -> Result<Response, FetchError>;
}

/// Plain blocking GETs against a single server.
pub struct HttpFetcher {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
            base_url: base_url.into(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, path: &str) -> Result<Response, FetchError> {
        let url = self.url(path);
        log::debug!("GET {}", url);
        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            // ureq treats 4xx/5xx as errors, but they still carry a body
            Err(ureq::Error::Status(_, response)) => response,
            Err(cause) => {
                return Err(FetchError::Transport {
                    url,
                    cause: Box::new(cause),
                })
            }
        };
        let status = response.status();
        let body = response
            .into_string()
            .map_err(|cause| FetchError::BodyRead {
                url: url.clone(),
                cause,
            })?;
        log::debug!("GET {} -> {} ({} bytes)", url, status, body.len());
        Ok(Response { status, body })
    }
}
