//! Client for the Google Reader compatible API exposed by FreshRSS
//! (`/api/greader.php`).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;

use crate::domain::{AuthToken, FeedItem};
use crate::errors::{NotifierError, NotifierResult};
use crate::reader::traits::ReaderApi;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const AUTH_PREFIX: &str = "Auth=";
const USER_AGENT: &str = concat!("greader-notify/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct StreamContents {
    #[serde(default)]
    items: Vec<FeedItem>,
}

pub struct GReaderClient {
    base_url: String,
    client: Client,
}

impl GReaderClient {
    pub fn new(base_url: &str, timeout: Duration) -> NotifierResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn login_url(&self) -> String {
        format!("{}/accounts/ClientLogin", self.base_url)
    }

    fn reading_list_url(&self) -> String {
        format!("{}/reader/api/0/stream/contents/reading-list", self.base_url)
    }
}

impl ReaderApi for GReaderClient {
    fn login(&self, username: &str, password: &str) -> NotifierResult<AuthToken> {
        let response = self
            .client
            .get(self.login_url())
            .query(&[("Email", username), ("Passwd", password)])
            .send()
            .map_err(login_error)?;

        let status = response.status();
        let body = response.text().map_err(login_error)?;

        if !status.is_success() {
            return Err(NotifierError::Auth(format!("{} {}", status, body.trim())));
        }

        parse_login_response(&body)
    }

    fn fetch_unread(&self, token: &AuthToken, limit: usize) -> NotifierResult<Vec<FeedItem>> {
        let limit = limit.to_string();
        let response = self
            .client
            .get(self.reading_list_url())
            .query(&[("output", "json"), ("n", limit.as_str())])
            .header(AUTHORIZATION, token.header_value())
            .send()
            .map_err(|e| NotifierError::Fetch(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| NotifierError::Fetch(e.to_string()))?;

        if !status.is_success() {
            return Err(NotifierError::Fetch(format!("{} {}", status, body.trim())));
        }

        let items = parse_reading_list(&body).map_err(|e| NotifierError::Fetch(e.to_string()))?;

        Ok(items.into_iter().filter(|item| !item.is_read()).collect())
    }
}

/// The login URL carries the password in its query, so it is stripped from the error.
fn login_error(err: reqwest::Error) -> NotifierError {
    NotifierError::Auth(err.without_url().to_string())
}

/// Pull the token out of a ClientLogin body such as
/// `SID=alice/8e68...\nLSID=null\nAuth=alice/8e68...`.
pub fn parse_login_response(body: &str) -> NotifierResult<AuthToken> {
    let token = body
        .lines()
        .find_map(|line| line.strip_prefix(AUTH_PREFIX))
        .map(str::trim)
        .ok_or_else(|| NotifierError::Auth("Auth token not found in login response".to_string()))?;

    if token.is_empty() {
        return Err(NotifierError::Auth("Empty auth token in login response".to_string()));
    }

    Ok(AuthToken::new(token))
}

/// Parse a `stream/contents` JSON body. Read items are not filtered here.
pub fn parse_reading_list(body: &str) -> NotifierResult<Vec<FeedItem>> {
    let contents: StreamContents = serde_json::from_str(body)?;
    Ok(contents.items)
}
