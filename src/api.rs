//! Catalog API collaborators: authentication, paginated listing, tree fetch.
//!
//! The listing endpoint is fronted by anti-automation countermeasures, so each
//! request carries a randomized User-Agent and a randomized `seed` parameter.
//! The downloader treats the results as opaque.

use rand::Rng;
use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{MediaNode, WorkPage};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.asmr.one/api";

const REFERER: &str = "https://www.asmr.one/";

const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

#[derive(Serialize)]
struct LoginRequest<'a> {
    name: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Client for the catalog API.
///
/// Owns a shared `reqwest::Client`; the same connection pool should be passed
/// to the transfer primitive rather than building per-request clients.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    authorization: Option<String>,
}

impl ApiClient {
    /// Creates a client against the default API root.
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Creates a client against a custom API root (useful for tests).
    #[must_use]
    pub fn with_base_url(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            authorization: None,
        }
    }

    /// Returns true once [`login`](Self::login) has stored a token.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// Authenticates and stores the bearer token for later requests.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response, or a
    /// response without a token.
    pub async fn login(&mut self, account: &str, password: &str) -> Result<()> {
        let response: LoginResponse = self
            .http
            .post(format!("{}/auth/me", self.base_url))
            .header(header::REFERER, REFERER)
            .header(header::USER_AGENT, random_user_agent())
            .json(&LoginRequest {
                name: account,
                password,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let token = response
            .token
            .ok_or_else(|| Error::Auth("response contained no token".to_string()))?;
        self.authorization = Some(format!("Bearer {token}"));
        log::debug!("authenticated as {account}");
        Ok(())
    }

    /// Fetches one page of the catalog listing.
    ///
    /// `subtitle` filters for (un)subtitled works; `None` lists everything.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response, or an
    /// undecodable body.
    pub async fn work_page(&self, page: u32, subtitle: Option<bool>) -> Result<WorkPage> {
        let url = page_url(&self.base_url, page, random_seed(), subtitle);
        let mut request = self
            .http
            .get(&url)
            .header(header::ACCEPT, "application/json, text/plain, */*")
            .header(header::REFERER, REFERER)
            .header(header::USER_AGENT, random_user_agent());
        if let Some(auth) = &self.authorization {
            request = request.header(header::AUTHORIZATION, auth.as_str());
        }
        Ok(request.send().await?.error_for_status()?.json().await?)
    }

    /// Fetches the media tree for one work.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-2xx response, or an
    /// undecodable body.
    pub async fn work_tracks(&self, id: u64) -> Result<Vec<MediaNode>> {
        let mut request = self
            .http
            .get(format!("{}/tracks/{id}", self.base_url))
            .header(header::REFERER, REFERER)
            .header(header::USER_AGENT, random_user_agent());
        if let Some(auth) = &self.authorization {
            request = request.header(header::AUTHORIZATION, auth.as_str());
        }
        Ok(request.send().await?.error_for_status()?.json().await?)
    }
}

/// Builds the listing URL for one page.
fn page_url(base_url: &str, page: u32, seed: u32, subtitle: Option<bool>) -> String {
    let mut url = format!("{base_url}/works?order=id&sort=desc&page={page}&seed={seed}");
    if let Some(subtitle) = subtitle {
        url.push_str(&format!("&subtitle={}", u8::from(subtitle)));
    }
    url
}

/// Per-request seed parameter expected by the listing endpoint.
fn random_seed() -> u32 {
    rand::rng().random_range(1..=100)
}

fn random_user_agent() -> &'static str {
    USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_without_subtitle_filter() {
        assert_eq!(
            page_url("https://api.example.test/api", 3, 42, None),
            "https://api.example.test/api/works?order=id&sort=desc&page=3&seed=42"
        );
    }

    #[test]
    fn page_url_with_subtitle_filter() {
        assert_eq!(
            page_url("https://api.example.test/api", 1, 7, Some(true)),
            "https://api.example.test/api/works?order=id&sort=desc&page=1&seed=7&subtitle=1"
        );
        assert_eq!(
            page_url("https://api.example.test/api", 1, 7, Some(false)),
            "https://api.example.test/api/works?order=id&sort=desc&page=1&seed=7&subtitle=0"
        );
    }

    #[test]
    fn random_seed_stays_in_range() {
        for _ in 0..1000 {
            let seed = random_seed();
            assert!((1..=100).contains(&seed));
        }
    }

    #[test]
    fn user_agents_are_non_empty() {
        assert!(USER_AGENTS.iter().all(|ua| !ua.is_empty()));
        assert!(!random_user_agent().is_empty());
    }

    #[test]
    fn new_client_is_unauthenticated() {
        let client = ApiClient::new(reqwest::Client::new());
        assert!(!client.is_authenticated());
    }
}
