//! Blocking client for The Movie Database (TMDB) v3 API.
//!
//! Only two endpoints are used:
//!
//! * `GET /search/movie?query=...&year=...` → candidate ids
//! * `GET /movie/{id}` → canonical title and `belongs_to_collection`

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{MetadataService, MovieDetails, SearchHit, ServiceError};
use crate::cache::CollectionRef;

/// Default TMDB API root.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

const USER_AGENT: &str = concat!("franchise-builder/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    belongs_to_collection: Option<WireCollection>,
}

#[derive(Debug, Deserialize)]
struct WireCollection {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
}

impl From<SearchResponse> for Vec<SearchHit> {
    fn from(response: SearchResponse) -> Self {
        response
            .results
            .into_iter()
            .map(|r| SearchHit { id: r.id })
            .collect()
    }
}

impl From<DetailResponse> for MovieDetails {
    fn from(response: DetailResponse) -> Self {
        let title = response.title.filter(|t| !t.trim().is_empty());
        let collection = response.belongs_to_collection.and_then(|c| match (c.id, c.name) {
            (Some(id), Some(name)) if !name.trim().is_empty() => Some(CollectionRef::new(id, name)),
            _ => None,
        });
        Self { title, collection }
    }
}

/// TMDB client sharing one HTTP agent across requests.
pub struct TmdbClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TmdbClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl TmdbClient {
    /// Create a client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - TMDB v3 API key
    /// * `base_url` - API root, normally [`DEFAULT_BASE_URL`]
    /// * `timeout` - Overall timeout per request
    #[must_use]
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5).min(timeout))
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Strip the API key from anything that might echo the request URL.
    fn redact(&self, message: String) -> String {
        if self.api_key.is_empty() {
            message
        } else {
            message.replace(&self.api_key, "<redacted>")
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .agent
            .get(&url)
            .set("Accept", "application/json")
            .query("api_key", &self.api_key);
        for (name, value) in query {
            request = request.query(name, value);
        }

        log::trace!("GET {}", url);
        let response = request.call().map_err(|error| match error {
            ureq::Error::Status(status, _) => ServiceError::Status {
                url: url.clone(),
                status,
            },
            ureq::Error::Transport(transport) => ServiceError::Transport {
                url: url.clone(),
                message: self.redact(transport.to_string()),
            },
        })?;

        response
            .into_json::<T>()
            .map_err(|error| ServiceError::Decode {
                url,
                message: self.redact(error.to_string()),
            })
    }
}

impl MetadataService for TmdbClient {
    fn search(&self, title: &str, year: Option<u16>) -> Result<Vec<SearchHit>, ServiceError> {
        let year = year.map(|y| y.to_string());
        let mut query = vec![("query", title)];
        if let Some(year) = year.as_deref() {
            query.push(("year", year));
        }
        let response: SearchResponse = self.get_json("/search/movie", &query)?;
        Ok(response.into())
    }

    fn details(&self, id: u64) -> Result<MovieDetails, ServiceError> {
        let response: DetailResponse = self.get_json(&format!("/movie/{id}"), &[])?;
        Ok(response.into())
    }
}
