//! Transport abstraction over the remote-procedure protocol
//!
//! The crate never speaks the wire protocol itself. Embedding applications
//! implement [`Transport`] over whatever RPC stack they use and hand it to a
//! [`Session`](crate::Session); the session layers the token discipline,
//! response verification, and payload mapping on top.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::SearchCriteria;

/// Generic response wrapper returned by every remote operation
///
/// `status` carries the service's ad-hoc status line (e.g. `"200 OK"`,
/// `"401 Unauthorized"`); some operations omit it entirely, which is treated
/// as success. `payload` is the loosely-typed remainder of the response — an
/// arbitrary key/value structure that the mapper converts into fixed domain
/// records.
#[derive(Clone, Debug, PartialEq)]
pub struct ResponseEnvelope {
    /// The status line, absent when the operation does not report one
    pub status: Option<String>,
    /// The loosely-typed response body
    pub payload: Value,
}

impl ResponseEnvelope {
    /// Create an envelope with an explicit status line
    pub fn new(status: impl Into<String>, payload: Value) -> Self {
        Self {
            status: Some(status.into()),
            payload,
        }
    }

    /// Create an envelope without a status line
    pub fn without_status(payload: Value) -> Self {
        Self {
            status: None,
            payload,
        }
    }
}

/// Named remote operations exposed by the subtitle service
///
/// Each method performs exactly one remote call and returns the raw envelope,
/// `Ok(None)` when the remote yields no envelope at all (the verifier rejects
/// that case). Token-taking operations receive the session token verbatim.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Authenticate and obtain a session token
    ///
    /// Anonymous sessions pass empty `username`/`password`.
    async fn log_in(
        &self,
        username: &str,
        password: &str,
        language: &str,
        user_agent: &str,
    ) -> Result<Option<ResponseEnvelope>>;

    /// Release a session token
    async fn log_out(&self, token: &str) -> Result<Option<ResponseEnvelope>>;

    /// Search subtitles by a batch of criteria
    async fn search_subtitles(
        &self,
        token: &str,
        criteria: &[SearchCriteria],
    ) -> Result<Option<ResponseEnvelope>>;

    /// Exact lookup of subtitle content hashes
    async fn check_subtitle_hashes(
        &self,
        token: &str,
        hashes: &[String],
    ) -> Result<Option<ResponseEnvelope>>;

    /// Movie-metadata lookup by file fingerprints
    async fn check_movie_hashes(
        &self,
        token: &str,
        fingerprints: &[String],
    ) -> Result<Option<ResponseEnvelope>>;

    /// Enumerate supported subtitle languages, localized to `language`
    async fn get_sub_languages(&self, language: &str) -> Result<Option<ResponseEnvelope>>;

    /// Free-text search against the external movie catalog
    async fn search_movies_on_imdb(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Option<ResponseEnvelope>>;
}
