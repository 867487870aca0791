//! Search and lookup operations
//!
//! Every operation here shares one discipline: attach the token, run exactly
//! one remote call, verify the envelope, map the payload. No retries, no
//! batching, no re-sorting — result order is as received.

use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::fingerprint::{self, MovieHasher};
use crate::mapper;
use crate::response;
use crate::transport::Transport;
use crate::types::{Language, Movie, MovieInfo, SearchCriteria, Subtitle};

use super::Session;

/// Fallback locale for the supported-language enumeration
const DEFAULT_LANGUAGE: &str = "en";

impl<T: Transport> Session<T> {
    /// Search subtitles by the fingerprint of a local video file
    ///
    /// Computes the fingerprint through the external `hasher` collaborator
    /// and the byte size from file metadata, then runs a fingerprint-mode
    /// search.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `path` is empty (`Argument`)
    /// - `path` does not resolve to an existing file (`FileNotFound`)
    /// - the session holds no token (`NotAuthenticated`)
    /// - the remote call, verification, or mapping fails
    pub async fn search_by_file(
        &mut self,
        languages: &[&str],
        path: impl AsRef<Path>,
        hasher: &dyn MovieHasher,
    ) -> Result<Vec<Subtitle>> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::Argument("file path must not be empty".to_string()));
        }

        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(Error::Io(e)),
        };
        if !metadata.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let hash = fingerprint::to_hex(hasher.fingerprint(path)?);
        debug!(?path, hash = %hash, size = metadata.len(), "fingerprinted file for search");

        self.run_search(SearchCriteria::for_fingerprint(languages, &hash, metadata.len()))
            .await
    }

    /// Search subtitles by an external (IMDb) movie identifier
    ///
    /// # Errors
    ///
    /// `Argument` when `imdb_id` is empty; otherwise as
    /// [`search_by_file`](Session::search_by_file).
    pub async fn search_by_imdb_id(
        &mut self,
        languages: &[&str],
        imdb_id: &str,
    ) -> Result<Vec<Subtitle>> {
        if imdb_id.is_empty() {
            return Err(Error::Argument("imdb id must not be empty".to_string()));
        }
        self.run_search(SearchCriteria::for_imdb_id(languages, imdb_id))
            .await
    }

    /// Search subtitles by a free-text query
    ///
    /// # Errors
    ///
    /// `Argument` when `query` is empty; otherwise as
    /// [`search_by_file`](Session::search_by_file).
    pub async fn search_by_query(
        &mut self,
        languages: &[&str],
        query: &str,
    ) -> Result<Vec<Subtitle>> {
        if query.is_empty() {
            return Err(Error::Argument("query must not be empty".to_string()));
        }
        self.run_search(SearchCriteria::for_query(languages, query))
            .await
    }

    /// Shared execution path: one criteria, one remote call, verify, map
    async fn run_search(&mut self, criteria: SearchCriteria) -> Result<Vec<Subtitle>> {
        let token = self.require_token()?;
        let raw = self
            .transport()
            .search_subtitles(token, std::slice::from_ref(&criteria))
            .await?;
        let envelope = response::verify(raw)?;
        let results = mapper::subtitles(envelope.payload.get("data"))?;
        debug!(count = results.len(), "subtitle search completed");
        Ok(results)
    }

    /// Exact lookup of a subtitle content hash
    ///
    /// Returns the internal subtitle identifier, or 0 when the hash is
    /// unknown to the service.
    ///
    /// # Errors
    ///
    /// `Argument` when `hash` is empty; `NotAuthenticated` without a token;
    /// plus transport, verification, and mapping failures.
    pub async fn check_subtitle_hash(&mut self, hash: &str) -> Result<u64> {
        if hash.is_empty() {
            return Err(Error::Argument("subtitle hash must not be empty".to_string()));
        }
        let token = self.require_token()?;
        let hashes = [hash.to_string()];
        let raw = self
            .transport()
            .check_subtitle_hashes(token, &hashes)
            .await?;
        let envelope = response::verify(raw)?;
        Ok(mapper::subtitle_hash_match(
            envelope.payload.get("data"),
            hash,
        )?)
    }

    /// Movie-metadata lookup by file fingerprint
    ///
    /// Returns the movies the service associates with the fingerprint,
    /// possibly none.
    ///
    /// # Errors
    ///
    /// `Argument` when `fingerprint` is empty; `NotAuthenticated` without a
    /// token; plus transport, verification, and mapping failures.
    pub async fn movies_by_fingerprint(&mut self, fingerprint: &str) -> Result<Vec<MovieInfo>> {
        if fingerprint.is_empty() {
            return Err(Error::Argument("fingerprint must not be empty".to_string()));
        }
        let token = self.require_token()?;
        let fingerprints = [fingerprint.to_string()];
        let raw = self
            .transport()
            .check_movie_hashes(token, &fingerprints)
            .await?;
        let envelope = response::verify(raw)?;
        Ok(mapper::movie_infos(envelope.payload.get("data"))?)
    }

    /// Enumerate the subtitle languages the service supports
    ///
    /// Language names are localized to `language`; `None` falls back to
    /// `"en"`.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a token; plus transport, verification, and
    /// mapping failures.
    pub async fn list_languages(&mut self, language: Option<&str>) -> Result<Vec<Language>> {
        self.require_token()?;
        let raw = self
            .transport()
            .get_sub_languages(language.unwrap_or(DEFAULT_LANGUAGE))
            .await?;
        let envelope = response::verify(raw)?;
        Ok(mapper::languages(envelope.payload.get("data"))?)
    }

    /// Free-text search against the external movie catalog
    ///
    /// The service signals "no match" with a single entry carrying an empty
    /// id; that sentinel is normalized to an empty list.
    ///
    /// # Errors
    ///
    /// `Argument` when `query` is empty; `NotAuthenticated` without a token;
    /// plus transport, verification, and mapping failures.
    pub async fn search_movies(&mut self, query: &str) -> Result<Vec<Movie>> {
        if query.is_empty() {
            return Err(Error::Argument("query must not be empty".to_string()));
        }
        let token = self.require_token()?;
        let raw = self.transport().search_movies_on_imdb(token, query).await?;
        let envelope = response::verify(raw)?;
        Ok(mapper::movies(envelope.payload.get("data"))?)
    }
}
