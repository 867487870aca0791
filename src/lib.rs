//! # osdb-client
//!
//! Session-scoped client library for OSDb-style subtitle lookup services.
//!
//! ## Design Philosophy
//!
//! osdb-client is designed to be:
//! - **Transport-agnostic** - the RPC stack is a trait you implement
//! - **Session-explicit** - the token lives in a [`Session`] value you own,
//!   not in process-wide state
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **One call, one request** - no retries, no batching, no caching
//!
//! ## Quick Start
//!
//! ```no_run
//! use osdb_client::{Session, SubtitleDownloader, Transport};
//! use std::path::Path;
//!
//! # async fn example<T: Transport>(transport: T) -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = Session::new(transport);
//! session.log_in("en", "my-app v1.0").await?;
//!
//! let results = session.search_by_query(&["en"], "Inception").await?;
//! if let Some(subtitle) = results.first() {
//!     let downloader = SubtitleDownloader::new()?;
//!     let stored = downloader.retrieve(Path::new("/media/subs"), subtitle).await?;
//!     println!("stored at {}", stored.display());
//! }
//!
//! session.close().await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Artifact retrieval (download + decompress)
pub mod download;
/// Error types
pub mod error;
/// File fingerprinting collaborator
pub mod fingerprint;
/// Loosely-typed payload mapping
mod mapper;
/// Response verification (status-code protocol)
pub mod response;
/// Token-bearing session and its operations
pub mod session;
/// Transport abstraction and response envelope
pub mod transport;
/// Domain records and search criteria
pub mod types;

// Re-export commonly used types
pub use download::SubtitleDownloader;
pub use error::{Error, MappingError, Result};
pub use fingerprint::MovieHasher;
pub use session::Session;
pub use transport::{ResponseEnvelope, Transport};
pub use types::{Language, Movie, MovieInfo, SearchCriteria, Subtitle};
