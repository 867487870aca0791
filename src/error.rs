//! Error types for osdb-client
//!
//! This module provides error handling for the library, including:
//! - Caller-input validation errors (Argument, FileNotFound)
//! - Session lifecycle errors (Authentication, NotAuthenticated, SessionClosed)
//! - Remote response-protocol errors (NullResponse, InvalidResponse,
//!   MalformedStatus, RemoteService)
//! - Payload mapping errors with field-level context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for osdb-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for osdb-client
///
/// This is the primary error type used throughout the library. Each variant
/// includes contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid caller input (empty required string, missing directory, etc.)
    #[error("invalid argument: {0}")]
    Argument(String),

    /// Login rejected by the remote service
    #[error("authentication failed: {status}")]
    Authentication {
        /// The status line the remote returned for the login attempt
        status: String,
    },

    /// Operation attempted on a session that holds no token
    #[error("session is not authenticated")]
    NotAuthenticated,

    /// Login attempted on a closed session; closed is terminal
    #[error("session is closed; create a fresh session")]
    SessionClosed,

    /// The transport yielded no response envelope at all
    #[error("transport returned no response")]
    NullResponse,

    /// The response envelope is malformed (e.g. status present but empty)
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The status line does not start with a numeric code
    #[error("malformed status line {status:?}")]
    MalformedStatus {
        /// The status string whose leading characters failed to parse
        status: String,
        /// The underlying integer parse failure
        #[source]
        source: std::num::ParseIntError,
    },

    /// The remote service reported a failure status (code >= 400)
    #[error("remote service error {code}: {message}")]
    RemoteService {
        /// Numeric status code parsed from the status line
        code: u16,
        /// The full status line as received
        message: String,
    },

    /// A result payload does not match the expected record shape
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),

    /// A local file required for fingerprinting does not exist
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error (local files, artifact decompression)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error during artifact transfer
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Payload-shape mapping errors
///
/// Produced by the mapper when a loosely-typed remote record cannot be
/// converted into its fixed domain shape.
#[derive(Debug, Error)]
pub enum MappingError {
    /// A required field is absent from the record
    #[error("missing field {field:?} in {shape} record")]
    MissingField {
        /// The record shape being mapped (e.g. "subtitle", "login")
        shape: &'static str,
        /// The field that was expected
        field: &'static str,
    },

    /// A required numeric field could not be parsed as an integer
    #[error("field {field:?} in {shape} record is not an integer: {value:?}")]
    InvalidInteger {
        /// The record shape being mapped
        shape: &'static str,
        /// The field that failed to parse
        field: &'static str,
        /// The raw value as received
        value: String,
    },

    /// The payload is not structured the way the operation expects
    #[error("unexpected payload shape: {0}")]
    UnexpectedShape(String),
}
