//! Token-bearing session over a [`Transport`]
//!
//! A session is created unauthenticated, becomes authenticated on a
//! successful [`log_in`](Session::log_in), and is closed — terminally — by
//! [`close`](Session::close). The token is owned exclusively by the session;
//! every search and lookup operation attaches it and refuses to run without
//! it. There is no ambient global state: callers hold the session and pass it
//! where it is needed.

mod search;

#[cfg(test)]
mod tests;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::mapper;
use crate::response;
use crate::transport::Transport;

/// A session-scoped client for the subtitle service
///
/// Generic over the transport so embedders bring their own RPC stack and
/// tests bring stubs. Methods take `&mut self`: one session, one caller at a
/// time — the token is never shared across concurrent requests.
///
/// # Examples
///
/// ```no_run
/// use osdb_client::{Session, Transport};
///
/// # async fn example<T: Transport>(transport: T) -> osdb_client::Result<()> {
/// let mut session = Session::new(transport);
/// session.log_in("en", "my-app v1.0").await?;
///
/// let results = session.search_by_query(&["en"], "Inception").await?;
/// println!("{} subtitles found", results.len());
///
/// // Teardown never fails; run it on every exit path.
/// session.close().await;
/// # Ok(())
/// # }
/// ```
pub struct Session<T: Transport> {
    transport: T,
    token: Option<String>,
    closed: bool,
}

impl<T: Transport> Session<T> {
    /// Create an unauthenticated session over `transport`
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
            closed: false,
        }
    }

    /// Whether the session currently holds a token
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Whether the session has been closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Authenticate anonymously and store the returned token
    ///
    /// Sends empty credentials plus the interface `language` and `user_agent`
    /// identifiers. A failure status from the remote surfaces as
    /// [`Error::Authentication`] and leaves the session unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the session was already closed (`SessionClosed`; closed is terminal)
    /// - the remote rejects the login (`Authentication`)
    /// - the response is absent or malformed
    /// - the login payload carries no token (`Mapping`)
    pub async fn log_in(&mut self, language: &str, user_agent: &str) -> Result<()> {
        if self.closed {
            return Err(Error::SessionClosed);
        }

        let raw = self
            .transport
            .log_in("", "", language, user_agent)
            .await?;
        let envelope = response::verify(raw).map_err(|e| match e {
            Error::RemoteService { message, .. } => Error::Authentication { status: message },
            other => other,
        })?;

        let token = mapper::login_token(&envelope.payload)?;
        info!(language, user_agent, "session authenticated");
        self.token = Some(token);
        Ok(())
    }

    /// Close the session, releasing the token best-effort
    ///
    /// Idempotent and unconditionally non-failing. If a token is held, a
    /// remote logout is attempted; any failure is swallowed and logged — an
    /// unreachable logout is equivalent to a token that expires server-side.
    /// The token is cleared either way and the session is terminally closed.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }

        if let Some(token) = self.token.take() {
            match self.transport.log_out(&token).await {
                Ok(raw) => {
                    if let Err(e) = response::verify(raw) {
                        debug!(error = %e, "logout rejected; token will expire server-side");
                    } else {
                        debug!("session logged out");
                    }
                }
                Err(e) => {
                    debug!(error = %e, "logout failed; token will expire server-side");
                }
            }
        }

        self.closed = true;
    }

    /// The held token, or `NotAuthenticated`
    fn require_token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(Error::NotAuthenticated)
    }

    /// The transport, for operations in sibling modules
    fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Drop for Session<T> {
    fn drop(&mut self) {
        // Async logout cannot run here; close() is the teardown path.
        if self.token.is_some() {
            warn!("session dropped without close(); token left to expire server-side");
        }
    }
}
