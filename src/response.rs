//! Response verification for the service's ad-hoc status-code protocol

use crate::error::{Error, Result};
use crate::transport::ResponseEnvelope;

/// Verify a raw response envelope against the status-code protocol
///
/// Rules, in order:
/// - no envelope at all → [`Error::NullResponse`]
/// - no status line → success (some remote operations omit it; deliberate)
/// - status line present but empty → [`Error::InvalidResponse`]
/// - leading three characters not numeric → [`Error::MalformedStatus`]
/// - numeric code >= 400 → [`Error::RemoteService`]
/// - otherwise success, returning the envelope for payload mapping
///
/// Note the asymmetry between an absent status (OK) and a present-but-empty
/// one (error): the remote omits the field on some operations but never sends
/// it blank, so blank means a mangled response.
pub fn verify(envelope: Option<ResponseEnvelope>) -> Result<ResponseEnvelope> {
    let envelope = envelope.ok_or(Error::NullResponse)?;

    let Some(status) = envelope.status.as_deref() else {
        return Ok(envelope);
    };

    if status.is_empty() {
        return Err(Error::InvalidResponse(
            "status line present but empty".to_string(),
        ));
    }

    let code = parse_status_code(status)?;
    if code >= 400 {
        return Err(Error::RemoteService {
            code,
            message: status.to_string(),
        });
    }

    Ok(envelope)
}

/// Parse the leading three characters of a status line as a numeric code
fn parse_status_code(status: &str) -> Result<u16> {
    let prefix = status.get(..3).unwrap_or(status);
    prefix.parse::<u16>().map_err(|source| Error::MalformedStatus {
        status: status.to_string(),
        source,
    })
}
