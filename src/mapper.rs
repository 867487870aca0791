//! Conversion of loosely-typed response payloads into fixed domain records
//!
//! The remote service delivers result rows as arbitrary key/value maps, with
//! numeric fields sometimes encoded as strings and sometimes as numbers.
//! Everything here is a pure function over [`serde_json::Value`]; a shape
//! mismatch fails the whole operation — no truncated result lists.

use serde_json::Value;

use crate::error::MappingError;
use crate::types::{Language, Movie, MovieInfo, Subtitle};

/// Map one subtitle-search result row
pub(crate) fn subtitle(value: &Value) -> Result<Subtitle, MappingError> {
    const SHAPE: &str = "subtitle";
    Ok(Subtitle {
        id: str_field(value, SHAPE, "IDSubtitle")?,
        hash: str_field(value, SHAPE, "SubHash")?,
        file_name: str_field(value, SHAPE, "SubFileName")?,
        download_url: str_field(value, SHAPE, "SubDownloadLink")?,
        page_url: str_field(value, SHAPE, "SubtitlesLink")?,
        language_id: str_field(value, SHAPE, "SubLanguageID")?,
        language_name: str_field(value, SHAPE, "LanguageName")?,
        imdb_id: str_field(value, SHAPE, "IDMovieImdb")?,
        movie_id: str_field(value, SHAPE, "IDMovie")?,
        movie_title: str_field(value, SHAPE, "MovieName")?,
        movie_original_title: str_field(value, SHAPE, "MovieNameEng")?,
        movie_year: int_field(value, SHAPE, "MovieYear")?,
    })
}

/// Map a subtitle-search payload into an ordered result list
///
/// The service encodes "no results" as an absent `data` key, `null`, or the
/// literal `false`; all three yield an empty list.
pub(crate) fn subtitles(data: Option<&Value>) -> Result<Vec<Subtitle>, MappingError> {
    match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Vec::new()),
        Some(Value::Array(rows)) => rows.iter().map(subtitle).collect(),
        Some(other) => Err(MappingError::UnexpectedShape(format!(
            "subtitle search data is neither a list nor absent: {other}"
        ))),
    }
}

/// Map one movie-metadata record resolved for `fingerprint`
pub(crate) fn movie_info(fingerprint: &str, value: &Value) -> Result<MovieInfo, MappingError> {
    const SHAPE: &str = "movie-info";
    Ok(MovieInfo {
        fingerprint: fingerprint.to_string(),
        imdb_id: str_field(value, SHAPE, "MovieImdbID")?,
        title: str_field(value, SHAPE, "MovieName")?,
        year: int_field(value, SHAPE, "MovieYear")?,
    })
}

/// Map a movie-metadata-by-fingerprint payload
///
/// The payload is a map keyed by fingerprint. A key whose value is an empty
/// list means "no match for that fingerprint" and is skipped — a protocol
/// artifact of the remote's inability to omit the key.
pub(crate) fn movie_infos(data: Option<&Value>) -> Result<Vec<MovieInfo>, MappingError> {
    match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Vec::new()),
        Some(Value::Object(entries)) => {
            let mut infos = Vec::new();
            for (fingerprint, value) in entries {
                match value {
                    Value::Array(rows) if rows.is_empty() => continue,
                    Value::Object(_) => infos.push(movie_info(fingerprint, value)?),
                    other => {
                        return Err(MappingError::UnexpectedShape(format!(
                            "movie-info entry for {fingerprint:?} is not a record: {other}"
                        )));
                    }
                }
            }
            Ok(infos)
        }
        Some(other) => Err(MappingError::UnexpectedShape(format!(
            "movie-info data is not a map: {other}"
        ))),
    }
}

/// Map one supported-language row
pub(crate) fn language(value: &Value) -> Result<Language, MappingError> {
    const SHAPE: &str = "language";
    Ok(Language {
        id: str_field(value, SHAPE, "SubLanguageID")?,
        name: str_field(value, SHAPE, "LanguageName")?,
        iso639: str_field(value, SHAPE, "ISO639")?,
    })
}

/// Map a supported-language payload
pub(crate) fn languages(data: Option<&Value>) -> Result<Vec<Language>, MappingError> {
    match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(Vec::new()),
        Some(Value::Array(rows)) => rows.iter().map(language).collect(),
        Some(other) => Err(MappingError::UnexpectedShape(format!(
            "language data is not a list: {other}"
        ))),
    }
}

/// Map one movie-catalog result row
pub(crate) fn movie(value: &Value) -> Result<Movie, MappingError> {
    const SHAPE: &str = "movie";
    Ok(Movie {
        imdb_id: str_field(value, SHAPE, "id")?,
        title: str_field(value, SHAPE, "title")?,
    })
}

/// Map a movie-catalog payload, normalizing the "no match" sentinel
///
/// A result set of exactly one entry with an empty id is the service's way of
/// saying "no match" (it cannot return an empty list); that sentinel becomes
/// an empty list here. The special case applies only to this operation.
pub(crate) fn movies(data: Option<&Value>) -> Result<Vec<Movie>, MappingError> {
    let rows = match data {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(Vec::new()),
        Some(Value::Array(rows)) => rows,
        Some(other) => {
            return Err(MappingError::UnexpectedShape(format!(
                "movie catalog data is not a list: {other}"
            )));
        }
    };

    let mapped: Vec<Movie> = rows.iter().map(movie).collect::<Result<_, _>>()?;
    if mapped.len() == 1 && mapped[0].imdb_id.is_empty() {
        return Ok(Vec::new());
    }
    Ok(mapped)
}

/// Extract the session token from a login payload
pub(crate) fn login_token(payload: &Value) -> Result<String, MappingError> {
    match payload.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(MappingError::MissingField {
            shape: "login",
            field: "token",
        }),
    }
}

/// Extract the matched subtitle identifier from an exact-hash-lookup payload
///
/// Returns 0 when the hash is unmatched, including when the service omits the
/// key entirely.
pub(crate) fn subtitle_hash_match(data: Option<&Value>, hash: &str) -> Result<u64, MappingError> {
    let Some(value) = data.and_then(|d| d.get(hash)) else {
        return Ok(0);
    };
    match value {
        Value::Null => Ok(0),
        Value::Number(n) => n.as_u64().ok_or_else(|| MappingError::InvalidInteger {
            shape: "hash-match",
            field: "id",
            value: n.to_string(),
        }),
        Value::String(s) => s.parse::<u64>().map_err(|_| MappingError::InvalidInteger {
            shape: "hash-match",
            field: "id",
            value: s.clone(),
        }),
        other => Err(MappingError::UnexpectedShape(format!(
            "hash-match entry is not an identifier: {other}"
        ))),
    }
}

/// Required string field; JSON numbers are rendered through, `null` is missing
fn str_field(value: &Value, shape: &'static str, field: &'static str) -> Result<String, MappingError> {
    match value.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(MappingError::MissingField { shape, field }),
    }
}

/// Required integer field; accepts both string and number encodings
fn int_field(value: &Value, shape: &'static str, field: &'static str) -> Result<i32, MappingError> {
    match value.get(field) {
        Some(Value::Number(n)) => {
            n.as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .ok_or_else(|| MappingError::InvalidInteger {
                    shape,
                    field,
                    value: n.to_string(),
                })
        }
        Some(Value::String(s)) => s.parse::<i32>().map_err(|_| MappingError::InvalidInteger {
            shape,
            field,
            value: s.clone(),
        }),
        _ => Err(MappingError::MissingField { shape, field }),
    }
}
