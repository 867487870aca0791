//! Core domain types for osdb-client

use serde::Serialize;

/// A subtitle search result as returned by the remote service
///
/// Immutable once constructed; produced only by the payload mapper. The
/// `download_url` points at the gzip-compressed artifact, `page_url` at the
/// human-readable info page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subtitle {
    /// Subtitle identifier assigned by the service
    pub id: String,
    /// Content hash of the subtitle file
    pub hash: String,
    /// File name the subtitle should be stored under
    pub file_name: String,
    /// URL of the compressed subtitle artifact
    pub download_url: String,
    /// URL of the subtitle's info page
    pub page_url: String,
    /// Language identifier (service-specific code)
    pub language_id: String,
    /// Human-readable language name
    pub language_name: String,
    /// External (IMDb) identifier of the linked movie
    pub imdb_id: String,
    /// Internal identifier of the linked movie
    pub movie_id: String,
    /// Title of the linked movie
    pub movie_title: String,
    /// Original (untranslated) title of the linked movie
    pub movie_original_title: String,
    /// Release year of the linked movie
    pub movie_year: i32,
}

/// Movie metadata resolved from a file fingerprint
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieInfo {
    /// The fingerprint this metadata was resolved for
    pub fingerprint: String,
    /// External (IMDb) identifier
    pub imdb_id: String,
    /// Movie title
    pub title: String,
    /// Release year
    pub year: i32,
}

/// A subtitle language supported by the service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Language {
    /// Service-specific language identifier
    pub id: String,
    /// Human-readable language name
    pub name: String,
    /// ISO 639 code
    pub iso639: String,
}

/// A movie-catalog search result
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Movie {
    /// External (IMDb) identifier
    pub imdb_id: String,
    /// Movie title
    pub title: String,
}

/// A single search request descriptor
///
/// Exactly one of the three search keys (fingerprint + size, external id,
/// free-text query) is populated; the other two stay empty strings on the
/// wire. Exclusivity is enforced by the three constructors — there is no way
/// to build a criteria with two keys set.
///
/// Serializes with the service's wire field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    /// Comma-joined language codes to filter by
    #[serde(rename = "sublanguageid")]
    languages: String,
    /// File fingerprint as 16-digit lowercase hex, or empty
    #[serde(rename = "moviehash")]
    movie_hash: String,
    /// Size in bytes of the fingerprinted file, or empty
    #[serde(rename = "moviebytesize")]
    movie_byte_size: String,
    /// External movie identifier, or empty
    #[serde(rename = "imdbid")]
    imdb_id: String,
    /// Free-text query, or empty
    #[serde(rename = "query")]
    query: String,
}

impl SearchCriteria {
    fn empty(languages: &[&str]) -> Self {
        Self {
            languages: languages.join(","),
            movie_hash: String::new(),
            movie_byte_size: String::new(),
            imdb_id: String::new(),
            query: String::new(),
        }
    }

    /// Build a fingerprint-mode criteria from a precomputed hash and file size
    pub fn for_fingerprint(languages: &[&str], fingerprint: &str, byte_size: u64) -> Self {
        Self {
            movie_hash: fingerprint.to_string(),
            movie_byte_size: byte_size.to_string(),
            ..Self::empty(languages)
        }
    }

    /// Build an external-id-mode criteria
    pub fn for_imdb_id(languages: &[&str], imdb_id: &str) -> Self {
        Self {
            imdb_id: imdb_id.to_string(),
            ..Self::empty(languages)
        }
    }

    /// Build a free-text-mode criteria
    pub fn for_query(languages: &[&str], query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..Self::empty(languages)
        }
    }

    /// The comma-joined language filter
    pub fn languages(&self) -> &str {
        &self.languages
    }

    /// The file fingerprint, empty unless fingerprint mode
    pub fn movie_hash(&self) -> &str {
        &self.movie_hash
    }

    /// The fingerprinted file's size in bytes, empty unless fingerprint mode
    pub fn movie_byte_size(&self) -> &str {
        &self.movie_byte_size
    }

    /// The external movie identifier, empty unless external-id mode
    pub fn imdb_id(&self) -> &str {
        &self.imdb_id
    }

    /// The free-text query, empty unless query mode
    pub fn query(&self) -> &str {
        &self.query
    }
}
