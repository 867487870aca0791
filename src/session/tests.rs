// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{Error, Result};
use crate::session::Session;
use crate::transport::{ResponseEnvelope, Transport};
use crate::types::SearchCriteria;

/// Canned transport recording every call it receives
struct StubTransport {
    login_status: String,
    logout_fails: bool,
    search_data: Value,
    hash_data: Value,
    movie_hash_data: Value,
    languages_data: Value,
    movies_data: Value,
    calls: Mutex<Vec<String>>,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self {
            login_status: "200 OK".to_string(),
            logout_fails: false,
            search_data: json!(false),
            hash_data: json!({}),
            movie_hash_data: json!({}),
            languages_data: json!([]),
            movies_data: json!([]),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubTransport {
    fn with_login_status(mut self, status: &str) -> Self {
        self.login_status = status.to_string();
        self
    }

    fn with_failing_logout(mut self) -> Self {
        self.logout_fails = true;
        self
    }

    fn with_search_data(mut self, data: Value) -> Self {
        self.search_data = data;
        self
    }

    fn with_hash_data(mut self, data: Value) -> Self {
        self.hash_data = data;
        self
    }

    fn with_movie_hash_data(mut self, data: Value) -> Self {
        self.movie_hash_data = data;
        self
    }

    fn with_languages_data(mut self, data: Value) -> Self {
        self.languages_data = data;
        self
    }

    fn with_movies_data(mut self, data: Value) -> Self {
        self.movies_data = data;
        self
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn log_in(
        &self,
        username: &str,
        password: &str,
        language: &str,
        user_agent: &str,
    ) -> Result<Option<ResponseEnvelope>> {
        self.record(format!("login:{username}:{password}:{language}:{user_agent}"));
        let payload = if self.login_status.starts_with('2') {
            json!({"token": "TOK123", "seconds": 0.104})
        } else {
            json!({})
        };
        Ok(Some(ResponseEnvelope::new(&self.login_status, payload)))
    }

    async fn log_out(&self, token: &str) -> Result<Option<ResponseEnvelope>> {
        self.record(format!("logout:{token}"));
        if self.logout_fails {
            return Err(Error::Io(std::io::Error::other("connection reset")));
        }
        Ok(Some(ResponseEnvelope::new("200 OK", json!({}))))
    }

    async fn search_subtitles(
        &self,
        token: &str,
        criteria: &[SearchCriteria],
    ) -> Result<Option<ResponseEnvelope>> {
        let c = &criteria[0];
        self.record(format!(
            "search:{token}:{}:{}:{}:{}:{}",
            c.languages(),
            c.movie_hash(),
            c.movie_byte_size(),
            c.imdb_id(),
            c.query()
        ));
        Ok(Some(ResponseEnvelope::new(
            "200 OK",
            json!({"data": self.search_data}),
        )))
    }

    async fn check_subtitle_hashes(
        &self,
        token: &str,
        hashes: &[String],
    ) -> Result<Option<ResponseEnvelope>> {
        self.record(format!("check_sub_hash:{token}:{}", hashes.join(",")));
        Ok(Some(ResponseEnvelope::new(
            "200 OK",
            json!({"data": self.hash_data}),
        )))
    }

    async fn check_movie_hashes(
        &self,
        token: &str,
        fingerprints: &[String],
    ) -> Result<Option<ResponseEnvelope>> {
        self.record(format!("check_movie_hash:{token}:{}", fingerprints.join(",")));
        Ok(Some(ResponseEnvelope::new(
            "200 OK",
            json!({"data": self.movie_hash_data}),
        )))
    }

    async fn get_sub_languages(&self, language: &str) -> Result<Option<ResponseEnvelope>> {
        self.record(format!("get_languages:{language}"));
        Ok(Some(ResponseEnvelope::new(
            "200 OK",
            json!({"data": self.languages_data}),
        )))
    }

    async fn search_movies_on_imdb(
        &self,
        token: &str,
        query: &str,
    ) -> Result<Option<ResponseEnvelope>> {
        self.record(format!("search_movies:{token}:{query}"));
        Ok(Some(ResponseEnvelope::new(
            "200 OK",
            json!({"data": self.movies_data}),
        )))
    }
}

fn zero_hasher(_: &Path) -> Result<u64> {
    Ok(0)
}

fn inception_hasher(_: &Path) -> Result<u64> {
    Ok(0x18379AC9AF039390)
}

fn subtitle_row(id: &str, year: &str) -> Value {
    json!({
        "IDSubtitle": id,
        "SubHash": "a9672c89bc3f5438f820f06bab708067",
        "SubFileName": "Inception.2010.720p.srt",
        "SubDownloadLink": format!("http://dl.example.org/file/{id}.gz"),
        "SubtitlesLink": format!("http://www.example.org/subtitles/{id}"),
        "SubLanguageID": "eng",
        "LanguageName": "English",
        "IDMovieImdb": "1375666",
        "IDMovie": "71484",
        "MovieName": "Inception",
        "MovieNameEng": "Inception",
        "MovieYear": year,
    })
}

#[tokio::test]
async fn login_stores_token_and_sends_anonymous_credentials() {
    let mut session = Session::new(StubTransport::default());
    assert!(!session.is_authenticated());

    session.log_in("en", "test-agent v1").await.unwrap();

    assert!(session.is_authenticated());
    let transport = session.transport();
    assert_eq!(transport.calls(), vec!["login:::en:test-agent v1"]);
    session.close().await;
}

#[tokio::test]
async fn rejected_login_surfaces_authentication_error() {
    let mut session = Session::new(
        StubTransport::default().with_login_status("401 Unauthorized"),
    );

    let result = session.log_in("en", "test-agent v1").await;
    match result {
        Err(Error::Authentication { status }) => assert_eq!(status, "401 Unauthorized"),
        other => panic!("expected Authentication error, got {other:?}"),
    }
    assert!(!session.is_authenticated());

    // Still unauthenticated: operations must refuse to run.
    let search = session.search_by_query(&["en"], "Inception").await;
    assert!(matches!(search, Err(Error::NotAuthenticated)));
}

#[tokio::test]
async fn operations_require_authentication() {
    let mut session = Session::new(StubTransport::default());

    assert!(matches!(
        session.search_by_query(&["en"], "Inception").await,
        Err(Error::NotAuthenticated)
    ));
    assert!(matches!(
        session.check_subtitle_hash("a9672c89bc3f5438").await,
        Err(Error::NotAuthenticated)
    ));
    assert!(matches!(
        session.list_languages(None).await,
        Err(Error::NotAuthenticated)
    ));
}

#[tokio::test]
async fn close_is_idempotent_and_logs_out_once() {
    let mut session = Session::new(StubTransport::default());
    session.log_in("en", "test-agent v1").await.unwrap();

    session.close().await;
    session.close().await;

    assert!(session.is_closed());
    assert!(!session.is_authenticated());
    let calls = session.transport().calls();
    assert_eq!(
        calls.iter().filter(|c| c.starts_with("logout:")).count(),
        1
    );
    assert!(calls.contains(&"logout:TOK123".to_string()));
}

#[tokio::test]
async fn close_swallows_logout_failure() {
    let mut session = Session::new(StubTransport::default().with_failing_logout());
    session.log_in("en", "test-agent v1").await.unwrap();

    // Must not fail even though the transport does.
    session.close().await;
    assert!(session.is_closed());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn close_without_login_skips_logout() {
    let mut session = Session::new(StubTransport::default());
    session.close().await;

    assert!(session.is_closed());
    assert!(session.transport().calls().is_empty());
}

#[tokio::test]
async fn closed_session_rejects_everything() {
    let mut session = Session::new(StubTransport::default());
    session.log_in("en", "test-agent v1").await.unwrap();
    session.close().await;

    assert!(matches!(
        session.search_by_query(&["en"], "Inception").await,
        Err(Error::NotAuthenticated)
    ));
    assert!(matches!(
        session.log_in("en", "test-agent v1").await,
        Err(Error::SessionClosed)
    ));
}

#[tokio::test]
async fn empty_search_arguments_are_rejected() {
    let mut session = Session::new(StubTransport::default());
    session.log_in("en", "test-agent v1").await.unwrap();

    assert!(matches!(
        session.search_by_query(&["en"], "").await,
        Err(Error::Argument(_))
    ));
    assert!(matches!(
        session.search_by_imdb_id(&["en"], "").await,
        Err(Error::Argument(_))
    ));
    assert!(matches!(
        session.search_by_file(&["en"], "", &zero_hasher).await,
        Err(Error::Argument(_))
    ));
    session.close().await;
}

#[tokio::test]
async fn fingerprint_search_requires_an_existing_file() {
    let mut session = Session::new(StubTransport::default());
    session.log_in("en", "test-agent v1").await.unwrap();

    let result = session
        .search_by_file(&["en"], "/no/such/movie.mkv", &zero_hasher)
        .await;
    assert!(matches!(result, Err(Error::FileNotFound(_))));
    session.close().await;
}

#[tokio::test]
async fn fingerprint_search_sends_hex_hash_and_byte_size() {
    let dir = tempfile::tempdir().unwrap();
    let movie = dir.path().join("movie.mkv");
    std::fs::write(&movie, vec![0u8; 4096]).unwrap();

    let mut session = Session::new(StubTransport::default());
    session.log_in("en", "test-agent v1").await.unwrap();

    session
        .search_by_file(&["en", "tr"], &movie, &inception_hasher)
        .await
        .unwrap();

    let calls = session.transport().calls();
    assert!(
        calls.contains(&"search:TOK123:en,tr:18379ac9af039390:4096::".to_string()),
        "unexpected calls: {calls:?}"
    );
    session.close().await;
}

#[tokio::test]
async fn query_search_maps_results_in_received_order() {
    let data = json!([subtitle_row("101", "2010"), subtitle_row("102", "2010")]);
    let mut session = Session::new(StubTransport::default().with_search_data(data));
    session.log_in("en", "test-agent v1").await.unwrap();

    let results = session.search_by_query(&["en"], "Inception").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "101");
    assert_eq!(results[1].id, "102");
    assert_eq!(results[0].movie_year, 2010);
    session.close().await;
}

#[tokio::test]
async fn no_result_search_yields_empty_list() {
    let mut session = Session::new(StubTransport::default());
    session.log_in("en", "test-agent v1").await.unwrap();

    let results = session.search_by_imdb_id(&["en"], "1375666").await.unwrap();
    assert!(results.is_empty());
    session.close().await;
}

#[tokio::test]
async fn subtitle_hash_lookup_returns_zero_when_unmatched() {
    let mut session = Session::new(
        StubTransport::default().with_hash_data(json!({"a9672c89bc3f5438": "0"})),
    );
    session.log_in("en", "test-agent v1").await.unwrap();

    let id = session.check_subtitle_hash("a9672c89bc3f5438").await.unwrap();
    assert_eq!(id, 0);
    session.close().await;
}

#[tokio::test]
async fn subtitle_hash_lookup_returns_matched_identifier() {
    let mut session = Session::new(
        StubTransport::default().with_hash_data(json!({"a9672c89bc3f5438": "1951894322"})),
    );
    session.log_in("en", "test-agent v1").await.unwrap();

    let id = session.check_subtitle_hash("a9672c89bc3f5438").await.unwrap();
    assert_eq!(id, 1951894322);
    session.close().await;
}

#[tokio::test]
async fn movie_metadata_lookup_maps_fingerprint_entries() {
    let data = json!({
        "18379ac9af039390": {
            "MovieImdbID": "1375666",
            "MovieName": "Inception",
            "MovieYear": "2010",
        }
    });
    let mut session = Session::new(StubTransport::default().with_movie_hash_data(data));
    session.log_in("en", "test-agent v1").await.unwrap();

    let infos = session.movies_by_fingerprint("18379ac9af039390").await.unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].title, "Inception");
    assert_eq!(infos[0].year, 2010);
    session.close().await;
}

#[tokio::test]
async fn language_listing_defaults_to_fallback_locale() {
    let data = json!([
        {"SubLanguageID": "eng", "LanguageName": "English", "ISO639": "en"},
    ]);
    let mut session = Session::new(StubTransport::default().with_languages_data(data));
    session.log_in("en", "test-agent v1").await.unwrap();

    let languages = session.list_languages(None).await.unwrap();
    assert_eq!(languages.len(), 1);

    session.list_languages(Some("tr")).await.unwrap();

    let calls = session.transport().calls();
    assert!(calls.contains(&"get_languages:en".to_string()));
    assert!(calls.contains(&"get_languages:tr".to_string()));
    session.close().await;
}

#[tokio::test]
async fn movie_catalog_search_normalizes_no_match_sentinel() {
    let sentinel = json!([{"id": "", "title": "no results"}]);
    let mut session = Session::new(StubTransport::default().with_movies_data(sentinel));
    session.log_in("en", "test-agent v1").await.unwrap();

    let movies = session.search_movies("Inceptionnnn").await.unwrap();
    assert!(movies.is_empty());
    session.close().await;
}

#[tokio::test]
async fn end_to_end_search_and_retrieve() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PLAINTEXT: &[u8] =
        b"1\n00:00:01,000 --> 00:00:04,000\nYou mustn't be afraid to dream a little bigger.\n";

    // Artifact server standing in for the download host.
    let server = MockServer::start().await;
    let gz = {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        use std::io::Write;
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(PLAINTEXT).unwrap();
        encoder.finish().unwrap()
    };
    Mock::given(method("GET"))
        .and(path("/file/101.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(gz))
        .mount(&server)
        .await;

    let mut first = subtitle_row("101", "2010");
    first["SubDownloadLink"] = json!(format!("{}/file/101.gz", server.uri()));
    let data = json!([first, subtitle_row("102", "2010")]);

    let mut session = Session::new(StubTransport::default().with_search_data(data));
    session.log_in("en", "test-agent v1").await.unwrap();
    assert!(session.is_authenticated());

    let results = session.search_by_query(&["en"], "Inception").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].movie_year, 2010);
    assert_eq!(results[1].movie_year, 2010);

    let dest = tempfile::tempdir().unwrap();
    let scratch = tempfile::tempdir().unwrap();
    let downloader = crate::download::SubtitleDownloader::new()
        .unwrap()
        .with_temp_dir(scratch.path());
    let stored = downloader.retrieve(dest.path(), &results[0]).await.unwrap();

    assert_eq!(stored, dest.path().join("Inception.2010.720p.srt"));
    assert_eq!(std::fs::read(&stored).unwrap(), PLAINTEXT);
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);

    session.close().await;
    assert!(session.is_closed());
}
