//! Artifact retrieval: download a compressed subtitle and materialize it
//!
//! The service hands out gzip-compressed artifacts by URL (separate from the
//! RPC transport). Retrieval downloads the stream into a uniquely-named
//! temporary file, decompresses it into the destination directory, and
//! removes the temporary file on every exit path — success, download failure,
//! or decompression failure. The temp file is owned by a
//! [`tempfile::NamedTempFile`], so cleanup rides on Drop rather than on
//! hand-written unwind handling.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tokio::io::AsyncWriteExt;
use tokio::task::spawn_blocking;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::types::Subtitle;

/// Timeout for the artifact HTTP transfer
const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Chunk size for the decompression copy loop
const DECOMPRESS_CHUNK_SIZE: usize = 8192;

/// Downloads and decompresses subtitle artifacts
///
/// Holds a reqwest client; cheap to clone per the client's internal pooling.
///
/// # Examples
///
/// ```no_run
/// use osdb_client::SubtitleDownloader;
/// use std::path::Path;
///
/// # async fn example(subtitle: &osdb_client::Subtitle) -> osdb_client::Result<()> {
/// let downloader = SubtitleDownloader::new()?;
/// let path = downloader.retrieve(Path::new("/media/subs"), subtitle).await?;
/// println!("stored at {}", path.display());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SubtitleDownloader {
    client: reqwest::Client,
    temp_dir: PathBuf,
}

impl SubtitleDownloader {
    /// Create a downloader with a fixed request timeout
    ///
    /// # Errors
    ///
    /// Returns `Io` if the HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
            .build()
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "failed to create HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self {
            client,
            temp_dir: std::env::temp_dir(),
        })
    }

    /// Override the directory the temporary download file is created in
    ///
    /// Defaults to the system temp directory. Mostly useful for tests that
    /// observe the cleanup guarantee.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Retrieve `subtitle`'s artifact into `dest_dir`
    ///
    /// Downloads the compressed stream at the subtitle's download URL into a
    /// temporary file, decompresses it as a single-member gzip stream into
    /// `dest_dir/<subtitle.file_name>`, and returns the destination path.
    /// Content passes through unmodified — only the container is unwrapped.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `dest_dir` is empty or not an existing directory (`Argument`)
    /// - the subtitle carries no download URL (`Argument`)
    /// - the HTTP transfer fails or reports a non-success status (`Network`)
    /// - the payload is not a gzip stream or a file operation fails (`Io`)
    ///
    /// The temporary file is removed in every one of these cases.
    pub async fn retrieve(&self, dest_dir: &Path, subtitle: &Subtitle) -> Result<PathBuf> {
        if dest_dir.as_os_str().is_empty() {
            return Err(Error::Argument(
                "destination directory must not be empty".to_string(),
            ));
        }
        if !dest_dir.is_dir() {
            return Err(Error::Argument(format!(
                "destination directory does not exist: {}",
                dest_dir.display()
            )));
        }
        if subtitle.download_url.is_empty() {
            return Err(Error::Argument(
                "subtitle has no download URL".to_string(),
            ));
        }
        let url = url::Url::parse(&subtitle.download_url).map_err(|e| {
            Error::Argument(format!(
                "invalid download URL {:?}: {}",
                subtitle.download_url, e
            ))
        })?;

        // Owns the temp file for the whole retrieval; Drop removes it on
        // every exit path below.
        let temp = tempfile::Builder::new()
            .prefix("osdb-artifact-")
            .suffix(".gz")
            .tempfile_in(&self.temp_dir)?;

        self.download_to(url, temp.path()).await?;

        let dest_path = dest_dir.join(&subtitle.file_name);
        let compressed = temp.path().to_path_buf();
        let dest = dest_path.clone();
        spawn_blocking(move || decompress_to(&compressed, &dest))
            .await
            .map_err(|e| {
                Error::Io(std::io::Error::other(format!(
                    "decompression task panicked: {}",
                    e
                )))
            })??;

        info!(
            url = %subtitle.download_url,
            dest = %dest_path.display(),
            "artifact retrieved"
        );
        Ok(dest_path)
    }

    /// Stream the artifact body into the temporary file
    async fn download_to(&self, url: url::Url, temp_path: &Path) -> Result<()> {
        let mut response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let mut file = tokio::fs::File::create(temp_path).await?;
        let mut total = 0usize;
        while let Some(chunk) = response.chunk().await? {
            total += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(url = %url, bytes = total, "artifact downloaded to temporary file");
        Ok(())
    }
}

/// Decompress a single-member gzip stream in fixed-size chunks
///
/// Each chunk is written through unmodified. A payload that is not gzip fails
/// on the first read with the decoder's I/O error.
fn decompress_to(compressed: &Path, dest: &Path) -> Result<()> {
    let input = std::fs::File::open(compressed)?;
    let mut decoder = GzDecoder::new(std::io::BufReader::new(input));
    let mut output = std::fs::File::create(dest)?;

    let mut buf = [0u8; DECOMPRESS_CHUNK_SIZE];
    loop {
        let n = decoder.read(&mut buf)?;
        if n == 0 {
            break;
        }
        output.write_all(&buf[..n])?;
    }
    output.flush()?;
    Ok(())
}
