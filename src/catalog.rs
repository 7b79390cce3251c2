use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::{ArchiveLink, BundleKey};
use crate::error::CaldbError;

/// Index page naming the supported missions and their archive bundles.
pub const CATALOG_URL: &str =
    "https://heasarc.gsfc.nasa.gov/docs/heasarc/caldb/caldb_supported_missions.html";

/// Timeout for the index page fetch. Bundle downloads run without one.
pub const CATALOG_TIMEOUT: Duration = Duration::from_secs(90);

pub type LinkTable = BTreeMap<BundleKey, ArchiveLink>;

pub trait CatalogClient: Send + Sync {
    fn fetch_index(&self, url: &str) -> Result<String, CaldbError>;
    fn download(&self, url: &str, destination: &Path) -> Result<(), CaldbError>;
}

#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
}

impl HttpCatalogClient {
    pub fn new() -> Result<Self, CaldbError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("caldb-sync/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| CaldbError::CatalogHttp(err.to_string()))?,
        );
        // Archive bundles run to hundreds of megabytes; only the index
        // fetch carries a timeout, applied per request.
        let client = Client::builder()
            .default_headers(headers)
            .timeout(None)
            .build()
            .map_err(|err| CaldbError::CatalogHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl CatalogClient for HttpCatalogClient {
    fn fetch_index(&self, url: &str) -> Result<String, CaldbError> {
        tracing::info!("loading {url}");
        let response = self
            .client
            .get(url)
            .timeout(CATALOG_TIMEOUT)
            .send()
            .map_err(|err| {
                if err.is_timeout() {
                    CaldbError::CatalogTimeout(err.to_string())
                } else {
                    CaldbError::CatalogHttp(err.to_string())
                }
            })?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "catalog request failed".to_string());
            return Err(CaldbError::CatalogStatus { status, message });
        }
        // text() honors the charset declared in the response headers and
        // falls back to UTF-8.
        response
            .text()
            .map_err(|err| CaldbError::CatalogDecode(err.to_string()))
    }

    fn download(&self, url: &str, destination: &Path) -> Result<(), CaldbError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| CaldbError::DownloadHttp(err.to_string()))?;
        if !response.status().is_success() {
            return Err(CaldbError::DownloadStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }
        let mut file =
            File::create(destination).map_err(|err| CaldbError::Filesystem(err.to_string()))?;
        // Streamed by hand so a dropped connection mid-body reports as a
        // download failure while a bad disk reports as a filesystem one.
        let mut buf = [0u8; 8192];
        loop {
            let read = response
                .read(&mut buf)
                .map_err(|err| CaldbError::DownloadHttp(err.to_string()))?;
            if read == 0 {
                break;
            }
            file.write_all(&buf[..read])
                .map_err(|err| CaldbError::Filesystem(err.to_string()))?;
        }
        Ok(())
    }
}

/// Scans the index page for anchors labeled "tar file" and builds the link
/// table. Later occurrences of the same (mission, telescope) pair replace
/// earlier ones.
pub fn extract_links(page: &str) -> Result<LinkTable, CaldbError> {
    let anchor_re = Regex::new(r"(?i)<a[^>]*href=.*tar file").unwrap();
    let href_re = Regex::new(r#"(?i)href="(.*)""#).unwrap();

    let mut links = LinkTable::new();
    for line in page.lines() {
        if !anchor_re.is_match(line) {
            continue;
        }
        let Some(capture) = href_re.captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };
        // The greedy capture can run past the closing quote when the anchor
        // carries more attributes; truncate at the first stray quote.
        let url = match capture.as_str().split_once('"') {
            Some((head, _)) => head,
            None => capture.as_str(),
        };
        let link = ArchiveLink::parse(url)?;
        links.insert(link.key.clone(), link);
    }
    Ok(links)
}
