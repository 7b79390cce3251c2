use camino::Utf8PathBuf;

use crate::catalog::CATALOG_URL;

/// Environment variable naming the local calibration-database root.
pub const CALDB_ENV: &str = "CALDB";

#[derive(Debug, Clone)]
pub struct Config {
    /// Destination directory for downloads and extractions.
    pub root: Utf8PathBuf,
    pub catalog_url: String,
}

impl Config {
    /// Resolves the CALDB root from the command line or the environment.
    /// `None` means the tool has nowhere to sync to and should exit cleanly.
    pub fn resolve(root_override: Option<&str>, catalog_url: Option<&str>) -> Option<Self> {
        let root = root_override
            .map(str::to_string)
            .or_else(|| std::env::var(CALDB_ENV).ok())?;
        Some(Self {
            root: Utf8PathBuf::from(root),
            catalog_url: catalog_url.unwrap_or(CATALOG_URL).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_environment() {
        let config = Config::resolve(Some("/tmp/caldb"), None).unwrap();
        assert_eq!(config.root, Utf8PathBuf::from("/tmp/caldb"));
        assert_eq!(config.catalog_url, CATALOG_URL);
    }

    #[test]
    fn catalog_url_override() {
        let config = Config::resolve(Some("/tmp/caldb"), Some("http://localhost:9/index.html"))
            .unwrap();
        assert_eq!(config.catalog_url, "http://localhost:9/index.html");
    }
}
