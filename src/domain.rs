use std::fmt;

use serde::Serialize;

use crate::error::CaldbError;

/// Mission slug as it appears in the archive URL path, e.g. `nustar`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MissionId(String);

impl MissionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `data` mission holds non-instrument bundles that must never be
    /// passed to the indexing tool.
    pub fn is_data(&self) -> bool {
        self.0 == "data"
    }
}

impl fmt::Display for MissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TelescopeId(String);

impl TelescopeId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TelescopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Link-table key. Unique per run; a later catalog entry for the same pair
/// replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BundleKey {
    pub mission: MissionId,
    pub telescope: TelescopeId,
}

impl fmt::Display for BundleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.mission, self.telescope)
    }
}

/// One "tar file" anchor scraped from the catalog index page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveLink {
    pub key: BundleKey,
    pub url: String,
    file_name: String,
}

impl ArchiveLink {
    /// Splits the URL path from the right into prefix, mission, telescope and
    /// file name. A path with fewer than three trailing segments is malformed
    /// catalog data and fails loudly.
    pub fn parse(url: &str) -> Result<Self, CaldbError> {
        let mut parts = url.rsplitn(4, '/');
        let file_name = parts.next().filter(|part| !part.is_empty());
        let telescope = parts.next().filter(|part| !part.is_empty());
        let mission = parts.next().filter(|part| !part.is_empty());
        let prefix = parts.next();
        match (prefix, mission, telescope, file_name) {
            (Some(_), Some(mission), Some(telescope), Some(file_name)) => Ok(Self {
                key: BundleKey {
                    mission: MissionId::new(mission),
                    telescope: TelescopeId::new(telescope),
                },
                url: url.to_string(),
                file_name: file_name.to_string(),
            }),
            _ => Err(CaldbError::MalformedLink(url.to_string())),
        }
    }

    /// Last path segment of the URL; presence of a file with this name in the
    /// CALDB root is the sole de-duplication signal.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}
