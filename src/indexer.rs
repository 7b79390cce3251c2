use std::path::PathBuf;
use std::process::Command;

use crate::domain::{MissionId, TelescopeId};
use crate::error::CaldbError;

pub trait CatalogIndexer: Send + Sync {
    /// Registers one instrument with the calibration database and returns the
    /// tool's combined output text.
    fn initialize(
        &self,
        mission: &MissionId,
        telescope: &TelescopeId,
    ) -> Result<String, CaldbError>;
}

/// Runs `caldbinfo INST <MISSION> <TELESCOPE>`. The exit status is ignored;
/// the caller inspects the output text for the `ERROR` marker instead.
#[derive(Clone)]
pub struct CaldbinfoIndexer {
    caldbinfo: Option<PathBuf>,
}

impl CaldbinfoIndexer {
    pub fn new() -> Self {
        Self {
            caldbinfo: find_in_path("caldbinfo"),
        }
    }
}

impl Default for CaldbinfoIndexer {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogIndexer for CaldbinfoIndexer {
    fn initialize(
        &self,
        mission: &MissionId,
        telescope: &TelescopeId,
    ) -> Result<String, CaldbError> {
        let caldbinfo = self
            .caldbinfo
            .as_ref()
            .ok_or_else(|| CaldbError::MissingTool("caldbinfo".to_string()))?;
        let output = Command::new(caldbinfo)
            .arg("INST")
            .arg(mission.as_str().to_uppercase())
            .arg(telescope.as_str().to_uppercase())
            .output()
            .map_err(|err| CaldbError::Indexer(err.to_string()))?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }
        Ok(text)
    }
}

/// Case-sensitive substring match, the marker `caldbinfo` prints on failure.
pub fn contains_error_marker(output: &str) -> bool {
    output.contains("ERROR")
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    for path in std::env::split_paths(&path_var) {
        let exe = path.join(format!("{name}.exe"));
        if exe.exists() {
            return Some(exe);
        }
        let plain = path.join(name);
        if plain.exists() {
            return Some(plain);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_marker_is_case_sensitive() {
        assert!(contains_error_marker("CALDBINFO ERROR: no caldb.indx"));
        assert!(!contains_error_marker("no errors detected"));
        assert!(!contains_error_marker("instrument ok"));
    }
}
