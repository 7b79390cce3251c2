use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Command;

use flate2::read::GzDecoder;

use crate::error::CaldbError;

pub trait Archiver: Send + Sync {
    /// Extracts a gzipped tar archive into `dest`.
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), CaldbError>;
}

/// Shells out to the system `tar` binary, the tool the archive bundles are
/// built for.
#[derive(Clone)]
pub struct SystemTarArchiver {
    tar: Option<PathBuf>,
}

impl SystemTarArchiver {
    pub fn new() -> Self {
        Self {
            tar: find_in_path("tar"),
        }
    }
}

impl Default for SystemTarArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver for SystemTarArchiver {
    fn extract(&self, archive: &Path, dest: &Path) -> Result<(), CaldbError> {
        let tar = self
            .tar
            .as_ref()
            .ok_or_else(|| CaldbError::MissingTool("tar".to_string()))?;
        let output = Command::new(tar)
            .arg("-xzf")
            .arg(archive)
            .current_dir(dest)
            .output()
            .map_err(|err| CaldbError::Extract(err.to_string()))?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            format!("tar exited with {}", output.status)
        } else {
            stderr
        };
        Err(CaldbError::Extract(message))
    }
}

/// Checks that a downloaded file actually starts as a gzip stream before it
/// is persisted into the CALDB root and handed to `tar`.
pub fn validate_gzip(path: &Path) -> Result<(), CaldbError> {
    let file = File::open(path)
        .map_err(|err| CaldbError::Filesystem(format!("open {}: {err}", path.display())))?;
    let mut decoder = GzDecoder::new(file);
    let mut probe = [0u8; 512];
    decoder
        .read(&mut probe)
        .map_err(|err| CaldbError::InvalidArchive(format!("{}: {err}", path.display())))?;
    Ok(())
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
