use std::fmt::Write as _;
use std::io::{self, Write};

use serde::Serialize;

use crate::app::{SyncAction, SyncResult};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_sync(result: &SyncResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn render_sync_summary(result: &SyncResult) -> String {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    let mut out = String::new();
    if !result.catalog_reachable {
        let _ = writeln!(out, "{yellow}catalog index unreachable, nothing to do{reset}");
        return out;
    }

    for item in &result.items {
        let (label, color) = match item.action {
            SyncAction::Present => ("present", green),
            SyncAction::Downloaded => ("downloaded", cyan),
            SyncAction::Planned => ("would download", yellow),
            SyncAction::Failed => ("failed", red),
        };
        let _ = writeln!(
            out,
            "{color}{} {} {} ({label}){reset}",
            item.mission, item.telescope, item.file_name
        );
        if let Some(output) = &item.index_output {
            out.push_str(output);
            if !output.ends_with('\n') {
                out.push('\n');
            }
        }
        if item.index_failed {
            let _ = writeln!(out, "{red}problem downloading {}{reset}", item.file_name);
        }
    }

    let downloaded = count(result, SyncAction::Downloaded);
    let present = count(result, SyncAction::Present);
    let planned = count(result, SyncAction::Planned);
    let failed = count(result, SyncAction::Failed);
    if planned > 0 {
        let _ = writeln!(
            out,
            "{cyan}caldb-sync (dry run): {planned} to download, {present} already present, {failed} failed{reset}"
        );
    } else {
        let _ = writeln!(
            out,
            "{cyan}caldb-sync: {downloaded} downloaded, {present} already present, {failed} failed{reset}"
        );
    }
    out
}

fn count(result: &SyncResult, action: SyncAction) -> usize {
    result
        .items
        .iter()
        .filter(|item| item.action == action)
        .count()
}
