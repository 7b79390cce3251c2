use serde::Serialize;

use crate::archive::{Archiver, validate_gzip};
use crate::catalog::{CatalogClient, LinkTable, extract_links};
use crate::config::Config;
use crate::domain::ArchiveLink;
use crate::error::CaldbError;
use crate::indexer::{CatalogIndexer, contains_error_marker};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub catalog_reachable: bool,
    pub items: Vec<SyncItemResult>,
    pub finished_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncItemResult {
    pub mission: String,
    pub telescope: String,
    pub url: String,
    pub file_name: String,
    pub action: SyncAction,
    pub index_output: Option<String>,
    pub index_failed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    /// Archive file already in the CALDB root, nothing downloaded.
    Present,
    Downloaded,
    /// Dry run: would have been downloaded.
    Planned,
    Failed,
}

pub struct App<C: CatalogClient, A: Archiver, X: CatalogIndexer> {
    config: Config,
    catalog: C,
    archiver: A,
    indexer: X,
}

impl<C: CatalogClient, A: Archiver, X: CatalogIndexer> App<C, A, X> {
    pub fn new(config: Config, catalog: C, archiver: A, indexer: X) -> Self {
        Self {
            config,
            catalog,
            archiver,
            indexer,
        }
    }

    /// Runs the full sync: builds the link table once, then a
    /// download+extract pass followed by an initialization pass. A failing
    /// entry is recorded and skipped, never fatal; an unreachable catalog
    /// yields an empty result.
    pub fn sync(&self, options: SyncOptions) -> Result<SyncResult, CaldbError> {
        if !self.config.root.as_std_path().is_dir() {
            return Err(CaldbError::Filesystem(format!(
                "CALDB root {} is not a directory",
                self.config.root
            )));
        }

        let Some(links) = self.load_links()? else {
            return Ok(SyncResult {
                catalog_reachable: false,
                items: Vec::new(),
                finished_at: iso_timestamp(),
            });
        };

        let mut items = Vec::with_capacity(links.len());
        for link in links.values() {
            let action = match self.sync_entry(link, options) {
                Ok(action) => action,
                Err(err) => {
                    tracing::warn!("problem downloading {}: {err}", link.file_name());
                    SyncAction::Failed
                }
            };
            items.push(SyncItemResult {
                mission: link.key.mission.as_str().to_string(),
                telescope: link.key.telescope.as_str().to_string(),
                url: link.url.clone(),
                file_name: link.file_name().to_string(),
                action,
                index_output: None,
                index_failed: false,
            });
        }

        if !options.dry_run {
            for (item, link) in items.iter_mut().zip(links.values()) {
                self.initialize_entry(item, link);
            }
        }

        Ok(SyncResult {
            catalog_reachable: true,
            items,
            finished_at: iso_timestamp(),
        })
    }

    /// `Ok(None)` when the catalog page cannot be fetched; the run degrades
    /// to "nothing to do". Malformed catalog data still propagates.
    fn load_links(&self) -> Result<Option<LinkTable>, CaldbError> {
        let page = match self.catalog.fetch_index(&self.config.catalog_url) {
            Ok(page) => page,
            Err(err) if err.is_catalog_fetch() => {
                tracing::warn!("cannot retrieve catalog index: {err}");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        extract_links(&page).map(Some)
    }

    fn sync_entry(&self, link: &ArchiveLink, options: SyncOptions) -> Result<SyncAction, CaldbError> {
        let destination = self.config.root.join(link.file_name());
        if destination.as_std_path().exists() {
            return Ok(SyncAction::Present);
        }
        if options.dry_run {
            return Ok(SyncAction::Planned);
        }

        tracing::info!("downloading {}", link.key);
        // Stage into a temp file first so a truncated download never passes
        // the presence check on a later run.
        let staging = tempfile::Builder::new()
            .prefix(".caldb-sync")
            .tempfile_in(self.config.root.as_std_path())
            .map_err(|err| CaldbError::Filesystem(err.to_string()))?;
        self.catalog.download(&link.url, staging.path())?;
        validate_gzip(staging.path())?;
        staging
            .persist(destination.as_std_path())
            .map_err(|err| CaldbError::Filesystem(err.to_string()))?;

        tracing::info!("unpacking {}", link.key);
        self.archiver
            .extract(destination.as_std_path(), self.config.root.as_std_path())?;
        Ok(SyncAction::Downloaded)
    }

    fn initialize_entry(&self, item: &mut SyncItemResult, link: &ArchiveLink) {
        if link.key.mission.is_data() {
            return;
        }
        tracing::info!("initializing {}", link.key);
        match self
            .indexer
            .initialize(&link.key.mission, &link.key.telescope)
        {
            Ok(output) => {
                if contains_error_marker(&output) {
                    tracing::warn!("problem downloading {}", link.file_name());
                    item.index_failed = true;
                }
                item.index_output = Some(output);
            }
            Err(err) => {
                tracing::warn!("cannot initialize {}: {err}", link.key);
                item.index_failed = true;
            }
        }
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
