use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::{info, warn};

use crate::cli::{region_filter, Cli, SiteCommand};
use crate::config::Config;
use crate::crawler::DirectoryCrawler;
use crate::export::{dedup_contacts, write_csv};
use crate::fetcher::PageFetcher;
use crate::models::Result;
use crate::sheets::SheetsClient;
use crate::sites::{BizQuest, BusinessBroker, Crexi, DirectorySite, Ibba};

/// Wires config, fetcher, and the per-site scrapers together and owns the
/// run lifecycle: crawl, dedup, CSV, optional sheet upload.
pub struct ScraperApp {
    config: Config,
    fetcher: PageFetcher,
    shutdown: Arc<AtomicBool>,
}

impl ScraperApp {
    pub fn new(config: Config, shutdown: Arc<AtomicBool>) -> Result<Self> {
        let fetcher = PageFetcher::new(&config.scraping)?;
        Ok(Self {
            config,
            fetcher,
            shutdown,
        })
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        match cli.command {
            SiteCommand::Bizquest { ny, fl } => {
                self.run_site(&BizQuest::new(), region_filter(ny, fl)).await
            }
            SiteCommand::Businessbroker { ny, fl } => {
                self.run_site(&BusinessBroker::new(), region_filter(ny, fl))
                    .await
            }
            SiteCommand::Crexi { ny, fl } => {
                self.run_site(&Crexi::new(), region_filter(ny, fl)).await
            }
            SiteCommand::Ibba => self.run_site(&Ibba::new(), None).await,
            SiteCommand::All => {
                self.run_site(&BizQuest::new(), None).await?;
                self.run_site(&BusinessBroker::new(), None).await?;
                self.run_site(&Crexi::new(), None).await?;
                self.run_site(&Ibba::new(), None).await
            }
        }
    }

    /// One site end to end. A region restriction turns the sheet mirror into
    /// plain append mode; a full run clears the worksheet up front and bulk
    /// uploads the deduped result at the end.
    async fn run_site(&self, site: &dyn DirectorySite, region: Option<&str>) -> Result<()> {
        let full_run = region.is_none();
        let regions: Vec<_> = site
            .regions()
            .into_iter()
            .filter(|r| region.map(|name| r.name == name).unwrap_or(true))
            .collect();
        if regions.is_empty() {
            warn!("{}: no region matches the given flags", site.name());
            return Ok(());
        }

        // Credential problems surface here, before any crawling: without the
        // sheet there is no way to honor the export contract.
        let sheets = if self.config.sheets.enabled {
            let client = SheetsClient::from_key_file(
                &self.config.sheets.service_account_json,
                &self.config.sheets.sheet_id,
            )?;
            client.ensure_worksheet(site.worksheet_name()).await?;
            if full_run {
                match client.clear_rows(site.worksheet_name()).await {
                    Ok(()) => info!(
                        "Cleared worksheet {:?}; will append matches as we go.",
                        site.worksheet_name()
                    ),
                    Err(e) => warn!("Could not clear sheet: {}", e),
                }
            } else {
                info!(
                    "Appending to existing worksheet {:?} (next empty row).",
                    site.worksheet_name()
                );
            }
            Some(client)
        } else {
            None
        };

        let crawler =
            DirectoryCrawler::new(&self.fetcher, &self.config.scraping, self.shutdown.clone());
        let sheet_ref = sheets.as_ref().map(|c| (c, site.worksheet_name()));
        let contacts = crawler.crawl_site(site, &regions, sheet_ref).await;

        let total = contacts.len();
        let deduped = dedup_contacts(contacts);
        let csv_path = Path::new(&self.config.output.directory).join(site.output_filename());
        write_csv(&csv_path, &deduped)?;
        info!(
            "Total matching brokers: {}. After de-dup: {}. Saved: {}",
            total,
            deduped.len(),
            csv_path.display()
        );

        if let Some(client) = &sheets {
            if full_run {
                info!(
                    "Uploading final deduped list to worksheet {:?}...",
                    site.worksheet_name()
                );
                let rows: Vec<Vec<String>> = deduped.iter().map(|c| c.to_row()).collect();
                client.clear_rows(site.worksheet_name()).await?;
                client.update_rows(site.worksheet_name(), &rows).await?;
                info!("Google Sheets upload completed.");
            }
        }
        Ok(())
    }
}
