use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ScrapingConfig;
use crate::extract::ProfileExtractor;
use crate::fetcher::Fetch;
use crate::models::BrokerContact;
use crate::sheets::SheetsClient;
use crate::sites::{DirectorySite, Region};

/// Generic directory crawl: paginate listing pages, harvest profile links,
/// then visit each profile sequentially. Any single page or profile failing
/// is skipped; only the shutdown flag ends the run early, and even then the
/// caller still flushes what was collected.
pub struct DirectoryCrawler<'a, F: Fetch> {
    fetcher: &'a F,
    extractor: ProfileExtractor,
    config: &'a ScrapingConfig,
    shutdown: Arc<AtomicBool>,
}

impl<'a, F: Fetch> DirectoryCrawler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a ScrapingConfig, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            fetcher,
            extractor: ProfileExtractor::new(),
            config,
            shutdown,
        }
    }

    fn interrupted(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Crawl every given region of one site. Records come back in
    /// profile-visit order, so downstream dedup keeps the first-seen copy.
    pub async fn crawl_site(
        &self,
        site: &dyn DirectorySite,
        regions: &[Region],
        sheet: Option<(&SheetsClient, &str)>,
    ) -> Vec<BrokerContact> {
        let mut contacts = Vec::new();
        let mut seen_urls: HashSet<String> = HashSet::new();

        for region in regions {
            if self.interrupted() {
                info!("Interrupted; skipping remaining regions of {}", site.name());
                break;
            }
            info!("Scraping: {} — {}", region.name, region.url);

            let profile_urls = self.collect_profile_urls(site, region).await;
            let profile_urls = site.order_profiles(profile_urls);
            info!(
                "  Opening {} broker profiles to check for keywords...",
                profile_urls.len()
            );

            let mut region_count = 0usize;
            for profile_url in profile_urls {
                if self.interrupted() {
                    info!("Interrupted; stopping profile visits");
                    break;
                }
                if !seen_urls.insert(profile_url.clone()) {
                    continue;
                }

                match self.fetcher.fetch(&profile_url).await {
                    Ok(html) => {
                        if let Some(contact) =
                            self.extractor.extract(&html, &profile_url, site.keywords())
                        {
                            info!(
                                "  + {} ({}) — keywords: {}",
                                contact.full_name, contact.company, contact.notes
                            );
                            if let Some((client, worksheet)) = sheet {
                                if let Err(e) =
                                    client.append_row(worksheet, &contact.to_row()).await
                                {
                                    warn!("  (Sheet append failed: {})", e);
                                }
                            }
                            contacts.push(contact);
                            region_count += 1;
                        }
                    }
                    Err(e) => {
                        warn!("  Skip broker {}: {}", profile_url, e);
                    }
                }
                // One pacing delay per visited profile, match or not.
                self.delay().await;
            }
            info!(
                "  Collected {} matching brokers from {}.",
                region_count, region.name
            );
        }
        contacts
    }

    /// Walk directory pages until a page yields zero new links, the region
    /// runs out of pages, or the consecutive-failure budget is spent.
    async fn collect_profile_urls(&self, site: &dyn DirectorySite, region: &Region) -> Vec<String> {
        let mut urls = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut consecutive_failures = 0u32;

        let page_budget = region
            .page_limit
            .unwrap_or(u32::MAX)
            .min(self.config.max_directory_pages);

        for offset in 0..page_budget {
            if self.interrupted() {
                break;
            }
            let page_num = region.start_page + offset;
            let Some(page_url) = site.directory_page_url(region, page_num) else {
                break;
            };

            let html = match self.fetcher.fetch(&page_url).await {
                Ok(html) => html,
                Err(e) => {
                    consecutive_failures += 1;
                    warn!(
                        "    Page {}: {} (failure {}/{})",
                        page_num, e, consecutive_failures, self.config.max_consecutive_failures
                    );
                    if consecutive_failures >= self.config.max_consecutive_failures {
                        break;
                    }
                    continue;
                }
            };
            consecutive_failures = 0;

            let mut added = 0usize;
            for url in site.profile_urls(&html, &page_url) {
                if seen.insert(url.clone()) {
                    urls.push(url);
                    added += 1;
                }
            }
            info!(
                "    Page {}: {} broker links (total {})",
                page_num,
                added,
                urls.len()
            );
            if added == 0 {
                break;
            }
            self.delay().await;
        }
        urls
    }

    async fn delay(&self) {
        let jitter = fastrand::u64(0..=1000);
        tokio::time::sleep(Duration::from_millis(self.config.page_delay_ms + jitter)).await;
    }
}
