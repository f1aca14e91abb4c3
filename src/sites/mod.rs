use crate::keywords::KeywordMatcher;

mod bizquest;
mod businessbroker;
mod crexi;
mod ibba;

pub use bizquest::BizQuest;
pub use businessbroker::BusinessBroker;
pub use crexi::Crexi;
pub use ibba::Ibba;

/// One listing directory to crawl for a site, e.g. the Florida broker index.
#[derive(Debug, Clone)]
pub struct Region {
    pub name: &'static str,
    pub url: &'static str,
    /// First directory page to harvest links from (1-based).
    pub start_page: u32,
    /// Site-imposed cap on pages for this region, if tighter than config.
    pub page_limit: Option<u32>,
}

impl Region {
    pub fn new(name: &'static str, url: &'static str) -> Self {
        Self {
            name,
            url,
            start_page: 1,
            page_limit: None,
        }
    }
}

/// Everything the generic directory crawler needs to know about one listing
/// site. Each implementation owns the site's URLs, link patterns, and
/// keyword set; the crawl loop itself lives in `crawler.rs`.
pub trait DirectorySite: Send + Sync {
    fn name(&self) -> &'static str;

    fn output_filename(&self) -> &'static str;

    fn worksheet_name(&self) -> &'static str;

    fn regions(&self) -> Vec<Region>;

    fn keywords(&self) -> &KeywordMatcher;

    /// URL of the nth directory page for a region (1-based). `None` means
    /// the region has no further pages and pagination stops.
    fn directory_page_url(&self, region: &Region, page_num: u32) -> Option<String>;

    /// Candidate profile URLs on one directory page, in document order.
    fn profile_urls(&self, html: &str, page_url: &str) -> Vec<String>;

    /// Visit order for the collected profile URLs. Defaults to collection
    /// order; BizQuest overrides this to visit profiles alphabetically.
    fn order_profiles(&self, urls: Vec<String>) -> Vec<String> {
        urls
    }
}
