use regex::Regex;
use scraper::{Html, Selector};

use crate::fetcher::resolve_url;
use crate::keywords::KeywordMatcher;

use super::{DirectorySite, Region};

/// BusinessBroker.net state pages. Each state lists its brokers on a single
/// page, so there is no pagination to walk.
pub struct BusinessBroker {
    keywords: KeywordMatcher,
    link_selector: Selector,
    profile_path: Regex,
}

/// State index pages that the profile pattern would otherwise swallow.
const INDEX_PAGES: [&str; 3] = ["brokers.aspx", "florida.aspx", "new-york.aspx"];

impl Default for BusinessBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl BusinessBroker {
    pub fn new() -> Self {
        Self {
            keywords: KeywordMatcher::ecw(),
            link_selector: Selector::parse("a[href*='/brokers/']").unwrap(),
            profile_path: Regex::new(r"(?i)/brokers/[a-z0-9][a-z0-9\-]+-\d+\.aspx").unwrap(),
        }
    }
}

impl DirectorySite for BusinessBroker {
    fn name(&self) -> &'static str {
        "businessbroker"
    }

    fn output_filename(&self) -> &'static str {
        "businessbroker_ecw_brokers.csv"
    }

    fn worksheet_name(&self) -> &'static str {
        "BusinessBroker"
    }

    fn regions(&self) -> Vec<Region> {
        vec![
            Region::new(
                "Florida",
                "https://www.businessbroker.net/brokers/florida.aspx?",
            ),
            Region::new(
                "New York",
                "https://www.businessbroker.net/brokers/new-york.aspx?",
            ),
        ]
    }

    fn keywords(&self) -> &KeywordMatcher {
        &self.keywords
    }

    fn directory_page_url(&self, region: &Region, page_num: u32) -> Option<String> {
        if page_num <= 1 {
            Some(region.url.to_string())
        } else {
            None
        }
    }

    fn profile_urls(&self, html: &str, page_url: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut urls = Vec::new();
        for element in document.select(&self.link_selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(full) = resolve_url(href, page_url) else {
                continue;
            };
            let lower = full.to_lowercase();
            if !self.profile_path.is_match(&full) {
                continue;
            }
            if INDEX_PAGES.iter().any(|p| lower.contains(p)) {
                continue;
            }
            if !urls.contains(&full) {
                urls.push(full);
            }
        }
        urls
    }
}
