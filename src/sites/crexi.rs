use regex::Regex;
use scraper::{Html, Selector};

use crate::fetcher::resolve_url;
use crate::keywords::{KeywordMatcher, CREXI_KEYWORDS};

use super::{DirectorySite, Region};

const FL_DIRECTORY_URL: &str = "https://www.crexi.com/resources/find-a-broker/Florida/Special_Purpose/CCIM%2CSIOR%2CREALTOR%2CCREW%2CCRRP%2CICSC";
const NY_DIRECTORY_URL: &str = "https://www.crexi.com/resources/find-a-broker/New_York/Special_Purpose/CCIM%2CSIOR%2CNAIOP%2CREALTOR%2CCREW%2CCRRP%2CICSC";

/// The first few profile links on every Crexi directory page are header and
/// nav chrome, not results.
const SKIP_TOP_N: usize = 3;

/// Crexi find-a-broker directory, filtered to Special Purpose listings. Uses
/// the wider keyword set (pad sites, gas stations, sale leasebacks, ...).
pub struct Crexi {
    keywords: KeywordMatcher,
    link_selector: Selector,
    profile_slug: Regex,
}

impl Default for Crexi {
    fn default() -> Self {
        Self::new()
    }
}

impl Crexi {
    pub fn new() -> Self {
        Self {
            keywords: KeywordMatcher::new(&CREXI_KEYWORDS),
            link_selector: Selector::parse("a[href*='/profile/']").unwrap(),
            profile_slug: Regex::new(r"(?i)crexi\.com/profile/([a-z0-9\-]+)").unwrap(),
        }
    }
}

impl DirectorySite for Crexi {
    fn name(&self) -> &'static str {
        "crexi"
    }

    fn output_filename(&self) -> &'static str {
        "crexi_ecw_brokers.csv"
    }

    fn worksheet_name(&self) -> &'static str {
        "CRE Brokers"
    }

    fn regions(&self) -> Vec<Region> {
        vec![
            Region {
                name: "Florida",
                url: FL_DIRECTORY_URL,
                start_page: 1,
                page_limit: Some(50),
            },
            // The NY directory ends at page 21; only that page is harvested.
            Region {
                name: "New York",
                url: NY_DIRECTORY_URL,
                start_page: 21,
                page_limit: Some(1),
            },
        ]
    }

    fn keywords(&self) -> &KeywordMatcher {
        &self.keywords
    }

    fn directory_page_url(&self, region: &Region, page_num: u32) -> Option<String> {
        if page_num <= 1 {
            Some(region.url.to_string())
        } else {
            Some(format!("{}?page={}", region.url, page_num))
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
            let Some(caps) = self.profile_slug.captures(&lower) else {
                continue;
            };
            // Very short slugs are nav artifacts, not broker profiles.
            if caps.get(1).map(|m| m.as_str().len()).unwrap_or(0) < 3 {
                continue;
            }
            if !urls.contains(&full) {
                urls.push(full);
            }
        }
        if urls.len() > SKIP_TOP_N {
            urls.split_off(SKIP_TOP_N)
        } else {
            urls
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_urls_use_query_param() {
        let site = Crexi::new();
        let region = &site.regions()[0];
        assert_eq!(site.directory_page_url(region, 1).unwrap(), FL_DIRECTORY_URL);
        assert_eq!(
            site.directory_page_url(region, 2).unwrap(),
            format!("{}?page=2", FL_DIRECTORY_URL)
        );
    }

    #[test]
    fn ny_region_is_a_single_late_page() {
        let site = Crexi::new();
        let ny = &site.regions()[1];
        assert_eq!(ny.start_page, 21);
        assert_eq!(ny.page_limit, Some(1));
    }

    #[test]
    fn skips_header_links_and_short_slugs() {
        let site = Crexi::new();
        let html = r#"<html><body>
            <a href="https://www.crexi.com/profile/me">Nav</a>
            <a href="https://www.crexi.com/profile/nav-one">Nav</a>
            <a href="https://www.crexi.com/profile/nav-two">Nav</a>
            <a href="https://www.crexi.com/profile/nav-three">Nav</a>
            <a href="https://www.crexi.com/profile/jane-doe-123">Jane</a>
            <a href="https://www.crexi.com/profile/john-roe-456">John</a>
        </body></html>"#;
        let urls = site.profile_urls(html, FL_DIRECTORY_URL);
        assert_eq!(
            urls,
            vec![
                "https://www.crexi.com/profile/jane-doe-123".to_string(),
                "https://www.crexi.com/profile/john-roe-456".to_string(),
            ]
        );
    }
}
