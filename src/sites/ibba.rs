use scraper::{Html, Selector};

use crate::fetcher::resolve_url;
use crate::keywords::KeywordMatcher;

use super::{DirectorySite, Region};

/// IBBA find-a-broker results for the default search: Dallas, TX within 250
/// miles, Auto Related Businesses specialty.
const SEARCH_RESULTS_URL: &str = "https://www.ibba.org/find-a-business-broker/?location=Dallas%2C%20TX&distance=250&specialty=auto-related-businesses";

/// IBBA search results. Profiles are reached through "View Profile" links;
/// result pages advance with a `pg` query parameter.
pub struct Ibba {
    keywords: KeywordMatcher,
    link_selector: Selector,
}

impl Default for Ibba {
    fn default() -> Self {
        Self::new()
    }
}

impl Ibba {
    pub fn new() -> Self {
        Self {
            keywords: KeywordMatcher::ecw(),
            link_selector: Selector::parse("a[href]").unwrap(),
        }
    }
}

impl DirectorySite for Ibba {
    fn name(&self) -> &'static str {
        "ibba"
    }

    fn output_filename(&self) -> &'static str {
        "ibba_ecw_brokers.csv"
    }

    fn worksheet_name(&self) -> &'static str {
        "ECW Brokers"
    }

    fn regions(&self) -> Vec<Region> {
        vec![Region::new("Dallas, TX (250 mi)", SEARCH_RESULTS_URL)]
    }

    fn keywords(&self) -> &KeywordMatcher {
        &self.keywords
    }

    fn directory_page_url(&self, region: &Region, page_num: u32) -> Option<String> {
        if page_num <= 1 {
            Some(region.url.to_string())
        } else {
            Some(format!("{}&pg={}", region.url, page_num))
        }
    }

    fn profile_urls(&self, html: &str, page_url: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let mut urls = Vec::new();
        for element in document.select(&self.link_selector) {
            let label = element
                .text()
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            if !label.eq_ignore_ascii_case("view profile") {
                continue;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(full) = resolve_url(href, page_url) else {
                continue;
            };
            if !urls.contains(&full) {
                urls.push(full);
            }
        }
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_view_profile_links_only() {
        let site = Ibba::new();
        let html = r#"<html><body>
            <a href="/broker/jane-doe/">View Profile</a>
            <a href="/broker/jane-doe/">View Profile</a>
            <a href="/about/">About IBBA</a>
            <a href="/broker/john-roe/">view profile</a>
        </body></html>"#;
        let urls = site.profile_urls(html, "https://www.ibba.org/find-a-business-broker/");
        assert_eq!(
            urls,
            vec![
                "https://www.ibba.org/broker/jane-doe/".to_string(),
                "https://www.ibba.org/broker/john-roe/".to_string(),
            ]
        );
    }

    #[test]
    fn later_pages_add_pg_param() {
        let site = Ibba::new();
        let region = &site.regions()[0];
        assert!(site.directory_page_url(region, 2).unwrap().ends_with("&pg=2"));
    }
}
