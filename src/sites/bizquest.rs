use regex::Regex;
use scraper::{Html, Selector};

use crate::fetcher::resolve_url;
use crate::keywords::KeywordMatcher;

use super::{DirectorySite, Region};

/// BizQuest state broker indexes, paginated as `.../page-N/`.
pub struct BizQuest {
    keywords: KeywordMatcher,
    link_selector: Selector,
    profile_path: Regex,
}

impl Default for BizQuest {
    fn default() -> Self {
        Self::new()
    }
}

impl BizQuest {
    pub fn new() -> Self {
        Self {
            keywords: KeywordMatcher::ecw(),
            link_selector: Selector::parse("a[href*='/business-broker/']").unwrap(),
            profile_path: Regex::new(r"(?i)/business-broker/[^/]+/[^/]+/BW\d+").unwrap(),
        }
    }
}

impl DirectorySite for BizQuest {
    fn name(&self) -> &'static str {
        "bizquest"
    }

    fn output_filename(&self) -> &'static str {
        "bizquest_ecw_brokers.csv"
    }

    fn worksheet_name(&self) -> &'static str {
        "BizQuest"
    }

    fn regions(&self) -> Vec<Region> {
        vec![
            Region::new(
                "New York",
                "https://www.bizquest.com/new-york-business-brokers/",
            ),
            Region::new(
                "Florida",
                "https://www.bizquest.com/florida-business-brokers/",
            ),
        ]
    }

    fn keywords(&self) -> &KeywordMatcher {
        &self.keywords
    }

    fn directory_page_url(&self, region: &Region, page_num: u32) -> Option<String> {
        let base = region.url.trim_end_matches('/');
        if page_num <= 1 {
            Some(format!("{}/", base))
        } else {
            Some(format!("{}/page-{}/", base, page_num))
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
            if self.profile_path.is_match(&full) && !urls.contains(&full) {
                urls.push(full);
            }
        }
        urls
    }

    fn order_profiles(&self, mut urls: Vec<String>) -> Vec<String> {
        urls.sort();
        urls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_page_urls() {
        let site = BizQuest::new();
        let region = &site.regions()[0];
        assert_eq!(
            site.directory_page_url(region, 1).unwrap(),
            "https://www.bizquest.com/new-york-business-brokers/"
        );
        assert_eq!(
            site.directory_page_url(region, 3).unwrap(),
            "https://www.bizquest.com/new-york-business-brokers/page-3/"
        );
    }

    #[test]
    fn keeps_only_profile_shaped_links() {
        let site = BizQuest::new();
        let html = r#"<html><body>
            <a href="/business-broker/jane-doe/acme-advisors/BW1234">Jane</a>
            <a href="/business-broker/jane-doe/acme-advisors/BW1234">Jane again</a>
            <a href="/business-broker/directory/">Directory</a>
            <a href="/buy-a-business/">Buy</a>
        </body></html>"#;
        let urls = site.profile_urls(html, "https://www.bizquest.com/new-york-business-brokers/");
        assert_eq!(
            urls,
            vec!["https://www.bizquest.com/business-broker/jane-doe/acme-advisors/BW1234"]
        );
    }

    #[test]
    fn orders_profiles_alphabetically() {
        let site = BizQuest::new();
        let ordered = site.order_profiles(vec!["b".into(), "a".into()]);
        assert_eq!(ordered, vec!["a".to_string(), "b".to_string()]);
    }
}
