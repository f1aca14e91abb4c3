use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::keywords::KeywordMatcher;
use crate::location::LocationParser;
use crate::models::{BrokerContact, NOT_AVAILABLE};

/// Pulls one `BrokerContact` out of a profile page, or nothing if the page
/// text does not hit the keyword list. Every field lookup is independently
/// best-effort; a miss degrades that field to "N/A", never the record.
pub struct ProfileExtractor {
    location_parser: LocationParser,
    tel_selector: Selector,
    mailto_selector: Selector,
    h1_selector: Selector,
    h2_selector: Selector,
    heading_selector: Selector,
    company_class_selector: Selector,
    body_selector: Selector,
    phone_regex: Regex,
    email_regex: Regex,
    three_digits: Regex,
    digits_only: Regex,
}

impl Default for ProfileExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileExtractor {
    pub fn new() -> Self {
        Self {
            location_parser: LocationParser::new(),
            tel_selector: Selector::parse("a[href^='tel:']").unwrap(),
            mailto_selector: Selector::parse("a[href^='mailto:']").unwrap(),
            h1_selector: Selector::parse("h1").unwrap(),
            h2_selector: Selector::parse("h2").unwrap(),
            heading_selector: Selector::parse("h1, h2, h3").unwrap(),
            company_class_selector: Selector::parse(
                "[class*='company'], [class*='firm'], [class*='brokerage']",
            )
            .unwrap(),
            body_selector: Selector::parse("body").unwrap(),
            phone_regex: Regex::new(r"\(?\d{3}\)?[\s.\-]?\d{3}[\s.\-]?\d{4}").unwrap(),
            email_regex: Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}")
                .unwrap(),
            three_digits: Regex::new(r"\d{3}").unwrap(),
            digits_only: Regex::new(r"^[\d\s\-\(\)\.]+$").unwrap(),
        }
    }

    /// Keyword-gate then field extraction. `None` means the profile did not
    /// match and is discarded, not recorded.
    pub fn extract(
        &self,
        html: &str,
        profile_url: &str,
        matcher: &KeywordMatcher,
    ) -> Option<BrokerContact> {
        let document = Html::parse_document(html);
        let text = self.clean_text(&document);

        let keywords = matcher.matches(&text);
        if keywords.is_empty() {
            return None;
        }

        let full_name = self
            .extract_name(&document)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let company = self
            .extract_company(&document)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let phone = self
            .extract_phone(&document, &text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let email = self
            .extract_email(&document, &text)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let location = self.location_parser.parse(&text);

        debug!(
            "Matched {} ({}) on {}: {:?}",
            full_name, company, profile_url, keywords
        );

        Some(BrokerContact {
            full_name,
            phone_number: phone,
            location,
            company,
            email,
            source_url: profile_url.to_string(),
            notes: keywords.join("; "),
        })
    }

    /// Visible body text flattened to single spaces.
    pub fn clean_text(&self, document: &Html) -> String {
        document
            .select(&self.body_selector)
            .next()
            .map(|body| {
                body.text()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .unwrap_or_default()
    }

    fn extract_name(&self, document: &Html) -> Option<String> {
        for selector in [&self.h1_selector, &self.heading_selector] {
            if let Some(heading) = document.select(selector).next() {
                let text = first_line(&element_text(&heading));
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }

    fn extract_company(&self, document: &Html) -> Option<String> {
        // The line right under the name heading is usually the brokerage.
        if let Some(h1) = document.select(&self.h1_selector).next() {
            if let Some(sibling) = h1.next_siblings().find_map(ElementRef::wrap) {
                let text = first_line(&element_text(&sibling));
                if self.is_company_like(&text) {
                    return Some(text);
                }
            }
        }
        if let Some(h2) = document.select(&self.h2_selector).next() {
            let text = first_line(&element_text(&h2));
            if self.is_company_like(&text) {
                return Some(text);
            }
        }
        for el in document.select(&self.company_class_selector) {
            let text = first_line(&element_text(&el));
            if self.is_company_like(&text) {
                return Some(text);
            }
        }
        None
    }

    fn is_company_like(&self, text: &str) -> bool {
        if text.is_empty() || text.len() > 200 {
            return false;
        }
        let lower = text.to_lowercase();
        if lower.starts_with("phone") || lower.contains("show phone") || lower == "share" {
            return false;
        }
        // Section headings that share the h2 slot on profile pages.
        const SECTION_HEADINGS: [&str; 4] = [
            "company overview",
            "broker profile",
            "services offered",
            "areas served",
        ];
        if SECTION_HEADINGS.iter().any(|h| lower.contains(h)) {
            return false;
        }
        !self.digits_only.is_match(text)
    }

    fn extract_phone(&self, document: &Html, text: &str) -> Option<String> {
        if let Some(tel) = document.select(&self.tel_selector).next() {
            if let Some(href) = tel.value().attr("href") {
                let num = href
                    .trim_start_matches("tel:")
                    .split('?')
                    .next()
                    .unwrap_or("")
                    .trim();
                if !num.is_empty() && self.three_digits.is_match(num) {
                    return Some(num.to_string());
                }
            }
            let link_text = element_text(&tel);
            if self.three_digits.is_match(&link_text) {
                return Some(link_text);
            }
        }
        let prefix: String = text.chars().take(5_000).collect();
        self.phone_regex
            .find(&prefix)
            .map(|m| m.as_str().trim().to_string())
    }

    fn extract_email(&self, document: &Html, text: &str) -> Option<String> {
        if let Some(mailto) = document.select(&self.mailto_selector).next() {
            if let Some(href) = mailto.value().attr("href") {
                if href.contains('@') {
                    let addr = href
                        .trim_start_matches("mailto:")
                        .split('?')
                        .next()
                        .unwrap_or("")
                        .trim();
                    if !addr.is_empty() {
                        return Some(addr.to_string());
                    }
                }
            }
        }
        let prefix: String = text.chars().take(10_000).collect();
        self.email_regex
            .find(&prefix)
            .map(|m| m.as_str().to_string())
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_line(s: &str) -> String {
    s.lines().next().unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"
        <html><body>
          <h1>Jane Doe</h1>
          <div class="firm-name">Acme Business Advisors</div>
          <p>I focus on express car wash and tunnel wash operations across
             the Southeast. Office: 500 Brickell Ave, Miami, FL 33131.</p>
          <a href="tel:+1-305-555-0142?ext=2">Call</a>
          <a href="mailto:jane@acmeadvisors.com?subject=hello">Email me</a>
        </body></html>
    "#;

    #[test]
    fn extracts_full_record_from_matching_profile() {
        let extractor = ProfileExtractor::new();
        let matcher = KeywordMatcher::ecw();
        let contact = extractor
            .extract(PROFILE, "https://example.com/profile/jane", &matcher)
            .expect("profile should match");

        assert_eq!(contact.full_name, "Jane Doe");
        assert_eq!(contact.phone_number, "+1-305-555-0142");
        assert_eq!(contact.email, "jane@acmeadvisors.com");
        assert_eq!(contact.location, "Miami, FL");
        assert_eq!(contact.notes, "express car wash; tunnel wash; car wash");
        assert_eq!(contact.source_url, "https://example.com/profile/jane");
    }

    #[test]
    fn non_matching_profile_is_discarded() {
        let extractor = ProfileExtractor::new();
        let matcher = KeywordMatcher::ecw();
        let html = "<html><body><h1>Bob</h1><p>Restaurants only.</p></body></html>";
        assert!(extractor.extract(html, "https://x", &matcher).is_none());
    }

    #[test]
    fn missing_fields_degrade_to_na() {
        let extractor = ProfileExtractor::new();
        let matcher = KeywordMatcher::ecw();
        let html = "<html><body><p>A car wash listing with no contact details.</p></body></html>";
        let contact = extractor.extract(html, "https://x", &matcher).unwrap();
        assert_eq!(contact.full_name, "N/A");
        assert_eq!(contact.phone_number, "N/A");
        assert_eq!(contact.email, "N/A");
        assert_eq!(contact.location, "N/A");
        assert_eq!(contact.company, "N/A");
        assert_eq!(contact.notes, "car wash");
    }

    #[test]
    fn company_falls_back_to_h2_when_plausible() {
        let extractor = ProfileExtractor::new();
        let matcher = KeywordMatcher::ecw();
        let html = r#"<html><body>
            <h1>Sam Broker</h1>
            <h2>Sunshine Brokerage LLC</h2>
            <p>carwash specialist, Tampa, FL 33601</p>
        </body></html>"#;
        let contact = extractor.extract(html, "https://x", &matcher).unwrap();
        assert_eq!(contact.company, "Sunshine Brokerage LLC");
    }

    #[test]
    fn section_heading_is_not_a_company() {
        let extractor = ProfileExtractor::new();
        assert!(!extractor.is_company_like("Company Overview"));
        assert!(!extractor.is_company_like("Show Phone Number"));
        assert!(!extractor.is_company_like("(555) 123-4567"));
        assert!(extractor.is_company_like("Acme Co"));
    }
}
