/// Keywords that flag a broker as relevant to express car wash deals. Pure
/// substring containment over lowercased page text; partial-word hits (e.g.
/// "carwash" inside a longer compound) are accepted on purpose.
pub const ECW_KEYWORDS: [&str; 6] = [
    "express car wash",
    "express wash",
    "tunnel wash",
    "car wash",
    "carwash",
    "conveyor wash",
];

/// Crexi casts a wider net: car-wash-adjacent real estate terms on top of
/// the base set.
pub const CREXI_KEYWORDS: [&str; 21] = [
    "express car wash",
    "express wash",
    "tunnel wash",
    "car wash",
    "carwash",
    "conveyor wash",
    "owner-user sale",
    "owner-user",
    "pad site",
    "retail pad site",
    "underperforming asset",
    "automotive real estate",
    "stand-alone building",
    "stand-alone retail",
    "service station",
    "gas station",
    "oil change",
    "lube center",
    "tire shop",
    "sale leaseback",
    "slb",
];

pub struct KeywordMatcher {
    keywords: &'static [&'static str],
}

impl KeywordMatcher {
    pub fn new(keywords: &'static [&'static str]) -> Self {
        Self { keywords }
    }

    pub fn ecw() -> Self {
        Self::new(&ECW_KEYWORDS)
    }

    /// Returns every keyword present in `text` as a substring, in
    /// declaration order. Case-insensitive.
    pub fn matches(&self, text: &str) -> Vec<&'static str> {
        let lower = text.to_lowercase();
        self.keywords
            .iter()
            .copied()
            .filter(|kw| lower.contains(kw))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_keyword_case_insensitively() {
        let matcher = KeywordMatcher::ecw();
        let found = matcher.matches("We specialize in Tunnel Wash and retail pad sites");
        assert_eq!(found, vec!["tunnel wash"]);
    }

    #[test]
    fn preserves_declaration_order() {
        let matcher = KeywordMatcher::ecw();
        let found = matcher.matches("carwash tunnel wash express car wash");
        assert_eq!(
            found,
            vec!["express car wash", "tunnel wash", "car wash", "carwash"]
        );
    }

    #[test]
    fn substring_containment_has_no_word_boundary() {
        // "car wash" inside "express car wash" counts; that recall-heavy
        // behavior is intended.
        let matcher = KeywordMatcher::ecw();
        let found = matcher.matches("express car wash");
        assert!(found.contains(&"car wash"));
        assert!(!found.contains(&"express wash"));
    }

    #[test]
    fn no_match_yields_empty() {
        let matcher = KeywordMatcher::ecw();
        assert!(matcher.matches("laundromat for sale").is_empty());
    }

    #[test]
    fn crexi_set_extends_base_set() {
        let matcher = KeywordMatcher::new(&CREXI_KEYWORDS);
        let found = matcher.matches("NNN gas station, ideal owner-user sale");
        assert_eq!(found, vec!["owner-user sale", "owner-user", "gas station"]);
    }
}
