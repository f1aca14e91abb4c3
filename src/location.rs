use regex::Regex;

use crate::models::NOT_AVAILABLE;

/// Full state name (lowercased) → USPS abbreviation, 50 states + DC.
const STATE_ABBREV: [(&str, &str); 51] = [
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
    ("district of columbia", "DC"),
];

/// Map a captured state token to its abbreviation: a 2-letter token is
/// checked against the known abbreviations, anything longer is looked up as
/// a full state name.
fn normalize_state(raw: &str) -> Option<&'static str> {
    let s = raw.trim();
    if s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()) {
        let upper = s.to_ascii_uppercase();
        return STATE_ABBREV
            .iter()
            .find(|(_, ab)| *ab == upper)
            .map(|(_, ab)| *ab);
    }
    let lower = s.to_lowercase();
    STATE_ABBREV
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, ab)| *ab)
}

/// Best-effort "City, ST" extraction from a block of free text. Patterns are
/// tried in fixed priority order and the first capture that survives
/// validation wins; everything else falls through to "N/A".
pub struct LocationParser {
    city_state_zip: Regex,
    city_st: Regex,
    city_full_state: Regex,
    city_state_only: Regex,
}

impl Default for LocationParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LocationParser {
    pub fn new() -> Self {
        Self {
            city_state_zip: Regex::new(
                r"(?i)([A-Za-z][A-Za-z\s\.\-']+?),\s*([A-Za-z]+(?:\s+[A-Za-z]+)*)\s+\d{5}(?:-\d{4})?",
            )
            .unwrap(),
            city_st: Regex::new(
                r"([A-Za-z][A-Za-z\s\.\-']+),\s*([A-Za-z]{2})(?:\s+\d{5}|\s|$)",
            )
            .unwrap(),
            city_full_state: Regex::new(
                r"(?i)([A-Za-z][A-Za-z\s\.\-']+?),\s*([A-Za-z]+(?:\s+[A-Za-z]+)*)\s*(?:,|$)",
            )
            .unwrap(),
            city_state_only: Regex::new(r"^[^,]+,\s*[A-Za-z]{2}$").unwrap(),
        }
    }

    pub fn parse(&self, text: &str) -> String {
        if text.is_empty() {
            return NOT_AVAILABLE.to_string();
        }
        // Bound the scan and flatten whitespace; profile pages can be huge.
        let bounded: String = text.chars().take(10_000).collect();
        let cleaned = bounded
            .replace('\u{a0}', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        for regex in [&self.city_state_zip, &self.city_st, &self.city_full_state] {
            for caps in regex.captures_iter(&cleaned) {
                let city = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
                let state_raw = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                if let Some(out) = self.validate(city, state_raw) {
                    return out;
                }
            }
        }
        NOT_AVAILABLE.to_string()
    }

    fn validate(&self, city: &str, state_raw: &str) -> Option<String> {
        if city.is_empty() || city.len() > 50 {
            return None;
        }
        // Street numbers and similar junk captures.
        if city.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let state = normalize_state(state_raw)?;
        let city = if city.chars().any(|c| c.is_alphabetic())
            && !city.chars().any(|c| c.is_lowercase())
        {
            title_case(city)
        } else {
            city.to_string()
        };
        let out = format!("{}, {}", city, state);
        if self.city_state_only.is_match(&out) {
            Some(out)
        } else {
            None
        }
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_city_state_zip() {
        let parser = LocationParser::new();
        assert_eq!(parser.parse("123 Main St, Orlando, FL 32801"), "Orlando, FL");
    }

    #[test]
    fn parses_full_state_name() {
        let parser = LocationParser::new();
        assert_eq!(parser.parse("Buffalo, New York"), "Buffalo, NY");
    }

    #[test]
    fn rejects_bogus_state() {
        let parser = LocationParser::new();
        assert_eq!(parser.parse("Toronto, ON M5V 2T6"), "N/A");
    }

    #[test]
    fn junk_without_a_city_is_na() {
        let parser = LocationParser::new();
        assert_eq!(parser.parse(", TX 75201"), "N/A");
        assert_eq!(parser.parse("75201 75202 75203"), "N/A");
    }

    #[test]
    fn title_cases_shouting_city() {
        let parser = LocationParser::new();
        assert_eq!(parser.parse("MIAMI, FL 33101"), "Miami, FL");
    }

    #[test]
    fn output_shape_is_city_comma_st_or_na() {
        let parser = LocationParser::new();
        let shape = Regex::new(r"^[^,]+, [A-Z]{2}$").unwrap();
        for input in [
            "Dallas, TX 75201",
            "no location here",
            "prices from 32801, 32802",
            "Saint Paul, Minnesota",
        ] {
            let out = parser.parse(input);
            assert!(out == "N/A" || shape.is_match(&out), "bad shape: {out}");
        }
    }

    #[test]
    fn empty_input_is_na() {
        assert_eq!(LocationParser::new().parse(""), "N/A");
    }
}
