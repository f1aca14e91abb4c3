use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Sentinel for "we looked and could not find it". Output rows never carry
/// empty strings; every unknown field is rendered as this.
pub const NOT_AVAILABLE: &str = "N/A";

pub const CSV_COLUMNS: [&str; 7] = [
    "Full Name",
    "Phone Number",
    "Location (City, State)",
    "Company",
    "Email Address",
    "Source (Website)",
    "Notes (URL Link)",
];

/// One broker contact pulled from a matching profile page. Constructed once
/// per profile, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerContact {
    pub full_name: String,
    pub phone_number: String,
    pub location: String,
    pub company: String,
    pub email: String,
    pub source_url: String,
    pub notes: String,
}

fn na_or(value: &str) -> String {
    let text = value.trim();
    if text.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        text.to_string()
    }
}

impl BrokerContact {
    /// Row in CSV_COLUMNS order, blanks replaced by "N/A".
    pub fn to_row(&self) -> Vec<String> {
        vec![
            na_or(&self.full_name),
            na_or(&self.phone_number),
            na_or(&self.location),
            na_or(&self.company),
            na_or(&self.email),
            na_or(&self.source_url),
            na_or(&self.notes),
        ]
    }

    fn phone_digits(&self) -> String {
        self.phone_number
            .chars()
            .filter(|c| c.is_ascii_digit())
            .collect()
    }

    fn has_phone(&self) -> bool {
        let phone = self.phone_number.trim();
        !phone.is_empty() && phone != NOT_AVAILABLE
    }

    /// Composite key used to collapse duplicate rows. When a phone is
    /// present its digits participate, so the same person listed with and
    /// without a phone stays as two rows.
    pub fn dedup_key(&self) -> String {
        let name = self.full_name.trim().to_lowercase();
        let company = self.company.trim().to_lowercase();
        if self.has_phone() {
            format!("{}|{}|{}", name, self.phone_digits(), company)
        } else {
            format!("{}|{}", name, company)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, phone: &str, company: &str) -> BrokerContact {
        BrokerContact {
            full_name: name.to_string(),
            phone_number: phone.to_string(),
            location: String::new(),
            company: company.to_string(),
            email: String::new(),
            source_url: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn dedup_key_ignores_phone_formatting() {
        let a = contact("Jane Doe", "555-123-4567", "Acme Co");
        let b = contact("Jane Doe", "(555) 123-4567", "Acme Co");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn missing_phone_uses_short_key() {
        let a = contact("Jane Doe", "", "Acme Co");
        let b = contact("Jane Doe", "N/A", "Acme Co");
        assert_eq!(a.dedup_key(), "jane doe|acme co");
        assert_eq!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn phone_and_no_phone_are_distinct() {
        let with = contact("Jane Doe", "555-123-4567", "Acme Co");
        let without = contact("Jane Doe", "", "Acme Co");
        assert_ne!(with.dedup_key(), without.dedup_key());
    }

    #[test]
    fn row_replaces_blanks_with_sentinel() {
        let c = contact("Jane Doe", "  ", "Acme Co");
        let row = c.to_row();
        assert_eq!(row[0], "Jane Doe");
        assert_eq!(row[1], "N/A");
        assert_eq!(row.len(), CSV_COLUMNS.len());
    }
}
