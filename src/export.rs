use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::models::{BrokerContact, Result, CSV_COLUMNS};

/// First-seen-wins dedup over the composite key. Visit order decides which
/// duplicate's fields survive.
pub fn dedup_contacts(contacts: Vec<BrokerContact>) -> Vec<BrokerContact> {
    let mut seen: HashSet<String> = HashSet::new();
    contacts
        .into_iter()
        .filter(|c| seen.insert(c.dedup_key()))
        .collect()
}

/// Write the deduped contacts as CSV with the fixed column set. The file is
/// overwritten on every run.
pub fn write_csv(path: &Path, contacts: &[BrokerContact]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_COLUMNS)?;
    for contact in contacts {
        writer.write_record(contact.to_row())?;
    }
    writer.flush()?;
    info!("Saved {} contacts to {}", contacts.len(), path.display());
    Ok(())
}
