use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "ecw-broker-scraper",
    about = "Scrape business-broker directories for express-car-wash broker contacts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: SiteCommand,
}

#[derive(Debug, Subcommand)]
pub enum SiteCommand {
    /// Scrape BizQuest state broker directories
    Bizquest {
        /// New York only
        #[arg(long)]
        ny: bool,
        /// Florida only
        #[arg(long)]
        fl: bool,
    },
    /// Scrape BusinessBroker.net state pages
    Businessbroker {
        #[arg(long)]
        ny: bool,
        #[arg(long)]
        fl: bool,
    },
    /// Scrape the Crexi find-a-broker directory
    Crexi {
        #[arg(long)]
        ny: bool,
        #[arg(long)]
        fl: bool,
    },
    /// Scrape IBBA search results (Dallas, TX / 250 miles)
    Ibba,
    /// Run every site back to back
    All,
}

/// Region restriction from the boolean flags. `None` means "all configured
/// regions", which is what makes a run a full run (clear-then-append on the
/// sheet). Exactly one flag set restricts to that region.
pub fn region_filter(ny: bool, fl: bool) -> Option<&'static str> {
    match (ny, fl) {
        (true, false) => Some("New York"),
        (false, true) => Some("Florida"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_flag_restricts_the_run() {
        assert_eq!(region_filter(true, false), Some("New York"));
        assert_eq!(region_filter(false, true), Some("Florida"));
    }

    #[test]
    fn no_flags_or_both_flags_run_everything() {
        assert_eq!(region_filter(false, false), None);
        assert_eq!(region_filter(true, true), None);
    }

    #[test]
    fn parses_site_subcommand_with_flag() {
        let cli = Cli::parse_from(["ecw-broker-scraper", "bizquest", "--ny"]);
        match cli.command {
            SiteCommand::Bizquest { ny, fl } => {
                assert!(ny);
                assert!(!fl);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
