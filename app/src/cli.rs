//! Command-line interface definition.

use crate::commands::records::ExportFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Email harvesting over saved journal pages.
#[derive(Debug, Parser)]
#[command(name = "harvest")]
#[command(about = "Extract and deduplicate contact emails from saved journal pages")]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "HARVEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Records file used for cross-session dedup
    #[arg(long, global = true)]
    pub records: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract emails from saved HTML pages into the record history
    Scrape {
        /// Saved HTML pages
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Site the pages come from (also the default journal)
        #[arg(short, long)]
        site: Option<String>,

        /// Journal recorded on every record
        #[arg(short, long)]
        journal: Option<String>,

        /// Topic recorded on every record
        #[arg(short, long)]
        topic: Option<String>,

        /// Source URL recorded on every record (defaults to the file path)
        #[arg(long)]
        source_url: Option<String>,
    },

    /// Collect same-site links from a saved HTML page
    Links {
        /// Saved HTML page
        file: PathBuf,

        /// Site whose hosts are allowed
        #[arg(short, long)]
        site: Option<String>,

        /// URL the page was loaded from, for resolving relative links
        #[arg(long)]
        base_url: Option<String>,

        /// Maximum number of links
        #[arg(short, long)]
        limit: Option<usize>,

        /// Queue file the links are appended to
        #[arg(short, long)]
        queue: Option<PathBuf>,
    },

    /// List site rules
    Sites {
        /// Only this rule
        #[arg(short, long)]
        rule: Option<String>,
    },

    /// Print the canonical form of URLs
    Normalize {
        /// URLs to normalize
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the record history
    Records {
        /// Only the first sighting of each address
        #[arg(short, long)]
        unique: bool,

        /// Print addresses only, one per line
        #[arg(short, long)]
        emails: bool,
    },

    /// Set the verification status of a record
    Verify {
        /// Record id
        id: String,

        /// `true`, `false` or `unknown`
        verdict: String,
    },

    /// Write the record history to a CSV or XLSX file
    Export {
        /// Output file (defaults to the configured export location)
        path: Option<PathBuf>,

        /// File format (defaults to the extension of PATH, then CSV)
        #[arg(short, long, value_enum)]
        format: Option<ExportFormat>,
    },

    /// Remove every record
    Clear,

    /// Manage a URL queue file
    #[command(subcommand)]
    Queue(QueueCommand),
}

/// Queue file commands.
#[derive(Debug, Subcommand)]
pub enum QueueCommand {
    /// Append the lines of a text file to the queue
    Add {
        /// Queue file
        queue: PathBuf,

        /// Text file with one entry per line
        input: PathBuf,

        /// Text prepended to every line (defaults to `queue.url_prefix`)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Remove repeated entries
    Dedup {
        /// Queue file
        queue: PathBuf,
    },

    /// Print the queue
    Show {
        /// Queue file
        queue: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_scrape() {
        let cli = Cli::try_parse_from([
            "harvest", "scrape", "a.html", "b.html", "--site", "Wiley", "--topic", "oncology",
        ])
        .expect("parse scrape");

        match cli.command {
            Command::Scrape {
                files, site, topic, ..
            } => {
                assert_eq!(files.len(), 2);
                assert_eq!(site.as_deref(), Some("Wiley"));
                assert_eq!(topic.as_deref(), Some("oncology"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_queue_add() {
        let cli = Cli::try_parse_from([
            "harvest", "--json", "queue", "add", "q.txt", "dois.txt", "--prefix", "https://doi.org/",
        ])
        .expect("parse queue add");

        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Command::Queue(QueueCommand::Add { prefix: Some(_), .. })
        ));
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::try_parse_from(["harvest", "export", "out.bin", "--format", "xlsx"])
            .expect("parse export");

        assert!(matches!(
            cli.command,
            Command::Export {
                format: Some(ExportFormat::Xlsx),
                ..
            }
        ));
        assert!(Cli::try_parse_from(["harvest", "export", "--format", "ods"]).is_err());
    }

    #[test]
    fn test_parse_verify() {
        let cli = Cli::try_parse_from(["harvest", "verify", "some-id", "true"])
            .expect("parse verify");
        assert!(matches!(cli.command, Command::Verify { .. }));
        assert!(Cli::try_parse_from(["harvest", "verify", "some-id"]).is_err());
    }

    #[test]
    fn test_scrape_requires_files() {
        assert!(Cli::try_parse_from(["harvest", "scrape"]).is_err());
    }
}
