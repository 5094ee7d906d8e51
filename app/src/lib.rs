//! Harvest application shell.
//!
//! Wires configuration, the site catalogue, link collection, email
//! extraction and the record store behind a command-line interface that
//! works on saved HTML pages.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod state;

use anyhow::Context;
use cli::{Cli, Command, QueueCommand};
use commands::{links, queue, records, scrape, sites};
use harvest_core::AppConfig;
use harvest_store::emails_text;
use serde::Serialize;
use state::AppState;

/// Initialize the tracing subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,harvest=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Load the configuration named on the command line, or the default one,
/// with environment overrides applied.
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let path = cli.config.as_deref();
    AppConfig::load_with_env(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config".to_string(),
    })
}

/// Run one command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;

    // Commands that never touch the record history.
    match &cli.command {
        Command::Normalize { urls } => {
            let normalized = records::normalize_urls(urls);
            return print(cli.json, &normalized, || {
                normalized
                    .iter()
                    .map(|url| url.normalized.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            });
        }
        Command::Queue(command) => return run_queue(&cli, &config, command),
        _ => {}
    }

    let state = match &cli.records {
        Some(path) => AppState::with_records_path(config, path)?,
        None => AppState::new(config)?,
    };

    match cli.command {
        Command::Scrape {
            files,
            site,
            journal,
            topic,
            source_url,
        } => {
            let request = scrape::ScrapeRequest {
                files,
                site,
                journal,
                topic,
                source_url,
            };
            let summary = scrape::scrape(&state, request).await?;
            print(cli.json, &summary, || {
                let mut lines: Vec<String> = summary
                    .pages
                    .iter()
                    .map(|page| {
                        format!(
                            "{}: {} found, {} new",
                            page.file.display(),
                            page.found,
                            page.added.len()
                        )
                    })
                    .collect();
                lines.extend(
                    summary
                        .failed
                        .iter()
                        .map(|(file, reason)| format!("{}: failed ({reason})", file.display())),
                );
                lines.push(format!(
                    "{} new emails, {} records stored",
                    summary.added(),
                    state.store.len()
                ));
                lines.join("\n")
            })
        }
        Command::Links {
            file,
            site,
            base_url,
            limit,
            queue,
        } => {
            let request = links::LinksRequest {
                file,
                site,
                base_url,
                limit,
                queue,
            };
            let summary = links::collect_links(&state, &request)?;
            print(cli.json, &summary, || summary.links.join("\n"))
        }
        Command::Sites { rule } => {
            let rules = sites::list_sites(&state, rule.as_deref())?;
            print(cli.json, &rules, || {
                let mut lines = Vec::new();
                for rule in &rules {
                    lines.push(rule.label.clone());
                    for site in &rule.sites {
                        lines.push(format!(
                            "  {} [{}] {}",
                            site.label,
                            site.hosts.join(", "),
                            site.base_url
                        ));
                    }
                }
                lines.join("\n")
            })
        }
        Command::Records { unique, emails } => {
            let rows = records::list_records(&state, unique);
            print(cli.json, &rows, || {
                if emails {
                    return emails_text(&rows);
                }
                rows.iter()
                    .map(|record| {
                        format!(
                            "{}  {}  {}  {}{}",
                            record.timestamp_utc,
                            record.id,
                            record.email,
                            record.verified,
                            if record.duplicate { "  (duplicate)" } else { "" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        Command::Verify { id, verdict } => {
            let summary = records::verify_record(&state, &id, &verdict)?;
            print(cli.json, &summary, || {
                format!("{} marked {}", summary.id, summary.verified)
            })
        }
        Command::Export { path, format } => {
            let summary = records::export_records(&state, path.as_deref(), format)?;
            print(cli.json, &summary, || {
                format!("Exported {} records to {}", summary.records, summary.path.display())
            })
        }
        Command::Clear => {
            let removed = records::clear_records(&state)?;
            print(cli.json, &removed, || format!("Removed {removed} records"))
        }
        Command::Normalize { .. } | Command::Queue(_) => Ok(()),
    }
}

fn run_queue(cli: &Cli, config: &AppConfig, command: &QueueCommand) -> anyhow::Result<()> {
    match command {
        QueueCommand::Add {
            queue: queue_path,
            input,
            prefix,
        } => {
            let prefix = prefix.as_deref().unwrap_or(&config.queue.url_prefix);
            let urls = queue::paste_into_queue(queue_path, input, prefix)?;
            print(cli.json, &urls.urls(), || {
                format!("{} entries in {}", urls.len(), queue_path.display())
            })
        }
        QueueCommand::Dedup { queue: queue_path } => {
            let removed = queue::dedup_queue(queue_path)?;
            print(cli.json, &removed, || format!("Removed {removed} repeated entries"))
        }
        QueueCommand::Show { queue: queue_path } => {
            let urls = queue::open_queue(queue_path)?;
            print(cli.json, &urls.urls(), || urls.urls().join("\n"))
        }
    }
}

fn print<T, F>(json: bool, value: &T, text: F) -> anyhow::Result<()>
where
    T: Serialize + ?Sized,
    F: FnOnce() -> String,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        let text = text();
        if !text.is_empty() {
            println!("{text}");
        }
    }
    Ok(())
}
