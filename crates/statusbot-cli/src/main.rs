#![deny(unsafe_code)]

//! statusbot CLI — a minimal host for the info responder.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use statusbot_config::AppConfig;
use statusbot_core::response::LinkControl;
use statusbot_core::{InfoReply, Responder, RuntimeSnapshot};

/// statusbot — answers "what build is this?" with a status reply.
#[derive(Parser)]
#[command(name = "statusbot", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "statusbot.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the info reply.
    Info {
        /// Platform latency to report in milliseconds (negative = unmeasured).
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        latency: i64,

        /// Print the reply as JSON instead of markdown.
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved build identity.
    Identity,

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    statusbot_core::runtime::mark_started();
    let cli = Cli::parse();

    let found = cli.config.exists();
    let config = if found {
        AppConfig::load(&cli.config).await?
    } else {
        AppConfig::default()
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose, &config.logging.level))),
        )
        .with_writer(std::io::stderr)
        .init();

    if !found {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
    }

    match cli.command {
        Commands::Info { latency, json } => cmd_info(&config, latency, json).await?,
        Commands::Identity => cmd_identity(&config).await,
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
    }

    Ok(())
}

/// `-v` flags override the configured level.
fn log_filter(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

async fn cmd_info(config: &AppConfig, latency: i64, json: bool) -> Result<()> {
    let responder = Responder::from_config(config).await;
    let reply = responder.respond(RuntimeSnapshot::capture(latency));

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
    } else {
        print!("{}", render_reply(&reply));
    }
    Ok(())
}

async fn cmd_identity(config: &AppConfig) {
    let responder = Responder::from_config(config).await;
    let identity = responder.identity();
    println!(
        "version: {}",
        identity.version.as_deref().unwrap_or("unknown")
    );
    println!(
        "commit: {}",
        identity.revision.as_deref().unwrap_or("unknown")
    );
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str =
            toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {e}"))?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

/// The document followed by one line per link control.
fn render_reply(reply: &InfoReply) -> String {
    let mut out = reply.document.to_string();
    if !reply.links.is_empty() {
        out.push('\n');
        for link in &reply.links {
            let _ = writeln!(out, "{}", render_link(link));
        }
    }
    out
}

fn render_link(link: &LinkControl) -> String {
    match &link.icon {
        Some(icon) => format!("{icon} {}: {}", link.label, link.url),
        None => format!("{}: {}", link.label, link.url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use statusbot_core::BuildIdentity;

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0, "warn"), "warn");
        assert_eq!(log_filter(1, "warn"), "debug");
        assert_eq!(log_filter(3, "warn"), "trace");
    }

    #[test]
    fn test_cli_parses_negative_latency() {
        let cli = Cli::try_parse_from(["statusbot", "info", "--latency", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Info {
                latency: -1,
                json: false
            }
        ));
        assert_eq!(cli.config, PathBuf::from("statusbot.toml"));
    }

    #[test]
    fn test_render_reply() {
        let config = AppConfig::parse(
            r#"
            [info]
            intro = "Hello."
            notes = ["Ask us anything."]

            [[links]]
            label = "Privacy"
            url = "https://example.com/privacy"
            icon = "privacy"

            [[links]]
            label = "Discord"
            url = "https://discord.gg/example"

            [icons]
            privacy = "🔒"
            "#,
        )
        .unwrap();
        let identity = BuildIdentity {
            version: Some("1.0.0".to_string()),
            revision: None,
        };
        let reply = Responder::new(&config, identity).respond(RuntimeSnapshot {
            uptime_seconds: 61,
            latency_millis: 12,
        });

        assert_eq!(
            render_reply(&reply),
            "Hello.\n\nAsk us anything.\n\n\
             **Version:** 1.0.0\n**Uptime:** 1m 1s\n**Ping:** 12ms\n\n\
             🔒 Privacy: https://example.com/privacy\n\
             Discord: https://discord.gg/example\n"
        );
    }
}
