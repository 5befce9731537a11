//! `pr-bot` executable.
//!
//! Reads the configuration, wires up logging, and hands off to [`pr_bot::start`].

use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use pr_bot::base::{config::Config, types::Void};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Track personal records and run leaderboards for a Slack fitness community.
///
/// Settings are read from a TOML file and `PR_BOT_*` environment variables.
/// `RUST_LOG`, when set, replaces the verbosity flags entirely.
#[derive(Parser, Debug)]
#[command(name = "pr-bot", version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file (defaults to `.hidden/config.toml`).
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Log more of the bot's own activity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    init_tracing(args.verbose)?;

    let config = Config::load(args.config.as_deref())?;

    pr_bot::start(config).await
}

/// Default filter when `RUST_LOG` is unset.
///
/// Dependencies stay at `warn` so store and socket chatter does not drown out
/// command handling; only the bot's own level follows `-v`.
fn default_directives(verbose: u8) -> String {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    format!("warn,pr_bot={level}")
}

fn init_tracing(verbose: u8) -> Void {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
    let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("pr-bot");
    let otel = tracing_opentelemetry::layer().with_tracer(tracer);

    tracing_subscriber::registry().with(filter).with(otel).with(stdout).init();

    Ok(())
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_only_raises_the_bots_own_level() {
        assert_eq!(default_directives(0), "warn,pr_bot=info");
        assert_eq!(default_directives(1), "warn,pr_bot=debug");
        assert_eq!(default_directives(5), "warn,pr_bot=trace");
    }

    #[test]
    fn default_directives_parse() {
        for verbose in 0..3 {
            assert!(EnvFilter::try_new(default_directives(verbose)).is_ok());
        }
    }
}
