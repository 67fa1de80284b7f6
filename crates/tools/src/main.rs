use std::path::PathBuf;

use clap::{Parser, Subcommand};
use presence::selection::ColorPhase;
use tools::{TimelineRequest, format_points, format_timeline, load_config, strobe_report, timeline};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Preview the presence globe's camera timelines and marker strobe.
#[derive(Debug, Parser)]
#[command(name = "presence", version)]
struct Cli {
    /// JSON config file; defaults apply to anything it leaves out.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the points of interest with their codes and camera profiles.
    Points {
        #[arg(long)]
        json: bool,
    },
    /// Print the camera steps run when a point is selected.
    Timeline {
        /// Point being selected, e.g. "London, UK".
        #[arg(long)]
        to: String,
        /// Point selected before; omit for a first selection.
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        mobile: bool,
        #[arg(long)]
        json: bool,
    },
    /// Print one marker's strobe visual at a point in the cycle.
    Strobe {
        #[arg(long)]
        at: f64,
        #[arg(long, default_value = "red")]
        phase: ColorPhase,
        #[arg(long)]
        hover: bool,
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = real_main(Cli::parse()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("json: {e}"))
}

fn real_main(cli: Cli) -> Result<(), String> {
    let cfg = load_config(cli.config.as_deref())?;
    debug!(config = ?cli.config, "config loaded");

    match cli.command {
        Command::Points { json } => {
            if json {
                println!("{}", to_json(presence::points::points())?);
            } else {
                print!("{}", format_points());
            }
        }
        Command::Timeline {
            to,
            from,
            mobile,
            json,
        } => {
            let rows = timeline(&cfg, &TimelineRequest { to, from, mobile })?;
            if json {
                println!("{}", to_json(&rows)?);
            } else {
                print!("{}", format_timeline(&rows));
            }
        }
        Command::Strobe {
            at,
            phase,
            hover,
            json,
        } => {
            let report = strobe_report(&cfg, at, phase, hover);
            if json {
                println!("{}", to_json(&report)?);
            } else {
                println!(
                    "t={}ms window={} phase={} alt={:.4} radius={:.4} color={}",
                    report.at_ms,
                    report.window,
                    report.phase,
                    report.altitude,
                    report.radius,
                    report.color
                );
            }
        }
    }
    Ok(())
}
