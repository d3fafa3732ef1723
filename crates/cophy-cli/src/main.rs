#![forbid(unsafe_code)]

mod cmd;
mod newick;
mod output;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use output::OutputMode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "cophy: a semiring-polymorphic cophylogeny reconciliation engine",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile a host phylogeny and an associate phylogeny.
    Reconcile {
        /// Input JSON file: `host_tree`, `associate_tree` (Newick with
        /// `[&host=...,contents=...]` annotations on associate leaves),
        /// and an optional `costs` object.
        #[arg(short, long)]
        input: PathBuf,

        /// Write the result here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// TOML file of default event costs, overridable by the input
        /// envelope's own `costs` and by `--cost` flags.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Graft an unsampled sibling onto every host node before
        /// reconciling.
        #[arg(short = 'u', long)]
        allow_unsampled: bool,

        /// Override one event cost, e.g. `-c loss=2`. Repeatable.
        #[arg(short = 'c', long = "cost", value_parser = parse_cost_override)]
        cost: Vec<(String, i64)>,

        /// Which semiring to run: `single-solution`, `all-solutions`, or
        /// `pareto`. Omit for the bare minimum cost.
        #[arg(short, long)]
        method: Option<String>,

        /// Size of the rayon thread pool used to evaluate binarization
        /// branches in parallel. Defaults to the rayon/system default.
        #[arg(short, long)]
        processes: Option<usize>,

        /// Output rendering: `text` (default) or `json`.
        #[arg(long, default_value = "text")]
        format: OutputMode,
    },
}

fn parse_cost_override(raw: &str) -> Result<(String, i64), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {raw:?}"))?;
    let value: i64 = value
        .parse()
        .map_err(|_| format!("cost value {value:?} is not an integer"))?;
    Ok((key.to_string(), value))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("COPHY_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "cophy=debug,info"
        } else {
            "cophy=info,warn"
        })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Reconcile {
            input,
            output,
            config,
            allow_unsampled,
            cost,
            method,
            processes,
            format,
        } => {
            if let Some(n) = processes {
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build_global()
                    .ok();
            }
            let method = method.map(|m| m.parse()).transpose()?;
            cmd::reconcile::run(
                &input,
                output.as_deref(),
                config.as_deref(),
                allow_unsampled,
                &cost,
                method,
                format,
            )
        }
    }
}
