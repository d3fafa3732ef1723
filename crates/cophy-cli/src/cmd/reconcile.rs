//! The `reconcile` subcommand: read the host/associate/costs envelope,
//! run the core over the chosen semiring, write the result.
//!
//! Grounded in `examples/bobisme-bones/crates/bones-cli/src/cmd/verify.rs`'s
//! plain-function-per-command shape: parse inputs, call into the library
//! crate, report errors with `anyhow::bail!`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use cophy_core::costs::EventCosts;
use cophy_core::facade::reconcile as core_reconcile;
use cophy_core::semiring::{AllHistories, Count, MinPlus, ParetoSelector, Selector, SingleHistory};
use serde::Deserialize;
use tracing::info;

use crate::newick;
use crate::output::{self, OutputMode, ReconcileReport};

/// The `--method` values this command allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// No `--method`: bare minimum cost under `MinPlus`.
    MinCost,
    SingleSolution,
    AllSolutions,
    Pareto,
}

impl std::str::FromStr for Method {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single-solution" => Ok(Method::SingleSolution),
            "all-solutions" => Ok(Method::AllSolutions),
            "pareto" => Ok(Method::Pareto),
            other => anyhow::bail!("unknown --method {other:?}, expected one of: single-solution, all-solutions, pareto"),
        }
    }
}

/// The input JSON envelope: Newick trees plus optional cost overrides.
#[derive(Debug, Deserialize)]
struct InputDoc {
    host_tree: String,
    associate_tree: String,
    #[serde(default)]
    costs: Option<EventCosts>,
}

/// Run the `reconcile` subcommand end to end.
#[allow(clippy::too_many_arguments)]
pub fn run(
    input: &Path,
    output_path: Option<&Path>,
    config_path: Option<&Path>,
    allow_unsampled: bool,
    cost_overrides: &[(String, i64)],
    method: Option<Method>,
    output_mode: OutputMode,
) -> Result<()> {
    let raw = fs::read_to_string(input).with_context(|| format!("reading input file {}", input.display()))?;
    let doc: InputDoc = serde_json::from_str(&raw).context("parsing input JSON envelope")?;

    let host_tree = newick::parse_host_tree(&doc.host_tree)?;
    let associate_tree = newick::parse_associate_tree(&doc.associate_tree)?;

    // Layered cost resolution, narrowest scope wins: built-in defaults,
    // then `--config`, then the input envelope's own `costs`, then
    // repeated `--cost KEY=VALUE` flags.
    let mut costs = EventCosts::default();
    if let Some(path) = config_path {
        let raw = fs::read_to_string(path).with_context(|| format!("reading config file {}", path.display()))?;
        costs = toml::from_str(&raw).context("parsing --config TOML")?;
    }
    if let Some(envelope_costs) = doc.costs {
        costs = envelope_costs;
    }
    for (key, value) in cost_overrides {
        if !costs.set(key, *value) {
            anyhow::bail!("unrecognized cost key {key:?}");
        }
    }

    info!(
        allow_unsampled,
        method = ?method,
        "running reconciliation"
    );

    let report = run_with_method(&costs, &associate_tree, &host_tree, allow_unsampled, method)?;
    let rendered = report.write(output_mode);

    match output_path {
        Some(path) => fs::write(path, rendered).with_context(|| format!("writing output file {}", path.display()))?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn run_with_method(
    costs: &EventCosts,
    associate_tree: &cophy_core::tree::Node<cophy_core::event::Associate>,
    host_tree: &cophy_core::host::HostTree,
    allow_unsampled: bool,
    method: Option<Method>,
) -> Result<ReconcileReport> {
    match method {
        None | Some(Method::MinCost) => {
            let cost = core_reconcile::<MinPlus>(costs, associate_tree, host_tree, allow_unsampled)?;
            Ok(output::from_cost(cost))
        }
        Some(Method::SingleSolution) => {
            let (cost, history) =
                core_reconcile::<Selector<MinPlus, SingleHistory>>(costs, associate_tree, host_tree, allow_unsampled)?;
            Ok(output::from_single_solution(cost, history.as_ref()))
        }
        Some(Method::AllSolutions) => {
            let (cost, histories) =
                core_reconcile::<Selector<MinPlus, AllHistories>>(costs, associate_tree, host_tree, allow_unsampled)?;
            Ok(output::from_all_solutions(cost, &histories))
        }
        Some(Method::Pareto) => {
            let frontier = core_reconcile::<ParetoSelector<Count>>(&(), associate_tree, host_tree, allow_unsampled)?;
            Ok(output::from_pareto(&frontier))
        }
    }
}
