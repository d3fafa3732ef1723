//! Result formatting: the `reconcile` command's answer, rendered either as
//! a small `tracing`-free human summary or as a JSON envelope.
//!
//! Grounded in `examples/bobisme-bones/crates/bones-cli/src/output.rs`'s
//! `OutputMode` shape, cut down to the two modes this CLI actually needs.

use std::fmt::Write as _;
use std::str::FromStr;

use cophy_core::event::Event;
use cophy_core::semiring::builder::Fragment;
use cophy_core::tree::Node;
use serde::Serialize;
use serde_json::json;

/// How to render a `reconcile` result on stdout/`--output`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// A short human-readable summary line plus (when present) the
    /// Newick-with-annotations event tree.
    Text,
    /// The full JSON envelope.
    Json,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputMode::Text),
            "json" => Ok(OutputMode::Json),
            other => Err(format!("unknown output mode {other:?}, expected 'text' or 'json'")),
        }
    }
}

/// One rendered `reconcile` result, independent of which `--method` chose
/// it: a scalar (or vector-keyed) cost summary plus, where the method
/// produced one, a witness history tree.
#[derive(Debug, Serialize)]
pub struct ReconcileReport {
    pub cost: serde_json::Value,
    pub history: Option<String>,
}

/// Render a single minimum-cost answer (`--method` omitted).
pub fn from_cost(cost: i64) -> ReconcileReport {
    ReconcileReport {
        cost: json!(cost),
        history: None,
    }
}

/// Render a `single-solution` answer: a cost plus one witness [`Fragment`].
pub fn from_single_solution(cost: i64, history: Option<&Fragment>) -> ReconcileReport {
    ReconcileReport {
        cost: json!(cost),
        history: history.map(|h| render_fragment(h)),
    }
}

/// Render an `all-solutions` answer: a cost plus every witness.
pub fn from_all_solutions(cost: i64, histories: &[Fragment]) -> ReconcileReport {
    let rendered: Vec<String> = histories.iter().map(|h| render_fragment(h)).collect();
    ReconcileReport {
        cost: json!(cost),
        history: Some(rendered.join(";\n")),
    }
}

/// Render a `pareto` answer: the Pareto frontier of event-count vectors
/// paired with how many co-optimal histories achieve each one.
pub fn from_pareto(frontier: &[(cophy_core::costs::EventVector, u64)]) -> ReconcileReport {
    let entries: Vec<_> = frontier
        .iter()
        .map(|(v, count)| json!({ "vector": v, "count": count }))
        .collect();
    ReconcileReport {
        cost: json!(entries),
        history: None,
    }
}

impl ReconcileReport {
    pub fn write(&self, mode: OutputMode) -> String {
        match mode {
            OutputMode::Json => {
                serde_json::to_string_pretty(&json!({
                    "cost": self.cost,
                    "history": self.history,
                }))
                .expect("report serializes")
            }
            OutputMode::Text => {
                let mut out = String::new();
                let _ = writeln!(out, "cost: {}", self.cost);
                if let Some(history) = &self.history {
                    let _ = writeln!(out, "history: {history}");
                }
                out
            }
        }
    }
}

/// Render a history fragment as Newick with bracketed annotations, the
/// event tree's wire format. A [`Fragment`] carries
/// only the event kind at each node (host and contents are tracked by the
/// recurrence's DP table, not by the structural semirings), so the
/// rendered annotations are limited to the keys derivable from the event
/// itself: `kind`, `segment`, `gained`, `cut`, `transfer`.
pub fn render_fragment(node: &Node<Event>) -> String {
    let mut out = String::new();
    write_fragment(node, &mut out);
    out.push(';');
    out
}

fn write_fragment(node: &Node<Event>, out: &mut String) {
    if !node.children.is_empty() {
        out.push('(');
        for (i, edge) in node.children.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_fragment(&edge.node, out);
        }
        out.push(')');
    }
    out.push_str(&annotation(&node.data));
}

fn annotation(event: &Event) -> String {
    match event {
        Event::Extant => "[&kind=extant]".to_string(),
        Event::Codiverge => "[&kind=codiverge]".to_string(),
        Event::Diverge { segment, cut, transfer, result } => {
            format!(
                "[&kind=diverge,segment={},cut={cut},transfer={transfer},result={result}]",
                render_contents(segment)
            )
        }
        Event::Gain { gained } => format!("[&kind=gain,gained={}]", render_contents(gained)),
        Event::Loss { segment } => format!("[&kind=loss,segment={}]", render_contents(segment)),
    }
}

fn render_contents(contents: &cophy_core::event::Contents) -> String {
    match contents {
        cophy_core::event::Contents::Ordered(items) => {
            format!("({})", items.join(","))
        }
        cophy_core::event::Contents::Unordered(items) => {
            let quoted: Vec<String> = items.iter().map(|i| format!("\"{i}\"")).collect();
            format!("{{{}}}", quoted.join(","))
        }
    }
}
