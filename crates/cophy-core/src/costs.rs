//! Event costs and the cost vector used by the Pareto semiring.
//!
//! Grounded in `examples/original_source/src/superrec2/compute/util.py`,
//! which keeps one scalar cost per event kind and a `Counter`-backed
//! vector of per-kind event counts for the Pareto front. Defaults are
//! the conventional defaults for this kind of cost model.

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Per-event-kind scalar costs, as configured by `--cost KEY=VALUE` or a
/// `--config` TOML file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventCosts {
    #[serde(default)]
    pub speciation: i64,
    #[serde(default = "default_one")]
    pub duplication: i64,
    #[serde(default = "default_one")]
    pub transfer_duplication: i64,
    #[serde(default = "default_one")]
    pub cut: i64,
    #[serde(default = "default_one")]
    pub transfer_cut: i64,
    #[serde(default = "default_one")]
    pub loss: i64,
    /// Cost of a single item gained; zero unless configured, since a gain
    /// is usually modeled as free bookkeeping rather than an event to be
    /// penalized; only the six named events carry a cost by default.
    #[serde(default)]
    pub gain: i64,
}

fn default_one() -> i64 {
    1
}

impl Default for EventCosts {
    fn default() -> Self {
        Self {
            speciation: 0,
            duplication: 1,
            transfer_duplication: 1,
            cut: 1,
            transfer_cut: 1,
            loss: 1,
            gain: 0,
        }
    }
}

impl EventCosts {
    /// Scalar cost of a single event under these costs, used by `MinPlus`
    /// and `MaxPlus`.
    #[must_use]
    pub fn of(&self, event: &Event) -> i64 {
        match event {
            Event::Extant => 0,
            Event::Codiverge => self.speciation,
            Event::Diverge { cut, transfer, .. } => match (cut, transfer) {
                (false, false) => self.duplication,
                (false, true) => self.transfer_duplication,
                (true, false) => self.cut,
                (true, true) => self.transfer_cut,
            },
            Event::Gain { gained } => self.gain * gained.len() as i64,
            Event::Loss { segment } => self.loss * segment.len().max(1) as i64,
        }
    }

    /// Override a single named cost by key, as used by repeated
    /// `--cost KEY=VALUE` CLI flags. Returns `false` if `key` is
    /// unrecognized.
    pub fn set(&mut self, key: &str, value: i64) -> bool {
        match key {
            "speciation" => self.speciation = value,
            "duplication" => self.duplication = value,
            "transfer_duplication" => self.transfer_duplication = value,
            "cut" => self.cut = value,
            "transfer_cut" => self.transfer_cut = value,
            "loss" => self.loss = value,
            "gain" => self.gain = value,
            _ => return false,
        }
        true
    }
}

/// A per-event-kind count vector, the value type of the `Count` and
/// `Pareto` semirings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventVector {
    pub speciation: u32,
    pub duplication: u32,
    pub transfer_duplication: u32,
    pub cut: u32,
    pub transfer_cut: u32,
    pub loss: u32,
}

impl EventVector {
    /// A vector with a single event of `event`'s kind counted.
    #[must_use]
    pub fn of(event: &Event) -> Self {
        let mut v = Self::default();
        match event {
            Event::Extant | Event::Gain { .. } => {}
            Event::Codiverge => v.speciation = 1,
            Event::Diverge { cut, transfer, .. } => match (cut, transfer) {
                (false, false) => v.duplication = 1,
                (false, true) => v.transfer_duplication = 1,
                (true, false) => v.cut = 1,
                (true, true) => v.transfer_cut = 1,
            },
            Event::Loss { .. } => v.loss = 1,
        }
        v
    }

    /// Total scalar cost this vector represents under `costs`.
    #[must_use]
    pub fn scalar_cost(&self, costs: &EventCosts) -> i64 {
        i64::from(self.speciation) * costs.speciation
            + i64::from(self.duplication) * costs.duplication
            + i64::from(self.transfer_duplication) * costs.transfer_duplication
            + i64::from(self.cut) * costs.cut
            + i64::from(self.transfer_cut) * costs.transfer_cut
            + i64::from(self.loss) * costs.loss
    }

    /// True if `self` is no worse than `other` in every coordinate — the
    /// dominance test the Pareto semiring prunes with.
    #[must_use]
    pub fn dominates(&self, other: &Self) -> bool {
        self.speciation <= other.speciation
            && self.duplication <= other.duplication
            && self.transfer_duplication <= other.transfer_duplication
            && self.cut <= other.cut
            && self.transfer_cut <= other.transfer_cut
            && self.loss <= other.loss
    }
}

impl Add for EventVector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            speciation: self.speciation + rhs.speciation,
            duplication: self.duplication + rhs.duplication,
            transfer_duplication: self.transfer_duplication + rhs.transfer_duplication,
            cut: self.cut + rhs.cut,
            transfer_cut: self.transfer_cut + rhs.transfer_cut,
            loss: self.loss + rhs.loss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_costs_match_documented_defaults() {
        let c = EventCosts::default();
        assert_eq!(c.speciation, 0);
        assert_eq!(c.duplication, 1);
        assert_eq!(c.loss, 1);
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut c = EventCosts::default();
        assert!(!c.set("bogus", 5));
        assert!(c.set("duplication", 5));
        assert_eq!(c.duplication, 5);
    }

    #[test]
    fn dominance_is_reflexive() {
        let v = EventVector { duplication: 2, ..Default::default() };
        assert!(v.dominates(&v));
    }
}
