//! Operator model.
//!
//! Operators are modeled as anonymous, interchangeable slots during
//! solving (`ConfigSnapshot::num_operators`, spec §4.1) unless
//! `consider_operator_skills` is set, in which case an operator's
//! `qualified_machines` restricts which machine-pinned tasks it may be
//! assigned to.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A human operator available to staff tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    /// Unique operator identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Machines this operator is qualified to run. Empty = qualified for
    /// all machines. Only consulted when
    /// `ConfigSnapshot::consider_operator_skills` is `true`.
    pub qualified_machines: BTreeSet<String>,
    /// Whether the operator is available for this week's plan.
    pub active: bool,
}

impl Operator {
    /// Creates a new active operator, qualified for all machines.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            qualified_machines: BTreeSet::new(),
            active: true,
        }
    }

    /// Sets the operator name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a machine qualification.
    pub fn with_qualification(mut self, machine_id: impl Into<String>) -> Self {
        self.qualified_machines.insert(machine_id.into());
        self
    }

    /// Marks the operator inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Whether this operator may run the given machine.
    ///
    /// An empty `qualified_machines` set means "qualified for everything".
    pub fn is_qualified_for(&self, machine_id: &str) -> bool {
        self.qualified_machines.is_empty() || self.qualified_machines.contains(machine_id)
    }
}
