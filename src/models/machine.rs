//! Machine model.
//!
//! A machine is a physical production resource that tasks are assigned to
//! during solving. Unlike the teacher framework's generic `Resource`, a
//! machine here has no notion of capacity or skills — those concerns
//! belong to [`super::operator::Operator`] and the per-task
//! [`super::job::MachineSpec`].
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};

/// A machine on the production floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Whether the machine is available for this week's plan.
    pub active: bool,
}

impl Machine {
    /// Creates a new active machine.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            active: true,
        }
    }

    /// Sets the machine name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the machine inactive (e.g. out for maintenance this week).
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_to_active() {
        let m = Machine::new("M1").with_name("CNC 1");
        assert_eq!(m.id, "M1");
        assert_eq!(m.name, "CNC 1");
        assert!(m.active);
    }

    #[test]
    fn inactive_flips_flag() {
        let m = Machine::new("M2").inactive();
        assert!(!m.active);
    }
}
