//! Configuration snapshot and objective blend weights.
//!
//! A [`ConfigSnapshot`] is captured on every [`crate::models::Programacion`]
//! at creation time (spec §6, "Configuration snapshot") so that re-deriving
//! calendar mappings or KPIs later never depends on whatever the "current"
//! global configuration happens to be — the §9 "global session state"
//! open question is resolved by threading this struct explicitly through
//! every operation that needs it.

use serde::{Deserialize, Serialize};

/// Immutable scheduling/calendar configuration captured per plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    /// Number of working days in the horizon (e.g. 5 for Mon-Fri).
    pub labor_days: u32,
    /// Minutes of productive shift time per labor day.
    pub shift_minutes_per_day: u32,
    /// Minutes of unpaid lunch break inserted at the midpoint of each day,
    /// excluded from `shift_minutes_per_day`.
    pub lunch_minutes: u32,
    /// Clock time the shift starts each labor day, as minutes since
    /// midnight (e.g. 480 for 08:00).
    pub shift_start_clock_minutes: u32,
    /// Number of anonymous operator slots available to the solver.
    pub num_operators: u32,
    /// Whether the solver restricts operator assignment to an operator's
    /// declared `qualified_machines` (§9 open question, default off —
    /// matches the original's observable behavior of not modeling
    /// per-operator machine qualification in the solved model).
    pub consider_operator_skills: bool,
    /// Maximum solver wall time, in seconds.
    pub solver_time_budget_secs: f64,
    /// Whether a task's `setup_min` is added to its `duration_min` when
    /// computing occupancy (`parametros_optimizacion.restricciones.considerar_setup`,
    /// default true).
    pub consider_setup: bool,
}

impl ConfigSnapshot {
    /// Total clock minutes a labor day spans, including the lunch break.
    pub fn day_span_minutes(&self) -> u32 {
        self.shift_minutes_per_day + self.lunch_minutes
    }
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            labor_days: 5,
            shift_minutes_per_day: 480,
            lunch_minutes: 60,
            shift_start_clock_minutes: 480,
            num_operators: 1,
            consider_operator_skills: false,
            solver_time_budget_secs: 30.0,
            consider_setup: true,
        }
    }
}

/// Blend weights for the `MAXIMIZE_UTILIZATION` and `BALANCED` objectives
/// (spec §4.1/§4.5). Defaults are the literal constants observed in the
/// original CP model (`makespan*5 + imbalance*10`, `makespan*7 + idle*3`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Makespan coefficient in the `MAXIMIZE_UTILIZATION` blend.
    pub utilization_makespan: f64,
    /// Machine-load-imbalance coefficient in the `MAXIMIZE_UTILIZATION` blend.
    pub utilization_imbalance: f64,
    /// Makespan coefficient in the `BALANCED` blend.
    pub balanced_makespan: f64,
    /// Total-idle-time coefficient in the `BALANCED` blend.
    pub balanced_idle: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            utilization_makespan: 5.0,
            utilization_imbalance: 10.0,
            balanced_makespan: 7.0,
            balanced_idle: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_day_span_includes_lunch() {
        let cfg = ConfigSnapshot::default();
        assert_eq!(cfg.day_span_minutes(), 540);
    }

    #[test]
    fn default_objective_weights_match_original_constants() {
        let w = ObjectiveWeights::default();
        assert_eq!(w.utilization_makespan, 5.0);
        assert_eq!(w.utilization_imbalance, 10.0);
        assert_eq!(w.balanced_makespan, 7.0);
        assert_eq!(w.balanced_idle, 3.0);
    }
}
