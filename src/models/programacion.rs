//! The weekly production plan ("programación") and its lifecycle state.
//!
//! # Reference
//! `examples/original_source/modelos/database_models.py`'s
//! `EstadoProgramacion` enum, transcribed verbatim (same 5 states, same
//! ordering).

use serde::{Deserialize, Serialize};

use crate::config::ConfigSnapshot;

/// Objective the solver optimized for when producing this plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Pure makespan minimization.
    MinimizeMakespan,
    /// `makespan * w1 + load_imbalance * w2`, minimized.
    MaximizeUtilization,
    /// Sum of per-machine completion times, minimized (proxy for
    /// machine-hours cost).
    MinimizeCostProxy,
    /// `makespan * w1 + total_idle * w2`, minimized.
    Balanced,
}

/// Lifecycle state of a [`Programacion`].
///
/// # Reference
/// `database_models.py::EstadoProgramacion`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoProgramacion {
    /// A trial solve result, not yet committed. Freely re-solvable and
    /// deletable.
    Simulacion,
    /// Approved; the week's single active plan. Still deletable
    /// (force-delete only).
    Planificada,
    /// Execution has started; machine/operator assignments are now being
    /// tracked against reality. Never deletable.
    EnExecucion,
    /// All planned tasks have recorded executions. Terminal. Never
    /// deletable.
    Completada,
    /// Abandoned before or during execution. Terminal. Freely deletable.
    Cancelada,
}

impl EstadoProgramacion {
    /// States this state may transition into (spec §4.3).
    pub fn allowed_transitions(self) -> &'static [EstadoProgramacion] {
        use EstadoProgramacion::*;
        match self {
            Simulacion => &[Planificada, Cancelada],
            Planificada => &[EnExecucion, Cancelada],
            EnExecucion => &[Completada, Cancelada],
            Completada => &[],
            Cancelada => &[],
        }
    }

    /// Whether transitioning to `target` is allowed from this state.
    pub fn can_transition_to(self, target: EstadoProgramacion) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Whether a plan in this state may be deleted without a force flag.
    pub fn freely_deletable(self) -> bool {
        matches!(self, EstadoProgramacion::Simulacion | EstadoProgramacion::Cancelada)
    }

    /// Whether a plan in this state can ever be deleted (force or not).
    pub fn deletable_at_all(self) -> bool {
        !matches!(self, EstadoProgramacion::EnExecucion | EstadoProgramacion::Completada)
    }
}

/// A weekly production plan.
///
/// Owns its [`super::planned_task::PlannedTask`]s, [`super::real_execution::RealExecution`]s,
/// and cached [`super::metric::Metric`] exclusively — deleting a plan
/// cascades to all three (spec §3 Ownership, §4.3 cascade semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Programacion {
    /// `PROG-<anio>-W<semana:02>-<seq:03>`.
    pub id: String,
    pub anio: u32,
    pub semana: u32,
    pub estado: EstadoProgramacion,
    pub objective: Objective,
    pub config: ConfigSnapshot,
    /// Solver wall-clock time, in seconds.
    pub solver_wall_time_secs: f64,
    /// Makespan in minutes, as produced by the solver (flat timeline, no
    /// calendar awareness — spec §4.1).
    pub makespan_min: u32,
}

impl Programacion {
    /// Creates a new plan in `Simulacion` state.
    pub fn new(
        id: impl Into<String>,
        anio: u32,
        semana: u32,
        objective: Objective,
        config: ConfigSnapshot,
    ) -> Self {
        Self {
            id: id.into(),
            anio,
            semana,
            estado: EstadoProgramacion::Simulacion,
            objective,
            config,
            solver_wall_time_secs: 0.0,
            makespan_min: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_allow_no_transitions() {
        assert!(EstadoProgramacion::Completada.allowed_transitions().is_empty());
        assert!(EstadoProgramacion::Cancelada.allowed_transitions().is_empty());
    }

    #[test]
    fn simulacion_can_become_planificada_or_cancelada_only() {
        let s = EstadoProgramacion::Simulacion;
        assert!(s.can_transition_to(EstadoProgramacion::Planificada));
        assert!(s.can_transition_to(EstadoProgramacion::Cancelada));
        assert!(!s.can_transition_to(EstadoProgramacion::EnExecucion));
        assert!(!s.can_transition_to(EstadoProgramacion::Completada));
    }

    #[test]
    fn deletability_matches_spec() {
        assert!(EstadoProgramacion::Simulacion.freely_deletable());
        assert!(!EstadoProgramacion::Planificada.freely_deletable());
        assert!(EstadoProgramacion::Planificada.deletable_at_all());
        assert!(!EstadoProgramacion::EnExecucion.deletable_at_all());
        assert!(!EstadoProgramacion::Completada.deletable_at_all());
    }
}
