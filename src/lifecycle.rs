//! Plan lifecycle manager: creation, state transitions, and deletion
//! (spec §4.3).
//!
//! # Reference
//! `examples/original_source/db_helpers.py`'s plan-transition helpers,
//! which this module's transition guard and auto-KPI trigger follow.

use tracing::warn;

use crate::config::ConfigSnapshot;
use crate::error::{OperationError, OperationResult};
use crate::execution::is_ready_for_completion;
use crate::kpi::compute_kpis;
use crate::models::{EstadoProgramacion, Objective, Programacion};
use crate::store::ProgramacionStore;
use chrono::NaiveDateTime;

/// Creates a new plan in `Simulacion` state for `(anio, semana)`.
///
/// Does not enforce per-week uniqueness: a week may accumulate any number
/// of simulations, only one of which may ever become `Planificada` (spec
/// §4.3, enforced by [`transition`]).
pub fn create_programacion(
    store: &impl ProgramacionStore,
    anio: u32,
    semana: u32,
    objective: Objective,
    config: ConfigSnapshot,
) -> String {
    let prog = Programacion::new("", anio, semana, objective, config);
    store.create_programacion(prog)
}

/// Transitions `prog_id` to `target`, enforcing the allowed-transition
/// graph, per-week active-plan uniqueness, and the auto-KPI-on-completion
/// trigger (spec §4.3).
///
/// A transition into `Completada` additionally requires every planned
/// task to have a finished execution recorded (spec §4.4 readiness
/// check). KPI computation failure on completion is logged but does not
/// revert the transition (spec §7 propagation policy: a plan may
/// complete with stale or absent metrics rather than get stuck).
pub fn transition(
    store: &impl ProgramacionStore,
    prog_id: &str,
    target: EstadoProgramacion,
    fecha_calculo: NaiveDateTime,
) -> OperationResult<Programacion> {
    let mut prog = store.get_programacion(prog_id)?;

    if !prog.estado.can_transition_to(target) {
        return Err(OperationError::StateTransitionRejected {
            current: prog.estado,
            allowed: prog.estado.allowed_transitions().to_vec(),
        });
    }

    if target == EstadoProgramacion::Planificada
        && store.active_exists_for_week(prog.anio, prog.semana, prog_id)
    {
        return Err(OperationError::Conflict(format!(
            "another plan is already active for {}-W{:02}",
            prog.anio, prog.semana
        )));
    }

    if target == EstadoProgramacion::Completada && !is_ready_for_completion(store, prog_id) {
        return Err(OperationError::Conflict(
            "not every planned task has a finished execution recorded".into(),
        ));
    }

    prog.estado = target;
    store.update_programacion(prog.clone())?;

    if target == EstadoProgramacion::Completada {
        let planned = store.planned_tasks_for(prog_id);
        let executions = store.executions_for(prog_id);
        match compute_kpis(
            prog_id,
            prog.anio as i32,
            prog.semana,
            &prog.config,
            &planned,
            &executions,
            fecha_calculo,
        ) {
            Ok(metric) => {
                if let Err(e) = store.put_metric(metric) {
                    warn!(programacion_id = %prog_id, error = %e, "failed to persist metric after completion");
                }
            }
            Err(e) => {
                warn!(programacion_id = %prog_id, error = %e, "failed to compute metrics after completion");
            }
        }
    }

    Ok(prog)
}

/// Deletes a plan, cascading to its planned tasks, executions, and
/// metric (spec §4.3 cascade rule).
///
/// # Errors
/// [`OperationError::Conflict`] if the plan is not `deletable_at_all`, or
/// is not `freely_deletable` and `force` is false.
pub fn delete_programacion(
    store: &impl ProgramacionStore,
    prog_id: &str,
    force: bool,
) -> OperationResult<()> {
    let prog = store.get_programacion(prog_id)?;
    if !prog.estado.deletable_at_all() {
        return Err(OperationError::Conflict(format!(
            "plan '{prog_id}' in state {:?} can never be deleted",
            prog.estado
        )));
    }
    if !prog.estado.freely_deletable() && !force {
        return Err(OperationError::Conflict(format!(
            "plan '{prog_id}' in state {:?} requires force deletion",
            prog.estado
        )));
    }
    store.delete_programacion_cascade(prog_id)
}
