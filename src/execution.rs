//! Execution recorder: logging real-world task execution against a plan
//! and deriving its deviation from the schedule (spec §4.4).
//!
//! # Reference
//! `examples/original_source/db_helpers.py`'s execution-registration
//! helpers and `database_models.py::RealExecution` for the deviation
//! formulas this module computes.

use chrono::NaiveDateTime;

use crate::config::ConfigSnapshot;
use crate::error::{OperationError, OperationResult};
use crate::kpi::planned_datetime;
use crate::models::{EstadoProgramacion, EstadoTarea, PlannedTask, RealExecution};
use crate::store::ProgramacionStore;

/// Tolerance beyond which a finished execution is marked `Retrasada`
/// rather than `Completada`, in minutes (spec §4.4 derivation rule).
pub const RETRASO_TOLERANCE_MIN: i64 = 30;

fn deviations(
    anio: i32,
    semana: u32,
    planned: &PlannedTask,
    inicio_real: NaiveDateTime,
    fin_real: Option<NaiveDateTime>,
    tiempo_paradas_min: u32,
) -> OperationResult<(i64, Option<i64>, Option<i64>)> {
    let inicio_plan = planned_datetime(anio, semana, planned.dia, &planned.hora_inicio)?;
    let desviacion_inicio = (inicio_real - inicio_plan).num_minutes();

    let Some(fin_real) = fin_real else {
        return Ok((desviacion_inicio, None, None));
    };
    let fin_plan = planned_datetime(anio, semana, planned.dia, &planned.hora_fin)?;
    let desviacion_fin = (fin_real - fin_plan).num_minutes();

    let duracion_real = (fin_real - inicio_real).num_minutes();
    let duracion_productiva = (duracion_real - tiempo_paradas_min as i64).max(0);
    let desviacion_duracion = duracion_productiva - planned.duration_template_min as i64;

    Ok((desviacion_inicio, Some(desviacion_fin), Some(desviacion_duracion)))
}

fn derive_estado(desviacion_duracion: Option<i64>) -> EstadoTarea {
    match desviacion_duracion {
        None => EstadoTarea::EnProgreso,
        Some(dev) if dev > RETRASO_TOLERANCE_MIN => EstadoTarea::Retrasada,
        Some(_) => EstadoTarea::Completada,
    }
}

/// Registers a new execution against `planned_task_id`.
///
/// # Errors
/// - [`OperationError::NotFound`] if the planned task or its owning plan
///   do not exist.
/// - [`OperationError::Conflict`] if an execution already exists for this
///   planned task (enforced by the store, spec §4.4 one-execution-per-task
///   rule), or if the owning plan is not `EnExecucion`.
#[allow(clippy::too_many_arguments)]
pub fn register(
    store: &impl ProgramacionStore,
    planned_task_id: &str,
    inicio_real: NaiveDateTime,
    fin_real: Option<NaiveDateTime>,
    maquina_usada: impl Into<String>,
    operador: impl Into<String>,
    problemas: Vec<String>,
    tiempo_paradas_min: u32,
) -> OperationResult<RealExecution> {
    let planned = store.get_planned_task(planned_task_id)?;
    let prog = store.get_programacion(&planned.programacion_id)?;
    if prog.estado != EstadoProgramacion::EnExecucion {
        return Err(OperationError::Conflict(format!(
            "plan '{}' is not en_ejecucion, cannot register executions",
            prog.id
        )));
    }

    let (desviacion_inicio, desviacion_fin, desviacion_duracion) = deviations(
        prog.anio as i32,
        prog.semana,
        &planned,
        inicio_real,
        fin_real,
        tiempo_paradas_min,
    )?;

    let mut execution = RealExecution::start(
        format!("{planned_task_id}-RE"),
        planned_task_id,
        inicio_real,
    )
    .with_maquina_usada(maquina_usada)
    .with_operador(operador)
    .with_tiempo_paradas(tiempo_paradas_min)
    .with_problemas(problemas);
    execution.fin_real = fin_real;
    execution = execution.with_deviations(
        desviacion_inicio,
        desviacion_fin.unwrap_or(0),
        desviacion_duracion.unwrap_or(0),
    );
    if desviacion_fin.is_none() {
        execution.desviacion_fin = None;
        execution.desviacion_duracion = None;
    }
    execution.estado = derive_estado(desviacion_duracion);

    store.insert_execution(execution.clone())?;
    Ok(execution)
}

/// Updates an existing execution's end time, stoppages, or problem
/// reports, recomputing its deviations and derived status.
///
/// # Errors
/// [`OperationError::NotFound`] if the execution or its planned task do
/// not exist.
pub fn update(
    store: &impl ProgramacionStore,
    execution_id: &str,
    fin_real: Option<NaiveDateTime>,
    tiempo_paradas_min: Option<u32>,
    problemas: Option<Vec<String>>,
    notas: Option<String>,
) -> OperationResult<RealExecution> {
    let mut execution = store.get_execution(execution_id)?;
    let planned = store.get_planned_task(&execution.planned_task_id)?;
    let prog = store.get_programacion(&planned.programacion_id)?;

    if let Some(fin_real) = fin_real {
        execution.fin_real = Some(fin_real);
    }
    if let Some(paradas) = tiempo_paradas_min {
        execution.tiempo_paradas_min = paradas;
    }
    if let Some(problemas) = problemas {
        execution.problemas = problemas;
    }
    if let Some(notas) = notas {
        execution.notas = notas;
    }

    let (desviacion_inicio, desviacion_fin, desviacion_duracion) = deviations(
        prog.anio as i32,
        prog.semana,
        &planned,
        execution.inicio_real,
        execution.fin_real,
        execution.tiempo_paradas_min,
    )?;
    execution.desviacion_inicio = Some(desviacion_inicio);
    execution.desviacion_fin = desviacion_fin;
    execution.desviacion_duracion = desviacion_duracion;
    execution.estado = derive_estado(desviacion_duracion);

    store.update_execution(execution.clone())?;
    Ok(execution)
}

/// Deletes an execution, provided its owning plan has not been
/// `Completada` (spec §4.3: completed plans are immutable).
pub fn delete(store: &impl ProgramacionStore, execution_id: &str) -> OperationResult<()> {
    let execution = store.get_execution(execution_id)?;
    let planned = store.get_planned_task(&execution.planned_task_id)?;
    let prog = store.get_programacion(&planned.programacion_id)?;
    if prog.estado == EstadoProgramacion::Completada {
        return Err(OperationError::Conflict(format!(
            "plan '{}' is completed, executions are immutable",
            prog.id
        )));
    }
    store.delete_execution(execution_id)
}

/// Whether every planned task of `prog_id` has a recorded, finished
/// execution — the precondition for transitioning to `Completada`
/// (spec §4.3).
pub fn is_ready_for_completion(store: &impl ProgramacionStore, prog_id: &str) -> bool {
    let planned = store.planned_tasks_for(prog_id);
    if planned.is_empty() {
        return false;
    }
    planned.iter().all(|pt| {
        store
            .execution_for_planned_task(&pt.id)
            .is_some_and(|ex| ex.is_finished())
    })
}
