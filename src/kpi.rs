//! OEE/OTIF/utilization calculator.
//!
//! A pure function over `(RealExecution, PlannedTask)` pairs — no store
//! access, so it can be unit-tested directly against the literal
//! scenarios in spec §8 and reused by both the lifecycle manager's
//! auto-KPI-on-completion trigger and the explicit recompute operation.
//!
//! # Reference
//! `examples/original_source/utils/kpi_calculator.py::calcular_metricas_completas`
//! and `calcular_eficiencia_machines` for the formula set this is a
//! direct structural translation of.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime, Weekday};

use crate::config::ConfigSnapshot;
use crate::error::{OperationError, OperationResult};
use crate::models::{EstadoTarea, MachineEfficiency, Metric, PlannedTask, RealExecution};
use crate::store::ProgramacionStore;

/// Tolerance for the OTIF on-time determination, in minutes.
pub const OTIF_TOLERANCE_MIN: i64 = 5;
/// Utilization threshold above which a machine qualifies as a bottleneck.
pub const BOTTLENECK_THRESHOLD_PCT: f64 = 85.0;

fn weekday_for(dia: u32) -> OperationResult<Weekday> {
    match dia {
        0 => Ok(Weekday::Mon),
        1 => Ok(Weekday::Tue),
        2 => Ok(Weekday::Wed),
        3 => Ok(Weekday::Thu),
        4 => Ok(Weekday::Fri),
        5 => Ok(Weekday::Sat),
        6 => Ok(Weekday::Sun),
        other => Err(OperationError::InvalidInput(format!("invalid dia_semana {other}"))),
    }
}

fn parse_hhmm(hhmm: &str) -> OperationResult<(u32, u32)> {
    let (h, m) = hhmm
        .split_once(':')
        .ok_or_else(|| OperationError::InvalidInput(format!("malformed HH:MM '{hhmm}'")))?;
    let h: u32 = h.parse().map_err(|_| OperationError::InvalidInput(format!("malformed HH:MM '{hhmm}'")))?;
    let m: u32 = m.parse().map_err(|_| OperationError::InvalidInput(format!("malformed HH:MM '{hhmm}'")))?;
    Ok((h, m))
}

/// Reconstructs the planned datetime of a `(dia, HH:MM)` pair within an
/// ISO `(anio, semana)` week.
pub fn planned_datetime(anio: i32, semana: u32, dia: u32, hhmm: &str) -> OperationResult<NaiveDateTime> {
    let weekday = weekday_for(dia)?;
    let date = NaiveDate::from_isoywd_opt(anio, semana, weekday)
        .ok_or_else(|| OperationError::InvalidInput(format!("invalid ISO week {anio}-W{semana}")))?;
    let (h, m) = parse_hhmm(hhmm)?;
    date.and_hms_opt(h, m, 0)
        .ok_or_else(|| OperationError::InvalidInput(format!("invalid time '{hhmm}'")))
}

fn round_to_min(duration: chrono::Duration) -> i64 {
    duration.num_minutes()
}

/// Computes the full KPI bundle for a plan whose `(anio, semana)` and
/// configuration are given, joining every execution with its planned
/// task. `fecha_calculo` is supplied by the caller since this function
/// cannot read the clock (spec §9 reproducibility requirement:
/// recomputing KPIs over unchanged executions must reproduce the same
/// `Metric` bit-for-bit modulo `fecha_calculo`).
pub fn compute_kpis(
    programacion_id: &str,
    anio: i32,
    semana: u32,
    config: &ConfigSnapshot,
    planned_tasks: &[PlannedTask],
    executions: &[RealExecution],
    fecha_calculo: NaiveDateTime,
) -> OperationResult<Metric> {
    let planned_by_id: BTreeMap<&str, &PlannedTask> =
        planned_tasks.iter().map(|p| (p.id.as_str(), p)).collect();

    let mut sum_plan_total = 0i64;
    let mut sum_real_total = 0i64;
    let mut sum_paradas = 0i64;
    let mut tasks_without_problems = 0u32;
    let mut tasks_on_time = 0u32;
    let mut total_tasks = 0u32;
    let mut per_machine_productive: BTreeMap<String, i64> = BTreeMap::new();
    let mut per_machine_setup: BTreeMap<String, i64> = BTreeMap::new();
    let mut min_inicio: Option<NaiveDateTime> = None;
    let mut max_fin: Option<NaiveDateTime> = None;

    for execution in executions {
        let Some(&planned) = planned_by_id.get(execution.planned_task_id.as_str()) else {
            continue;
        };
        let Some(fin_real) = execution.fin_real else {
            continue;
        };

        let inicio_plan = planned_datetime(anio, semana, planned.dia, &planned.hora_inicio)?;
        let fin_plan = planned_datetime(anio, semana, planned.dia, &planned.hora_fin)?;
        let dur_plan_total = round_to_min(fin_plan - inicio_plan);
        let dur_real_total = round_to_min(fin_real - execution.inicio_real);
        let dur_real_prod = (dur_real_total - execution.tiempo_paradas_min as i64).max(0);
        let dev = dur_real_prod - dur_plan_total;

        sum_plan_total += dur_plan_total;
        sum_real_total += dur_real_total;
        sum_paradas += execution.tiempo_paradas_min as i64;
        total_tasks += 1;
        if !execution.has_problems() {
            tasks_without_problems += 1;
        }
        if dev.abs() <= OTIF_TOLERANCE_MIN {
            tasks_on_time += 1;
        }

        let machine = if execution.maquina_usada.is_empty() {
            planned.machine_id.clone()
        } else {
            execution.maquina_usada.clone()
        };
        *per_machine_productive.entry(machine.clone()).or_insert(0) += dur_real_prod;
        *per_machine_setup.entry(machine).or_insert(0) += execution.tiempo_paradas_min as i64;

        min_inicio = Some(min_inicio.map_or(execution.inicio_real, |m| m.min(execution.inicio_real)));
        max_fin = Some(max_fin.map_or(fin_real, |m| m.max(fin_real)));
    }

    let availability = if sum_plan_total > 0 {
        (((sum_plan_total - sum_paradas) as f64 / sum_plan_total as f64) * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    let performance = if sum_real_total > 0 {
        sum_plan_total as f64 / sum_real_total as f64 * 100.0
    } else {
        0.0
    };
    let quality = if total_tasks > 0 {
        tasks_without_problems as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };
    let oee = availability * performance * quality / 10_000.0;
    let otif = if total_tasks > 0 {
        tasks_on_time as f64 / total_tasks as f64 * 100.0
    } else {
        0.0
    };

    let day_capacity = (config.labor_days * config.shift_minutes_per_day) as f64;
    let mut per_machine = BTreeMap::new();
    let mut weighted_util_sum = 0.0;
    let mut weight_total = 0.0;
    let mut bottleneck: Option<String> = None;
    let mut bottleneck_productive = -1i64;

    for (machine_id, &productive_min) in &per_machine_productive {
        let setup_min = per_machine_setup.get(machine_id).copied().unwrap_or(0);
        let utilization_pct = if day_capacity > 0.0 {
            ((productive_min + setup_min) as f64 / day_capacity * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };
        per_machine.insert(
            machine_id.clone(),
            MachineEfficiency {
                productive_min: productive_min.max(0) as u32,
                setup_min: setup_min.max(0) as u32,
                utilization_pct,
            },
        );
        weighted_util_sum += utilization_pct * productive_min as f64;
        weight_total += productive_min as f64;

        if utilization_pct > BOTTLENECK_THRESHOLD_PCT && productive_min > bottleneck_productive {
            bottleneck_productive = productive_min;
            bottleneck = Some(machine_id.clone());
        }
    }

    let utilizacion_global_pct = if weight_total > 0.0 {
        weighted_util_sum / weight_total
    } else {
        0.0
    };

    let makespan_real_min = match (min_inicio, max_fin) {
        (Some(start), Some(end)) => round_to_min(end - start).max(0) as u32,
        _ => 0,
    };

    Ok(Metric {
        programacion_id: programacion_id.to_string(),
        fecha_calculo,
        disponibilidad_oee: availability,
        rendimiento_oee: performance,
        calidad_oee: quality,
        oee_global: oee,
        otif_porcentaje: otif,
        utilizacion_global_pct,
        cuello_botella: bottleneck,
        makespan_real_min,
        per_machine,
    })
}

/// Explicit corrective recompute (spec §4.6 caching rule): normally KPIs
/// are computed once on transition to `completada` and never again, but
/// this operation exists for correcting a stored `Metric` after the fact
/// (e.g. a late-arriving execution correction), bypassing that default.
pub fn recompute_metrics(
    store: &impl ProgramacionStore,
    prog_id: &str,
    fecha_calculo: NaiveDateTime,
) -> OperationResult<Metric> {
    let prog = store.get_programacion(prog_id)?;
    let planned = store.planned_tasks_for(prog_id);
    let executions = store.executions_for(prog_id);
    let metric = compute_kpis(
        prog_id,
        prog.anio as i32,
        prog.semana,
        &prog.config,
        &planned,
        &executions,
        fecha_calculo,
    )?;
    store.put_metric(metric.clone())?;
    Ok(metric)
}
