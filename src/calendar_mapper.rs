//! Maps solver output (flat minutes) onto labor-day clock time.
//!
//! The solver deliberately has no day-boundary awareness (spec §4.1
//! constraint 5); this module is the sole place that turns a flat
//! `[0, H]` interval into `(dia, HH:MM)` pairs, splitting a task into
//! contiguous parts when it straddles a day boundary.
//!
//! # Reference
//! `examples/original_source/optimizador_produccion.py`'s calendar
//! post-processing step and `db_helpers.py::dividir_tarea_en_partes` for
//! the split algorithm this is a direct structural translation of.

use tracing::debug;

use crate::config::ConfigSnapshot;
use crate::engine::{Assignment, SolveResult};
use crate::error::{OperationError, OperationResult};
use crate::models::PlannedTask;

/// Minutes-since-midnight formatted as `HH:MM`.
fn clock(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}

/// Maps every assignment in `result` onto the labor-day calendar,
/// splitting tasks that cross a day boundary.
///
/// # Errors
/// Returns [`OperationError::InvalidInput`] if an assignment is missing
/// its start/end (degraded during solving, per spec §4.1 failure
/// semantics) — calendar mapping errors short-circuit the whole mapping,
/// no partial plan is persisted (spec §7 propagation policy).
pub fn map_to_calendar(
    programacion_id: &str,
    result: &SolveResult,
    config: &ConfigSnapshot,
) -> OperationResult<Vec<PlannedTask>> {
    let h_day = config.shift_minutes_per_day;
    if h_day == 0 {
        return Err(OperationError::InvalidInput(
            "shift_minutes_per_day must be positive".into(),
        ));
    }

    let mut planned = Vec::new();
    for assignment in &result.assignments {
        planned.extend(map_one(programacion_id, assignment, config, h_day)?);
    }
    Ok(planned)
}

fn map_one(
    programacion_id: &str,
    assignment: &Assignment,
    config: &ConfigSnapshot,
    h_day: u32,
) -> OperationResult<Vec<PlannedTask>> {
    let start = assignment.start.ok_or_else(|| {
        OperationError::InvalidInput(format!(
            "assignment for task '{}' is missing a start minute",
            assignment.task_id
        ))
    })?;
    let end = assignment.end.ok_or_else(|| {
        OperationError::InvalidInput(format!(
            "assignment for task '{}' is missing an end minute",
            assignment.task_id
        ))
    })?;
    let machine_id = assignment.machine_id.clone().ok_or_else(|| {
        OperationError::InvalidInput(format!(
            "assignment for task '{}' has no resolved machine",
            assignment.task_id
        ))
    })?;
    let operator_index = assignment.operator_index.unwrap_or(0);

    let day_index = start / h_day;

    // Single-day case: the segment ends within `day_index`, or exactly on
    // its boundary (handled by the edge rule below).
    if end.saturating_sub(1) / h_day == day_index || end == day_index * h_day {
        let inicio_min = start % h_day;
        let fin_min = if end == (day_index + 1) * h_day {
            h_day
        } else {
            end % h_day
        };
        let pt = PlannedTask::new(
            format!("{}.P1", assignment.task_id),
            programacion_id,
            assignment.task_id.clone(),
            start,
            end,
            machine_id,
            operator_index,
            day_index,
            clock(config.shift_start_clock_minutes + inicio_min),
            clock(config.shift_start_clock_minutes + fin_min),
            end - start,
        )
        .with_duration_template_min(assignment.duration_template_min);
        return Ok(vec![pt]);
    }

    // Multi-day split: walk forward consuming up to a day's remaining
    // capacity each iteration.
    let mut parts = Vec::new();
    let mut cursor = start;
    let mut parte_numero = 1u32;
    while cursor < end {
        let day = cursor / h_day;
        let day_end = (day + 1) * h_day;
        let segment_end = end.min(day_end);
        let inicio_min = cursor % h_day;
        // Edge rule (spec §4.2 step 4): a part ending exactly on the day
        // boundary reports the shift-end clock time, not next day's
        // shift-start.
        let fin_min = if segment_end == day_end { h_day } else { segment_end % h_day };

        let pt = PlannedTask::new(
            format!("{}.P{}", assignment.task_id, parte_numero),
            programacion_id,
            assignment.task_id.clone(),
            cursor,
            segment_end,
            machine_id.clone(),
            operator_index,
            day,
            clock(config.shift_start_clock_minutes + inicio_min),
            clock(config.shift_start_clock_minutes + fin_min),
            segment_end - cursor,
        )
        .as_split_part(parte_numero)
        .with_duration_template_min(assignment.duration_template_min);
        parts.push(pt);

        cursor = segment_end;
        parte_numero += 1;
    }

    debug!(task_id = %assignment.task_id, parts = parts.len(), "split task across day boundary");
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::SolveStatus;

    fn config(h_day: u32) -> ConfigSnapshot {
        ConfigSnapshot {
            labor_days: 2,
            shift_minutes_per_day: h_day,
            lunch_minutes: 0,
            shift_start_clock_minutes: 480,
            ..ConfigSnapshot::default()
        }
    }

    fn result_with(assignments: Vec<Assignment>) -> SolveResult {
        SolveResult {
            status: SolveStatus::Optimal,
            wall_time_secs: 0.0,
            objective_value: Some(0.0),
            assignments,
        }
    }

    #[test]
    fn single_day_task_is_not_split() {
        let assignment = Assignment {
            task_id: "A1".into(),
            task_index: 0,
            start: Some(0),
            end: Some(60),
            machine_id: Some("M1".into()),
            operator_index: Some(0),
            duration_template_min: 60,
        };
        let planned = map_to_calendar("PROG-1", &result_with(vec![assignment]), &config(540)).unwrap();
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].dia, 0);
        assert_eq!(planned[0].hora_inicio, "08:00");
        assert_eq!(planned[0].hora_fin, "09:00");
        assert!(!planned[0].es_dividida);
        assert_eq!(planned[0].inicio_planificado, 0);
        assert_eq!(planned[0].fin_planificado, 60);
        assert_eq!(planned[0].fin_planificado - planned[0].inicio_planificado, 60);
        assert!(planned[0].reconciles_with(480, 540));
    }

    #[test]
    fn day_cross_split_matches_scenario_s2() {
        let assignment = Assignment {
            task_id: "T1".into(),
            task_index: 0,
            start: Some(0),
            end: Some(600),
            machine_id: Some("M1".into()),
            operator_index: Some(0),
            duration_template_min: 60,
        };
        let planned = map_to_calendar("PROG-1", &result_with(vec![assignment]), &config(540)).unwrap();
        assert_eq!(planned.len(), 2);

        assert_eq!(planned[0].id, "T1.P1");
        assert_eq!(planned[0].dia, 0);
        assert_eq!(planned[0].hora_inicio, "08:00");
        assert_eq!(planned[0].hora_fin, "18:00");
        assert_eq!(planned[0].duracion_min, 540);
        assert!(planned[0].es_dividida);
        assert_eq!(planned[0].inicio_planificado, 0);
        assert_eq!(planned[0].fin_planificado, 540);
        assert!(planned[0].reconciles_with(480, 540));

        assert_eq!(planned[1].id, "T1.P2");
        assert_eq!(planned[1].dia, 1);
        assert_eq!(planned[1].hora_inicio, "08:00");
        assert_eq!(planned[1].hora_fin, "09:00");
        assert_eq!(planned[1].duracion_min, 60);
        assert!(planned[1].es_dividida);
        assert_eq!(planned[1].inicio_planificado, 540);
        assert_eq!(planned[1].fin_planificado, 600);
        assert!(planned[1].reconciles_with(480, 540));

        let total: u32 = planned.iter().map(|p| p.duracion_min).sum();
        assert_eq!(total, 600);
        assert_eq!(planned.last().unwrap().fin_planificado - planned[0].inicio_planificado, total);
    }

    #[test]
    fn missing_start_is_invalid_input() {
        let assignment = Assignment {
            task_id: "A1".into(),
            task_index: 0,
            start: None,
            end: Some(60),
            machine_id: Some("M1".into()),
            operator_index: Some(0),
            duration_template_min: 60,
        };
        let err = map_to_calendar("PROG-1", &result_with(vec![assignment]), &config(540)).unwrap_err();
        assert!(matches!(err, OperationError::InvalidInput(_)));
    }
}
