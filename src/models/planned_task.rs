//! Planned task: the calendar-mapped output of a solve.
//!
//! One [`PlannedTask`] is emitted per task per contiguous on-calendar
//! segment — a task that crosses a day boundary is split into multiple
//! `PlannedTask`s sharing the same `task_id` (spec §4.2).

use serde::{Deserialize, Serialize};

/// A task instance placed on the calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTask {
    /// Identifier unique within the owning plan.
    pub id: String,
    /// Owning plan.
    pub programacion_id: String,
    /// Source task template.
    pub task_id: String,
    /// This segment's start, in flat minutes relative to week start — the
    /// engine's source of truth, carried forward unchanged by the
    /// calendar mapper (spec §3, §9 reconciliation note).
    pub inicio_planificado: u32,
    /// This segment's end, in flat minutes relative to week start.
    pub fin_planificado: u32,
    /// Assigned machine.
    pub machine_id: String,
    /// Assigned operator slot (0-indexed, anonymous unless
    /// `consider_operator_skills` resolved it to a real operator id
    /// elsewhere).
    pub operator_index: u32,
    /// 0-indexed day within the plan's labor week this segment falls on.
    pub dia: u32,
    /// Segment start, as `HH:MM` clock time.
    pub hora_inicio: String,
    /// Segment end, as `HH:MM` clock time.
    pub hora_fin: String,
    /// Minutes of work covered by this segment.
    pub duracion_min: u32,
    /// The source task template's original `duration_min`, snapshotted
    /// unchanged across every split part — distinct from `duracion_min`,
    /// which is this segment's own (possibly setup-augmented, possibly
    /// split-shortened) share. Execution deviation is computed against
    /// this field, never against `duracion_min` (spec §4.4).
    pub duration_template_min: u32,
    /// 1-indexed position of this segment among the parts of its source
    /// task (1 if the task was not split).
    pub parte_numero: u32,
    /// Whether this task was split across multiple calendar segments.
    /// Spec §4.2 step 3: every part of a split task carries `true`, not
    /// just the continuation parts.
    pub es_dividida: bool,
}

impl PlannedTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        programacion_id: impl Into<String>,
        task_id: impl Into<String>,
        inicio_planificado: u32,
        fin_planificado: u32,
        machine_id: impl Into<String>,
        operator_index: u32,
        dia: u32,
        hora_inicio: impl Into<String>,
        hora_fin: impl Into<String>,
        duracion_min: u32,
    ) -> Self {
        Self {
            id: id.into(),
            programacion_id: programacion_id.into(),
            task_id: task_id.into(),
            inicio_planificado,
            fin_planificado,
            machine_id: machine_id.into(),
            operator_index,
            dia,
            hora_inicio: hora_inicio.into(),
            hora_fin: hora_fin.into(),
            duracion_min,
            duration_template_min: duracion_min,
            parte_numero: 1,
            es_dividida: false,
        }
    }

    /// Whether this segment's flat-minute boundary and calendar
    /// coordinates agree: `inicio_planificado` must equal
    /// `dia · H_day + minute_of(hora_inicio)` (spec §9 reconciliation
    /// check).
    pub fn reconciles_with(&self, shift_start_clock_minutes: u32, h_day: u32) -> bool {
        let Some(minute_of_hora_inicio) = Self::parse_hhmm(&self.hora_inicio) else {
            return false;
        };
        let expected = self.dia * h_day + minute_of_hora_inicio.saturating_sub(shift_start_clock_minutes);
        self.inicio_planificado == expected
    }

    fn parse_hhmm(hhmm: &str) -> Option<u32> {
        let (h, m) = hhmm.split_once(':')?;
        Some(h.parse::<u32>().ok()? * 60 + m.parse::<u32>().ok()?)
    }

    /// Overrides the snapshotted template duration (defaults to
    /// `duracion_min` at construction, correct for unsplit single-part
    /// tasks; the calendar mapper calls this explicitly for every part of
    /// a split task since their `duracion_min` is only a share).
    pub fn with_duration_template_min(mut self, duration_template_min: u32) -> Self {
        self.duration_template_min = duration_template_min;
        self
    }

    /// Marks this segment as part `parte_numero` of a split task.
    pub fn as_split_part(mut self, parte_numero: u32) -> Self {
        self.parte_numero = parte_numero;
        self.es_dividida = true;
        self
    }
}
