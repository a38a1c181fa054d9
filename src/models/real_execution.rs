//! Recorded real-world execution of a planned task.
//!
//! # Reference
//! `examples/original_source/modelos/database_models.py`'s `EstadoTarea`
//! enum supplements spec §4.4's binary `RETRASADA | COMPLETADA`
//! derivation with `Pendiente`/`EnProgreso`, which apply before a
//! `RealExecution` exists or is finished — the spec's derivation rule
//! only governs the terminal states.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Execution status of a planned task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EstadoTarea {
    /// No execution recorded yet.
    Pendiente,
    /// Execution started but not finished (`fin_real` not yet set).
    EnProgreso,
    /// Finished within tolerance of the plan (spec §4.4 derivation).
    Completada,
    /// Finished, but deviated from the plan by more than the tolerance.
    Retrasada,
    /// The owning plan was cancelled before this task executed.
    Cancelada,
}

/// A recorded real execution of a [`super::planned_task::PlannedTask`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealExecution {
    /// Identifier unique within the owning plan.
    pub id: String,
    /// The planned task this execution reports against.
    pub planned_task_id: String,
    /// Actual start time.
    pub inicio_real: NaiveDateTime,
    /// Actual end time, if the task has finished.
    pub fin_real: Option<NaiveDateTime>,
    /// Derived status.
    pub estado: EstadoTarea,
    /// Machine actually used, which may differ from the plan.
    pub maquina_usada: String,
    /// Operator who ran the task.
    pub operador: String,
    /// Minutes lost to stoppages during this execution.
    pub tiempo_paradas_min: u32,
    /// Free-text problem reports; empty means none were recorded.
    pub problemas: Vec<String>,
    /// Free-text operator notes.
    pub notas: String,
    /// Minutes between planned and actual start (positive means late).
    /// `None` until the owning planned task's schedule has been resolved.
    pub desviacion_inicio: Option<i64>,
    /// Minutes between planned and actual end (positive means late).
    pub desviacion_fin: Option<i64>,
    /// `duracion_real_min - tiempo_paradas_min`, minus the template's
    /// original duration (spec §4.4); negative means the task ran short.
    pub desviacion_duracion: Option<i64>,
}

impl RealExecution {
    /// Starts tracking an execution; ends unset, status `EnProgreso`.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        id: impl Into<String>,
        planned_task_id: impl Into<String>,
        inicio_real: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            planned_task_id: planned_task_id.into(),
            inicio_real,
            fin_real: None,
            estado: EstadoTarea::EnProgreso,
            maquina_usada: String::new(),
            operador: String::new(),
            tiempo_paradas_min: 0,
            problemas: Vec::new(),
            notas: String::new(),
            desviacion_inicio: None,
            desviacion_fin: None,
            desviacion_duracion: None,
        }
    }

    pub fn with_maquina_usada(mut self, maquina_usada: impl Into<String>) -> Self {
        self.maquina_usada = maquina_usada.into();
        self
    }

    pub fn with_operador(mut self, operador: impl Into<String>) -> Self {
        self.operador = operador.into();
        self
    }

    pub fn with_tiempo_paradas(mut self, tiempo_paradas_min: u32) -> Self {
        self.tiempo_paradas_min = tiempo_paradas_min;
        self
    }

    pub fn with_problemas(mut self, problemas: Vec<String>) -> Self {
        self.problemas = problemas;
        self
    }

    pub fn with_notas(mut self, notas: impl Into<String>) -> Self {
        self.notas = notas.into();
        self
    }

    /// Whether this execution has a recorded end time.
    pub fn is_finished(&self) -> bool {
        self.fin_real.is_some()
    }

    /// Whether any problem was reported during this execution.
    pub fn has_problems(&self) -> bool {
        !self.problemas.is_empty()
    }

    /// Actual duration in minutes, if finished.
    pub fn duracion_real_min(&self) -> Option<i64> {
        self.fin_real
            .map(|fin| (fin - self.inicio_real).num_minutes())
    }

    /// Applies freshly computed deviations, as derived by the execution
    /// recorder against the owning planned task's schedule.
    pub fn with_deviations(
        mut self,
        desviacion_inicio: i64,
        desviacion_fin: i64,
        desviacion_duracion: i64,
    ) -> Self {
        self.desviacion_inicio = Some(desviacion_inicio);
        self.desviacion_fin = Some(desviacion_fin);
        self.desviacion_duracion = Some(desviacion_duracion);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 7, 27)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn unfinished_execution_has_no_duration() {
        let ex = RealExecution::start("RE1", "PT1", dt(8, 0));
        assert!(!ex.is_finished());
        assert_eq!(ex.duracion_real_min(), None);
    }

    #[test]
    fn finished_execution_computes_duration() {
        let mut ex = RealExecution::start("RE1", "PT1", dt(8, 0));
        ex.fin_real = Some(dt(9, 30));
        assert_eq!(ex.duracion_real_min(), Some(90));
    }
}
