//! Persisted state layout (spec §6) behind a storage-agnostic trait.
//!
//! `ProgramacionStore` is the seam a real backend (a database, a remote
//! service) would implement; [`InMemoryStore`] is the single in-tree
//! implementation, a `Mutex`-guarded map matching the single-writer,
//! multi-reader discipline of spec §5. Cascade delete and per-week
//! uniqueness are enforced inside the trait's methods, not by callers.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::error::{OperationError, OperationResult};
use crate::models::{EstadoProgramacion, Machine, Metric, Operator, PlannedTask, Programacion, RealExecution};

/// Filter for [`ProgramacionStore::list_programaciones`].
#[derive(Debug, Clone, Default)]
pub struct ProgramacionFilter {
    pub anio: Option<u32>,
    pub semana: Option<u32>,
    pub estado: Option<EstadoProgramacion>,
}

impl ProgramacionFilter {
    fn matches(&self, prog: &Programacion) -> bool {
        self.anio.map_or(true, |a| a == prog.anio)
            && self.semana.map_or(true, |s| s == prog.semana)
            && self.estado.map_or(true, |e| e == prog.estado)
    }
}

/// Storage seam for plans, their planned tasks, real executions, and
/// computed metrics.
pub trait ProgramacionStore {
    /// Allocates the next `PROG-<anio>-W<semana:02>-<seq:03>` id and
    /// reserves it by inserting `prog` (whose `id` is overwritten).
    fn create_programacion(&self, prog: Programacion) -> String;

    fn get_programacion(&self, id: &str) -> OperationResult<Programacion>;

    fn update_programacion(&self, prog: Programacion) -> OperationResult<()>;

    fn list_programaciones(&self, filter: &ProgramacionFilter) -> Vec<Programacion>;

    /// Whether another plan for `(anio, semana)` is already active
    /// (`planificada | en_ejecucion | completada`), excluding `exclude_id`.
    fn active_exists_for_week(&self, anio: u32, semana: u32, exclude_id: &str) -> bool;

    /// Deletes a plan and cascades to its planned tasks, their real
    /// executions, and its metric (spec §4.3 cascade rule).
    fn delete_programacion_cascade(&self, id: &str) -> OperationResult<()>;

    fn insert_planned_tasks(&self, prog_id: &str, tasks: Vec<PlannedTask>) -> OperationResult<()>;

    /// Planned tasks for a plan, ordered by `(dia, hora_inicio)` (spec §5
    /// ordering guarantee).
    fn planned_tasks_for(&self, prog_id: &str) -> Vec<PlannedTask>;

    fn get_planned_task(&self, planned_task_id: &str) -> OperationResult<PlannedTask>;

    fn machines(&self) -> Vec<Machine>;

    fn operators(&self) -> Vec<Operator>;

    fn insert_execution(&self, execution: RealExecution) -> OperationResult<()>;

    fn update_execution(&self, execution: RealExecution) -> OperationResult<()>;

    fn delete_execution(&self, execution_id: &str) -> OperationResult<()>;

    fn get_execution(&self, execution_id: &str) -> OperationResult<RealExecution>;

    fn execution_for_planned_task(&self, planned_task_id: &str) -> Option<RealExecution>;

    fn executions_for(&self, prog_id: &str) -> Vec<RealExecution>;

    fn put_metric(&self, metric: Metric) -> OperationResult<()>;

    fn get_metric(&self, prog_id: &str) -> Option<Metric>;
}

#[derive(Default)]
struct Inner {
    programaciones: HashMap<String, Programacion>,
    planned_tasks: HashMap<String, Vec<PlannedTask>>,
    executions: HashMap<String, RealExecution>,
    metrics: HashMap<String, Metric>,
    machines: Vec<Machine>,
    operators: Vec<Operator>,
    seq_counters: BTreeMap<(u32, u32), u32>,
}

/// `Mutex`-backed in-memory [`ProgramacionStore`].
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new(machines: Vec<Machine>, operators: Vec<Operator>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                machines,
                operators,
                ..Inner::default()
            }),
        }
    }

    fn planned_task_ids_for(inner: &Inner, prog_id: &str) -> Vec<String> {
        inner
            .planned_tasks
            .get(prog_id)
            .map(|ts| ts.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default()
    }
}

impl ProgramacionStore for InMemoryStore {
    fn create_programacion(&self, mut prog: Programacion) -> String {
        let mut inner = self.inner.lock().unwrap();
        let seq = inner
            .seq_counters
            .entry((prog.anio, prog.semana))
            .or_insert(0);
        *seq += 1;
        let id = format!("PROG-{}-W{:02}-{:03}", prog.anio, prog.semana, seq);
        prog.id = id.clone();
        inner.programaciones.insert(id.clone(), prog);
        id
    }

    fn get_programacion(&self, id: &str) -> OperationResult<Programacion> {
        self.inner
            .lock()
            .unwrap()
            .programaciones
            .get(id)
            .cloned()
            .ok_or_else(|| OperationError::NotFound(format!("programacion '{id}'")))
    }

    fn update_programacion(&self, prog: Programacion) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.programaciones.contains_key(&prog.id) {
            return Err(OperationError::NotFound(format!("programacion '{}'", prog.id)));
        }
        inner.programaciones.insert(prog.id.clone(), prog);
        Ok(())
    }

    fn list_programaciones(&self, filter: &ProgramacionFilter) -> Vec<Programacion> {
        self.inner
            .lock()
            .unwrap()
            .programaciones
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect()
    }

    fn active_exists_for_week(&self, anio: u32, semana: u32, exclude_id: &str) -> bool {
        self.inner.lock().unwrap().programaciones.values().any(|p| {
            p.id != exclude_id
                && p.anio == anio
                && p.semana == semana
                && matches!(
                    p.estado,
                    EstadoProgramacion::Planificada
                        | EstadoProgramacion::EnExecucion
                        | EstadoProgramacion::Completada
                )
        })
    }

    fn delete_programacion_cascade(&self, id: &str) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.programaciones.contains_key(id) {
            return Err(OperationError::NotFound(format!("programacion '{id}'")));
        }
        let planned_ids = Self::planned_task_ids_for(&inner, id);
        inner.executions.retain(|_, ex| !planned_ids.contains(&ex.planned_task_id));
        inner.planned_tasks.remove(id);
        inner.metrics.remove(id);
        inner.programaciones.remove(id);
        Ok(())
    }

    fn insert_planned_tasks(&self, prog_id: &str, tasks: Vec<PlannedTask>) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.programaciones.contains_key(prog_id) {
            return Err(OperationError::NotFound(format!("programacion '{prog_id}'")));
        }
        inner.planned_tasks.entry(prog_id.to_string()).or_default().extend(tasks);
        Ok(())
    }

    fn planned_tasks_for(&self, prog_id: &str) -> Vec<PlannedTask> {
        let mut tasks = self
            .inner
            .lock()
            .unwrap()
            .planned_tasks
            .get(prog_id)
            .cloned()
            .unwrap_or_default();
        tasks.sort_by(|a, b| (a.dia, &a.hora_inicio).cmp(&(b.dia, &b.hora_inicio)));
        tasks
    }

    fn get_planned_task(&self, planned_task_id: &str) -> OperationResult<PlannedTask> {
        self.inner
            .lock()
            .unwrap()
            .planned_tasks
            .values()
            .flatten()
            .find(|t| t.id == planned_task_id)
            .cloned()
            .ok_or_else(|| OperationError::NotFound(format!("planned task '{planned_task_id}'")))
    }

    fn machines(&self) -> Vec<Machine> {
        self.inner.lock().unwrap().machines.clone()
    }

    fn operators(&self) -> Vec<Operator> {
        self.inner.lock().unwrap().operators.clone()
    }

    fn insert_execution(&self, execution: RealExecution) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.executions.values().any(|e| e.planned_task_id == execution.planned_task_id) {
            return Err(OperationError::Conflict(format!(
                "an execution already exists for planned task '{}'",
                execution.planned_task_id
            )));
        }
        inner.executions.insert(execution.id.clone(), execution);
        Ok(())
    }

    fn update_execution(&self, execution: RealExecution) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.executions.contains_key(&execution.id) {
            return Err(OperationError::NotFound(format!("execution '{}'", execution.id)));
        }
        inner.executions.insert(execution.id.clone(), execution);
        Ok(())
    }

    fn delete_execution(&self, execution_id: &str) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .executions
            .remove(execution_id)
            .map(|_| ())
            .ok_or_else(|| OperationError::NotFound(format!("execution '{execution_id}'")))
    }

    fn get_execution(&self, execution_id: &str) -> OperationResult<RealExecution> {
        self.inner
            .lock()
            .unwrap()
            .executions
            .get(execution_id)
            .cloned()
            .ok_or_else(|| OperationError::NotFound(format!("execution '{execution_id}'")))
    }

    fn execution_for_planned_task(&self, planned_task_id: &str) -> Option<RealExecution> {
        self.inner
            .lock()
            .unwrap()
            .executions
            .values()
            .find(|e| e.planned_task_id == planned_task_id)
            .cloned()
    }

    fn executions_for(&self, prog_id: &str) -> Vec<RealExecution> {
        let inner = self.inner.lock().unwrap();
        let planned_ids = Self::planned_task_ids_for(&inner, prog_id);
        inner
            .executions
            .values()
            .filter(|e| planned_ids.contains(&e.planned_task_id))
            .cloned()
            .collect()
    }

    fn put_metric(&self, metric: Metric) -> OperationResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.metrics.insert(metric.programacion_id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, prog_id: &str) -> Option<Metric> {
        self.inner.lock().unwrap().metrics.get(prog_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigSnapshot;
    use crate::models::Objective;

    fn store() -> InMemoryStore {
        InMemoryStore::new(vec![Machine::new("M1")], vec![])
    }

    #[test]
    fn id_scheme_increments_per_week() {
        let store = store();
        let id1 = store.create_programacion(Programacion::new("", 2026, 30, Objective::MinimizeMakespan, ConfigSnapshot::default()));
        let id2 = store.create_programacion(Programacion::new("", 2026, 30, Objective::MinimizeMakespan, ConfigSnapshot::default()));
        assert_eq!(id1, "PROG-2026-W30-001");
        assert_eq!(id2, "PROG-2026-W30-002");
    }

    #[test]
    fn cascade_delete_removes_planned_tasks_and_executions() {
        let store = store();
        let id = store.create_programacion(Programacion::new("", 2026, 30, Objective::MinimizeMakespan, ConfigSnapshot::default()));
        let pt = PlannedTask::new("PT1", &id, "T1", 0, 60, "M1", 0, 0, "08:00", "09:00", 60);
        store.insert_planned_tasks(&id, vec![pt]).unwrap();
        store
            .insert_execution(RealExecution::start(
                "RE1",
                "PT1",
                chrono::NaiveDate::from_ymd_opt(2026, 7, 27).unwrap().and_hms_opt(8, 0, 0).unwrap(),
            ))
            .unwrap();

        store.delete_programacion_cascade(&id).unwrap();
        assert!(store.get_programacion(&id).is_err());
        assert!(store.planned_tasks_for(&id).is_empty());
        assert!(store.get_execution("RE1").is_err());
    }

    #[test]
    fn active_week_uniqueness_detects_conflict() {
        let store = store();
        let mut p1 = Programacion::new("", 2026, 42, Objective::MinimizeMakespan, ConfigSnapshot::default());
        let id1 = store.create_programacion(p1.clone());
        p1.id = id1.clone();
        p1.estado = EstadoProgramacion::Planificada;
        store.update_programacion(p1).unwrap();

        assert!(store.active_exists_for_week(2026, 42, "unrelated"));
        assert!(!store.active_exists_for_week(2026, 42, &id1));
    }
}
