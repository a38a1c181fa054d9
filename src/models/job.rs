//! Job and task-template models.
//!
//! A [`Job`] is a customer order; it owns an ordered sequence of
//! [`TaskTemplate`]s that must run in `orden` sequence on the same job
//! (precedence within a job, spec §4.1 constraint 3). Templates are
//! shared, immutable inputs to the solver — the solver's own
//! `start`/`end`/assignment variables live in
//! [`super::planned_task::PlannedTask`], never here.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which machine(s) a task template may run on.
///
/// Resolves the §9 "dynamic task descriptors" open question: rather than
/// a free-form candidate list, the set of shapes a task's machine
/// assignment can take is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineSpec {
    /// Pinned to exactly one machine; the solver assigns no binary
    /// variable for it (§4.1 Algorithmic notes).
    Single(String),
    /// May run on any one of the listed machines.
    Alternatives(BTreeSet<String>),
    /// May run on any active machine in the plan.
    Any,
}

impl MachineSpec {
    /// Whether this spec pins the task to a single machine at model-build
    /// time (no assignment binary needed).
    pub fn is_pinned(&self) -> bool {
        matches!(self, MachineSpec::Single(_))
    }

    /// The candidate machine IDs this spec resolves to, given the full
    /// set of active machines in the plan.
    pub fn candidates(&self, active_machines: &[String]) -> Vec<String> {
        match self {
            MachineSpec::Single(id) => vec![id.clone()],
            MachineSpec::Alternatives(set) => set.iter().cloned().collect(),
            MachineSpec::Any => active_machines.to_vec(),
        }
    }
}

/// A single schedulable unit of work within a [`Job`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskTemplate {
    /// Unique task identifier.
    pub id: String,
    /// Parent job identifier.
    pub job_id: String,
    /// Human-readable name.
    pub name: String,
    /// Position of this task within its job's precedence chain
    /// (0-indexed; task with `orden = k+1` cannot start before the task
    /// with `orden = k` in the same job finishes).
    pub orden: u32,
    /// Processing duration in minutes. Must be `> 0`.
    pub duration_min: u32,
    /// Setup/changeover time in minutes, incurred once at task start.
    pub setup_min: u32,
    /// Candidate machine(s).
    pub machine_spec: MachineSpec,
}

impl TaskTemplate {
    /// Creates a new task template.
    ///
    /// # Errors
    /// Returns `Err` if `duration_min` is zero, matching the spec §3
    /// invariant that every task has positive duration.
    pub fn new(
        id: impl Into<String>,
        job_id: impl Into<String>,
        orden: u32,
        duration_min: u32,
        machine_spec: MachineSpec,
    ) -> Result<Self, String> {
        if duration_min == 0 {
            return Err(format!(
                "task '{}' has duration_min = 0; tasks must have positive duration",
                id.into()
            ));
        }
        Ok(Self {
            id: id.into(),
            job_id: job_id.into(),
            name: String::new(),
            orden,
            duration_min,
            setup_min: 0,
            machine_spec,
        })
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the setup time.
    pub fn with_setup(mut self, setup_min: u32) -> Self {
        self.setup_min = setup_min;
        self
    }

    /// Total occupied duration including setup.
    pub fn total_min(&self) -> u32 {
        self.setup_min + self.duration_min
    }
}

/// A customer order: a named, ordered group of tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Tasks belonging to this job, in `orden` sequence.
    pub tasks: Vec<TaskTemplate>,
}

impl Job {
    /// Creates a new, empty job.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            tasks: Vec::new(),
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Adds a task.
    pub fn with_task(mut self, task: TaskTemplate) -> Self {
        self.tasks.push(task);
        self
    }

    /// Returns tasks sorted by `orden`.
    pub fn tasks_in_order(&self) -> Vec<&TaskTemplate> {
        let mut ts: Vec<&TaskTemplate> = self.tasks.iter().collect();
        ts.sort_by_key(|t| t.orden);
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_duration_task_is_rejected() {
        let err = TaskTemplate::new("T1", "J1", 0, 0, MachineSpec::Any).unwrap_err();
        assert!(err.contains("T1"));
    }

    #[test]
    fn single_spec_is_pinned_alternatives_is_not() {
        assert!(MachineSpec::Single("M1".into()).is_pinned());
        assert!(!MachineSpec::Any.is_pinned());
    }

    #[test]
    fn any_spec_resolves_to_active_machines() {
        let active = vec!["M1".to_string(), "M2".to_string()];
        assert_eq!(MachineSpec::Any.candidates(&active), active);
    }

    #[test]
    fn tasks_in_order_sorts_by_orden() {
        let job = Job::new("J1")
            .with_task(TaskTemplate::new("T2", "J1", 1, 10, MachineSpec::Any).unwrap())
            .with_task(TaskTemplate::new("T1", "J1", 0, 10, MachineSpec::Any).unwrap());
        let ordered = job.tasks_in_order();
        assert_eq!(ordered[0].id, "T1");
        assert_eq!(ordered[1].id, "T2");
    }
}
