//! Input validation for a weekly scheduling request.
//!
//! Checks structural integrity of jobs, tasks, machines, and operators
//! before handing the problem to the solver. Detects:
//! - Duplicate IDs (machines, jobs, tasks)
//! - Tasks referencing unknown machines
//! - Jobs with no tasks
//! - Two tasks in the same job sharing an `orden` value — `orden` is a
//!   plain integer inducing a total precedence order within the job, so a
//!   tie is flagged with a flat duplicate check rather than a graph walk;
//!   there's no cross-job precedence edge for a DFS to traverse.
//!
//! # Reference
//! Adapted from the teacher's `src/validation.rs`: same
//! accumulate-everything shape, not wrapped in `thiserror` (spec §7 keeps
//! this tier a plain, `Vec`-returning check distinct from
//! [`crate::error::OperationError`]).

use std::collections::{HashMap, HashSet};

use crate::models::{Job, MachineSpec, Machine, Operator};

/// Validation result: all detected errors, or none.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A single validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub kind: ValidationErrorKind,
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task references a machine that doesn't exist or isn't active.
    InvalidMachineReference,
    /// A job has no tasks.
    EmptyJob,
    /// Two tasks in the same job share an `orden` value.
    DuplicateOrden,
    /// `num_operators` is zero while tasks exist.
    NoOperators,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a scheduling request before it reaches the engine.
pub fn validate_input(
    jobs: &[Job],
    machines: &[Machine],
    num_operators: u32,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut machine_ids = HashSet::new();
    let active_machines: HashSet<&str> = machines
        .iter()
        .filter(|m| m.active)
        .map(|m| m.id.as_str())
        .collect();
    for m in machines {
        if !machine_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate machine ID: {}", m.id),
            ));
        }
    }

    let mut job_ids = HashSet::new();
    let mut task_ids = HashSet::new();
    let has_any_task = jobs.iter().any(|j| !j.tasks.is_empty());

    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("duplicate job ID: {}", job.id),
            ));
        }

        if job.tasks.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("job '{}' has no tasks", job.id),
            ));
        }

        let mut seen_orden: HashMap<u32, &str> = HashMap::new();
        for task in &job.tasks {
            if !task_ids.insert(task.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("duplicate task ID: {}", task.id),
                ));
            }

            if let Some(prev) = seen_orden.insert(task.orden, task.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateOrden,
                    format!(
                        "tasks '{}' and '{}' in job '{}' share orden {}",
                        prev, task.id, job.id, task.orden
                    ),
                ));
            }

            match &task.machine_spec {
                MachineSpec::Single(id) => {
                    if !active_machines.contains(id.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::InvalidMachineReference,
                            format!("task '{}' references unknown/inactive machine '{}'", task.id, id),
                        ));
                    }
                }
                MachineSpec::Alternatives(set) => {
                    for id in set {
                        if !active_machines.contains(id.as_str()) {
                            errors.push(ValidationError::new(
                                ValidationErrorKind::InvalidMachineReference,
                                format!(
                                    "task '{}' references unknown/inactive machine '{}'",
                                    task.id, id
                                ),
                            ));
                        }
                    }
                }
                MachineSpec::Any => {}
            }
        }
    }

    if has_any_task && num_operators == 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoOperators,
            "num_operators is 0 but at least one task requires staffing",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
