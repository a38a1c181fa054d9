//! Constraint-based scheduling engine.
//!
//! Assigns every task to a machine and an operator slot, and places it on
//! a flat `[0, H]` minute timeline with no day-boundary awareness — day
//! assignment is left to [`crate::calendar_mapper`] (spec §4.1 constraint
//! 5). Formulated as a mixed-integer program over continuous start/end
//! variables, binary assignment variables, and big-M disjunctive pairs
//! for no-overlap on shared resources, solved with `good_lp`'s `microlp`
//! backend.
//!
//! # Reference
//! `examples/other_examples/9d976500_KnorpelSenf-scheduling-malleable-tasks__src-ilp.rs.rs`
//! for `good_lp` variable/constraint usage; Pinedo (2016), "Scheduling",
//! Ch. 3-4 for the big-M disjunctive formulation;
//! `examples/original_source/optimizador_produccion.py::crear_modelo` for
//! the constraint set this is a structural translation of.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use good_lp::{constraint, variable, variables, Expression, Solution, SolverModel, Variable};
use tracing::{debug, warn};

use crate::config::{ConfigSnapshot, ObjectiveWeights};
use crate::error::{OperationError, OperationResult};
use crate::models::{Job, Machine, Objective, Operator};

/// Outcome of a solve attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Proven optimal within the model as formulated.
    Optimal,
    /// A usable solution was found but optimality wasn't proven (e.g. the
    /// solver's own tolerance, not a time-budget cutoff).
    Feasible,
    /// No assignment satisfies the constraints.
    Infeasible,
    /// The time budget elapsed before any feasible solution was found.
    Timeout,
}

/// A single task's resolved placement.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub task_id: String,
    pub task_index: usize,
    /// Flat-timeline start minute. `None` if extraction failed for this
    /// field alone (spec §4.1 failure semantics).
    pub start: Option<u32>,
    pub end: Option<u32>,
    pub machine_id: Option<String>,
    pub operator_index: Option<u32>,
    /// The task template's original `duration_min`, snapshotted for the
    /// calendar mapper to carry onto every `PlannedTask` part unchanged
    /// (spec §4.4 deviation computation depends on this, not on
    /// occupancy-with-setup).
    pub duration_template_min: u32,
}

/// Result of [`build_and_solve`].
#[derive(Debug, Clone)]
pub struct SolveResult {
    pub status: SolveStatus,
    pub wall_time_secs: f64,
    pub objective_value: Option<f64>,
    pub assignments: Vec<Assignment>,
}

struct FlatTask<'a> {
    template: &'a crate::models::TaskTemplate,
    occupancy_min: u32,
    candidates: Vec<String>,
}

/// Builds the MIP for the given jobs/machines/operators and solves it.
///
/// # Errors
/// Returns [`OperationError::InvalidInput`] if there are no active
/// machines, `num_operators` is zero, or a task has no eligible active
/// machine. Returns [`OperationError::Infeasible`] / `::Timeout` per
/// spec §4.1 failure semantics — these are not partial `SolveResult`s,
/// since no partial assignment may be persisted.
pub fn build_and_solve(
    jobs: &[Job],
    machines: &[Machine],
    operators: &[Operator],
    config: &ConfigSnapshot,
    objective: Objective,
    weights: ObjectiveWeights,
) -> OperationResult<SolveResult> {
    let started = Instant::now();

    let active_machine_ids: Vec<String> = machines
        .iter()
        .filter(|m| m.active)
        .map(|m| m.id.clone())
        .collect();
    if active_machine_ids.is_empty() {
        return Err(OperationError::InvalidInput(
            "no active machines configured".into(),
        ));
    }
    if config.num_operators == 0 {
        return Err(OperationError::InvalidInput(
            "num_operators must be at least 1".into(),
        ));
    }

    let mut flat: Vec<FlatTask> = Vec::new();
    for job in jobs {
        for task in job.tasks_in_order() {
            let occupancy_min = if config.consider_setup {
                task.duration_min + task.setup_min
            } else {
                task.duration_min
            };
            let candidates = task.machine_spec.candidates(&active_machine_ids);
            if candidates.is_empty() {
                return Err(OperationError::InvalidInput(format!(
                    "task '{}' has no eligible active machine",
                    task.id
                )));
            }
            flat.push(FlatTask {
                template: task,
                occupancy_min,
                candidates,
            });
        }
    }

    if flat.is_empty() {
        return Ok(SolveResult {
            status: SolveStatus::Optimal,
            wall_time_secs: started.elapsed().as_secs_f64(),
            objective_value: Some(0.0),
            assignments: Vec::new(),
        });
    }

    let n = flat.len();
    let id_index: HashMap<&str, usize> = flat
        .iter()
        .enumerate()
        .map(|(i, t)| (t.template.id.as_str(), i))
        .collect();
    let h = (config.labor_days * config.shift_minutes_per_day) as f64;
    let big_m = h.max(1.0);

    let mut vars = variables!();

    let starts: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0).max(h))).collect();
    let ends: Vec<Variable> = (0..n).map(|_| vars.add(variable().min(0.0).max(h))).collect();

    // Binary assignment variables, only where the task isn't pinned.
    let machine_bin: Vec<BTreeMap<String, Variable>> = flat
        .iter()
        .map(|t| {
            if t.candidates.len() > 1 {
                t.candidates
                    .iter()
                    .map(|m| (m.clone(), vars.add(variable().binary())))
                    .collect()
            } else {
                BTreeMap::new()
            }
        })
        .collect();

    let operator_bin: Vec<BTreeMap<u32, Variable>> = if config.num_operators > 1 {
        (0..n)
            .map(|_| {
                (0..config.num_operators)
                    .map(|o| (o, vars.add(variable().binary())))
                    .collect()
            })
            .collect()
    } else {
        (0..n).map(|_| BTreeMap::new()).collect()
    };

    // Ordering binary per unordered pair sharing a resource.
    let mut order_bin: BTreeMap<(usize, usize), Variable> = BTreeMap::new();
    for i in 0..n {
        for j in (i + 1)..n {
            order_bin.insert((i, j), vars.add(variable().binary()));
        }
    }

    // Genuine same-machine indicators, only needed when BOTH sides of a
    // pair are flexible on a shared candidate (pinned sides fold into the
    // other side's own assignment binary, see `same_resource_expr`).
    let mut machine_indicator: BTreeMap<(usize, usize, String), Variable> = BTreeMap::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if flat[i].candidates.len() > 1 && flat[j].candidates.len() > 1 {
                for m in flat[i].candidates.iter().filter(|m| flat[j].candidates.contains(*m)) {
                    machine_indicator.insert((i, j, m.clone()), vars.add(variable().binary()));
                }
            }
        }
    }

    // Genuine same-operator indicators, linearized the same way as
    // `machine_indicator` (operator slots are anonymous, so every pair
    // of tasks competes over every slot).
    let mut operator_indicator: BTreeMap<(usize, usize, u32), Variable> = BTreeMap::new();
    if config.num_operators > 1 {
        for i in 0..n {
            for j in (i + 1)..n {
                for o in 0..config.num_operators {
                    operator_indicator.insert((i, j, o), vars.add(variable().binary()));
                }
            }
        }
    }

    let makespan_var = vars.add(variable().min(0.0).max(h));
    let occupancy_vars: BTreeMap<String, Variable> = active_machine_ids
        .iter()
        .map(|m| (m.clone(), vars.add(variable().min(0.0).max(h))))
        .collect();
    let max_load = vars.add(variable().min(0.0).max(h));
    let min_load = vars.add(variable().min(0.0).max(h));

    let assigned_occupancy = |machine_id: &str| -> Expression {
        flat.iter().enumerate().fold(Expression::from(0.0), |acc, (i, t)| {
            if t.candidates.len() == 1 {
                if t.candidates[0] == machine_id {
                    acc + t.occupancy_min as f64
                } else {
                    acc
                }
            } else if let Some(&x) = machine_bin[i].get(machine_id) {
                acc + x * t.occupancy_min as f64
            } else {
                acc
            }
        })
    };

    let idle_total_expr: Expression = active_machine_ids.iter().fold(Expression::from(0.0), |acc, m| {
        let occ = occupancy_vars[m];
        acc + (Expression::from(occ) - assigned_occupancy(m))
    });

    let objective_expr: Expression = match objective {
        Objective::MinimizeMakespan => Expression::from(makespan_var),
        Objective::MinimizeCostProxy => occupancy_vars
            .values()
            .fold(Expression::from(0.0), |acc, &v| acc + v),
        Objective::MaximizeUtilization if active_machine_ids.len() >= 2 => {
            weights.utilization_makespan * makespan_var
                + weights.utilization_imbalance * (max_load - min_load)
        }
        Objective::MaximizeUtilization => Expression::from(makespan_var),
        Objective::Balanced => {
            weights.balanced_makespan * makespan_var + weights.balanced_idle * idle_total_expr
        }
    };

    let mut problem = vars.minimise(objective_expr).using(good_lp::default_solver);

    // Duration: end = start + occupancy.
    for i in 0..n {
        problem = problem.with(constraint!(ends[i] == starts[i] + flat[i].occupancy_min as f64));
    }

    // Precedence within each job.
    for job in jobs {
        let ordered = job.tasks_in_order();
        for pair in ordered.windows(2) {
            let i = id_index[pair[0].id.as_str()];
            let j = id_index[pair[1].id.as_str()];
            problem = problem.with(constraint!(ends[i] <= starts[j]));
        }
    }

    // Assignment sum-to-one for flexible tasks.
    for bins in &machine_bin {
        if !bins.is_empty() {
            let sum = bins.values().fold(Expression::from(0.0), |acc, &v| acc + v);
            problem = problem.with(constraint!(sum == 1.0));
        }
    }
    for bins in &operator_bin {
        if !bins.is_empty() {
            let sum = bins.values().fold(Expression::from(0.0), |acc, &v| acc + v);
            problem = problem.with(constraint!(sum == 1.0));
        }
    }

    // Operator-skill gating (§9 open question, behind `consider_operator_skills`).
    if config.consider_operator_skills {
        for (i, t) in flat.iter().enumerate() {
            for (o_idx, operator) in operators.iter().enumerate() {
                let o_idx = o_idx as u32;
                let Some(&y_io) = operator_bin[i].get(&o_idx) else {
                    continue;
                };
                for m in &t.candidates {
                    if operator.is_qualified_for(m) {
                        continue;
                    }
                    if t.candidates.len() == 1 {
                        problem = problem.with(constraint!(y_io <= 0.0));
                    } else if let Some(&x_im) = machine_bin[i].get(m) {
                        problem = problem.with(constraint!(y_io + x_im <= 1.0));
                    }
                }
            }
        }
    }

    // Linearize the genuine (both-flexible) same-machine indicators.
    for (&(i, j, ref m), &z) in &machine_indicator {
        let x_im = machine_bin[i][m];
        let x_jm = machine_bin[j][m];
        problem = problem.with(constraint!(z <= x_im));
        problem = problem.with(constraint!(z <= x_jm));
        problem = problem.with(constraint!(z >= x_im + x_jm - 1.0));
    }

    // Linearize the same-operator indicators analogously.
    for (&(i, j, o), &z) in &operator_indicator {
        let y_i = operator_bin[i][&o];
        let y_j = operator_bin[j][&o];
        problem = problem.with(constraint!(z <= y_i));
        problem = problem.with(constraint!(z <= y_j));
        problem = problem.with(constraint!(z >= y_i + y_j - 1.0));
    }

    // Machine no-overlap, and operator no-overlap, per pair.
    for i in 0..n {
        for j in (i + 1)..n {
            let b_ij = order_bin[&(i, j)];

            let same_machine: Expression = same_resource_expr(
                &flat[i].candidates,
                &flat[j].candidates,
                |m| {
                    if flat[i].candidates.len() > 1 && flat[j].candidates.len() > 1 {
                        Expression::from(machine_indicator[&(i, j, m.to_string())])
                    } else if flat[i].candidates.len() == 1 {
                        pinned_or_binary(&machine_bin[j], m)
                    } else {
                        pinned_or_binary(&machine_bin[i], m)
                    }
                },
            );
            if let Some(expr) = same_machine {
                problem = problem.with(constraint!(
                    ends[i] <= starts[j] + big_m * (Expression::from(1.0) - b_ij) + big_m * (Expression::from(1.0) - expr.clone())
                ));
                problem = problem.with(constraint!(
                    ends[j] <= starts[i] + big_m * b_ij + big_m * (Expression::from(1.0) - expr)
                ));
            }

            if config.num_operators > 1 {
                let same_operator_expr = (0..config.num_operators).fold(Expression::from(0.0), |acc, o| {
                    acc + operator_indicator[&(i, j, o)]
                });
                problem = problem.with(constraint!(
                    ends[i]
                        <= starts[j]
                            + big_m * (Expression::from(1.0) - b_ij)
                            + big_m * (Expression::from(1.0) - same_operator_expr.clone())
                ));
                problem = problem.with(constraint!(
                    ends[j]
                        <= starts[i]
                            + big_m * b_ij
                            + big_m * (Expression::from(1.0) - same_operator_expr)
                ));
            }
        }
    }

    // Makespan and per-machine occupancy.
    for i in 0..n {
        problem = problem.with(constraint!(makespan_var >= ends[i]));
    }
    for m in &active_machine_ids {
        let occ = occupancy_vars[m];
        for (i, t) in flat.iter().enumerate() {
            if t.candidates.len() == 1 {
                if t.candidates[0] == *m {
                    problem = problem.with(constraint!(occ >= ends[i]));
                }
            } else if let Some(&x_im) = machine_bin[i].get(m) {
                problem = problem.with(constraint!(occ >= ends[i] - big_m * (Expression::from(1.0) - x_im)));
            }
        }
        problem = problem.with(constraint!(max_load >= occ));
        problem = problem.with(constraint!(min_load <= occ));
    }

    debug!(task_count = n, machine_count = active_machine_ids.len(), "solving schedule");

    // `microlp` has no deadline/cancellation hook, so the budget can't cut
    // a solve short mid-flight; it's enforced post-hoc by classifying the
    // outcome against elapsed wall time instead (spec §5 "honors its
    // wall-time budget and returns the best feasible solution found").
    let solve_result = problem.solve();
    let wall_time_secs = started.elapsed().as_secs_f64();
    let over_budget = wall_time_secs > config.solver_time_budget_secs;

    let solution = match solve_result {
        Ok(sol) => sol,
        Err(good_lp::ResolutionError::Infeasible) => {
            return Err(if over_budget {
                OperationError::Timeout { wall_time_secs }
            } else {
                OperationError::Infeasible
            });
        }
        Err(good_lp::ResolutionError::Unbounded) => {
            return Err(OperationError::IntegrityError(
                "objective is unbounded; check machine/operator configuration".into(),
            ))
        }
        Err(other) => return Err(OperationError::InvalidInput(other.to_string())),
    };

    let status = if over_budget {
        warn!(wall_time_secs, budget = config.solver_time_budget_secs, "solver exceeded its time budget, returning best solution found");
        SolveStatus::Timeout
    } else {
        SolveStatus::Optimal
    };

    let objective_value = Some(solution.value(makespan_var));

    let assignments: Vec<Assignment> = flat
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let start = extract_minutes(&solution, starts[i]);
            let end = extract_minutes(&solution, ends[i]);
            let machine_id = resolve_machine(&solution, t, &machine_bin[i]);
            let operator_index = resolve_operator(&solution, &operator_bin[i], config.num_operators);
            Assignment {
                task_id: t.template.id.clone(),
                task_index: i,
                start,
                end,
                machine_id,
                operator_index,
                duration_template_min: t.template.duration_min,
            }
        })
        .collect();

    Ok(SolveResult {
        status,
        wall_time_secs,
        objective_value,
        assignments,
    })
}

/// Builds the "same resource" expression for a pair, or `None` if they
/// share no candidate at all (no overlap constraint needed).
fn same_resource_expr<F>(left: &[String], right: &[String], indicator: F) -> Option<Expression>
where
    F: Fn(&str) -> Expression,
{
    let shared: Vec<&String> = left.iter().filter(|x| right.contains(*x)).collect();
    if shared.is_empty() {
        return None;
    }
    Some(
        shared
            .into_iter()
            .fold(Expression::from(0.0), |acc, m| acc + indicator(m)),
    )
}

fn pinned_or_binary(bins: &BTreeMap<String, Variable>, machine_id: &str) -> Expression {
    match bins.get(machine_id) {
        Some(&v) => Expression::from(v),
        None => Expression::from(1.0),
    }
}

fn extract_minutes(solution: &impl Solution, var: Variable) -> Option<u32> {
    let raw = solution.value(var);
    if raw.is_finite() && raw >= -0.5 {
        Some(raw.round().max(0.0) as u32)
    } else {
        None
    }
}

fn resolve_machine(
    solution: &impl Solution,
    task: &FlatTask,
    bins: &BTreeMap<String, Variable>,
) -> Option<String> {
    if task.candidates.len() == 1 {
        return Some(task.candidates[0].clone());
    }
    bins.iter()
        .filter(|(_, &v)| solution.value(v) > 0.5)
        .map(|(m, _)| m.clone())
        .next()
}

fn resolve_operator(
    solution: &impl Solution,
    bins: &BTreeMap<u32, Variable>,
    num_operators: u32,
) -> Option<u32> {
    if num_operators <= 1 {
        return Some(0);
    }
    bins.iter()
        .filter(|(_, &v)| solution.value(v) > 0.5)
        .map(|(&o, _)| o)
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Job, MachineSpec, TaskTemplate};

    fn machines(ids: &[&str]) -> Vec<Machine> {
        ids.iter().map(|id| Machine::new(*id)).collect()
    }

    #[test]
    fn single_machine_precedence_matches_scenario_s1() {
        let job = Job::new("A")
            .with_task(TaskTemplate::new("A1", "A", 0, 60, MachineSpec::Single("M1".into())).unwrap())
            .with_task(TaskTemplate::new("A2", "A", 1, 30, MachineSpec::Single("M1".into())).unwrap());
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 540,
            lunch_minutes: 0,
            ..ConfigSnapshot::default()
        };
        let result = build_and_solve(
            &[job],
            &machines(&["M1"]),
            &[],
            &config,
            Objective::MinimizeMakespan,
            ObjectiveWeights::default(),
        )
        .unwrap();

        let a1 = result.assignments.iter().find(|a| a.task_id == "A1").unwrap();
        let a2 = result.assignments.iter().find(|a| a.task_id == "A2").unwrap();
        assert_eq!(a1.start, Some(0));
        assert_eq!(a1.end, Some(60));
        assert_eq!(a2.start, Some(60));
        assert_eq!(a2.end, Some(90));
    }

    #[test]
    fn no_active_machines_is_invalid_input() {
        let config = ConfigSnapshot::default();
        let err = build_and_solve(&[], &[], &[], &config, Objective::MinimizeMakespan, ObjectiveWeights::default())
            .unwrap_err();
        assert!(matches!(err, OperationError::InvalidInput(_)));
    }

    #[test]
    fn empty_job_list_solves_trivially() {
        let config = ConfigSnapshot::default();
        let result = build_and_solve(
            &[],
            &machines(&["M1"]),
            &[],
            &config,
            Objective::MinimizeMakespan,
            ObjectiveWeights::default(),
        )
        .unwrap();
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(result.assignments.is_empty());
    }

    #[test]
    fn exceeding_time_budget_reports_timeout_status() {
        let job = Job::new("A")
            .with_task(TaskTemplate::new("A1", "A", 0, 60, MachineSpec::Single("M1".into())).unwrap());
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 540,
            lunch_minutes: 0,
            solver_time_budget_secs: -1.0,
            ..ConfigSnapshot::default()
        };
        let result = build_and_solve(
            &[job],
            &machines(&["M1"]),
            &[],
            &config,
            Objective::MinimizeMakespan,
            ObjectiveWeights::default(),
        )
        .unwrap();
        assert_eq!(result.status, SolveStatus::Timeout);
    }

    #[test]
    fn infeasible_over_budget_reports_timeout_error() {
        let job = Job::new("A")
            .with_task(TaskTemplate::new("A1", "A", 0, 1000, MachineSpec::Single("M1".into())).unwrap());
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 500,
            lunch_minutes: 0,
            solver_time_budget_secs: -1.0,
            ..ConfigSnapshot::default()
        };
        let err = build_and_solve(
            &[job],
            &machines(&["M1"]),
            &[],
            &config,
            Objective::MinimizeMakespan,
            ObjectiveWeights::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OperationError::Timeout { .. }));
    }

    #[test]
    fn infeasible_within_budget_reports_infeasible_error() {
        let job = Job::new("A")
            .with_task(TaskTemplate::new("A1", "A", 0, 1000, MachineSpec::Single("M1".into())).unwrap());
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 500,
            lunch_minutes: 0,
            ..ConfigSnapshot::default()
        };
        let err = build_and_solve(
            &[job],
            &machines(&["M1"]),
            &[],
            &config,
            Objective::MinimizeMakespan,
            ObjectiveWeights::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OperationError::Infeasible));
    }

    #[test]
    fn machine_flexibility_balances_load_matching_scenario_s3() {
        use std::collections::BTreeSet;
        let alts: BTreeSet<String> = ["M1", "M2"].iter().map(|s| s.to_string()).collect();
        let job_x = Job::new("X")
            .with_task(TaskTemplate::new("X1", "X", 0, 120, MachineSpec::Alternatives(alts.clone())).unwrap());
        let job_y = Job::new("Y")
            .with_task(TaskTemplate::new("Y1", "Y", 0, 120, MachineSpec::Alternatives(alts)).unwrap());
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 540,
            lunch_minutes: 0,
            ..ConfigSnapshot::default()
        };
        let result = build_and_solve(
            &[job_x, job_y],
            &machines(&["M1", "M2"]),
            &[],
            &config,
            Objective::MaximizeUtilization,
            ObjectiveWeights::default(),
        )
        .unwrap();

        let x = result.assignments.iter().find(|a| a.task_id == "X1").unwrap();
        let y = result.assignments.iter().find(|a| a.task_id == "Y1").unwrap();
        assert_eq!(x.start, Some(0));
        assert_eq!(y.start, Some(0));
        assert_ne!(x.machine_id, y.machine_id);

        let makespan = result.assignments.iter().filter_map(|a| a.end).max().unwrap();
        assert_eq!(makespan, 120);
    }

    /// Reconstructs the blended `MAXIMIZE_UTILIZATION` value a solved
    /// result actually achieves, from its assignments alone (the engine
    /// only reports the makespan half of the blend via `objective_value`).
    fn utilization_blend(result: &SolveResult, active_machines: &[&str], weights: ObjectiveWeights) -> f64 {
        let makespan = result.assignments.iter().filter_map(|a| a.end).max().unwrap_or(0) as f64;
        let loads: Vec<u32> = active_machines
            .iter()
            .map(|m| {
                result
                    .assignments
                    .iter()
                    .filter(|a| a.machine_id.as_deref() == Some(*m))
                    .filter_map(|a| Some(a.end? - a.start?))
                    .sum()
            })
            .collect();
        let max_load = *loads.iter().max().unwrap_or(&0) as f64;
        let min_load = *loads.iter().min().unwrap_or(&0) as f64;
        weights.utilization_makespan * makespan + weights.utilization_imbalance * (max_load - min_load)
    }

    #[test]
    fn increasing_imbalance_weight_never_lowers_utilization_objective() {
        let job_x = Job::new("X")
            .with_task(TaskTemplate::new("X1", "X", 0, 150, MachineSpec::Single("M1".into())).unwrap());
        let job_y = Job::new("Y")
            .with_task(TaskTemplate::new("Y1", "Y", 0, 50, MachineSpec::Alternatives(
                ["M1", "M2"].iter().map(|s| s.to_string()).collect(),
            )).unwrap());
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 540,
            lunch_minutes: 0,
            ..ConfigSnapshot::default()
        };

        let low = ObjectiveWeights { utilization_makespan: 5.0, utilization_imbalance: 0.0, ..ObjectiveWeights::default() };
        let high = ObjectiveWeights { utilization_makespan: 5.0, utilization_imbalance: 50.0, ..ObjectiveWeights::default() };

        let result_low = build_and_solve(
            &[job_x.clone(), job_y.clone()],
            &machines(&["M1", "M2"]),
            &[],
            &config,
            Objective::MaximizeUtilization,
            low,
        )
        .unwrap();
        let result_high = build_and_solve(
            &[job_x, job_y],
            &machines(&["M1", "M2"]),
            &[],
            &config,
            Objective::MaximizeUtilization,
            high,
        )
        .unwrap();

        let value_low = utilization_blend(&result_low, &["M1", "M2"], low);
        let value_high = utilization_blend(&result_high, &["M1", "M2"], high);
        assert!(
            value_high >= value_low - 1e-6,
            "increasing the imbalance weight lowered the achieved objective: {value_low} -> {value_high}"
        );
    }

    #[test]
    fn single_machine_collapses_every_objective_to_pure_makespan() {
        let make_jobs = || {
            vec![
                Job::new("A").with_task(TaskTemplate::new("A1", "A", 0, 90, MachineSpec::Single("M1".into())).unwrap()),
                Job::new("B").with_task(TaskTemplate::new("B1", "B", 0, 60, MachineSpec::Single("M1".into())).unwrap()),
            ]
        };
        let config = ConfigSnapshot {
            labor_days: 1,
            shift_minutes_per_day: 540,
            lunch_minutes: 0,
            ..ConfigSnapshot::default()
        };

        let objectives = [
            Objective::MinimizeMakespan,
            Objective::MaximizeUtilization,
            Objective::MinimizeCostProxy,
            Objective::Balanced,
        ];
        let makespans: Vec<u32> = objectives
            .iter()
            .map(|&objective| {
                let result = build_and_solve(
                    &make_jobs(),
                    &machines(&["M1"]),
                    &[],
                    &config,
                    objective,
                    ObjectiveWeights::default(),
                )
                .unwrap();
                result.assignments.iter().filter_map(|a| a.end).max().unwrap()
            })
            .collect();

        assert!(
            makespans.iter().all(|&m| m == makespans[0]),
            "objectives disagreed on makespan with a single machine: {makespans:?}"
        );
        assert_eq!(makespans[0], 150);
    }
}
