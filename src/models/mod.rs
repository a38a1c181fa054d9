//! Weekly production scheduling domain models.
//!
//! | Model | Manufacturing meaning |
//! |-------|----------------------|
//! | [`Machine`] | A physical production resource |
//! | [`Operator`] | A human operator slot |
//! | [`Job`] / [`TaskTemplate`] | A customer order and its ordered tasks |
//! | [`Programacion`] | A weekly plan and its lifecycle state |
//! | [`PlannedTask`] | A calendar-mapped solver output segment |
//! | [`RealExecution`] | A recorded real-world execution |
//! | [`Metric`] | A computed KPI bundle |

mod job;
mod machine;
mod metric;
mod operator;
mod planned_task;
mod programacion;
mod real_execution;

pub use job::{Job, MachineSpec, TaskTemplate};
pub use machine::Machine;
pub use metric::{MachineEfficiency, Metric};
pub use operator::Operator;
pub use planned_task::PlannedTask;
pub use programacion::{EstadoProgramacion, Objective, Programacion};
pub use real_execution::{EstadoTarea, RealExecution};
