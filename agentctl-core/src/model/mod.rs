//! Entity records and the closed enum types stored alongside them.
//!
//! Records are plain data: no lazy relationship traversal, no live handle
//! back to the database. Related rows are fetched through explicit
//! repository calls in `crate::db::repos`.

mod agent;
mod agent_log;
mod company;
mod department;
mod holding;
mod pagination;
mod task;
mod user;
mod validation;

pub use agent::{Agent, AgentStatus, AgentUpdate, NewAgent};
pub use agent_log::{AgentLog, NewAgentLog};
pub use company::{Company, CompanyUpdate, NewCompany};
pub use department::{Department, DepartmentUpdate, NewDepartment};
pub use holding::{Holding, HoldingUpdate, NewHolding};
pub use pagination::{Paginated, Pagination, PaginationParams};
pub use task::{NewTask, NewTaskExecution, Task, TaskExecution, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{NewUser, User, UserUpdate};
pub use validation::ValidationError;
