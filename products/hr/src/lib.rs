//! HR vertical slice.
//!
//! Employee records are reached through [`EmployeeService`]. Two backends
//! ship with the crate: [`SeaOrmEmployeeService`] for a real database and
//! [`InMemoryEmployeeService`] for tests and demo runs.

mod database;
mod error;
mod memory;
mod model;
mod service;

pub use database::SeaOrmEmployeeService;
pub use error::{HrError, HrResult};
pub use memory::InMemoryEmployeeService;
pub use model::{Employee, MAX_TEXT_LEN, NewEmployee, SaveEmployee};
pub use service::EmployeeService;

#[cfg(test)]
pub(crate) mod contract;
