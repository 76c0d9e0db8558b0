use async_trait::async_trait;

use crate::{
    error::HrResult,
    model::{Employee, SaveEmployee},
};

/// Access contract for employee records.
///
/// Implementations hold no state beyond a handle to their storage, so a
/// single instance is shared across handlers as `Arc<dyn EmployeeService>`.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    /// Every stored record, ordered by ascending id. Empty when none exist.
    async fn list_employees(&self) -> HrResult<Vec<Employee>>;

    /// The record with `id`, or `None` when there is no such record.
    async fn find_employee_by_id(&self, id: i32) -> HrResult<Option<Employee>>;

    /// Create (`New`) or overwrite (`Existing`) a record and return what was
    /// stored. Overwriting an unknown id fails with `NotFound`.
    async fn save_employee(&self, employee: SaveEmployee) -> HrResult<Employee>;

    /// Remove the record carrying `employee.id`. Fails with `NotFound` when
    /// nothing was stored under that id.
    async fn delete_employee(&self, employee: &Employee) -> HrResult<()>;
}
