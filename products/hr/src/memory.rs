use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    error::{HrError, HrResult},
    model::{Employee, SaveEmployee},
    service::EmployeeService,
};

/// Process-local [`EmployeeService`]. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeService {
    state: RwLock<Store>,
}

#[derive(Debug, Default)]
struct Store {
    last_id: i32,
    records: BTreeMap<i32, Employee>,
}

impl InMemoryEmployeeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store; new ids continue after the largest seeded id.
    pub fn with_records(records: impl IntoIterator<Item = Employee>) -> Self {
        let records: BTreeMap<i32, Employee> = records
            .into_iter()
            .map(|employee| (employee.id, employee))
            .collect();
        let last_id = records.keys().next_back().copied().unwrap_or(0).max(0);
        Self {
            state: RwLock::new(Store { last_id, records }),
        }
    }
}

#[async_trait]
impl EmployeeService for InMemoryEmployeeService {
    async fn list_employees(&self) -> HrResult<Vec<Employee>> {
        let state = self.state.read().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn find_employee_by_id(&self, id: i32) -> HrResult<Option<Employee>> {
        let state = self.state.read().await;
        Ok(state.records.get(&id).cloned())
    }

    async fn save_employee(&self, employee: SaveEmployee) -> HrResult<Employee> {
        let employee = employee.validated()?;
        let mut state = self.state.write().await;
        match employee {
            SaveEmployee::New(fields) => {
                let id = state
                    .last_id
                    .checked_add(1)
                    .ok_or_else(|| HrError::invalid("id space exhausted"))?;
                state.last_id = id;
                let record = Employee::with_id(id, fields);
                state.records.insert(record.id, record.clone());
                debug!(employee_id = record.id, "employee created");
                Ok(record)
            }
            SaveEmployee::Existing(record) => {
                let slot = state
                    .records
                    .get_mut(&record.id)
                    .ok_or(HrError::NotFound(record.id))?;
                *slot = record.clone();
                debug!(employee_id = record.id, "employee updated");
                Ok(record)
            }
        }
    }

    async fn delete_employee(&self, employee: &Employee) -> HrResult<()> {
        let mut state = self.state.write().await;
        state
            .records
            .remove(&employee.id)
            .map(|_| debug!(employee_id = employee.id, "employee deleted"))
            .ok_or(HrError::NotFound(employee.id))
    }
}
