use std::sync::Arc;

use async_trait::async_trait;
use entity::employees;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, DatabaseConnection, EntityTrait,
    QueryOrder, TransactionTrait,
};
use tracing::{info, instrument};

use crate::{
    error::{HrError, HrResult},
    model::{Employee, SaveEmployee},
    service::EmployeeService,
};

/// [`EmployeeService`] over the `employees` table.
#[derive(Clone, Debug)]
pub struct SeaOrmEmployeeService {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmEmployeeService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl EmployeeService for SeaOrmEmployeeService {
    #[instrument(name = "hr.list_employees", skip_all)]
    async fn list_employees(&self) -> HrResult<Vec<Employee>> {
        let rows = employees::Entity::find()
            .order_by_asc(employees::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(rows.into_iter().map(Employee::from).collect())
    }

    #[instrument(name = "hr.find_employee_by_id", skip(self))]
    async fn find_employee_by_id(&self, id: i32) -> HrResult<Option<Employee>> {
        let row = employees::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(row.map(Employee::from))
    }

    #[instrument(name = "hr.save_employee", skip_all, fields(employee_id = ?employee.id()))]
    async fn save_employee(&self, employee: SaveEmployee) -> HrResult<Employee> {
        match employee.validated()? {
            SaveEmployee::New(fields) => {
                let model = employees::ActiveModel {
                    id: NotSet,
                    name: Set(fields.name),
                    department: Set(fields.department),
                    salary: Set(fields.salary),
                }
                .insert(self.db.as_ref())
                .await?;
                info!(employee_id = model.id, "employee created");
                Ok(model.into())
            }
            SaveEmployee::Existing(employee) => {
                let txn = self.db.begin().await?;
                let existing = employees::Entity::find_by_id(employee.id)
                    .one(&txn)
                    .await?
                    .ok_or(HrError::NotFound(employee.id))?;
                let mut active: employees::ActiveModel = existing.into();
                active.name = Set(employee.name);
                active.department = Set(employee.department);
                active.salary = Set(employee.salary);
                let model = active.update(&txn).await?;
                txn.commit().await?;
                info!(employee_id = model.id, "employee updated");
                Ok(model.into())
            }
        }
    }

    #[instrument(name = "hr.delete_employee", skip_all, fields(employee_id = employee.id))]
    async fn delete_employee(&self, employee: &Employee) -> HrResult<()> {
        let result = employees::Entity::delete_by_id(employee.id)
            .exec(self.db.as_ref())
            .await?;
        if result.rows_affected == 0 {
            return Err(HrError::NotFound(employee.id));
        }
        info!("employee deleted");
        Ok(())
    }
}
