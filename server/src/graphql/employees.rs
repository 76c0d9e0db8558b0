use async_graphql::{InputObject, SimpleObject};
use products_hr::{Employee, NewEmployee, SaveEmployee};

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee")]
pub struct EmployeeNode {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub salary: f64,
}

impl From<Employee> for EmployeeNode {
    fn from(employee: Employee) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            department: employee.department,
            salary: employee.salary,
        }
    }
}

#[derive(Clone, Debug, InputObject)]
pub struct EmployeeInput {
    pub id: Option<i32>,
    pub name: String,
    pub department: String,
    pub salary: f64,
}

impl From<EmployeeInput> for SaveEmployee {
    fn from(input: EmployeeInput) -> Self {
        SaveEmployee::from_parts(
            input.id,
            NewEmployee::new(input.name, input.department, input.salary),
        )
    }
}
