use entity::employees;
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

/// Upper bound for `name` and `department`, matching the column width.
pub const MAX_TEXT_LEN: usize = 100;

/// A stored employee record. `id` is assigned by the backend on creation.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Employee {
    pub id: i32,
    pub name: String,
    pub department: String,
    pub salary: f64,
}

/// Employee fields without an identifier.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewEmployee {
    pub name: String,
    pub department: String,
    pub salary: f64,
}

/// What `save_employee` should do: create a record or overwrite one.
#[derive(Clone, Debug, PartialEq)]
pub enum SaveEmployee {
    New(NewEmployee),
    Existing(Employee),
}

impl Employee {
    pub fn with_id(id: i32, fields: NewEmployee) -> Self {
        Self {
            id,
            name: fields.name,
            department: fields.department,
            salary: fields.salary,
        }
    }

    pub fn fields(&self) -> NewEmployee {
        NewEmployee {
            name: self.name.clone(),
            department: self.department.clone(),
            salary: self.salary,
        }
    }
}

impl NewEmployee {
    pub fn new(name: impl Into<String>, department: impl Into<String>, salary: f64) -> Self {
        Self {
            name: name.into(),
            department: department.into(),
            salary,
        }
    }

    /// Trimmed copy of the fields, or the first rule they break.
    pub fn validated(self) -> HrResult<Self> {
        Ok(Self {
            name: required_text("name", &self.name)?,
            department: required_text("department", &self.department)?,
            salary: valid_salary(self.salary)?,
        })
    }
}

impl SaveEmployee {
    /// Build from a transport payload where a missing id means "create".
    pub fn from_parts(id: Option<i32>, fields: NewEmployee) -> Self {
        match id {
            Some(id) => Self::Existing(Employee::with_id(id, fields)),
            None => Self::New(fields),
        }
    }

    pub fn id(&self) -> Option<i32> {
        match self {
            Self::New(_) => None,
            Self::Existing(employee) => Some(employee.id),
        }
    }

    pub(crate) fn validated(self) -> HrResult<Self> {
        match self {
            Self::New(fields) => Ok(Self::New(fields.validated()?)),
            Self::Existing(employee) => {
                let id = employee.id;
                let fields = employee.fields().validated()?;
                Ok(Self::Existing(Employee::with_id(id, fields)))
            }
        }
    }
}

impl From<NewEmployee> for SaveEmployee {
    fn from(fields: NewEmployee) -> Self {
        Self::New(fields)
    }
}

impl From<Employee> for SaveEmployee {
    fn from(employee: Employee) -> Self {
        Self::Existing(employee)
    }
}

impl From<employees::Model> for Employee {
    fn from(model: employees::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            department: model.department,
            salary: model.salary,
        }
    }
}

fn required_text(field: &str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::invalid(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(HrError::invalid(format!(
            "{field} must be at most {MAX_TEXT_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn valid_salary(salary: f64) -> HrResult<f64> {
    if !salary.is_finite() || salary < 0.0 {
        return Err(HrError::invalid("salary must be a non-negative number"));
    }
    Ok(salary)
}
