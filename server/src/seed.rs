use products_hr::{EmployeeService, HrResult, NewEmployee};
use tracing::info;

const DEMO_EMPLOYEES: &[(&str, &str, f64)] = &[
    ("Ana Torres", "Sistemas", 3200.0),
    ("Luis Medina", "Ventas", 2700.0),
    ("Eva Salgado", "Recursos Humanos", 2900.0),
    ("Jorge Paredes", "Contabilidad", 3100.0),
];

/// Insert the demo roster into an empty store. Returns how many records were
/// written; a store that already has employees is left untouched.
pub async fn seed_employees(service: &dyn EmployeeService) -> HrResult<usize> {
    if !service.list_employees().await?.is_empty() {
        info!("employees already present; skipping seed");
        return Ok(0);
    }
    for (name, department, salary) in DEMO_EMPLOYEES {
        service
            .save_employee(NewEmployee::new(*name, *department, *salary).into())
            .await?;
    }
    info!(count = DEMO_EMPLOYEES.len(), "demo employees seeded");
    Ok(DEMO_EMPLOYEES.len())
}
