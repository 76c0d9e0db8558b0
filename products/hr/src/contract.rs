//! Behaviour every [`EmployeeService`] backend must share, run against each
//! implementation from its own test module.

use crate::{Employee, EmployeeService, HrError, NewEmployee, SaveEmployee};

pub(crate) async fn lifecycle(service: &dyn EmployeeService) {
    let created = service
        .save_employee(SaveEmployee::from_parts(
            None,
            NewEmployee::new("Ana", "Sistemas", 3000.0),
        ))
        .await
        .unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.name, "Ana");

    let found = service.find_employee_by_id(created.id).await.unwrap();
    assert_eq!(found, Some(created.clone()));

    service.delete_employee(&created).await.unwrap();
    assert_eq!(service.find_employee_by_id(created.id).await.unwrap(), None);
    assert!(service.list_employees().await.unwrap().is_empty());
}

pub(crate) async fn list_matches_saved_set(service: &dyn EmployeeService) {
    assert!(service.list_employees().await.unwrap().is_empty());

    let mut saved = Vec::new();
    for (name, department, salary) in [
        ("Ana", "Sistemas", 3000.0),
        ("Luis", "Ventas", 2500.0),
        ("Eva", "RH", 2800.0),
    ] {
        let record = service
            .save_employee(NewEmployee::new(name, department, salary).into())
            .await
            .unwrap();
        saved.push(record);
    }
    service.delete_employee(&saved[1]).await.unwrap();
    let expected: Vec<Employee> = vec![saved[0].clone(), saved[2].clone()];

    let listed = service.list_employees().await.unwrap();
    assert_eq!(listed, expected);
}

pub(crate) async fn idempotent_save(service: &dyn EmployeeService) {
    let created = service
        .save_employee(NewEmployee::new("Ana", "Sistemas", 3000.0).into())
        .await
        .unwrap();
    let first = service.save_employee(created.clone().into()).await.unwrap();
    let second = service.save_employee(created.clone().into()).await.unwrap();
    assert_eq!(first, created);
    assert_eq!(second, created);
    assert_eq!(service.list_employees().await.unwrap(), vec![created]);
}

pub(crate) async fn unknown_ids(service: &dyn EmployeeService) {
    assert_eq!(service.find_employee_by_id(42).await.unwrap(), None);
    assert_eq!(service.find_employee_by_id(-1).await.unwrap(), None);

    let ghost = Employee::with_id(42, NewEmployee::new("Nadie", "RH", 0.0));
    let err = service.delete_employee(&ghost).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound(42)));

    let err = service.save_employee(ghost.into()).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound(42)));
    assert!(service.list_employees().await.unwrap().is_empty());
}
