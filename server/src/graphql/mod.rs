mod employees;

use std::sync::Arc;

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Object, Schema, SimpleObject};
use platform_api::{ApiError, internal_error};
use platform_db::DbPool;
use products_hr::{EmployeeService, HrError};
use serde::Serialize;
use tracing::instrument;

use employees::{EmployeeInput, EmployeeNode};

pub type SchemaType = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// `pool` is `None` when records are kept in memory; health then reports the
/// process only.
pub fn build_schema(
    employees: Arc<dyn EmployeeService>,
    pool: Option<DbPool>,
) -> SchemaType {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(employees)
        .data(HealthProbe(pool))
        .finish()
}

struct HealthProbe(Option<DbPool>);

#[derive(Default)]
pub struct QueryRoot;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl QueryRoot {
    #[instrument(name = "graphql.health", skip_all)]
    async fn health(&self, ctx: &Context<'_>) -> HealthPayload {
        let db_ok = match ctx.data_opt::<HealthProbe>() {
            Some(HealthProbe(Some(pool))) => platform_db::ping(pool).await,
            _ => true,
        };
        HealthPayload { ok: db_ok, db_ok }
    }

    #[instrument(name = "graphql.version", skip_all)]
    async fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    #[instrument(name = "graphql.employees", skip_all)]
    async fn employees(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EmployeeNode>> {
        let records = service(ctx)?
            .list_employees()
            .await
            .map_err(graphql_error)?;
        Ok(records.into_iter().map(EmployeeNode::from).collect())
    }

    #[instrument(name = "graphql.employee", skip(self, ctx))]
    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let record = service(ctx)?
            .find_employee_by_id(id)
            .await
            .map_err(graphql_error)?;
        Ok(record.map(EmployeeNode::from))
    }
}

#[Object]
impl MutationRoot {
    /// Creates the employee when `input.id` is null, otherwise overwrites it.
    #[instrument(name = "graphql.save_employee", skip_all)]
    async fn save_employee(
        &self,
        ctx: &Context<'_>,
        input: EmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let saved = service(ctx)?
            .save_employee(input.into())
            .await
            .map_err(graphql_error)?;
        Ok(saved.into())
    }

    #[instrument(name = "graphql.delete_employee", skip(self, ctx))]
    async fn delete_employee(&self, ctx: &Context<'_>, id: i32) -> async_graphql::Result<bool> {
        let employees = service(ctx)?;
        let employee = employees
            .find_employee_by_id(id)
            .await
            .map_err(graphql_error)?
            .ok_or_else(|| graphql_error(HrError::NotFound(id)))?;
        employees
            .delete_employee(&employee)
            .await
            .map_err(graphql_error)?;
        Ok(true)
    }
}

#[derive(Clone, Debug, SimpleObject, Serialize)]
pub struct HealthPayload {
    pub ok: bool,
    pub db_ok: bool,
}

fn service(ctx: &Context<'_>) -> async_graphql::Result<Arc<dyn EmployeeService>> {
    ctx.data::<Arc<dyn EmployeeService>>()
        .cloned()
        .map_err(|_| internal_error(anyhow::anyhow!("employee service missing")))
}

pub(crate) fn api_error(err: HrError) -> ApiError {
    match err {
        HrError::NotFound(id) => ApiError::not_found(format!("employee {id}")),
        HrError::InvalidInput(msg) => ApiError::InvalidInput(msg),
        HrError::Persistence(db) => ApiError::internal(db.into()),
    }
}

fn graphql_error(err: HrError) -> async_graphql::Error {
    api_error(err).extend()
}
