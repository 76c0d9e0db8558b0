use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{self, HeaderName, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use platform_db::DbPool;
use products_hr::{Employee, EmployeeService, HrError, NewEmployee, SaveEmployee};
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::{config::AppConfig, graphql::SchemaType};

#[derive(Clone)]
pub struct AppState {
    pub employees: Arc<dyn EmployeeService>,
    pub schema: SchemaType,
    pub config: Arc<AppConfig>,
    /// `None` when records are kept in memory.
    pub pool: Option<DbPool>,
}

#[derive(Clone, Debug)]
pub struct ServeConfig {
    addr: SocketAddr,
}

impl ServeConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self {
            addr: SocketAddr::from((host, port)),
        }
    }
}

pub async fn serve(config: ServeConfig, state: AppState) -> anyhow::Result<()> {
    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;

    info!(%config.addr, "rh server listening");
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();
    let allow_origin = if allowed.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(allowed)
    };
    CorsLayer::new()
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_origin(allow_origin)
}

pub fn build_router(state: AppState) -> Router {
    let request_id = MakeRequestUuid;
    let header_name = HeaderName::from_static("x-request-id");
    Router::new()
        .route("/health", get(health_handler))
        .route("/graphql", post(graphql_handler))
        .route(
            "/api/employees",
            get(list_employees_handler).post(create_employee_handler),
        )
        .route(
            "/api/employees/{id}",
            get(get_employee_handler)
                .put(update_employee_handler)
                .delete(delete_employee_handler),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(header_name.clone(), request_id))
                .layer(PropagateRequestIdLayer::new(header_name))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.config.cors_allowed_origins)),
        )
        .with_state(state)
}

async fn list_employees_handler(State(state): State<AppState>) -> HttpResult<Json<Vec<Employee>>> {
    let records = state.employees.list_employees().await?;
    Ok(Json(records))
}

async fn get_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> HttpResult<Json<Employee>> {
    let record = state
        .employees
        .find_employee_by_id(id)
        .await?
        .ok_or(HrError::NotFound(id))?;
    Ok(Json(record))
}

async fn create_employee_handler(
    State(state): State<AppState>,
    body: Result<Json<NewEmployee>, JsonRejection>,
) -> HttpResult<(StatusCode, Json<Employee>)> {
    let body = employee_body(body)?;
    let created = state
        .employees
        .save_employee(SaveEmployee::New(body))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<NewEmployee>, JsonRejection>,
) -> HttpResult<Json<Employee>> {
    let body = employee_body(body)?;
    let updated = state
        .employees
        .save_employee(SaveEmployee::Existing(Employee::with_id(id, body)))
        .await?;
    Ok(Json(updated))
}

fn employee_body(body: Result<Json<NewEmployee>, JsonRejection>) -> HttpResult<NewEmployee> {
    body.map(|Json(fields)| fields)
        .map_err(|rejection| HttpError::new(StatusCode::BAD_REQUEST, rejection.body_text()))
}

async fn delete_employee_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> HttpResult<Json<serde_json::Value>> {
    let employee = state
        .employees
        .find_employee_by_id(id)
        .await?
        .ok_or(HrError::NotFound(id))?;
    state.employees.delete_employee(&employee).await?;
    Ok(Json(json!({ "deleted": true })))
}

async fn graphql_handler(State(state): State<AppState>, request: GraphQLRequest) -> GraphQLResponse {
    state.schema.execute(request.into_inner()).await.into()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let db_ok = match &state.pool {
        Some(pool) => platform_db::ping(pool).await,
        None => true,
    };
    Json(HealthResponse {
        ok: db_ok,
        db_ok,
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    db_ok: bool,
    version: &'static str,
}

type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    message: String,
}

impl HttpError {
    fn new(status: StatusCode, msg: impl Into<String>) -> Self {
        Self {
            status,
            message: msg.into(),
        }
    }
}

impl From<HrError> for HttpError {
    fn from(err: HrError) -> Self {
        match err {
            HrError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            HrError::InvalidInput(msg) => Self::new(StatusCode::BAD_REQUEST, msg),
            HrError::Persistence(db) => {
                error!(error = %db, "employee storage failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    ctrl_c.await;

    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::StoreKind, graphql::build_schema};
    use axum::body::Body;
    use http::Request;
    use http_body_util::BodyExt;
    use products_hr::InMemoryEmployeeService;
    use sea_orm::DbErr;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let employees: Arc<dyn EmployeeService> = Arc::new(InMemoryEmployeeService::new());
        let state = AppState {
            schema: build_schema(employees.clone(), None),
            employees,
            config: Arc::new(AppConfig {
                store: StoreKind::Memory,
                seed_on_start: false,
                cors_allowed_origins: vec!["http://localhost:5173".into()],
            }),
            pool: None,
        };
        build_router(state)
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(http::header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn health_reports_ok_without_database() {
        let router = router();
        let (status, body) = send(&router, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], Value::Bool(true));
        assert_eq!(body["db_ok"], Value::Bool(true));
    }

    #[tokio::test]
    async fn rest_lifecycle() {
        let router = router();
        let (status, created) = send(
            &router,
            Method::POST,
            "/api/employees",
            Some(json!({"name": "Ana", "department": "Sistemas", "salary": 3000.0})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(
            created,
            json!({"id": 1, "name": "Ana", "department": "Sistemas", "salary": 3000.0})
        );

        let (status, found) = send(&router, Method::GET, "/api/employees/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found, created);

        let (status, updated) = send(
            &router,
            Method::PUT,
            "/api/employees/1",
            Some(json!({"name": "Ana", "department": "Ventas", "salary": 3100.0})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["department"], "Ventas");

        let (status, body) = send(&router, Method::DELETE, "/api/employees/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"deleted": true}));

        let (status, _) = send(&router, Method::GET, "/api/employees/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, listed) = send(&router, Method::GET, "/api/employees", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn missing_records_and_bad_input_map_to_status_codes() {
        let router = router();
        let (status, body) = send(&router, Method::DELETE, "/api/employees/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "employee 5 not found"}));

        let (status, _) = send(
            &router,
            Method::PUT,
            "/api/employees/5",
            Some(json!({"name": "Ana", "department": "RH", "salary": 1.0})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(
            &router,
            Method::POST,
            "/api/employees",
            Some(json!({"name": "Ana", "department": "RH", "salary": -5.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "salary must be a non-negative number"}));
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let router = router();
        let (status, body) = send(
            &router,
            Method::POST,
            "/api/employees",
            Some(json!({"name": "Ana", "department": "RH"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("salary"));

        let (status, body) = send(
            &router,
            Method::PUT,
            "/api/employees/1",
            Some(json!({"name": "Ana", "department": "RH", "salary": "mucho"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, listed) = send(&router, Method::GET, "/api/employees", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn storage_failures_are_masked() {
        let err = HttpError::from(HrError::Persistence(DbErr::Custom(
            "relation employees is locked".into(),
        )));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "internal server error");

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"error": "internal server error"}));
    }
}
