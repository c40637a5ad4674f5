use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use customer_api::{CustomerApi, DELETED_MESSAGE};
use customer_core::{Customer, CustomerError};
use serde::Serialize;
use tower_http::trace::TraceLayer;

const OPENAPI_YAML: &str = include_str!("../../../openapi/openapi.yaml");

#[derive(Debug, Clone)]
pub struct ServiceState {
    pub api: CustomerApi,
}

/// JSON response body rendered with two-space indentation.
#[derive(Debug, Clone)]
pub struct IndentedJson<T>(pub StatusCode, pub T);

impl<T> IntoResponse for IndentedJson<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let Self(status, value) = self;
        match serde_json::to_vec_pretty(&value) {
            Ok(body) => {
                (status, [(header::CONTENT_TYPE, "application/json; charset=utf-8")], body)
                    .into_response()
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}

/// Single-key status payload: `{"error": ...}` or `{"message": ...}`.
#[derive(Debug, Clone, Serialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum Reply {
    Error { error: String },
    Message { message: String },
}

#[derive(Debug, Clone, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Clone)]
pub struct ServiceFailure {
    status: StatusCode,
    message: String,
}

impl ServiceFailure {
    fn invalid_body(rejection: &JsonRejection) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("Request body is not valid JSON: {}", rejection.body_text()),
        }
    }
}

impl From<CustomerError> for ServiceFailure {
    fn from(err: CustomerError) -> Self {
        let status =
            if err.is_validation() { StatusCode::BAD_REQUEST } else { StatusCode::NOT_FOUND };
        Self { status, message: err.to_string() }
    }
}

impl IntoResponse for ServiceFailure {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status, error = %self.message, "request rejected");
        IndentedJson(self.status, Reply::Error { error: self.message }).into_response()
    }
}

pub fn app(state: ServiceState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/openapi", get(openapi))
        .route("/customer", post(create_customer))
        .route("/customers", get(list_customers))
        .route("/customer/", get(missing_id).put(missing_id).delete(missing_id))
        .route("/customer/:id", get(get_customer).put(update_customer).delete(delete_customer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> IndentedJson<HealthResponse> {
    IndentedJson(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn openapi() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "application/yaml; charset=utf-8")], OPENAPI_YAML)
}

async fn create_customer(
    State(state): State<ServiceState>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<IndentedJson<Customer>, ServiceFailure> {
    let Json(customer) = payload.map_err(|rejection| ServiceFailure::invalid_body(&rejection))?;
    let created = state.api.create(customer)?;
    Ok(IndentedJson(StatusCode::CREATED, created))
}

async fn list_customers(State(state): State<ServiceState>) -> IndentedJson<Vec<Customer>> {
    IndentedJson(StatusCode::OK, state.api.list())
}

async fn missing_id() -> ServiceFailure {
    ServiceFailure::from(CustomerError::EmptyIdentifier)
}

async fn get_customer(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<IndentedJson<Customer>, ServiceFailure> {
    let customer = state.api.get(&id)?;
    Ok(IndentedJson(StatusCode::OK, customer))
}

async fn update_customer(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    payload: Result<Json<Customer>, JsonRejection>,
) -> Result<IndentedJson<Customer>, ServiceFailure> {
    // Resolve first: an unknown id answers 404 whatever the body holds.
    state.api.get(&id)?;
    let Json(customer) = payload.map_err(|rejection| ServiceFailure::invalid_body(&rejection))?;
    let updated = state.api.update(&id, customer)?;
    Ok(IndentedJson(StatusCode::OK, updated))
}

async fn delete_customer(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
) -> Result<IndentedJson<Reply>, ServiceFailure> {
    state.api.delete(&id)?;
    Ok(IndentedJson(StatusCode::OK, Reply::Message { message: DELETED_MESSAGE.to_string() }))
}
