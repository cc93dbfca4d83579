// Person CRUD HTTP routes

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use roster_storage::{CreatePerson, PersonRow, PersonStore, UpdatePerson};

use crate::common::{ApiError, ErrorBody, ListResponse, PageQuery};
use crate::services::PersonService;

/// Public person representation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Person {
    pub id: i64,
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = 25)]
    pub age: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Person {
    pub(crate) fn from_row(row: PersonRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            age: row.age.clamp(0, u32::MAX as i64) as u32,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Request to create a person.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePersonRequest {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = 25)]
    pub age: u32,
}

/// Request to update a person. Unset fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePersonRequest {
    pub name: Option<String>,
    pub age: Option<u32>,
}

/// App state for person routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PersonService>,
}

impl AppState {
    pub fn new(store: Arc<PersonStore>) -> Self {
        Self {
            service: Arc::new(PersonService::new(store)),
        }
    }
}

/// Create person routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/persons", post(create_person).get(list_persons))
        .route(
            "/v1/persons/:id",
            get(get_person).put(update_person).delete(delete_person),
        )
        .with_state(state)
}

fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::invalid(format!("invalid person id: {raw}")))
}

/// POST /v1/persons - Create a person
#[utoipa::path(
    post,
    path = "/v1/persons",
    request_body = CreatePersonRequest,
    responses(
        (status = 201, description = "Person created", body = Person),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "persons"
)]
pub async fn create_person(
    State(state): State<AppState>,
    payload: Result<Json<CreatePersonRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::invalid(e.body_text()))?;
    if req.name.trim().is_empty() {
        return Err(ApiError::invalid("name must not be empty"));
    }

    let person = state
        .service
        .create(CreatePerson {
            name: req.name,
            age: req.age as i64,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(person)))
}

/// GET /v1/persons - List persons in id order
#[utoipa::path(
    get,
    path = "/v1/persons",
    params(PageQuery),
    responses(
        (status = 200, description = "List of persons", body = ListResponse<Person>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "persons"
)]
pub async fn list_persons(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ListResponse<Person>>, ApiError> {
    let persons = state.service.list(query.limit(), query.offset()).await?;
    Ok(Json(ListResponse::new(persons)))
}

/// GET /v1/persons/{id} - Get person by id
#[utoipa::path(
    get,
    path = "/v1/persons/{id}",
    params(
        ("id" = i64, Path, description = "Person id")
    ),
    responses(
        (status = 200, description = "Person found", body = Person),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Person not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "persons"
)]
pub async fn get_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;
    let person = state
        .service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("person {id} not found")))?;
    Ok(Json(person))
}

/// PUT /v1/persons/{id} - Update person
#[utoipa::path(
    put,
    path = "/v1/persons/{id}",
    params(
        ("id" = i64, Path, description = "Person id")
    ),
    request_body = UpdatePersonRequest,
    responses(
        (status = 200, description = "Person updated", body = Person),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 404, description = "Person not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "persons"
)]
pub async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdatePersonRequest>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload.map_err(|e| ApiError::invalid(e.body_text()))?;
    if let Some(name) = &req.name {
        if name.trim().is_empty() {
            return Err(ApiError::invalid("name must not be empty"));
        }
    }

    let person = state
        .service
        .update(
            id,
            UpdatePerson {
                name: req.name,
                age: req.age.map(|age| age as i64),
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found(format!("person {id} not found")))?;

    Ok(Json(person))
}

/// DELETE /v1/persons/{id} - Delete person
#[utoipa::path(
    delete,
    path = "/v1/persons/{id}",
    params(
        ("id" = i64, Path, description = "Person id")
    ),
    responses(
        (status = 204, description = "Person deleted"),
        (status = 400, description = "Invalid id", body = ErrorBody),
        (status = 404, description = "Person not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tag = "persons"
)]
pub async fn delete_person(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let deleted = state.service.delete(id).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("person {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_app() -> Router {
        let store = Arc::new(PersonStore::open_in_memory().unwrap());
        routes(AppState::new(store))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_roundtrip() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/v1/persons", r#"{"name":"Alice","age":25}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let person = body_json(response).await;
        assert_eq!(person["name"], "Alice");
        assert_eq!(person["age"], 25);
        let id = person["id"].as_i64().unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/persons/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["id"], id);
    }

    #[tokio::test]
    async fn missing_person_returns_structured_404() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/persons/4242")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn non_numeric_id_returns_400() {
        let app = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/persons/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("invalid person id"));
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let app = test_app();
        let response = app
            .oneshot(post_json("/v1/persons", r#"{"name":"  ","age":25}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_and_delete_lifecycle() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post_json("/v1/persons", r#"{"name":"Bob","age":30}"#))
            .await
            .unwrap();
        let id = body_json(response).await["id"].as_i64().unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/v1/persons/{id}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"Robert"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["name"], "Robert");
        assert_eq!(updated["age"], 30);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/persons/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/v1/persons/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_wraps_rows_in_data_envelope() {
        let app = test_app();
        for name in ["Alice", "Bob"] {
            app.clone()
                .oneshot(post_json(
                    "/v1/persons",
                    &format!(r#"{{"name":"{name}","age":30}}"#),
                ))
                .await
                .unwrap();
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/v1/persons?limit=10")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
    }
}
