use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::state::AppState;
use crate::cover::{render, validate, CoverPage, CoverPageData, FieldUpdate, ValidationError};
use crate::session::{Session, SubmitError};
use crate::ErrorResponse;
use std::sync::Arc;

#[derive(Deserialize, Debug, ToSchema)]
pub struct UpdateFieldsRequest {
    pub updates: Vec<FieldUpdate>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct TopicsResponse {
    pub topics: Vec<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ValidateRecordResponse {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<CoverPage>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct FieldErrorsResponse {
    pub error: String,
    pub message: String,
    pub errors: Vec<ValidationError>,
}

async fn find_session(state: &AppState, id: Uuid) -> Result<Arc<Session>, HttpResponse> {
    state.sessions.get(&id).await.ok_or_else(|| {
        HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Session {} does not exist or has expired",
            id
        )))
    })
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    tag = "Cover Page",
    responses(
        (status = 201, description = "Session created with default values", body = crate::session::SessionView)
    )
)]
pub async fn create_session(state: web::Data<AppState>) -> impl Responder {
    let session = state.sessions.create(CoverPageData::default()).await;
    log::info!("Created form session {}", session.id());
    HttpResponse::Created().json(session.view(&state.institution))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    tag = "Cover Page",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Current form, errors and preview", body = crate::session::SessionView),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn get_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    match find_session(&state, path.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(session.view(&state.institution)),
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "Cover Page",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session ended"),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn end_session(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();
    if state.sessions.remove(&id).await {
        log::info!("Ended form session {}", id);
        HttpResponse::NoContent().finish()
    } else {
        HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
            "Session {} does not exist or has expired",
            id
        )))
    }
}

#[utoipa::path(
    patch,
    path = "/api/sessions/{id}/fields",
    tag = "Cover Page",
    params(("id" = Uuid, Path, description = "Session ID")),
    request_body = UpdateFieldsRequest,
    responses(
        (status = 200, description = "Fields updated; preview re-rendered", body = crate::session::SessionView),
        (status = 400, description = "A field value could not be applied", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn update_fields(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateFieldsRequest>,
) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match session.apply(&body.updates) {
        Ok(()) => HttpResponse::Ok().json(session.view(&state.institution)),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/topic-blur",
    tag = "Cover Page",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Current topic remembered", body = TopicsResponse),
        (status = 404, description = "Session not found", body = ErrorResponse)
    )
)]
pub async fn topic_blur(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let topic = session.form().snapshot().topic.unwrap_or_default();
    let store = state.topics.clone();
    match web::block(move || store.remember(&topic)).await {
        Ok(Ok(_)) => HttpResponse::Ok().json(TopicsResponse {
            topics: state.topics.list(),
        }),
        Ok(Err(e)) => {
            log::error!("Failed to save topic: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
        Err(e) => {
            log::error!("Topic save task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/ai-validation",
    tag = "Cover Page",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Validation outcome (success or failure)", body = crate::gateway::GatewayOutcomeBody),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 409, description = "A validation request is already running", body = ErrorResponse),
        (status = 422, description = "The form has field errors", body = FieldErrorsResponse)
    )
)]
pub async fn run_ai_validation(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    match session.run_ai_validation(&state.gateway).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome.to_body()),
        Err(SubmitError::InFlight) => HttpResponse::Conflict().json(ErrorResponse::new(
            "Conflict",
            "A validation request is already in progress",
        )),
        Err(SubmitError::Invalid(errors)) => {
            HttpResponse::UnprocessableEntity().json(FieldErrorsResponse {
                error: "ValidationFailed".to_string(),
                message: errors.to_message(),
                errors: errors.into_vec(),
            })
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/pdf",
    tag = "Cover Page",
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Printed cover page as application/pdf"),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Typst compilation failed", body = ErrorResponse)
    )
)]
pub async fn print_pdf(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let session = match find_session(&state, path.into_inner()).await {
        Ok(session) => session,
        Err(response) => return response,
    };

    let data = session.form().snapshot();
    let preview = render(&data, &state.institution);
    let printer = state.printer.clone();
    let printed = web::block(move || printer.print(&preview, &data.student_name)).await;

    match printed {
        Ok(Ok(doc)) => HttpResponse::Ok()
            .content_type("application/pdf")
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(doc.filename)],
            })
            .body(doc.pdf),
        Ok(Err(e)) => {
            log::error!("Failed to print cover page: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&format!(
                "Failed to print cover page: {}",
                e
            )))
        }
        Err(e) => {
            log::error!("Print task failed: {}", e);
            HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/cover/preview",
    tag = "Cover Page",
    request_body = CoverPageData,
    responses(
        (status = 200, description = "Rendered preview", body = crate::cover::CoverPagePreview)
    )
)]
pub async fn preview_record(
    state: web::Data<AppState>,
    body: web::Json<CoverPageData>,
) -> impl Responder {
    HttpResponse::Ok().json(render(&body, &state.institution))
}

#[utoipa::path(
    post,
    path = "/api/cover/validate",
    tag = "Cover Page",
    request_body = CoverPageData,
    responses(
        (status = 200, description = "Schema validation result", body = ValidateRecordResponse)
    )
)]
pub async fn validate_record(body: web::Json<CoverPageData>) -> impl Responder {
    let response = match validate(&body) {
        Ok(page) => ValidateRecordResponse {
            valid: true,
            errors: Vec::new(),
            page: Some(page),
        },
        Err(errors) => ValidateRecordResponse {
            valid: false,
            errors: errors.into_vec(),
            page: None,
        },
    };
    HttpResponse::Ok().json(response)
}

#[utoipa::path(
    get,
    path = "/api/topics",
    tag = "Cover Page",
    responses(
        (status = 200, description = "Previously entered topics", body = TopicsResponse)
    )
)]
pub async fn list_topics(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(TopicsResponse {
        topics: state.topics.list(),
    })
}
