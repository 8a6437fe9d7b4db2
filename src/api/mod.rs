//! HTTP surface for the cover page generator.

pub mod handlers;
pub mod state;

pub use state::AppState;

use actix_web::web;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_session,
        handlers::get_session,
        handlers::end_session,
        handlers::update_fields,
        handlers::topic_blur,
        handlers::run_ai_validation,
        handlers::print_pdf,
        handlers::preview_record,
        handlers::validate_record,
        handlers::list_topics
    ),
    components(
        schemas(
            crate::cover::CoverPageData,
            crate::cover::CoverPage,
            crate::cover::Department,
            crate::cover::DocumentType,
            crate::cover::Field,
            crate::cover::FieldUpdate,
            crate::cover::ValidationError,
            crate::cover::CoverPagePreview,
            crate::cover::preview::SignatureBlock,
            crate::gateway::CorrectedFields,
            crate::gateway::ValidationResult,
            crate::gateway::GatewayOutcomeBody,
            crate::session::SessionView,
            handlers::UpdateFieldsRequest,
            handlers::TopicsResponse,
            handlers::ValidateRecordResponse,
            handlers::FieldErrorsResponse,
            crate::ErrorResponse,
        )
    ),
    tags(
        (name = "Cover Page", description = "Form sessions, preview, AI validation and printing.")
    )
)]
pub struct ApiDoc;

/// Register the `/api` routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/sessions").route(web::post().to(handlers::create_session)))
            .service(
                web::resource("/sessions/{id}")
                    .route(web::get().to(handlers::get_session))
                    .route(web::delete().to(handlers::end_session)),
            )
            .service(
                web::resource("/sessions/{id}/fields")
                    .route(web::patch().to(handlers::update_fields)),
            )
            .service(
                web::resource("/sessions/{id}/topic-blur")
                    .route(web::post().to(handlers::topic_blur)),
            )
            .service(
                web::resource("/sessions/{id}/ai-validation")
                    .route(web::post().to(handlers::run_ai_validation)),
            )
            .service(
                web::resource("/sessions/{id}/pdf").route(web::get().to(handlers::print_pdf)),
            )
            .service(
                web::resource("/cover/preview").route(web::post().to(handlers::preview_record)),
            )
            .service(
                web::resource("/cover/validate").route(web::post().to(handlers::validate_record)),
            )
            .service(web::resource("/topics").route(web::get().to(handlers::list_topics))),
    );
}
