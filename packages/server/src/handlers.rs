//! HTTP handler functions for the planning map API.
//!
//! The handlers are the single place where internal outcomes are mapped
//! to HTTP status codes and JSON envelopes: expected misses become 404s,
//! empty update payloads become 400s, and store failures become generic
//! 500s with the underlying error logged server-side only.

use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use planning_map_analytics as analytics;
use planning_map_planning_models::NeighborComment;
use planning_map_server_models::{
    ApiErrorCode, ApiErrorResponse, ApiHealth, ApiResponse, ApplicationResponse,
    ApplicationsResponse, CommentQueryParams, CommentUpdateRequest, CommentUpdateResponse,
    DashboardData,
};
use planning_map_store::queries::{self, CommentQuery};
use planning_map_store::{CommentUpdate, UpdateOutcome};

use crate::AppState;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/applications`
///
/// Returns every planning application with its comments inline.
pub async fn applications(state: web::Data<AppState>, req: HttpRequest) -> HttpResponse {
    match state.store.load().await {
        Ok(applications) => {
            let total = applications.len() as u64;
            HttpResponse::Ok().json(ApplicationsResponse {
                applications,
                total,
                timestamp: Utc::now(),
            })
        }
        Err(e) => internal_error(&req, "Failed to load planning applications", &e),
    }
}

/// `GET /api/applications/{id}`
pub async fn application_by_id(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> HttpResponse {
    let id = path.into_inner();
    match state.store.load_by_id(&id).await {
        Ok(Some(application)) => HttpResponse::Ok().json(ApplicationResponse {
            application,
            timestamp: Utc::now(),
        }),
        Ok(None) => HttpResponse::NotFound().json(ApiErrorResponse::not_found(
            "Planning Application",
            &id,
            req.path(),
        )),
        Err(e) => internal_error(&req, "Failed to load planning application", &e),
    }
}

/// `GET /api/applications/{id}/comments`
///
/// Returns the application's comments, optionally filtered by a
/// comma-separated `sentiment` list and a free-text `search` query.
pub async fn application_comments(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<CommentQueryParams>,
    req: HttpRequest,
) -> HttpResponse {
    let id = path.into_inner();
    match state.store.load_by_id(&id).await {
        Ok(Some(application)) => {
            let query = CommentQuery {
                sentiment: params
                    .sentiment
                    .as_deref()
                    .map(queries::parse_sentiment_list)
                    .unwrap_or_default(),
                search: params.search.clone(),
            };
            let comments = queries::filter_comments(&application.comments, &query);
            let total = comments.len() as u64;
            HttpResponse::Ok().json(ApiResponse::success_with_total(comments, total))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::failure(
            Vec::<NeighborComment>::new(),
            "Planning application not found",
        )),
        Err(e) => {
            log::error!("Failed to load comments ({}): {e}", req.path());
            HttpResponse::InternalServerError().json(ApiResponse::failure(
                Vec::<NeighborComment>::new(),
                "Failed to load comments",
            ))
        }
    }
}

/// `PUT /api/applications/{id}/comments/{commentId}`
///
/// Applies a whitelisted partial update to one comment with audit-trail
/// compliance. Unknown keys in the payload are ignored; a payload with no
/// usable field is a validation error.
pub async fn update_comment(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    body: web::Json<CommentUpdateRequest>,
    req: HttpRequest,
) -> HttpResponse {
    let (application_id, comment_id) = path.into_inner();
    let request = body.into_inner();
    let update = CommentUpdate {
        content: request.content,
        sentiment: request.sentiment,
        status: request.status,
        officer_notes: request.officer_notes,
    };

    if update.is_empty() {
        return HttpResponse::BadRequest().json(ApiErrorResponse::new(
            ApiErrorCode::ValidationError,
            "No valid fields provided for update",
            req.path(),
        ));
    }

    match state
        .store
        .update_comment(&application_id, &comment_id, update)
        .await
    {
        Ok(UpdateOutcome::Updated) => HttpResponse::Ok().json(CommentUpdateResponse {
            success: true,
            message: "Comment updated successfully".to_string(),
            timestamp: Utc::now(),
        }),
        Ok(UpdateOutcome::ApplicationNotFound) => HttpResponse::NotFound().json(
            ApiErrorResponse::not_found("Planning Application", &application_id, req.path()),
        ),
        Ok(UpdateOutcome::CommentNotFound) => HttpResponse::NotFound().json(
            ApiErrorResponse::not_found("Comment", &comment_id, req.path()),
        ),
        Err(e) => internal_error(&req, "Failed to update comment", &e),
    }
}

/// `GET /api/applications/{id}/dashboard`
///
/// Returns the sentiment, tag, and concern summaries derived from the
/// application's comments.
pub async fn dashboard(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> HttpResponse {
    let id = path.into_inner();
    match state.store.load_by_id(&id).await {
        Ok(Some(application)) => {
            let data = DashboardData {
                sentiment: analytics::sentiment_counts(&application.comments),
                tags: analytics::tag_analysis(&application.comments),
                concerns: analytics::common_concerns(&application.comments),
                total_comments: application.comments.len() as u64,
            };
            HttpResponse::Ok().json(ApiResponse::success(data))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiErrorResponse::not_found(
            "Planning Application",
            &id,
            req.path(),
        )),
        Err(e) => internal_error(&req, "Failed to load dashboard data", &e),
    }
}

/// Logs the underlying error with request context and returns the generic
/// 500 envelope without leaking internal detail.
fn internal_error(req: &HttpRequest, message: &str, err: &dyn std::fmt::Display) -> HttpResponse {
    log::error!("{message} ({}): {err}", req.path());
    HttpResponse::InternalServerError().json(ApiErrorResponse::new(
        ApiErrorCode::InternalError,
        message,
        req.path(),
    ))
}
