#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the planning map server.
//!
//! These types define the JSON wire contract of the REST API. They are
//! separate from the persisted entity types so the API envelope can evolve
//! independently of the data file schema. Whatever happens, the client
//! always receives well-formed JSON — failures included.

use chrono::{DateTime, Utc};
use planning_map_analytics::{CommonConcern, SentimentSummary, TagFrequency};
use planning_map_planning_models::{CommentStatus, NeighborComment, PlanningApplication, Sentiment};
use serde::{Deserialize, Serialize};

/// Generic data envelope used by the comment and dashboard endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// The payload; a default/empty value on failure.
    pub data: T,
    /// Whether the request succeeded.
    pub success: bool,
    /// Human-readable failure description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Item count, for collection payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self {
            data,
            success: true,
            error: None,
            total: None,
        }
    }

    /// Wraps a successful collection payload with its item count.
    #[must_use]
    pub const fn success_with_total(data: T, total: u64) -> Self {
        Self {
            data,
            success: true,
            error: None,
            total: Some(total),
        }
    }

    /// Wraps a failure with an empty payload.
    #[must_use]
    pub fn failure(data: T, error: impl Into<String>) -> Self {
        Self {
            data,
            success: false,
            error: Some(error.into()),
            total: None,
        }
    }
}

/// Error code carried in the structured error envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    /// Requested resource does not exist.
    NotFound,
    /// Malformed or empty request payload.
    ValidationError,
    /// Unexpected server-side failure.
    InternalError,
}

impl ApiErrorCode {
    /// Returns the HTTP status code this error code maps to.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::ValidationError => 400,
            Self::InternalError => 500,
        }
    }
}

/// Body of the structured error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Human-readable description; never leaks internal detail.
    pub message: String,
    /// Machine-readable error code.
    pub code: ApiErrorCode,
    /// HTTP status code, duplicated for client convenience.
    pub status_code: u16,
    /// When the error was produced.
    pub timestamp: DateTime<Utc>,
    /// Request path that produced the error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Uniform error envelope returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// The error body.
    pub error: ApiErrorBody,
}

impl ApiErrorResponse {
    /// Builds an envelope for the given code, message, and request path.
    #[must_use]
    pub fn new(code: ApiErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            error: ApiErrorBody {
                message: message.into(),
                code,
                status_code: code.status_code(),
                timestamp: Utc::now(),
                path: Some(path.into()),
            },
        }
    }

    /// Builds a not-found envelope naming the resource and ID.
    #[must_use]
    pub fn not_found(resource: &str, id: &str, path: impl Into<String>) -> Self {
        Self::new(
            ApiErrorCode::NotFound,
            format!("{resource} with ID '{id}' not found"),
            path,
        )
    }
}

/// Response for `GET /api/applications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationsResponse {
    /// All planning applications.
    pub applications: Vec<PlanningApplication>,
    /// Number of applications.
    pub total: u64,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// Response for `GET /api/applications/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    /// The requested application with its comments.
    pub application: PlanningApplication,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for the comments endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQueryParams {
    /// Comma-separated sentiment list.
    pub sentiment: Option<String>,
    /// Free-text search query.
    pub search: Option<String>,
}

/// Request body for `PUT /api/applications/{id}/comments/{commentId}`.
///
/// Only these fields may be updated; unknown keys in the payload are
/// ignored by deserialization rather than rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdateRequest {
    /// Replacement comment body.
    pub content: Option<String>,
    /// Replacement sentiment.
    pub sentiment: Option<Sentiment>,
    /// Replacement publication status.
    pub status: Option<CommentStatus>,
    /// Replacement officer notes.
    pub officer_notes: Option<String>,
}

/// Response for a successful comment update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentUpdateResponse {
    /// Always `true` on this response.
    pub success: bool,
    /// Confirmation message.
    pub message: String,
    /// When the update was applied.
    pub timestamp: DateTime<Utc>,
}

/// Dashboard aggregation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    /// Sentiment tallies.
    pub sentiment: SentimentSummary,
    /// Tag frequency breakdown, empty when the dataset is untagged.
    pub tags: Vec<TagFrequency>,
    /// Top concern themes, empty when the dataset is untagged.
    pub concerns: Vec<CommonConcern>,
    /// Total comment count.
    pub total_comments: u64,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
