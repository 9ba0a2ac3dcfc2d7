#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Planning application and neighbor comment entity types.
//!
//! This crate defines the canonical schema shared across the planning-map
//! system: geographic primitives, the sentiment/status/tag taxonomies, and
//! the application/comment entities as persisted in the JSON data file.
//! Field names serialize in camelCase to match the wire format consumed by
//! the dashboard frontend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A geographic point in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a new coordinate.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Returns `true` if this coordinate falls within the practical UK
    /// range (lat 49.8..=60.9, lon -8.2..=1.8).
    ///
    /// Fixture data is expected to satisfy this but it is not enforced on
    /// load.
    #[must_use]
    pub fn is_within_uk_bounds(self) -> bool {
        (49.8..=60.9).contains(&self.latitude) && (-8.2..=1.8).contains(&self.longitude)
    }
}

/// A geographic bounding box, as reported by the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapBounds {
    /// Northern latitude boundary.
    pub north: f64,
    /// Southern latitude boundary.
    pub south: f64,
    /// Eastern longitude boundary.
    pub east: f64,
    /// Western longitude boundary.
    pub west: f64,
}

impl MapBounds {
    /// Creates a new bounding box from the given boundaries.
    #[must_use]
    pub const fn new(north: f64, south: f64, east: f64, west: f64) -> Self {
        Self {
            north,
            south,
            east,
            west,
        }
    }

    /// Returns `true` if the coordinate lies within this box (inclusive).
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        (self.south..=self.north).contains(&coordinate.latitude)
            && (self.west..=self.east).contains(&coordinate.longitude)
    }
}

/// Classification of a neighbor comment's tone.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Sentiment {
    /// Supportive of the application.
    Positive,
    /// Neither supportive nor opposed.
    Neutral,
    /// Opposed to the application.
    Negative,
}

impl Sentiment {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Positive, Self::Neutral, Self::Negative]
    }
}

/// Publication status of a neighbor comment.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommentStatus {
    /// Awaiting officer review.
    #[default]
    PendingReview,
    /// Reviewed and cleared for public display.
    ApprovedForPublication,
    /// Held back from public display.
    Confidential,
    /// Personal details removed before publication.
    Redacted,
}

impl CommentStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::PendingReview,
            Self::ApprovedForPublication,
            Self::Confidential,
            Self::Redacted,
        ]
    }
}

/// Lifecycle status of a planning application.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ApplicationStatus {
    /// Received by the authority, not yet assigned.
    #[default]
    Submitted,
    /// Under officer review.
    UnderReview,
    /// In the public consultation window.
    Consultation,
    /// Permission granted.
    Approved,
    /// Permission refused.
    Rejected,
    /// Withdrawn by the applicant.
    Withdrawn,
}

impl ApplicationStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Submitted,
            Self::UnderReview,
            Self::Consultation,
            Self::Approved,
            Self::Rejected,
            Self::Withdrawn,
        ]
    }
}

/// Topic tag attached to a neighbor comment.
///
/// Tags are optional in the data model; older fixture files omit them
/// entirely and load with an empty tag list.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CommentTag {
    /// Concerns about the proposed use of the site.
    Use,
    /// Overlooking and loss of privacy.
    Privacy,
    /// Loss of natural light or overshadowing.
    Light,
    /// Access, parking, and highway safety.
    Access,
    /// Noise during or after construction.
    Noise,
    /// Traffic generation and congestion.
    Traffic,
    /// Design, scale, and appearance.
    Design,
    /// Anything not covered by the other tags.
    Other,
}

impl CommentTag {
    /// Returns the human-readable concern theme for this tag, used by the
    /// dashboard's common-concerns summary.
    #[must_use]
    pub const fn theme(self) -> &'static str {
        match self {
            Self::Use => "Land Use",
            Self::Privacy => "Privacy Impact",
            Self::Light => "Loss of Light",
            Self::Access => "Access & Safety",
            Self::Noise => "Noise Disturbance",
            Self::Traffic => "Traffic Impact",
            Self::Design => "Design & Appearance",
            Self::Other => "Other Concerns",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Use,
            Self::Privacy,
            Self::Light,
            Self::Access,
            Self::Noise,
            Self::Traffic,
            Self::Design,
            Self::Other,
        ]
    }
}

/// Kind of polygon drawn for a planning application.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BoundaryType {
    /// The application site outline.
    Site,
    /// The proposed development footprint.
    Proposed,
    /// An existing structure footprint.
    Existing,
}

/// Optional render styling for an application boundary polygon.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryStyle {
    /// Stroke color as a CSS color string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Fill opacity in the range 0.0..=1.0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,
}

/// A polygon describing a planning application's site outline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationBoundary {
    /// What this polygon represents.
    #[serde(rename = "type")]
    pub boundary_type: BoundaryType,
    /// Ordered polygon vertices.
    pub coordinates: Vec<Coordinate>,
    /// Optional map render styling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BoundaryStyle>,
}

/// A comment submitted by a neighbor on a planning application.
///
/// Audit invariant: once `is_edited` is set, `original_content` holds the
/// content exactly as it was before the *first* edit and is never
/// overwritten by later edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighborComment {
    /// Unique comment ID.
    pub id: String,
    /// ID of the owning application. Lookup back-reference only; older
    /// fixture files omit it.
    #[serde(default)]
    pub application_id: String,
    /// Address of the submitting neighbor.
    pub neighbor_address: String,
    /// Location of the submitting property.
    pub coordinates: Coordinate,
    /// Free-text comment body.
    pub content: String,
    /// Tone classification.
    pub sentiment: Sentiment,
    /// When the comment was submitted.
    pub submission_date: DateTime<Utc>,
    /// Publication status.
    #[serde(default)]
    pub status: CommentStatus,
    /// Whether personal details have been redacted.
    #[serde(default)]
    pub is_redacted: bool,
    /// Free-text annotation added by a planning officer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer_notes: Option<String>,
    /// Whether the content has been edited since submission.
    #[serde(default)]
    pub is_edited: bool,
    /// Pre-first-edit content snapshot, present once `is_edited` is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_content: Option<String>,
    /// Topic tags, empty when the fixture predates tagging.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<CommentTag>,
    /// When the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last modified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A UK planning application with its owned neighbor comments.
///
/// Applications are seeded from fixture data at process start; there is no
/// creation API and they are never deleted at runtime. Comments are owned
/// by composition and do not outlive their application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanningApplication {
    /// Opaque unique ID, e.g. `"APP-2024-0001"`.
    pub id: String,
    /// Authority-assigned reference, e.g. `"24/00001/FUL"`.
    pub reference: String,
    /// Site address.
    pub address: String,
    /// Description of the proposed development.
    pub description: String,
    /// Name of the applicant.
    pub applicant_name: String,
    /// When the application was submitted.
    pub submission_date: DateTime<Utc>,
    /// Site location.
    pub coordinates: Coordinate,
    /// Optional site boundary polygon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<ApplicationBoundary>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ApplicationStatus,
    /// Neighbor comments on this application.
    #[serde(default)]
    pub comments: Vec<NeighborComment>,
    /// When the record was last modified. Refreshed whenever an owned
    /// comment is mutated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The persisted data file: either a single application object (early
/// fixture layout) or an array of applications (canonical layout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApplicationDocument {
    /// Array of applications.
    Many(Vec<PlanningApplication>),
    /// A single application object.
    One(Box<PlanningApplication>),
}

impl ApplicationDocument {
    /// Normalizes either layout into a list of applications.
    #[must_use]
    pub fn into_vec(self) -> Vec<PlanningApplication> {
        match self {
            Self::Many(apps) => apps,
            Self::One(app) => vec![*app],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uk_bounds_accept_manchester_reject_paris() {
        assert!(Coordinate::new(53.4720, -2.2372).is_within_uk_bounds());
        assert!(!Coordinate::new(48.8566, 2.3522).is_within_uk_bounds());
    }

    #[test]
    fn map_bounds_containment_is_inclusive() {
        let bounds = MapBounds::new(53.5, 53.4, -2.2, -2.3);
        assert!(bounds.contains(Coordinate::new(53.45, -2.25)));
        assert!(bounds.contains(Coordinate::new(53.5, -2.2)));
        assert!(!bounds.contains(Coordinate::new(53.39, -2.25)));
        assert!(!bounds.contains(Coordinate::new(53.45, -2.19)));
    }

    #[test]
    fn sentiment_parses_wire_names() {
        assert_eq!("positive".parse::<Sentiment>().unwrap(), Sentiment::Positive);
        assert_eq!("negative".parse::<Sentiment>().unwrap(), Sentiment::Negative);
        assert!("hostile".parse::<Sentiment>().is_err());
    }

    #[test]
    fn comment_status_uses_snake_case_wire_names() {
        assert_eq!(
            "pending_review".parse::<CommentStatus>().unwrap(),
            CommentStatus::PendingReview
        );
        assert_eq!(
            CommentStatus::ApprovedForPublication.to_string(),
            "approved_for_publication"
        );
    }

    #[test]
    fn every_tag_has_a_theme() {
        for tag in CommentTag::all() {
            assert!(!tag.theme().is_empty(), "{tag:?} has no theme");
        }
    }

    #[test]
    fn lean_comment_fixture_loads_with_defaults() {
        // Shape of the early prototype fixture: no status, audit, or tag
        // fields.
        let json = r#"{
            "id": "comment-001",
            "neighborAddress": "13 Oxford Road, Manchester M1 5QA",
            "coordinates": { "latitude": 53.4720, "longitude": -2.2372 },
            "content": "I strongly support this extension proposal.",
            "sentiment": "positive",
            "submissionDate": "2024-01-20T14:30:00Z"
        }"#;

        let comment: NeighborComment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.status, CommentStatus::PendingReview);
        assert!(!comment.is_edited);
        assert!(!comment.is_redacted);
        assert!(comment.original_content.is_none());
        assert!(comment.tags.is_empty());
        assert!(comment.application_id.is_empty());
    }

    #[test]
    fn document_normalizes_single_object_and_array() {
        let single = r#"{
            "id": "APP-2024-0001",
            "reference": "24/00001/FUL",
            "address": "15 Oxford Road, Manchester M1 5QA",
            "description": "Two-storey rear extension",
            "applicantName": "J. Smith",
            "submissionDate": "2024-01-15T09:00:00Z",
            "coordinates": { "latitude": 53.4722, "longitude": -2.2374 },
            "status": "consultation"
        }"#;

        let doc: ApplicationDocument = serde_json::from_str(single).unwrap();
        let apps = doc.into_vec();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].id, "APP-2024-0001");
        assert!(apps[0].comments.is_empty());

        let many = format!("[{single}]");
        let doc: ApplicationDocument = serde_json::from_str(&many).unwrap();
        assert_eq!(doc.into_vec().len(), 1);
    }
}
