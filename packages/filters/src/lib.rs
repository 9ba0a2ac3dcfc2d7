#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Shared filter state for bi-directional map-list synchronization.
//!
//! One [`FilterState`] value is the single source of truth for all active
//! filters in a review session. Both the map and the list views read it
//! and mutate it exclusively through [`reduce`], so they always agree.
//! State is per-session and transient; navigating between views transfers
//! it through the URL query string instead of any server session (see
//! [`FilterState::to_query_string`] and [`FilterPatch::from_query`]).
//!
//! The reducer rejects nothing: every well-typed payload is accepted, and
//! validation of incoming strings happens during URL parsing, where
//! unrecognized values are silently dropped.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use planning_map_planning_models::{ApplicationStatus, CommentStatus, MapBounds, Sentiment};
use serde::{Deserialize, Serialize};

/// An optional submission-date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// Earliest submission date to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    /// Latest submission date to include.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// All active filters for one review session.
///
/// Created empty at mount, mutated only through [`reduce`], discarded on
/// unload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Explicitly selected map pin IDs.
    pub selected_pins: Vec<String>,
    /// Selected sentiments (set semantics, order irrelevant).
    pub sentiment: Vec<Sentiment>,
    /// Selected comment statuses.
    pub comment_status: Vec<CommentStatus>,
    /// Selected application statuses.
    pub application_status: Vec<ApplicationStatus>,
    /// Free-text search query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_text: Option<String>,
    /// Submission-date window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    /// Current map viewport bounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_bounds: Option<MapBounds>,
}

/// A partial update merged over the current state by
/// [`FilterAction::Update`]. Absent fields leave the state untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPatch {
    /// Replacement selected pin IDs.
    pub selected_pins: Option<Vec<String>>,
    /// Replacement sentiment set.
    pub sentiment: Option<Vec<Sentiment>>,
    /// Replacement comment status set.
    pub comment_status: Option<Vec<CommentStatus>>,
    /// Replacement application status set.
    pub application_status: Option<Vec<ApplicationStatus>>,
    /// Replacement search text.
    pub search_text: Option<String>,
    /// Replacement date window.
    pub date_range: Option<DateRange>,
    /// Replacement map bounds.
    pub map_bounds: Option<MapBounds>,
}

impl FilterPatch {
    /// Builds a patch from recognized URL query parameters.
    ///
    /// `sentiment` and `status` are comma-joined lists; values outside the
    /// fixed enumerations are dropped silently rather than treated as
    /// errors. Blank parameters contribute nothing.
    #[must_use]
    pub fn from_query(
        search: Option<&str>,
        sentiment: Option<&str>,
        status: Option<&str>,
    ) -> Self {
        let search_text = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let sentiment = sentiment
            .map(parse_list::<Sentiment>)
            .filter(|list| !list.is_empty());
        let comment_status = status
            .map(parse_list::<CommentStatus>)
            .filter(|list| !list.is_empty());

        Self {
            search_text,
            sentiment,
            comment_status,
            ..Self::default()
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.selected_pins.is_none()
            && self.sentiment.is_none()
            && self.comment_status.is_none()
            && self.application_status.is_none()
            && self.search_text.is_none()
            && self.date_range.is_none()
            && self.map_bounds.is_none()
    }
}

/// Discrete filter transitions. Every action replaces only the targeted
/// field(s); `Reset` restores the full initial state unconditionally.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterAction {
    /// Replace the sentiment set.
    SetSentiment(Vec<Sentiment>),
    /// Replace the comment status set.
    SetCommentStatus(Vec<CommentStatus>),
    /// Replace the application status set.
    SetApplicationStatus(Vec<ApplicationStatus>),
    /// Replace the date window.
    SetDateRange(Option<DateRange>),
    /// Replace the map viewport bounds.
    SetMapBounds(Option<MapBounds>),
    /// Replace the search text.
    SetSearchText(Option<String>),
    /// Merge a partial update.
    Update(FilterPatch),
    /// Restore the initial empty state.
    Reset,
}

/// Applies one action to the state, returning the next state.
#[must_use]
pub fn reduce(mut state: FilterState, action: FilterAction) -> FilterState {
    match action {
        FilterAction::SetSentiment(sentiment) => state.sentiment = sentiment,
        FilterAction::SetCommentStatus(status) => state.comment_status = status,
        FilterAction::SetApplicationStatus(status) => state.application_status = status,
        FilterAction::SetDateRange(range) => state.date_range = range,
        FilterAction::SetMapBounds(bounds) => state.map_bounds = bounds,
        FilterAction::SetSearchText(text) => state.search_text = text,
        FilterAction::Update(patch) => {
            if let Some(pins) = patch.selected_pins {
                state.selected_pins = pins;
            }
            if let Some(sentiment) = patch.sentiment {
                state.sentiment = sentiment;
            }
            if let Some(status) = patch.comment_status {
                state.comment_status = status;
            }
            if let Some(status) = patch.application_status {
                state.application_status = status;
            }
            if let Some(text) = patch.search_text {
                state.search_text = Some(text);
            }
            if let Some(range) = patch.date_range {
                state.date_range = Some(range);
            }
            if let Some(bounds) = patch.map_bounds {
                state.map_bounds = Some(bounds);
            }
        }
        FilterAction::Reset => state = FilterState::default(),
    }
    state
}

impl FilterState {
    /// Returns `true` if any filter is active (selected pins are a map
    /// selection, not a filter, and are not counted).
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.sentiment.is_empty()
            || !self.comment_status.is_empty()
            || !self.application_status.is_empty()
            || self
                .search_text
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
            || self.map_bounds.is_some()
            || self
                .date_range
                .is_some_and(|range| range.start.is_some() || range.end.is_some())
    }

    /// Serializes the current non-empty filter fields back into a URL
    /// query string, so a reload or shared link reproduces the same
    /// filters. Returns an empty string when nothing is active.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut params: Vec<String> = Vec::new();

        if let Some(text) = self.search_text.as_deref().map(str::trim)
            && !text.is_empty()
        {
            params.push(format!("search={}", urlencoding::encode(text)));
        }
        if !self.sentiment.is_empty() {
            params.push(format!("sentiment={}", join_list(&self.sentiment)));
        }
        if !self.comment_status.is_empty() {
            params.push(format!("status={}", join_list(&self.comment_status)));
        }

        params.join("&")
    }
}

fn parse_list<T: FromStr>(raw: &str) -> Vec<T> {
    raw.split(',')
        .filter_map(|value| value.trim().parse().ok())
        .collect()
}

fn join_list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
