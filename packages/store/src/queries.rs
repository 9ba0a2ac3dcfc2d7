//! Read-only filtering of already-loaded comment collections.
//!
//! Filtering never touches the data file; callers load through
//! [`ApplicationStore`](crate::ApplicationStore) first. Both filters
//! AND-compose and the input order is preserved (stable filter, not a
//! re-sort). The entire filtered result is returned in one pass; there is
//! no pagination.

use planning_map_planning_models::{NeighborComment, Sentiment};

/// Filter criteria for a comment collection.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    /// Keep only comments whose sentiment is in this set. Empty means no
    /// sentiment filtering.
    pub sentiment: Vec<Sentiment>,
    /// Case-insensitive substring matched against content, neighbor
    /// address, and officer notes. Blank or whitespace means no search
    /// filtering.
    pub search: Option<String>,
}

/// Filters a comment collection by sentiment membership and free-text
/// search.
#[must_use]
pub fn filter_comments(comments: &[NeighborComment], query: &CommentQuery) -> Vec<NeighborComment> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    comments
        .iter()
        .filter(|comment| {
            (query.sentiment.is_empty() || query.sentiment.contains(&comment.sentiment))
                && search
                    .as_deref()
                    .is_none_or(|needle| matches_search(comment, needle))
        })
        .cloned()
        .collect()
}

/// Returns `true` if any of the three searchable fields contains the
/// (already lowercased) needle. Missing officer notes never match.
fn matches_search(comment: &NeighborComment, needle: &str) -> bool {
    comment.content.to_lowercase().contains(needle)
        || comment.neighbor_address.to_lowercase().contains(needle)
        || comment
            .officer_notes
            .as_deref()
            .is_some_and(|notes| notes.to_lowercase().contains(needle))
}

/// Parses a comma-separated sentiment list, silently dropping values that
/// are not in the fixed three-value enumeration.
#[must_use]
pub fn parse_sentiment_list(raw: &str) -> Vec<Sentiment> {
    raw.split(',')
        .filter_map(|s| s.trim().parse().ok())
        .collect()
}
