#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dashboard aggregation over neighbor comment collections.
//!
//! All functions here are pure derivations: a single linear pass over the
//! input, no I/O, no clock, no hidden state. Identical input always yields
//! identical output.

use planning_map_planning_models::{CommentTag, NeighborComment, Sentiment};
use serde::{Deserialize, Serialize};

/// Number of concern themes surfaced by [`common_concerns`].
const COMMON_CONCERN_LIMIT: usize = 3;

/// Sentiment tallies for a comment collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    /// Total comment count.
    pub total: u64,
    /// Comments classified positive.
    pub positive: u64,
    /// Comments classified neutral.
    pub neutral: u64,
    /// Comments classified negative.
    pub negative: u64,
}

/// Frequency of one tag across a comment collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagFrequency {
    /// The tag.
    pub tag: CommentTag,
    /// Number of occurrences across all comments.
    pub count: u64,
    /// Share of all tag occurrences, rounded to whole percent.
    pub percentage: u8,
}

/// A recurring concern theme surfaced on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonConcern {
    /// Human-readable theme label.
    pub theme: String,
    /// The tag this theme derives from.
    pub tag: CommentTag,
    /// Number of comments raising this concern.
    pub count: u64,
}

/// Tallies sentiment counts in a single linear pass.
///
/// `total` always equals the collection length; an empty collection yields
/// all zeros.
#[must_use]
pub fn sentiment_counts(comments: &[NeighborComment]) -> SentimentSummary {
    let mut summary = SentimentSummary::default();
    for comment in comments {
        summary.total += 1;
        match comment.sentiment {
            Sentiment::Positive => summary.positive += 1,
            Sentiment::Neutral => summary.neutral += 1,
            Sentiment::Negative => summary.negative += 1,
        }
    }
    summary
}

/// Counts tag occurrences across all comments.
///
/// A comment with N tags contributes to N tag counts. Percentages are
/// relative to the total number of tag occurrences, rounded to whole
/// percent. The result is sorted descending by count (stable, so the
/// taxonomy order breaks ties). Comments without tags contribute nothing;
/// an untagged collection yields an empty result.
#[must_use]
pub fn tag_analysis(comments: &[NeighborComment]) -> Vec<TagFrequency> {
    let mut counts: Vec<(CommentTag, u64)> = CommentTag::all()
        .iter()
        .map(|&tag| (tag, 0))
        .collect();
    for comment in comments {
        for tag in &comment.tags {
            if let Some(entry) = counts.iter_mut().find(|(t, _)| t == tag) {
                entry.1 += 1;
            }
        }
    }

    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut frequencies: Vec<TagFrequency> = counts
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(tag, count)| TagFrequency {
            tag,
            count,
            percentage: whole_percent(count, total),
        })
        .collect();
    frequencies.sort_by(|a, b| b.count.cmp(&a.count));
    frequencies
}

/// Derives the top three concern themes from the tag frequencies.
///
/// Themes come from the fixed tag-to-theme table on [`CommentTag`]; a tag
/// with zero occurrences is excluded entirely rather than shown with a
/// zero count.
#[must_use]
pub fn common_concerns(comments: &[NeighborComment]) -> Vec<CommonConcern> {
    tag_analysis(comments)
        .into_iter()
        .take(COMMON_CONCERN_LIMIT)
        .map(|frequency| CommonConcern {
            theme: frequency.tag.theme().to_string(),
            tag: frequency.tag,
            count: frequency.count,
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn whole_percent(count: u64, total: u64) -> u8 {
    ((count as f64 / total as f64) * 100.0).round() as u8
}
