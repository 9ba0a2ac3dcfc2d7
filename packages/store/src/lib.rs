#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! File-backed storage for planning applications and their neighbor
//! comments.
//!
//! [`ApplicationStore`] is the single point of truth for the JSON data
//! file: nothing else in the system reads or writes it. Reads are served
//! from a single-slot in-process cache with a fixed TTL; writes rewrite
//! the full document and refresh the cache in place (write-through).
//!
//! Known prototype limitations, accepted rather than fixed: there is no
//! atomic-rename on save, so a crash mid-write can corrupt the file, and
//! writers in *other processes* race last-writer-wins. Mutations within
//! one process are serialized by holding the cache write lock across the
//! read-modify-write in [`ApplicationStore::update_comment`].

pub mod queries;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use planning_map_planning_models::{
    ApplicationDocument, CommentStatus, NeighborComment, PlanningApplication, Sentiment,
};
use tokio::sync::RwLock;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the data file failed.
    #[error("Failed to access application data: {0}")]
    Io(#[from] std::io::Error),

    /// The data file is not valid JSON for the expected schema.
    #[error("Failed to parse application data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Source of the current time, injected so tests can control cache expiry
/// deterministically instead of sleeping.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock [`Clock`] used outside of tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Default cache time-to-live (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Outcome of a comment update.
///
/// Misses are expected, recoverable conditions and are modeled as values
/// rather than errors so callers cannot confuse them with I/O failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The comment was updated and the document saved.
    Updated,
    /// No application with the given ID exists.
    ApplicationNotFound,
    /// The application exists but has no comment with the given ID.
    CommentNotFound,
}

impl UpdateOutcome {
    /// Returns `true` if the update was applied.
    #[must_use]
    pub const fn is_updated(self) -> bool {
        matches!(self, Self::Updated)
    }
}

/// A whitelisted partial update to a single comment.
///
/// Only these four fields may be changed through the public update
/// endpoint; anything else is unrepresentable by construction.
#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    /// Replacement comment body. Triggers the audit-trail rule when it
    /// differs from the current content.
    pub content: Option<String>,
    /// Replacement sentiment classification.
    pub sentiment: Option<Sentiment>,
    /// Replacement publication status.
    pub status: Option<CommentStatus>,
    /// Replacement officer notes.
    pub officer_notes: Option<String>,
}

impl CommentUpdate {
    /// Returns `true` if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.sentiment.is_none()
            && self.status.is_none()
            && self.officer_notes.is_none()
    }
}

struct CacheSlot {
    applications: Vec<PlanningApplication>,
    loaded_at: DateTime<Utc>,
}

/// File-backed store for the planning application document.
///
/// Constructed once per process and shared behind an `Arc`; the cache slot
/// lives for the process lifetime.
pub struct ApplicationStore {
    path: PathBuf,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
    cache: RwLock<Option<CacheSlot>>,
}

impl ApplicationStore {
    /// Creates a store over the given data file with the default TTL and
    /// the system clock.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, DEFAULT_CACHE_TTL, Arc::new(SystemClock))
    }

    /// Creates a store with an explicit TTL and clock.
    #[must_use]
    pub fn with_clock(path: impl Into<PathBuf>, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
            clock,
            cache: RwLock::new(None),
        }
    }

    /// Loads all applications, serving from the cache when it is still
    /// within the TTL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file is missing, unreadable, or not
    /// valid JSON. The error is logged here and propagated, never
    /// swallowed.
    pub async fn load(&self) -> Result<Vec<PlanningApplication>, StoreError> {
        {
            let cache = self.cache.read().await;
            if let Some(slot) = cache.as_ref()
                && self.is_fresh(slot)
            {
                return Ok(slot.applications.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refilled the slot while we waited.
        if let Some(slot) = cache.as_ref()
            && self.is_fresh(slot)
        {
            return Ok(slot.applications.clone());
        }

        let applications = self.read_file().await?;
        *cache = Some(CacheSlot {
            applications: applications.clone(),
            loaded_at: self.clock.now(),
        });
        Ok(applications)
    }

    /// Loads the application with the given ID, if any.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the underlying load fails.
    pub async fn load_by_id(&self, id: &str) -> Result<Option<PlanningApplication>, StoreError> {
        Ok(self.load().await?.into_iter().find(|app| app.id == id))
    }

    /// Serializes the full document back to the data file (pretty-printed)
    /// and refreshes the cache with the just-written value.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if serialization or the file write fails.
    pub async fn save(&self, applications: &[PlanningApplication]) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        self.write_locked(&mut cache, applications.to_vec()).await
    }

    /// Forces the next [`load`](Self::load) to hit the disk.
    pub async fn clear_cache(&self) {
        *self.cache.write().await = None;
    }

    /// Applies a partial update to one comment, enforcing the audit-trail
    /// invariant, and saves the full document.
    ///
    /// Stamps `updated_at` on both the comment and its owning application.
    /// Misses return an [`UpdateOutcome`] without touching the file.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if loading or saving the document fails.
    pub async fn update_comment(
        &self,
        application_id: &str,
        comment_id: &str,
        update: CommentUpdate,
    ) -> Result<UpdateOutcome, StoreError> {
        // Hold the write lock across the whole read-modify-write so
        // concurrent updates in this process cannot interleave.
        let mut cache = self.cache.write().await;
        let mut applications = match cache.as_ref() {
            Some(slot) if self.is_fresh(slot) => slot.applications.clone(),
            _ => self.read_file().await?,
        };

        let Some(application) = applications.iter_mut().find(|app| app.id == application_id)
        else {
            log::warn!("Application not found: {application_id}");
            return Ok(UpdateOutcome::ApplicationNotFound);
        };

        let Some(comment) = application
            .comments
            .iter_mut()
            .find(|comment| comment.id == comment_id)
        else {
            log::warn!("Comment not found: {comment_id} (application {application_id})");
            return Ok(UpdateOutcome::CommentNotFound);
        };

        let now = self.clock.now();
        apply_update(comment, update, now);
        application.updated_at = Some(now);

        self.write_locked(&mut cache, applications).await?;
        Ok(UpdateOutcome::Updated)
    }

    fn is_fresh(&self, slot: &CacheSlot) -> bool {
        self.clock.now().signed_duration_since(slot.loaded_at) < self.ttl
    }

    async fn read_file(&self) -> Result<Vec<PlanningApplication>, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            log::error!(
                "Failed to read application data from {}: {e}",
                self.path.display()
            );
            e
        })?;
        let document: ApplicationDocument = serde_json::from_str(&raw).map_err(|e| {
            log::error!(
                "Failed to parse application data from {}: {e}",
                self.path.display()
            );
            e
        })?;
        Ok(document.into_vec())
    }

    async fn write_locked(
        &self,
        cache: &mut Option<CacheSlot>,
        applications: Vec<PlanningApplication>,
    ) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(&applications)?;
        tokio::fs::write(&self.path, serialized).await.map_err(|e| {
            log::error!(
                "Failed to write application data to {}: {e}",
                self.path.display()
            );
            e
        })?;
        *cache = Some(CacheSlot {
            applications,
            loaded_at: self.clock.now(),
        });
        Ok(())
    }
}

/// Applies a whitelisted update to a comment in place.
///
/// Audit rule: the first content change snapshots the pre-edit content
/// into `original_content`; later content changes leave the snapshot
/// untouched. Non-content updates never touch the audit fields.
fn apply_update(comment: &mut NeighborComment, update: CommentUpdate, now: DateTime<Utc>) {
    if let Some(content) = update.content {
        if content != comment.content {
            if !comment.is_edited {
                comment.original_content = Some(comment.content.clone());
            }
            comment.is_edited = true;
        }
        comment.content = content;
    }
    if let Some(sentiment) = update.sentiment {
        comment.sentiment = sentiment;
    }
    if let Some(status) = update.status {
        comment.status = status;
    }
    if let Some(notes) = update.officer_notes {
        comment.officer_notes = Some(notes);
    }
    comment.updated_at = Some(now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone as _;
    use planning_map_planning_models::{ApplicationStatus, Coordinate};
    use std::sync::Mutex;

    /// Test clock that only moves when told to.
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                now: Mutex::new(Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap()),
            })
        }

        fn advance(&self, duration: Duration) {
            let mut now = self.now.lock().unwrap();
            *now += chrono::Duration::from_std(duration).unwrap();
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    fn sample_comment(id: &str, sentiment: Sentiment, content: &str) -> NeighborComment {
        NeighborComment {
            id: id.to_string(),
            application_id: "APP-2024-0001".to_string(),
            neighbor_address: "13 Oxford Road, Manchester M1 5QA".to_string(),
            coordinates: Coordinate::new(53.4720, -2.2372),
            content: content.to_string(),
            sentiment,
            submission_date: Utc.with_ymd_and_hms(2024, 1, 20, 14, 30, 0).unwrap(),
            status: CommentStatus::PendingReview,
            is_redacted: false,
            officer_notes: None,
            is_edited: false,
            original_content: None,
            tags: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_applications() -> Vec<PlanningApplication> {
        vec![PlanningApplication {
            id: "APP-2024-0001".to_string(),
            reference: "24/00001/FUL".to_string(),
            address: "15 Oxford Road, Manchester M1 5QA".to_string(),
            description: "Two-storey rear extension".to_string(),
            applicant_name: "J. Smith".to_string(),
            submission_date: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
            coordinates: Coordinate::new(53.4722, -2.2374),
            boundary: None,
            status: ApplicationStatus::Consultation,
            comments: vec![
                sample_comment("c1", Sentiment::Positive, "I support this extension."),
                sample_comment("c2", Sentiment::Negative, "Loss of light concerns."),
            ],
            updated_at: None,
        }]
    }

    fn temp_store(name: &str) -> (ApplicationStore, Arc<ManualClock>, PathBuf) {
        let path = std::env::temp_dir().join(format!("planning_map_store_{name}.json"));
        let _ = std::fs::remove_file(&path);
        let clock = ManualClock::new();
        let store = ApplicationStore::with_clock(&path, DEFAULT_CACHE_TTL, clock.clone());
        (store, clock, path)
    }

    fn write_fixture(path: &std::path::Path, applications: &[PlanningApplication]) {
        std::fs::write(path, serde_json::to_string_pretty(applications).unwrap()).unwrap();
    }

    #[tokio::test]
    async fn load_serves_from_cache_within_ttl() {
        let (store, clock, path) = temp_store("cache_hit");
        write_fixture(&path, &sample_applications());

        let first = store.load().await.unwrap();
        assert_eq!(first.len(), 1);

        // Change the file behind the store's back; a cache hit must not
        // see it.
        let mut changed = sample_applications();
        changed[0].description = "Changed on disk".to_string();
        write_fixture(&path, &changed);

        let second = store.load().await.unwrap();
        assert_eq!(first, second);

        // Past the TTL the store must re-read the file.
        clock.advance(DEFAULT_CACHE_TTL + Duration::from_secs(1));
        let third = store.load().await.unwrap();
        assert_eq!(third[0].description, "Changed on disk");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn clear_cache_forces_disk_read() {
        let (store, _clock, path) = temp_store("clear_cache");
        write_fixture(&path, &sample_applications());
        store.load().await.unwrap();

        let mut changed = sample_applications();
        changed[0].description = "Changed on disk".to_string();
        write_fixture(&path, &changed);

        store.clear_cache().await;
        let reloaded = store.load().await.unwrap();
        assert_eq!(reloaded[0].description, "Changed on disk");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (store, _clock, path) = temp_store("round_trip");
        let applications = sample_applications();

        store.save(&applications).await.unwrap();
        store.clear_cache().await;
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded, applications);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn load_missing_file_errors() {
        let (store, _clock, _path) = temp_store("missing_file");
        assert!(matches!(store.load().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn single_object_fixture_loads_as_one_application() {
        let (store, _clock, path) = temp_store("single_object");
        let single = serde_json::to_string_pretty(&sample_applications()[0]).unwrap();
        std::fs::write(&path, single).unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "APP-2024-0001");

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn first_edit_snapshots_original_content_once() {
        let (store, _clock, path) = temp_store("audit_trail");
        write_fixture(&path, &sample_applications());

        let outcome = store
            .update_comment(
                "APP-2024-0001",
                "c1",
                CommentUpdate {
                    content: Some("Revised wording".to_string()),
                    ..CommentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(outcome.is_updated());

        let app = store.load_by_id("APP-2024-0001").await.unwrap().unwrap();
        let comment = app.comments.iter().find(|c| c.id == "c1").unwrap();
        assert!(comment.is_edited);
        assert_eq!(comment.content, "Revised wording");
        assert_eq!(
            comment.original_content.as_deref(),
            Some("I support this extension.")
        );

        // A second edit must not move the snapshot.
        store
            .update_comment(
                "APP-2024-0001",
                "c1",
                CommentUpdate {
                    content: Some("Revised again".to_string()),
                    ..CommentUpdate::default()
                },
            )
            .await
            .unwrap();

        let app = store.load_by_id("APP-2024-0001").await.unwrap().unwrap();
        let comment = app.comments.iter().find(|c| c.id == "c1").unwrap();
        assert_eq!(comment.content, "Revised again");
        assert_eq!(
            comment.original_content.as_deref(),
            Some("I support this extension.")
        );

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn officer_notes_updates_never_touch_audit_fields() {
        let (store, _clock, path) = temp_store("notes_only");
        write_fixture(&path, &sample_applications());

        for notes in ["First pass review", "Second pass review"] {
            let outcome = store
                .update_comment(
                    "APP-2024-0001",
                    "c2",
                    CommentUpdate {
                        officer_notes: Some(notes.to_string()),
                        ..CommentUpdate::default()
                    },
                )
                .await
                .unwrap();
            assert!(outcome.is_updated());
        }

        let app = store.load_by_id("APP-2024-0001").await.unwrap().unwrap();
        let comment = app.comments.iter().find(|c| c.id == "c2").unwrap();
        assert_eq!(comment.officer_notes.as_deref(), Some("Second pass review"));
        assert!(!comment.is_edited);
        assert!(comment.original_content.is_none());

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn update_stamps_comment_and_application_timestamps() {
        let (store, clock, path) = temp_store("timestamps");
        write_fixture(&path, &sample_applications());
        let stamped_at = clock.now();

        store
            .update_comment(
                "APP-2024-0001",
                "c1",
                CommentUpdate {
                    sentiment: Some(Sentiment::Neutral),
                    ..CommentUpdate::default()
                },
            )
            .await
            .unwrap();

        let app = store.load_by_id("APP-2024-0001").await.unwrap().unwrap();
        assert_eq!(app.updated_at, Some(stamped_at));
        let comment = app.comments.iter().find(|c| c.id == "c1").unwrap();
        assert_eq!(comment.updated_at, Some(stamped_at));
        assert_eq!(comment.sentiment, Sentiment::Neutral);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn not_found_updates_do_not_write() {
        let (store, _clock, path) = temp_store("not_found");
        write_fixture(&path, &sample_applications());
        let before = std::fs::read(&path).unwrap();

        let outcome = store
            .update_comment(
                "APP-9999-0000",
                "c1",
                CommentUpdate {
                    officer_notes: Some("x".to_string()),
                    ..CommentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::ApplicationNotFound);

        let outcome = store
            .update_comment(
                "APP-2024-0001",
                "missing-comment",
                CommentUpdate {
                    officer_notes: Some("x".to_string()),
                    ..CommentUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, UpdateOutcome::CommentNotFound);

        let after = std::fs::read(&path).unwrap();
        assert_eq!(before, after);

        let _ = std::fs::remove_file(&path);
    }
}
