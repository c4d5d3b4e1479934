//! Curriculum Graph
//!
//! modules → content items, and trails as ordered lists of modules.

use chrono::{DateTime, Utc};
use kernel::id::{AccountId, ContentId, ModuleId, TrailId, TrailProgressId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub description: String,
    /// Creating manager
    pub manager_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Module {
    pub fn new(name: String, description: String, manager_id: AccountId) -> Self {
        let now = Utc::now();
        Self {
            id: ModuleId::new(),
            name,
            description,
            manager_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A single lesson inside a module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: ContentId,
    pub module_id: ModuleId,
    /// Free-form kind ("video", "artigo", ...)
    pub kind: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub document_url: Option<String>,
    /// Position inside the module
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// "Content viewed" fact; at most one per (account, content)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentView {
    pub account_id: AccountId,
    pub content_id: ContentId,
    pub viewed_at: DateTime<Utc>,
}

impl ContentView {
    pub fn now(account_id: AccountId, content_id: ContentId) -> Self {
        Self {
            account_id,
            content_id,
            viewed_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trail {
    pub id: TrailId,
    pub name: String,
    pub description: String,
    pub manager_id: AccountId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trail {
    pub fn new(name: String, description: String, manager_id: AccountId) -> Self {
        let now = Utc::now();
        Self {
            id: TrailId::new(),
            name,
            description,
            manager_id,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailItem {
    pub trail_id: TrailId,
    pub module_id: ModuleId,
    pub position: i32,
}

/// Per-(account, trail) progress row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrailProgress {
    pub id: TrailProgressId,
    pub account_id: AccountId,
    pub trail_id: TrailId,
    pub percent: i32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub finished: bool,
}

impl TrailProgress {
    pub fn start(account_id: AccountId, trail_id: TrailId) -> Self {
        Self {
            id: TrailProgressId::new(),
            account_id,
            trail_id,
            percent: 0,
            started_at: Utc::now(),
            finished_at: None,
            finished: false,
        }
    }

    /// Apply a freshly computed percentage
    ///
    /// Completion is only reached through content views when the trail has
    /// no trail-level assessment; once finished, a row stays finished.
    pub fn apply(&mut self, percent: i32, trail_has_assessment: bool, now: DateTime<Utc>) {
        self.percent = percent;
        if percent >= 100 && !self.finished && !trail_has_assessment {
            self.finished = true;
            self.finished_at = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_finishes_without_assessment() {
        let mut progress = TrailProgress::start(AccountId::new(), TrailId::new());
        let now = Utc::now();

        progress.apply(50, false, now);
        assert!(!progress.finished);

        progress.apply(100, false, now);
        assert!(progress.finished);
        assert_eq!(progress.finished_at, Some(now));
    }

    #[test]
    fn test_progress_waits_for_assessment() {
        let mut progress = TrailProgress::start(AccountId::new(), TrailId::new());
        progress.apply(100, true, Utc::now());
        assert_eq!(progress.percent, 100);
        assert!(!progress.finished);
        assert!(progress.finished_at.is_none());
    }

    #[test]
    fn test_finished_progress_is_sticky() {
        let mut progress = TrailProgress::start(AccountId::new(), TrailId::new());
        let done_at = Utc::now();
        progress.apply(100, false, done_at);

        // new content added to the trail later
        progress.apply(80, false, Utc::now());
        assert!(progress.finished);
        assert_eq!(progress.finished_at, Some(done_at));
        assert_eq!(progress.percent, 80);
    }
}
