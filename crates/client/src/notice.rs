// Path: crates/client/src/notice.rs
//! Transient user-facing notifications.
//!
//! The services publish; whatever renders toasts subscribes. Publishing never
//! blocks and never fails: with no subscribers, notices are dropped.

use serde::Serialize;
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    /// Persistent until replaced by a notice with the same key.
    Pending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Notices sharing a key replace each other (a pending transaction and
    /// its outcome use the transaction hash).
    pub key: Option<String>,
    /// Optional link, such as a block explorer or wallet download page.
    pub link: Option<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            key: None,
            link: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }
}

/// A cloneable broadcast handle shared by both services.
#[derive(Debug, Clone)]
pub struct NoticeBus {
    tx: broadcast::Sender<Notice>,
}

impl Default for NoticeBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl NoticeBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.tx.subscribe()
    }

    pub fn publish(&self, notice: Notice) {
        tracing::debug!(target: "notice", level = ?notice.level, message = %notice.message);
        // No receivers is not an error.
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.publish(Notice::new(NoticeLevel::Success, message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Notice::new(NoticeLevel::Error, message));
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.publish(Notice::new(NoticeLevel::Warning, message));
    }
}
