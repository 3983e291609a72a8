//! Session domain entities

use crate::image::ImagePayload;
use crate::session::id::SessionId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One question/answer exchange in a session's history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub question: String,
    pub answer: String,
}

impl Turn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Server-side conversation state for one uploaded image (Entity)
///
/// The image and caption are fixed at creation. History is append-only
/// and ordered: turns are replayed into the model exactly as they were
/// recorded. `last_accessed` drives time-based eviction and is bumped
/// on every read or append.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    image: ImagePayload,
    caption: String,
    history: Vec<Turn>,
    created_at: DateTime<Utc>,
    last_accessed: DateTime<Utc>,
}

impl Session {
    pub fn new(
        id: SessionId,
        image: ImagePayload,
        caption: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            image,
            caption: caption.into(),
            history: Vec::new(),
            created_at: now,
            last_accessed: now,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn image(&self) -> &ImagePayload {
        &self.image
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    /// Prior turns in insertion order
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_accessed(&self) -> DateTime<Utc> {
        self.last_accessed
    }

    /// Mark the session as accessed without mutating history
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_accessed = now;
    }

    /// Append a completed turn and mark the session as accessed
    pub fn record_turn(&mut self, turn: Turn, now: DateTime<Utc>) {
        self.history.push(turn);
        self.last_accessed = now;
    }

    /// How long the session has been idle
    pub fn idle_for(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_accessed
    }

    /// Whether the session has been idle longer than `threshold`
    pub fn expired(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        self.idle_for(now) > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image() -> ImagePayload {
        ImagePayload::new(vec![1, 2, 3], "image/png", 8, 8)
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_new_session_has_empty_history() {
        let session = Session::new(SessionId::generate(), test_image(), "a red square", at(0));
        assert!(session.history().is_empty());
        assert_eq!(session.caption(), "a red square");
        assert_eq!(session.created_at(), session.last_accessed());
    }

    #[test]
    fn test_record_turn_preserves_order_and_bumps_access() {
        let mut session = Session::new(SessionId::generate(), test_image(), "caption", at(0));
        session.record_turn(Turn::new("q1", "a1"), at(10));
        session.record_turn(Turn::new("q2", "a2"), at(20));
        session.record_turn(Turn::new("q3", "a3"), at(30));

        let questions: Vec<&str> = session
            .history()
            .iter()
            .map(|t| t.question.as_str())
            .collect();
        assert_eq!(questions, vec!["q1", "q2", "q3"]);
        assert_eq!(session.last_accessed(), at(30));
    }

    #[test]
    fn test_touch_bumps_access_without_history() {
        let mut session = Session::new(SessionId::generate(), test_image(), "caption", at(0));
        session.touch(at(100));
        assert!(session.history().is_empty());
        assert_eq!(session.last_accessed(), at(100));
    }

    #[test]
    fn test_expiry_threshold() {
        let mut session = Session::new(SessionId::generate(), test_image(), "caption", at(0));
        let threshold = Duration::seconds(3600);

        assert!(!session.expired(at(3600), threshold));
        assert!(session.expired(at(3601), threshold));

        // A touch resets the idle clock
        session.touch(at(3000));
        assert!(!session.expired(at(3601), threshold));
    }
}
