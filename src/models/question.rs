use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub question_text: String,
    pub pub_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Visibility of a question at a given instant. Recomputed per request;
/// nothing in the system drives transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    /// `pub_date` is still in the future.
    Unpublished,
    /// Published and inside the voting window.
    Open,
    /// Published but the voting window has ended.
    Closed,
}

impl Question {
    /// A question is published once its `pub_date` has passed.
    pub fn is_published(&self, now: DateTime<Utc>) -> bool {
        now >= self.pub_date
    }

    /// Voting is allowed between `pub_date` and `end_date` inclusive.
    /// Questions with no `end_date` stay open indefinitely.
    pub fn can_vote(&self, now: DateTime<Utc>) -> bool {
        self.is_published(now) && self.end_date.is_none_or(|end| now <= end)
    }

    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        now >= self.pub_date && self.pub_date >= now - Duration::days(1)
    }

    pub fn status(&self, now: DateTime<Utc>) -> QuestionStatus {
        if !self.is_published(now) {
            QuestionStatus::Unpublished
        } else if self.can_vote(now) {
            QuestionStatus::Open
        } else {
            QuestionStatus::Closed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(pub_offset_days: i64, end_offset_days: Option<i64>) -> Question {
        let now = Utc::now();
        Question {
            id: Uuid::new_v4(),
            question_text: "Do you hate roaches?".to_string(),
            pub_date: now + Duration::days(pub_offset_days),
            end_date: end_offset_days.map(|d| now + Duration::days(d)),
        }
    }

    #[test]
    fn is_published_matches_pub_date() {
        let now = Utc::now();
        assert!(question(-1, None).is_published(now));
        assert!(!question(1, None).is_published(now));
    }

    #[test]
    fn can_vote_inside_window() {
        let now = Utc::now();
        assert!(question(-5, Some(10)).can_vote(now));
        assert!(!question(2, Some(-10)).can_vote(now));
    }

    #[test]
    fn cannot_vote_before_pub_date() {
        let now = Utc::now();
        assert!(!question(10, Some(12)).can_vote(now));
    }

    #[test]
    fn cannot_vote_after_end_date() {
        let now = Utc::now();
        assert!(!question(-10, Some(-5)).can_vote(now));
    }

    #[test]
    fn can_vote_with_no_end_date() {
        let now = Utc::now();
        assert!(question(-1, None).can_vote(now));
        assert!(!question(1, None).can_vote(now));
    }

    #[test]
    fn can_vote_at_exact_end_date() {
        let now = Utc::now();
        let mut q = question(-1, None);
        q.end_date = Some(now);
        assert!(q.can_vote(now));
    }

    #[test]
    fn was_published_recently_with_future_question() {
        let now = Utc::now();
        assert!(!question(30, None).was_published_recently(now));
    }

    #[test]
    fn was_published_recently_with_old_question() {
        let now = Utc::now();
        assert!(!question(-30, None).was_published_recently(now));
    }

    #[test]
    fn was_published_recently_with_recent_question() {
        let now = Utc::now();
        let q = Question {
            id: Uuid::new_v4(),
            question_text: "How are you feeling?".to_string(),
            pub_date: now,
            end_date: None,
        };
        assert!(q.was_published_recently(now));
    }

    #[test]
    fn status_covers_all_states() {
        let now = Utc::now();
        assert_eq!(question(5, None).status(now), QuestionStatus::Unpublished);
        assert_eq!(question(-5, None).status(now), QuestionStatus::Open);
        assert_eq!(question(-5, Some(10)).status(now), QuestionStatus::Open);
        assert_eq!(question(-10, Some(-2)).status(now), QuestionStatus::Closed);
    }

    #[test]
    fn end_date_before_pub_date_is_never_votable() {
        // Not validated at write time; such a question just never opens.
        let now = Utc::now();
        let q = question(2, Some(-10));
        assert_eq!(q.status(now), QuestionStatus::Unpublished);
        assert_eq!(q.status(now + Duration::days(3)), QuestionStatus::Closed);
    }
}
