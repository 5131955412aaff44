use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    pub id: Uuid,
    pub user_id: Uuid,
    // question_id is denormalized from the choice so the at-most-one-vote
    // invariant can live in a UNIQUE (user_id, question_id) constraint.
    pub question_id: Uuid,
    pub choice_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Vote request; a missing "choice" key is the "no selection" case.
#[derive(Debug, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub choice: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    /// First vote by this user on this question.
    Recorded,
    /// An existing vote was moved to the new selection.
    Changed { previous: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_form_without_choice_key() {
        let form: VoteForm = serde_json::from_str("{}").unwrap();
        assert!(form.choice.is_none());
    }

    #[test]
    fn vote_form_with_null_choice() {
        let form: VoteForm = serde_json::from_str(r#"{"choice": null}"#).unwrap();
        assert!(form.choice.is_none());
    }

    #[test]
    fn vote_form_with_choice() {
        let id = Uuid::new_v4();
        let form: VoteForm =
            serde_json::from_str(&format!(r#"{{"choice": "{id}"}}"#)).unwrap();
        assert_eq!(form.choice, Some(id));
    }
}
