use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Choice {
    pub id: Uuid,
    pub question_id: Uuid,
    pub choice_text: String,
    pub created_at: DateTime<Utc>,
}

// Results row: the vote count is derived by counting vote rows,
// never stored on the choice.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChoiceResult {
    pub id: Uuid,
    pub choice_text: String,
    pub votes: i64,
}
