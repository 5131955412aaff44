use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{Choice, Vote, VoteOutcome},
};

/// Record or change a user's vote on a question.
///
/// The selected choice must belong to the question; anything else is a
/// validation error and nothing is written. The lookup and write run in one
/// transaction with the existing row locked, and the votes table carries a
/// UNIQUE (user_id, question_id) constraint, so concurrent submissions from
/// the same user cannot produce two rows for one question.
pub async fn cast_vote(
    db: &PgPool,
    user_id: Uuid,
    question_id: Uuid,
    choice_id: Uuid,
) -> Result<VoteOutcome> {
    // The choice must be one of this question's choices
    let choice = sqlx::query_as::<_, Choice>(
        "SELECT id, question_id, choice_text, created_at FROM choices WHERE id = $1 AND question_id = $2",
    )
    .bind(choice_id)
    .bind(question_id)
    .fetch_optional(db)
    .await?;

    if choice.is_none() {
        return Err(AppError::Validation("You didn't select a choice.".to_string()));
    }

    let mut tx = db.begin().await?;

    let existing = sqlx::query_as::<_, Vote>(
        r#"
        SELECT id, user_id, question_id, choice_id, created_at, updated_at
        FROM votes
        WHERE user_id = $1 AND question_id = $2
        FOR UPDATE
        "#,
    )
    .bind(user_id)
    .bind(question_id)
    .fetch_optional(&mut *tx)
    .await?;

    let outcome = match existing {
        Some(vote) => {
            // Vote change: move the existing row to the new selection
            sqlx::query("UPDATE votes SET choice_id = $1, updated_at = $2 WHERE id = $3")
                .bind(choice_id)
                .bind(chrono::Utc::now())
                .bind(vote.id)
                .execute(&mut *tx)
                .await?;

            VoteOutcome::Changed {
                previous: vote.choice_id,
            }
        }
        None => {
            let now = chrono::Utc::now();
            sqlx::query(
                r#"
                INSERT INTO votes (id, user_id, question_id, choice_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(question_id)
            .bind(choice_id)
            .bind(now)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            VoteOutcome::Recorded
        }
    };

    tx.commit().await?;

    Ok(outcome)
}
