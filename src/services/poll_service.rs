use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Choice, ChoiceResult, Question},
};

/// Most recently published questions, newest first. Questions with a
/// pub_date in the future are never listed.
pub async fn latest_questions(
    db: &PgPool,
    now: DateTime<Utc>,
    limit: i64,
) -> Result<Vec<Question>> {
    let questions = sqlx::query_as::<_, Question>(
        r#"
        SELECT id, question_text, pub_date, end_date
        FROM questions
        WHERE pub_date <= $1
        ORDER BY pub_date DESC
        LIMIT $2
        "#,
    )
    .bind(now)
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(questions)
}

pub async fn get_question(db: &PgPool, question_id: Uuid) -> Result<Option<Question>> {
    let question = sqlx::query_as::<_, Question>(
        "SELECT id, question_text, pub_date, end_date FROM questions WHERE id = $1",
    )
    .bind(question_id)
    .fetch_optional(db)
    .await?;

    Ok(question)
}

pub async fn get_choices(db: &PgPool, question_id: Uuid) -> Result<Vec<Choice>> {
    let choices = sqlx::query_as::<_, Choice>(
        r#"
        SELECT id, question_id, choice_text, created_at
        FROM choices
        WHERE question_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(question_id)
    .fetch_all(db)
    .await?;

    Ok(choices)
}

/// Per-choice results with vote counts derived by counting vote rows.
pub async fn get_results(db: &PgPool, question_id: Uuid) -> Result<Vec<ChoiceResult>> {
    let results = sqlx::query_as::<_, ChoiceResult>(
        r#"
        SELECT c.id, c.choice_text, COUNT(v.id) AS votes
        FROM choices c
        LEFT JOIN votes v ON v.choice_id = c.id
        WHERE c.question_id = $1
        GROUP BY c.id, c.choice_text, c.created_at
        ORDER BY c.created_at
        "#,
    )
    .bind(question_id)
    .fetch_all(db)
    .await?;

    Ok(results)
}
