use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthUser,
    error::{AppError, Result},
    models::{QuestionStatus, VoteForm, VoteOutcome},
    services::{poll_service, vote_service},
};

// The listing shows at most the 5 most recently published questions.
const INDEX_LIMIT: i64 = 5;

// Gating misses redirect to the listing with an error marker instead of
// answering 404.
fn redirect_to_index() -> Response {
    Redirect::to("/polls/?error=poll-not-found").into_response()
}

fn results_path(question_id: Uuid) -> String {
    format!("/polls/{question_id}/results/")
}

pub async fn index(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    let questions = poll_service::latest_questions(&state.db, Utc::now(), INDEX_LIMIT).await?;

    Ok(Json(json!({ "questions": questions })))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
) -> Result<Response> {
    let Some(question) = poll_service::get_question(&state.db, question_id).await? else {
        return Ok(redirect_to_index());
    };

    match question.status(Utc::now()) {
        QuestionStatus::Unpublished => Ok(redirect_to_index()),
        QuestionStatus::Closed => {
            Ok(Redirect::to(&results_path(question.id)).into_response())
        }
        QuestionStatus::Open => {
            let choices = poll_service::get_choices(&state.db, question.id).await?;

            Ok(Json(json!({
                "question": question,
                "choices": choices
            }))
            .into_response())
        }
    }
}

pub async fn results(
    State(state): State<AppState>,
    Path(question_id): Path<Uuid>,
) -> Result<Response> {
    let Some(question) = poll_service::get_question(&state.db, question_id).await? else {
        return Ok(redirect_to_index());
    };

    // Results are gated by publication only; closed polls still render
    if !question.is_published(Utc::now()) {
        return Ok(redirect_to_index());
    }

    let results = poll_service::get_results(&state.db, question.id).await?;

    Ok(Json(json!({
        "question": question,
        "results": results
    }))
    .into_response())
}

pub async fn vote(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(question_id): Path<Uuid>,
    Json(payload): Json<VoteForm>,
) -> Result<Response> {
    let Some(question) = poll_service::get_question(&state.db, question_id).await? else {
        return Ok(redirect_to_index());
    };

    match question.status(Utc::now()) {
        QuestionStatus::Unpublished => return Ok(redirect_to_index()),
        QuestionStatus::Closed => {
            return Ok(Redirect::to(&format!(
                "/polls/{}/results/?error=voting-closed",
                question.id
            ))
            .into_response());
        }
        QuestionStatus::Open => {}
    }

    let Some(choice_id) = payload.choice else {
        return Err(AppError::Validation(
            "You didn't select a choice.".to_string(),
        ));
    };

    let outcome =
        vote_service::cast_vote(&state.db, auth_user.user_id, question.id, choice_id).await?;

    match outcome {
        VoteOutcome::Recorded => {
            tracing::info!(
                username = %auth_user.username,
                question_id = %question.id,
                choice_id = %choice_id,
                "vote recorded"
            );
        }
        VoteOutcome::Changed { previous } => {
            tracing::info!(
                username = %auth_user.username,
                question_id = %question.id,
                previous_choice_id = %previous,
                choice_id = %choice_id,
                "vote changed"
            );
        }
    }

    Ok(Redirect::to(&results_path(question.id)).into_response())
}
