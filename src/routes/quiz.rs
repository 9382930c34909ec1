use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::quiz_dto::{
    GenerateQuizRequest, QuizView, RecordAnswerRequest, RecordAnswerResponse, RevealResponse,
};
use crate::error::{Error, Result};
use crate::models::question::QuizVariant;
use crate::services::grading_service::ScoreReport;
use crate::services::prompt_service::build_prompt;
use crate::services::response_parser::parse_quiz;
use crate::AppState;

/// Generates a fresh quiz from the session's document. The session lock is
/// released for the provider call, so a failure leaves the previous quiz of
/// this variant and its answers in place.
#[axum::debug_handler]
pub async fn generate_quiz(
    State(state): State<AppState>,
    Path((id, variant)): Path<(Uuid, QuizVariant)>,
    Json(req): Json<GenerateQuizRequest>,
) -> Result<Json<QuizView>> {
    req.validate()?;
    let count = req.count();
    let handle = state.sessions.get(id)?;

    let text = {
        let session = handle.lock().await;
        let document = session.document().ok_or_else(|| {
            Error::BadRequest("Upload a document before generating a quiz".into())
        })?;
        document.text.clone()
    };

    let prompt = build_prompt(&text, count, variant);
    let raw = state.ai_service.generate(&prompt).await?;
    let quiz = parse_quiz(&raw, variant)?;

    if quiz.len() != count {
        tracing::warn!(
            session_id = %id,
            %variant,
            requested = count,
            returned = quiz.len(),
            "provider returned a different number of questions"
        );
    }
    tracing::info!(session_id = %id, %variant, questions = quiz.len(), "quiz generated");

    let mut session = handle.lock().await;
    let run = session.start(quiz);
    Ok(Json(QuizView::from(run)))
}

#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path((id, variant)): Path<(Uuid, QuizVariant)>,
) -> Result<Json<QuizView>> {
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let view = QuizView::from(session.run(variant)?);
    Ok(Json(view))
}

#[axum::debug_handler]
pub async fn record_answer(
    State(state): State<AppState>,
    Path((id, variant, index)): Path<(Uuid, QuizVariant, usize)>,
    Json(req): Json<RecordAnswerRequest>,
) -> Result<Json<RecordAnswerResponse>> {
    req.validate()?;
    let handle = state.sessions.get(id)?;
    handle
        .lock()
        .await
        .record_answer(variant, index, req.selected.clone())?;

    Ok(Json(RecordAnswerResponse {
        saved: true,
        index,
        selected: req.selected,
    }))
}

#[axum::debug_handler]
pub async fn reveal_answer(
    State(state): State<AppState>,
    Path((id, variant, index)): Path<(Uuid, QuizVariant, usize)>,
) -> Result<Json<RevealResponse>> {
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let revealed = session.reveal(variant, index)?;
    Ok(Json(RevealResponse::from(revealed)))
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Path((id, variant)): Path<(Uuid, QuizVariant)>,
) -> Result<Json<ScoreReport>> {
    let handle = state.sessions.get(id)?;
    let report = handle.lock().await.score(variant)?;
    tracing::info!(
        session_id = %id,
        %variant,
        correct = report.correct,
        total = report.total,
        "quiz submitted"
    );
    Ok(Json(report))
}
