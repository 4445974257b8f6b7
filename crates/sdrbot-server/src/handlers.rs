use crate::error::ApiError;
use crate::server::AppState;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sdrbot_core::{Answer, Conversation, LeadFields, LeadRecord, Role, SdrbotError};
use sdrbot_llm::prompts;
use sdrbot_session::{CreateOutcome, Session};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Summary placeholder used when the capture flow's LLM call fails.
///
/// Carried over from the original form flow, which trapped the failure and
/// embedded this literal instead of failing the whole submission.
pub const SUMMARY_UNAVAILABLE: &str = "Error in generating response.";

#[derive(Deserialize)]
pub(crate) struct StartParams {
    session_id: String,
}

#[derive(Deserialize)]
pub(crate) struct UserAnswer {
    session_id: String,
    question: String,
    answer: String,
}

#[derive(Deserialize)]
pub(crate) struct LeadRequest {
    session_id: String,
    /// Accepted for wire compatibility with the original API, but never used:
    /// the prompt is built from the stored conversation. The original read
    /// this field nowhere either — flagged as a likely upstream defect.
    #[serde(default)]
    conversation_summary: Option<String>,
}

/// `GET /start_conversation?session_id=…` — greet and open a session.
///
/// Idempotent per id: a second call returns a fixed notice instead of
/// re-greeting, and the stored history does not grow.
pub(crate) async fn start_conversation(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StartParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let _guard = state.locks.acquire(&params.session_id).await;

    if state.sessions.get(&params.session_id).await?.is_some() {
        return Ok(Json(
            serde_json::json!({"message": "Conversation already started."}),
        ));
    }

    let greeting = state.llm.complete(&prompts::api_greeting()).await?;

    let mut session = Session::new(&params.session_id);
    session.push_message(Role::Bot, &greeting);
    if state.sessions.create(session).await? == CreateOutcome::AlreadyExists {
        // create can race only if a caller bypasses the per-session lock
        return Ok(Json(
            serde_json::json!({"message": "Conversation already started."}),
        ));
    }

    info!(session_id = %params.session_id, "conversation started");
    Ok(Json(serde_json::json!({ "message": greeting })))
}

/// `POST /ask_question` — record an answer, return the next bot message.
///
/// The answer and the user message are persisted before the LLM call, so a
/// failed call leaves the accumulated history in place (no rollback).
pub(crate) async fn ask_question(
    State(state): State<Arc<AppState>>,
    Json(data): Json<UserAnswer>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let _guard = state.locks.acquire(&data.session_id).await;

    let mut session = state
        .sessions
        .get(&data.session_id)
        .await?
        .ok_or_else(|| SdrbotError::SessionNotFound(data.session_id.clone()))?;

    session.record_answer(Answer {
        question: data.question,
        answer: data.answer.clone(),
    });
    session.push_message(Role::User, &data.answer);
    state.sessions.update(session.clone()).await?;

    let reply = state
        .llm
        .complete(&prompts::next_question(&session.conversation))
        .await?;

    session.push_message(Role::Bot, &reply);
    state.sessions.update(session).await?;

    Ok(Json(serde_json::json!({ "message": reply })))
}

/// `POST /get_summary` — ask the model for a structured lead object.
///
/// The model output is parsed and validated before it reaches the caller; if
/// it is not JSON, a sentinel-only record carrying the raw text as its
/// summary is returned instead of forwarding unverified "JSON".
pub(crate) async fn get_summary(
    State(state): State<Arc<AppState>>,
    Json(data): Json<LeadRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if data
        .conversation_summary
        .as_deref()
        .is_some_and(|s| !s.is_empty())
    {
        warn!(
            session_id = %data.session_id,
            "request carried a conversation_summary; the field is ignored"
        );
    }

    let _guard = state.locks.acquire(&data.session_id).await;

    let mut session = state
        .sessions
        .get(&data.session_id)
        .await?
        .ok_or_else(|| SdrbotError::SessionNotFound(data.session_id.clone()))?;

    let raw = state
        .llm
        .complete(&prompts::lead_json(&session.conversation))
        .await?;

    let lead = match LeadRecord::from_model_json(&raw) {
        Ok(lead) => lead,
        Err(e) => {
            warn!(session_id = %data.session_id, error = %e, "model lead output was not JSON");
            LeadRecord::fallback_from_raw(raw.clone())
        }
    };

    session.set_summary(raw);
    state.sessions.update(session).await?;

    Ok(Json(serde_json::json!({ "lead": lead })))
}

/// `POST /capture_lead` — the form flow: six fields in, lead record out.
///
/// Builds the record locally with sentinel substitution and asks for a short
/// summary. An LLM failure does not fail the request; the summary slot gets a
/// fixed placeholder, matching the original form's behavior. The response
/// carries a `lead.json` attachment header for download.
pub(crate) async fn capture_lead(
    State(state): State<Arc<AppState>>,
    Json(fields): Json<LeadFields>,
) -> Result<Response, ApiError> {
    let mut conversation = Conversation::new();
    for (label, value) in [
        ("Name", &fields.name),
        ("Email", &fields.email),
        ("Company", &fields.company),
        ("Role", &fields.role),
        ("Pain Points", &fields.pain_points),
        ("Interested Product", &fields.interested_product),
    ] {
        conversation.push(Role::User, format!("{label}: {value}"));
    }

    let record = LeadRecord::from_fields(fields);
    let record = match state.llm.complete(&prompts::summary(&conversation)).await {
        Ok(summary) => record.with_summary(summary),
        Err(e) => {
            warn!(error = %e, "summary generation failed, substituting placeholder");
            record.with_summary(SUMMARY_UNAVAILABLE)
        }
    };

    Ok((
        [(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"lead.json\"",
        )],
        Json(record),
    )
        .into_response())
}
