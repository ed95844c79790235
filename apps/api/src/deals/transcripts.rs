use axum::{
    extract::{multipart::Field, Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::deals::{authorize_deal, UserIdQuery};
use crate::errors::AppError;
use crate::models::deal::TranscriptRow;
use crate::state::AppState;
use crate::store::NewTranscript;

#[derive(Serialize)]
pub struct TranscriptResponse {
    pub success: bool,
    pub transcript: TranscriptRow,
}

/// Multipart fields of a transcript upload, before validation.
#[derive(Default)]
struct UploadForm {
    user_id: Option<String>,
    file_name: Option<String>,
    content_type: Option<String>,
    file: Option<Bytes>,
    call_date: Option<String>,
    call_time: Option<String>,
}

/// Plain text and WebVTT captions are accepted.
pub fn is_transcript_file(file_name: &str, content_type: Option<&str>) -> bool {
    let lower = file_name.to_ascii_lowercase();
    lower.ends_with(".txt")
        || lower.ends_with(".vtt")
        || content_type.is_some_and(|mime| mime.contains("text"))
}

pub fn parse_call_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Call date must be in YYYY-MM-DD format.".to_string()))
}

/// Normalizes to zero-padded `HH:MM`.
pub fn parse_call_time(raw: &str) -> Result<String, AppError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|_| AppError::Validation("Call time must be in HH:MM format.".to_string()))
}

pub const MAX_FILE_NAME_LEN: usize = 255;

pub fn check_file_name(file_name: &str) -> Result<(), AppError> {
    if file_name.chars().count() > MAX_FILE_NAME_LEN {
        return Err(AppError::Validation(format!(
            "File name cannot exceed {MAX_FILE_NAME_LEN} characters."
        )));
    }
    Ok(())
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing required field '{field}'.")))
}

async fn field_text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart field: {e}")))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.file_name = field.file_name().map(String::from);
                form.content_type = field.content_type().map(String::from);
                form.file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?,
                );
            }
            "user_id" => form.user_id = Some(field_text(field).await?),
            "call_date" => form.call_date = Some(field_text(field).await?),
            "call_time" => form.call_time = Some(field_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

/// POST /api/v1/deals/:deal_id/transcripts
pub async fn handle_upload_transcript(
    State(state): State<AppState>,
    Path(deal_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<TranscriptResponse>), AppError> {
    let form = read_upload_form(multipart).await?;

    let user_id = Uuid::parse_str(required(form.user_id, "user_id")?.trim())
        .map_err(|_| AppError::Validation("user_id must be a UUID.".to_string()))?;
    let call_date = parse_call_date(&required(form.call_date, "call_date")?)?;
    let call_time = parse_call_time(&required(form.call_time, "call_time")?)?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("Missing required field 'file'.".to_string()))?;
    let file_name = form.file_name.unwrap_or_else(|| "transcript.txt".to_string());

    check_file_name(&file_name)?;
    if !is_transcript_file(&file_name, form.content_type.as_deref()) {
        return Err(AppError::Validation(
            "Please upload a .txt or .vtt file.".to_string(),
        ));
    }
    if file.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty.".to_string()));
    }
    let content = String::from_utf8(file.to_vec())
        .map_err(|_| AppError::Validation("Transcript must be UTF-8 text.".to_string()))?;

    authorize_deal(state.store.as_ref(), deal_id, user_id).await?;

    let transcript = state
        .store
        .create_transcript(NewTranscript {
            deal_id,
            file_name,
            content,
            call_date,
            call_time,
        })
        .await?;

    info!(
        "Uploaded transcript {} ({} bytes) to deal {deal_id}",
        transcript.id,
        transcript.content.len()
    );

    Ok((
        StatusCode::CREATED,
        Json(TranscriptResponse {
            success: true,
            transcript,
        }),
    ))
}

/// DELETE /api/v1/deals/:deal_id/transcripts/:transcript_id
pub async fn handle_delete_transcript(
    State(state): State<AppState>,
    Path((deal_id, transcript_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    authorize_deal(state.store.as_ref(), deal_id, params.user_id).await?;

    let transcript = state
        .store
        .get_transcript(transcript_id)
        .await?
        .filter(|t| t.deal_id == deal_id)
        .ok_or_else(|| AppError::NotFound("Transcript not found for this deal.".to_string()))?;

    state.store.delete_transcript(transcript.id).await?;
    info!("Deleted transcript {transcript_id} from deal {deal_id}");
    Ok(StatusCode::NO_CONTENT)
}
