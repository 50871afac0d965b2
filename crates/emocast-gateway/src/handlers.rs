// SPDX-FileCopyrightText: 2026 Emocast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Handlers are thin: extract the body and caller id, call the pipeline
//! facade, and map any [`CallerError`] to a status code.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use emocast_core::{CallerError, EmocastError, FailureKind};
use emocast_pipeline::endpoints;
use serde::Deserialize;

use crate::server::GatewayState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Body for POST /compute/emotion.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

/// Body for the list-of-messages endpoints.
#[derive(Debug, Deserialize)]
pub struct MessagesRequest {
    pub messages: Vec<String>,
}

/// Body for POST /compute/keyphrase.
#[derive(Debug, Deserialize)]
pub struct KeyphraseRequest {
    pub messages: Vec<String>,
    pub emotion: String,
}

/// Body for POST /compute/campaign.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRequest {
    pub keyphrase_id: String,
    pub brand_id: String,
    #[serde(alias = "emotionalId")]
    pub emotions_id: String,
}

/// A [`CallerError`] rendered as `{message, endpoint}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub CallerError);

impl From<CallerError> for ApiError {
    fn from(err: CallerError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0.kind {
            FailureKind::BadRequest => StatusCode::BAD_REQUEST,
            FailureKind::NotFound => StatusCode::NOT_FOUND,
            FailureKind::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self.0)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

fn user_id(state: &GatewayState, headers: &HeaderMap) -> String {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| state.default_user.clone(), str::to_string)
}

fn body<T>(payload: Result<Json<T>, JsonRejection>, endpoint: &str) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError(EmocastError::validation("body", rejection.body_text()).at(endpoint)))
}

/// POST /compute/clean
pub async fn post_clean(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<MessagesRequest>, JsonRejection>,
) -> ApiResult<emocast_pipeline::CleanBatchView> {
    let req = body(payload, endpoints::COMPUTE_CLEAN)?;
    let view = state
        .pipeline
        .compute_clean(req.messages, &user_id(&state, &headers))
        .await?;
    Ok(Json(view))
}

/// GET /clean/batch/{id}
pub async fn get_clean_batch(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<emocast_pipeline::CleanBatchView> {
    Ok(Json(state.pipeline.get_clean_batch_by_id(&id).await?))
}

/// POST /compute/emotion
pub async fn post_emotion(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<MessageRequest>, JsonRejection>,
) -> ApiResult<emocast_pipeline::EmotionView> {
    let req = body(payload, endpoints::COMPUTE_EMOTION)?;
    let view = state
        .pipeline
        .compute_emotion(&req.message, &user_id(&state, &headers))
        .await?;
    Ok(Json(view))
}

/// POST /compute/emotion/batch
pub async fn post_emotion_batch(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<MessagesRequest>, JsonRejection>,
) -> ApiResult<emocast_pipeline::EmotionBatchView> {
    let req = body(payload, endpoints::COMPUTE_EMOTION_BATCH)?;
    let view = state
        .pipeline
        .compute_emotion_batch(req.messages, &user_id(&state, &headers))
        .await?;
    Ok(Json(view))
}

/// POST /compute/emotion/unique
pub async fn post_emotion_unique(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<MessagesRequest>, JsonRejection>,
) -> ApiResult<emocast_pipeline::EmotionSetView> {
    let req = body(payload, endpoints::COMPUTE_EMOTION_UNIQUE)?;
    let view = state
        .pipeline
        .compute_emotion_unique(req.messages, &user_id(&state, &headers))
        .await?;
    Ok(Json(view))
}

/// GET /emotion/{id}
pub async fn get_emotion(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<emocast_pipeline::EmotionView> {
    Ok(Json(state.pipeline.get_emotion_by_id(&id).await?))
}

/// GET /emotion/batch/{id}
pub async fn get_emotion_batch(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<emocast_pipeline::EmotionBatchView> {
    Ok(Json(state.pipeline.get_emotion_batch_by_id(&id).await?))
}

/// POST /compute/keyphrase
pub async fn post_keyphrase(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<KeyphraseRequest>, JsonRejection>,
) -> ApiResult<emocast_pipeline::KeyphraseView> {
    let req = body(payload, endpoints::COMPUTE_KEYPHRASE)?;
    let view = state
        .pipeline
        .compute_keyphrase(req.messages, &req.emotion, &user_id(&state, &headers))
        .await?;
    Ok(Json(view))
}

/// GET /keyphrase/{id}
pub async fn get_keyphrase(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<emocast_pipeline::KeyphraseView> {
    Ok(Json(state.pipeline.get_keyphrase_by_id(&id).await?))
}

/// POST /compute/campaign
pub async fn post_campaign(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    payload: Result<Json<CampaignRequest>, JsonRejection>,
) -> ApiResult<emocast_pipeline::CampaignView> {
    let req = body(payload, endpoints::COMPUTE_CAMPAIGN)?;
    let view = state
        .pipeline
        .compute_campaign(
            &req.keyphrase_id,
            &req.brand_id,
            &req.emotions_id,
            &user_id(&state, &headers),
        )
        .await?;
    Ok(Json(view))
}

/// GET /campaign/{id}
pub async fn get_campaign(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ApiResult<emocast_pipeline::CampaignView> {
    Ok(Json(state.pipeline.get_campaign_by_id(&id).await?))
}

/// GET /health
///
/// 200 when both adapters are up, 503 otherwise.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let report = state.pipeline.health().await;
    let status = if report.status == "ok" {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn campaign_request_accepts_both_emotion_field_names() {
        let a: CampaignRequest =
            serde_json::from_str(r#"{"keyphraseId":"k","brandId":"b","emotionsId":"e"}"#).unwrap();
        let b: CampaignRequest =
            serde_json::from_str(r#"{"keyphraseId":"k","brandId":"b","emotionalId":"e"}"#).unwrap();
        assert_eq!(a.emotions_id, "e");
        assert_eq!(b.emotions_id, "e");
    }

    #[test]
    fn error_kinds_map_to_statuses() {
        let cases = [
            (EmocastError::validation("message", "blank"), StatusCode::BAD_REQUEST),
            (EmocastError::dependency("brand", "b"), StatusCode::NOT_FOUND),
            (EmocastError::compute("empty"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            let response = ApiError(err.at("/compute/emotion")).into_response();
            assert_eq!(response.status(), expected);
        }
    }
}
