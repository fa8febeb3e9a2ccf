use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use shared::{dates, GiftCard, GiftCardKind};
use uuid::Uuid;

use crate::{
    db::{Database, GiftCardRow},
    error::AppError,
    state::AppState,
};

use super::clients::to_dto as client_dto;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftCardPayload {
    pub buyer_id: String,
    pub recipient_id: String,
    pub num_classes: i64,
    #[serde(rename = "type")]
    pub kind: GiftCardKind,
    pub scheduled_date: Option<String>,
    pub extra_commentary: Option<String>,
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<GiftCard>>, AppError> {
    let rows = state.db.list_gift_cards().await?;
    let mut cards = Vec::with_capacity(rows.len());
    for row in rows {
        cards.push(to_dto(&state.db, row).await?);
    }
    Ok(Json(cards))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<GiftCard>, AppError> {
    let row = state
        .db
        .get_gift_card(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("gift card not found".to_string()))?;
    Ok(Json(to_dto(&state.db, row).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<GiftCardPayload>,
) -> Result<(StatusCode, Json<GiftCard>), AppError> {
    validate(&state, &req).await?;

    let row = GiftCardRow {
        id: Uuid::new_v4().to_string(),
        buyer_id: req.buyer_id,
        recipient_id: req.recipient_id,
        num_classes: req.num_classes,
        kind: req.kind.as_str().to_string(),
        scheduled_date: req.scheduled_date,
        extra_commentary: req.extra_commentary,
        created_at: String::new(),
    };
    state.db.insert_gift_card(&row).await?;

    let row = state
        .db
        .get_gift_card(&row.id)
        .await?
        .ok_or_else(|| AppError::Internal("gift card vanished after insert".to_string()))?;
    Ok((StatusCode::CREATED, Json(to_dto(&state.db, row).await?)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<GiftCardPayload>,
) -> Result<Json<GiftCard>, AppError> {
    validate(&state, &req).await?;

    let existing = state
        .db
        .get_gift_card(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("gift card not found".to_string()))?;

    let row = GiftCardRow {
        id,
        buyer_id: req.buyer_id,
        recipient_id: req.recipient_id,
        num_classes: req.num_classes,
        kind: req.kind.as_str().to_string(),
        scheduled_date: req.scheduled_date,
        extra_commentary: req.extra_commentary,
        created_at: existing.created_at,
    };
    state.db.update_gift_card(&row).await?;
    Ok(Json(to_dto(&state.db, row).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.db.delete_gift_card(&id).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn validate(state: &AppState, req: &GiftCardPayload) -> Result<(), AppError> {
    if req.num_classes <= 0 {
        return Err(AppError::BadRequest(
            "numClasses must be greater than 0".to_string(),
        ));
    }
    if let Some(d) = req.scheduled_date.as_deref() {
        if dates::parse_date(d).is_none() {
            return Err(AppError::BadRequest(format!("invalid date '{}'", d)));
        }
    }
    for (label, id) in [("buyer", &req.buyer_id), ("recipient", &req.recipient_id)] {
        if state.db.get_client(id).await?.is_none() {
            return Err(AppError::BadRequest(format!("unknown {} '{}'", label, id)));
        }
    }
    Ok(())
}

async fn to_dto(db: &Database, row: GiftCardRow) -> Result<GiftCard, AppError> {
    let kind = GiftCardKind::parse(&row.kind)
        .ok_or_else(|| AppError::Internal(format!("corrupt gift card kind '{}'", row.kind)))?;
    let buyer = db.get_client(&row.buyer_id).await?.map(client_dto);
    let recipient = db.get_client(&row.recipient_id).await?.map(client_dto);

    Ok(GiftCard {
        id: row.id,
        buyer_id: row.buyer_id,
        recipient_id: row.recipient_id,
        buyer,
        recipient,
        num_classes: row.num_classes,
        kind,
        scheduled_date: row.scheduled_date,
        extra_commentary: row.extra_commentary,
        created_at: row.created_at,
    })
}
