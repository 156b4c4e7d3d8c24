use crate::error::Result;
use crate::model::{AjaxBitlinksResponse, BitlinksForm, BitlinksQuery, BitlinksResponse};
use crate::state::AppState;
use axum::extract::{Form, Query, State};
use axum::Json;
use bitlinks_pipeline::PipelineError;

pub async fn get_bitlinks_handler(
    State(state): State<AppState>,
    Query(query): Query<BitlinksQuery>,
) -> Result<Json<BitlinksResponse>> {
    let record = state.bitlinks().bitlinks(&query.url).await?;
    Ok(Json(record.into()))
}

/// Form endpoint used by the legacy page script.
///
/// Validation refusals keep that script's contract: `200 OK` with the three
/// fields carrying the explanation. Shortening and storage failures are
/// reported like on the JSON API.
pub async fn ajax_bitlinks_handler(
    State(state): State<AppState>,
    Form(form): Form<BitlinksForm>,
) -> Result<Json<AjaxBitlinksResponse>> {
    match state.bitlinks().bitlinks(&form.url).await {
        Ok(record) => Ok(Json(record.into())),
        Err(
            PipelineError::InvalidUrl(_)
            | PipelineError::RejectedOrigin(_)
            | PipelineError::UnreachableTarget(_),
        ) => Ok(Json(AjaxBitlinksResponse::rejected())),
        Err(e) => Err(e.into()),
    }
}
