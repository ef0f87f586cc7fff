//! JSON:API menu endpoint.
//!
//! One route serves a whole menu as a single top-level document:
//! `GET /jsonapi/menus/{menu}`. The response shape of the `menu_items`
//! attribute depends on the configured format.

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::debug;

use crate::cache::CacheableMetadata;
use crate::error::{AppError, AppResult};
use crate::jsonapi::MEDIA_TYPE;
use crate::menu_tree::DEFAULT_MANIPULATORS;
use crate::state::AppState;

/// TTL for cached menu documents (5 minutes).
const MENU_DOC_TTL_SECS: u64 = 300;

/// Create the menu router.
pub fn router() -> Router<AppState> {
    Router::new().route("/jsonapi/menus/{menu}", get(menu_document))
}

/// Serve one menu as a JSON:API document.
async fn menu_document(
    State(state): State<AppState>,
    Path(menu_name): Path<String>,
) -> AppResult<Response> {
    let menu = state
        .menus()
        .menu_by_name(&menu_name)
        .await?
        .ok_or(AppError::NotFound)?;

    // The format name is read per request; the registry is fixed at boot.
    let format_name = state.config().menu_items_format.clone();
    let cache_key = format!("jsonapi_menu:{format_name}:{}", menu.name);

    if let Some(body) = state.cache().get(&cache_key).await {
        debug!(menu = %menu.name, "serving cached menu document");
        return Ok(document_response(body));
    }

    let format = state.formats().get(&format_name)?;

    let tree = state.tree().load(&menu.name).await?;
    let tree = state.tree().transform(tree, DEFAULT_MANIPULATORS);

    let mut cache_meta = CacheableMetadata::new();
    let payload = format.format(&menu, &tree, &mut cache_meta).await?;
    let document = state
        .assembler()
        .assemble(&menu, payload)
        .context("failed to assemble menu document")?;

    let body =
        serde_json::to_string(&document).context("failed to serialize menu document")?;

    state
        .cache()
        .set(&cache_key, &body, MENU_DOC_TTL_SECS, &cache_meta.tags())
        .await;

    Ok(document_response(body))
}

fn document_response(body: String) -> Response {
    let mut response = (StatusCode::OK, body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(MEDIA_TYPE));
    response
}
