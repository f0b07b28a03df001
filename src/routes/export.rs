use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::{card::CardView, AppState};

/// Render a posted card and return it as a downloadable image
pub async fn export_card(
    State(state): State<Arc<AppState>>,
    Json(view): Json<CardView>,
) -> Result<impl IntoResponse, StatusCode> {
    view.validate().map_err(|e| {
        tracing::warn!("Rejected export request: {}", e);
        StatusCode::UNPROCESSABLE_ENTITY
    })?;

    let artifact = state.exporter.export(&view).map_err(|e| {
        tracing::error!("Failed to export card: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(
        "Exported {}x{} card over HTTP ({} bytes)",
        view.size.get(),
        view.size.get(),
        artifact.bytes.len()
    );

    let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, artifact.mime_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    ))
}
