//! Handler functions for site settings API endpoints.

use crate::api::common::{ApiResponse, service_error_to_http};
use crate::services::setting_service::SettingService;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::Json as ResponseJson,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Wire format for the bulk settings update: the map rides under a
/// `settings` key.
#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub settings: HashMap<String, String>,
}

/// All settings as a flat key/value map.
#[axum::debug_handler]
pub async fn list_settings(
    Extension(pool): Extension<SqlitePool>,
) -> Result<ResponseJson<ApiResponse<HashMap<String, String>>>, (StatusCode, String)> {
    let settings = SettingService::new(&pool)
        .get_all()
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(settings)))
}

#[axum::debug_handler]
pub async fn get_setting(
    Extension(pool): Extension<SqlitePool>,
    Path(key): Path<String>,
) -> Result<ResponseJson<ApiResponse<serde_json::Value>>, (StatusCode, String)> {
    let value = SettingService::new(&pool)
        .get(&key)
        .await
        .map_err(service_error_to_http)?;

    Ok(ResponseJson(ApiResponse::ok(serde_json::json!({
        "key": key,
        "value": value,
    }))))
}

/// Bulk upsert of the settings map, atomically.
#[axum::debug_handler]
pub async fn update_settings(
    Extension(pool): Extension<SqlitePool>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<ResponseJson<ApiResponse<HashMap<String, String>>>, (StatusCode, String)> {
    let service = SettingService::new(&pool);
    service
        .set_many(payload.settings)
        .await
        .map_err(service_error_to_http)?;

    let settings = service.get_all().await.map_err(service_error_to_http)?;
    Ok(ResponseJson(ApiResponse::success(
        settings,
        "Settings updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_update_payload_nests_the_map_under_settings() {
        let payload: UpdateSettingsRequest =
            serde_json::from_str(r#"{"settings":{"site_title":"Toolbox"}}"#).unwrap();
        assert_eq!(
            payload.settings.get("site_title").map(String::as_str),
            Some("Toolbox")
        );

        let flat: Result<UpdateSettingsRequest, _> =
            serde_json::from_str(r#"{"site_title":"Toolbox"}"#);
        assert!(flat.is_err());
    }
}
