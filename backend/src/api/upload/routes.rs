//! HTTP routes for admin uploads.

use super::handlers::{MAX_UPLOAD_BYTES, upload_post_cover};
use axum::{Router, extract::DefaultBodyLimit, routing::post};

/// Admin upload routes mounted under `/admin/uploads`.
///
/// The default axum body limit is 2 MB; raise it so a full 5 MiB image plus
/// multipart framing fits.
pub fn admin_upload_router() -> Router {
    Router::new()
        .route("/post-cover", post(upload_post_cover))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
}
