use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Role;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiResponse {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub role: Role,
}

/// GET /api/whoami - Echo the authenticated caller's claims.
///
/// This is the server-authoritative role read; clients use it (or a local
/// unverified decode) purely to pick a UI, never for access decisions.
pub async fn whoami_get(Extension(user): Extension<AuthUser>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        user_id: user.user_id,
        tenant_id: user.tenant,
        role: user.role,
    }))
}
