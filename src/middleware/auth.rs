use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::gate::Actor;
use crate::auth::{decode_claims, Claims, Role};
use crate::config;
use crate::error::ApiError;

/// Authenticated caller context extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub tenant: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.user_id,
            tenant: self.tenant,
            role: self.role,
        }
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            tenant: claims.tenant,
            role: claims.role,
        }
    }
}

/// JWT authentication middleware that validates tokens and injects the
/// caller context as a request extension. Failures are 401s; insufficient
/// privilege is decided later by the gate and is a 403.
pub async fn jwt_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;

    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(ApiError::unauthorized("JWT secret not configured"));
    }

    let claims = decode_claims(&token, secret)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_is_extracted() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn missing_header_is_an_error() {
        assert!(extract_bearer_token(&HeaderMap::new()).is_err());
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcg=="));
        assert!(extract_bearer_token(&headers).is_err());
    }

    #[test]
    fn empty_token_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer  "));
        assert!(extract_bearer_token(&headers).is_err());
    }
}
