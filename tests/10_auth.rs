mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crm_api::auth::{encode_claims, Claims, Role};

#[tokio::test]
async fn root_endpoint_is_public() -> Result<()> {
    let (status, body) = common::send(common::get("/", None)).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"].is_object());
    Ok(())
}

#[tokio::test]
async fn missing_token_is_unauthorized() -> Result<()> {
    let (status, body) = common::send(common::get("/api/quotations", None)).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_unauthorized() -> Result<()> {
    let (status, body) =
        common::send(common::get("/api/quotations", Some("not-a-jwt"))).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn token_signed_with_wrong_secret_is_unauthorized() -> Result<()> {
    let claims = Claims::new(Uuid::new_v4(), Uuid::new_v4(), Role::Superadmin);
    let forged = encode_claims(&claims, "some-other-secret")?;

    let (status, _) = common::send(common::get("/api/whoami", Some(&forged))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn non_bearer_scheme_is_unauthorized() -> Result<()> {
    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/whoami")
        .header("authorization", "Basic dXNlcjpwYXNz")
        .body(axum::body::Body::empty())?;

    let (status, _) = common::send(request).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn whoami_echoes_the_token_claims() -> Result<()> {
    let sub = Uuid::new_v4();
    let tenant = Uuid::new_v4();
    let token = common::token_for(Role::Admin, sub, tenant);

    let (status, body) = common::send(common::get("/api/whoami", Some(&token))).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], json!("admin"));
    assert_eq!(body["data"]["userId"], json!(sub.to_string()));
    assert_eq!(body["data"]["tenantId"], json!(tenant.to_string()));
    Ok(())
}
