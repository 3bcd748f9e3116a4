//! Shared helpers: the tests drive the router in-process with `oneshot`,
//! so the authorization and validation paths need no running database.

#![allow(dead_code)]

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use crm_api::auth::{encode_claims, Claims, Role};

/// Mint a token the way the server itself would verify it.
pub fn token_for(role: Role, sub: Uuid, tenant: Uuid) -> String {
    let secret = &crm_api::config::config().security.jwt_secret;
    encode_claims(&Claims::new(sub, tenant, role), secret).expect("failed to mint test token")
}

pub fn token_for_role(role: Role) -> String {
    token_for(role, Uuid::new_v4(), Uuid::new_v4())
}

/// Run one request through a fresh router and decode the response.
pub async fn send(request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = crm_api::app().oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();

    // Extractor rejections may produce plain-text bodies
    let body = match serde_json::from_slice::<Value>(&bytes) {
        Ok(v) => v,
        Err(_) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
    };
    Ok((status, body))
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    request("GET", uri, token, None)
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request("POST", uri, token, Some(body))
}

pub fn put_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    request("PUT", uri, token, Some(body))
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}
