mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crm_api::auth::Role;

#[tokio::test]
async fn create_with_missing_fields_reports_each_field() -> Result<()> {
    let token = common::token_for_role(Role::User);
    let request = common::post_json(
        "/api/quotations",
        Some(&token),
        json!({ "service": "Web Design" }),
    );

    let (status, body) = common::send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    for field in ["enterpriseName", "contactNumber", "email", "budget", "description"] {
        assert!(
            body["field_errors"][field].is_string(),
            "expected error for {}: {}",
            field,
            body
        );
    }
    Ok(())
}

#[tokio::test]
async fn create_with_string_budget_is_rejected() -> Result<()> {
    let token = common::token_for_role(Role::User);
    let request = common::post_json(
        "/api/quotations",
        Some(&token),
        json!({
            "service": "Web Design",
            "enterpriseName": "Acme",
            "contactNumber": "555-0100",
            "email": "a@acme.com",
            "budget": "5000",
            "description": "New site"
        }),
    );

    let (status, body) = common::send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["budget"], json!("Budget must be numeric"));
    Ok(())
}

#[tokio::test]
async fn update_with_out_of_enum_status_is_rejected() -> Result<()> {
    let token = common::token_for_role(Role::Superadmin);
    let request = common::put_json(
        &format!("/api/quotations/{}", Uuid::new_v4()),
        Some(&token),
        json!({ "status": "archived" }),
    );

    let (status, body) = common::send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["status"]
        .as_str()
        .unwrap()
        .contains("pending, approved, rejected, completed"));
    Ok(())
}

#[tokio::test]
async fn update_with_no_fields_is_rejected() -> Result<()> {
    let token = common::token_for_role(Role::Superadmin);
    let request = common::put_json(
        &format!("/api/quotations/{}", Uuid::new_v4()),
        Some(&token),
        json!({}),
    );

    let (status, body) = common::send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    Ok(())
}

#[tokio::test]
async fn update_with_malformed_delivery_date_is_rejected() -> Result<()> {
    let token = common::token_for_role(Role::Superadmin);
    let request = common::put_json(
        &format!("/api/quotations/{}", Uuid::new_v4()),
        Some(&token),
        json!({ "proposedDeliveryDate": "next tuesday" }),
    );

    let (status, body) = common::send(request).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["field_errors"]["proposedDeliveryDate"].is_string());
    Ok(())
}

#[tokio::test]
async fn non_uuid_record_id_is_a_client_error() -> Result<()> {
    let token = common::token_for_role(Role::Superadmin);
    let (status, _) =
        common::send(common::get("/api/quotations/not-a-uuid", Some(&token))).await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
