// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use habit_tracker::error::AppError;

mod common;

async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    (status, common::body_json(response).await)
}

#[tokio::test]
async fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED, "unauthorized"),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED, "invalid_token"),
        (
            AppError::InvalidCredentials,
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
        ),
        (
            AppError::NotFound("user".to_string()),
            StatusCode::NOT_FOUND,
            "not_found",
        ),
        (
            AppError::BadRequest("nope".to_string()),
            StatusCode::BAD_REQUEST,
            "bad_request",
        ),
        (
            AppError::Conflict("taken".to_string()),
            StatusCode::CONFLICT,
            "conflict",
        ),
        (
            AppError::Database("boom".to_string()),
            StatusCode::INTERNAL_SERVER_ERROR,
            "database_error",
        ),
    ];

    for (err, status, code) in cases {
        let (actual, body) = render(err).await;
        assert_eq!(actual, status);
        assert_eq!(body["error"], code);
    }
}

#[tokio::test]
async fn test_internal_details_not_leaked() {
    let (status, body) = render(AppError::Internal(anyhow::anyhow!("secret path /etc/x"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert!(body.get("details").is_none());

    let (_, body) = render(AppError::Database("connection string".to_string())).await;
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_client_errors_carry_details() {
    let (_, body) = render(AppError::BadRequest("Missing field: habit_name".to_string())).await;
    assert_eq!(body["details"], "Missing field: habit_name");
}
