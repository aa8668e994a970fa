// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{DashboardStats, HabitEvent, UserProfile};
use crate::routes::auth::normalize_email;
use crate::services::insights::{aggregate, Insights, INSIGHT_WINDOW, TOP_K};
use crate::services::streak::current_streak;
use crate::time_utils::{format_utc_rfc3339, utc_offset_from_minutes};
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

const MAX_HABIT_NAME_LEN: usize = 100;
const MAX_LIST_LIMIT: u32 = 500;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/habits", get(list_habits).post(create_habit))
        .route("/api/habits/streak", get(get_streak))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/insights", get(get_insights))
}

/// Resolve the caller's calendar offset, falling back to configuration.
fn resolve_offset(state: &AppState, tz_offset_minutes: Option<i32>) -> Result<FixedOffset> {
    let minutes = tz_offset_minutes.unwrap_or(state.config.utc_offset_minutes);
    utc_offset_from_minutes(minutes).ok_or_else(|| {
        AppError::BadRequest("'tz_offset_minutes' must be within -840..=840".to_string())
    })
}

#[derive(Deserialize)]
struct OffsetQuery {
    /// Minutes east of UTC for calendar-day math
    tz_offset_minutes: Option<i32>,
}

// ─── User Profile ────────────────────────────────────────────

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserProfile,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    Ok(Json(ProfileResponse {
        success: true,
        user: UserProfile::from(&profile),
    }))
}

/// Partial profile update. Omitted fields are left unchanged.
#[derive(Deserialize, Validate)]
struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(length(max = 500))]
    bio: Option<String>,
    #[validate(url)]
    image: Option<String>,
    #[validate(email)]
    email: Option<String>,
}

/// Update current user profile.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(mut req): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    req.email = req.email.as_deref().map(normalize_email);
    req.validate()?;

    let name = match req.name {
        Some(name) if name.trim().is_empty() => {
            return Err(AppError::BadRequest("Name must not be blank".to_string()));
        }
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };

    // Fetch-modify-write to preserve other fields
    let mut profile = state
        .db
        .get_user(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.user_id)))?;

    let mut previous_email = None;
    if let Some(email) = req.email {
        if email != profile.email {
            state.db.claim_email(&email, &profile.id).await?;
            previous_email = Some(std::mem::replace(&mut profile.email, email));
        }
    }
    if let Some(name) = name {
        profile.name = name;
    }
    if let Some(bio) = req.bio {
        profile.bio = bio;
    }
    if let Some(image) = req.image {
        profile.image = Some(image);
    }
    profile.updated_at = Utc::now().to_rfc3339();

    let stored = state.db.upsert_user(&profile).await;

    // Release whichever email this user no longer holds.
    if let Some(previous) = &previous_email {
        let stale = if stored.is_ok() { previous } else { &profile.email };
        if let Err(e) = state.db.release_email(stale, &profile.id).await {
            tracing::warn!(error = %e, "Failed to release email claim");
        }
    }
    stored?;

    tracing::info!(user_id = %user.user_id, "Profile updated");

    Ok(Json(ProfileResponse {
        success: true,
        user: UserProfile::from(&profile),
    }))
}

// ─── Habit Events ────────────────────────────────────────────

/// Habit log request. `habit_name` is optional here so that its absence
/// maps to 400 rather than a deserialization failure.
#[derive(Deserialize, Validate)]
struct CreateHabitRequest {
    habit_name: Option<String>,
    occurred_at: Option<DateTime<Utc>>,
    #[validate(length(max = 50))]
    emotion: Option<String>,
    #[validate(length(max = 50))]
    environment: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitResponse {
    pub success: bool,
    pub data: HabitEvent,
}

/// Blank labels are treated as absent.
fn non_blank(label: Option<String>) -> Option<String> {
    label
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Log a habit event for the current user.
async fn create_habit(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateHabitRequest>,
) -> Result<(StatusCode, Json<HabitResponse>)> {
    req.validate()?;

    let habit_name = non_blank(req.habit_name)
        .ok_or_else(|| AppError::BadRequest("Missing field: habit_name".to_string()))?;
    if habit_name.chars().count() > MAX_HABIT_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "habit_name must be at most {} characters",
            MAX_HABIT_NAME_LEN
        )));
    }

    // A token can outlive its account.
    if state.db.get_user(&user.user_id).await?.is_none() {
        tracing::warn!(user_id = %user.user_id, "Habit rejected: no such user");
        return Err(AppError::Unauthorized);
    }

    let occurred_at = req.occurred_at.unwrap_or_else(Utc::now);
    let event = HabitEvent::new(user.user_id.as_str(), habit_name, occurred_at)
        .with_context(non_blank(req.emotion), non_blank(req.environment));

    state.db.insert_habit_event(&event).await?;

    tracing::info!(
        user_id = %user.user_id,
        event_id = %event.id,
        habit = %event.habit_name,
        "Habit logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(HabitResponse {
            success: true,
            data: event,
        }),
    ))
}

#[derive(Deserialize)]
struct ListHabitsQuery {
    limit: Option<u32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HabitListResponse {
    pub success: bool,
    pub data: Vec<HabitEvent>,
}

/// List the current user's habit events, most recent first.
async fn list_habits(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListHabitsQuery>,
) -> Result<Json<HabitListResponse>> {
    if let Some(limit) = params.limit {
        if limit == 0 || limit > MAX_LIST_LIMIT {
            return Err(AppError::BadRequest(format!(
                "'limit' must be between 1 and {}",
                MAX_LIST_LIMIT
            )));
        }
    }

    let events = state
        .db
        .get_habit_events(&user.user_id, params.limit)
        .await?;

    tracing::debug!(user_id = %user.user_id, count = events.len(), "Fetched habits");

    Ok(Json(HabitListResponse {
        success: true,
        data: events,
    }))
}

// ─── Streaks & Dashboard ─────────────────────────────────────

#[derive(Deserialize)]
struct StreakQuery {
    habit: String,
    tz_offset_minutes: Option<i32>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StreakResponse {
    pub habit: String,
    pub streak: u32,
    pub as_of: String,
}

/// Current calendar-day streak for one habit.
async fn get_streak(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StreakQuery>,
) -> Result<Json<StreakResponse>> {
    let offset = resolve_offset(&state, params.tz_offset_minutes)?;
    let habit = params.habit.trim().to_string();
    if habit.is_empty() {
        return Err(AppError::BadRequest("'habit' is required".to_string()));
    }

    let events = state.db.get_habit_events(&user.user_id, None).await?;
    let now = Utc::now();
    let streak = current_streak(&events, &habit, &now.with_timezone(&offset));

    Ok(Json(StreakResponse {
        habit,
        streak,
        as_of: format_utc_rfc3339(now),
    }))
}

/// Dashboard aggregates over the full history.
async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<OffsetQuery>,
) -> Result<Json<DashboardStats>> {
    let offset = resolve_offset(&state, params.tz_offset_minutes)?;
    let events = state.db.get_habit_events(&user.user_id, None).await?;

    let stats = DashboardStats::from_events(&events, &Utc::now().with_timezone(&offset));

    tracing::debug!(
        user_id = %user.user_id,
        total_events = stats.total_events,
        active_streaks = stats.active_streaks,
        "Built dashboard"
    );

    Ok(Json(stats))
}

// ─── Insights ────────────────────────────────────────────────

/// Insight summary over the most recent events.
async fn get_insights(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Insights>> {
    let events = state
        .db
        .get_habit_events(&user.user_id, Some(INSIGHT_WINDOW as u32))
        .await?;

    let insights = aggregate(&events, INSIGHT_WINDOW, TOP_K);

    tracing::debug!(
        user_id = %user.user_id,
        window = events.len(),
        triggers = insights.triggers.len(),
        "Computed insights"
    );

    Ok(Json(insights))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("  happy ".to_string())), Some("happy".to_string()));
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_resolve_offset_bounds() {
        let state = AppState::new(crate::config::Config::test_default());

        assert_eq!(
            resolve_offset(&state, Some(-300)).unwrap(),
            FixedOffset::west_opt(5 * 3600).unwrap()
        );
        assert_eq!(
            resolve_offset(&state, None).unwrap(),
            FixedOffset::east_opt(0).unwrap()
        );
        assert!(matches!(
            resolve_offset(&state, Some(900)),
            Err(AppError::BadRequest(_))
        ));
    }
}
