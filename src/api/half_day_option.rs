use crate::auth::auth::AuthUser;
use crate::leave::record::HalfDaySlot;
use crate::model::half_day_option::HalfDayOption;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateHalfDayOption {
    #[schema(example = "morning")]
    pub code: String,
    #[schema(example = "Morning (08:00 - 12:00)")]
    pub label: String,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateHalfDayOption {
    #[schema(example = "Morning (08:30 - 12:30)")]
    pub label: String,
}

/// List the half-day slot catalog (public, used by the request form)
#[utoipa::path(
    get,
    path = "/api/half-day-options",
    responses((status = 200, description = "Half-day options", body = Vec<HalfDayOption>)),
    tag = "HalfDayOption"
)]
pub async fn list_options(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let options = sqlx::query_as::<_, HalfDayOption>(
        "SELECT id, code, label FROM half_day_options ORDER BY code ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch half-day options");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(options))
}

/// Create half-day option
#[utoipa::path(
    post,
    path = "/api/half-day-options",
    request_body = CreateHalfDayOption,
    responses(
        (status = 201, description = "Option created"),
        (status = 400, description = "Invalid code or option already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "HalfDayOption"
)]
pub async fn create_option(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHalfDayOption>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    // codes are fixed to the three slots the leave engine understands
    if HalfDaySlot::from_str(&payload.code).is_err() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Invalid code. Allowed: morning, afternoon, evening"
        })));
    }

    if payload.label.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Label is required"
        })));
    }

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM half_day_options WHERE code = ? LIMIT 1)",
    )
    .bind(&payload.code)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to check half-day option uniqueness");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if exists {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Option already exists"
        })));
    }

    sqlx::query("INSERT INTO half_day_options (code, label) VALUES (?, ?)")
        .bind(&payload.code)
        .bind(payload.label.trim())
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create half-day option");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Option created successfully"
    })))
}

/// Update half-day option label
#[utoipa::path(
    put,
    path = "/api/half-day-options/{id}",
    params(("id" = u64, Path, description = "Option ID")),
    request_body = UpdateHalfDayOption,
    responses(
        (status = 200, description = "Option updated"),
        (status = 404, description = "Option not found")
    ),
    security(("bearer_auth" = [])),
    tag = "HalfDayOption"
)]
pub async fn update_option(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateHalfDayOption>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    if payload.label.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Label is required"
        })));
    }

    let result = sqlx::query("UPDATE half_day_options SET label = ? WHERE id = ?")
        .bind(payload.label.trim())
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to update half-day option");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Option not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Option updated successfully"
    })))
}

/// Delete half-day option
#[utoipa::path(
    delete,
    path = "/api/half-day-options/{id}",
    params(("id" = u64, Path, description = "Option ID")),
    responses(
        (status = 200, description = "Option deleted"),
        (status = 404, description = "Option not found")
    ),
    security(("bearer_auth" = [])),
    tag = "HalfDayOption"
)]
pub async fn delete_option(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM half_day_options WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to delete half-day option");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Option not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Option deleted successfully"
    })))
}
