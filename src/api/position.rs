use crate::auth::auth::AuthUser;
use crate::model::position::Position;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreatePosition {
    #[schema(example = "Backend Developer")]
    pub name: String,
    #[schema(example = "be-dev")]
    pub code: String,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePosition {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

async fn name_or_code_taken(
    pool: &MySqlPool,
    name: &str,
    code: &str,
    exclude_id: u64,
) -> Result<Option<&'static str>, sqlx::Error> {
    let name_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM positions WHERE name = ? AND id <> ? LIMIT 1)",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    if name_taken {
        return Ok(Some("Position name already exists"));
    }

    let code_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM positions WHERE code = ? AND id <> ? LIMIT 1)",
    )
    .bind(code)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    if code_taken {
        return Ok(Some("Position code already exists"));
    }

    Ok(None)
}

/// List all positions, name order
#[utoipa::path(
    get,
    path = "/api/positions",
    responses((status = 200, description = "Position list", body = Vec<Position>)),
    security(("bearer_auth" = [])),
    tag = "Position"
)]
pub async fn list_positions(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let positions = sqlx::query_as::<_, Position>(
        "SELECT id, name, code, description, is_active FROM positions ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch positions");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(positions))
}

/// List active positions (public, used by the request form)
#[utoipa::path(
    get,
    path = "/api/positions/active",
    responses((status = 200, description = "Active positions", body = Vec<Position>)),
    tag = "Position"
)]
pub async fn active_positions(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let positions = sqlx::query_as::<_, Position>(
        "SELECT id, name, code, description, is_active FROM positions WHERE is_active = TRUE ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch active positions");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(positions))
}

/// Get position by ID
#[utoipa::path(
    get,
    path = "/api/positions/{id}",
    params(("id" = u64, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position found", body = Position),
        (status = 404, description = "Position not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Position"
)]
pub async fn get_position(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let id = path.into_inner();

    let position = sqlx::query_as::<_, Position>(
        "SELECT id, name, code, description, is_active FROM positions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to fetch position");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match position {
        Some(p) => Ok(HttpResponse::Ok().json(p)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Position not found"
        }))),
    }
}

/// Create position
#[utoipa::path(
    post,
    path = "/api/positions",
    request_body = CreatePosition,
    responses(
        (status = 201, description = "Position created"),
        (status = 400, description = "Name or code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Position"
)]
pub async fn create_position(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePosition>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.name.trim().is_empty() || payload.code.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Position name and code are required"
        })));
    }

    let code = payload.code.trim().to_uppercase();

    let conflict = name_or_code_taken(pool.get_ref(), payload.name.trim(), &code, 0)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to check position uniqueness");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if let Some(message) = conflict {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    sqlx::query("INSERT INTO positions (name, code, description) VALUES (?, ?, ?)")
        .bind(payload.name.trim())
        .bind(&code)
        .bind(&payload.description)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create position");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Position created successfully"
    })))
}

/// Update position
#[utoipa::path(
    put,
    path = "/api/positions/{id}",
    params(("id" = u64, Path, description = "Position ID")),
    request_body = UpdatePosition,
    responses(
        (status = 200, description = "Position updated"),
        (status = 400, description = "Name or code already exists"),
        (status = 404, description = "Position not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Position"
)]
pub async fn update_position(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdatePosition>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let current = sqlx::query_as::<_, Position>(
        "SELECT id, name, code, description, is_active FROM positions WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to fetch position");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(current) = current else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Position not found"
        })));
    };

    let name = payload
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&current.name)
        .to_string();
    let code = payload
        .code
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| current.code.clone());
    let description = match &payload.description {
        Some(d) => Some(d.clone()),
        None => current.description.clone(),
    };
    let is_active = payload.is_active.unwrap_or(current.is_active);

    let conflict = name_or_code_taken(pool.get_ref(), &name, &code, id)
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to check position uniqueness");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if let Some(message) = conflict {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    sqlx::query(
        "UPDATE positions SET name = ?, code = ?, description = ?, is_active = ? WHERE id = ?",
    )
    .bind(&name)
    .bind(&code)
    .bind(&description)
    .bind(is_active)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to update position");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Position updated successfully"
    })))
}

/// Delete position, refused while employees still reference it
#[utoipa::path(
    delete,
    path = "/api/positions/{id}",
    params(("id" = u64, Path, description = "Position ID")),
    responses(
        (status = 200, description = "Position deleted"),
        (status = 400, description = "Position is in use"),
        (status = 404, description = "Position not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Position"
)]
pub async fn delete_position(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let name = sqlx::query_scalar::<_, String>("SELECT name FROM positions WHERE id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch position before delete");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(name) = name else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Position not found"
        })));
    };

    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE position = ? LIMIT 1)",
    )
    .bind(&name)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to check position usage");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if in_use {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Cannot delete position. It is being used by employees."
        })));
    }

    sqlx::query("DELETE FROM positions WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to delete position");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Position deleted successfully"
    })))
}
