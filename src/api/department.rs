use crate::auth::auth::AuthUser;
use crate::model::department::Department;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateDepartment {
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = "eng")]
    pub code: String,
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartment {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

async fn name_or_code_taken(
    pool: &MySqlPool,
    name: Option<&str>,
    code: Option<&str>,
    exclude_id: u64,
) -> Result<Option<&'static str>, sqlx::Error> {
    if let Some(name) = name {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE name = ? AND id <> ? LIMIT 1)",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        if taken {
            return Ok(Some("Department name already exists"));
        }
    }

    if let Some(code) = code {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE code = ? AND id <> ? LIMIT 1)",
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        if taken {
            return Ok(Some("Department code already exists"));
        }
    }

    Ok(None)
}

/// List all departments, name order
#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, description = "Department list", body = Vec<Department>)),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn list_departments(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, code, description, is_active FROM departments ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch departments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(departments))
}

/// List active departments (public, used by the request form)
#[utoipa::path(
    get,
    path = "/api/departments/active",
    responses((status = 200, description = "Active departments", body = Vec<Department>)),
    tag = "Department"
)]
pub async fn active_departments(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let departments = sqlx::query_as::<_, Department>(
        "SELECT id, name, code, description, is_active FROM departments WHERE is_active = TRUE ORDER BY name ASC",
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch active departments");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(departments))
}

/// Get department by ID
#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = Department),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn get_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let id = path.into_inner();

    let department = sqlx::query_as::<_, Department>(
        "SELECT id, name, code, description, is_active FROM departments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to fetch department");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match department {
        Some(d) => Ok(HttpResponse::Ok().json(d)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        }))),
    }
}

/// Create department
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartment,
    responses(
        (status = 201, description = "Department created", body = Object),
        (status = 400, description = "Name or code already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn create_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    if payload.name.trim().is_empty() || payload.code.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Department name and code are required"
        })));
    }

    let code = payload.code.trim().to_uppercase();

    let conflict = name_or_code_taken(pool.get_ref(), Some(payload.name.trim()), Some(&code), 0)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to check department uniqueness");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if let Some(message) = conflict {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    sqlx::query("INSERT INTO departments (name, code, description) VALUES (?, ?, ?)")
        .bind(payload.name.trim())
        .bind(&code)
        .bind(&payload.description)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create department");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Department created successfully"
    })))
}

/// Update department
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    request_body = UpdateDepartment,
    responses(
        (status = 200, description = "Department updated"),
        (status = 400, description = "Name or code already exists"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn update_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateDepartment>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let current = sqlx::query_as::<_, Department>(
        "SELECT id, name, code, description, is_active FROM departments WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to fetch department");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let Some(current) = current else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
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

    let conflict = name_or_code_taken(pool.get_ref(), Some(&name), Some(&code), id)
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to check department uniqueness");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if let Some(message) = conflict {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    sqlx::query(
        "UPDATE departments SET name = ?, code = ?, description = ?, is_active = ? WHERE id = ?",
    )
    .bind(&name)
    .bind(&code)
    .bind(&description)
    .bind(is_active)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to update department");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department updated successfully"
    })))
}

/// Delete department, refused while employees still reference it
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted"),
        (status = 400, description = "Department is in use"),
        (status = 404, description = "Department not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Department"
)]
pub async fn delete_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let name = sqlx::query_scalar::<_, String>("SELECT name FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch department before delete");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(name) = name else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Department not found"
        })));
    };

    let in_use = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE department = ? LIMIT 1)",
    )
    .bind(&name)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to check department usage");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if in_use {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Cannot delete department. It is being used by employees."
        })));
    }

    sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to delete department");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Department deleted successfully"
    })))
}
