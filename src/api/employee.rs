use crate::auth::auth::AuthUser;
use crate::model::employee::Employee;
use crate::utils::employee_code_cache;
use crate::utils::employee_code_filter;
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployee {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    #[schema(example = "Alice Nguyen")]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Backend Developer")]
    pub position: String,
    #[schema(example = "alice.nguyen@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "+84901234567")]
    pub phone: String,
    #[schema(example = "2023-06-01", value_type = Option<String>, format = "date")]
    pub join_date: Option<NaiveDate>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployee {
    #[schema(example = "Alice Nguyen")]
    pub name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = "Backend Developer")]
    pub position: String,
    #[schema(example = "alice.nguyen@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "+84901234567")]
    pub phone: String,
    #[schema(example = "inactive")]
    pub status: Option<String>,
}

/// true  => employee code AVAILABLE
/// false => employee code TAKEN
pub async fn is_code_available(code: &str, pool: &MySqlPool) -> bool {
    // 1️⃣ Cuckoo filter — fast negative
    if !employee_code_filter::might_exist(code) {
        return true;
    }

    // 2️⃣ Moka cache — fast positive
    if employee_code_cache::is_taken(code).await {
        return false;
    }

    // 3️⃣ Database fallback
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_id = ? LIMIT 1)",
    )
    .bind(code)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// List all employees, newest first
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employee list", body = Vec<Employee>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_id, name, department, position, email, phone, status, join_date
        FROM employees
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to fetch employees");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee row ID")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let id = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_id, name, department, position, email, phone, status, join_date
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to fetch employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        }))),
    }
}

/// Create employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = Object, example = json!({
            "message": "Employee created successfully"
        })),
        (status = 400, description = "Employee ID or email already exists"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let code = payload.employee_id.trim();
    if code.is_empty() || payload.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee ID and name are required"
        })));
    }

    if !is_code_available(code, pool.get_ref()).await {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Employee ID already exists"
        })));
    }

    let email_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? LIMIT 1)",
    )
    .bind(&payload.email)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to check email uniqueness");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if email_taken {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Email already exists"
        })));
    }

    let join_date = payload
        .join_date
        .unwrap_or_else(|| Utc::now().date_naive());

    sqlx::query(
        r#"
        INSERT INTO employees (employee_id, name, department, position, email, phone, join_date)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(code)
    .bind(&payload.name)
    .bind(&payload.department)
    .bind(&payload.position)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(join_date)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, employee_id = code, "Failed to create employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    // keep the availability fast path in sync
    employee_code_filter::insert(code);
    employee_code_cache::mark_taken(code).await;

    Ok(HttpResponse::Created().json(json!({
        "message": "Employee created successfully"
    })))
}

/// Update employee
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee row ID")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Email already exists"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let email_taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? AND id <> ? LIMIT 1)",
    )
    .bind(&payload.email)
    .bind(id)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to check email uniqueness");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if email_taken {
        return Ok(HttpResponse::BadRequest().json(json!({
            "message": "Email already exists"
        })));
    }

    let status = payload.status.as_deref().unwrap_or("active");

    let result = sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, department = ?, position = ?, email = ?, phone = ?, status = ?
        WHERE id = ?
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.department)
    .bind(&payload.position)
    .bind(&payload.email)
    .bind(&payload.phone)
    .bind(status)
    .bind(id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, id, "Failed to update employee");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee row ID")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let code = sqlx::query_scalar::<_, String>("SELECT employee_id FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch employee before delete");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(code) = code else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to delete employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    employee_code_filter::remove(&code);
    employee_code_cache::invalidate(&code).await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully"
    })))
}

/// List active employees of one department, name order
#[utoipa::path(
    get,
    path = "/api/employees/department/{department}",
    params(("department" = String, Path, description = "Department name")),
    responses(
        (status = 200, description = "Employees in the department", body = Vec<Employee>)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn employees_by_department(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let department = path.into_inner();

    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_id, name, department, position, email, phone, status, join_date
        FROM employees
        WHERE department = ? AND status = 'active'
        ORDER BY name ASC
        "#,
    )
    .bind(&department)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, %department, "Failed to fetch employees by department");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(employees))
}
