use crate::{
    auth::{
        jwt::{generate_access_token, generate_refresh_token, verify_token},
        password::verify_password,
    },
    config::Config,
    model::{admin::Admin, employee::Employee, role::Role},
    models::{AdminLoginDto, EmployeeAuthDto, TokenType},
};
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

/// Admin login handler
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    request_body = AdminLoginDto,
    responses(
        (status = 200, description = "Login successful", body = Object, example = json!({
            "accessToken": "eyJ...",
            "refreshToken": "eyJ...",
            "admin": {"id": 1, "username": "admin", "name": "Site Admin", "email": "admin@company.com"}
        })),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "admin_login",
    skip(pool, config, payload),
    fields(username = %payload.username)
)]
pub async fn admin_login(
    payload: web::Json<AdminLoginDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    info!("Admin login request received");

    if payload.username.trim().is_empty() || payload.password.is_empty() {
        info!("Validation failed: empty username or password");
        return HttpResponse::BadRequest().body("Username or password required");
    }

    debug!("Fetching admin from database");

    let admin = match sqlx::query_as::<_, Admin>(
        r#"
        SELECT id, username, password, name, email, role_id, is_active
        FROM admins
        WHERE username = ? AND is_active = TRUE
        "#,
    )
    .bind(&payload.username)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(admin)) => {
            debug!(admin_id = admin.id, "Admin found");
            admin
        }
        Ok(None) => {
            info!("Invalid credentials: admin not found");
            return HttpResponse::Unauthorized().body("Invalid credentials");
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching admin");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!("Verifying password");

    if let Err(e) = verify_password(&payload.password, &admin.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return HttpResponse::Unauthorized().body("Invalid credentials");
    }

    debug!("Generating tokens");

    let access_token = match generate_access_token(
        admin.id,
        admin.username.clone(),
        admin.role_id,
        None,
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to sign access token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (refresh_token, refresh_claims) = match generate_refresh_token(
        admin.id,
        admin.username.clone(),
        admin.role_id,
        &config.jwt_secret,
        config.refresh_token_ttl,
    ) {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Failed to sign refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    debug!(
        admin_id = admin.id,
        jti = %refresh_claims.jti,
        "Storing refresh token"
    );

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (admin_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(admin.id)
    .bind(&refresh_claims.jti)
    .bind(refresh_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    // non-fatal
    if let Err(e) = sqlx::query("UPDATE admins SET last_login_at = NOW() WHERE id = ?")
        .bind(admin.id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to update last_login_at");
    }

    info!("Admin login successful");

    HttpResponse::Ok().json(json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
        "admin": {
            "id": admin.id,
            "username": admin.username,
            "name": admin.name,
            "email": admin.email
        }
    }))
}

/// Employee authentication by employee code
#[utoipa::path(
    post,
    path = "/auth/employee/auth",
    request_body = EmployeeAuthDto,
    responses(
        (status = 200, description = "Authenticated", body = Object, example = json!({
            "accessToken": "eyJ...",
            "employee": {
                "employeeId": "EMP-001", "name": "Alice Nguyen",
                "department": "Engineering", "position": "Backend Developer",
                "email": "alice.nguyen@company.com"
            }
        })),
        (status = 400, description = "Missing employee id"),
        (status = 404, description = "Employee not found or inactive")
    ),
    tag = "Auth"
)]
pub async fn employee_auth(
    payload: web::Json<EmployeeAuthDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let code = payload.employee_id.trim();

    if code.is_empty() {
        return HttpResponse::BadRequest().json(json!({
            "message": "Employee ID is required"
        }));
    }

    let employee = match sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_id, name, department, position, email, phone, status, join_date
        FROM employees
        WHERE employee_id = ? AND status = 'active'
        "#,
    )
    .bind(code)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(Some(employee)) => employee,
        Ok(None) => {
            return HttpResponse::NotFound().json(json!({
                "message": "Employee ID does not exist"
            }));
        }
        Err(e) => {
            error!(error = %e, employee_id = code, "Database error during employee auth");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let access_token = match generate_access_token(
        employee.id,
        employee.employee_id.clone(),
        Role::Employee as u8,
        Some(employee.employee_id.clone()),
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to sign employee token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(json!({
        "accessToken": access_token,
        "employee": {
            "id": employee.id,
            "employeeId": employee.employee_id,
            "name": employee.name,
            "department": employee.department,
            "position": employee.position,
            "email": employee.email
        }
    }))
}

/// Rotate a refresh token and issue a fresh access token
pub async fn refresh_token(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::Unauthorized().body("No token"),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::Unauthorized().body("Invalid token"),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::Unauthorized().finish(),
    };

    if claims.token_type != TokenType::Refresh {
        return HttpResponse::Unauthorized().finish();
    }

    let record = match sqlx::query_as::<_, (u64, u64, bool)>(
        r#"
        SELECT id, admin_id, revoked
        FROM refresh_tokens
        WHERE jti = ?
        "#,
    )
    .bind(&claims.jti)
    .fetch_optional(pool.get_ref())
    .await
    {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Failed to look up refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let (record_id, admin_id) = match record {
        Some((id, admin_id, revoked)) if !revoked => (id, admin_id),
        _ => return HttpResponse::Unauthorized().finish(),
    };

    // rotate: revoke the old token before issuing a new pair
    if let Err(e) = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
        .bind(record_id)
        .execute(pool.get_ref())
        .await
    {
        error!(error = %e, "Failed to revoke refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let (new_refresh_token, new_claims) = match generate_refresh_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        &config.jwt_secret,
        config.refresh_token_ttl,
    ) {
        Ok(pair) => pair,
        Err(e) => {
            error!(error = %e, "Failed to sign refresh token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    if let Err(e) = sqlx::query(
        r#"
        INSERT INTO refresh_tokens (admin_id, jti, expires_at)
        VALUES (?, ?, FROM_UNIXTIME(?))
        "#,
    )
    .bind(admin_id)
    .bind(&new_claims.jti)
    .bind(new_claims.exp as i64)
    .execute(pool.get_ref())
    .await
    {
        error!(error = %e, "Failed to store refresh token");
        return HttpResponse::InternalServerError().finish();
    }

    let access_token = match generate_access_token(
        claims.user_id,
        claims.sub.clone(),
        claims.role,
        claims.employee_id,
        &config.jwt_secret,
        config.access_token_ttl,
    ) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "Failed to sign access token");
            return HttpResponse::InternalServerError().finish();
        }
    };

    HttpResponse::Ok().json(json!({
        "accessToken": access_token,
        "refreshToken": new_refresh_token
    }))
}

/// Revoke the presented refresh token (idempotent)
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> impl Responder {
    let header = match req.headers().get("Authorization") {
        Some(h) => h.to_str().unwrap_or(""),
        None => return HttpResponse::NoContent().finish(),
    };

    let token = match header.strip_prefix("Bearer ") {
        Some(t) => t,
        None => return HttpResponse::NoContent().finish(),
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(_) => return HttpResponse::NoContent().finish(),
    };

    // only refresh tokens can logout
    if claims.token_type != TokenType::Refresh {
        return HttpResponse::NoContent().finish();
    }

    let _ = sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE jti = ?")
        .bind(&claims.jti)
        .execute(pool.get_ref())
        .await;

    // success even if the token didn't exist
    HttpResponse::NoContent().finish()
}
