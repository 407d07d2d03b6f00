use crate::auth::auth::AuthUser;
use crate::leave::calendar::{expand, CalendarDay};
use crate::leave::period::Period;
use crate::leave::record::{hhmm, HalfDaySlot, LeaveStatus, LeaveType};
use crate::leave::statistics::{summarize, EmployeeStatistic};
use crate::model::employee::Employee;
use crate::model::leave_request::{Attachment, LeaveRequest};
use crate::utils::db_utils::{build_update_sql, execute_update};
use actix_web::{error::ErrorInternalServerError, web, HttpResponse, Responder};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use sqlx::MySqlPool;
use std::str::FromStr;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

const LEAVE_COLUMNS: &str = "id, employee_id, employee_name, department, leave_type, \
     half_day_type, start_date, end_date, start_time, end_time, reason, attachments, \
     status, approved_by, approved_at, rejection_reason, created_at";

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLeave {
    pub leave_type: LeaveType,
    pub half_day_type: Option<HalfDaySlot>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default, with = "hhmm")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm")]
    #[schema(example = "17:30", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = "Family matters")]
    pub reason: Option<String>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminCreateLeave {
    #[schema(example = "EMP-001")]
    pub employee_id: String,
    pub leave_type: LeaveType,
    pub half_day_type: Option<HalfDaySlot>,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(default, with = "hhmm")]
    #[schema(example = "09:00", value_type = Option<String>)]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm")]
    #[schema(example = "17:30", value_type = Option<String>)]
    pub end_time: Option<NaiveTime>,
    #[schema(example = "Offsite training")]
    pub reason: Option<String>,
}

impl AdminCreateLeave {
    fn as_create(&self) -> CreateLeave {
        CreateLeave {
            leave_type: self.leave_type,
            half_day_type: self.half_day_type,
            start_date: self.start_date,
            end_date: self.end_date,
            start_time: self.start_time,
            end_time: self.end_time,
            reason: self.reason.clone(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetLeaveStatus {
    pub status: LeaveStatus,
    #[schema(example = "Roster too thin that week")]
    pub rejection_reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveFilter {
    /// Filter by leave status
    #[param(example = "pending")]
    pub status: Option<String>,
    /// Filter by employee code
    #[param(example = "EMP-001")]
    pub employee_id: Option<String>,
    /// Range filter: earliest start date
    #[param(example = "2024-01-01")]
    pub start_date: Option<NaiveDate>,
    /// Range filter: latest end date
    #[param(example = "2024-01-31")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct CalendarQuery {
    #[param(example = 2024)]
    pub year: Option<i32>,
    #[param(example = 1)]
    pub month: Option<u32>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    #[param(example = 2024)]
    pub year: Option<i32>,
    #[param(example = 1)]
    pub month: Option<u32>,
    #[param(example = 1)]
    pub quarter: Option<u32>,
    #[param(example = "EMP-001")]
    pub employee_id: Option<String>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    Str(String),
    Date(NaiveDate),
}

fn validate_shape(payload: &CreateLeave) -> Result<(), &'static str> {
    if payload.start_date > payload.end_date {
        return Err("Start date cannot be after end date");
    }
    match payload.leave_type {
        LeaveType::Hourly => {
            let (Some(start), Some(end)) = (payload.start_time, payload.end_time) else {
                return Err("Start time and end time are required for hourly leave");
            };
            if start >= end {
                return Err("Start time must be before end time");
            }
        }
        LeaveType::HalfDay => {
            if payload.half_day_type.is_none() {
                return Err("Half day type is required");
            }
        }
        LeaveType::FullDay => {}
    }
    Ok(())
}

async fn fetch_employee(pool: &MySqlPool, code: &str) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_id, name, department, position, email, phone, status, join_date
        FROM employees
        WHERE employee_id = ?
        "#,
    )
    .bind(code)
    .fetch_optional(pool)
    .await
}

async fn insert_leave(
    pool: &MySqlPool,
    employee: &Employee,
    payload: &CreateLeave,
) -> Result<(), sqlx::Error> {
    // only the fields legal for the chosen type are persisted
    let half_day_type = match payload.leave_type {
        LeaveType::HalfDay => payload.half_day_type.map(|s| s.to_string()),
        _ => None,
    };
    let (start_time, end_time) = match payload.leave_type {
        LeaveType::Hourly => (payload.start_time, payload.end_time),
        _ => (None, None),
    };

    sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, employee_name, department, leave_type, half_day_type,
             start_date, end_date, start_time, end_time, reason, attachments, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(&employee.employee_id)
    .bind(&employee.name)
    .bind(&employee.department)
    .bind(payload.leave_type.to_string())
    .bind(half_day_type)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(start_time)
    .bind(end_time)
    .bind(&payload.reason)
    .bind(sqlx::types::Json(&payload.attachments))
    .execute(pool)
    .await?;

    Ok(())
}

/* =========================
List leave requests (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave requests, newest first", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status.to_string()));
    }

    if let Some(employee_id) = query.employee_id.as_deref() {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::Str(employee_id.to_string()));
    }

    if let (Some(start), Some(end)) = (query.start_date, query.end_date) {
        where_sql.push_str(" AND start_date >= ? AND end_date <= ?");
        args.push(FilterValue::Date(start));
        args.push(FilterValue::Date(end));
    }

    let data_sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests{where_sql} ORDER BY created_at DESC"
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::Str(s) => data_q.bind(s),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let leaves = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch leave requests");
        ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Own leave requests (employee)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/my-requests",
    responses(
        (status = 200, description = "Requesting employee's leave requests", body = Vec<LeaveRequest>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn my_requests(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY created_at DESC"
    );

    let leaves = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(&employee_id)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, %employee_id, "Failed to fetch own leave requests");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Get one leave request (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let id = path.into_inner();

    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");

    let leave = sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to fetch leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    match leave {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        }))),
    }
}

/* =========================
Create leave request (employee)
========================= */
#[utoipa::path(
    post,
    path = "/api/leave-requests",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted",
            "status": "pending"
        })),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    if let Err(message) = validate_shape(&payload) {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    let employee = fetch_employee(pool.get_ref(), &employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, %employee_id, "Failed to fetch employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(employee) = employee else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    insert_leave(pool.get_ref(), &employee, &payload)
        .await
        .map_err(|e| {
            error!(error = %e, %employee_id, "Failed to create leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave request submitted",
        "status": "pending"
    })))
}

/* =========================
Create leave for any employee (admin)
========================= */
#[utoipa::path(
    post,
    path = "/api/leave-requests/admin",
    request_body = AdminCreateLeave,
    responses(
        (status = 201, description = "Leave request created"),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn admin_create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AdminCreateLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leave = payload.as_create();

    if let Err(message) = validate_shape(&leave) {
        return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
    }

    let employee = fetch_employee(pool.get_ref(), &payload.employee_id)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = %payload.employee_id, "Failed to fetch employee");
            ErrorInternalServerError("Internal Server Error")
        })?;

    let Some(employee) = employee else {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Employee not found"
        })));
    };

    insert_leave(pool.get_ref(), &employee, &leave)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id = %payload.employee_id, "Failed to create leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave request created",
        "status": "pending"
    })))
}

/* =========================
Edit details (admin)
========================= */
/// Maps camelCase payload keys onto UPDATE columns. Only whitelisted keys
/// reach the SQL builder.
fn details_columns(body: &Value) -> Result<Map<String, Value>, &'static str> {
    let obj = body.as_object().ok_or("Payload must be a JSON object")?;

    let mut columns = Map::new();
    for (key, value) in obj {
        let column = match key.as_str() {
            "leaveType" => {
                let Some(s) = value.as_str() else {
                    return Err("Invalid leave type. Allowed: full_day, half_day, hourly");
                };
                if LeaveType::from_str(s).is_err() {
                    return Err("Invalid leave type. Allowed: full_day, half_day, hourly");
                }
                "leave_type"
            }
            "halfDayType" => {
                if let Some(s) = value.as_str() {
                    if HalfDaySlot::from_str(s).is_err() {
                        return Err("Invalid half day type. Allowed: morning, afternoon, evening");
                    }
                } else if !value.is_null() {
                    return Err("Invalid half day type. Allowed: morning, afternoon, evening");
                }
                "half_day_type"
            }
            "startDate" => "start_date",
            "endDate" => "end_date",
            "startTime" => "start_time",
            "endTime" => "end_time",
            "reason" => "reason",
            _ => return Err("Unknown field in details payload"),
        };
        columns.insert(column.to_string(), value.clone());
    }

    Ok(columns)
}

#[utoipa::path(
    put,
    path = "/api/leave-requests/{id}/details",
    params(("id" = u64, Path, description = "Leave request ID")),
    request_body(
        content = Object,
        description = "Any of leaveType, halfDayType, startDate, endDate, startTime, endTime, reason",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request updated"),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn update_leave_details(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let columns = match details_columns(&body) {
        Ok(c) => c,
        Err(message) => {
            return Ok(HttpResponse::BadRequest().json(json!({ "message": message })));
        }
    };

    let update = build_update_sql("leave_requests", &Value::Object(columns), "id", id as i64)?;

    let affected = execute_update(pool.get_ref(), update).await.map_err(|e| {
        error!(error = %e, id, "Failed to update leave request details");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request updated"
    })))
}

/* =========================
Approve / reject (admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "Leave request ID")),
    request_body = SetLeaveStatus,
    responses(
        (status = 200, description = "Status updated"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn set_leave_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<SetLeaveStatus>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let id = path.into_inner();

    let result = if payload.status == LeaveStatus::Rejected {
        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, approved_by = ?, approved_at = NOW(), rejection_reason = ?
            WHERE id = ?
            "#,
        )
        .bind(payload.status.to_string())
        .bind(&auth.subject)
        .bind(&payload.rejection_reason)
        .bind(id)
        .execute(pool.get_ref())
        .await
    } else {
        sqlx::query(
            r#"
            UPDATE leave_requests
            SET status = ?, approved_by = ?, approved_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(payload.status.to_string())
        .bind(&auth.subject)
        .bind(id)
        .execute(pool.get_ref())
        .await
    };

    let result = result.map_err(|e| {
        error!(error = %e, id, "Failed to update leave status");
        ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave status updated"
    })))
}

/* =========================
Delete (admin)
========================= */
#[utoipa::path(
    delete,
    path = "/api/leave-requests/{id}",
    params(("id" = u64, Path, description = "Leave request ID")),
    responses(
        (status = 200, description = "Leave request deleted"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn delete_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let id = path.into_inner();

    let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, id, "Failed to delete leave request");
            ErrorInternalServerError("Internal Server Error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Leave request not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request deleted successfully"
    })))
}

/* =========================
Company calendar
========================= */
#[utoipa::path(
    get,
    path = "/api/leave-requests/calendar/company",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Per-day event buckets", body = Vec<CalendarDay>),
        (status = 400, description = "Invalid month")
    ),
    tag = "Leave"
)]
pub async fn company_calendar(
    pool: web::Data<MySqlPool>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    let mut sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE status = 'approved'"
    );
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;

    if let (Some(year), Some(month)) = (query.year, query.month) {
        let period = Period::Month { year, month };
        let Some(range) = period.bounds() else {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid month"
            })));
        };
        // overlap, not containment: spans straddling the month are included
        sql.push_str(" AND start_date <= ? AND end_date >= ?");
        bounds = Some(range);
    }

    sql.push_str(" ORDER BY start_date ASC");

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&sql);
    if let Some((first, last)) = bounds {
        data_q = data_q.bind(last).bind(first);
    }

    let rows = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch calendar records");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let records: Vec<_> = rows.iter().filter_map(|row| row.to_record()).collect();

    Ok(HttpResponse::Ok().json(expand(&records)))
}

/* =========================
Statistics summary
========================= */
fn resolve_period(query: &StatisticsQuery) -> Option<Period> {
    match (query.year, query.quarter, query.month) {
        (Some(year), Some(quarter), _) => Some(Period::Quarter { year, quarter }),
        (Some(year), None, Some(month)) => Some(Period::Month { year, month }),
        (Some(year), None, None) => Some(Period::Year { year }),
        _ => None,
    }
}

#[utoipa::path(
    get,
    path = "/api/leave-requests/statistics/summary",
    params(StatisticsQuery),
    responses(
        (status = 200, description = "Per-employee totals", body = Vec<EmployeeStatistic>),
        (status = 400, description = "Invalid month or quarter"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn leave_statistics(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<StatisticsQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_reviewer()?;

    let mut sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE status = 'approved'"
    );
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;

    if let Some(period) = resolve_period(&query) {
        let Some(range) = period.bounds() else {
            return Ok(HttpResponse::BadRequest().json(json!({
                "message": "Invalid month or quarter"
            })));
        };
        // overlap, not containment: matched records count in full
        sql.push_str(" AND start_date <= ? AND end_date >= ?");
        bounds = Some(range);
    }

    if query.employee_id.is_some() {
        sql.push_str(" AND employee_id = ?");
    }

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&sql);
    if let Some((first, last)) = bounds {
        data_q = data_q.bind(last).bind(first);
    }
    if let Some(employee_id) = query.employee_id.as_deref() {
        data_q = data_q.bind(employee_id.to_string());
    }

    let rows = data_q.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch statistics records");
        ErrorInternalServerError("Internal Server Error")
    })?;

    let records: Vec<_> = rows.iter().filter_map(|row| row.to_record()).collect();

    Ok(HttpResponse::Ok().json(summarize(&records)))
}
