use crate::api::department::{CreateDepartment, UpdateDepartment};
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::half_day_option::{CreateHalfDayOption, UpdateHalfDayOption};
use crate::api::leave_request::{
    AdminCreateLeave, CalendarQuery, CreateLeave, LeaveFilter, SetLeaveStatus, StatisticsQuery,
};
use crate::api::position::{CreatePosition, UpdatePosition};
use crate::leave::calendar::{CalendarDay, EventSummary};
use crate::leave::record::{HalfDaySlot, LeaveStatus, LeaveType};
use crate::leave::statistics::EmployeeStatistic;
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::half_day_option::HalfDayOption;
use crate::model::leave_request::{Attachment, LeaveRequest};
use crate::model::position::Position;
use crate::models::{AdminLoginDto, EmployeeAuthDto};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management System

This API powers a **leave management** backend for employees, department heads and administrators.

### 🔹 Key Features
- **Leave Requests**
  - Full-day, half-day and hourly requests with optional attachments
  - Approve/reject workflow with reviewer audit fields
- **Company Calendar**
  - Per-day view of every approved leave in a month
- **Statistics**
  - Per-employee day/hour totals by month, quarter or year
- **Catalogs**
  - Employees, departments, positions and half-day slot labels

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Admins sign in with a password; employees authenticate with their employee code.

### 📦 Response Format
- JSON-based RESTful responses with camelCase field names

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::admin_login,
        crate::auth::handlers::employee_auth,

        crate::api::leave_request::list_leaves,
        crate::api::leave_request::my_requests,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::admin_create_leave,
        crate::api::leave_request::update_leave_details,
        crate::api::leave_request::set_leave_status,
        crate::api::leave_request::delete_leave,
        crate::api::leave_request::company_calendar,
        crate::api::leave_request::leave_statistics,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::employees_by_department,

        crate::api::department::list_departments,
        crate::api::department::active_departments,
        crate::api::department::get_department,
        crate::api::department::create_department,
        crate::api::department::update_department,
        crate::api::department::delete_department,

        crate::api::position::list_positions,
        crate::api::position::active_positions,
        crate::api::position::get_position,
        crate::api::position::create_position,
        crate::api::position::update_position,
        crate::api::position::delete_position,

        crate::api::half_day_option::list_options,
        crate::api::half_day_option::create_option,
        crate::api::half_day_option::update_option,
        crate::api::half_day_option::delete_option
    ),
    components(
        schemas(
            AdminLoginDto,
            EmployeeAuthDto,
            LeaveType,
            HalfDaySlot,
            LeaveStatus,
            LeaveRequest,
            Attachment,
            CreateLeave,
            AdminCreateLeave,
            SetLeaveStatus,
            LeaveFilter,
            CalendarQuery,
            StatisticsQuery,
            CalendarDay,
            EventSummary,
            EmployeeStatistic,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            Department,
            CreateDepartment,
            UpdateDepartment,
            Position,
            CreatePosition,
            UpdatePosition,
            HalfDayOption,
            CreateHalfDayOption,
            UpdateHalfDayOption
        )
    ),
    tags(
        (name = "Auth", description = "Admin and employee authentication APIs"),
        (name = "Leave", description = "Leave request, calendar and statistics APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Department", description = "Department catalog APIs"),
        (name = "Position", description = "Position catalog APIs"),
        (name = "HalfDayOption", description = "Half-day slot catalog APIs"),
    )
)]
pub struct ApiDoc;
