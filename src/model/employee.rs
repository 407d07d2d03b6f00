use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(
    example = json!({
        "id": 1,
        "employeeId": "EMP-001",
        "name": "Alice Nguyen",
        "department": "Engineering",
        "position": "Backend Developer",
        "email": "alice.nguyen@company.com",
        "phone": "+84901234567",
        "status": "active",
        "joinDate": "2023-06-01"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_id: String,

    #[schema(example = "Alice Nguyen")]
    pub name: String,

    #[schema(example = "Engineering")]
    pub department: String,

    #[schema(example = "Backend Developer")]
    pub position: String,

    #[schema(example = "alice.nguyen@company.com")]
    pub email: String,

    #[schema(example = "+84901234567")]
    pub phone: String,

    #[schema(example = "active")]
    pub status: String,

    #[schema(example = "2023-06-01", value_type = String, format = "date")]
    pub join_date: NaiveDate,
}
