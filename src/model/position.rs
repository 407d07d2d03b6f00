use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: u64,
    #[schema(example = "Backend Developer")]
    pub name: String,
    #[schema(example = "BE-DEV")]
    pub code: String,
    pub description: Option<String>,
    pub is_active: bool,
}
