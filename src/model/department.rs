use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: u64,
    #[schema(example = "Engineering")]
    pub name: String,
    #[schema(example = "ENG")]
    pub code: String,
    pub description: Option<String>,
    pub is_active: bool,
}
