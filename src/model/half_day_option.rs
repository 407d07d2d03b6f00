use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct HalfDayOption {
    pub id: u64,
    #[schema(example = "morning")]
    pub code: String,
    #[schema(example = "Morning (08:00 - 12:00)")]
    pub label: String,
}
