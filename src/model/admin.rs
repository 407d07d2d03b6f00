use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Admin {
    pub id: u64,
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub role_id: u8,
    pub is_active: bool,
}
