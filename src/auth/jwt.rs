use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::{Claims, TokenType};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

pub fn generate_access_token(
    user_id: u64,
    subject: String,
    role: u8,
    employee_id: Option<String>,
    secret: &str,
    ttl: usize,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id,
        sub: subject,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Access,
        employee_id,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn generate_refresh_token(
    user_id: u64,
    subject: String,
    role: u8,
    secret: &str,
    ttl: usize,
) -> Result<(String, Claims), jsonwebtoken::errors::Error> {
    let claims = Claims {
        user_id,
        sub: subject,
        role,
        exp: now() + ttl,
        jti: Uuid::new_v4().to_string(),
        token_type: TokenType::Refresh,
        employee_id: None,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok((token, claims))
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trips() {
        let token = generate_access_token(
            42,
            "EMP-001".into(),
            3,
            Some("EMP-001".into()),
            "test-secret",
            3600,
        )
        .unwrap();

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "EMP-001");
        assert_eq!(claims.role, 3);
        assert_eq!(claims.employee_id.as_deref(), Some("EMP-001"));
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token(1, "admin".into(), 1, None, "secret-a", 3600).unwrap();
        assert!(verify_token(&token, "secret-b").is_err());
    }

    #[test]
    fn refresh_token_carries_its_jti() {
        let (token, claims) =
            generate_refresh_token(1, "admin".into(), 1, "test-secret", 3600).unwrap();
        let decoded = verify_token(&token, "test-secret").unwrap();
        assert_eq!(decoded.jti, claims.jti);
        assert_eq!(decoded.token_type, TokenType::Refresh);
    }
}
