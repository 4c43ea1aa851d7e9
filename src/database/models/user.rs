use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An account holder. The password hash never leaves the server: it is
/// skipped on serialization, and there is deliberately no Deserialize.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_never_serializes() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Mara".to_string(),
            email: "mara@example.com".to_string(),
            password_hash: "$2b$12$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("passwordHash"));
        assert!(json.contains("mara@example.com"));
    }
}
