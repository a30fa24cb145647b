//! Wire types for the Umami REST API
//!
//! Analytics endpoints return opaque JSON that is passed through as
//! [`serde_json::Value`]; only the auth and listing endpoints have typed shapes.

use serde::{Deserialize, Serialize};

/// Body of `POST /auth/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User summary returned by login
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginUser {
    pub id: String,
    pub username: String,
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Website {
    pub id: String,
    pub name: String,
    pub domain: String,
}

/// `{ "data": [...] }` envelope used by listing endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for DataList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_response_shape() {
        let resp: LoginResponse = serde_json::from_value(json!({
            "token": "abc",
            "user": {"id": "1", "username": "bob", "role": "admin"}
        }))
        .unwrap();
        assert_eq!(resp.token, "abc");
        assert_eq!(resp.user.username, "bob");
    }

    #[test]
    fn test_website_list_tolerates_extra_fields() {
        let list: DataList<Website> = serde_json::from_value(json!({
            "data": [{"id": "w1", "name": "Blog", "domain": "blog.example", "createdAt": "2024-01-01"}],
            "count": 1
        }))
        .unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].domain, "blog.example");
    }

    #[test]
    fn test_empty_data_list() {
        let list: DataList<Team> = serde_json::from_value(json!({})).unwrap();
        assert!(list.data.is_empty());
    }
}
