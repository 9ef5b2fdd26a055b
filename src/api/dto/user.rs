//! User-related DTOs for API requests and responses.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{User, UserDraft};

/// Request body of create, replace and patch.
///
/// Every key is optional at the wire level; the service decides which are
/// required. An `id` key in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "email": "jane.doe@example.com",
    "firstname": "Jane",
    "lastname": "Doe",
    "birthdate": "1990-05-17",
    "address": "221B Baker Street",
    "phoneNumber": "+44 20 7946 0958"
}))]
pub struct UserRequest {
    #[schema(format = "email")]
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    #[schema(value_type = Option<String>, format = Date)]
    pub birthdate: Option<Date>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl UserRequest {
    pub fn into_draft(self) -> UserDraft {
        UserDraft {
            email: self.email,
            firstname: self.firstname,
            lastname: self.lastname,
            birthdate: self.birthdate,
            address: self.address,
            phone_number: self.phone_number,
        }
    }
}

/// A stored user as returned to callers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = 1)]
    pub id: i64,
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    #[schema(value_type = String, format = Date, example = "1990-05-17")]
    pub birthdate: Date,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            firstname: user.firstname,
            lastname: user.lastname,
            birthdate: user.birthdate,
            address: user.address,
            phone_number: user.phone_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_request_uses_camel_case_and_ignores_id() {
        let request: UserRequest = serde_json::from_str(
            r#"{"id": 77, "email": "a@b.com", "birthdate": "2000-02-29", "phoneNumber": "123"}"#,
        )
        .unwrap();

        let draft = request.into_draft();
        assert_eq!(draft.email.as_deref(), Some("a@b.com"));
        assert_eq!(draft.birthdate, Some(date(2000, 2, 29)));
        assert_eq!(draft.phone_number.as_deref(), Some("123"));
        assert_eq!(draft.firstname, None);
    }

    #[test]
    fn test_response_serializes_unset_optionals_as_null() {
        let response = UserResponse::from(User {
            id: 3,
            email: "a@b.com".to_string(),
            firstname: "A".to_string(),
            lastname: "B".to_string(),
            birthdate: date(1990, 1, 2),
            address: None,
            phone_number: None,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["birthdate"], "1990-01-02");
        assert!(json["address"].is_null());
        assert!(json["phoneNumber"].is_null());
        assert!(json.get("phone_number").is_none());
    }

    #[test]
    fn test_invalid_birthdate_is_rejected() {
        let result = serde_json::from_str::<UserRequest>(r#"{"birthdate": "2001-02-30"}"#);
        assert!(result.is_err());
    }
}
