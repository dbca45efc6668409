use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Allowed values for the `ageGroup` field
pub const AGE_GROUPS: [&str; 5] = ["<18", "18-24", "25-34", "35-44", "45+"];

/// Allowed values for the `gender` field
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Field names a client is allowed to set, in schema order.
/// Anything else in a request body is ignored.
pub const USER_FIELDS: [&str; 7] = [
    "firstName",
    "lastName",
    "ageGroup",
    "gender",
    "hasLaptop",
    "bio",
    "heardFrom",
];

/// User document (stored in MongoDB, `users` collection)
///
/// Field names are camelCase both on the wire and in BSON. The `_id`
/// is assigned by MongoDB on insert and never generated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub age_group: String,
    pub gender: String,
    pub has_laptop: bool,
    pub bio: String,
    pub heard_from: Vec<String>,
}

/// Request to create a user. Deserialized only after the validation
/// layer has accepted the raw body, so every field is present and typed.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub age_group: String,
    pub gender: String,
    pub has_laptop: bool,
    pub bio: String,
    pub heard_from: Vec<String>,
}

/// Request to update a user. Every field is optional; only supplied
/// fields are written (merge-update).
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub has_laptop: Option<bool>,
    pub bio: Option<String>,
    pub heard_from: Option<Vec<String>>,
}

/// Response shape for a user, with the ObjectId rendered as hex
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub age_group: String,
    pub gender: String,
    pub has_laptop: bool,
    pub bio: String,
    pub heard_from: Vec<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: u.first_name,
            last_name: u.last_name,
            age_group: u.age_group,
            gender: u.gender,
            has_laptop: u.has_laptop,
            bio: u.bio,
            heard_from: u.heard_from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(id: Option<ObjectId>) -> User {
        User {
            id,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            age_group: "25-34".into(),
            gender: "Female".into(),
            has_laptop: true,
            bio: "First programmer in history".into(),
            heard_from: vec!["friend".into()],
        }
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let json = serde_json::to_value(sample_user(None)).unwrap();
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["hasLaptop"], true);
        assert_eq!(json["heardFrom"][0], "friend");
        // _id must be omitted entirely when unset
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn test_response_renders_hex_id() {
        let oid = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
        let response = UserResponse::from(sample_user(Some(oid)));
        assert_eq!(response.id, "507f1f77bcf86cd799439011");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["id"], "507f1f77bcf86cd799439011");
        assert_eq!(json["ageGroup"], "25-34");
    }

    #[test]
    fn test_create_request_from_validated_body() {
        let body = serde_json::json!({
            "firstName": "A",
            "lastName": "B",
            "ageGroup": "18-24",
            "gender": "Other",
            "hasLaptop": true,
            "bio": "I like computers",
            "heardFrom": ["friend"],
            "extraneous": "ignored"
        });
        let request: CreateUserRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.first_name, "A");
        assert_eq!(request.heard_from, vec!["friend"]);
    }
}
