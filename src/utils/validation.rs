// ==================== REQUEST VALIDATION ====================
// Declarative per-field rules evaluated against the raw JSON body.
// Create mode is strict (missing fields fail), update mode only checks
// the fields that are actually present. No cross-field rules.

use crate::models::{AGE_GROUPS, GENDERS};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// How strictly the rule table is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every rule runs; an absent field counts as a violation
    Create,
    /// A rule runs only when its field appears in the body
    Update,
}

/// A single validation violation, reported back to the client
#[derive(Debug, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

type Check = fn(&Value) -> bool;

/// One field's rule: a predicate and message per mode
struct FieldRule {
    field: &'static str,
    create: (Check, &'static str),
    update: (Check, &'static str),
}

fn non_empty_string(v: &Value) -> bool {
    v.as_str().is_some_and(|s| !s.is_empty())
}

fn valid_age_group(v: &Value) -> bool {
    v.as_str().is_some_and(|s| AGE_GROUPS.contains(&s))
}

fn valid_gender(v: &Value) -> bool {
    v.as_str().is_some_and(|s| GENDERS.contains(&s))
}

fn boolean(v: &Value) -> bool {
    v.is_boolean()
}

fn min_ten_chars(v: &Value) -> bool {
    v.as_str().is_some_and(|s| s.chars().count() >= 10)
}

fn string_array(v: &Value) -> bool {
    v.as_array().is_some_and(|a| a.iter().all(Value::is_string))
}

fn non_empty_string_array(v: &Value) -> bool {
    v.as_array()
        .is_some_and(|a| !a.is_empty() && a.iter().all(Value::is_string))
}

const RULES: [FieldRule; 7] = [
    FieldRule {
        field: "firstName",
        create: (non_empty_string, "First Name is required"),
        update: (non_empty_string, "First Name cannot be empty"),
    },
    FieldRule {
        field: "lastName",
        create: (non_empty_string, "Last Name is required"),
        update: (non_empty_string, "Last Name cannot be empty"),
    },
    FieldRule {
        field: "ageGroup",
        create: (valid_age_group, "Invalid age group"),
        update: (valid_age_group, "Invalid age group"),
    },
    FieldRule {
        field: "gender",
        create: (valid_gender, "Invalid gender"),
        update: (valid_gender, "Invalid gender"),
    },
    FieldRule {
        field: "hasLaptop",
        create: (boolean, "Laptop ownership must be true or false"),
        update: (boolean, "Laptop ownership must be true or false"),
    },
    FieldRule {
        field: "bio",
        create: (min_ten_chars, "Bio must be at least 10 characters long"),
        update: (min_ten_chars, "Bio must be at least 10 characters long"),
    },
    FieldRule {
        field: "heardFrom",
        create: (
            non_empty_string_array,
            "Select at least one option for how you heard about us",
        ),
        update: (string_array, "Heard From must be an array"),
    },
];

/// Runs the rule table over `body` and collects every violation, in
/// rule-table order. An empty result means the request is valid.
pub fn validate_user(body: &Value, mode: Mode) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for rule in &RULES {
        let (check, message) = match mode {
            Mode::Create => rule.create,
            Mode::Update => rule.update,
        };

        let value = match body.get(rule.field) {
            Some(v) => v,
            None if mode == Mode::Update => continue,
            None => &Value::Null,
        };

        if !check(value) {
            errors.push(FieldError {
                field: rule.field.to_string(),
                message: message.to_string(),
            });
        }
    }

    errors
}

/// Parses a path identifier into an ObjectId. Failures are reported as
/// a field error so they can go out in the same 422 shape as body
/// violations, without ever touching the store.
pub fn parse_user_id(id: &str) -> Result<ObjectId, FieldError> {
    ObjectId::parse_str(id).map_err(|_| FieldError {
        field: "id".to_string(),
        message: "Invalid user ID format".to_string(),
    })
}
