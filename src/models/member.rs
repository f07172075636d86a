//! Member model matching the signup form and admin dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Study year a member selects on the signup form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Year {
    #[serde(rename = "1")]
    First,
    #[serde(rename = "2")]
    Second,
    #[serde(rename = "3")]
    Third,
    #[serde(rename = "4")]
    Fourth,
    #[serde(rename = "5")]
    Fifth,
    #[serde(rename = "graduate")]
    Graduate,
}

impl Year {
    pub fn as_str(&self) -> &'static str {
        match self {
            Year::First => "1",
            Year::Second => "2",
            Year::Third => "3",
            Year::Fourth => "4",
            Year::Fifth => "5",
            Year::Graduate => "graduate",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1" => Some(Year::First),
            "2" => Some(Year::Second),
            "3" => Some(Year::Third),
            "4" => Some(Year::Fourth),
            "5" => Some(Year::Fifth),
            "graduate" => Some(Year::Graduate),
            _ => None,
        }
    }

    /// Display label, e.g. "2nd Year" or "Graduate".
    pub fn label(&self) -> &'static str {
        match self {
            Year::First => "1st Year",
            Year::Second => "2nd Year",
            Year::Third => "3rd Year",
            Year::Fourth => "4th Year",
            Year::Fifth => "5th Year",
            Year::Graduate => "Graduate",
        }
    }
}

/// A persisted TYTC signup. Never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub university: String,
    #[serde(default)]
    pub course: String,
    /// One of `1`..`5`, `graduate`, or empty.
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub motivation: String,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    /// Build a new record from a join request with server-assigned id and timestamp.
    pub fn from_request(id: String, request: JoinRequest, joined_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: request.name,
            email: request.email,
            university: request.university,
            course: request.course,
            year: request.year,
            phone: request.phone,
            motivation: request.motivation,
            joined_at,
        }
    }
}

/// Request body for joining TYTC.
///
/// Every field defaults to empty and accepts `null` or any scalar, so that
/// missing or odd fields surface as validation errors instead of
/// deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub university: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub motivation: String,
}

impl JoinRequest {
    /// Check required fields, email shape and year.
    ///
    /// Returns the first problem found as a human-readable message.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".to_string());
        }
        if !looks_like_email(self.email.trim()) {
            return Err("Email address is invalid".to_string());
        }
        if self.university.trim().is_empty() {
            return Err("University is required".to_string());
        }
        if !self.year.is_empty() && Year::from_str(&self.year).is_none() {
            return Err(format!("Unknown year {:?}", self.year));
        }
        Ok(())
    }
}

/// `null` becomes empty, strings pass through, other values keep their JSON text.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Basic `local@domain.tld` shape check. Not an RFC 5322 parser.
fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Response body for a successful join.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    pub success: bool,
    pub message: String,
    pub member_id: String,
}

/// Response body for the member count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCount {
    pub count: i64,
}

/// Response body for the admin member listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberList {
    pub members: Vec<Member>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> JoinRequest {
        JoinRequest {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            university: "Unilag".to_string(),
            year: "2".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(ada().validate().is_ok());
    }

    #[test]
    fn test_missing_required_fields() {
        let mut req = ada();
        req.name = "  ".to_string();
        assert_eq!(req.validate().unwrap_err(), "Name is required");

        let mut req = ada();
        req.university.clear();
        assert_eq!(req.validate().unwrap_err(), "University is required");
    }

    #[test]
    fn test_email_shape() {
        for bad in ["ada", "ada@", "@x.com", "ada@x", "ada@@x.com", "a da@x.com", "ada@.com"] {
            let mut req = ada();
            req.email = bad.to_string();
            assert!(req.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_year_values() {
        let mut req = ada();
        req.year.clear();
        assert!(req.validate().is_ok());

        req.year = "graduate".to_string();
        assert!(req.validate().is_ok());

        req.year = "6".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_year_labels() {
        assert_eq!(Year::from_str("3").map(|y| y.label()), Some("3rd Year"));
        assert_eq!(Year::Graduate.as_str(), "graduate");
        assert_eq!(serde_json::to_value(Year::Second).unwrap(), "2");
    }

    #[test]
    fn test_member_json_is_camel_case() {
        let member = Member::from_request(
            "member_1_abc".to_string(),
            ada(),
            "2024-12-15T10:00:00Z".parse().unwrap(),
        );
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["joinedAt"], "2024-12-15T10:00:00Z");
        assert_eq!(json["year"], "2");
        assert_eq!(json["course"], "");
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let req: JoinRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@x.com",
            "university": "Unilag"
        }))
        .unwrap();
        assert!(req.course.is_empty());
        assert!(req.year.is_empty());
    }

    #[test]
    fn test_null_and_scalar_fields_are_accepted() {
        let req: JoinRequest = serde_json::from_value(serde_json::json!({
            "name": "Ada",
            "email": "ada@x.com",
            "university": "Unilag",
            "course": null,
            "year": 2,
            "phone": null,
            "motivation": true
        }))
        .unwrap();
        assert_eq!(req.course, "");
        assert_eq!(req.year, "2");
        assert_eq!(req.phone, "");
        assert_eq!(req.motivation, "true");
        assert!(req.validate().is_ok());
    }
}
