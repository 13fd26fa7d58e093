use serde::{Deserialize, Serialize};

pub use models::user::{Model as User, NewUser, UserPatch};

/// Create payload as received. Fields are optional so that a missing field is
/// reported as a validation failure rather than a decoding error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub profession: Option<String>,
    pub status: Option<String>,
}

impl CreateUserInput {
    /// All four fields present and non-empty.
    pub fn validate(self) -> Result<NewUser, Vec<&'static str>> {
        let mut missing = Vec::new();
        let name = required(self.name, "name", &mut missing);
        let email = required(self.email, "email", &mut missing);
        let profession = required(self.profession, "profession", &mut missing);
        let status = required(self.status, "status", &mut missing);
        match (name, email, profession, status) {
            (Some(name), Some(email), Some(profession), Some(status)) => {
                Ok(NewUser { name, email, profession, status })
            }
            _ => Err(missing),
        }
    }
}

fn required(value: Option<String>, field: &'static str, missing: &mut Vec<&'static str>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(field);
            None
        }
    }
}
