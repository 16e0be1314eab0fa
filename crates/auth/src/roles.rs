use core::str::FromStr;

use serde::{Deserialize, Serialize};

use hrdesk_core::DomainError;

/// Role of an authenticated principal.
///
/// The role set is closed: the server only ever issues one of these three
/// labels, so this is an enum rather than an opaque string. Wire spelling is
/// SCREAMING_SNAKE (`"ADMIN"`, `"HR"`, `"EMPLOYEE"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Human-resources staff.
    Hr,
    /// Regular employee (self-service only).
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Hr => "HR",
            Role::Employee => "EMPLOYEE",
        }
    }

    pub const fn all() -> [Role; 3] {
        [Role::Admin, Role::Hr, Role::Employee]
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "HR" => Ok(Role::Hr),
            "EMPLOYEE" => Ok(Role::Employee),
            other => Err(DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_spelling_is_screaming_snake() {
        for role in Role::all() {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));

            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert!("MANAGER".parse::<Role>().is_err());
        assert!("admin".parse::<Role>().is_err());
    }
}
