use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use hrdesk_core::{EmployeeProfile, UserId};

use crate::Role;

/// The authenticated identity of the signed-in user.
///
/// A `Principal` is immutable once fetched for a session: it is replaced
/// wholesale on re-login or re-verification, never partially mutated. This
/// type therefore exposes no mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    /// Linked employee record, when the account belongs to an employee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<EmployeeProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Principal {
    /// True when this principal's role is one of `roles`.
    ///
    /// An empty slice matches nothing.
    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: UserId::new(),
            email: "user@example.com".to_string(),
            role,
            employee: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn role_membership() {
        let p = principal(Role::Hr);
        assert!(p.has_any_role(&[Role::Admin, Role::Hr]));
        assert!(!p.has_any_role(&[Role::Admin]));
        assert!(!p.has_any_role(&[]));
    }

    #[test]
    fn deserializes_without_employee_link() {
        let json = r#"{
            "id": "018f2f6e-3333-7000-8000-000000000003",
            "email": "admin@example.com",
            "role": "ADMIN",
            "createdAt": "2023-06-01T08:00:00Z",
            "updatedAt": "2023-06-01T08:00:00Z"
        }"#;

        let p: Principal = serde_json::from_str(json).unwrap();
        assert_eq!(p.role, Role::Admin);
        assert!(p.employee.is_none());
    }
}
