//! Account Role
//!
//! Three tiers. `gestor` and `admin` are the elevated roles.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(i16)]
pub enum Role {
    #[default]
    #[serde(rename = "colaborador")]
    Member = 0,
    #[serde(rename = "gestor")]
    Manager = 1,
    #[serde(rename = "admin")]
    Admin = 2,
}

impl Role {
    /// Roles allowed on management routes
    pub const ELEVATED: &'static [Role] = &[Role::Manager, Role::Admin];

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    /// Wire name, as carried in tokens and JSON bodies
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Role::Member => "colaborador",
            Role::Manager => "gestor",
            Role::Admin => "admin",
        }
    }

    #[inline]
    pub const fn is_elevated(&self) -> bool {
        matches!(self, Role::Manager | Role::Admin)
    }

    pub fn from_id(id: i16) -> Option<Self> {
        match id {
            0 => Some(Role::Member),
            1 => Some(Role::Manager),
            2 => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "colaborador" => Some(Role::Member),
            "gestor" => Some(Role::Manager),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_id() {
        assert_eq!(Role::from_id(0), Some(Role::Member));
        assert_eq!(Role::from_id(1), Some(Role::Manager));
        assert_eq!(Role::from_id(2), Some(Role::Admin));
        assert_eq!(Role::from_id(7), None);
    }

    #[test]
    fn test_role_codes_roundtrip_through_serde() {
        for role in [Role::Member, Role::Manager, Role::Admin] {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.code()));
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
        assert_eq!(Role::from_code("superuser"), None);
    }

    #[test]
    fn test_elevated() {
        assert!(!Role::Member.is_elevated());
        assert!(Role::Manager.is_elevated());
        assert!(Role::Admin.is_elevated());
        assert_eq!(Role::ELEVATED, &[Role::Manager, Role::Admin]);
    }
}
