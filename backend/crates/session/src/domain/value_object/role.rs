use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(i16)]
pub enum Role {
    #[default]
    User = 0,
    Moderator = 1,
    Admin = 2,
    SuperAdmin = 3,
}

impl Role {
    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            User => "user",
            Moderator => "moderator",
            Admin => "admin",
            SuperAdmin => "super_admin",
        }
    }

    /// Stored ids outside the known set are rejected rather than defaulted
    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        use Role::*;
        match id {
            0 => Some(User),
            1 => Some(Moderator),
            2 => Some(Admin),
            3 => Some(SuperAdmin),
            _ => {
                tracing::error!("Invalid Role id: {}", id);
                None
            }
        }
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        use Role::*;
        match code {
            "user" => Some(User),
            "moderator" => Some(Moderator),
            "admin" => Some(Admin),
            "super_admin" => Some(SuperAdmin),
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
        assert_eq!(Role::from_id(0), Some(Role::User));
        assert_eq!(Role::from_id(1), Some(Role::Moderator));
        assert_eq!(Role::from_id(2), Some(Role::Admin));
        assert_eq!(Role::from_id(3), Some(Role::SuperAdmin));
        assert_eq!(Role::from_id(9), None);
    }

    #[test]
    fn test_role_code_matches_serde() {
        for role in [Role::User, Role::Moderator, Role::Admin, Role::SuperAdmin] {
            let json = serde_json::to_value(role).unwrap();
            assert_eq!(json, serde_json::json!(role.code()));
            assert_eq!(Role::from_code(role.code()), Some(role));
        }
    }
}
