//! User identity records and permission roles.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission tier attached to a user.
///
/// Roles gate which back-office views and actions are available. The set is
/// fixed; records with an unknown role string fail to parse rather than
/// silently mapping to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Front-counter sales and payment entry
    Cashier,
    /// Print design and prepress work
    Designer,
    /// Production machine operator
    Operator,
    /// Back-office administration
    Admin,
    /// Shift supervision and approvals
    Supervisor,
    /// Business owner
    Owner,
    /// Personal/self-service account
    Me,
    /// Chief executive
    Ceo,
}

impl Role {
    /// All roles, in permission-tier order from least to most privileged.
    pub const ALL: &'static [Role] = &[
        Role::Me,
        Role::Cashier,
        Role::Designer,
        Role::Operator,
        Role::Supervisor,
        Role::Admin,
        Role::Owner,
        Role::Ceo,
    ];

    /// Returns the lowercase wire representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Cashier => "cashier",
            Role::Designer => "designer",
            Role::Operator => "operator",
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Owner => "owner",
            Role::Me => "me",
            Role::Ceo => "ceo",
        }
    }

    /// Parses a role from its lowercase wire representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not name a known role.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim() {
            "cashier" => Ok(Role::Cashier),
            "designer" => Ok(Role::Designer),
            "operator" => Ok(Role::Operator),
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "owner" => Ok(Role::Owner),
            "me" => Ok(Role::Me),
            "ceo" => Ok(Role::Ceo),
            other => bail!("Unknown role: {other}"),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity record for a signed-in person.
///
/// Owned by the external auth provider; this core never mutates users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable identifier assigned by the auth provider
    pub id: String,
    /// Display name
    pub name: String,
    /// Contact email, if the provider supplies one
    #[serde(default)]
    pub email: Option<String>,
    /// Permission tier
    pub role: Role,
}

impl User {
    /// Creates a user record with no email.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()).unwrap(), *role);
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!(Role::parse("manager").is_err());
        assert!(Role::parse("").is_err());
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Ceo).unwrap();
        assert_eq!(json, "\"ceo\"");

        let role: Role = serde_json::from_str("\"cashier\"").unwrap();
        assert_eq!(role, Role::Cashier);
    }

    #[test]
    fn test_user_serde_defaults_email() {
        let user: User =
            serde_json::from_str(r#"{"id":"u1","name":"Ana","role":"cashier"}"#).unwrap();
        assert_eq!(user.email, None);
        assert_eq!(user.role, Role::Cashier);
    }
}
