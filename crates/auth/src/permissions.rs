use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings of the form `<module>:<action>`
/// (e.g. `users:delete`); a few older grants use `.` as the separator.
/// `"*"` grants everything and `"<module>:*"` grants every action of one
/// module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }

    /// Whether holding `self` satisfies `required`.
    pub fn grants(&self, required: &Permission) -> bool {
        if self.is_wildcard() || self == required {
            return true;
        }
        let held = self.as_str();
        match held.strip_suffix(":*").or_else(|| held.strip_suffix(".*")) {
            Some(module) => required
                .as_str()
                .strip_prefix(module)
                .is_some_and(|rest| rest.starts_with([':', '.'])),
            None => false,
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_wildcard_covers_only_its_module() {
        let users_all = Permission::new("users:*");
        assert!(users_all.grants(&Permission::new("users:delete")));
        assert!(!users_all.grants(&Permission::new("usersx:delete")));
        assert!(!users_all.grants(&Permission::new("roles:read")));

        let cases_all = Permission::new("cases.*");
        assert!(cases_all.grants(&Permission::new("cases.delete")));
        assert!(cases_all.grants(&Permission::new("cases:delete")));
    }

    #[test]
    fn global_wildcard_and_exact_match() {
        assert!(Permission::new("*").grants(&Permission::new("roles:update")));
        assert!(Permission::new("users:read").grants(&Permission::new("users:read")));
        assert!(!Permission::new("users:read").grants(&Permission::new("users:update")));
    }
}
