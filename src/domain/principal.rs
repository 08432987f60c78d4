//! Authenticated caller

use std::collections::HashSet;

/// Who is calling, as asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject: String,
    pub role: String,
}

impl Principal {
    pub fn new(subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            role: role.into(),
        }
    }

    pub fn is_privileged(&self, privileged_roles: &HashSet<String>) -> bool {
        privileged_roles.contains(&self.role)
    }
}

/// Privilege of an optional principal; anonymous callers are never privileged.
pub fn is_privileged(principal: Option<&Principal>, privileged_roles: &HashSet<String>) -> bool {
    principal.is_some_and(|p| p.is_privileged(privileged_roles))
}
