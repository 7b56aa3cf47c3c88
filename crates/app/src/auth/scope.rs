//! Request access scope.

/// Who is asking: an anonymous shopper or a verified admin session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AccessScope {
    #[default]
    Public,
    Admin,
}

impl AccessScope {
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}
