#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Reachable without a session (login and first access).
    Public,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Allow,
    /// Stay on the page, but drop any leftover user data.
    ClearSession,
    ClearSessionAndRedirectToLogin,
    RedirectToHome,
}

/// Decides what happens when a page is entered.
///
/// Only the presence of a token is checked. Whether the server still accepts it becomes apparent
/// with the next request.
#[must_use]
pub fn decide(access: Access, has_token: bool) -> Gate {
    match (access, has_token) {
        (Access::Public, false) => Gate::ClearSession,
        (Access::Public, true) => Gate::RedirectToHome,
        (Access::Protected, false) => Gate::ClearSessionAndRedirectToLogin,
        (Access::Protected, true) => Gate::Allow,
    }
}
