pub const FIRST_ACCESS_EMAIL_MISSING: &str = "Digite seu email para primeiro acesso.";
pub const FIRST_ACCESS_PASSWORD_ENTERED: &str = "Deixe a senha em branco para primeiro acesso.";

/// Availability of the first access link on the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstAccess {
    Enabled,
    Disabled(&'static str),
}

impl FirstAccess {
    /// An account without password is set up from an entered email and an empty password field.
    #[must_use]
    pub fn new(email: &str, password: &str) -> Self {
        if email.trim().is_empty() {
            FirstAccess::Disabled(FIRST_ACCESS_EMAIL_MISSING)
        } else if !password.is_empty() {
            FirstAccess::Disabled(FIRST_ACCESS_PASSWORD_ENTERED)
        } else {
            FirstAccess::Enabled
        }
    }

    #[must_use]
    pub fn is_enabled(self) -> bool {
        self == FirstAccess::Enabled
    }

    #[must_use]
    pub fn hint(self) -> Option<&'static str> {
        match self {
            FirstAccess::Enabled => None,
            FirstAccess::Disabled(hint) => Some(hint),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("a@b.com", "", FirstAccess::Enabled)]
    #[case("a@b.com", "x", FirstAccess::Disabled(FIRST_ACCESS_PASSWORD_ENTERED))]
    #[case("", "", FirstAccess::Disabled(FIRST_ACCESS_EMAIL_MISSING))]
    #[case("  ", "", FirstAccess::Disabled(FIRST_ACCESS_EMAIL_MISSING))]
    #[case("", "x", FirstAccess::Disabled(FIRST_ACCESS_EMAIL_MISSING))]
    fn test_first_access(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: FirstAccess,
    ) {
        assert_eq!(FirstAccess::new(email, password), expected);
    }

    #[test]
    fn test_first_access_hint() {
        assert_eq!(FirstAccess::Enabled.hint(), None);
        assert!(FirstAccess::Enabled.is_enabled());
        assert_eq!(
            FirstAccess::new("a@b.com", "x").hint(),
            Some("Deixe a senha em branco para primeiro acesso.")
        );
        assert!(!FirstAccess::new("", "").is_enabled());
    }
}
