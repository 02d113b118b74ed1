use derive_more::{AsRef, Display};

use crate::{ReadError, StorageError, UpdateError, User};

pub const LOGIN_FALLBACK_MESSAGE: &str = "Erro ao fazer login";
pub const FIRST_ACCESS_FALLBACK_MESSAGE: &str = "Erro ao definir senha";
pub const NEW_PASSWORD_MIN_LENGTH: usize = 6;

#[allow(async_fn_in_trait)]
pub trait SessionService {
    async fn request_session(&self, credentials: Credentials) -> Result<Session, LoginError>;
    async fn define_initial_password(
        &self,
        credentials: Credentials,
    ) -> Result<(), FirstAccessError>;

    async fn log_in(&self, email: &str, password: &str) -> Result<Session, LoginError> {
        let credentials = Credentials::new(email, password)?;
        self.request_session(credentials).await
    }

    async fn set_initial_password(
        &self,
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<(), FirstAccessError> {
        let credentials = Credentials::new_initial(email, password, confirmation)?;
        self.define_initial_password(credentials).await
    }
}

#[allow(async_fn_in_trait)]
pub trait SessionRepository {
    async fn request_session(&self, credentials: &Credentials) -> Result<Session, ReadError>;
    async fn define_password(&self, credentials: &Credentials) -> Result<(), UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: Token,
}

impl Session {
    /// Only students may use the app, any other account type is refused before a session is
    /// stored.
    pub fn require_student(self) -> Result<Self, LoginError> {
        if self.user.is_student() {
            Ok(self)
        } else {
            Err(LoginError::NotStudent)
        }
    }
}

#[derive(AsRef, Display, Debug, Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(token: &str) -> Result<Self, StorageError> {
        if token.trim().is_empty() {
            return Err(StorageError::NoSession);
        }
        Ok(Self(token.to_string()))
    }

    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: Email,
    pub password: Password,
}

impl Credentials {
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        Ok(Self {
            email: Email::new(email)?,
            password: Password::new(password)?,
        })
    }

    pub fn new_initial(
        email: &str,
        password: &str,
        confirmation: &str,
    ) -> Result<Self, CredentialsError> {
        let email = Email::new(email)?;
        let password = Password::new_initial(password)?;
        password.confirm(confirmation)?;
        Ok(Self { email, password })
    }
}

#[derive(AsRef, Display, Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let email = email.trim();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }

        let Some((local, domain)) = email.split_once('@') else {
            return Err(EmailError::Invalid);
        };
        let Some((host, tld)) = domain.rsplit_once('.') else {
            return Err(EmailError::Invalid);
        };

        let valid_local = !local.is_empty()
            && local
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));
        let valid_host = !host.is_empty()
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || ".-".contains(c));
        let valid_tld = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

        if !(valid_local && valid_host && valid_tld) {
            return Err(EmailError::Invalid);
        }

        Ok(Self(email.to_string()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email é obrigatório")]
    Empty,
    #[error("Email inválido")]
    Invalid,
}

#[derive(AsRef, Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(password: &str) -> Result<Self, PasswordError> {
        if password.is_empty() {
            return Err(PasswordError::Empty);
        }
        Ok(Self(password.to_string()))
    }

    /// A password chosen on first access must have a minimum length.
    pub fn new_initial(password: &str) -> Result<Self, PasswordError> {
        let password = Self::new(password)?;
        let len = password.0.chars().count();
        if len < NEW_PASSWORD_MIN_LENGTH {
            return Err(PasswordError::TooShort(len));
        }
        Ok(password)
    }

    pub fn confirm(&self, confirmation: &str) -> Result<(), ConfirmationError> {
        if confirmation.is_empty() {
            return Err(ConfirmationError::Empty);
        }
        if self.0 != confirmation {
            return Err(ConfirmationError::Mismatch);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Senha é obrigatória")]
    Empty,
    #[error("Senha deve ter no mínimo 6 caracteres")]
    TooShort(usize),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Confirmação de senha é obrigatória")]
    Empty,
    #[error("As senhas não coincidem")]
    Mismatch,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CredentialsError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Confirmation(#[from] ConfirmationError),
}

#[derive(thiserror::Error, Debug)]
pub enum LoginError {
    #[error(transparent)]
    Validation(#[from] CredentialsError),
    #[error("Apenas alunos podem acessar este aplicativo")]
    NotStudent,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<ReadError> for LoginError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::Storage(storage) => LoginError::Storage(storage),
            ReadError::NotFound => LoginError::Other("login endpoint not found".into()),
            ReadError::Other(other) => LoginError::Other(other),
        }
    }
}

impl LoginError {
    /// The text shown to the user.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            LoginError::Validation(_) | LoginError::NotStudent => self.to_string(),
            LoginError::Storage(storage) => storage
                .server_message()
                .unwrap_or(LOGIN_FALLBACK_MESSAGE)
                .to_string(),
            LoginError::Other(_) => LOGIN_FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FirstAccessError {
    #[error(transparent)]
    Validation(#[from] CredentialsError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error>),
}

impl From<UpdateError> for FirstAccessError {
    fn from(value: UpdateError) -> Self {
        match value {
            UpdateError::Storage(storage) => FirstAccessError::Storage(storage),
            UpdateError::Conflict => FirstAccessError::Other("password already defined".into()),
            UpdateError::Other(other) => FirstAccessError::Other(other),
        }
    }
}

impl FirstAccessError {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            FirstAccessError::Validation(_) => self.to_string(),
            FirstAccessError::Storage(storage) => storage
                .server_message()
                .unwrap_or(FIRST_ACCESS_FALLBACK_MESSAGE)
                .to_string(),
            FirstAccessError::Other(_) => FIRST_ACCESS_FALLBACK_MESSAGE.to_string(),
        }
    }
}
