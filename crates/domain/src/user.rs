use derive_more::{AsRef, Deref, Display};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserID,
    pub name: String,
    pub email: String,
    pub kind: UserKind,
    pub student_code: Option<u32>,
    pub active: bool,
}

impl User {
    #[must_use]
    pub fn is_student(&self) -> bool {
        self.kind == UserKind::Student
    }
}

#[derive(AsRef, Deref, Display, Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserID(String);

impl UserID {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for UserID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKind {
    Student,
    Other(String),
}

impl From<&str> for UserKind {
    fn from(value: &str) -> Self {
        match value {
            "aluno" => UserKind::Student,
            other => UserKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for UserKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                UserKind::Student => "aluno",
                UserKind::Other(kind) => kind,
            }
        )
    }
}
