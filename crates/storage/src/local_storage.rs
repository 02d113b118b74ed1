use std::collections::VecDeque;

use effort_domain as domain;
use effort_web_app::{log, session_store};
use gloo_storage::Storage as GlooStorage;
use serde::{Deserialize, Serialize};

use crate::rest;

const KEY_SESSION: &str = "session";
const KEY_LOG: &str = "log";

#[derive(Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// The token of the stored session, if any.
    #[must_use]
    pub fn token(&self) -> Option<domain::Token> {
        use session_store::SessionStorage;

        self.read_session().ok().flatten().map(|session| session.token)
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    usuario: rest::User,
    token: String,
}

impl session_store::SessionStorage for LocalStorage {
    fn read_session(&self) -> Result<Option<domain::Session>, session_store::Error> {
        let stored = match gloo_storage::LocalStorage::get::<StoredSession>(KEY_SESSION) {
            Ok(stored) => stored,
            Err(gloo_storage::errors::StorageError::KeyNotFound(_)) => return Ok(None),
            Err(err) => return Err(session_store::Error::Unknown(err.to_string())),
        };
        Ok(Some(domain::Session {
            user: stored.usuario.into(),
            token: domain::Token::new(&stored.token)
                .map_err(|err| session_store::Error::Unknown(err.to_string()))?,
        }))
    }

    fn write_session(&self, session: &domain::Session) -> Result<(), session_store::Error> {
        gloo_storage::LocalStorage::set(
            KEY_SESSION,
            StoredSession {
                usuario: rest::User::from(&session.user),
                token: session.token.to_string(),
            },
        )
        .map_err(|err| session_store::Error::Unknown(err.to_string()))
    }

    fn delete_session(&self) -> Result<(), session_store::Error> {
        gloo_storage::LocalStorage::delete(KEY_SESSION);
        Ok(())
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::append(&mut entries, entry);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
