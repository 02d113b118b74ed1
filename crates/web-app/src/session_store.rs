use std::cell::RefCell;

use effort_domain::{Session, Token, User};
use log::{debug, error};

/// Persistence of the authenticated session.
///
/// User and token are written as a single value, so a failed write never leaves one without the
/// other.
#[allow(clippy::missing_errors_doc)]
pub trait SessionStorage {
    fn read_session(&self) -> Result<Option<Session>, Error>;
    fn write_session(&self, session: &Session) -> Result<(), Error>;
    fn delete_session(&self) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

pub type SubscriptionID = usize;

type Subscriber = Box<dyn Fn(Option<&Session>)>;

/// Holds the current session and keeps it in sync with its storage.
pub struct SessionStore<R> {
    storage: R,
    session: RefCell<Option<Session>>,
    subscribers: RefCell<Vec<(SubscriptionID, Subscriber)>>,
    next_subscription: RefCell<SubscriptionID>,
}

impl<R: SessionStorage> SessionStore<R> {
    pub fn new(storage: R) -> Self {
        let session = storage.read_session().unwrap_or_else(|err| {
            error!("failed to read session: {err}");
            None
        });
        Self {
            storage,
            session: RefCell::new(session),
            subscribers: RefCell::new(vec![]),
            next_subscription: RefCell::new(0),
        }
    }

    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.borrow().as_ref().map(|s| s.user.clone())
    }

    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.session.borrow().as_ref().map(|s| s.token.clone())
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// # Errors
    ///
    /// Returns an error if the session could not be persisted. The held session is unchanged in
    /// that case.
    pub fn set(&self, session: Session) -> Result<(), Error> {
        self.storage.write_session(&session)?;
        *self.session.borrow_mut() = Some(session);
        self.notify();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if the persisted session could not be removed. The held session is
    /// unchanged in that case.
    pub fn clear(&self) -> Result<(), Error> {
        self.storage.delete_session()?;
        let previous = self.session.borrow_mut().take();
        if previous.is_some() {
            debug!("session cleared");
        }
        self.notify();
        Ok(())
    }

    pub fn subscribe(&self, subscriber: impl Fn(Option<&Session>) + 'static) -> SubscriptionID {
        let mut next = self.next_subscription.borrow_mut();
        let id = *next;
        *next += 1;
        self.subscribers
            .borrow_mut()
            .push((id, Box::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionID) {
        self.subscribers
            .borrow_mut()
            .retain(|(subscription, _)| *subscription != id);
    }

    fn notify(&self) {
        let session = self.session();
        for (_, subscriber) in self.subscribers.borrow().iter() {
            subscriber(session.as_ref());
        }
    }
}
