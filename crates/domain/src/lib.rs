#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod date;
mod error;
mod execution;
mod plan;
mod service;
mod session;
mod user;

pub use date::*;
pub use error::*;
pub use execution::*;
pub use plan::*;
pub use service::*;
pub use session::*;
pub use user::*;
