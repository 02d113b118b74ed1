pub mod element;
pub mod form;
pub mod navbar;
pub mod stopwatch;
