//! Application services: store, search pipeline and view sessions.

pub mod debounce;
pub mod detail;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod repos;
pub mod store;
