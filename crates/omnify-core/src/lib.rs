//! Core logic for the Omnify blogging client: configuration, session
//! management, the HTTP gateway, and the paginated feed controller.

pub mod client;
pub mod config;
pub mod error;
pub mod feed;
pub mod session;
