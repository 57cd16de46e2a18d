//! Client-side companion to the account service: a typed API client plus the
//! durable local caches a UI process keeps between runs (current session,
//! theme preference).

pub mod api;
pub mod session;
pub mod theme;
