//! Data model shared between the API client, the session, and the view.

pub mod api;
pub mod common;
