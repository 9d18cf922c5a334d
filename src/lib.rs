#[macro_use]
extern crate log;

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod session;
pub mod view;

pub use api::{ElectionApi, HttpApi};
pub use bootstrap::Bootstrapper;
pub use config::Config;
pub use error::{Error, Result};
