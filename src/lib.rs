//! spcweb - Session client for the Vanderbilt SPC panel web interface
//!
//! The panel has no API, only HTML pages for people. This crate logs in,
//! keeps the session token alive, sends arm/disarm/inhibit commands and
//! scrapes arm state and zone status out of the rendered pages.

pub mod command;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod parser;
pub mod session;

pub use error::{Error, LoginFailure, Result};
pub use http::{HttpClient, HttpOptions, Transport};
pub use models::{ArmState, Credentials, Zone};
pub use session::SessionClient;
