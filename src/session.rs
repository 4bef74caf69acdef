//! Web session with an SPC panel
//!
//! Holds the session token and the panel identity, logs in on demand and
//! logs in again once when the panel reports the session as expired.

use crate::command::{self, Command, PageRequest};
use crate::error::{Error, LoginFailure, Result};
use crate::http::{HttpClient, HttpOptions, Transport};
use crate::models::{ArmState, Credentials, Zone};
use crate::parser;

/// Session client for one panel.
///
/// Calls must not overlap: the token is shared state and every call takes
/// `&mut self`.
pub struct SessionClient<T: Transport = HttpClient> {
    transport: T,
    credentials: Credentials,
    sid: String,
    model: String,
    serial_number: String,
    site: String,
}

impl SessionClient<HttpClient> {
    /// Connect to the panel at `url` over HTTP(S)
    pub fn connect(url: &str, credentials: Credentials, options: &HttpOptions) -> Result<Self> {
        let transport = HttpClient::with_options(url, options)?;
        Ok(Self::new(transport, credentials))
    }
}

impl<T: Transport> SessionClient<T> {
    pub fn new(transport: T, credentials: Credentials) -> Self {
        Self {
            transport,
            credentials,
            sid: String::new(),
            model: String::new(),
            serial_number: String::new(),
            site: String::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn site(&self) -> &str {
        &self.site
    }

    pub fn session_id(&self) -> &str {
        &self.sid
    }

    pub fn is_authenticated(&self) -> bool {
        !self.sid.is_empty()
    }

    /// Display name for the panel: the site name if it has one
    pub fn device_name(&self) -> &str {
        if self.site.is_empty() {
            "SPC Panel"
        } else {
            &self.site
        }
    }

    /// Stable prefix for identifiers derived from this panel
    pub fn unique_prefix(&self) -> String {
        format!("spc{}", self.serial_number)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Log in and populate the session token, serial number, model and site
    pub async fn login(&mut self) -> Result<()> {
        tracing::info!("Logging in to SPC panel as {}", self.credentials.userid);

        let html = self.fetch(&command::login_request(&self.credentials)).await?;

        if parser::is_login_page(&html) {
            let failure = if parser::is_access_denied(&html) {
                LoginFailure::AccessDenied
            } else {
                LoginFailure::StillOnLoginPage
            };
            return Err(Error::Login(failure));
        }

        self.sid = parser::parse_session_id(&html)?;
        self.serial_number = parser::parse_serial_number(&html);
        tracing::info!(
            "Logged in to {} (S/N {}) at '{}'",
            self.model,
            self.serial_number,
            self.site
        );
        Ok(())
    }

    /// Current arm state of all areas, as the panel words it
    pub async fn get_arm_state(&mut self) -> Result<String> {
        let html = self.run(Command::GetArmState).await?;
        parser::parse_arm_state(&html)
    }

    /// Request a new arm state for all areas and return the resulting one.
    ///
    /// `arm_state` must be one of "unset", "fullset" or "forceset"; anything
    /// else fails before a request is made.
    pub async fn set_arm_state(&mut self, arm_state: &str) -> Result<String> {
        let target: ArmState = arm_state.parse()?;

        let html = self.run(Command::SetArmState(target)).await?;
        if let Some(msg) = parser::parse_important_message(&html) {
            tracing::warn!("Panel rejected {}: {}", target, msg);
            return Err(Error::Command(msg));
        }
        parser::parse_arm_state(&html)
    }

    pub async fn get_zones(&mut self) -> Result<Vec<Zone>> {
        let html = self.run(Command::GetZones).await?;
        Ok(parser::parse_zones(&html))
    }

    /// Inhibit or deinhibit a zone and return its new state, or `None` if
    /// the panel no longer lists it.
    pub async fn set_zone_inhibit(&mut self, zone_id: u32, inhibit: bool) -> Result<Option<Zone>> {
        let html = self.run(Command::SetZoneInhibit { zone_id, inhibit }).await?;
        Ok(parser::parse_zones(&html)
            .into_iter()
            .find(|zone| zone.zone_id == zone_id))
    }

    /// Issue `command`, logging in first if needed.
    ///
    /// At most one re-login and one repeated request per call: the second
    /// response is returned whatever it contains.
    async fn run(&mut self, command: Command) -> Result<String> {
        if self.is_authenticated() {
            let html = self.attempt(command).await?;
            if !parser::is_login_page(&html) {
                return Ok(html);
            }
            tracing::info!("SPC session expired, logging in again");
        }

        self.login().await?;
        self.attempt(command).await
    }

    async fn attempt(&mut self, command: Command) -> Result<String> {
        let request = command.encode(&self.sid);
        self.fetch(&request).await
    }

    async fn fetch(&mut self, request: &PageRequest) -> Result<String> {
        let html = self.transport.send(request).await?;
        (self.model, self.site) = parser::parse_title(&html);
        Ok(html)
    }
}
