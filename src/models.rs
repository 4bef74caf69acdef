//! Data models for the SPC web interface

use crate::error::Error;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Known zone input values. The panel may report others.
pub const ZONE_INPUTS: &[&str] = &["closed", "open", "short", "discon", "offline"];

/// Known zone status values. The panel may report others.
pub const ZONE_STATUSES: &[&str] = &["normal", "inhibit", "tamper", "actuated"];

/// Login credentials for the panel web interface
#[derive(Clone)]
pub struct Credentials {
    pub userid: String,
    pub password: String,
}

impl Credentials {
    pub fn new(userid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("userid", &self.userid)
            .field("password", &"***")
            .finish()
    }
}

/// Arm state that can be requested for all areas.
///
/// What the panel reports back is free text and is returned as a plain
/// lower-cased string instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmState {
    Unset,
    Fullset,
    Forceset,
}

impl ArmState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Fullset => "fullset",
            Self::Forceset => "forceset",
        }
    }
}

impl fmt::Display for ArmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArmState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unset" => Ok(Self::Unset),
            "fullset" => Ok(Self::Fullset),
            "forceset" => Ok(Self::Forceset),
            other => Err(Error::Command(format!("{}: unknown arm state", other))),
        }
    }
}

/// One row of the status_zones page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub zone_id: u32,
    pub zone_name: String,
    pub area_id: u32,
    pub area_name: String,
    /// Alarm, entry/exit, fire, technical, ...
    pub zone_type: String,
    /// Physical input state; still shown for inhibited zones
    pub input: String,
    pub status: String,
}

impl Zone {
    pub fn is_open(&self) -> bool {
        self.input == "open"
    }

    pub fn is_inhibited(&self) -> bool {
        self.status == "inhibit"
    }

    pub fn is_tampered(&self) -> bool {
        self.status == "tamper"
    }

    pub fn is_actuated(&self) -> bool {
        self.status == "actuated"
    }

    /// Whether both input and status are in the known vocabularies
    pub fn has_known_state(&self) -> bool {
        ZONE_INPUTS.contains(&self.input.as_str()) && ZONE_STATUSES.contains(&self.status.as_str())
    }
}
