//! Request encoding for the SPC web interface
//!
//! Maps semantic commands onto the exact paths, query strings and form
//! fields the panel firmware accepts.

use crate::models::{ArmState, Credentials};
use reqwest::Method;

const LOGIN_PATH: &str = "/login.htm";
const SECURE_PATH: &str = "/secure.htm";

/// Pages served behind the session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    SystemSummary,
    StatusZones,
}

impl Page {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SystemSummary => "system_summary",
            Self::StatusZones => "status_zones",
        }
    }
}

/// A fully encoded request, ready for a [`Transport`](crate::http::Transport)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub method: Method,
    pub path: &'static str,
    pub query: Vec<(&'static str, String)>,
    pub form: Vec<(String, String)>,
}

impl PageRequest {
    /// Path plus query string, in the order the web UI itself sends them
    pub fn path_and_query(&self) -> String {
        let query = self
            .query
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        if query.is_empty() {
            self.path.to_string()
        } else {
            format!("{}?{}", self.path, query)
        }
    }

    /// Value of a query parameter, if present
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Operations performed on authenticated pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GetArmState,
    SetArmState(ArmState),
    GetZones,
    SetZoneInhibit { zone_id: u32, inhibit: bool },
}

impl Command {
    pub fn page(&self) -> Page {
        match self {
            Self::GetArmState | Self::SetArmState(_) => Page::SystemSummary,
            Self::GetZones | Self::SetZoneInhibit { .. } => Page::StatusZones,
        }
    }

    /// Form field the firmware expects for this command, if it writes
    pub fn form_field(&self) -> Option<(String, String)> {
        let (name, value) = match self {
            Self::GetArmState | Self::GetZones => return None,
            Self::SetArmState(ArmState::Unset) => ("unset_all_areas".to_string(), "Unset"),
            Self::SetArmState(ArmState::Fullset) => ("fullset_area1".to_string(), "Fullset"),
            Self::SetArmState(ArmState::Forceset) => ("fullset_force1".to_string(), "Force set"),
            Self::SetZoneInhibit {
                zone_id,
                inhibit: true,
            } => (format!("inhibit{}", zone_id), "Inhibit"),
            Self::SetZoneInhibit {
                zone_id,
                inhibit: false,
            } => (format!("uninhibit{}", zone_id), "Deinhibit"),
        };
        Some((name, value.to_string()))
    }

    /// Encode this command against the given session token
    pub fn encode(&self, session: &str) -> PageRequest {
        let mut query = vec![
            ("session", session.to_string()),
            ("page", self.page().as_str().to_string()),
            ("language", "0".to_string()),
        ];

        let form: Vec<_> = self.form_field().into_iter().collect();
        let method = if form.is_empty() {
            Method::GET
        } else {
            query.push(("action", "update".to_string()));
            Method::POST
        };

        // The web UI always sends zone=1 with inhibit requests, whatever the
        // zone. The firmware ignores the command without it.
        if let Self::SetZoneInhibit { .. } = self {
            query.push(("zone", "1".to_string()));
        }

        PageRequest {
            method,
            path: SECURE_PATH,
            query,
            form,
        }
    }
}

/// Login form submission
pub fn login_request(creds: &Credentials) -> PageRequest {
    PageRequest {
        method: Method::POST,
        path: LOGIN_PATH,
        query: vec![
            ("action", "login".to_string()),
            ("language", "0".to_string()),
        ],
        form: vec![
            ("userid".to_string(), creds.userid.clone()),
            ("password".to_string(), creds.password.clone()),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, value: &str) -> Vec<(String, String)> {
        vec![(name.to_string(), value.to_string())]
    }

    #[test]
    fn test_login_request() {
        let req = login_request(&Credentials::new("engineer", "1111"));
        assert_eq!(req.method, Method::POST);
        assert_eq!(req.path_and_query(), "/login.htm?action=login&language=0");
        assert_eq!(
            req.form,
            vec![
                ("userid".to_string(), "engineer".to_string()),
                ("password".to_string(), "1111".to_string()),
            ]
        );
    }

    #[test]
    fn test_get_arm_state() {
        let req = Command::GetArmState.encode("0xABC");
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.path_and_query(),
            "/secure.htm?session=0xABC&page=system_summary&language=0"
        );
        assert!(req.form.is_empty());
    }

    #[test]
    fn test_get_zones() {
        let req = Command::GetZones.encode("0xABC");
        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.path_and_query(),
            "/secure.htm?session=0xABC&page=status_zones&language=0"
        );
    }

    #[test]
    fn test_set_arm_state_fields() {
        let cases = [
            (ArmState::Unset, "unset_all_areas", "Unset"),
            (ArmState::Fullset, "fullset_area1", "Fullset"),
            (ArmState::Forceset, "fullset_force1", "Force set"),
        ];

        for (state, name, value) in cases {
            let req = Command::SetArmState(state).encode("0x1");
            assert_eq!(req.method, Method::POST);
            assert_eq!(
                req.path_and_query(),
                "/secure.htm?session=0x1&page=system_summary&language=0&action=update"
            );
            assert_eq!(req.form, field(name, value));
        }
    }

    #[test]
    fn test_zone_inhibit_always_sends_zone_1() {
        let req = Command::SetZoneInhibit {
            zone_id: 17,
            inhibit: true,
        }
        .encode("0x1");
        assert_eq!(
            req.path_and_query(),
            "/secure.htm?session=0x1&page=status_zones&language=0&action=update&zone=1"
        );
        assert_eq!(req.form, field("inhibit17", "Inhibit"));
        assert_eq!(req.query_param("zone"), Some("1"));

        let req = Command::SetZoneInhibit {
            zone_id: 17,
            inhibit: false,
        }
        .encode("0x1");
        assert_eq!(req.form, field("uninhibit17", "Deinhibit"));
        assert_eq!(req.query_param("zone"), Some("1"));
    }
}
