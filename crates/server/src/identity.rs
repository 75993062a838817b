use std::collections::HashSet;

use dispatcher::{IdentityProvider, RequestContext};
use shared::domain::Principal;
use url::form_urlencoded;

use crate::config::Settings;

/// Trusts an identity header set by the authenticating proxy in front of us.
#[derive(Debug, Clone)]
pub struct HeaderIdentity {
    header: String,
    admins: HashSet<String>,
    login_url: String,
    logout_url: String,
}

impl HeaderIdentity {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            header: settings.identity_header.to_ascii_lowercase(),
            admins: settings.admins.iter().cloned().collect(),
            login_url: settings.login_url.clone(),
            logout_url: settings.logout_url.clone(),
        }
    }
}

fn with_continue(base: &str, return_to: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(return_to.as_bytes()).collect();
    let joiner = if base.contains('?') { '&' } else { '?' };
    format!("{base}{joiner}continue={encoded}")
}

impl IdentityProvider for HeaderIdentity {
    fn current_principal(&self, request: &RequestContext) -> Option<Principal> {
        let identifier = request.header(&self.header)?.trim();
        if identifier.is_empty() {
            return None;
        }
        Some(Principal {
            identifier: identifier.to_string(),
            is_administrator: self.admins.contains(identifier),
        })
    }

    fn login_url(&self, return_to: &str) -> String {
        with_continue(&self.login_url, return_to)
    }

    fn logout_url(&self, return_to: &str) -> String {
        with_continue(&self.logout_url, return_to)
    }
}

#[cfg(test)]
#[path = "tests/identity_tests.rs"]
mod tests;
