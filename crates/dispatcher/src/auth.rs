use anyhow::anyhow;
use shared::{
    domain::Principal,
    error::{HttpError, Interrupt, Redirect},
};
use tracing::{debug, warn};

use crate::{controller::ControllerBase, request::RequestContext};

/// Source of the authenticated identity for a request.
pub trait IdentityProvider: Send + Sync {
    fn current_principal(&self, request: &RequestContext) -> Option<Principal>;

    /// Where to send an anonymous user; `return_to` is the address to come back to.
    fn login_url(&self, return_to: &str) -> String;

    fn logout_url(&self, return_to: &str) -> String;
}

pub const DEFAULT_LOGOUT_TARGET: &str = "/";
pub const LOGOUT_URL_KEY: &str = "logout_url";

/// Admits administrators and the listed identities.
///
/// Anonymous requests are redirected to the provider's login page for the
/// current address; anyone else gets a 403 carrying their identifier. On
/// success the provider's logout link is stored under `logout_url` in the
/// render context.
pub fn authorize<S: AsRef<str>>(
    base: &mut ControllerBase,
    authorized_identities: &[S],
    logout_target: &str,
) -> Result<bool, Interrupt> {
    let provider = base
        .identity()
        .cloned()
        .ok_or_else(|| anyhow!("authorization requested but no identity provider is configured"))?;

    let Some(principal) = provider.current_principal(base.request()) else {
        let login = provider.login_url(base.request().url());
        debug!(url = %base.request().url(), "anonymous request, redirecting to login");
        return Err(Redirect::to(login).into());
    };

    let listed = authorized_identities
        .iter()
        .any(|identity| identity.as_ref() == principal.identifier);
    if !(principal.is_administrator || listed) {
        warn!(principal = %principal.identifier, path = %base.request().path(), "access denied");
        return Err(HttpError::forbidden(principal.identifier).into());
    }

    let logout_url = provider.logout_url(logout_target);
    base.context_mut().insert(LOGOUT_URL_KEY, logout_url);
    Ok(true)
}

#[cfg(test)]
#[path = "tests/auth_tests.rs"]
mod tests;
