use shared::domain::{ActionName, HttpMethod, RouteKind};

use crate::error::DispatchError;

/// Picks the action for a matched route shape, verb and request parameters.
///
/// A member `POST` carrying `action=update|destroy` stands in for `PUT`/`DELETE`
/// from clients that can only submit forms.
pub fn resolve_action(
    kind: RouteKind,
    method: &HttpMethod,
    params: &[(String, String)],
) -> Result<ActionName, DispatchError> {
    let param = |name: &str| {
        params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    };

    match (kind, method) {
        (RouteKind::Collection, HttpMethod::Get) if param("new").is_some() => Ok(ActionName::New),
        (RouteKind::Collection, HttpMethod::Get) => Ok(ActionName::Index),
        (RouteKind::Collection, HttpMethod::Post) => Ok(ActionName::Create),
        (RouteKind::Member, HttpMethod::Get) => Ok(ActionName::Show),
        (RouteKind::Member, HttpMethod::Post) => match param("action") {
            Some("update") => Ok(ActionName::Update),
            Some("destroy") => Ok(ActionName::Destroy),
            _ => Err(DispatchError::BadRequest(
                "action parameter wrong/missing".to_string(),
            )),
        },
        (RouteKind::Member, HttpMethod::Put) => Ok(ActionName::Update),
        (RouteKind::Member, HttpMethod::Delete) => Ok(ActionName::Destroy),
        (kind, method) => Err(DispatchError::MethodNotAllowed {
            method: method.clone(),
            kind,
        }),
    }
}

#[cfg(test)]
#[path = "tests/resolve_tests.rs"]
mod tests;
