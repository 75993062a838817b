use super::*;

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn collection_get_selects_new_when_flag_present() {
    let action = resolve_action(RouteKind::Collection, &HttpMethod::Get, &params(&[("new", "1")]));
    assert_eq!(action.expect("action"), ActionName::New);

    let blank = resolve_action(RouteKind::Collection, &HttpMethod::Get, &params(&[("new", "")]));
    assert_eq!(blank.expect("action"), ActionName::New);
}

#[test]
fn collection_get_and_post() {
    assert_eq!(
        resolve_action(RouteKind::Collection, &HttpMethod::Get, &[]).expect("index"),
        ActionName::Index
    );
    assert_eq!(
        resolve_action(RouteKind::Collection, &HttpMethod::Post, &[]).expect("create"),
        ActionName::Create
    );
}

#[test]
fn member_verbs() {
    assert_eq!(
        resolve_action(RouteKind::Member, &HttpMethod::Get, &[]).expect("show"),
        ActionName::Show
    );
    assert_eq!(
        resolve_action(RouteKind::Member, &HttpMethod::Put, &[]).expect("update"),
        ActionName::Update
    );
    assert_eq!(
        resolve_action(RouteKind::Member, &HttpMethod::Delete, &[]).expect("destroy"),
        ActionName::Destroy
    );
}

#[test]
fn member_post_tunnels_update_and_destroy() {
    let update = resolve_action(
        RouteKind::Member,
        &HttpMethod::Post,
        &params(&[("action", "update")]),
    );
    assert_eq!(update.expect("update"), ActionName::Update);

    let destroy = resolve_action(
        RouteKind::Member,
        &HttpMethod::Post,
        &params(&[("action", "destroy")]),
    );
    assert_eq!(destroy.expect("destroy"), ActionName::Destroy);
}

#[test]
fn member_post_rejects_other_action_values() {
    for value in ["delete", "updated", "xupdate", "show", ""] {
        let err = resolve_action(
            RouteKind::Member,
            &HttpMethod::Post,
            &params(&[("action", value)]),
        )
        .expect_err("should be rejected");
        assert!(matches!(err, DispatchError::BadRequest(_)), "{value}");
    }

    let missing = resolve_action(RouteKind::Member, &HttpMethod::Post, &[]).expect_err("missing");
    assert!(matches!(missing, DispatchError::BadRequest(_)));
}

#[test]
fn unsupported_verbs_are_not_allowed() {
    let err = resolve_action(RouteKind::Collection, &HttpMethod::Delete, &[]).expect_err("405");
    assert!(matches!(
        err,
        DispatchError::MethodNotAllowed {
            kind: RouteKind::Collection,
            ..
        }
    ));
    assert_eq!(err.status(), 405);

    let patch = HttpMethod::Other("PATCH".into());
    let err = resolve_action(RouteKind::Member, &patch, &[]).expect_err("405");
    assert_eq!(err.status(), 405);
}
