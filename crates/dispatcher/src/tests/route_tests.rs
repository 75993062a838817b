use super::*;

fn matched(path: &str) -> Option<RouteMatch> {
    RouteTable::conventional().match_path(path)
}

#[test]
fn member_pattern_is_checked_first() {
    let table = RouteTable::conventional();
    let kinds: Vec<RouteKind> = table.routes().iter().map(Route::kind).collect();
    assert_eq!(kinds, vec![RouteKind::Member, RouteKind::Collection]);
    let patterns: Vec<&str> = table.routes().iter().map(Route::pattern).collect();
    assert_eq!(patterns, vec![MEMBER_PATTERN, COLLECTION_PATTERN]);
}

#[test]
fn invalid_pattern_is_reported() {
    assert!(Route::new("^/([^/]+", RouteKind::Collection).is_err());
}

#[test]
fn two_segments_select_member_with_or_without_trailing_slash() {
    for path in ["/notes/42", "/notes/42/"] {
        let route = matched(path).expect("member route");
        assert_eq!(route.kind, RouteKind::Member);
        assert_eq!(route.controller, "notes");
        assert_eq!(route.key.as_deref(), Some("42"));
    }
}

#[test]
fn one_segment_selects_collection() {
    for path in ["/Notes", "/Notes/"] {
        let route = matched(path).expect("collection route");
        assert_eq!(route.kind, RouteKind::Collection);
        assert_eq!(route.controller, "Notes");
        assert_eq!(route.key, None);
    }
}

#[test]
fn other_shapes_do_not_match() {
    for path in ["/", "", "//", "/a/b/c", "/a//", "notes"] {
        assert_eq!(matched(path), None, "{path:?} should not route");
    }
}
