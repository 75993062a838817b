use anyhow::anyhow;
use shared::error::{HttpError, Redirect};

use super::*;

struct Greeter {
    base: ControllerBase,
}

#[async_trait]
impl Controller for Greeter {
    fn base(&self) -> &ControllerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut ControllerBase {
        &mut self.base
    }

    async fn index(&mut self) -> ActionResult {
        self.base.context_mut().insert("title", "Hi");
        Ok(())
    }

    async fn show(&mut self, key: &str) -> ActionResult {
        match key {
            "moved" => Err(Redirect::permanent("/greeter/elsewhere").into()),
            "secret" => Err(HttpError::forbidden("nobody").into()),
            "broken" => Err(anyhow!("disk on fire").into()),
            _ => {
                self.base.context_mut().insert("key", key);
                Ok(())
            }
        }
    }
}

fn registry() -> ControllerRegistry {
    ControllerRegistry::new()
        .with("Greeter", |base| Box::new(Greeter { base }))
        .expect("register")
}

fn base(url: &str) -> ControllerBase {
    ControllerBase::new(RequestContext::new("GET", url))
}

#[test]
fn controller_names_are_lower_cased_and_sanitized() {
    assert_eq!(normalize_controller_name("Notes").as_deref(), Some("notes"));
    assert_eq!(normalize_controller_name("blog_posts-2").as_deref(), Some("blog_posts-2"));
    for bad in ["", "..", "a.b", "a/b", "%2e%2e", "notes\\x", "ünïcode"] {
        assert_eq!(normalize_controller_name(bad), None, "{bad:?}");
    }
}

#[test]
fn registration_rejects_bad_and_duplicate_names() {
    let mut registry = registry();
    let err = registry
        .register("GREETER", |base| Box::new(Greeter { base }))
        .expect_err("duplicate");
    assert_eq!(err, RegistryError::Duplicate("greeter".into()));

    let err = registry
        .register("../x", |base| Box::new(Greeter { base }))
        .expect_err("invalid");
    assert_eq!(err, RegistryError::InvalidName("../x".into()));

    assert!(registry.contains("greeter"));
    assert_eq!(registry.names(), vec!["greeter"]);
}

#[tokio::test]
async fn unregistered_controller_is_not_found() {
    let err = registry()
        .load_and_invoke("missing", ActionName::Index, None, base("/missing"))
        .await
        .expect_err("not found");
    assert!(matches!(err, DispatchError::NotFound(_)));

    let err = registry()
        .load_and_invoke("..", ActionName::Index, None, base("/.."))
        .await
        .expect_err("not found");
    assert!(matches!(err, DispatchError::NotFound(_)));
}

#[tokio::test]
async fn completed_action_yields_its_context() {
    let outcome = registry()
        .load_and_invoke("GREETER", ActionName::Index, None, base("/GREETER"))
        .await
        .expect("outcome");
    let expected: RenderContext = [("title", "Hi")].into_iter().collect();
    assert_eq!(outcome, Outcome::Rendered(expected));
}

#[tokio::test]
async fn default_actions_are_no_ops() {
    let registry = registry();
    for (action, key) in [
        (ActionName::New, None),
        (ActionName::Create, None),
        (ActionName::Edit, Some("1")),
        (ActionName::Update, Some("1")),
        (ActionName::Destroy, Some("1")),
    ] {
        let outcome = registry
            .load_and_invoke("greeter", action, key, base("/greeter"))
            .await
            .expect("outcome");
        assert_eq!(outcome, Outcome::Rendered(RenderContext::new()), "{action}");
    }
}

#[tokio::test]
async fn signals_become_outcomes() {
    let registry = registry();
    let moved = registry
        .load_and_invoke("greeter", ActionName::Show, Some("moved"), base("/greeter/moved"))
        .await
        .expect("outcome");
    assert_eq!(
        moved,
        Outcome::Redirected {
            url: "/greeter/elsewhere".into(),
            permanent: true
        }
    );

    let secret = registry
        .load_and_invoke("greeter", ActionName::Show, Some("secret"), base("/greeter/secret"))
        .await
        .expect("outcome");
    assert_eq!(
        secret,
        Outcome::Failed {
            code: 403,
            detail: Some("nobody".into())
        }
    );
}

#[tokio::test]
async fn other_faults_are_internal() {
    let err = registry()
        .load_and_invoke("greeter", ActionName::Show, Some("broken"), base("/greeter/broken"))
        .await
        .expect_err("internal");
    match err {
        DispatchError::Internal(source) => assert_eq!(source.to_string(), "disk on fire"),
        other => panic!("expected internal fault, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_resolution_is_not_found() {
    let registry = registry();
    let err = registry
        .load_and_invoke("greeter", ActionName::Show, None, base("/greeter"))
        .await
        .expect_err("member action without key");
    assert!(matches!(err, DispatchError::NotFound(_)));

    let err = registry
        .load_and_invoke("greeter", ActionName::Index, Some("1"), base("/greeter/1"))
        .await
        .expect_err("collection action with key");
    assert!(matches!(err, DispatchError::NotFound(_)));
}
