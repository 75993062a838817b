use super::{substitute, FileViews};

use dispatcher::{RenderError, TemplateEngine};
use serde_json::json;
use shared::protocol::RenderContext;
use std::{
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_views() -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("dispatch_views_test_{suffix}"));
    fs::create_dir_all(root.join("notes")).expect("views dir");
    root
}

#[test]
fn substitutes_and_escapes_values() {
    let mut context = RenderContext::new();
    context.insert("title", "<b>Tom & Jerry</b>");
    context.insert("count", 3);
    context.insert("nothing", serde_json::Value::Null);

    let out = substitute("{{title}} x{{ count }}[{{ nothing }}]{{ absent }}", &context);
    assert_eq!(out, "&lt;b&gt;Tom &amp; Jerry&lt;/b&gt; x3[]");
}

#[test]
fn resolves_dotted_paths() {
    let mut context = RenderContext::new();
    context.insert("note", json!({ "title": "plan", "tags": ["a", "b"] }));

    assert_eq!(
        substitute("{{ note.title }}/{{ note.tags.1 }}", &context),
        "plan/b"
    );
}

#[test]
fn unterminated_placeholder_is_kept_verbatim() {
    let context = RenderContext::new();
    assert_eq!(substitute("a {{ b", &context), "a {{ b");
}

#[test]
fn renders_files_below_root() {
    let root = temp_views();
    fs::write(root.join("notes").join("show.html"), "<h1>{{ title }}</h1>").expect("write view");
    let views = FileViews::new(&root);
    let mut context = RenderContext::new();
    context.insert("title", "hello");

    assert!(views.exists("notes/show"));
    assert!(!views.exists("notes/edit"));
    let body = views.render("notes/show", &context).expect("render");
    assert_eq!(body, b"<h1>hello</h1>");

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn refuses_paths_escaping_root() {
    let root = temp_views();
    fs::write(root.join("secret.html"), "secret").expect("write file");
    let views = FileViews::new(root.join("notes"));

    assert!(!views.exists("../secret"));
    assert!(matches!(
        views.render("../secret", &RenderContext::new()),
        Err(RenderError::NotFound(_))
    ));
    assert!(!views.exists("/etc/passwd"));

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn shipped_views_cover_notes_actions() {
    let views = FileViews::new(concat!(env!("CARGO_MANIFEST_DIR"), "/views"));
    for template in ["notes/index", "notes/show", "notes/edit", "notes/update"] {
        assert!(views.exists(template), "{template}");
    }
    assert!(!views.exists("notes/new"));
}
