use std::path::PathBuf;
use route_gen::{DefinitionError, RouteError, RouteFile, TemplateKind};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn blog_paths() -> Result<(), RouteError> {
    let r = RouteFile::load(fixture("blog.json")).unwrap().bind();
    assert_eq!(r.render()?, "/");
    assert_eq!(r.collection("posts")?.render()?, "/posts");
    assert_eq!(r.collection("posts")?.collection("drafts")?.render()?, "/posts/drafts");
    assert_eq!(r.member("posts", 7)?.collection("edit")?.render()?, "/posts/7/edit");
    assert_eq!(r.member("posts", 7)?.collection("comments")?.render()?, "/posts/7/comments");
    assert_eq!(r.member("posts", 7)?.member("comments", 2)?.render()?, "/posts/7/comments/2");
    assert_eq!(r.member("users", "ana")?.collection("profile")?.render()?, "/users/ana/profile");
    assert!(matches!(r.member("users", "ana")?.render(), Err(RouteError::ToStringDenied { .. })));
    assert_eq!(r.collection("about")?.render()?, "/about");
    Ok(())
}

#[test]
fn admin_templates() {
    let file = RouteFile::load(fixture("admin.json")).unwrap();
    let listed = file
        .templates()
        .into_iter()
        .map(|t| (t.path, t.kind, t.renderable))
        .collect::<Vec<_>>();
    assert_eq!(listed, vec![
        ("/".to_string(), TemplateKind::Root, false),
        ("/admin".to_string(), TemplateKind::Collection, false),
        ("/admin/users/:id".to_string(), TemplateKind::Member, true),
        ("/admin/settings".to_string(), TemplateKind::Collection, true),
    ]);
}

#[test]
fn templates_serialize_for_tooling() {
    let file = RouteFile::load(fixture("admin.json")).unwrap();
    let value = serde_json::to_value(file.templates()).unwrap();
    assert_eq!(value[2], serde_json::json!({
        "path": "/admin/users/:id",
        "kind": "member",
        "renderable": true,
    }));
}

#[test]
fn definitions_round_trip_through_serde() {
    let file = RouteFile::load(fixture("blog.json")).unwrap();
    let again = RouteFile::from_json_str(&serde_json::to_string(&file).unwrap()).unwrap();
    assert_eq!(file.templates(), again.templates());
}

#[test]
fn missing_file_is_an_io_error() {
    let err = RouteFile::load(fixture("nope.json")).unwrap_err();
    assert!(matches!(err, DefinitionError::Io { .. }));
}
