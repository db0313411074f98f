//! Static listing of every position a route specification can reach.
//!
//! Walks the declared tree without binding anything, so listing is safe to run
//! while scopes over the same tables are alive.
use serde::Serialize;

use crate::node::{Collection, Member, Node, RenderPolicy};
use crate::path::PathBuilder;
use crate::routes::{RouteSpec, RouteTable};

/// Placeholder used for member identifiers in listed paths.
pub const ID_PLACEHOLDER: &str = ":id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateKind {
    Root,
    Collection,
    Member,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTemplate {
    pub path: String,
    pub kind: TemplateKind,
    /// False where rendering this position is denied.
    pub renderable: bool,
}

pub fn templates(spec: &RouteSpec, root_render: RenderPolicy) -> Vec<RouteTemplate> {
    let root = PathBuilder::empty();
    let mut out = vec![RouteTemplate {
        path: root.render(),
        kind: TemplateKind::Root,
        renderable: root_render.is_allowed(),
    }];
    for (key, node) in spec.iter() {
        walk_node(&root.push(key), node, &mut out);
    }
    out
}

fn walk_table(base: &PathBuilder, table: &RouteTable, out: &mut Vec<RouteTemplate>) {
    for (key, node) in table.entries() {
        walk_node(&base.push(key), node, out);
    }
}

fn walk_node(context: &PathBuilder, node: &Node, out: &mut Vec<RouteTemplate>) {
    match node {
        Node::Collection(x) => walk_collection(context, x, out),
        Node::Member(x) => walk_member(context, x, out),
        Node::Both(x) => {
            walk_collection(context, x.collection(), out);
            walk_member(context, x.member(), out);
        }
    }
}

fn walk_collection(context: &PathBuilder, node: &Collection, out: &mut Vec<RouteTemplate>) {
    out.push(RouteTemplate {
        path: context.render(),
        kind: TemplateKind::Collection,
        renderable: node.is_leaf() || node.parent_render().is_allowed(),
    });
    if let Some(table) = node.children() {
        walk_table(context, table, out);
    }
}

fn walk_member(context: &PathBuilder, node: &Member, out: &mut Vec<RouteTemplate>) {
    let context = context.push(ID_PLACEHOLDER);
    out.push(RouteTemplate {
        path: context.render(),
        kind: TemplateKind::Member,
        renderable: node.is_leaf() || node.parent_render().is_allowed(),
    });
    if let Some(table) = node.children() {
        walk_table(&context, table, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{both, collection, member};

    fn paths(xs: &[RouteTemplate]) -> Vec<(&str, bool)> {
        xs.iter().map(|t| (t.path.as_str(), t.renderable)).collect()
    }

    #[test]
    fn lists_positions_in_declaration_order() {
        let spec = RouteSpec::new()
            .route("posts", both(
                collection(),
                member().with_children(RouteSpec::new().route("comments", member())),
            ))
            .route("admin", collection()
                .with_children(RouteSpec::new().route("users", collection()))
                .deny_parent_render());
        let listed = templates(&spec, RenderPolicy::Deny);
        assert_eq!(paths(&listed), vec![
            ("/", false),
            ("/posts", true),
            ("/posts/:id", true),
            ("/posts/:id/comments/:id", true),
            ("/admin", false),
            ("/admin/users", true),
        ]);
        assert_eq!(listed[2].kind, TemplateKind::Member);
    }

    #[test]
    fn listing_does_not_bind() {
        let spec = RouteSpec::new().route(
            "a",
            collection().with_children(RouteSpec::new().route("b", collection())),
        );
        let listed = templates(&spec, RenderPolicy::Allow);
        assert_eq!(listed.len(), 3);
        let root = crate::routes::routes(spec);
        let a = root.collection("a").unwrap().into_scope().unwrap();
        assert_eq!(a.generation(), 1);
    }
}
