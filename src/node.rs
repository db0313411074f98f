//! Node constructors: `collection`, `member`, and the `both` combinator.
//!
//! A node does not know where it sits in the tree. It is handed its position
//! (a [`PathBuilder`] already extended by its own key) every time an enclosing
//! scope invokes it, and answers with either a finished path or its rebound
//! child table.
use std::rc::Rc;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::path::{PathBuilder, Segment};
use crate::routes::{Resolved, RouteSpec, RouteTable};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Whether a subtree may render its own path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPolicy {
    #[default]
    Allow,
    Deny,
}

impl RenderPolicy {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allow)
    }
}

impl From<bool> for RenderPolicy {
    fn from(allow: bool) -> Self {
        if allow { Self::Allow } else { Self::Deny }
    }
}

/// Tagged configuration shared by [`Collection`] and [`Member`].
#[derive(Debug, Clone, Default)]
pub struct NodeOptions {
    /// Child routes. `None` makes the node a leaf that yields a path string.
    pub children: Option<RouteSpec>,
    /// Render policy of the returned child table. Ignored by leaves.
    pub parent_render: RenderPolicy,
}

/// A non-parameterized path segment, e.g. a resource list.
#[derive(Debug, Clone)]
pub struct Collection {
    children: Option<Rc<RouteTable>>,
    parent_render: RenderPolicy,
}

/// A parameterized path segment, e.g. a single resource.
#[derive(Debug, Clone)]
pub struct Member {
    children: Option<Rc<RouteTable>>,
    parent_render: RenderPolicy,
}

/// Dispatches to `collection` without an identifier and `member` with one.
#[derive(Debug, Clone)]
pub struct Both {
    collection: Collection,
    member: Member,
}

/// A route entry. Cloning shares the child tables, it does not copy them.
#[derive(Debug, Clone)]
pub enum Node {
    Collection(Collection),
    Member(Member),
    Both(Both),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Collection,
    Member,
    Both,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

/// Leaf collection: invoking it yields its own path.
pub fn collection() -> Collection {
    Collection::new(NodeOptions::default())
}

/// Leaf member: invoking it with `id` yields its path extended by `id`.
pub fn member() -> Member {
    Member::new(NodeOptions::default())
}

pub fn both(collection: Collection, member: Member) -> Both {
    Both { collection, member }
}

macro_rules! branch_node {
    ($($t:ty),*) => {$(
        impl $t {
            pub fn new(options: NodeOptions) -> Self {
                Self {
                    children: options.children.map(RouteSpec::into_table),
                    parent_render: options.parent_render,
                }
            }
            pub fn with_children(self, children: RouteSpec) -> Self {
                Self { children: Some(children.into_table()), ..self }
            }
            pub fn deny_parent_render(self) -> Self {
                Self { parent_render: RenderPolicy::Deny, ..self }
            }
            pub fn is_leaf(&self) -> bool {
                self.children.is_none()
            }
            pub fn parent_render(&self) -> RenderPolicy {
                self.parent_render
            }
            pub(crate) fn children(&self) -> Option<&Rc<RouteTable>> {
                self.children.as_ref()
            }
        }
    )*};
}

branch_node!(Collection, Member);

impl Collection {
    /// `context` already ends with this node's key.
    pub(crate) fn enter(&self, context: &PathBuilder) -> Resolved {
        match &self.children {
            None => Resolved::Path(context.render()),
            Some(table) => Resolved::Routes(table.bind(context.clone(), self.parent_render)),
        }
    }
}

impl Member {
    pub(crate) fn enter(&self, context: &PathBuilder, id: Segment) -> Resolved {
        let context = context.push(id);
        match &self.children {
            None => Resolved::Path(context.render()),
            Some(table) => Resolved::Routes(table.bind(context, self.parent_render)),
        }
    }
}

impl Both {
    pub fn collection(&self) -> &Collection {
        &self.collection
    }
    pub fn member(&self) -> &Member {
        &self.member
    }
    /// Presence decides, not value: `0` and `""` still select the member.
    pub(crate) fn enter(&self, context: &PathBuilder, id: Option<Segment>) -> Resolved {
        match id {
            Some(id) => self.member.enter(context, id),
            None => self.collection.enter(context),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// DISPATCH
// ————————————————————————————————————————————————————————————————————————————

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Collection(_) => NodeKind::Collection,
            Self::Member(_) => NodeKind::Member,
            Self::Both(_) => NodeKind::Both,
        }
    }
    pub(crate) fn invoke(
        &self,
        key: &str,
        context: &PathBuilder,
        id: Option<Segment>,
    ) -> Result<Resolved, RouteError> {
        match (self, id) {
            (Self::Collection(x), None) => Ok(x.enter(context)),
            (Self::Collection(_), Some(_)) => Err(RouteError::UnexpectedId { key: key.to_string() }),
            (Self::Member(x), Some(id)) => Ok(x.enter(context, id)),
            (Self::Member(_), None) => Err(RouteError::MissingId { key: key.to_string() }),
            (Self::Both(x), id) => Ok(x.enter(context, id)),
        }
    }
}

impl From<Collection> for Node {
    fn from(x: Collection) -> Self { Self::Collection(x) }
}

impl From<Member> for Node {
    fn from(x: Member) -> Self { Self::Member(x) }
}

impl From<Both> for Node {
    fn from(x: Both) -> Self { Self::Both(x) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(key: &str) -> PathBuilder {
        PathBuilder::empty().push(key)
    }

    #[test]
    fn leaf_collection_yields_its_context() {
        let out = collection().enter(&at("foos"));
        assert_eq!(out.as_path(), Some("/foos"));
    }

    #[test]
    fn leaf_member_appends_the_id() {
        let out = member().enter(&at("foos"), Segment::from(7));
        assert_eq!(out.as_path(), Some("/foos/7"));
    }

    #[test]
    fn leaves_ignore_render_policy() {
        let out = collection().deny_parent_render().enter(&at("foos"));
        assert_eq!(out.as_path(), Some("/foos"));
        let out = member().deny_parent_render().enter(&at("foos"), Segment::from(1));
        assert_eq!(out.as_path(), Some("/foos/1"));
    }

    #[test]
    fn options_and_builders_agree() {
        let a = Collection::new(NodeOptions {
            children: Some(RouteSpec::new()),
            parent_render: RenderPolicy::Deny,
        });
        let b = collection().with_children(RouteSpec::new()).deny_parent_render();
        assert_eq!(a.is_leaf(), b.is_leaf());
        assert_eq!(a.parent_render(), b.parent_render());
        let m = Member::new(NodeOptions { children: None, parent_render: RenderPolicy::Deny });
        let n = member().deny_parent_render();
        assert!(m.is_leaf() && n.is_leaf());
        assert_eq!(m.parent_render(), n.parent_render());
        assert!(!member().with_children(RouteSpec::new()).is_leaf());
        assert_eq!(RenderPolicy::from(false), RenderPolicy::Deny);
    }

    #[test]
    fn both_dispatches_on_presence() {
        let node = Node::from(both(collection(), member()));
        let context = at("f");
        let none = node.invoke("f", &context, None).unwrap();
        let zero = node.invoke("f", &context, Some(Segment::from(0))).unwrap();
        let blank = node.invoke("f", &context, Some(Segment::from(""))).unwrap();
        assert_eq!(none.as_path(), Some("/f"));
        assert_eq!(zero.as_path(), Some("/f/0"));
        assert_eq!(blank.as_path(), Some("/f/"));
    }

    #[test]
    fn plain_nodes_reject_the_wrong_arity() {
        let context = at("x");
        let err = Node::from(member()).invoke("x", &context, None).unwrap_err();
        assert_eq!(err, RouteError::MissingId { key: "x".into() });
        let err = Node::from(collection()).invoke("x", &context, Some(1.into())).unwrap_err();
        assert_eq!(err, RouteError::UnexpectedId { key: "x".into() });
    }
}
