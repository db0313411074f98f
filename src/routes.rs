//! Route tables, the context binder and the root initializer.
//!
//! A [`RouteSpec`] is frozen into a shared [`RouteTable`] the moment a node
//! takes it as children. From then on the table's keys never change; only its
//! binding does. Every invocation of the owning node rebinds the same table to
//! the caller's context and hands out a [`Scope`] over it, so the most recent
//! bind wins for every holder of a scope on that table.
//!
//! Tables sit behind `Rc`/`RefCell`, which keeps scopes on one thread.
//! Take a [`Snapshot`] to keep a binding past the next invocation.
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use indexmap::IndexMap;

use crate::error::RouteError;
use crate::node::{Node, NodeKind, RenderPolicy};
use crate::path::{PathBuilder, Segment};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Caller-built mapping from segment name to node, in declaration order.
///
/// Inserting an existing key replaces its node and keeps its position.
#[derive(Debug, Clone, Default)]
pub struct RouteSpec {
    nodes: IndexMap<String, Node>,
}

#[derive(Debug)]
pub(crate) struct RouteTable {
    nodes: IndexMap<String, Node>,
    binding: RefCell<Binding>,
    /// Number of binds so far; zero while unbound.
    generation: Cell<u64>,
}

/// Where a table currently sits and whether it may render itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Binding {
    base: PathBuilder,
    render: RenderPolicy,
}

/// Live handle on a bound route table. Reads the table's latest binding.
#[derive(Debug, Clone)]
pub struct Scope {
    table: Rc<RouteTable>,
}

/// A scope with its binding captured by value at the time it was taken.
#[derive(Debug, Clone)]
pub struct Snapshot {
    table: Rc<RouteTable>,
    binding: Binding,
    generation: u64,
}

/// A node resolved against a concrete position, ready to be invoked.
#[derive(Debug, Clone)]
pub struct BoundNode {
    key: String,
    node: Node,
    context: PathBuilder,
}

/// Outcome of invoking a node.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A leaf's finished path.
    Path(String),
    /// The node's child table, rebound to the node's position.
    Routes(Scope),
}

// ————————————————————————————————————————————————————————————————————————————
// ROOT
// ————————————————————————————————————————————————————————————————————————————

/// Bind `spec` at the root; the root renders as `"/"`.
pub fn routes(spec: RouteSpec) -> Scope {
    routes_with(RenderPolicy::Allow, spec)
}

/// Bind `spec` at the root with an explicit root render policy.
pub fn routes_with(root_render: RenderPolicy, spec: RouteSpec) -> Scope {
    spec.into_table().bind(PathBuilder::empty(), root_render)
}

// ————————————————————————————————————————————————————————————————————————————
// SPEC
// ————————————————————————————————————————————————————————————————————————————

impl RouteSpec {
    pub fn new() -> Self { Self::default() }
    pub fn route(mut self, key: impl Into<String>, node: impl Into<Node>) -> Self {
        self.insert(key, node);
        self
    }
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.nodes.insert(key.into(), node.into())
    }
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.nodes.get(key)
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }
    pub fn len(&self) -> usize {
        self.nodes.len()
    }
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
    pub(crate) fn into_table(self) -> Rc<RouteTable> {
        Rc::new(RouteTable {
            nodes: self.nodes,
            binding: RefCell::new(Binding::default()),
            generation: Cell::new(0),
        })
    }
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for RouteSpec {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut spec = Self::new();
        for (key, node) in iter {
            spec.insert(key, node);
        }
        spec
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BINDER
// ————————————————————————————————————————————————————————————————————————————

impl RouteTable {
    /// Rebind every entry under `base` and set the table's own render policy.
    ///
    /// Entries are bound lazily: each one's context is `base` plus its key,
    /// derived from whichever binding is read at lookup time.
    pub(crate) fn bind(self: &Rc<Self>, base: PathBuilder, render: RenderPolicy) -> Scope {
        let generation = self.generation.get() + 1;
        tracing::trace!(path = %base, ?render, generation, routes = self.nodes.len(), "binding route table");
        self.binding.replace(Binding { base, render });
        self.generation.set(generation);
        Scope { table: Rc::clone(self) }
    }
    pub(crate) fn entries(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }
    fn lookup(&self, binding: &Binding, key: &str) -> Result<BoundNode, RouteError> {
        match self.nodes.get(key) {
            Some(node) => Ok(BoundNode {
                key: key.to_string(),
                node: node.clone(),
                context: binding.base.push(key),
            }),
            None => Err(RouteError::UnknownRoute {
                key: key.to_string(),
                parent: binding.base.render(),
            }),
        }
    }
}

impl Binding {
    fn render(&self) -> Result<String, RouteError> {
        let path = self.base.render();
        match self.render {
            RenderPolicy::Allow => Ok(path),
            RenderPolicy::Deny => Err(RouteError::ToStringDenied { path }),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// HANDLES
// ————————————————————————————————————————————————————————————————————————————

impl Scope {
    fn binding(&self) -> Binding {
        self.table.binding.borrow().clone()
    }
    /// This subtree's own path, unless it was declared non-renderable.
    pub fn render(&self) -> Result<String, RouteError> {
        self.binding().render()
    }
    pub fn is_renderable(&self) -> bool {
        self.table.binding.borrow().render.is_allowed()
    }
    pub fn route(&self, key: &str) -> Result<BoundNode, RouteError> {
        self.table.lookup(&self.table.binding.borrow(), key)
    }
    pub fn collection(&self, key: &str) -> Result<Resolved, RouteError> {
        self.route(key)?.call()
    }
    pub fn member(&self, key: &str, id: impl Into<Segment>) -> Result<Resolved, RouteError> {
        self.route(key)?.call_with(id)
    }
    pub fn invoke(&self, key: &str, id: Option<Segment>) -> Result<Resolved, RouteError> {
        self.route(key)?.invoke(id)
    }
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.nodes.keys().map(String::as_str)
    }
    /// How many times the underlying table has been bound.
    pub fn generation(&self) -> u64 {
        self.table.generation.get()
    }
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            table: Rc::clone(&self.table),
            binding: self.binding(),
            generation: self.generation(),
        }
    }
    /// Whether both handles address the same table.
    pub fn same_table(&self, other: &Scope) -> bool {
        Rc::ptr_eq(&self.table, &other.table)
    }
}

impl Snapshot {
    pub fn render(&self) -> Result<String, RouteError> {
        self.binding.render()
    }
    pub fn is_renderable(&self) -> bool {
        self.binding.render.is_allowed()
    }
    pub fn route(&self, key: &str) -> Result<BoundNode, RouteError> {
        self.table.lookup(&self.binding, key)
    }
    pub fn collection(&self, key: &str) -> Result<Resolved, RouteError> {
        self.route(key)?.call()
    }
    pub fn member(&self, key: &str, id: impl Into<Segment>) -> Result<Resolved, RouteError> {
        self.route(key)?.call_with(id)
    }
    pub fn invoke(&self, key: &str, id: Option<Segment>) -> Result<Resolved, RouteError> {
        self.route(key)?.invoke(id)
    }
    /// True once the table has been rebound after this snapshot was taken.
    pub fn is_stale(&self) -> bool {
        self.table.generation.get() != self.generation
    }
}

impl BoundNode {
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn kind(&self) -> NodeKind {
        self.node.kind()
    }
    pub fn call(&self) -> Result<Resolved, RouteError> {
        self.invoke(None)
    }
    pub fn call_with(&self, id: impl Into<Segment>) -> Result<Resolved, RouteError> {
        self.invoke(Some(id.into()))
    }
    pub fn invoke(&self, id: Option<Segment>) -> Result<Resolved, RouteError> {
        self.node.invoke(&self.key, &self.context, id)
    }
}

impl Resolved {
    /// The leaf path, or the subtree's own rendering.
    pub fn render(&self) -> Result<String, RouteError> {
        match self {
            Self::Path(path) => Ok(path.clone()),
            Self::Routes(scope) => scope.render(),
        }
    }
    pub fn as_path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path),
            Self::Routes(_) => None,
        }
    }
    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            Self::Path(_) => None,
            Self::Routes(scope) => Some(scope),
        }
    }
    pub fn into_scope(self) -> Result<Scope, RouteError> {
        match self {
            Self::Path(path) => Err(RouteError::NotASubtree { path }),
            Self::Routes(scope) => Ok(scope),
        }
    }
    fn scope(&self) -> Result<&Scope, RouteError> {
        match self {
            Self::Path(path) => Err(RouteError::NotASubtree { path: path.clone() }),
            Self::Routes(scope) => Ok(scope),
        }
    }
    pub fn route(&self, key: &str) -> Result<BoundNode, RouteError> {
        self.scope()?.route(key)
    }
    pub fn collection(&self, key: &str) -> Result<Resolved, RouteError> {
        self.scope()?.collection(key)
    }
    pub fn member(&self, key: &str, id: impl Into<Segment>) -> Result<Resolved, RouteError> {
        self.scope()?.member(key, id)
    }
    pub fn invoke(&self, key: &str, id: Option<Segment>) -> Result<Resolved, RouteError> {
        self.scope()?.invoke(key, id)
    }
}

impl From<Scope> for Resolved {
    fn from(scope: Scope) -> Self { Self::Routes(scope) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{both, collection, member};

    #[test]
    fn empty_root_renders_slash() {
        assert_eq!(routes(RouteSpec::new()).render().unwrap(), "/");
    }

    #[test]
    fn denied_root_refuses_to_render() {
        let root = routes_with(RenderPolicy::Deny, RouteSpec::new());
        assert_eq!(root.render(), Err(RouteError::ToStringDenied { path: "/".into() }));
        assert!(!root.is_renderable());
    }

    #[test]
    fn denied_root_still_resolves_children() {
        let root = routes_with(RenderPolicy::Deny, RouteSpec::new().route("foos", collection()));
        assert_eq!(root.collection("foos").unwrap().as_path(), Some("/foos"));
    }

    #[test]
    fn unknown_keys_report_their_parent() {
        let root = routes(RouteSpec::new().route("a", collection().with_children(RouteSpec::new())));
        let err = root.collection("a").unwrap().collection("zz").unwrap_err();
        assert_eq!(err, RouteError::UnknownRoute { key: "zz".into(), parent: "/a".into() });
    }

    #[test]
    fn navigating_past_a_leaf_fails() {
        let root = routes(RouteSpec::new().route("a", collection()));
        let err = root.collection("a").unwrap().collection("b").unwrap_err();
        assert_eq!(err, RouteError::NotASubtree { path: "/a".into() });
    }

    #[test]
    fn every_call_rebinds_the_same_table() {
        let root = routes(RouteSpec::new().route(
            "m",
            member().with_children(RouteSpec::new().route("c", collection())),
        ));
        let first = root.member("m", 1).unwrap().into_scope().unwrap();
        assert_eq!(first.generation(), 1);
        let second = root.member("m", 2).unwrap().into_scope().unwrap();
        assert!(first.same_table(&second));
        assert_eq!(second.generation(), 2);
        assert_eq!(first.render().unwrap(), "/m/2");
    }

    #[test]
    fn snapshots_keep_their_binding() {
        let root = routes(RouteSpec::new().route(
            "m",
            member().with_children(RouteSpec::new().route("c", collection())),
        ));
        let pinned = root.member("m", 1).unwrap().into_scope().unwrap().snapshot();
        assert!(!pinned.is_stale());
        let _ = root.member("m", 0).unwrap();
        assert!(pinned.is_stale());
        assert_eq!(pinned.render().unwrap(), "/m/1");
        assert_eq!(pinned.collection("c").unwrap().as_path(), Some("/m/1/c"));
    }

    #[test]
    fn keys_keep_declaration_order() {
        let spec: RouteSpec = [("z", Node::from(collection())), ("a", member().into()), ("m", both(collection(), member()).into())]
            .into_iter()
            .collect();
        let root = routes(spec);
        assert_eq!(root.keys().collect::<Vec<_>>(), ["z", "a", "m"]);
        assert_eq!(root.route("m").unwrap().kind(), NodeKind::Both);
    }
}
