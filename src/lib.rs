//! Declarative path helpers.
//!
//! Describe a tree of collections and members once, then walk it call by call
//! to produce path strings:
//!
//! ```
//! use route_gen::{both, collection, member, routes, RouteSpec};
//!
//! let root = routes(RouteSpec::new().route(
//!     "foos",
//!     both(
//!         collection(),
//!         member().with_children(RouteSpec::new().route("bar", collection())),
//!     ),
//! ));
//!
//! assert_eq!(root.render().unwrap(), "/");
//! assert_eq!(root.collection("foos").unwrap().as_path(), Some("/foos"));
//! assert_eq!(root.member("foos", 1).unwrap().render().unwrap(), "/foos/1");
//! assert_eq!(
//!     root.member("foos", 1).unwrap().collection("bar").unwrap().as_path(),
//!     Some("/foos/1/bar"),
//! );
//! ```
//!
//! Child tables are shared: invoking a node rebinds its one child table and
//! returns a live [`Scope`] on it, so an older scope from the same node reflects
//! the latest call. Use [`Scope::snapshot`] to keep a binding around.
pub mod path;
pub mod error;
pub mod node;
pub mod routes;
pub mod template;
pub mod definition;

pub use path::{PathBuilder, Segment};
pub use error::{DefinitionError, RouteError};
pub use node::{both, collection, member, Both, Collection, Member, Node, NodeKind, NodeOptions, RenderPolicy};
pub use routes::{routes, routes_with, BoundNode, Resolved, RouteSpec, Scope, Snapshot};
pub use template::{templates, RouteTemplate, TemplateKind};
pub use definition::{BranchDef, NodeDef, RouteFile};
