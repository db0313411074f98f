//! Declarative route trees loaded from JSON.
//!
//! ```json
//! {
//!   "root_render": "deny",
//!   "routes": {
//!     "posts": { "both": {
//!       "collection": {},
//!       "member": { "children": { "comments": { "member": {} } } }
//!     } }
//!   }
//! }
//! ```
use std::path::Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;

use crate::error::DefinitionError;
use crate::node::{self, Collection, Member, Node, NodeOptions, RenderPolicy};
use crate::routes::{self, RouteSpec, Scope};
use crate::template::{self, RouteTemplate};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteFile {
    #[serde(default)]
    pub root_render: RenderPolicy,
    #[serde(default)]
    pub routes: IndexMap<String, NodeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeDef {
    Collection(BranchDef),
    Member(BranchDef),
    Both { collection: BranchDef, member: BranchDef },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BranchDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<IndexMap<String, NodeDef>>,
    #[serde(default)]
    pub parent_render: RenderPolicy,
}

// ————————————————————————————————————————————————————————————————————————————
// LOADING
// ————————————————————————————————————————————————————————————————————————————

impl RouteFile {
    pub fn from_json_str(src: &str) -> Result<Self, DefinitionError> {
        from_str_with_path(src)
    }
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, DefinitionError> {
        from_slice_with_path(bytes)
    }
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DefinitionError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| DefinitionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_json_slice(&bytes)?;
        tracing::debug!(path = %path.display(), routes = file.routes.len(), "loaded route definition");
        Ok(file)
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DefinitionError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_parse_error)
}

fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DefinitionError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(into_parse_error)
}

fn into_parse_error(err: serde_path_to_error::Error<serde_json::Error>) -> DefinitionError {
    let path = err.path().to_string();
    DefinitionError::Parse { path, source: err.into_inner() }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSION
// ————————————————————————————————————————————————————————————————————————————

impl RouteFile {
    pub fn to_spec(&self) -> RouteSpec {
        spec_of(self.routes.clone())
    }
    pub fn into_spec(self) -> RouteSpec {
        spec_of(self.routes)
    }
    /// Bind the declared tree at the root, honouring `root_render`.
    pub fn bind(self) -> Scope {
        let root_render = self.root_render;
        routes::routes_with(root_render, self.into_spec())
    }
    pub fn templates(&self) -> Vec<RouteTemplate> {
        template::templates(&self.to_spec(), self.root_render)
    }
}

impl From<NodeDef> for Node {
    fn from(def: NodeDef) -> Self {
        match def {
            NodeDef::Collection(x) => Collection::new(x.into_options()).into(),
            NodeDef::Member(x) => Member::new(x.into_options()).into(),
            NodeDef::Both { collection, member } => node::both(
                Collection::new(collection.into_options()),
                Member::new(member.into_options()),
            ).into(),
        }
    }
}

impl BranchDef {
    fn into_options(self) -> NodeOptions {
        NodeOptions {
            children: self.children.map(spec_of),
            parent_render: self.parent_render,
        }
    }
}

fn spec_of(defs: IndexMap<String, NodeDef>) -> RouteSpec {
    defs.into_iter().map(|(k, v)| (k, Node::from(v))).collect()
}
