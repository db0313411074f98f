use std::path::PathBuf;
use thiserror::Error;

/// Failures when navigating or rendering a bound route tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The position was declared non-renderable. Always a usage bug.
    #[error("rendering not allowed: `{path}` is declared non-renderable")]
    ToStringDenied { path: String },
    #[error("no route named `{key}` under `{parent}`")]
    UnknownRoute { key: String, parent: String },
    #[error("route `{key}` is a member and needs an identifier")]
    MissingId { key: String },
    #[error("route `{key}` is a collection and takes no identifier")]
    UnexpectedId { key: String },
    #[error("`{path}` is a leaf path and has no child routes")]
    NotASubtree { path: String },
}

/// Failures when loading a declarative route definition.
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("at JSON path {path} → {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
