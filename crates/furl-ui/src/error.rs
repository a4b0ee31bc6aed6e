use furl_core::GraphError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("collapsed header height must be positive, got {0}")]
    NonPositiveCollapsedHeight(f32),
    #[error("collapsed header height {collapsed} must be below the big header height {big}")]
    CollapsedNotBelowBig { collapsed: f32, big: f32 },
    #[error("timing duration must be non-zero")]
    ZeroDuration,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum HeaderError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("invalid header configuration: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T, E = HeaderError> = std::result::Result<T, E>;
