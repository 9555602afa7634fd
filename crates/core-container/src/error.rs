#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("no container with id `{0}`")]
    NotFound(String),
    #[error("invalid split policy: {0}")]
    InvalidSplit(String),
    #[error("cannot place a widget on {0}: it is split, clear it first")]
    WidgetOnSplit(String),
    #[error("cannot split {0}: it holds a widget, clear it first")]
    SplitOnWidget(String),
    #[error("container id `{0}` is used more than once")]
    DuplicateId(String),
    #[error("conflicting options: {0}")]
    Conflict(String),
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
