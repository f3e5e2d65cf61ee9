/// Invalid button declaration. These are programming mistakes, reported when
/// the window is built
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ButtonError {
    #[error("inline button {0:?} needs either callback data or url")]
    MissingAction(String),
    #[error("invalid url {0:?}: it should start with https://")]
    InsecureUrl(String),
    #[error("invalid url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("callback data {data:?} is {len} bytes long, max is {max}")]
    CallbackTooLong { data: String, len: usize, max: usize },
    #[error("button {0:?} got data to expand, but is not marked as expandable")]
    NotExpandable(String),
    #[error("button {0:?} can't put data into callback: callback data is not set")]
    MissingCallback(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("inline and reply buttons can't be mixed in one keyboard")]
    MixedKinds,
    #[error("row size should be positive")]
    ZeroRowSize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("no value for placeholder {{{0}}}")]
    MissingParam(String),
    #[error("positional placeholder {{}} at {0} is not supported, use named one")]
    Positional(usize),
    #[error("unclosed '{{' at {0}")]
    Unclosed(usize),
    #[error("single '}}' at {0}, use '}}}}' for literal brace")]
    UnmatchedClose(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error(transparent)]
    Button(#[from] ButtonError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("message text can't be empty, add window before sending")]
    EmptyText,
}
