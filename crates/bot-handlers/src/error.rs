use teloxide::RequestError;

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Db(#[from] db::Error),
    #[error("failed to send window: {0}")]
    Send(#[from] sender::SendError),
    #[error("telegram request failed: {0}")]
    Request(#[from] RequestError),
}
