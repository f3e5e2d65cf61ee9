use std::future::Future;

use tokio_util::sync::CancellationToken;

/// Run `f` until it completes or `token` is cancelled. Returns `None` when
/// the future was cancelled.
pub async fn spawn_with_token<R>(token: CancellationToken, f: impl Future<Output = R>) -> Option<R> {
    tokio::select! {
        _ = token.cancelled() => None,
        res = f => Some(res),
    }
}
