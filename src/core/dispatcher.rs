use crate::core::{Continuation, DeliveryPolicy};
use crate::utils::error::{FetchError, Result};
use std::future::Future;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What the dispatcher did with a finished fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// `on_data_fetched` ran.
    Value,
    /// `on_error` ran.
    Error,
    /// Nothing was invoked: absent data, or an error under the silent policy.
    Suppressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Pending,
    Delivered(Delivery),
    Cancelled,
}

/// Hands a fetch result to its continuation, exactly once.
pub fn deliver<T, C>(result: Result<Option<T>>, continuation: C, policy: DeliveryPolicy) -> Delivery
where
    C: Continuation<T>,
{
    match result {
        Ok(Some(value)) => {
            continuation.on_data_fetched(value);
            Delivery::Value
        }
        Ok(None) => {
            tracing::debug!("Fetch produced no data; continuation not invoked");
            Delivery::Suppressed
        }
        Err(e) => match policy {
            DeliveryPolicy::Silent => {
                tracing::error!("Fetch failed: {}", e);
                Delivery::Suppressed
            }
            DeliveryPolicy::Strict => {
                tracing::warn!("Fetch failed: {}", e);
                continuation.on_error(e);
                Delivery::Error
            }
        },
    }
}

/// Runs `fetch` on the tokio runtime and delivers its result to
/// `continuation`. Cancelling the token before delivery drops the in-flight
/// request and the continuation without invoking it.
pub fn dispatch<T, F, C>(
    fetch: F,
    continuation: C,
    policy: DeliveryPolicy,
    token: CancellationToken,
) -> FetchHandle
where
    T: Send + 'static,
    F: Future<Output = Result<Option<T>>> + Send + 'static,
    C: Continuation<T>,
{
    let task_token = token.clone();
    let (state_tx, state_rx) = watch::channel(DispatchState::Pending);
    let task = tokio::spawn(async move {
        let state = tokio::select! {
            biased;
            _ = task_token.cancelled() => {
                tracing::info!("Fetch cancelled before delivery");
                DispatchState::Cancelled
            }
            result = fetch => DispatchState::Delivered(deliver(result, continuation, policy)),
        };
        // The handle may already be dropped.
        let _ = state_tx.send(state);
        state
    });

    FetchHandle {
        token,
        state: state_rx,
        task,
    }
}

/// Handle to one in-flight fetch.
#[derive(Debug)]
pub struct FetchHandle {
    token: CancellationToken,
    state: watch::Receiver<DispatchState>,
    task: JoinHandle<DispatchState>,
}

impl FetchHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Current state without waiting.
    pub fn state(&self) -> DispatchState {
        *self.state.borrow()
    }

    /// Waits for the fetch to reach a terminal state.
    pub async fn join(self) -> DispatchState {
        match self.task.await {
            Ok(state) => state,
            Err(e) if e.is_cancelled() => DispatchState::Cancelled,
            Err(e) => std::panic::resume_unwind(e.into_panic()),
        }
    }

    /// Like [`FetchHandle::join`], but reports cancellation as an error.
    pub async fn finished(self) -> Result<Delivery> {
        match self.join().await {
            DispatchState::Delivered(delivery) => Ok(delivery),
            DispatchState::Cancelled | DispatchState::Pending => Err(FetchError::Cancelled),
        }
    }
}
