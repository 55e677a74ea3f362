use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

/// One outbound GET per call. No retries, no caching.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryPolicy {
    /// Transport errors are logged, decode failures are treated as absent data.
    #[default]
    Silent,
    /// Every failure reaches `Continuation::on_error`.
    Strict,
}

pub trait ConfigProvider: Send + Sync {
    fn population_base_url(&self) -> &str;
    fn solar_endpoint(&self) -> Option<&str>;
    fn solar_parameters(&self) -> &BTreeMap<String, String>;
    fn timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
    fn delivery_policy(&self) -> DeliveryPolicy;
}

/// Receives the outcome of a single fetch. Consumed on delivery, so it runs at
/// most once.
pub trait Continuation<T>: Sized + Send + 'static {
    fn on_data_fetched(self, value: T);

    fn on_error(self, error: FetchError) {
        let _ = error;
    }
}

impl<T: Send + 'static> Continuation<T> for tokio::sync::oneshot::Sender<Result<T>> {
    fn on_data_fetched(self, value: T) {
        // The receiver may have gone away; nobody is left to notify.
        let _ = self.send(Ok(value));
    }

    fn on_error(self, error: FetchError) {
        let _ = self.send(Err(error));
    }
}

fn ignore_error(_error: FetchError) {}

/// Closure-backed continuation.
pub struct Callbacks<D, E> {
    on_data: D,
    on_error: E,
}

impl<D> Callbacks<D, fn(FetchError)> {
    pub fn new(on_data: D) -> Self {
        Self {
            on_data,
            on_error: ignore_error,
        }
    }
}

impl<D, E> Callbacks<D, E> {
    pub fn with_error<E2>(self, on_error: E2) -> Callbacks<D, E2>
    where
        E2: FnOnce(FetchError) + Send + 'static,
    {
        Callbacks {
            on_data: self.on_data,
            on_error,
        }
    }
}

impl<T, D, E> Continuation<T> for Callbacks<D, E>
where
    D: FnOnce(T) + Send + 'static,
    E: FnOnce(FetchError) + Send + 'static,
{
    fn on_data_fetched(self, value: T) {
        (self.on_data)(value)
    }

    fn on_error(self, error: FetchError) {
        (self.on_error)(error)
    }
}
