use crate::core::decoder::{decode, try_decode};
use crate::core::dispatcher::{dispatch, FetchHandle};
use crate::core::endpoints::Endpoints;
use crate::core::fetcher::HttpFetcher;
use crate::core::{ConfigProvider, Continuation, DeliveryPolicy, Fetcher};
use crate::domain::model::{PopulationResponse, Schema, SolarData};
use crate::utils::error::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Extra query parameters for a single solar request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SolarQuery {
    parameters: BTreeMap<String, String>,
}

impl SolarQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }
}

impl FromIterator<(String, String)> for SolarQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            parameters: iter.into_iter().collect(),
        }
    }
}

/// Fetch → decode → deliver for the population and solar resources.
pub struct DataClient<F: Fetcher = HttpFetcher> {
    fetcher: Arc<F>,
    endpoints: Endpoints,
    policy: DeliveryPolicy,
}

impl<F: Fetcher> Clone for DataClient<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            endpoints: self.endpoints.clone(),
            policy: self.policy,
        }
    }
}

impl DataClient<HttpFetcher> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut endpoints = Endpoints::new(config.population_base_url())?;
        if let Some(solar) = config.solar_endpoint() {
            endpoints = endpoints.with_solar(solar, config.solar_parameters().clone())?;
        }

        let fetcher = HttpFetcher::new(config.timeout(), config.user_agent())?;
        tracing::debug!(
            "Data client ready (timeout {:?}, policy {:?}, solar configured: {})",
            config.timeout(),
            config.delivery_policy(),
            endpoints.has_solar()
        );

        Ok(Self::new(fetcher, endpoints, config.delivery_policy()))
    }
}

impl<F: Fetcher + 'static> DataClient<F> {
    pub fn new(fetcher: F, endpoints: Endpoints, policy: DeliveryPolicy) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            endpoints,
            policy,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Fetches and decodes `url` as `T`, reporting every failure.
    pub async fn fetch_decoded<T: Schema>(&self, url: &Url) -> Result<T> {
        let bytes = self.fetcher.fetch(url).await?;
        try_decode(&bytes)
    }

    pub async fn fetch_population(&self, country: &str) -> Result<PopulationResponse> {
        let url = self.endpoints.population_url(country)?;
        self.fetch_decoded(&url).await
    }

    pub async fn fetch_solar(&self, query: &SolarQuery) -> Result<SolarData> {
        let url = self.endpoints.solar_url(query.parameters())?;
        self.fetch_decoded(&url).await
    }

    /// Starts a population fetch for `country` and delivers the result to
    /// `continuation`. An unusable country or base URL is returned here,
    /// before anything is spawned.
    pub fn population<C>(&self, country: &str, continuation: C) -> Result<FetchHandle>
    where
        C: Continuation<PopulationResponse>,
    {
        let url = self.endpoints.population_url(country)?;
        Ok(self.spawn::<PopulationResponse, C>(url, continuation))
    }

    pub fn solar<C>(&self, query: &SolarQuery, continuation: C) -> Result<FetchHandle>
    where
        C: Continuation<SolarData>,
    {
        let url = self.endpoints.solar_url(query.parameters())?;
        Ok(self.spawn::<SolarData, C>(url, continuation))
    }

    fn spawn<T, C>(&self, url: Url, continuation: C) -> FetchHandle
    where
        T: Schema,
        C: Continuation<T>,
    {
        let fetcher = Arc::clone(&self.fetcher);
        let policy = self.policy;

        let fetch = async move {
            let bytes = fetcher.fetch(&url).await?;
            match policy {
                DeliveryPolicy::Silent => Ok(decode::<T>(&bytes)),
                DeliveryPolicy::Strict => try_decode::<T>(&bytes).map(Some),
            }
        };

        dispatch(fetch, continuation, policy, CancellationToken::new())
    }
}
