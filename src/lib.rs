pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Command};

pub use crate::config::ClientConfig;
pub use crate::core::client::{DataClient, SolarQuery};
pub use crate::core::dispatcher::{Delivery, DispatchState, FetchHandle};
pub use crate::core::endpoints::Endpoints;
pub use crate::core::fetcher::HttpFetcher;
pub use crate::core::presenter::{PopulationSummary, SolarRow};
pub use crate::domain::model::{AnnualMonthlyData, PopulationRecord, PopulationResponse, SolarData};
pub use crate::domain::ports::{Callbacks, Continuation, DeliveryPolicy, Fetcher};
pub use crate::utils::error::{FetchError, Result};
