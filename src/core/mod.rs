pub mod client;
pub mod decoder;
pub mod dispatcher;
pub mod endpoints;
pub mod fetcher;
pub mod presenter;

pub use crate::domain::model::{PopulationResponse, Schema, SolarData};
pub use crate::domain::ports::{Callbacks, ConfigProvider, Continuation, DeliveryPolicy, Fetcher};
pub use crate::utils::error::Result;
