use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A response body this crate knows how to decode.
pub trait Schema: DeserializeOwned + Send + 'static {
    const NAME: &'static str;

    /// Structural checks serde cannot express. Runs after a successful parse.
    fn check(&self) -> std::result::Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub population: u64,
}

/// Population for today (index 0) and tomorrow (index 1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationResponse {
    pub total_population: Vec<PopulationRecord>,
}

impl PopulationResponse {
    pub fn today(&self) -> Option<&PopulationRecord> {
        self.total_population.first()
    }

    pub fn tomorrow(&self) -> Option<&PopulationRecord> {
        self.total_population.get(1)
    }
}

impl Schema for PopulationResponse {
    const NAME: &'static str = "PopulationResponse";

    fn check(&self) -> std::result::Result<(), String> {
        if self.total_population.len() < 2 {
            return Err(format!(
                "total_population needs today and tomorrow entries, got {}",
                self.total_population.len()
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualMonthlyData {
    pub annual: f64,
    pub monthly: HashMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarOutputs {
    pub avg_dni: AnnualMonthlyData,
    pub avg_ghi: AnnualMonthlyData,
    pub avg_lat_tilt: AnnualMonthlyData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolarData {
    pub outputs: SolarOutputs,
}

impl Schema for SolarData {
    const NAME: &'static str = "SolarData";
}
