use crate::utils::error::{FetchError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url};
use std::collections::BTreeMap;
use url::Url;

pub const DEFAULT_POPULATION_BASE_URL: &str = "https://d6wn6bmjj722w.population.io:443";

/// Resolved request targets for both resources.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    population_base: Url,
    solar: Option<Url>,
    solar_parameters: BTreeMap<String, String>,
}

impl Endpoints {
    pub fn new(population_base_url: &str) -> Result<Self> {
        let population_base = validate_url("population.base_url", population_base_url)?;
        if population_base.cannot_be_a_base() {
            return Err(FetchError::invalid_request(
                "population.base_url",
                population_base_url,
                "URL cannot be used as a base",
            ));
        }

        Ok(Self {
            population_base,
            solar: None,
            solar_parameters: BTreeMap::new(),
        })
    }

    pub fn with_solar(
        mut self,
        endpoint: &str,
        parameters: BTreeMap<String, String>,
    ) -> Result<Self> {
        self.solar = Some(validate_url("solar.endpoint", endpoint)?);
        self.solar_parameters = parameters;
        Ok(self)
    }

    /// `{base}/1.0/population/{country}/today-and-tomorrow/`
    pub fn population_url(&self, country: &str) -> Result<Url> {
        validate_non_empty_string("country", country)?;
        let country = country.trim();
        if country.contains('/') || country == "." || country == ".." {
            return Err(FetchError::invalid_request(
                "country",
                country,
                "Country must be a single path segment",
            ));
        }

        let mut url = self.population_base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::invalid_request(
                    "population.base_url",
                    self.population_base.as_str(),
                    "URL cannot be used as a base",
                )
            })?
            .pop_if_empty()
            .extend(["1.0", "population", country, "today-and-tomorrow", ""]);

        Ok(url)
    }

    /// Solar endpoint with its own query, then configured parameters, then
    /// `extra` overlaid; later keys win and the result is encoded in key order.
    pub fn solar_url(&self, extra: &BTreeMap<String, String>) -> Result<Url> {
        let mut url = self.solar.clone().ok_or_else(|| {
            FetchError::invalid_request("solar.endpoint", "", "No solar endpoint configured")
        })?;

        let mut parameters: BTreeMap<String, String> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        parameters.extend(self.solar_parameters.iter().map(|(k, v)| (k.clone(), v.clone())));
        parameters.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        url.set_query(None);
        if !parameters.is_empty() {
            url.query_pairs_mut().extend_pairs(parameters.iter());
        }

        Ok(url)
    }

    pub fn has_solar(&self) -> bool {
        self.solar.is_some()
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            population_base: Url::parse(DEFAULT_POPULATION_BASE_URL)
                .expect("default population URL is valid"),
            solar: None,
            solar_parameters: BTreeMap::new(),
        }
    }
}
