use crate::domain::model::{AnnualMonthlyData, PopulationResponse, SolarData};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

/// Display text for the today/tomorrow population figures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationSummary {
    pub today_text: String,
    pub tomorrow_text: String,
}

impl PopulationSummary {
    pub fn from_response(response: &PopulationResponse) -> Option<Self> {
        Some(Self {
            today_text: response.today()?.population.to_string(),
            tomorrow_text: response.tomorrow()?.population.to_string(),
        })
    }
}

/// One solar output: title, annual value and a `Month: value` description,
/// one month per line.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarRow {
    pub title: String,
    pub value: String,
    pub description: String,
}

impl SolarRow {
    pub fn rows(data: &SolarData) -> Vec<SolarRow> {
        let outputs = &data.outputs;
        vec![
            Self::from_output("Direct Normal Irradiance", &outputs.avg_dni),
            Self::from_output("Global Horizontal Irradiance", &outputs.avg_ghi),
            Self::from_output("Latitude Tilt Irradiance", &outputs.avg_lat_tilt),
        ]
    }

    pub fn from_output(title: &str, output: &AnnualMonthlyData) -> Self {
        let mut months: Vec<(&String, &f64)> = output.monthly.iter().collect();
        months.sort_by(|(a, _), (b, _)| month_order(a).cmp(&month_order(b)).then(a.cmp(b)));

        let description = months
            .into_iter()
            .map(|(month, value)| format!("{}: {:.2}", month, value))
            .collect::<Vec<_>>()
            .join("\n");

        Self {
            title: title.to_string(),
            value: format!("{:.2}", output.annual),
            description,
        }
    }

    /// `(month, value)` pairs from the description. Lines that do not split
    /// into exactly two `:` parts are skipped.
    pub fn description_lines(&self) -> Vec<(String, String)> {
        self.description
            .split('\n')
            .filter_map(|line| {
                let parts: Vec<&str> = line.split(':').collect();
                match parts.as_slice() {
                    [month, value] => Some((month.trim().to_string(), value.trim().to_string())),
                    _ => None,
                }
            })
            .collect()
    }
}

fn month_order(label: &str) -> usize {
    let key = label.trim().to_ascii_lowercase();
    MONTHS
        .iter()
        .position(|m| key.starts_with(m))
        .unwrap_or(MONTHS.len())
}
