use serde::{Deserialize, Serialize};

/// Renewable-energy plant as returned by the plant service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    #[serde(deserialize_with = "crate::string_or_number")]
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(rename = "type", alias = "tipo", default)]
    pub plant_type: String,
    /// Nominal power in kW.
    #[serde(alias = "potenza", default)]
    pub power: f64,
    #[serde(alias = "comune", default)]
    pub municipality: Option<String>,
    #[serde(alias = "provincia", default)]
    pub province: Option<String>,
    #[serde(alias = "regione", default)]
    pub region: Option<String>,
}

impl Plant {
    /// Human-readable location, most specific first.
    pub fn location(&self) -> String {
        [&self.municipality, &self.province, &self.region]
            .iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: usize,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub per_page: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        (self.page as usize) * (self.per_page as usize) < self.total
    }
}
