use crate::entity::{Entity, Phase};
use serde::{Deserialize, Serialize};

/// Immutable workflow template published by the template service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowTemplate {
    #[serde(deserialize_with = "crate::string_or_number")]
    pub id: String,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "descrizione", default)]
    pub description: String,
    #[serde(alias = "categoria", default)]
    pub category: String,
    /// Phase covered when the template is used as a phase template.
    #[serde(alias = "fase", default)]
    pub phase: Option<Phase>,
    #[serde(alias = "durata_stimata", default)]
    pub estimated_duration_days: Option<u32>,
    #[serde(alias = "tasks_template", default)]
    pub tasks: Vec<TaskTemplate>,
    #[serde(alias = "ricorrenza", default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub power_range: Option<PowerRange>,
    #[serde(alias = "enti_richiesti", default)]
    pub required_entities: Vec<Entity>,
    #[serde(alias = "documenti_base", default)]
    pub base_documents: Vec<String>,
}

impl WorkflowTemplate {
    /// Whether the template targets plants of the given power.
    pub fn applies_to_power(&self, power_kw: f64) -> bool {
        self.power_range
            .as_ref()
            .map(|range| range.contains(power_kw))
            .unwrap_or(true)
    }
}

/// Single task inside a workflow template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskTemplate {
    #[serde(default, deserialize_with = "crate::optional_string_or_number")]
    pub id: Option<String>,
    #[serde(alias = "nome")]
    pub name: String,
    #[serde(alias = "descrizione", default)]
    pub description: String,
    #[serde(alias = "responsabile", default)]
    pub responsible_role: Option<String>,
    #[serde(alias = "durata_stimata", default)]
    pub estimated_duration_days: Option<u32>,
    #[serde(alias = "documenti_richiesti", default)]
    pub required_documents: Vec<String>,
    #[serde(default)]
    pub checkpoints: Vec<String>,
    #[serde(alias = "dipendenze", default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub ente_responsabile: Option<Entity>,
    /// Free-text applicability expression such as `potenza > 20`.
    #[serde(alias = "condizioneApplicazione", default)]
    pub condizione_applicazione: Option<String>,
}

impl TaskTemplate {
    pub fn is_owned_by(&self, entity: &Entity) -> bool {
        self.ente_responsabile.as_ref() == Some(entity)
    }
}

/// Recurrence of periodic compliance workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[serde(alias = "mensile")]
    Monthly,
    #[serde(alias = "trimestrale")]
    Quarterly,
    #[serde(alias = "semestrale")]
    Semiannual,
    #[serde(alias = "annuale")]
    Yearly,
}

/// Inclusive power interval in kW; open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

impl PowerRange {
    pub fn contains(&self, power_kw: f64) -> bool {
        self.min.map(|min| power_kw >= min).unwrap_or(true)
            && self.max.map(|max| power_kw <= max).unwrap_or(true)
    }
}
