use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// External body that owns a compliance task.
///
/// The backend speaks Italian labels (`Dogane`, `Soprintendenza`, ...); English
/// aliases are accepted on input so hand-written catalogs stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Entity {
    /// Distribution system operator (grid connection).
    Dso,
    /// Terna / GAUDÌ grid registration.
    Terna,
    /// Gestore dei Servizi Energetici (incentives).
    Gse,
    /// Agenzia delle Dogane (excise and metering).
    Customs,
    /// Municipality (building permits, PAS/DILA).
    Municipality,
    /// Landscape and heritage superintendency.
    Superintendency,
    Other(String),
}

impl Entity {
    pub fn label(&self) -> &str {
        match self {
            Entity::Dso => "DSO",
            Entity::Terna => "Terna",
            Entity::Gse => "GSE",
            Entity::Customs => "Dogane",
            Entity::Municipality => "Comune",
            Entity::Superintendency => "Soprintendenza",
            Entity::Other(label) => label,
        }
    }
}

impl From<String> for Entity {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "dso" | "distributore" | "e-distribuzione" => Entity::Dso,
            "terna" | "gaudi" | "gaudì" => Entity::Terna,
            "gse" => Entity::Gse,
            "dogane" | "customs" | "agenzia dogane" => Entity::Customs,
            "comune" | "municipality" => Entity::Municipality,
            "soprintendenza" | "superintendency" => Entity::Superintendency,
            _ => Entity::Other(value),
        }
    }
}

impl From<Entity> for String {
    fn from(value: Entity) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a closed vocabulary value cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownValue {}

/// Compliance phase a phase template covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Progettazione,
    Autorizzazione,
    Connessione,
    Registrazione,
    Incentivazione,
    Fiscale,
    Esercizio,
}

impl Phase {
    pub const ALL: [Phase; 7] = [
        Phase::Progettazione,
        Phase::Autorizzazione,
        Phase::Connessione,
        Phase::Registrazione,
        Phase::Incentivazione,
        Phase::Fiscale,
        Phase::Esercizio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Progettazione => "progettazione",
            Phase::Autorizzazione => "autorizzazione",
            Phase::Connessione => "connessione",
            Phase::Registrazione => "registrazione",
            Phase::Incentivazione => "incentivazione",
            Phase::Fiscale => "fiscale",
            Phase::Esercizio => "esercizio",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        Phase::ALL
            .into_iter()
            .find(|phase| phase.as_str() == normalized)
            .ok_or_else(|| UnknownValue {
                kind: "phase",
                value: value.to_string(),
            })
    }
}

/// Role of the user creating a workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatorRole {
    Admin,
    #[default]
    Operator,
    Customer,
}

impl CreatorRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CreatorRole::Admin => "admin",
            CreatorRole::Operator => "operator",
            CreatorRole::Customer => "customer",
        }
    }
}

impl fmt::Display for CreatorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreatorRole {
    type Err = UnknownValue;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Ok(CreatorRole::Admin),
            "operator" => Ok(CreatorRole::Operator),
            "customer" => Ok(CreatorRole::Customer),
            _ => Err(UnknownValue {
                kind: "creator role",
                value: value.to_string(),
            }),
        }
    }
}
