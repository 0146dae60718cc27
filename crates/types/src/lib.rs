//! Data model shared between the plantflow wizard core and the compliance backend.
//!
//! Everything here is plain serde data: plants and templates are read-only
//! reference records fetched from the backend, document types mirror the
//! document-template service responses.

pub mod document;
pub mod entity;
pub mod plant;
pub mod template;

pub use document::{CreatedWorkflow, DocumentFormat, DocumentPreview, DocumentTemplateRef, GeneratedDocument};
pub use entity::{CreatorRole, Entity, Phase, UnknownValue};
pub use plant::{Page, Plant};
pub use template::{PowerRange, Recurrence, TaskTemplate, WorkflowTemplate};

use serde::{Deserialize, Deserializer};

/// Accept identifiers sent either as JSON strings or as integers.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Unsigned(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Int(value) => value.to_string(),
        RawId::Unsigned(value) => value.to_string(),
    })
}

pub(crate) fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "string_or_number")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}
