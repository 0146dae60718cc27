use serde::{Deserialize, Serialize};
use std::fmt;

/// Screens of the workflow creation wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    SelectPlant,
    SelectTemplate,
    Configure,
    AssignTasks,
    DocumentTemplates,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 6] = [
        WizardStep::SelectPlant,
        WizardStep::SelectTemplate,
        WizardStep::Configure,
        WizardStep::AssignTasks,
        WizardStep::DocumentTemplates,
        WizardStep::Review,
    ];

    pub const FIRST: WizardStep = WizardStep::SelectPlant;

    /// Forward transition; `None` at Review, where only submission remains.
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectPlant => Some(WizardStep::SelectTemplate),
            WizardStep::SelectTemplate => Some(WizardStep::Configure),
            WizardStep::Configure => Some(WizardStep::AssignTasks),
            WizardStep::AssignTasks => Some(WizardStep::DocumentTemplates),
            WizardStep::DocumentTemplates => Some(WizardStep::Review),
            WizardStep::Review => None,
        }
    }

    pub fn previous(self) -> Option<WizardStep> {
        match self {
            WizardStep::SelectPlant => None,
            WizardStep::SelectTemplate => Some(WizardStep::SelectPlant),
            WizardStep::Configure => Some(WizardStep::SelectTemplate),
            WizardStep::AssignTasks => Some(WizardStep::Configure),
            WizardStep::DocumentTemplates => Some(WizardStep::AssignTasks),
            WizardStep::Review => Some(WizardStep::DocumentTemplates),
        }
    }

    /// One-based position shown as "step n of 6".
    pub fn number(self) -> usize {
        WizardStep::ALL
            .iter()
            .position(|step| *step == self)
            .map(|index| index + 1)
            .unwrap_or(0)
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::SelectPlant => "Select plant",
            WizardStep::SelectTemplate => "Select template",
            WizardStep::Configure => "Configure workflow",
            WizardStep::AssignTasks => "Assign tasks",
            WizardStep::DocumentTemplates => "Document templates",
            WizardStep::Review => "Review",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{})", self.title(), self.number(), WizardStep::ALL.len())
    }
}
