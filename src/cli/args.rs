use clap::Args;
use plantflow_types::{DocumentFormat, Phase};
use std::path::PathBuf;

#[derive(Args)]
pub struct PlantsArgs {
    /// Page to fetch, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Plants per page (default: 25)
    #[arg(long, default_value = "25")]
    pub per_page: u32,
}

#[derive(Args)]
pub struct PlantArgs {
    /// Identifier of the plant to show
    #[arg(value_name = "PLANT_ID")]
    pub plant_id: String,
}

#[derive(Args)]
pub struct TemplatesArgs {
    /// Only list phase templates for this phase
    #[arg(long, value_name = "PHASE")]
    pub phase: Option<Phase>,

    /// Only list templates applicable to a plant of this power (kW)
    #[arg(long, value_name = "KW")]
    pub min_power: Option<f64>,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Template whose tasks should be filtered
    #[arg(value_name = "TEMPLATE_ID")]
    pub template_id: String,

    /// Plant power in kW
    #[arg(long, value_name = "KW")]
    pub power: f64,

    /// Plant is subject to landscape or heritage constraints
    #[arg(long)]
    pub heritage: bool,

    /// Also evaluate each task's applicability expression
    #[arg(long)]
    pub evaluate_conditions: bool,
}

#[derive(Args)]
pub struct WizardArgs {
    /// YAML or JSON file with the answers for every wizard step
    #[arg(value_name = "ANSWERS_FILE")]
    pub answers: PathBuf,

    /// Print the submission payload instead of creating the workflow
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct DocumentArgs {
    /// Workflow the document belongs to
    #[arg(value_name = "WORKFLOW_ID")]
    pub workflow_id: String,

    /// Document template to fill
    #[arg(value_name = "TEMPLATE_ID")]
    pub template_id: String,

    /// Output format: docx or pdf (default: docx)
    #[arg(long, default_value = "docx")]
    pub format: DocumentFormat,

    /// Stop after showing the placeholder preview
    #[arg(long)]
    pub preview_only: bool,
}
