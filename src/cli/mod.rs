pub mod answers;
pub mod args;
pub mod commands;

pub use args::{DocumentArgs, PlantArgs, PlantsArgs, TasksArgs, TemplatesArgs, WizardArgs};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "plantflow")]
#[command(version = crate::VERSION)]
#[command(about = "Compliance workflow composition for renewable-energy plants")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: browse plants and templates, preview the applicable tasks, then run the wizard with an answers file (use --dry-run first)."
)]
pub struct Args {
    /// Directory holding plantflow.toml and .plantflow/ (default: current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub workspace: Option<PathBuf>,

    /// Emit machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "List plants known to the backend",
        after_help = "Example:\n    plantflow plants --page 2 --per-page 50"
    )]
    Plants(PlantsArgs),
    #[command(
        about = "Show one plant",
        after_help = "Example:\n    plantflow plant 42"
    )]
    Plant(PlantArgs),
    #[command(
        about = "List workflow and phase templates",
        long_about = "Templates lists the catalog from the template service, or from catalog.file when configured, optionally narrowed to one phase and a plant power.",
        after_help = "Example:\n    plantflow templates --phase connessione --min-power 150"
    )]
    Templates(TemplatesArgs),
    #[command(
        about = "Preview the tasks a template yields for a plant",
        long_about = "Tasks applies the applicability rules: Customs tasks are dropped at or below 20 kW, Superintendency tasks are dropped without heritage constraints.",
        after_help = "Example:\n    plantflow tasks tpl-connessione --power 15"
    )]
    Tasks(TasksArgs),
    #[command(
        about = "Run the workflow creation wizard from an answers file",
        long_about = "Wizard walks every step (plant, template, configuration, assignments, documents, review), enforcing the same validation as the dashboard, then creates the workflow.",
        after_help = "Example:\n    plantflow wizard answers.yaml --dry-run"
    )]
    Wizard(WizardArgs),
    #[command(
        about = "Preview or generate a document for a workflow",
        after_help = "Example:\n    plantflow document wf-12 tpl-dichiarazione --format pdf"
    )]
    Document(DocumentArgs),
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Plants(_) => "plants",
            Command::Plant(_) => "plant",
            Command::Templates(_) => "templates",
            Command::Tasks(_) => "tasks",
            Command::Wizard(_) => "wizard",
            Command::Document(_) => "document",
        }
    }
}

pub async fn run(args: Args) -> crate::Result<()> {
    let ctx = commands::CommandContext::load(args.workspace, args.json)?;
    match args.command {
        Command::Plants(plants_args) => commands::plants(&ctx, plants_args).await,
        Command::Plant(plant_args) => commands::plant(&ctx, plant_args).await,
        Command::Templates(templates_args) => commands::templates(&ctx, templates_args).await,
        Command::Tasks(tasks_args) => commands::tasks(&ctx, tasks_args).await,
        Command::Wizard(wizard_args) => commands::wizard(&ctx, wizard_args).await,
        Command::Document(document_args) => commands::document(&ctx, document_args).await,
    }
}
