use crate::{
    api::{ComplianceBackend, HttpBackend, TemplateQuery},
    cli::answers::WizardAnswers,
    cli::args::{DocumentArgs, PlantArgs, PlantsArgs, TasksArgs, TemplatesArgs, WizardArgs},
    core::{
        assignment::AssignmentDefaults,
        catalog::TemplateCatalog,
        clock::SystemClock,
        documents::{DocumentGeneration, GenerationStatus},
        task_filter::{ConditionPolicy, TaskFilter},
        wizard::{WizardController, WizardSession, WizardState},
        ConfigLoader, ConfigValidator, PlantflowConfig,
    },
    Result,
};
use anyhow::{anyhow, Context};
use plantflow_types::{DocumentPreview, GeneratedDocument, Plant, WorkflowTemplate};
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolved workspace, configuration and output mode shared by every command.
pub struct CommandContext {
    pub workspace: PathBuf,
    pub config: PlantflowConfig,
    pub json: bool,
}

impl CommandContext {
    pub fn load(workspace: Option<PathBuf>, json: bool) -> Result<Self> {
        let workspace = match workspace {
            Some(path) => path,
            None => env::current_dir().context("cannot determine current directory")?,
        };
        let config = ConfigLoader::load_from_workspace(&workspace)?;
        ConfigValidator::validate(&config)?;
        Ok(CommandContext {
            workspace,
            config,
            json,
        })
    }

    fn backend(&self) -> Result<HttpBackend> {
        HttpBackend::from_config(&self.config.api)
            .with_context(|| format!("invalid backend configuration {}", self.config.api.base_url))
    }

    fn task_filter(&self, force_conditions: bool) -> TaskFilter {
        if force_conditions || self.config.wizard.evaluate_conditions {
            TaskFilter::new(ConditionPolicy::Evaluate)
        } else {
            TaskFilter::new(ConditionPolicy::Ignore)
        }
    }

    /// Catalog file when configured, otherwise the template service.
    async fn load_templates(
        &self,
        backend: &dyn ComplianceBackend,
        query: TemplateQuery,
    ) -> Result<Vec<WorkflowTemplate>> {
        if let Some(path) = &self.config.catalog.file {
            let catalog = TemplateCatalog::load_from_file(path)?;
            return Ok(catalog.query(query).into_iter().cloned().collect());
        }
        Ok(backend.list_templates(query).await?)
    }

    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

pub async fn plants(ctx: &CommandContext, args: PlantsArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let page = backend.list_plants(args.page, args.per_page).await?;
    tracing::info!(count = page.items.len(), page = page.page, "listed plants");

    ctx.emit(&page, || {
        let mut out = format!(
            "Plants (page {}, {} of {} total)\n",
            page.page,
            page.items.len(),
            page.total
        );
        for plant in &page.items {
            out.push_str(&format_plant_line(plant));
            out.push('\n');
        }
        if page.has_more() {
            out.push_str(&format!("More: --page {}", page.page + 1));
        }
        out.trim_end().to_string()
    })
}

pub async fn plant(ctx: &CommandContext, args: PlantArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let plant = backend.get_plant(&args.plant_id).await?;
    ctx.emit(&plant, || {
        format!(
            "{}\n  id: {}\n  type: {}\n  power: {} kW\n  location: {}",
            plant.name,
            plant.id,
            plant.plant_type,
            plant.power,
            plant.location()
        )
    })
}

pub async fn templates(ctx: &CommandContext, args: TemplatesArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let query = TemplateQuery {
        phase: args.phase,
        min_power: args.min_power,
    };
    let templates = ctx.load_templates(&backend, query).await?;

    ctx.emit(&templates, || {
        if templates.is_empty() {
            return "No templates match".to_string();
        }
        templates
            .iter()
            .map(|template| {
                let phase = template
                    .phase
                    .map(|phase| phase.to_string())
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{:<24} {:<16} {:>3} tasks  {}",
                    template.id,
                    phase,
                    template.tasks.len(),
                    template.name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    })
}

#[derive(Serialize)]
struct TaskRow<'a> {
    key: &'a str,
    name: &'a str,
    entity: Option<String>,
    condition: Option<&'a str>,
}

pub async fn tasks(ctx: &CommandContext, args: TasksArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let templates = ctx.load_templates(&backend, TemplateQuery::default()).await?;
    let template = templates
        .iter()
        .find(|template| template.id == args.template_id)
        .ok_or_else(|| anyhow!("template '{}' not found", args.template_id))?;

    let filter = ctx.task_filter(args.evaluate_conditions);
    let applicable = filter.apply(template, args.power, args.heritage);
    tracing::info!(
        template = %template.id,
        kept = applicable.len(),
        dropped = template.tasks.len() - applicable.len(),
        "filtered template tasks"
    );

    let rows: Vec<TaskRow<'_>> = applicable
        .iter()
        .map(|task| TaskRow {
            key: task.key.as_str(),
            name: &task.task.name,
            entity: task.task.ente_responsabile.as_ref().map(|e| e.to_string()),
            condition: task.task.condizione_applicazione.as_deref(),
        })
        .collect();

    ctx.emit(&rows, || {
        let mut out = format!(
            "{}: {} of {} tasks apply to a {} kW plant{}\n",
            template.name,
            rows.len(),
            template.tasks.len(),
            args.power,
            if args.heritage {
                " with heritage constraints"
            } else {
                ""
            }
        );
        for row in &rows {
            out.push_str(&format!(
                "  {:<24} {:<16} {}\n",
                row.key,
                row.entity.as_deref().unwrap_or("-"),
                row.name
            ));
        }
        out.trim_end().to_string()
    })
}

pub async fn wizard(ctx: &CommandContext, args: WizardArgs) -> Result<()> {
    let answers = WizardAnswers::load(&args.answers)?;
    let backend = Arc::new(ctx.backend()?);

    let state = WizardState {
        defaults: AssignmentDefaults {
            assignee: ctx.config.wizard.default_assignee.clone(),
            due_offset_days: ctx.config.wizard.default_due_offset_days,
        },
        creator_role: ctx.config.wizard.creator_role,
        ..WizardState::default()
    };
    let controller = WizardController::new(Arc::new(ctx.task_filter(false)), Arc::new(SystemClock))
        .with_state(state);
    let mut session = WizardSession::new(backend.clone(), controller);

    if !answers.uses_phase_templates() {
        let templates = ctx
            .load_templates(backend.as_ref(), TemplateQuery::default())
            .await?;
        session.set_templates(templates);
    } else if let Some(path) = &ctx.config.catalog.file {
        let catalog = TemplateCatalog::load_from_file(path)?;
        for (phase, template_id) in &answers.phase_templates {
            catalog.resolve_phase_template(*phase, template_id)?;
        }
    }

    answers.drive(&mut session).await?;

    if args.dry_run {
        let payload = session.controller().payload()?;
        println!("{}", serde_json::to_string_pretty(&payload)?);
        session.controller_mut().cancel();
        return Ok(());
    }

    let workflow_id = session.submit().await?;
    ctx.emit(&serde_json::json!({ "id": workflow_id }), || {
        format!("Created workflow {}", workflow_id)
    })
}

/// Everything the `document` command produced, printed as one value with `--json`.
#[derive(Serialize)]
struct DocumentOutput {
    preview: Option<DocumentPreview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<GeneratedDocument>,
}

pub async fn document(ctx: &CommandContext, args: DocumentArgs) -> Result<()> {
    let backend = ctx.backend()?;
    let mut generation = DocumentGeneration::new(&args.workflow_id, &args.template_id);

    let preview = match generation.preview(&backend).await {
        GenerationStatus::Previewed(preview) => Some(preview.clone()),
        GenerationStatus::Error(message) => return Err(anyhow!(*message)),
        _ => None,
    };
    if !ctx.json {
        if let Some(preview) = &preview {
            println!("{}", format_preview(preview));
        }
    }

    let document = if args.preview_only {
        None
    } else {
        match generation.generate(&backend, args.format).await {
            GenerationStatus::Ready(document) => Some(document.clone()),
            GenerationStatus::Error(message) => return Err(anyhow!(*message)),
            other => return Err(anyhow!("unexpected generation status {}", other.label())),
        }
    };

    if ctx.json {
        let output = DocumentOutput { preview, document };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if let Some(document) = &document {
        println!("{}", format_document(document));
    }
    Ok(())
}

fn format_preview(preview: &DocumentPreview) -> String {
    let mut out = String::from("Placeholders:\n");
    for (name, value) in &preview.placeholders {
        out.push_str(&format!("  {} = {}\n", name, value));
    }
    if !preview.missing.is_empty() {
        out.push_str(&format!("Missing: {}", preview.missing.join(", ")));
    }
    out.trim_end().to_string()
}

fn format_document(document: &GeneratedDocument) -> String {
    match &document.download_url {
        Some(url) => format!("Generated {} ({}): {}", document.id, document.format, url),
        None => format!("Generated {} ({})", document.id, document.format),
    }
}

fn format_plant_line(plant: &Plant) -> String {
    format!(
        "{:<8} {:<32} {:<14} {:>10.1} kW  {}",
        plant.id,
        plant.name,
        plant.plant_type,
        plant.power,
        plant.location()
    )
}
