use insta::assert_debug_snapshot;
use plantflow::api::TemplateQuery;
use plantflow::cli::commands::CommandContext;
use plantflow::core::catalog::TemplateCatalog;
use plantflow::core::config::{ConfigLoader, ConfigValidator};
use plantflow::types::{CreatorRole, Phase};
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_plantflow_env() {
    for v in &[
        "PLANTFLOW_API_BASE_URL",
        "PLANTFLOW_API_TIMEOUT_SECONDS",
        "PLANTFLOW_DEFAULT_ASSIGNEE",
        "PLANTFLOW_DEFAULT_DUE_OFFSET_DAYS",
        "PLANTFLOW_CREATOR_ROLE",
        "PLANTFLOW_EVALUATE_CONDITIONS",
        "PLANTFLOW_CATALOG_FILE",
    ] {
        env::remove_var(v);
    }
}

const CATALOG: &str = r#"
- id: conn-bt
  nome: Connessione BT
  fase: connessione
  power_range: { max: 100 }
  tasks:
    - id: preventivo
      nome: Richiesta preventivo
      ente_responsabile: DSO
- id: conn-mt
  nome: Connessione MT
  fase: connessione
  power_range: { min: 100 }
- id: aut-pas
  nome: PAS comunale
  fase: autorizzazione
- id: full-fv
  nome: Fotovoltaico completo
  categoria: completo
"#;

/// Full plantflow.toml with every section, then env overrides on top
#[test]
#[serial]
fn test_config_loading_integration() {
    clear_plantflow_env();
    let temp_dir = TempDir::new().unwrap();
    let workspace_path = temp_dir.path();

    let config_content = r#"
[api]
base_url = "https://compliance.example.it"
timeout_seconds = 10

[wizard]
default_assignee = "Ufficio Tecnico"
default_due_offset_days = 45
creator_role = "admin"
evaluate_conditions = true

[catalog]
file = "catalog/templates.yaml"
"#;
    fs::write(workspace_path.join("plantflow.toml"), config_content).unwrap();
    env::set_var("PLANTFLOW_API_TIMEOUT_SECONDS", "20");

    let config = ConfigLoader::load_from_workspace(workspace_path).unwrap();
    clear_plantflow_env();
    ConfigValidator::validate(&config).unwrap();

    assert_eq!(
        config.catalog.file,
        Some(workspace_path.join("catalog/templates.yaml"))
    );
    assert_debug_snapshot!((&config.api, &config.wizard), @r###"
    (
        ApiConfig {
            base_url: "https://compliance.example.it",
            timeout_seconds: 20,
        },
        WizardConfig {
            default_assignee: Some(
                "Ufficio Tecnico",
            ),
            default_due_offset_days: Some(
                45,
            ),
            creator_role: Admin,
            evaluate_conditions: true,
        },
    )
    "###);
}

#[test]
#[serial]
fn test_partial_config_keeps_section_defaults() {
    clear_plantflow_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("plantflow.toml"),
        "[wizard]\ncreator_role = \"customer\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.api.timeout_seconds, 30);
    assert_eq!(config.wizard.creator_role, CreatorRole::Customer);
    assert!(!config.wizard.evaluate_conditions);
}

#[test]
#[serial]
fn test_command_context_rejects_invalid_config() {
    clear_plantflow_env();
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("plantflow.toml"),
        "[api]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    let result = CommandContext::load(Some(temp_dir.path().to_path_buf()), false);
    assert!(result.is_err());

    env::set_var("PLANTFLOW_API_BASE_URL", "http://127.0.0.1:9000");
    let ctx = CommandContext::load(Some(temp_dir.path().to_path_buf()), true).unwrap();
    clear_plantflow_env();
    assert!(ctx.json);
    assert_eq!(ctx.config.api.base_url, "http://127.0.0.1:9000");
}

#[test]
#[serial]
fn test_catalog_file_from_config() {
    clear_plantflow_env();
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("catalog")).unwrap();
    fs::write(temp_dir.path().join("catalog/templates.yaml"), CATALOG).unwrap();
    fs::write(
        temp_dir.path().join("plantflow.toml"),
        "[catalog]\nfile = \"catalog/templates.yaml\"\n",
    )
    .unwrap();

    let config = ConfigLoader::load_from_workspace(temp_dir.path()).unwrap();
    let catalog = TemplateCatalog::load_from_file(config.catalog.file.as_deref().unwrap()).unwrap();
    assert_eq!(catalog.len(), 4);

    let small_connection: Vec<&str> = catalog
        .query(TemplateQuery {
            phase: Some(Phase::Connessione),
            min_power: Some(40.0),
        })
        .into_iter()
        .map(|template| template.id.as_str())
        .collect();
    assert_eq!(small_connection, vec!["conn-bt"]);

    let grouped = catalog.by_phase();
    let phases: Vec<Phase> = grouped.keys().copied().collect();
    assert_eq!(phases, vec![Phase::Autorizzazione, Phase::Connessione]);
    assert_eq!(grouped[&Phase::Connessione].len(), 2);

    assert!(catalog
        .resolve_phase_template(Phase::Autorizzazione, "aut-pas")
        .is_ok());
}

#[test]
fn test_catalog_parse_errors_carry_code() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.json");
    fs::write(&path, "{\"not\": \"a list\"}").unwrap();
    let err = TemplateCatalog::load_from_file(&path).unwrap_err();
    assert_eq!(err.code, "CAT-PARSE-001");
}
