use chrono::NaiveDate;
use indexmap::IndexMap;
use insta::assert_json_snapshot;
use plantflow::core::submission::{build_payload, SubmissionPayload};
use plantflow::core::task_filter::{TaskFilter, TaskKey};
use plantflow::core::wizard::{TemplateSelection, WizardState, WorkflowDetails};
use plantflow::types::{CreatorRole, Entity, Phase, Plant, TaskTemplate, WorkflowTemplate};

fn plant() -> Plant {
    serde_json::from_value(serde_json::json!({
        "id": 42,
        "nome": "Impianto Cascina Nord",
        "tipo": "fotovoltaico",
        "potenza": 150.0
    }))
    .unwrap()
}

fn task(id: Option<&str>, name: &str, entity: Option<Entity>) -> TaskTemplate {
    TaskTemplate {
        id: id.map(str::to_string),
        name: name.to_string(),
        description: String::new(),
        responsible_role: None,
        estimated_duration_days: None,
        required_documents: Vec::new(),
        checkpoints: Vec::new(),
        dependencies: Vec::new(),
        ente_responsabile: entity,
        condizione_applicazione: None,
    }
}

fn template() -> WorkflowTemplate {
    WorkflowTemplate {
        id: "tpl-bt".to_string(),
        name: "Connessione BT".to_string(),
        description: String::new(),
        category: "connessione".to_string(),
        phase: None,
        estimated_duration_days: None,
        tasks: vec![
            task(Some("preventivo"), "Richiesta preventivo", Some(Entity::Dso)),
            task(None, "Licenza officina", Some(Entity::Customs)),
            task(None, "Nulla osta", Some(Entity::Superintendency)),
        ],
        recurrence: None,
        power_range: None,
        required_entities: Vec::new(),
        base_documents: Vec::new(),
    }
}

fn base_state() -> WizardState {
    WizardState {
        plant: Some(plant()),
        details: WorkflowDetails {
            name: "  Connessione Cascina Nord ".to_string(),
            description: "Pratica BT".to_string(),
            responsible: "Laura Verdi".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 12, 31),
            notes: String::new(),
        },
        creator_role: CreatorRole::Admin,
        ..WizardState::default()
    }
}

fn single_state() -> WizardState {
    let mut state = base_state();
    state.selection = TemplateSelection::Single(Some(template()));
    for key in ["preventivo", "task-1"] {
        state.assignments.assign(TaskKey::from(key), "Mario Rossi");
        state
            .assignments
            .set_due_date(TaskKey::from(key), NaiveDate::from_ymd_opt(2026, 5, 1));
    }
    state.document_templates.insert("doc-dico".to_string());
    state
}

fn phase_state() -> WizardState {
    let mut phases = IndexMap::new();
    phases.insert(Phase::Autorizzazione, "aut-pas".to_string());
    phases.insert(Phase::Connessione, "conn-bt".to_string());
    let mut state = base_state();
    state.selection = TemplateSelection::Phases(phases);
    state.has_heritage_constraints = true;
    state.details.notes = "Area vincolata".to_string();
    state
}

fn payload(state: &WizardState) -> SubmissionPayload {
    let tasks = state.applicable_tasks(&TaskFilter::default());
    build_payload(state, &tasks).unwrap()
}

#[test]
fn single_template_payload_shape() {
    assert_json_snapshot!(payload(&single_state()), @r###"
    {
      "template_id": "tpl-bt",
      "task_assignments": {
        "preventivo": "Mario Rossi",
        "task-1": "Mario Rossi"
      },
      "task_due_dates": {
        "preventivo": "2026-05-01",
        "task-1": "2026-05-01"
      },
      "enti_coinvolti": [
        "DSO",
        "Dogane"
      ],
      "plant_id": "42",
      "name": "Connessione Cascina Nord",
      "description": "Pratica BT",
      "responsible": "Laura Verdi",
      "due_date": "2026-12-31",
      "created_by_role": "admin",
      "has_heritage_constraints": false,
      "use_simplified_process": false,
      "document_templates": [
        "doc-dico"
      ]
    }
    "###);
}

#[test]
fn phase_composed_payload_shape() {
    assert_json_snapshot!(payload(&phase_state()), @r###"
    {
      "use_phase_templates": true,
      "phase_templates": {
        "autorizzazione": "aut-pas",
        "connessione": "conn-bt"
      },
      "plant_id": "42",
      "name": "Connessione Cascina Nord",
      "description": "Pratica BT",
      "responsible": "Laura Verdi",
      "due_date": "2026-12-31",
      "notes": "Area vincolata",
      "created_by_role": "admin",
      "has_heritage_constraints": true,
      "use_simplified_process": false,
      "document_templates": []
    }
    "###);
}

#[test]
fn payload_modes_never_mix_fields() {
    let single = payload(&single_state()).to_json().unwrap();
    assert!(single.get("template_id").is_some());
    assert!(single.get("phase_templates").is_none());
    assert!(single.get("use_phase_templates").is_none());

    let phased = payload(&phase_state()).to_json().unwrap();
    assert_eq!(phased["use_phase_templates"], serde_json::json!(true));
    assert!(phased.get("phase_templates").is_some());
    assert!(phased.get("template_id").is_none());
    assert!(phased.get("task_assignments").is_none());
}

#[test]
fn filtered_out_tasks_are_not_submitted() {
    let mut state = single_state();
    state.plant.as_mut().unwrap().power = 12.0;
    state.has_heritage_constraints = false;

    let json = payload(&state).to_json().unwrap();
    let assignments = json["task_assignments"].as_object().unwrap();
    assert_eq!(assignments.len(), 1);
    assert!(assignments.contains_key("preventivo"));
    assert_eq!(json["enti_coinvolti"], serde_json::json!(["DSO"]));
}

#[test]
fn involved_entities_follow_task_order() {
    let mut state = single_state();
    if let TemplateSelection::Single(Some(template)) = &mut state.selection {
        template.tasks = vec![
            task(None, "Licenza officina", Some(Entity::Customs)),
            task(None, "Verifica contatore", Some(Entity::Customs)),
            task(Some("preventivo"), "Richiesta preventivo", Some(Entity::Dso)),
        ];
    }

    let json = payload(&state).to_json().unwrap();
    assert_eq!(json["enti_coinvolti"], serde_json::json!(["Dogane", "DSO"]));
}

#[test]
fn incomplete_state_is_refused() {
    let mut state = single_state();
    state.plant = None;
    let err = build_payload(&state, &[]).unwrap_err();
    assert_eq!(err.code, "WIZ-SUBMIT-002");

    let mut state = base_state();
    state.selection = TemplateSelection::Phases(IndexMap::new());
    assert!(build_payload(&state, &[]).is_err());
}

#[test]
fn common_fields_are_shared_by_both_shapes() {
    let single = payload(&single_state());
    let phased = payload(&phase_state());
    assert_eq!(single.common().plant_id, phased.common().plant_id);
    assert_eq!(single.common().name, "Connessione Cascina Nord");
    assert!(matches!(phased, SubmissionPayload::PhaseComposed(_)));
}
