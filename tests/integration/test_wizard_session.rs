use chrono::NaiveDate;
use plantflow::api::{HttpBackend, TemplateQuery};
use plantflow::cli::answers::WizardAnswers;
use plantflow::core::clock::FixedClock;
use plantflow::core::task_filter::TaskFilter;
use plantflow::core::wizard::{
    WizardAction, WizardController, WizardOutcome, WizardSession, WizardStep, WorkflowDetails,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session(server: &MockServer) -> WizardSession<HttpBackend> {
    let base_url = Url::parse(&server.uri()).expect("invalid mock server URL");
    let backend = HttpBackend::new(base_url, Duration::from_secs(5)).unwrap();
    let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
    let controller = WizardController::new(Arc::new(TaskFilter::default()), Arc::new(clock));
    WizardSession::new(Arc::new(backend), controller)
}

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/plants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": 42, "name": "Cascina Nord", "type": "fotovoltaico", "power": 15.0}],
            "total": 1,
            "page": 1,
            "per_page": 25
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/workflow-templates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": "tpl-bt",
            "name": "Connessione BT",
            "tasks": [
                {"id": "dogane", "name": "Licenza officina", "ente_responsabile": "Dogane"},
                {"id": "soprintendenza", "name": "Nulla osta", "ente_responsabile": "Soprintendenza"},
                {"name": "Comunicazione fine lavori"}
            ]
        }])))
        .mount(server)
        .await;
}

fn details() -> WorkflowDetails {
    WorkflowDetails {
        name: "Connessione Cascina Nord".to_string(),
        description: String::new(),
        responsible: "Laura Verdi".to_string(),
        due_date: NaiveDate::from_ymd_opt(2026, 12, 31),
        notes: String::new(),
    }
}

/// Walk a session on the small plant up to Review.
async fn walk_to_review(session: &mut WizardSession<HttpBackend>) {
    session.load_plants(1, 25).await;
    session.load_templates(TemplateQuery::default()).await;
    session.select_plant("42").await.unwrap();
    session.controller_mut().next().unwrap();
    session.select_template("tpl-bt").unwrap();

    let controller = session.controller_mut();
    controller.next().unwrap();
    controller.dispatch(WizardAction::Configure(details())).unwrap();
    controller.next().unwrap();
    controller
        .dispatch(WizardAction::AssignTask {
            key: "task-2".into(),
            assignee: "Mario Rossi".to_string(),
        })
        .unwrap();
    controller
        .dispatch(WizardAction::SetTaskDueDate {
            key: "task-2".into(),
            due_date: NaiveDate::from_ymd_opt(2026, 6, 1),
        })
        .unwrap();
    controller.next().unwrap();
    controller.next().unwrap();
    assert_eq!(controller.step(), WizardStep::Review);
}

#[tokio::test]
async fn test_listing_failures_leave_loaded_data_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Prima", "power": 10.0}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/plants"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut session = session(&server);
    assert_eq!(session.load_plants(1, 25).await.len(), 1);
    let after_failure = session.load_plants(2, 25).await;
    assert_eq!(after_failure.len(), 1);
    assert_eq!(after_failure[0].name, "Prima");

    // No template service mocked: the listing stays empty and nothing panics.
    assert!(session.load_document_templates().await.is_empty());
}

#[tokio::test]
async fn test_unknown_template_is_rejected() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let mut session = session(&server);
    session.load_plants(1, 25).await;
    session.load_templates(TemplateQuery::default()).await;

    session.select_plant("42").await.unwrap();
    session.controller_mut().next().unwrap();
    let err = session.select_template("tpl-mt").unwrap_err();
    assert_eq!(err.code, "WIZ-SEL-003");
}

#[tokio::test]
async fn test_submit_posts_single_template_payload() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/workflows"))
        .and(body_partial_json(json!({
            "template_id": "tpl-bt",
            "plant_id": "42",
            "task_assignments": {"task-2": "Mario Rossi"},
            "task_due_dates": {"task-2": "2026-06-01"},
            "enti_coinvolti": []
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "wf-77"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    walk_to_review(&mut session).await;

    let workflow_id = session.submit().await.unwrap();
    assert_eq!(workflow_id, "wf-77");
    assert_eq!(
        session.controller().outcome(),
        Some(&WizardOutcome::Submitted {
            workflow_id: "wf-77".to_string()
        })
    );
}

#[tokio::test]
async fn test_failed_submission_keeps_wizard_on_review() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/workflows"))
        .respond_with(ResponseTemplate::new(422).set_body_string("duplicate workflow"))
        .mount(&server)
        .await;

    let mut session = session(&server);
    walk_to_review(&mut session).await;
    let before = session.controller().state().clone();

    let err = session.submit().await.unwrap_err();
    assert_eq!(err.code, "API_STATUS");
    assert_eq!(session.controller().step(), WizardStep::Review);
    assert!(!session.controller().is_finished());
    assert_eq!(session.controller().state(), &before);
}

#[tokio::test]
async fn test_answers_file_drives_session_to_review() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;

    let answers: WizardAnswers = serde_yaml::from_str(
        r#"
plant_id: "42"
template_id: tpl-bt
name: Connessione Cascina Nord
responsible: Laura Verdi
due_date: 2026-12-31
default_assignee: Ufficio Tecnico
default_due_offset_days: 30
tasks:
  task-2:
    assignee: Mario Rossi
document_templates: [doc-dico]
"#,
    )
    .unwrap();
    answers.validate().unwrap();

    let mut session = session(&server);
    session.load_plants(1, 25).await;
    session.load_templates(TemplateQuery::default()).await;
    answers.drive(&mut session).await.unwrap();

    let controller = session.controller();
    assert_eq!(controller.step(), WizardStep::Review);
    let payload = controller.payload().unwrap().to_json().unwrap();
    assert_eq!(payload["task_assignments"], json!({"task-2": "Mario Rossi"}));
    assert_eq!(payload["task_due_dates"], json!({"task-2": "2026-05-01"}));
    assert_eq!(payload["document_templates"], json!(["doc-dico"]));
}

#[tokio::test]
async fn test_select_plant_fetches_plants_missing_from_listing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/plants/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 9, "name": "Parco Sud", "power": 900.0
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = session(&server);
    session.select_plant("9").await.unwrap();
    let plant = session.controller().state().plant.as_ref().unwrap();
    assert_eq!(plant.name, "Parco Sud");
    assert!(session.controller().is_step_valid());
}
