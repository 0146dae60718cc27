use plantflow::core::task_filter::{
    filter_tasks, is_applicable, ConditionPolicy, TaskFilter, TaskKey, CUSTOMS_POWER_THRESHOLD_KW,
};
use plantflow::types::{Entity, TaskTemplate, WorkflowTemplate};

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

fn template(tasks: Vec<TaskTemplate>) -> WorkflowTemplate {
    WorkflowTemplate {
        id: "tpl-fv-bt".to_string(),
        name: "Fotovoltaico BT".to_string(),
        description: String::new(),
        category: "connessione".to_string(),
        phase: None,
        estimated_duration_days: None,
        tasks,
        recurrence: None,
        power_range: None,
        required_entities: Vec::new(),
        base_documents: Vec::new(),
    }
}

fn three_entity_template() -> WorkflowTemplate {
    template(vec![
        task(Some("dogane-licenza"), "Licenza officina elettrica", Some(Entity::Customs)),
        task(
            Some("soprintendenza-nulla-osta"),
            "Nulla osta paesaggistico",
            Some(Entity::Superintendency),
        ),
        task(Some("comunicazione-comune"), "Comunicazione inizio lavori", None),
    ])
}

fn mixed_template() -> WorkflowTemplate {
    template(vec![
        task(None, "Richiesta preventivo", Some(Entity::Dso)),
        task(None, "Licenza officina", Some(Entity::Customs)),
        task(None, "Autorizzazione paesaggistica", Some(Entity::Superintendency)),
        task(None, "Registrazione GAUDÌ", Some(Entity::Terna)),
        task(None, "Convenzione GSE", Some(Entity::Gse)),
        task(None, "Fine lavori", Some(Entity::Municipality)),
        task(None, "Verifica dogane", Some(Entity::Customs)),
    ])
}

#[test]
fn small_plant_without_constraints_keeps_only_unconditional_task() {
    let tasks = filter_tasks(&three_entity_template(), 15.0, false);
    let keys: Vec<&str> = tasks.iter().map(|t| t.key.as_str()).collect();
    assert_eq!(keys, vec!["comunicazione-comune"]);
}

#[test]
fn large_plant_with_constraints_keeps_every_task() {
    let tasks = filter_tasks(&three_entity_template(), 999.0, true);
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].position, 0);
    assert_eq!(tasks[2].position, 2);
}

#[test]
fn customs_tasks_never_survive_at_or_below_threshold() {
    let template = mixed_template();
    for power in [0.0, 3.0, 19.99, CUSTOMS_POWER_THRESHOLD_KW] {
        for heritage in [false, true] {
            let kept = filter_tasks(&template, power, heritage);
            assert!(
                kept.iter().all(|t| !t.task.is_owned_by(&Entity::Customs)),
                "customs task kept at {} kW",
                power
            );
        }
    }
    let above = filter_tasks(&template, 20.5, false);
    assert_eq!(
        above
            .iter()
            .filter(|t| t.task.is_owned_by(&Entity::Customs))
            .count(),
        2
    );
}

#[test]
fn superintendency_tasks_need_heritage_constraints() {
    let template = mixed_template();
    for power in [1.0, 50.0, 5_000.0] {
        let kept = filter_tasks(&template, power, false);
        assert!(kept
            .iter()
            .all(|t| !t.task.is_owned_by(&Entity::Superintendency)));
    }
    assert!(filter_tasks(&template, 50.0, true)
        .iter()
        .any(|t| t.task.is_owned_by(&Entity::Superintendency)));
}

#[test]
fn filter_preserves_template_order() {
    let kept = filter_tasks(&mixed_template(), 10.0, false);
    let names: Vec<&str> = kept.iter().map(|t| t.task.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Richiesta preventivo",
            "Registrazione GAUDÌ",
            "Convenzione GSE",
            "Fine lavori"
        ]
    );
}

#[test]
fn positional_keys_follow_full_template_position() {
    let template = mixed_template();
    let small = filter_tasks(&template, 10.0, false);
    let large = filter_tasks(&template, 100.0, true);

    // "Registrazione GAUDÌ" sits at index 3 whatever gets filtered out.
    let key_in = |tasks: &[plantflow::core::ApplicableTask]| {
        tasks
            .iter()
            .find(|t| t.task.name == "Registrazione GAUDÌ")
            .map(|t| t.key.clone())
    };
    assert_eq!(key_in(&small), Some(TaskKey::from("task-3")));
    assert_eq!(key_in(&small), key_in(&large));
}

#[test]
fn blank_ids_fall_back_to_position() {
    let blank = task(Some("  "), "Senza id", None);
    assert_eq!(TaskKey::for_task(4, &blank).as_str(), "task-4");
    let named = task(Some("pratica-gse"), "Con id", None);
    assert_eq!(TaskKey::for_task(4, &named).as_str(), "pratica-gse");
}

#[test]
fn other_entities_are_always_applicable() {
    let municipality = task(None, "Pratica comunale", Some(Entity::Municipality));
    let custom = task(None, "Consorzio", Some(Entity::Other("Consorzio".to_string())));
    assert!(is_applicable(&municipality, 1.0, false));
    assert!(is_applicable(&custom, 1.0, false));
}

#[test]
fn default_filter_ignores_condition_text() {
    let mut conditional = task(Some("verifica"), "Verifica", None);
    conditional.condizione_applicazione = Some("potenza > 1000".to_string());
    let template = template(vec![conditional]);

    let filter = TaskFilter::default();
    assert_eq!(filter.policy(), ConditionPolicy::Ignore);
    assert_eq!(filter.apply(&template, 10.0, false).len(), 1);
}

#[test]
fn evaluating_filter_applies_conditions_after_entity_rules() {
    let mut big_only = task(Some("big-only"), "Solo grandi impianti", None);
    big_only.condizione_applicazione = Some("potenza > 1000".to_string());
    let mut heritage_only = task(Some("heritage-only"), "Solo vincolati", None);
    heritage_only.condizione_applicazione = Some("vincoli_paesaggistici".to_string());
    let mut unreadable = task(Some("unreadable"), "Condizione illeggibile", None);
    unreadable.condizione_applicazione = Some("potenza >>> ???".to_string());
    let customs = task(Some("customs"), "Dogane", Some(Entity::Customs));
    let template = template(vec![big_only, heritage_only, unreadable, customs]);

    let filter = TaskFilter::new(ConditionPolicy::Evaluate);
    let keys = |power: f64, heritage: bool| -> Vec<String> {
        filter
            .apply(&template, power, heritage)
            .into_iter()
            .map(|t| t.key.to_string())
            .collect()
    };

    assert_eq!(keys(10.0, false), vec!["unreadable"]);
    assert_eq!(
        keys(2_000.0, true),
        vec!["big-only", "heritage-only", "unreadable", "customs"]
    );
}
