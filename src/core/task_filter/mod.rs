//! Applicability filtering of template tasks against plant attributes.
//!
//! Two rules are always enforced: Customs tasks only apply above
//! [`CUSTOMS_POWER_THRESHOLD_KW`], Superintendency tasks only apply to plants
//! with heritage constraints. The free-text `condizione_applicazione` of a task
//! is ignored unless the filter is built with [`ConditionPolicy::Evaluate`].

mod condition;

pub use condition::{ConditionEngine, ConditionInputs};

use plantflow_types::{Entity, TaskTemplate, WorkflowTemplate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Plants at or below this power never need Customs paperwork.
pub const CUSTOMS_POWER_THRESHOLD_KW: f64 = 20.0;

/// Stable key for a task inside one template.
///
/// The task id when present, otherwise `task-{n}` where `n` is the position in
/// the template's full task list, so keys survive re-filtering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn for_task(position: usize, task: &TaskTemplate) -> Self {
        match task.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => TaskKey(id.to_string()),
            _ => TaskKey(format!("task-{}", position)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskKey {
    fn from(value: &str) -> Self {
        TaskKey(value.to_string())
    }
}

impl fmt::Display for TaskKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task retained by the filter, with its key and template position.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicableTask {
    pub key: TaskKey,
    pub position: usize,
    pub task: TaskTemplate,
}

/// Whether a task passes the fixed entity rules.
pub fn is_applicable(task: &TaskTemplate, plant_power: f64, has_heritage_constraints: bool) -> bool {
    if task.is_owned_by(&Entity::Customs) && plant_power <= CUSTOMS_POWER_THRESHOLD_KW {
        return false;
    }
    if task.is_owned_by(&Entity::Superintendency) && !has_heritage_constraints {
        return false;
    }
    true
}

/// Tasks of `template` that apply to a plant, in template order.
pub fn filter_tasks(
    template: &WorkflowTemplate,
    plant_power: f64,
    has_heritage_constraints: bool,
) -> Vec<ApplicableTask> {
    template
        .tasks
        .iter()
        .enumerate()
        .filter(|(_, task)| is_applicable(task, plant_power, has_heritage_constraints))
        .map(|(position, task)| ApplicableTask {
            key: TaskKey::for_task(position, task),
            position,
            task: task.clone(),
        })
        .collect()
}

/// How `condizione_applicazione` expressions are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConditionPolicy {
    /// Only the fixed entity rules apply.
    #[default]
    Ignore,
    /// Expressions are evaluated after the entity rules.
    Evaluate,
}

/// Configured task filter used by the wizard.
pub struct TaskFilter {
    engine: Option<ConditionEngine>,
}

impl Default for TaskFilter {
    fn default() -> Self {
        Self::new(ConditionPolicy::Ignore)
    }
}

impl TaskFilter {
    pub fn new(policy: ConditionPolicy) -> Self {
        let engine = match policy {
            ConditionPolicy::Ignore => None,
            ConditionPolicy::Evaluate => Some(ConditionEngine::default()),
        };
        TaskFilter { engine }
    }

    pub fn policy(&self) -> ConditionPolicy {
        if self.engine.is_some() {
            ConditionPolicy::Evaluate
        } else {
            ConditionPolicy::Ignore
        }
    }

    pub fn apply(
        &self,
        template: &WorkflowTemplate,
        plant_power: f64,
        has_heritage_constraints: bool,
    ) -> Vec<ApplicableTask> {
        let tasks = filter_tasks(template, plant_power, has_heritage_constraints);
        let Some(engine) = &self.engine else {
            return tasks;
        };

        let inputs = ConditionInputs {
            power_kw: plant_power,
            has_heritage_constraints,
        };
        tasks
            .into_iter()
            .filter(|applicable| {
                let Some(expr) = applicable.task.condizione_applicazione.as_deref() else {
                    return true;
                };
                match engine.evaluate(expr, inputs) {
                    Ok(include) => include,
                    Err(err) => {
                        tracing::warn!(
                            task = %applicable.key,
                            template = %template.id,
                            "keeping task with unreadable condition: {}",
                            err
                        );
                        true
                    }
                }
            })
            .collect()
    }
}
