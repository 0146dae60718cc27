//! Per-task assignee and due-date bookkeeping for the wizard.

use crate::core::task_filter::{ApplicableTask, TaskKey};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Defaults used to pre-fill task assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDefaults {
    pub assignee: Option<String>,
    pub due_offset_days: Option<u32>,
}

impl AssignmentDefaults {
    pub fn is_set(&self) -> bool {
        self.assignee().is_some() || self.due_offset_days.is_some()
    }

    /// Trimmed default assignee, `None` when blank.
    pub fn assignee(&self) -> Option<&str> {
        self.assignee
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn due_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.due_offset_days
            .and_then(|offset| today.checked_add_days(Days::new(u64::from(offset))))
    }
}

/// Assignee and due-date maps keyed by [`TaskKey`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentStore {
    assignees: BTreeMap<TaskKey, String>,
    due_dates: BTreeMap<TaskKey, NaiveDate>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear (blank name) the assignee of one task.
    pub fn assign(&mut self, key: TaskKey, assignee: &str) {
        let assignee = assignee.trim();
        if assignee.is_empty() {
            self.assignees.remove(&key);
        } else {
            self.assignees.insert(key, assignee.to_string());
        }
    }

    pub fn set_due_date(&mut self, key: TaskKey, due_date: Option<NaiveDate>) {
        match due_date {
            Some(date) => {
                self.due_dates.insert(key, date);
            }
            None => {
                self.due_dates.remove(&key);
            }
        }
    }

    pub fn assignee(&self, key: &TaskKey) -> Option<&str> {
        self.assignees.get(key).map(String::as_str)
    }

    pub fn due_date(&self, key: &TaskKey) -> Option<NaiveDate> {
        self.due_dates.get(key).copied()
    }

    pub fn assignees(&self) -> &BTreeMap<TaskKey, String> {
        &self.assignees
    }

    pub fn due_dates(&self) -> &BTreeMap<TaskKey, NaiveDate> {
        &self.due_dates
    }

    /// Fill unset entries from `defaults`; returns how many tasks changed.
    pub fn apply_defaults(
        &mut self,
        tasks: &[ApplicableTask],
        defaults: &AssignmentDefaults,
        today: NaiveDate,
    ) -> usize {
        let assignee = defaults.assignee();
        let due_date = defaults.due_date(today);
        let mut changed = 0;
        for applicable in tasks {
            let mut touched = false;
            if let Some(name) = assignee {
                if self.assignee(&applicable.key).is_none() {
                    self.assignees.insert(applicable.key.clone(), name.to_string());
                    touched = true;
                }
            }
            if let Some(date) = due_date {
                if !self.due_dates.contains_key(&applicable.key) {
                    self.due_dates.insert(applicable.key.clone(), date);
                    touched = true;
                }
            }
            if touched {
                changed += 1;
            }
        }
        changed
    }

    /// Overwrite every task with `defaults`, discarding manual overrides.
    pub fn apply_defaults_to_all(
        &mut self,
        tasks: &[ApplicableTask],
        defaults: &AssignmentDefaults,
        today: NaiveDate,
    ) -> usize {
        let assignee = defaults.assignee();
        let due_date = defaults.due_date(today);
        let mut changed = 0;
        for applicable in tasks {
            let mut touched = false;
            if let Some(name) = assignee {
                let previous = self
                    .assignees
                    .insert(applicable.key.clone(), name.to_string());
                touched |= previous.as_deref() != Some(name);
            }
            if let Some(date) = due_date {
                let previous = self.due_dates.insert(applicable.key.clone(), date);
                touched |= previous != Some(date);
            }
            if touched {
                changed += 1;
            }
        }
        changed
    }

    /// Whether every task has a non-empty assignee and a due date.
    pub fn is_complete(&self, tasks: &[ApplicableTask]) -> bool {
        tasks.iter().all(|applicable| self.is_task_complete(&applicable.key))
    }

    /// Keys of tasks still missing an assignee or a due date.
    pub fn unassigned(&self, tasks: &[ApplicableTask]) -> Vec<TaskKey> {
        tasks
            .iter()
            .filter(|applicable| !self.is_task_complete(&applicable.key))
            .map(|applicable| applicable.key.clone())
            .collect()
    }

    /// Drop entries whose task is no longer in `tasks`.
    pub fn retain(&mut self, tasks: &[ApplicableTask]) {
        let live: BTreeSet<&TaskKey> = tasks.iter().map(|applicable| &applicable.key).collect();
        self.assignees.retain(|key, _| live.contains(key));
        self.due_dates.retain(|key, _| live.contains(key));
    }

    pub fn clear(&mut self) {
        self.assignees.clear();
        self.due_dates.clear();
    }

    fn is_task_complete(&self, key: &TaskKey) -> bool {
        self.assignee(key).is_some_and(|name| !name.trim().is_empty())
            && self.due_dates.contains_key(key)
    }
}
