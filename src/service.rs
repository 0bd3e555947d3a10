//! The rota service: one entry point for both delivery surfaces.
//!
//! Wraps a [`RotaStore`] and an [`EventBus`]. Writes go to the store and, once
//! they succeed, publish a [`ChangeEvent`]. Reads go through the shared
//! resolver and digest so desktop and mobile never diverge.

use crate::Result;
use crate::digest::{DailyDigest, build_digest};
use crate::events::{ChangeEvent, EventBus};
use crate::models::{
    Board, CareAction, Completion, Role, Substitution, Task, TaskId, Weekday, WeeklySchedule,
};
use crate::resolver::{DailyResolver, Resolution, Surface};
use crate::storage::RotaStore;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::broadcast;

pub struct Rota<S> {
    store: Arc<S>,
    events: EventBus,
}

impl<S> Clone for Rota<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            events: self.events.clone(),
        }
    }
}

impl<S: RotaStore> Rota<S> {
    pub fn new(store: S) -> Self {
        Self::with_shared(Arc::new(store))
    }

    /// Build around a store that is shared elsewhere.
    pub fn with_shared(store: Arc<S>) -> Self {
        Self {
            store,
            events: EventBus::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Receive change events for every successful write after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    // === Catalog ===

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.store.list_tasks()
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task> {
        self.store.get_task(id)
    }

    pub fn add_task(&self, cage: &str, name: &str) -> Result<Task> {
        self.store.add_task(cage, name)
    }

    pub fn update_task(&self, id: TaskId, cage: Option<&str>, name: Option<&str>) -> Result<Task> {
        self.store.update_task(id, cage, name)
    }

    // === Schedule ===

    pub fn board(&self, weekday: Weekday) -> Result<Board> {
        self.store.board(weekday)
    }

    pub fn weekly_schedule(&self) -> Result<WeeklySchedule> {
        self.store.weekly_schedule()
    }

    pub fn replace_assignments(
        &self,
        role: Role,
        weekday: Weekday,
        task_ids: &[TaskId],
    ) -> Result<()> {
        self.store.replace_assignments(role, weekday, task_ids)?;
        self.events.publish(ChangeEvent::BoardChanged { role, weekday });
        Ok(())
    }

    // === Substitutions ===

    pub fn set_substitute(
        &self,
        main_role: Role,
        date: NaiveDate,
        substitute: Option<Role>,
    ) -> Result<()> {
        self.store.set_substitute(main_role, date, substitute)?;
        self.events
            .publish(ChangeEvent::SubstitutesChanged { main_role, date });
        Ok(())
    }

    pub fn substitutes_for_date(&self, date: NaiveDate) -> Result<Vec<Substitution>> {
        self.store.substitutes_for_date(date)
    }

    // === Completions ===

    pub fn mark_complete(
        &self,
        task_id: TaskId,
        date: NaiveDate,
        completed_by: &str,
    ) -> Result<()> {
        self.store.mark_complete(task_id, date, completed_by)?;
        self.events
            .publish(ChangeEvent::CompletionChanged { task_id, date });
        Ok(())
    }

    pub fn cancel(&self, task_id: TaskId, date: NaiveDate) -> Result<()> {
        self.store.cancel(task_id, date)?;
        self.events
            .publish(ChangeEvent::CompletionChanged { task_id, date });
        Ok(())
    }

    pub fn completions_for_date(&self, date: NaiveDate) -> Result<Vec<Completion>> {
        self.store.completions_for_date(date)
    }

    // === Care actions ===

    pub fn record_actions(
        &self,
        task_id: TaskId,
        actions: &[String],
        username: &str,
        date: NaiveDate,
    ) -> Result<usize> {
        self.store.record_actions(task_id, actions, username, date)
    }

    pub fn actions_for_date(&self, date: NaiveDate) -> Result<Vec<CareAction>> {
        self.store.actions_for_date(date)
    }

    // === Resolution ===

    /// What `viewer` has to do on `date`, shaped for `surface`.
    pub fn today(&self, viewer: Role, date: NaiveDate, surface: Surface) -> Result<Resolution> {
        DailyResolver::new(self.store.as_ref()).resolve_for(viewer, date, surface)
    }

    pub fn digest(&self, date: NaiveDate) -> Result<DailyDigest> {
        build_digest(self.store.as_ref(), date)
    }
}
