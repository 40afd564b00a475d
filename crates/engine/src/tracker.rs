//! The tracker: what the expense page does in response to user actions.
//!
//! `Tracker` owns the record store and the active filters. Every mutation is
//! persisted before it returns; views and exports are recomputed on demand
//! from the current state, so there is no cached derived data to go stale.

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::{
    Currency, EngineError, Expense, ExpenseForm, KeyValueStore, Query, RecordStore,
    ResultEngine, ViewModel,
    export::{self, Artifact, DocumentRenderer},
};

#[derive(Debug)]
pub struct Tracker<S> {
    store: RecordStore<S>,
    query: Query,
    currency: Currency,
    new_id: fn() -> Uuid,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Opens the store on `backend` and starts with no filters.
    pub fn open(backend: S, currency: Currency) -> Self {
        Self {
            store: RecordStore::open(backend),
            query: Query::default(),
            currency,
            new_id: Uuid::new_v4,
        }
    }

    /// Replaces the id generator used for new records.
    #[must_use]
    pub fn with_id_generator(mut self, new_id: fn() -> Uuid) -> Self {
        self.new_id = new_id;
        self
    }

    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// All records, newest created or edited first.
    #[must_use]
    pub fn records(&self) -> &[Expense] {
        self.store.records()
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn set_query(&mut self, query: Query) {
        self.query = query;
    }

    pub fn clear_filters(&mut self) {
        self.query = Query::default();
    }

    /// Creates a record, or updates it when the form carries an id.
    ///
    /// Returns the id of the stored record. An invalid amount is rejected
    /// before anything changes.
    pub fn submit(
        &mut self,
        form: &ExpenseForm,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> ResultEngine<Uuid> {
        let expense = Expense::from_form(form, self.currency, self.new_id, now, today)?;
        let id = expense.id;
        let created = self.store.get(id).is_none();
        self.store.upsert(expense)?;
        if created {
            tracing::info!("created expense {id}");
        } else {
            tracing::info!("updated expense {id}");
        }
        Ok(id)
    }

    /// Loads the record into a form for editing.
    pub fn edit(&self, id: Uuid) -> ResultEngine<ExpenseForm> {
        self.store
            .get(id)
            .map(|expense| ExpenseForm::from_expense(expense, self.currency))
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Deletes the record once `confirm` agrees.
    ///
    /// Returns `Ok(false)` when the user declines; nothing changes then.
    pub fn delete<F>(&mut self, id: Uuid, confirm: F) -> ResultEngine<bool>
    where
        F: FnOnce(&Expense) -> bool,
    {
        let expense = self
            .store
            .get(id)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))?;
        if !confirm(expense) {
            tracing::debug!("delete of {id} declined");
            return Ok(false);
        }
        let removed = self.store.remove(id)?;
        if removed {
            tracing::info!("deleted expense {id}");
        }
        Ok(removed)
    }

    /// Records passing the active filters, in store order.
    #[must_use]
    pub fn visible(&self) -> Vec<&Expense> {
        crate::filter(self.store.records(), &self.query)
    }

    /// Builds the page.
    ///
    /// The list shows the filtered records; the four statistics always cover
    /// the full collection.
    pub fn view<Tz>(&self, now: NaiveDateTime, tz: &Tz) -> ViewModel
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let visible = self.visible();
        let groups = crate::group_by_date(visible);
        let stats = crate::compute_stats(self.store.records(), now);
        crate::view::render(&groups, &stats, self.currency, tz)
    }

    pub fn export_tabular(&self) -> ResultEngine<Artifact> {
        export::export_tabular(&self.visible(), self.currency)
    }

    pub fn export_document(
        &self,
        renderer: Option<&dyn DocumentRenderer>,
        generated_at: NaiveDateTime,
    ) -> ResultEngine<Artifact> {
        export::export_document(&self.visible(), self.currency, generated_at, renderer)
    }
}
