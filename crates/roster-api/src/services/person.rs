// Person business logic over the blocking store
//
// Every store call hops onto a worker thread via run_blocking; nothing in
// this module touches the database from the scheduler's own thread.

use std::sync::Arc;

use anyhow::Result;

use roster_core::run_blocking;
use roster_storage::{CreatePerson, PersonStore, UpdatePerson};

use crate::persons::Person;

pub struct PersonService {
    store: Arc<PersonStore>,
}

impl PersonService {
    pub fn new(store: Arc<PersonStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: CreatePerson) -> Result<Person> {
        let store = Arc::clone(&self.store);
        let row = run_blocking(move || store.insert_one(&input)).await??;
        Ok(Person::from_row(row))
    }

    pub async fn get(&self, id: i64) -> Result<Option<Person>> {
        let store = Arc::clone(&self.store);
        let row = run_blocking(move || store.get(id)).await??;
        Ok(row.map(Person::from_row))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Person>> {
        let store = Arc::clone(&self.store);
        let rows = run_blocking(move || store.list(limit, offset)).await??;
        Ok(rows.into_iter().map(Person::from_row).collect())
    }

    pub async fn update(&self, id: i64, input: UpdatePerson) -> Result<Option<Person>> {
        let store = Arc::clone(&self.store);
        let row = run_blocking(move || store.update(id, &input)).await??;
        Ok(row.map(Person::from_row))
    }

    pub async fn delete(&self, id: i64) -> Result<bool> {
        let store = Arc::clone(&self.store);
        let deleted = run_blocking(move || store.delete(id)).await??;
        Ok(deleted)
    }
}
