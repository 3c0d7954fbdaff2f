use crate::entities::top_entities;
use crate::error::TallyError;
use crate::orchestrator::{run_load, LoadOptions};
use crate::sessions::user_sessions;
use crate::store::Store;
use crate::types::{EntityRank, LoadSummary, Session, WindowQuery};
use chrono::{DateTime, Utc};

pub struct Tally<S: Store> {
    store: S,
}

impl<S: Store> Tally<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn loads(&self) -> LoadsApi<'_, S> {
        LoadsApi { core: self }
    }

    pub fn sessions(&self) -> SessionsApi<'_, S> {
        SessionsApi { core: self }
    }

    pub fn entities(&self) -> EntitiesApi<'_, S> {
        EntitiesApi { core: self }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

pub struct LoadsApi<'a, S: Store> {
    core: &'a Tally<S>,
}

impl<S: Store> LoadsApi<'_, S> {
    pub fn run(&self, options: &LoadOptions) -> Result<LoadSummary, TallyError> {
        run_load(&self.core.store, options)
    }
}

pub struct SessionsApi<'a, S: Store> {
    core: &'a Tally<S>,
}

impl<S: Store> SessionsApi<'_, S> {
    pub fn list(&self, query: WindowQuery) -> Result<Vec<Session>, TallyError> {
        self.list_at(query, Utc::now())
    }

    pub fn list_at(
        &self,
        query: WindowQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<Session>, TallyError> {
        user_sessions(&self.core.store, query, now)
    }
}

pub struct EntitiesApi<'a, S: Store> {
    core: &'a Tally<S>,
}

impl<S: Store> EntitiesApi<'_, S> {
    pub fn top(&self, query: WindowQuery) -> Result<Vec<EntityRank>, TallyError> {
        self.top_at(query, Utc::now())
    }

    pub fn top_at(
        &self,
        query: WindowQuery,
        now: DateTime<Utc>,
    ) -> Result<Vec<EntityRank>, TallyError> {
        top_entities(&self.core.store, query, now)
    }
}
