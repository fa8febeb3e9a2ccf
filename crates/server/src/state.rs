use crate::{config::Config, db::Database};

/// Top-level application state handed to every handler. All mutable state
/// lives in the database; handlers hold no ambient globals.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self { db, config }
    }
}
