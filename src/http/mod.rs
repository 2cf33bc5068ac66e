use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    config::Config,
    processor::optimistic_processor::OptimisticProcessor,
    statement::StatementBuilder,
    store::in_memory_store::InMemoryStore,
};

pub mod error;
pub mod handlers;

/// Built once at startup and shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub processor: OptimisticProcessor<InMemoryStore>,
    pub statements: StatementBuilder<InMemoryStore>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let mut store = InMemoryStore::new(&config.accounts);
        if let Some(capacity) = config.ledger_capacity {
            store = store.with_capacity(capacity);
        }
        let store = Arc::new(store);
        Self {
            processor: OptimisticProcessor::new(Arc::clone(&store), config.retry_limit),
            statements: StatementBuilder::new(store),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/clientes/{id}/transacoes",
            post(handlers::create_transaction),
        )
        .route("/clientes/{id}/extrato", get(handlers::get_statement))
        .with_state(state)
}
