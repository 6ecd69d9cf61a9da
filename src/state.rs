use std::sync::Arc;

use mongodb::{Client, Collection};

use crate::{
    config::Config,
    database::init_mongo,
    models::{Counter, Person},
};

/// Process-wide state, created once at startup and shared by every handler.
pub struct AppState {
    pub config: Config,
    pub client: Client,
    pub persons: Collection<Person>,
    pub counter: Collection<Counter>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let (client, collections) = init_mongo(&config.mongodb_uri, &config.database).await;

        Arc::new(Self {
            config,
            client,
            persons: collections.persons,
            counter: collections.counter,
        })
    }

    /// Closes the MongoDB session. Call once the server has stopped serving.
    pub async fn shutdown(self: Arc<Self>) {
        self.client.clone().shutdown().await;
    }
}
