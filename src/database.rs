//! # MongoDB
//!
//! Document store holding the two collections this service works with.
//!
//! ## Layout
//!
//! - `persons`: one document per person, each with an append-only `users`
//!   array of every anonymous visitor who lit a candle for them
//! - `counter`: a single document keyed by [`COUNTER_NAME`] whose `counter`
//!   field is the global number of candles lit
//!
//! ## Deployment precondition
//!
//! The counter document is seeded outside this service and must exist before
//! the first candle is lit. The service never creates it, only reads it and
//! increments it atomically with `$inc`.

use mongodb::{Client, Collection};
use tracing::info;

use crate::models::{Counter, Person};

pub const PERSONS_COLLECTION: &str = "persons";
pub const COUNTER_COLLECTION: &str = "counter";

/// Logical name of the singleton counter document.
pub const COUNTER_NAME: &str = "counts lit candles";

pub struct Collections {
    pub persons: Collection<Person>,
    pub counter: Collection<Counter>,
}

pub async fn init_mongo(uri: &str, database: &str) -> (Client, Collections) {
    info!("Connecting to MongoDB...");

    let client = Client::with_uri_str(uri)
        .await
        .expect("MongoDB misconfigured!");
    let db = client.database(database);

    let collections = Collections {
        persons: db.collection(PERSONS_COLLECTION),
        counter: db.collection(COUNTER_COLLECTION),
    };

    info!("Connected to MongoDB, database: {database}");

    (client, collections)
}
