use anyhow::{Context, Result};
use mongodb::options::ClientOptions;
use mongodb::{
    Client, Collection, Database as MongoDatabase,
    bson::{DateTime, doc},
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::store::{KeyValueStore, StoreError};

/// Collection names as constants for consistency
pub mod collections {
    pub const PREFERENCES: &str = "preferences";
}

/// Connection wrapper around a single MongoDB database.
#[derive(Debug, Clone)]
pub struct Database {
    client: Client,
    db: MongoDatabase,
}

impl Database {
    /// Connect and ping, so a bad uri fails here rather than on first use.
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        let client_options = ClientOptions::parse(uri)
            .await
            .context("Failed to parse MongoDB connection string")?;

        let client =
            Client::with_options(client_options).context("Failed to create MongoDB client")?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .context("Failed to connect to MongoDB")?;

        log::info!("Connected to MongoDB database: {}", db_name);

        let db = client.database(db_name);

        Ok(Self { client, db })
    }

    /// `None` when no `MONGO_URI` is configured.
    pub async fn from_config(config: &Config) -> Result<Option<Self>> {
        match &config.mongo_uri {
            Some(uri) => Ok(Some(Self::new(uri, &config.mongo_db_name).await?)),
            None => Ok(None),
        }
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.db.collection(name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn name(&self) -> &str {
        self.db.name()
    }

    pub fn preferences(&self) -> Collection<PreferenceDoc> {
        self.collection(collections::PREFERENCES)
    }
}

/// One stored value, keyed by `"<region>/<key>"`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PreferenceDoc {
    #[serde(rename = "_id")]
    pub id: String,
    pub region: String,
    pub key: String,
    pub value: String,
    pub updated_at: DateTime,
}

impl PreferenceDoc {
    pub fn new(region: &str, key: &str, value: &str) -> PreferenceDoc {
        PreferenceDoc {
            id: Self::id_for(region, key),
            region: region.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            updated_at: DateTime::now(),
        }
    }

    pub fn id_for(region: &str, key: &str) -> String {
        format!("{region}/{key}")
    }
}

/// [`KeyValueStore`] backed by the `preferences` collection.
#[derive(Debug, Clone)]
pub struct MongoStore {
    collection: Collection<PreferenceDoc>,
}

impl MongoStore {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.preferences(),
        }
    }
}

impl KeyValueStore for MongoStore {
    async fn get(&self, region: &str, key: &str) -> Result<Option<String>, StoreError> {
        let found = self
            .collection
            .find_one(doc! { "_id": PreferenceDoc::id_for(region, key) })
            .await?;
        Ok(found.map(|d| d.value))
    }

    async fn put(&self, region: &str, key: &str, value: &str) -> Result<(), StoreError> {
        let pref = PreferenceDoc::new(region, key, value);
        // replacing the whole document keeps the write atomic
        self.collection
            .replace_one(doc! { "_id": &pref.id }, &pref)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn remove(&self, region: &str, key: &str) -> Result<(), StoreError> {
        self.collection
            .delete_one(doc! { "_id": PreferenceDoc::id_for(region, key) })
            .await?;
        Ok(())
    }
}
