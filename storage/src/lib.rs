// storage holds the MongoDB schema & async CRUD for generated maps

pub mod models;

use crate::models::MapDoc;
use bson::doc;
use futures_util::stream::TryStreamExt;
use mongodb::{
    Client, Collection, IndexModel,
    options::{ClientOptions, IndexOptions},
};
use thiserror::Error;

// MongoDB's hard cap on one BSON document
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("stored map is corrupt: {0}")]
    Corrupt(#[from] empire_core::MapError),

    #[error("cannot encode map document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("map {name:?} encodes to {bytes} bytes, over the {limit} byte document limit")]
    TooLarge {
        name: String,
        bytes: usize,
        limit: usize,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

pub struct MapStore {
    col: Collection<MapDoc>,
}

impl MapStore {
    // Initialize the MongoDB collection
    pub async fn init(uri: &str, db_name: &str, col_name: &str) -> StorageResult<Self> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some("EmpireMapStore".to_string());
        let client = Client::with_options(opts)?;
        let col = client.database(db_name).collection(col_name);

        // Lookups go by name or by (seed, size); a name holds one map
        let by_name = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_seed = IndexModel::builder()
            .keys(doc! { "seed": 1, "params.width": 1, "params.height": 1 })
            .build();
        col.create_index(by_name).await?;
        col.create_index(by_seed).await?;

        tracing::debug!("map store ready: {}/{}", db_name, col_name);
        Ok(Self { col })
    }

    pub async fn list_names(&self) -> StorageResult<Vec<String>> {
        let mut cursor = self.col.find(doc! {}).await?;
        let mut names = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            names.push(doc.name);
        }
        Ok(names)
    }

    pub async fn read_by_name(&self, name: &str) -> StorageResult<Option<MapDoc>> {
        Ok(self.col.find_one(doc! { "name": name }).await?)
    }

    // Store a map, replacing any earlier map under the same name in one
    // write. A rejected map leaves the earlier one in place.
    pub async fn create(&self, map_doc: MapDoc) -> StorageResult<()> {
        let bytes = check_document_size(&map_doc)?;
        let filter = doc! { "name": &map_doc.name };
        let name = map_doc.name.clone();

        let result = self.col.replace_one(filter, map_doc).upsert(true).await?;
        if result.matched_count > 0 {
            tracing::info!("replaced stored map {:?} ({} bytes)", name, bytes);
        } else {
            tracing::debug!("stored new map {:?} ({} bytes)", name, bytes);
        }
        Ok(())
    }

    // Maps are deterministic in (seed, size), so this finds any earlier run
    pub async fn read_by_seed(
        &self,
        seed: &str,
        width: u32,
        height: u32,
    ) -> StorageResult<Option<MapDoc>> {
        let filter = doc! {
            "seed": seed,
            "params.width": width,
            "params.height": height,
        };
        Ok(self.col.find_one(filter).await?)
    }

    pub async fn delete_by_name(&self, name: &str) -> StorageResult<()> {
        self.col.delete_one(doc! { "name": name }).await?;
        Ok(())
    }
}

// Encoded size of a document, or TooLarge when MongoDB would refuse it
pub fn check_document_size(map_doc: &MapDoc) -> StorageResult<usize> {
    let bytes = bson::to_vec(map_doc)?.len();
    if bytes > MAX_DOCUMENT_BYTES {
        return Err(StorageError::TooLarge {
            name: map_doc.name.clone(),
            bytes,
            limit: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(bytes)
}
