use empire_core::{MapConfig, MapGenerator};
use empire_storage::models::MapDoc;
use empire_storage::{MapStore, StorageResult};

#[tokio::main]
async fn main() -> StorageResult<()> {
    // Generate a 256×256 map
    let config = MapConfig::new(256, 256).with_seed("2025");
    let map = MapGenerator::new(config.clone())?.generate();

    let doc = MapDoc::from_generated("demo", &config, &map);

    // Init storage
    let store = MapStore::init("mongodb://localhost:27017", "empire", "maps").await?;

    // Insert & read back
    store.create(doc).await?;
    if let Some(found) = store.read_by_name("demo").await? {
        let restored = found.into_generated()?;
        println!(
            "Round-trip success: cell [128,128] = {} at height {}",
            restored.terrain_grid.get(128, 128),
            restored.height_field.get(128, 128)
        );
    } else {
        println!("Document not found!");
    }

    // Clean up
    store.delete_by_name("demo").await?;

    Ok(())
}
