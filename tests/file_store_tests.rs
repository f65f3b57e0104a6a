use anyhow::Result;
use tempfile::TempDir;

use newsdesk::store::{FileStore, KeyValueStore, StoreError};

#[tokio::test]
async fn test_missing_region_reads_none() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path().join("not-created-yet"));
    assert_eq!(store.get("prefs", "k").await?, None);
    store.remove("prefs", "k").await?;
    Ok(())
}

#[tokio::test]
async fn test_put_creates_directory_and_region_file() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path().join("nested").join("data"));
    store.put("prefs", "k", "v").await?;

    assert!(store.region_path("prefs").exists());
    assert_eq!(store.get("prefs", "k").await?.as_deref(), Some("v"));

    let raw = std::fs::read_to_string(store.region_path("prefs"))?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(parsed, serde_json::json!({ "k": "v" }));
    Ok(())
}

#[tokio::test]
async fn test_keys_and_regions_are_independent() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());
    store.put("prefs", "a", "1").await?;
    store.put("prefs", "b", "2").await?;
    store.put("other", "a", "3").await?;

    store.remove("prefs", "a").await?;
    assert_eq!(store.get("prefs", "a").await?, None);
    assert_eq!(store.get("prefs", "b").await?.as_deref(), Some("2"));
    assert_eq!(store.get("other", "a").await?.as_deref(), Some("3"));
    Ok(())
}

#[tokio::test]
async fn test_no_temp_file_left_behind() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());
    store.put("prefs", "k", "v1").await?;
    store.put("prefs", "k", "v2").await?;

    let names: Vec<String> = std::fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["prefs.json"]);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_region_is_an_error_on_read() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());
    std::fs::write(store.region_path("prefs"), "[1, 2")?;
    assert!(store.get("prefs", "k").await.is_err());

    // writing replaces the unreadable region
    store.put("prefs", "k", "v").await?;
    assert_eq!(store.get("prefs", "k").await?.as_deref(), Some("v"));
    Ok(())
}

#[tokio::test]
async fn test_non_utf8_region_is_replaced_on_write() -> Result<()> {
    let dir = TempDir::new()?;
    let store = FileStore::new(dir.path());
    std::fs::write(store.region_path("prefs"), b"\xff\xfe")?;
    assert!(matches!(
        store.get("prefs", "k").await,
        Err(StoreError::Json(_))
    ));

    store.put("prefs", "k", "v").await?;
    assert_eq!(store.get("prefs", "k").await?.as_deref(), Some("v"));
    Ok(())
}

#[tokio::test]
async fn test_two_stores_on_one_directory_never_collide_on_temp_files() -> Result<()> {
    let dir = TempDir::new()?;
    let first = std::sync::Arc::new(FileStore::new(dir.path()));
    let second = std::sync::Arc::new(FileStore::new(dir.path()));

    let mut handles = Vec::new();
    for i in 0..20 {
        let store = if i % 2 == 0 { first.clone() } else { second.clone() };
        handles.push(tokio::spawn(async move {
            store.put("prefs", "k", &format!("v{i}")).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let value = first.get("prefs", "k").await?.unwrap_or_default();
    assert!(value.starts_with('v'), "{value}");
    let leftovers = std::fs::read_dir(dir.path())?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
    Ok(())
}
