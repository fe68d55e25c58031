use marginalia_store::{load_records, BookmarkStore, Paths};
use std::path::Path;

pub fn run(paths: &Paths, file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("{} not found", file.display());
    }
    let records = load_records(file)?;
    let incoming = records.len();
    let unreadable = records.iter().filter(|r| r.is_unreadable()).count();

    let mut store = BookmarkStore::open(paths.bookmarks_file())?;
    let added = store.merge(records);
    store.save()?;

    println!(
        "✓ Imported {added} new bookmarks ({} already stored, {} total)",
        incoming - added,
        store.len()
    );
    if unreadable > 0 {
        println!("⚠ {unreadable} entries could not be read and will be skipped by analysis");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_merges_into_store() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        let source = dir.path().join("export.jsonl");
        std::fs::write(
            &source,
            "{\"id\":\"1\",\"text\":\"a\"}\n{\"id\":\"2\",\"text\":\"b\"}\n{\"id\":\"1\",\"text\":\"dup\"}\n",
        )
        .unwrap();

        run(&paths, &source).unwrap();
        run(&paths, &source).unwrap();

        let store = BookmarkStore::open(paths.bookmarks_file()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_import_keeps_unreadable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        let source = dir.path().join("export.json");
        std::fs::write(
            &source,
            r#"[{"id":"1","text":"a","created_at":"2024-01-01T00:00:00Z"},{"id":"2","text":42}]"#,
        )
        .unwrap();

        run(&paths, &source).unwrap();

        let store = BookmarkStore::open(paths.bookmarks_file()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.unreadable_count(), 1);
    }

    #[test]
    fn test_import_rejects_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        let source = dir.path().join("export.json");
        std::fs::write(&source, "{\n  \"id\": \"1\",\n").unwrap();

        assert!(run(&paths, &source).is_err());
        assert!(!paths.bookmarks_file().exists());
    }

    #[test]
    fn test_import_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        assert!(run(&paths, &dir.path().join("nope.json")).is_err());
    }
}
