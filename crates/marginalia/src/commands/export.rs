use marginalia_store::{atomic_write, markdown, BookmarkStore, Paths};
use std::path::Path;

pub fn run(paths: &Paths, output: Option<&Path>) -> anyhow::Result<()> {
    let store = BookmarkStore::open(paths.bookmarks_file())?;
    if store.is_empty() {
        println!("No bookmarks to export");
        return Ok(());
    }

    let target = match output {
        Some(path) => path.to_path_buf(),
        None => paths.markdown_file(),
    };
    let rendered = markdown::render(store.records(), chrono::Utc::now());
    atomic_write(&target, rendered.as_bytes())?;

    println!("✓ Exported {} bookmarks to {}", store.len(), target.display());
    Ok(())
}
