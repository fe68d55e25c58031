use marginalia_core::{AnalysisConfig, Taxonomy};
use marginalia_store::{atomic_write, write_json, BookmarkStore, Paths};

pub fn run(paths: &Paths, force: bool) -> anyhow::Result<()> {
    paths.ensure_dirs()?;

    let config_path = paths.config_file();
    if force || !config_path.exists() {
        write_json(&config_path, &AnalysisConfig::default())?;
        println!("✓ Wrote {}", config_path.display());
    } else {
        println!("· Kept existing {}", config_path.display());
    }

    let taxonomy_path = paths.taxonomy_file();
    if force || !taxonomy_path.exists() {
        let json = Taxonomy::builtin()?.to_json_pretty()?;
        atomic_write(&taxonomy_path, json.as_bytes())?;
        println!("✓ Wrote {}", taxonomy_path.display());
    } else {
        println!("· Kept existing {}", taxonomy_path.display());
    }

    let bookmarks_path = paths.bookmarks_file();
    if !bookmarks_path.exists() {
        BookmarkStore::open(&bookmarks_path)?.save()?;
        println!("✓ Created {}", bookmarks_path.display());
    }

    println!("\nNext: marginalia import --file <bookmarks.json>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path().join("data"));
        run(&paths, false).unwrap();

        assert!(paths.reports_dir().is_dir());
        assert!(paths.bookmarks_file().exists());
        let taxonomy =
            Taxonomy::from_json(&std::fs::read_to_string(paths.taxonomy_file()).unwrap()).unwrap();
        assert_eq!(taxonomy, Taxonomy::builtin().unwrap());
    }

    #[test]
    fn test_init_keeps_existing_config_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let paths = Paths::at(dir.path());
        std::fs::write(paths.config_file(), r#"{"max_keywords": 3}"#).unwrap();

        run(&paths, false).unwrap();
        let kept = std::fs::read_to_string(paths.config_file()).unwrap();
        assert!(kept.contains("\"max_keywords\": 3"));

        run(&paths, true).unwrap();
        let replaced = std::fs::read_to_string(paths.config_file()).unwrap();
        assert!(replaced.contains("\"max_keywords\": 10"));
    }
}
