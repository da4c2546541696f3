//! Path helpers.

use std::path::PathBuf;

/// The Filmgate data directory (e.g. `~/.filmgate/`).
pub fn get_data_path() -> PathBuf {
    let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".filmgate")
}

/// Default location of the document store file.
pub fn get_default_store_path() -> PathBuf {
    get_data_path().join("store.json")
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if path.starts_with("~/") || path == "~" {
        let home = dirs_next::home_dir().unwrap_or_else(|| PathBuf::from("."));
        if path == "~" {
            home
        } else {
            home.join(&path[2..])
        }
    } else {
        PathBuf::from(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home_passthrough() {
        assert_eq!(expand_home("/tmp/store.json"), PathBuf::from("/tmp/store.json"));
        assert_eq!(expand_home("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn test_expand_home_tilde() {
        let expanded = expand_home("~/store.json");
        assert!(expanded.ends_with("store.json"));
        assert!(!expanded.to_string_lossy().contains('~'));
    }

    #[test]
    fn test_data_path_under_home() {
        assert!(get_data_path().ends_with(".filmgate"));
        assert!(get_default_store_path().ends_with(".filmgate/store.json"));
    }
}
