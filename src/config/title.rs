use log::{ info, warn };
use std::fs;
use std::path::Path;

pub const DEFAULT_TITLE: &str = "Trợ lý AI";

/// Greeting title shown to new sessions; falls back to [`DEFAULT_TITLE`].
pub fn load_title<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) if !content.trim().is_empty() => {
            info!("Loaded greeting title from {}", path.display());
            content.trim().to_string()
        }
        Ok(_) => {
            warn!("Title file {} is empty. Using default title.", path.display());
            DEFAULT_TITLE.to_string()
        }
        Err(e) => {
            warn!("Could not read title file {}: {}. Using default title.", path.display(), e);
            DEFAULT_TITLE.to_string()
        }
    }
}
