use std::{collections::HashSet, path::Path};

use lazy_static::*;

fn create_set(input: &[&'static str]) -> HashSet<&'static str> {
    input.iter().cloned().collect()
}

lazy_static! {
    /// Extensions offered by the open dialog.
    pub static ref OPEN: HashSet<&'static str> = create_set(&["png", "jpg", "jpeg", "bmp", "gif"]);
    /// Extensions that select an encoder on save.
    pub static ref SAVE: HashSet<&'static str> = create_set(&["png", "jpg", "jpeg", "bmp"]);
}

pub fn lowercase_extension(path: impl AsRef<Path>) -> Option<String> {
    path.as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}
