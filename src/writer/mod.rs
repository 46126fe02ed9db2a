//! Output artifacts for a converted map.
//!
//! Every writer emits the graphics array plus whichever optional arrays are
//! present and non-empty.
pub mod asm;
pub mod bin;
pub mod c;

use std::path::{Path, PathBuf};

use crate::processor::Converted;

/// Optional arrays that actually carry data.
pub(crate) fn collision(map: &Converted) -> Option<&[u8]> {
    map.collision.as_deref().filter(|c| !c.is_empty())
}

pub(crate) fn objects(map: &Converted) -> Option<&[u32]> {
    map.objects.as_deref().filter(|o| !o.is_empty())
}

/// C identifier derived from the output path's file stem.
pub fn symbol_name(output: &Path) -> String {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    sanitise_label(&stem)
}

/// Non-alphanumerics become `_`, runs of `_` collapse, leading digits are
/// dropped. Falls back to `map` when nothing is left.
pub fn sanitise_label(text: &str) -> String {
    let mut label = String::with_capacity(text.len());
    for c in text.chars() {
        if label.is_empty() && c.is_ascii_digit() {
            continue;
        }
        let c = if c.is_ascii_alphanumeric() { c } else { '_' };
        if c == '_' && label.ends_with('_') {
            continue;
        }
        label.push(c);
    }
    if label.is_empty() || label == "_" {
        return "map".to_string();
    }
    label
}

/// `<output>` with its extension replaced by `ext` and `suffix` appended to
/// the stem, e.g. `build/level` + `_collision` + `bin`.
pub(crate) fn sibling(output: &Path, suffix: &str, ext: &str) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}{suffix}.{ext}"))
}
