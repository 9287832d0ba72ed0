//! Module path helpers.
//!
//! Paths are kept as normalized, forward-slash separated strings so they can
//! be used directly as identity keys.

use compact_str::CompactString;

/// Normalize a module path: unify separators and fold `.` / `..` segments.
///
/// Leading `..` segments that cannot be folded are preserved.
pub fn normalize_path(path: &str) -> CompactString {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');

    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(segments.last(), Some(last) if *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    if absolute {
        CompactString::new(format!("/{}", joined))
    } else {
        CompactString::new(joined)
    }
}

/// Directory part of a normalized module path (empty for top-level files).
#[inline]
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// Join a relative import specifier onto the importing module's directory.
pub fn join_specifier(importer: &str, specifier: &str) -> CompactString {
    let dir = parent_dir(importer);
    if dir.is_empty() {
        normalize_path(specifier)
    } else {
        normalize_path(&format!("{}/{}", dir, specifier))
    }
}

/// Check if a specifier is relative (`./` or `../`).
#[inline]
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier == "." || specifier == ".." || specifier.starts_with("./") || specifier.starts_with("../")
}

/// File extension of a module path, without the dot.
#[inline]
pub fn extension(path: &str) -> Option<&str> {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.rfind('.').map(|idx| &file[idx + 1..]).filter(|ext| !ext.is_empty())
}
