//! File matching for layer `files` patterns.
//!
//! Patterns are compiled once with `literal_separator` so that `*` stays
//! within a path segment while `**` crosses any number of them. Brace
//! alternation (`{js,vue}`) is handled by globset.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path, PathBuf};

use crate::BuildError;

/// Compiled form of a layer's `files` list.
#[derive(Debug, Clone)]
pub(crate) enum FileMatcher {
    /// No `files` given: matches every path.
    Any,
    /// Matches when any of the patterns match.
    Globs(GlobSet),
}

impl FileMatcher {
    /// Compile the patterns of the layer at `layer` (index used in errors).
    pub(crate) fn compile(layer: usize, patterns: Option<&[String]>) -> Result<Self, BuildError> {
        let patterns = match patterns {
            None => return Ok(FileMatcher::Any),
            Some(p) => p,
        };

        if patterns.is_empty() {
            return Err(BuildError::EmptyFiles { layer });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|source| BuildError::InvalidGlob {
                    layer,
                    pattern: pattern.clone(),
                    source,
                })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|source| BuildError::InvalidGlob {
            layer,
            pattern: patterns.join(", "),
            source,
        })?;
        Ok(FileMatcher::Globs(set))
    }

    /// Match a normalized path. `None` stands for a path outside the
    /// configuration base, which only unconditional layers accept.
    pub(crate) fn is_match(&self, path: Option<&str>) -> bool {
        match (self, path) {
            (FileMatcher::Any, _) => true,
            (FileMatcher::Globs(set), Some(p)) => set.is_match(p),
            (FileMatcher::Globs(_), None) => false,
        }
    }
}

/// Normalize a file path for matching.
///
/// Backslashes become `/`, and `.` and `..` segments are resolved lexically.
/// With a base path, an absolute path is made relative to it. A path that
/// lands outside the base yields `None`: an absolute path not under it, or
/// a relative path that climbs above it with `..`.
pub fn normalize_path(path: &Path, base: Option<&Path>) -> Option<String> {
    let path = clean(path);
    let relative = match base {
        Some(base) => {
            let relative = if path.is_absolute() {
                path.strip_prefix(clean(base)).ok()?.to_path_buf()
            } else {
                path
            };
            if matches!(relative.components().next(), Some(Component::ParentDir)) {
                return None;
            }
            relative
        }
        None => path,
    };

    Some(relative.to_string_lossy().replace('\\', "/"))
}

/// Resolve `.` and `..` without touching the filesystem. `..` at the root
/// stays at the root; leading `..` of a relative path are kept.
fn clean(path: &Path) -> PathBuf {
    let unified = path.to_string_lossy().replace('\\', "/");
    let mut out = PathBuf::new();
    for component in Path::new(&unified).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
