//! npm specifier parsing and on-disk registry package layout.
//!
//! Parses specifiers like:
//! - `npm:left-pad`
//! - `npm:left-pad@1.3.0`
//! - `npm:preact/hooks`
//! - `npm:@scope/name@^2/lib/util.js`
//!
//! and maps a resolved package to its folder under the registry cache root.

use crate::error::LoadError;
use std::path::{Path, PathBuf};

/// Registry host directory under the npm cache root.
pub const REGISTRY_DIR: &str = "registry.npmjs.org";

/// A parsed `npm:` specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmSpecifier {
    /// Full package name, `@scope/name` or `name`.
    pub name: String,
    /// Version or range as written, if any.
    pub version: Option<String>,
    /// Path inside the package after the package identifier, if any.
    pub sub_path: Option<String>,
}

impl NpmSpecifier {
    /// Parse an `npm:` specifier.
    ///
    /// Accepts the `npm:/name` form some tooling emits. The sub-path is kept
    /// as written; leading `./` stripping happens at path resolution.
    ///
    /// # Errors
    /// Returns an error if the specifier is not `npm:`-prefixed or names no
    /// package.
    pub fn parse(specifier: &str) -> Result<Self, LoadError> {
        let Some(rest) = specifier.strip_prefix("npm:") else {
            return Err(LoadError::InvalidNpmSpecifier(format!(
                "missing npm: prefix in '{specifier}'"
            )));
        };
        let rest = rest.strip_prefix('/').unwrap_or(rest);
        if rest.is_empty() {
            return Err(LoadError::InvalidNpmSpecifier(format!(
                "empty package name in '{specifier}'"
            )));
        }

        // Scoped names keep their first slash as part of the name, so the
        // sub-path split starts after `@scope/`.
        let subpath_search_start = if rest.starts_with('@') {
            match rest.find('/') {
                Some(slash) => slash + 1,
                None => {
                    return Err(LoadError::InvalidNpmSpecifier(format!(
                        "scoped package missing name in '{specifier}'"
                    )));
                }
            }
        } else {
            0
        };

        let (name_and_version, sub_path) = match rest[subpath_search_start..].find('/') {
            Some(pos) => {
                let split = subpath_search_start + pos;
                (&rest[..split], Some(rest[split + 1..].to_string()))
            }
            None => (rest, None),
        };

        // The version delimiter is an `@` after the name part; position 0 is
        // a scope marker, not a delimiter.
        let (name, version) = match name_and_version.rfind('@') {
            Some(at) if at > 0 => (
                &name_and_version[..at],
                Some(name_and_version[at + 1..].to_string()),
            ),
            _ => (name_and_version, None),
        };

        if name.is_empty() || name.ends_with('/') {
            return Err(LoadError::InvalidNpmSpecifier(format!(
                "empty package name in '{specifier}'"
            )));
        }
        if let Some(version) = &version {
            if version.is_empty() {
                return Err(LoadError::InvalidNpmSpecifier(format!(
                    "empty version in '{specifier}'"
                )));
            }
        }

        Ok(Self {
            name: name.to_string(),
            version,
            sub_path,
        })
    }
}

/// Folder holding an extracted registry package:
/// `<npm-cache-root>/registry.npmjs.org/<name>/<version>`.
///
/// Scoped names contribute two path components.
#[must_use]
pub fn package_folder(npm_cache: &Path, name: &str, version: &str) -> PathBuf {
    let mut dir = npm_cache.join(REGISTRY_DIR);
    for part in name.split('/') {
        dir.push(part);
    }
    dir.push(version);
    dir
}
