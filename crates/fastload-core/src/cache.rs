//! Per-build resolution cache.
//!
//! Maps module specifiers to resolved metadata and registry package names to
//! package details. Created empty at build start, discarded at build end;
//! entries are never evicted or removed.

use crate::error::LoadError;
use crate::info::{ModuleEntry, NpmPackageEntry};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-build store of resolved module and registry package metadata.
///
/// The cache has no internal locking. The loader holds `&mut` access while
/// populating one closure, so writes are serialized per closure; repeat loads
/// of an already-resolved specifier are pure lookups.
#[derive(Debug, Default)]
pub struct InfoCache {
    modules: HashMap<String, Arc<ModuleEntry>>,
    npm_packages: HashMap<String, NpmPackageEntry>,
}

impl InfoCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `specifier` has already been resolved in this build.
    #[must_use]
    pub fn contains_module(&self, specifier: &str) -> bool {
        self.modules.contains_key(specifier)
    }

    /// Look up the resolved entry for a specifier.
    ///
    /// Aliased specifiers return the same entry as their redirect target.
    #[must_use]
    pub fn module(&self, specifier: &str) -> Option<Arc<ModuleEntry>> {
        self.modules.get(specifier).cloned()
    }

    /// Look up a registry package by name.
    #[must_use]
    pub fn npm_package(&self, name: &str) -> Option<&NpmPackageEntry> {
        self.npm_packages.get(name)
    }

    /// Insert a resolved module entry, keyed by its canonical specifier.
    pub fn insert_module(&mut self, entry: ModuleEntry) {
        self.modules.insert(entry.specifier.clone(), Arc::new(entry));
    }

    /// Track a registry package.
    ///
    /// Re-inserting the same name and version is a no-op, since resolver
    /// calls are idempotent and overlapping closures re-report packages. A
    /// different version for an already-tracked name is rejected: one build
    /// carries at most one version per package name.
    pub fn insert_npm_package(&mut self, entry: NpmPackageEntry) -> Result<(), LoadError> {
        if let Some(existing) = self.npm_packages.get(&entry.name) {
            if existing.version == entry.version {
                return Ok(());
            }
            return Err(LoadError::NpmVersionConflict {
                name: entry.name,
                existing: existing.version.clone(),
                incoming: entry.version,
            });
        }
        self.npm_packages.insert(entry.name.clone(), entry);
        Ok(())
    }

    /// Apply a redirect by aliasing `from` to the entry already stored for
    /// `to`.
    ///
    /// The target must have been inserted before any redirect pointing at it
    /// is applied; a correct resolver always satisfies this.
    pub fn alias_module(&mut self, from: &str, to: &str) -> Result<(), LoadError> {
        let Some(target) = self.modules.get(to).cloned() else {
            return Err(LoadError::DanglingRedirect {
                from: from.to_string(),
                to: to.to_string(),
            });
        };
        self.modules.insert(from.to_string(), target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(specifier: &str) -> ModuleEntry {
        ModuleEntry {
            specifier: specifier.to_string(),
            local: None,
            media_type: None,
            error: None,
            npm_package: None,
        }
    }

    #[test]
    fn test_insert_and_lookup_module() {
        let mut cache = InfoCache::new();
        assert!(!cache.contains_module("https://x.test/a.ts"));

        cache.insert_module(entry("https://x.test/a.ts"));
        assert!(cache.contains_module("https://x.test/a.ts"));
        let found = cache.module("https://x.test/a.ts").unwrap();
        assert_eq!(found.specifier, "https://x.test/a.ts");
        assert!(cache.module("https://x.test/b.ts").is_none());
    }

    #[test]
    fn test_alias_shares_one_entry() {
        let mut cache = InfoCache::new();
        cache.insert_module(entry("https://x.test/b.ts"));
        cache
            .alias_module("https://x.test/b", "https://x.test/b.ts")
            .unwrap();

        let target = cache.module("https://x.test/b.ts").unwrap();
        let alias = cache.module("https://x.test/b").unwrap();
        assert!(Arc::ptr_eq(&target, &alias));
    }

    #[test]
    fn test_alias_to_missing_target_fails() {
        let mut cache = InfoCache::new();
        let err = cache
            .alias_module("https://x.test/b", "https://x.test/b.ts")
            .unwrap_err();
        assert!(matches!(err, LoadError::DanglingRedirect { .. }));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_npm_package_reinsert_same_version_is_noop() {
        let mut cache = InfoCache::new();
        let pkg = NpmPackageEntry {
            name: "left-pad".to_string(),
            version: "1.3.0".to_string(),
        };
        cache.insert_npm_package(pkg.clone()).unwrap();
        cache.insert_npm_package(pkg).unwrap();
        assert_eq!(cache.npm_package("left-pad").unwrap().version, "1.3.0");
    }

    #[test]
    fn test_npm_package_version_conflict_fails() {
        let mut cache = InfoCache::new();
        cache
            .insert_npm_package(NpmPackageEntry {
                name: "left-pad".to_string(),
                version: "1.3.0".to_string(),
            })
            .unwrap();
        let err = cache
            .insert_npm_package(NpmPackageEntry {
                name: "left-pad".to_string(),
                version: "2.0.0".to_string(),
            })
            .unwrap_err();
        assert!(matches!(
            err,
            LoadError::NpmVersionConflict { ref existing, ref incoming, .. }
                if existing == "1.3.0" && incoming == "2.0.0"
        ));
    }
}
