//! Boundary types for the external module-graph resolver.
//!
//! The resolver discovers a specifier's dependency closure, materializes
//! remote content on disk, and reports the result as a JSON payload. This
//! module gives that payload a typed shape and defines the seam the loader
//! calls through.

use crate::error::LoadError;
use crate::media::MediaType;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;
use url::Url;

/// Options accepted by [`crate::loader::NativeLoader::load`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Import map location forwarded to the external resolver.
    pub import_map_url: Option<Url>,
}

/// Resolved metadata for one module specifier.
///
/// Immutable once inserted into the cache; a redirect may alias further
/// specifier keys to the same entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleEntry {
    /// Canonical specifier, the unique cache key.
    pub specifier: String,
    /// Local file path, present once content has been materialized on disk.
    #[serde(default)]
    pub local: Option<PathBuf>,
    /// Content classification, when the resolver determined one.
    #[serde(default)]
    pub media_type: Option<MediaType>,
    /// Resolver-reported failure for this specifier.
    #[serde(default)]
    pub error: Option<String>,
    /// Name of the registry package serving this module (`npm:` specifiers).
    #[serde(default)]
    pub npm_package: Option<String>,
}

/// Registry package metadata reported by the external resolver.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NpmPackageEntry {
    pub name: String,
    pub version: String,
}

/// One resolver invocation's output: the dependency closure of a root
/// specifier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGraphInfo {
    /// Every module reachable from the root, the root included.
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    /// Specifier aliases; each target must appear in `modules`.
    #[serde(default)]
    pub redirects: HashMap<String, String>,
    /// Registry packages backing `npm:` modules, keyed by package name.
    #[serde(default)]
    pub npm_packages: HashMap<String, NpmPackageEntry>,
}

/// Process-wide facts reported by the external resolver.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalInfo {
    /// Root directory of the on-disk registry package cache.
    pub npm_cache: PathBuf,
}

/// The external module-graph resolver seam.
///
/// Implementations must be idempotent and must include an entry (possibly
/// error-bearing) for every specifier reachable from the root, including the
/// root itself. The loader validates that contract at the boundary and turns
/// violations into [`LoadError`] contract-violation variants.
pub trait InfoProvider {
    /// Resolve the dependency closure of `specifier`.
    async fn info(
        &self,
        specifier: &Url,
        options: &LoadOptions,
    ) -> Result<ModuleGraphInfo, LoadError>;

    /// Report global facts, at minimum the registry cache root.
    async fn global_info(&self) -> Result<GlobalInfo, LoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_graph_payload() {
        let payload = r#"{
            "modules": [
                {
                    "specifier": "https://x.test/mod.ts",
                    "local": "/cache/deps/https/x.test/abc123",
                    "mediaType": "TypeScript"
                },
                {
                    "specifier": "npm:left-pad",
                    "npmPackage": "left-pad"
                },
                {
                    "specifier": "https://x.test/missing.ts",
                    "error": "Import 'https://x.test/missing.ts' failed: 404"
                }
            ],
            "redirects": {
                "https://x.test/mod": "https://x.test/mod.ts"
            },
            "npmPackages": {
                "left-pad": { "name": "left-pad", "version": "1.3.0" }
            }
        }"#;

        let graph: ModuleGraphInfo = serde_json::from_str(payload).unwrap();
        assert_eq!(graph.modules.len(), 3);
        assert_eq!(graph.modules[0].media_type, Some(MediaType::TypeScript));
        assert_eq!(
            graph.modules[0].local.as_deref(),
            Some(std::path::Path::new("/cache/deps/https/x.test/abc123"))
        );
        assert_eq!(graph.modules[1].npm_package.as_deref(), Some("left-pad"));
        assert!(graph.modules[1].local.is_none());
        assert!(graph.modules[2].error.is_some());
        assert_eq!(
            graph.redirects.get("https://x.test/mod").map(String::as_str),
            Some("https://x.test/mod.ts")
        );
        assert_eq!(graph.npm_packages["left-pad"].version, "1.3.0");
    }

    #[test]
    fn test_deserialize_unrecognized_media_type() {
        let entry: ModuleEntry = serde_json::from_str(
            r#"{ "specifier": "https://x.test/style.css", "mediaType": "Css" }"#,
        )
        .unwrap();
        assert_eq!(entry.media_type, Some(MediaType::Unknown));
    }

    #[test]
    fn test_deserialize_global_info() {
        let global: GlobalInfo =
            serde_json::from_str(r#"{ "npmCache": "/home/u/.cache/fastload/npm" }"#).unwrap();
        assert_eq!(
            global.npm_cache,
            PathBuf::from("/home/u/.cache/fastload/npm")
        );
    }

    #[test]
    fn test_graph_defaults_to_empty() {
        let graph: ModuleGraphInfo = serde_json::from_str("{}").unwrap();
        assert!(graph.modules.is_empty());
        assert!(graph.redirects.is_empty());
        assert!(graph.npm_packages.is_empty());
    }
}
