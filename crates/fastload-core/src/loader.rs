//! The specifier loader.
//!
//! Turns one module specifier into transformed byte content plus a loader
//! tag: dispatches on the specifier scheme, resolves the dependency closure
//! through the external resolver (once per distinct closure), maps registry
//! packages to their on-disk layout, reads the file, and shapes the content
//! for the bundler.

use crate::cache::InfoCache;
use crate::error::LoadError;
use crate::info::{InfoProvider, LoadOptions, ModuleEntry, ModuleGraphInfo};
use crate::media::{media_type_to_loader, transform_raw_into_content, Loader, MediaType};
use crate::npm::{package_folder, NpmSpecifier};
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

/// Entry point used when a package manifest declares no `main`.
const DEFAULT_PACKAGE_ENTRY: &str = "index.js";

/// Specifier schemes this loader handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierScheme {
    Http,
    Https,
    Data,
    Npm,
    File,
}

impl SpecifierScheme {
    /// Classify a specifier's scheme; `None` means the loader declines it
    /// and the host falls through to its default resolution.
    #[must_use]
    pub fn from_url(url: &Url) -> Option<Self> {
        match url.scheme() {
            "http" => Some(Self::Http),
            "https" => Some(Self::Https),
            "data" => Some(Self::Data),
            "npm" => Some(Self::Npm),
            "file" => Some(Self::File),
            _ => None,
        }
    }
}

/// Final content for one loaded module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadResult {
    /// Transformed bytes handed to the bundler.
    pub contents: Vec<u8>,
    /// Loader tag telling the bundler how to interpret `contents`.
    pub loader: Loader,
    /// Local files the host should watch to invalidate this module.
    /// Populated only for `file:` loads.
    pub watch_files: Vec<PathBuf>,
}

/// Loads modules through an external module-graph resolver.
///
/// One instance serves a whole build; per-build state lives in the
/// [`InfoCache`] passed to [`NativeLoader::load`].
#[derive(Debug)]
pub struct NativeLoader<P> {
    provider: P,
}

impl<P: InfoProvider> NativeLoader<P> {
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Access the underlying resolver.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Load one specifier.
    ///
    /// Returns `Ok(None)` for schemes this loader does not recognize. For
    /// `file:` specifiers the resolved local path is added to the result's
    /// watch set so the host can rebuild on change.
    pub async fn load(
        &self,
        cache: &mut InfoCache,
        specifier: &Url,
        options: &LoadOptions,
    ) -> Result<Option<LoadResult>, LoadError> {
        let Some(scheme) = SpecifierScheme::from_url(specifier) else {
            return Ok(None);
        };

        let mut result = self.resolve_and_read(cache, specifier, scheme, options).await?;
        if scheme == SpecifierScheme::File {
            let path = specifier
                .to_file_path()
                .map_err(|()| LoadError::InvalidFileUrl(specifier.to_string()))?;
            result.watch_files.push(path);
        }
        Ok(Some(result))
    }

    async fn resolve_and_read(
        &self,
        cache: &mut InfoCache,
        specifier: &Url,
        scheme: SpecifierScheme,
        options: &LoadOptions,
    ) -> Result<LoadResult, LoadError> {
        let specifier_raw = specifier.as_str();

        if !cache.contains_module(specifier_raw) {
            debug!(specifier = specifier_raw, "closure not resolved, invoking resolver");
            let graph = self.provider.info(specifier, options).await?;
            populate(cache, graph)?;
        }

        let module = cache
            .module(specifier_raw)
            .ok_or_else(|| LoadError::UnaccountedSpecifier(specifier_raw.to_string()))?;

        if let Some(message) = &module.error {
            return Err(LoadError::Resolver(message.clone()));
        }

        let (file_path, media_type) = if scheme == SpecifierScheme::Npm {
            self.resolve_npm_path(cache, specifier, &module).await?
        } else {
            let local = module
                .local
                .clone()
                .ok_or_else(|| LoadError::NotCached(specifier_raw.to_string()))?;
            (local, module.media_type.unwrap_or_default())
        };

        let loader = media_type_to_loader(media_type);
        debug!(
            specifier = specifier_raw,
            path = %file_path.display(),
            loader = loader.as_str(),
            "resolved module"
        );

        let raw = tokio::fs::read(&file_path).await?;
        let contents = transform_raw_into_content(raw, media_type)?;

        Ok(LoadResult {
            contents,
            loader,
            watch_files: Vec::new(),
        })
    }

    /// Resolve an `npm:` specifier to a file inside its package folder.
    ///
    /// The sub-path comes from the specifier when one is written; otherwise
    /// from the manifest's `main`, falling back to `index.js`. Registry
    /// modules are always served as JavaScript.
    async fn resolve_npm_path(
        &self,
        cache: &InfoCache,
        specifier: &Url,
        module: &ModuleEntry,
    ) -> Result<(PathBuf, MediaType), LoadError> {
        let package_name = module
            .npm_package
            .as_deref()
            .ok_or_else(|| LoadError::MissingNpmPackageRef(module.specifier.clone()))?;
        let package = cache
            .npm_package(package_name)
            .ok_or_else(|| LoadError::UnknownNpmPackage {
                specifier: module.specifier.clone(),
                name: package_name.to_string(),
            })?
            .clone();

        let global = self.provider.global_info().await?;
        let folder = package_folder(&global.npm_cache, &package.name, &package.version);

        let parsed = NpmSpecifier::parse(specifier.as_str())?;
        let sub_path = match parsed.sub_path {
            Some(sub_path) => sub_path,
            None => read_main_entry(&folder).await?,
        };
        let sub_path = sub_path.strip_prefix("./").unwrap_or(&sub_path);

        Ok((folder.join(sub_path), MediaType::JavaScript))
    }
}

/// Insert one resolver invocation's output into the cache.
///
/// Modules and registry packages land first; redirects alias afterwards so
/// every target is already present when its aliases are applied.
fn populate(cache: &mut InfoCache, graph: ModuleGraphInfo) -> Result<(), LoadError> {
    let ModuleGraphInfo {
        modules,
        redirects,
        npm_packages,
    } = graph;
    debug!(
        modules = modules.len(),
        redirects = redirects.len(),
        npm_packages = npm_packages.len(),
        "populating info cache"
    );

    for module in modules {
        cache.insert_module(module);
    }
    for package in npm_packages.into_values() {
        cache.insert_npm_package(package)?;
    }
    for (from, to) in &redirects {
        cache.alias_module(from, to)?;
    }
    Ok(())
}

/// Read the declared `main` entry from a package folder's manifest.
async fn read_main_entry(folder: &Path) -> Result<String, LoadError> {
    let manifest_path = folder.join("package.json");
    let raw = tokio::fs::read(&manifest_path)
        .await
        .map_err(|source| LoadError::ManifestRead {
            path: manifest_path.clone(),
            source,
        })?;
    let manifest: serde_json::Value =
        serde_json::from_slice(&raw).map_err(|source| LoadError::ManifestParse {
            path: manifest_path,
            source,
        })?;
    Ok(manifest
        .get("main")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(DEFAULT_PACKAGE_ENTRY)
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_classification() {
        let cases = [
            ("http://x.test/a.js", Some(SpecifierScheme::Http)),
            ("https://x.test/a.ts", Some(SpecifierScheme::Https)),
            ("data:text/javascript,export%7B%7D", Some(SpecifierScheme::Data)),
            ("npm:left-pad", Some(SpecifierScheme::Npm)),
            ("file:///tmp/a.ts", Some(SpecifierScheme::File)),
            ("node:fs", None),
            ("jsr:@std/path", None),
        ];
        for (input, expected) in cases {
            let url = Url::parse(input).unwrap();
            assert_eq!(SpecifierScheme::from_url(&url), expected, "{input}");
        }
    }
}
