use std::path::PathBuf;
use thiserror::Error;

/// Error type for the resolve-and-load core.
///
/// Failures never abort more than the single load they occurred in, and
/// nothing in this crate retries; the bundler host decides whether a failed
/// load fails the whole build.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read package manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse package manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid JSON content: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The external resolver reported this module unresolvable. The message
    /// is surfaced verbatim.
    #[error("{0}")]
    Resolver(String),

    /// A non-registry module has no materialized local copy. The external
    /// resolver fetches eagerly, so hitting this means the resolver and
    /// loader disagree about what has been downloaded.
    #[error("module not yet available locally: {0}")]
    NotCached(String),

    #[error("resolver output has no entry for {0}")]
    UnaccountedSpecifier(String),

    #[error("redirect for {from} targets {to}, which the resolver did not report")]
    DanglingRedirect { from: String, to: String },

    #[error("module {0} carries no npm package reference")]
    MissingNpmPackageRef(String),

    #[error("npm package {name} (serving {specifier}) missing from resolver output")]
    UnknownNpmPackage { specifier: String, name: String },

    #[error("npm package {name} reported as both {existing} and {incoming} within one build")]
    NpmVersionConflict {
        name: String,
        existing: String,
        incoming: String,
    },

    #[error("not a loadable file URL: {0}")]
    InvalidFileUrl(String),

    #[error("Invalid npm specifier: {0}")]
    InvalidNpmSpecifier(String),
}

impl LoadError {
    /// Whether this failure is a violation of the external resolver's
    /// contract rather than a condition the module itself caused.
    ///
    /// Contract violations are not recoverable and typically abort the build.
    #[must_use]
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::UnaccountedSpecifier(_)
                | Self::DanglingRedirect { .. }
                | Self::MissingNpmPackageRef(_)
                | Self::UnknownNpmPackage { .. }
                | Self::NpmVersionConflict { .. }
        )
    }
}
