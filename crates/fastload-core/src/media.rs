//! Media type classification and content shaping.
//!
//! The external resolver classifies every module's content. This module maps
//! that classification to the loader tag the bundler understands and performs
//! the raw-bytes-to-content transform (JSON is rewritten as an ES module,
//! everything else passes through unchanged).

use crate::error::LoadError;
use serde::{Deserialize, Deserializer};

/// Content classification reported by the external resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    JavaScript,
    Jsx,
    Mjs,
    Cjs,
    TypeScript,
    Mts,
    Cts,
    Tsx,
    Dts,
    Json,
    Wasm,
    TsBuildInfo,
    SourceMap,
    #[default]
    Unknown,
}

impl MediaType {
    /// Classify from the resolver's wire name. Unrecognized names fall back
    /// to [`MediaType::Unknown`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "JavaScript" => Self::JavaScript,
            "JSX" => Self::Jsx,
            "Mjs" => Self::Mjs,
            "Cjs" => Self::Cjs,
            "TypeScript" => Self::TypeScript,
            "Mts" => Self::Mts,
            "Cts" => Self::Cts,
            "TSX" => Self::Tsx,
            "Dts" => Self::Dts,
            "Json" => Self::Json,
            "Wasm" => Self::Wasm,
            "TsBuildInfo" => Self::TsBuildInfo,
            "SourceMap" => Self::SourceMap,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "JavaScript",
            Self::Jsx => "JSX",
            Self::Mjs => "Mjs",
            Self::Cjs => "Cjs",
            Self::TypeScript => "TypeScript",
            Self::Mts => "Mts",
            Self::Cts => "Cts",
            Self::Tsx => "TSX",
            Self::Dts => "Dts",
            Self::Json => "Json",
            Self::Wasm => "Wasm",
            Self::TsBuildInfo => "TsBuildInfo",
            Self::SourceMap => "SourceMap",
            Self::Unknown => "Unknown",
        }
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Loader tag consumed by the bundler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loader {
    Js,
    Jsx,
    Ts,
    Tsx,
    Binary,
}

impl Loader {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Js => "js",
            Self::Jsx => "jsx",
            Self::Ts => "ts",
            Self::Tsx => "tsx",
            Self::Binary => "binary",
        }
    }
}

/// Map a media type to the loader tag the bundler should use.
///
/// JSON maps to `js` because [`transform_raw_into_content`] rewrites it as an
/// ES module. Unclassified remote modules are served as plain JavaScript.
#[must_use]
pub fn media_type_to_loader(media_type: MediaType) -> Loader {
    match media_type {
        MediaType::Jsx => Loader::Jsx,
        MediaType::TypeScript | MediaType::Mts | MediaType::Cts | MediaType::Dts => Loader::Ts,
        MediaType::Tsx => Loader::Tsx,
        MediaType::Wasm => Loader::Binary,
        _ => Loader::Js,
    }
}

/// Transform raw file bytes into the content shape the bundler expects.
///
/// # Errors
/// Returns an error if a JSON module does not parse.
pub fn transform_raw_into_content(
    raw: Vec<u8>,
    media_type: MediaType,
) -> Result<Vec<u8>, LoadError> {
    match media_type {
        MediaType::Json => json_to_esm(&raw),
        _ => Ok(raw),
    }
}

fn json_to_esm(raw: &[u8]) -> Result<Vec<u8>, LoadError> {
    let value: serde_json::Value = serde_json::from_slice(raw)?;
    let mut json = serde_json::to_string_pretty(&value)?;
    // A literal `__proto__` key would clobber the object literal's prototype
    // once the emitted module is evaluated as JavaScript.
    json = json.replace("\"__proto__\":", "[\"__proto__\"]:");
    Ok(format!("export default {json};").into_bytes())
}
