#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)]

pub mod cache;
pub mod error;
pub mod info;
pub mod loader;
pub mod media;
pub mod npm;

pub use cache::InfoCache;
pub use error::LoadError;
pub use info::{
    GlobalInfo, InfoProvider, LoadOptions, ModuleEntry, ModuleGraphInfo, NpmPackageEntry,
};
pub use loader::{LoadResult, NativeLoader, SpecifierScheme};
pub use media::{media_type_to_loader, transform_raw_into_content, Loader, MediaType};
pub use npm::NpmSpecifier;
