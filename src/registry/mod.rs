//! Docker Hub registry queries for the image and tag panels

mod api;

pub use api::{
    qualified_repo_name, ImageSummary, ImageTag, RegistryClient, RegistryError,
    DEFAULT_TAG_PAGE_SIZE,
};
