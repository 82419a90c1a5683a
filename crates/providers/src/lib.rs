//! External metadata providers and the enrichment merger.
//!
//! - [`tmdb`]: primary details, release dates and discover listings.
//! - [`omdb`]: secondary rating, plot and certification.
//! - [`streaming`]: tertiary country-scoped platform availability.
//! - [`enrichment`]: merges the three into an [`enrichment::EnrichedMetadata`].
//! - [`fallback`]: imports TMDB titles when a local search finds nothing.
//! - [`import`]: admin import of one title by TMDB id.
//! - [`images`]: poster availability checks.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod fallback;
pub mod images;
pub mod import;
pub mod omdb;
pub mod source;
pub mod streaming;
pub mod tmdb;

pub use config::ProviderConfig;
pub use enrichment::{enrich_movie_metadata, EnrichedMetadata};
pub use error::ProviderError;
pub use source::{HttpMetadataSource, MetadataSource, ProviderStatus};
