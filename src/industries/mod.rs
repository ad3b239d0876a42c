//! Industry load calculators for facility peak-demand reconstruction.

pub mod car_wash;
pub mod cold_storage;
pub mod data_center;
pub mod ev_charging;
/// Fallback calculator for unmodeled facility types.
pub mod generic;
pub mod grocery;
pub mod hospital;
pub mod hotel;
pub mod indoor_farm;
pub mod manufacturing;
pub mod office;
/// Industry enum, slug resolution, and calculator dispatch.
pub mod registry;
pub mod restaurant;
pub mod types;
pub mod warehouse;

// Re-export the main types for convenience
pub use registry::Industry;
pub use types::IndustryCalculator;
pub use types::{HOURS_PER_YEAR, ProfileSpec, build_profile};
