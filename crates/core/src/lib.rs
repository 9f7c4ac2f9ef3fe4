pub mod classify;
pub mod models;
pub mod resources;

pub use classify::classify_symptoms_rules;
pub use models::*;
pub use resources::{allowed_types, sample_catalog, select_resources};
