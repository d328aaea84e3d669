//! State Module - Datenstrukturen des Arbeitszustands
//!
//! - **WorkingState / WorkingInput**: die aktuellen Selektionen pro Input
//! - **PersistedMappings**: Hydrate-Snapshot des Mapping-Stores

mod persisted;
mod working;

pub use persisted::PersistedMappings;
pub use working::{WorkingInput, WorkingState};
