//! Built-in gate stages.

pub mod delivery;
pub mod innings;
pub mod scorer;

pub use delivery::DeliveryStage;
pub use innings::InningsStateStage;
pub use scorer::ScorerStage;
