//! Item catalog model: identity, slot/rarity taxonomy, and per-item
//! conditional stat bounds.

pub mod conditions;
pub mod types;

pub use conditions::get_conditions;
pub use types::{Item, ItemId, Rarity, Slot, SYNTHETIC_LIGHT_WEAPON_EXPERT_DAGGER};
