use crate::attributes::Stats;
use serde::{Deserialize, Serialize};

/// Equipment slot. Bit-exact identifiers per the external interface; `Costume`
/// is cosmetic-only and never participates in [`Slot::selectable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    FirstWeapon,
    SecondWeapon,
    Head,
    Chest,
    Legs,
    Belt,
    Back,
    Shoulders,
    Neck,
    LeftHand,
    Accessory,
    Mount,
    Pet,
    Costume,
}

impl Slot {
    /// Cardinality: 1 for every slot except `LeftHand`, which allows 2.
    pub fn cardinality(&self) -> usize {
        match self {
            Slot::LeftHand => 2,
            _ => 1,
        }
    }

    /// Slots the search kernel ever fills. `Costume` is excluded.
    pub const SELECTABLE: [Slot; 13] = [
        Slot::FirstWeapon,
        Slot::SecondWeapon,
        Slot::Head,
        Slot::Chest,
        Slot::Legs,
        Slot::Belt,
        Slot::Back,
        Slot::Shoulders,
        Slot::Neck,
        Slot::LeftHand,
        Slot::Accessory,
        Slot::Mount,
        Slot::Pet,
    ];

    /// Mount/pet are exempt from the rarity filter (spec.md §3 invariants).
    pub fn rarity_exempt(&self) -> bool {
        matches!(self, Slot::Mount | Slot::Pet)
    }
}

/// Rarity codes 1..7; 5 = relic, 6 = souvenir, 7 = epic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rarity {
    Common = 1,
    Uncommon = 2,
    Mythic = 3,
    Legendary = 4,
    Relic = 5,
    Souvenir = 6,
    Epic = 7,
}

impl Rarity {
    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn is_relic(&self) -> bool {
        matches!(self, Rarity::Relic)
    }

    pub fn is_epic(&self) -> bool {
        matches!(self, Rarity::Epic)
    }
}

/// Item identity. Catalog items use positive ids; the synthetic
/// light-weapon-expert dagger injected by the pool builder uses `-2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub i32);

pub const SYNTHETIC_LIGHT_WEAPON_EXPERT_DAGGER: ItemId = ItemId(-2);

/// An equippable item. Created once at catalog load, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: ItemId,
    pub name: String,
    pub slot: Slot,
    pub level: u16,
    pub rarity: Rarity,
    /// Finer-grained type than slot (e.g. dagger vs shield both land in
    /// `SecondWeapon`).
    pub type_id: u32,
    pub disables_second_weapon: bool,
    /// Only meaningful for `Slot::SecondWeapon`: distinguishes a shield
    /// from a dagger, since both share `type_id`'s slot but assemble into
    /// different weapon pairs.
    pub is_shield: bool,
    pub stats: Stats,
}

impl Item {
    pub fn as_stats(&self) -> Stats {
        self.stats
    }

    pub fn is_two_hander(&self) -> bool {
        self.slot == Slot::FirstWeapon && self.disables_second_weapon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_hand_allows_two() {
        assert_eq!(Slot::LeftHand.cardinality(), 2);
        assert_eq!(Slot::Head.cardinality(), 1);
    }

    #[test]
    fn mount_and_pet_are_rarity_exempt() {
        assert!(Slot::Mount.rarity_exempt());
        assert!(Slot::Pet.rarity_exempt());
        assert!(!Slot::Head.rarity_exempt());
    }

    #[test]
    fn rarity_codes_match_spec() {
        assert_eq!(Rarity::Relic.code(), 5);
        assert_eq!(Rarity::Souvenir.code(), 6);
        assert_eq!(Rarity::Epic.code(), 7);
    }

    #[test]
    fn costume_excluded_from_selectable() {
        assert!(!Slot::SELECTABLE.contains(&Slot::Costume));
        assert_eq!(Slot::SELECTABLE.len(), 13);
    }
}
