//! The catalog boundary: callers own item storage and decoding (out of
//! scope here) and hand the solver a `&dyn Catalog`.

use crate::items::{Item, ItemId};
use std::collections::HashSet;

/// Implemented by the caller. The solver never mutates or owns the catalog.
pub trait Catalog {
    fn items(&self) -> &[Item];

    fn find(&self, item_id: ItemId) -> Option<&Item> {
        self.items().iter().find(|it| it.item_id == item_id)
    }
}

/// Source tags decoded from a second catalog blob (spec §6). Decoding that
/// blob is out of scope; this type only carries the already-decoded sets.
#[derive(Debug, Clone, Default)]
pub struct SourceTags {
    pub arch: HashSet<ItemId>,
    pub horde: HashSet<ItemId>,
    pub pvp: HashSet<ItemId>,
    pub ultimate_boss: HashSet<ItemId>,
    /// Arch/horde items exempt from the "non-finite" rarity restriction.
    pub non_finite_exempt: HashSet<ItemId>,
    /// Legacy items: implicitly forbidden unless forced by id.
    pub legacy: HashSet<ItemId>,
}

/// A forbiddable catalog source (`config.forbidden_sources` in the
/// original), supplemented from `original_source/wakautosolver/
/// versioned_entrypoints.py`'s `forbidden_sources` config field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Arch,
    Horde,
    Pvp,
    UltimateBoss,
}

impl SourceTags {
    /// Legacy items are forbidden by default; an explicit forced id
    /// re-admits them. Re-admission by name is deliberately unsupported
    /// (spec §9 open question, preserved from the original).
    pub fn is_implicitly_forbidden(&self, item_id: ItemId, forced_ids: &[ItemId]) -> bool {
        self.legacy.contains(&item_id) && !forced_ids.contains(&item_id)
    }

    fn ids_for(&self, kind: SourceKind) -> &HashSet<ItemId> {
        match kind {
            SourceKind::Arch => &self.arch,
            SourceKind::Horde => &self.horde,
            SourceKind::Pvp => &self.pvp,
            SourceKind::UltimateBoss => &self.ultimate_boss,
        }
    }

    /// Union of every requested source's item ids, minus the non-finite
    /// arch/horde exemption set. Ported from the original's
    /// `forbidden_ids |= getattr(item_sources, source)` loop followed by
    /// `forbidden_ids -= item_sources.non_finite_arch_horde`.
    pub fn resolve_forbidden_sources(&self, sources: &[SourceKind]) -> HashSet<ItemId> {
        let mut ids: HashSet<ItemId> = HashSet::new();
        for kind in sources {
            ids.extend(self.ids_for(*kind).iter().copied());
        }
        ids.retain(|id| !self.non_finite_exempt.contains(id));
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixture(Vec<Item>);
    impl Catalog for Fixture {
        fn items(&self) -> &[Item] {
            &self.0
        }
    }

    #[test]
    fn find_locates_by_id() {
        let item = crate::items::Item {
            item_id: ItemId(42),
            name: "Test Item".into(),
            slot: crate::items::Slot::Belt,
            level: 100,
            rarity: crate::items::Rarity::Common,
            type_id: 0,
            disables_second_weapon: false,
            is_shield: false,
            stats: Default::default(),
        };
        let catalog = Fixture(vec![item]);
        assert!(catalog.find(ItemId(42)).is_some());
        assert!(catalog.find(ItemId(1)).is_none());
    }

    #[test]
    fn legacy_item_forbidden_unless_forced_by_id() {
        let mut tags = SourceTags::default();
        tags.legacy.insert(ItemId(99));
        assert!(tags.is_implicitly_forbidden(ItemId(99), &[]));
        assert!(!tags.is_implicitly_forbidden(ItemId(99), &[ItemId(99)]));
    }

    #[test]
    fn resolve_forbidden_sources_unions_requested_sets() {
        let mut tags = SourceTags::default();
        tags.arch.insert(ItemId(1));
        tags.horde.insert(ItemId(2));
        tags.pvp.insert(ItemId(3));
        let resolved = tags.resolve_forbidden_sources(&[SourceKind::Arch, SourceKind::Horde]);
        assert!(resolved.contains(&ItemId(1)));
        assert!(resolved.contains(&ItemId(2)));
        assert!(!resolved.contains(&ItemId(3)));
    }

    #[test]
    fn resolve_forbidden_sources_exempts_non_finite_items() {
        let mut tags = SourceTags::default();
        tags.arch.insert(ItemId(1));
        tags.arch.insert(ItemId(2));
        tags.non_finite_exempt.insert(ItemId(2));
        let resolved = tags.resolve_forbidden_sources(&[SourceKind::Arch]);
        assert!(resolved.contains(&ItemId(1)));
        assert!(!resolved.contains(&ItemId(2)));
    }
}
