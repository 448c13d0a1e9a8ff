use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gearset_solver::{
    solve, Catalog, ClassId, Item, ItemId, NegPolicy, Rarity, Slot, SolveConfig, SourceTags, Stats,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

struct SyntheticCatalog(Vec<Item>);

impl Catalog for SyntheticCatalog {
    fn items(&self) -> &[Item] {
        &self.0
    }
}

const COMMON_SLOTS: &[Slot] = &[
    Slot::Legs,
    Slot::Back,
    Slot::Head,
    Slot::Chest,
    Slot::Shoulders,
    Slot::Belt,
    Slot::Neck,
    Slot::LeftHand,
    Slot::Accessory,
    Slot::Mount,
    Slot::Pet,
];

fn random_rarity(rng: &mut ChaCha8Rng) -> Rarity {
    match rng.gen_range(0..7) {
        0 => Rarity::Common,
        1 => Rarity::Uncommon,
        2 => Rarity::Mythic,
        3 => Rarity::Legendary,
        4 => Rarity::Relic,
        5 => Rarity::Souvenir,
        _ => Rarity::Epic,
    }
}

fn random_stats(rng: &mut ChaCha8Rng) -> Stats {
    Stats {
        ap: rng.gen_range(0..2),
        mp: rng.gen_range(0..2),
        wp: rng.gen_range(0..3),
        ra: rng.gen_range(0..2),
        crit: rng.gen_range(-5..30),
        crit_mastery: rng.gen_range(0..80),
        elemental_mastery: rng.gen_range(0..400),
        one_element_mastery: rng.gen_range(0..200),
        two_element_mastery: rng.gen_range(0..150),
        three_element_mastery: rng.gen_range(0..100),
        distance_mastery: rng.gen_range(0..300),
        rear_mastery: rng.gen_range(-50..200),
        heal_mastery: rng.gen_range(0..200),
        berserk_mastery: rng.gen_range(-50..200),
        melee_mastery: rng.gen_range(0..300),
        fire_mastery: rng.gen_range(0..150),
        earth_mastery: rng.gen_range(0..150),
        water_mastery: rng.gen_range(0..150),
        air_mastery: rng.gen_range(0..150),
        control: rng.gen_range(0..50),
        block: rng.gen_range(0..150),
        fd: rng.gen_range(0..20),
        heals_performed: rng.gen_range(0..50),
        lock: rng.gen_range(0..80),
        dodge: rng.gen_range(0..80),
    }
}

/// A few hundred items spread across every selectable slot plus a handful
/// of relics/epics and a one-hander/dagger weapon split, at levels spanning
/// a level-230 character's tolerance window.
fn synthetic_catalog(seed: u64, per_slot: usize) -> Vec<Item> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut items = Vec::new();
    let mut next_id = 1;

    for slot in COMMON_SLOTS {
        for _ in 0..per_slot {
            items.push(Item {
                item_id: ItemId(next_id),
                name: format!("item-{next_id}"),
                slot: *slot,
                level: rng.gen_range(216..=230),
                rarity: random_rarity(&mut rng),
                type_id: 0,
                disables_second_weapon: false,
                is_shield: false,
                stats: random_stats(&mut rng),
            });
            next_id += 1;
        }
    }

    for _ in 0..per_slot {
        items.push(Item {
            item_id: ItemId(next_id),
            name: format!("one-hander-{next_id}"),
            slot: Slot::FirstWeapon,
            level: rng.gen_range(216..=230),
            rarity: random_rarity(&mut rng),
            type_id: 1,
            disables_second_weapon: false,
            is_shield: false,
            stats: random_stats(&mut rng),
        });
        next_id += 1;
    }
    for _ in 0..per_slot {
        items.push(Item {
            item_id: ItemId(next_id),
            name: format!("dagger-{next_id}"),
            slot: Slot::SecondWeapon,
            level: rng.gen_range(216..=230),
            rarity: random_rarity(&mut rng),
            type_id: 2,
            disables_second_weapon: false,
            is_shield: false,
            stats: random_stats(&mut rng),
        });
        next_id += 1;
    }

    for _ in 0..8 {
        items.push(Item {
            item_id: ItemId(next_id),
            name: format!("relic-{next_id}"),
            slot: Slot::FirstWeapon,
            level: rng.gen_range(216..=230),
            rarity: Rarity::Relic,
            type_id: 1,
            disables_second_weapon: false,
            is_shield: false,
            stats: random_stats(&mut rng),
        });
        next_id += 1;
    }
    for _ in 0..8 {
        items.push(Item {
            item_id: ItemId(next_id),
            name: format!("epic-{next_id}"),
            slot: Slot::SecondWeapon,
            level: rng.gen_range(216..=230),
            rarity: Rarity::Epic,
            type_id: 2,
            disables_second_weapon: false,
            is_shield: false,
            stats: random_stats(&mut rng),
        });
        next_id += 1;
    }

    items
}

fn default_config() -> SolveConfig {
    let mut cfg = SolveConfig::new(230, ClassId::Iop);
    cfg.set_minimums.ap = 6;
    cfg.set_minimums.mp = 4;
    cfg
}

fn distance_restricted_config() -> SolveConfig {
    let mut cfg = default_config();
    cfg.allowed_rarities = vec![4, 5, 6, 7];
    cfg.priorities.distance = true;
    cfg.priorities.rear_policy = NegPolicy::Full;
    cfg
}

fn exhaustive_config() -> SolveConfig {
    let mut cfg = default_config();
    cfg.exhaustive = true;
    cfg
}

fn bench_solve_adaptive(c: &mut Criterion) {
    let catalog = SyntheticCatalog(synthetic_catalog(42, 40));
    let cfg = default_config();

    c.bench_function("solve_adaptive_medium_catalog", |b| {
        b.iter(|| {
            let result = solve(black_box(&cfg), black_box(&catalog), &SourceTags::default(), None);
            black_box(result)
        })
    });
}

fn bench_solve_restricted_rarity(c: &mut Criterion) {
    let catalog = SyntheticCatalog(synthetic_catalog(7, 40));
    let cfg = distance_restricted_config();

    c.bench_function("solve_distance_restricted_rarity", |b| {
        b.iter(|| {
            let result = solve(black_box(&cfg), black_box(&catalog), &SourceTags::default(), None);
            black_box(result)
        })
    });
}

fn bench_solve_exhaustive(c: &mut Criterion) {
    let catalog = SyntheticCatalog(synthetic_catalog(99, 20));
    let cfg = exhaustive_config();

    c.bench_function("solve_exhaustive_small_catalog", |b| {
        b.iter(|| {
            let result = solve(black_box(&cfg), black_box(&catalog), &SourceTags::default(), None);
            black_box(result)
        })
    });
}

fn bench_solve_single_threaded(c: &mut Criterion) {
    let catalog = SyntheticCatalog(synthetic_catalog(42, 40));
    let mut cfg = default_config();
    cfg.single_threaded = true;

    c.bench_function("solve_single_threaded_medium_catalog", |b| {
        b.iter(|| {
            let result = solve(black_box(&cfg), black_box(&catalog), &SourceTags::default(), None);
            black_box(result)
        })
    });
}

criterion_group!(
    benches,
    bench_solve_adaptive,
    bench_solve_restricted_rarity,
    bench_solve_exhaustive,
    bench_solve_single_threaded,
);
criterion_main!(benches);
