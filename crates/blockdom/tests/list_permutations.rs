use blockdom::NodeId;
use blockdom_test_support::fixture::{Fixture, id_list};
use std::collections::{HashMap, HashSet};

const KEY_SPACE: i64 = 16;
const STEPS_PER_SEED: usize = 6;

fn fuzz_seed_count() -> usize {
    if let Ok(value) = std::env::var("BLOCKDOM_FUZZ_SEEDS")
        && let Ok(parsed) = value.parse::<usize>()
        && parsed > 0
    {
        return parsed;
    }
    if std::env::var("CI").is_ok() { 64 } else { 256 }
}

fn fuzz_seed_base() -> u64 {
    if let Ok(value) = std::env::var("BLOCKDOM_FUZZ_SEED") {
        if let Ok(parsed) = u64::from_str_radix(value.trim_start_matches("0x"), 16) {
            return parsed;
        }
        if let Ok(parsed) = value.parse::<u64>() {
            return parsed;
        }
    }
    0x2f1d_84a7_c3b9_5e01
}

fn derive_seed(base: u64, name: &str, salt: u64) -> u64 {
    let mut hash = 0xcbf29ce484222325u64;
    for byte in name.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    base ^ hash ^ salt.wrapping_mul(0x9e3779b97f4a7c15)
}

struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }

    fn gen_range(&mut self, min: usize, max: usize) -> usize {
        if max <= min {
            return min;
        }
        let span = (max - min) as u32;
        min + (self.next_u32() % span) as usize
    }
}

/// Random subset of the key space in random order.
fn random_keys(rng: &mut Lcg) -> Vec<i64> {
    let keep = rng.gen_range(0, 4);
    let mut keys: Vec<i64> = (0..KEY_SPACE)
        .filter(|_| rng.gen_range(0, 4) <= keep)
        .collect();
    // Occasionally only perturb the order slightly, which exercises the
    // start/end rules rather than the key map.
    let swaps = if rng.gen_range(0, 3) == 0 {
        1
    } else {
        keys.len()
    };
    for _ in 0..swaps {
        if keys.len() < 2 {
            break;
        }
        let a = rng.gen_range(0, keys.len());
        let b = rng.gen_range(0, keys.len());
        keys.swap(a, b);
    }
    keys
}

fn nodes_by_key(fx: &Fixture, keys: &[i64]) -> HashMap<i64, NodeId> {
    keys.iter()
        .map(|key| {
            let node = fx
                .node_with_text(&key.to_string())
                .unwrap_or_else(|| panic!("key {key} has no node"));
            (*key, node)
        })
        .collect()
}

fn run_seed(seed: u64, only_child: bool) -> Result<(), String> {
    let mut rng = Lcg::new(seed);
    let mut fx = Fixture::new();
    let mut current = random_keys(&mut rng);
    let mut list = id_list(&current, only_child);
    fx.mount(&mut list).map_err(|err| format!("mount: {err}"))?;

    for step in 0..STEPS_PER_SEED {
        let next = random_keys(&mut rng);
        let before = nodes_by_key(&fx, &current);
        let counts = fx
            .patch(&mut list, id_list(&next, only_child))
            .map_err(|err| format!("step {step}: {err}"))?;

        let expected: Vec<String> = next.iter().map(i64::to_string).collect();
        if fx.texts() != expected {
            return Err(format!(
                "step {step}: {current:?} -> {next:?} rendered {:?}",
                fx.texts()
            ));
        }

        let old_set: HashSet<i64> = current.iter().copied().collect();
        let new_set: HashSet<i64> = next.iter().copied().collect();
        let after = nodes_by_key(&fx, &next);
        for key in old_set.intersection(&new_set) {
            if before[key] != after[key] {
                return Err(format!(
                    "step {step}: {current:?} -> {next:?} recreated key {key}"
                ));
            }
        }

        let fast_clear = only_child && next.is_empty() && !current.is_empty();
        let created = new_set.difference(&old_set).count();
        let removed = if fast_clear {
            0
        } else {
            old_set.difference(&new_set).count()
        };
        if counts.creates != created || counts.removes != removed {
            return Err(format!(
                "step {step}: {current:?} -> {next:?} created {} (want {created}), removed {} (want {removed})",
                counts.creates, counts.removes
            ));
        }
        if counts.moves > next.len() {
            return Err(format!(
                "step {step}: {current:?} -> {next:?} moved {} nodes for {} items",
                counts.moves,
                next.len()
            ));
        }
        if fx.anchor_count() != 1 {
            return Err(format!("step {step}: list anchor lost or duplicated"));
        }
        current = next;
    }
    Ok(())
}

#[test]
fn random_keyed_transitions_preserve_order_and_identity() {
    let base = fuzz_seed_base();
    let count = fuzz_seed_count();
    let mut failures = Vec::new();
    for index in 0..count {
        let seed = derive_seed(base, "list_permutations", index as u64);
        let only_child = index % 4 == 3;
        if let Err(err) = run_seed(seed, only_child) {
            failures.push(format!("seed=0x{seed:016x} only_child={only_child}: {err}"));
        }
    }
    assert!(
        failures.is_empty(),
        "{} of {count} seeds failed (base=0x{base:016x}):\n{}",
        failures.len(),
        failures.join("\n")
    );
}

#[test]
fn full_reversals_of_every_length() {
    for len in 0..24i64 {
        let keys: Vec<i64> = (0..len).collect();
        let reversed: Vec<i64> = keys.iter().rev().copied().collect();
        let mut fx = Fixture::new();
        let mut list = id_list(&keys, false);
        fx.mount(&mut list).unwrap();
        let before = nodes_by_key(&fx, &keys);

        let counts = fx.patch(&mut list, id_list(&reversed, false)).unwrap();
        assert_eq!(counts.creates + counts.removes, 0, "len={len}");
        assert_eq!(nodes_by_key(&fx, &keys), before, "len={len}");
        let expected: Vec<String> = reversed.iter().map(i64::to_string).collect();
        assert_eq!(fx.texts(), expected, "len={len}");
    }
}
