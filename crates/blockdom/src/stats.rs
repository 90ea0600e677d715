//! Process-wide reconciliation counters (`debug-stats` feature).
//!
//! Counters are shared by every thread; tests that read them should run
//! serially.

use std::sync::atomic::{AtomicU64, Ordering};

static PATCHES: AtomicU64 = AtomicU64::new(0);
static MOUNTS: AtomicU64 = AtomicU64::new(0);
static MOVES: AtomicU64 = AtomicU64::new(0);
static REMOVALS: AtomicU64 = AtomicU64::new(0);
static REPLACEMENTS: AtomicU64 = AtomicU64::new(0);
static FAST_CLEARS: AtomicU64 = AtomicU64::new(0);
static KEY_MAP_BUILDS: AtomicU64 = AtomicU64::new(0);
static VIOLATIONS: AtomicU64 = AtomicU64::new(0);

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReconcileStats {
    /// Block-level patch calls, nested ones included.
    pub patches: u64,
    /// Block-level mounts, nested ones included.
    pub mounts: u64,
    /// List items relocated by the keyed diff.
    pub moves: u64,
    /// Block-level removals, nested ones included.
    pub removals: u64,
    /// Patches that fell back to mount-new/remove-old on a shape mismatch.
    pub replacements: u64,
    pub fast_clears: u64,
    pub key_map_builds: u64,
    pub violations: u64,
}

pub fn reset() {
    for counter in [
        &PATCHES,
        &MOUNTS,
        &MOVES,
        &REMOVALS,
        &REPLACEMENTS,
        &FAST_CLEARS,
        &KEY_MAP_BUILDS,
        &VIOLATIONS,
    ] {
        counter.store(0, Ordering::Relaxed);
    }
}

pub(crate) fn record_patch() {
    PATCHES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_mount() {
    MOUNTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_move() {
    MOVES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_removal() {
    REMOVALS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_replacement() {
    REPLACEMENTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_fast_clear() {
    FAST_CLEARS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_key_map_build() {
    KEY_MAP_BUILDS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_violation() {
    VIOLATIONS.fetch_add(1, Ordering::Relaxed);
}

pub fn counts() -> ReconcileStats {
    ReconcileStats {
        patches: PATCHES.load(Ordering::Relaxed),
        mounts: MOUNTS.load(Ordering::Relaxed),
        moves: MOVES.load(Ordering::Relaxed),
        removals: REMOVALS.load(Ordering::Relaxed),
        replacements: REPLACEMENTS.load(Ordering::Relaxed),
        fast_clears: FAST_CLEARS.load(Ordering::Relaxed),
        key_map_builds: KEY_MAP_BUILDS.load(Ordering::Relaxed),
        violations: VIOLATIONS.load(Ordering::Relaxed),
    }
}
