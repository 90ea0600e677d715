use blockdom::stats::{self, ReconcileStats};
use blockdom_test_support::fixture::{Fixture, id_list};

// Counters are process-wide, so everything runs in one test.
#[test]
fn counters_track_reconciliation_work() {
    let mut fx = Fixture::new();

    stats::reset();
    let mut list = id_list(&[1, 2, 3], false);
    fx.mount(&mut list).unwrap();
    assert_eq!(
        stats::counts(),
        ReconcileStats {
            mounts: 4,
            ..ReconcileStats::default()
        }
    );

    stats::reset();
    fx.patch(&mut list, id_list(&[3, 2, 1], false)).unwrap();
    let counts = stats::counts();
    assert_eq!(counts.patches, 4, "list plus every item");
    assert_eq!(counts.moves, 2);
    assert_eq!(counts.key_map_builds, 0);

    stats::reset();
    fx.patch(&mut list, id_list(&[5, 6], false)).unwrap();
    let counts = stats::counts();
    assert_eq!(counts.key_map_builds, 1);
    assert_eq!(counts.mounts, 2);
    assert_eq!(counts.removals, 3);

    let mut only = Fixture::new();
    let mut cleared = id_list(&[7, 8], true);
    only.mount(&mut cleared).unwrap();
    stats::reset();
    only.patch(&mut cleared, id_list(&[], true)).unwrap();
    assert_eq!(stats::counts().fast_clears, 1);
    assert_eq!(stats::counts().removals, 0);
    assert_eq!(stats::counts().violations, 0);
}
