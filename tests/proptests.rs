// Property suites for the simulation engine.
//
// Property 1: conservation + accounting. For any token multiset and any
//   M >= 1, after insertion the table holds exactly N tokens, the
//   incremental stats equal a recompute from the table, the collision
//   identity total == N - unique holds, and with N > M the pigeonhole bound
//   total >= N - M holds. Checked for both strategies.
//
// Property 2: resolution idempotence. After the resolution phase, every
//   bucket recorded in the start snapshot is empty and the table holds
//   nothing (the snapshot covers all occupied buckets by construction).
//
// Property 3: determinism. The same tokens + strategy replay the identical
//   step event sequence across a full reset.

use pigeonhole_sim::{
    run_insertion_phase, run_resolution_phase, Engine, HashStrategy, RunStats, Token,
};
use proptest::prelude::*;

fn strategy() -> impl Strategy<Value = HashStrategy> {
    prop_oneof![Just(HashStrategy::Summation), Just(HashStrategy::Digest)]
}

fn tokens() -> impl Strategy<Value = Vec<Token>> {
    proptest::collection::vec("[a-zA-Z0-9]{1,8}", 0..200)
        .prop_map(|v| v.into_iter().map(Token::new).collect())
}

proptest! {
    #[test]
    fn prop_conservation_and_accounting(
        tokens in tokens(),
        space in 1usize..64,
        hash in strategy(),
    ) {
        let n = tokens.len();
        let mut engine = Engine::new(tokens, hash, space).unwrap();
        let steps = run_insertion_phase(&mut engine).count();

        prop_assert_eq!(steps, n);
        prop_assert_eq!(engine.table().total_items(), n);

        let stats = *engine.stats();
        prop_assert_eq!(stats, RunStats::recompute(engine.table()));
        prop_assert_eq!(stats.total_collisions, n - stats.unique_buckets_used);
        prop_assert!(stats.unique_buckets_used <= space);
        if n > space {
            prop_assert!(stats.total_collisions >= n - space);
        }
    }

    #[test]
    fn prop_resolution_empties_every_snapshot_bucket(
        tokens in tokens(),
        space in 1usize..64,
        hash in strategy(),
    ) {
        let mut engine = Engine::new(tokens, hash, space).unwrap();
        run_insertion_phase(&mut engine).for_each(drop);

        let occupied_before = engine.table().occupied_buckets();
        let drained = run_resolution_phase(&mut engine).count();

        prop_assert_eq!(drained, engine.tokens().len());
        prop_assert_eq!(engine.table().total_items(), 0);
        for bucket in occupied_before {
            prop_assert!(engine.table().is_empty(bucket).unwrap());
        }
    }

    #[test]
    fn prop_event_stream_is_deterministic(
        tokens in tokens(),
        space in 1usize..64,
        hash in strategy(),
    ) {
        let mut engine = Engine::new(tokens, hash, space).unwrap();
        let first: Vec<_> = run_insertion_phase(&mut engine).collect();
        let second: Vec<_> = run_insertion_phase(&mut engine).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_every_bucket_index_in_range(
        tokens in tokens(),
        space in 1usize..64,
        hash in strategy(),
    ) {
        let mut engine = Engine::new(tokens, hash, space).unwrap();
        for event in run_insertion_phase(&mut engine) {
            prop_assert!(event.bucket() < space);
        }
    }
}
