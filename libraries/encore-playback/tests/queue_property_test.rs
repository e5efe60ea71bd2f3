//! Property-based tests for the queue store
//!
//! Uses proptest to verify ordering invariants across many random queues.

use encore_core::Track;
use encore_playback::{Advance, LoopMode, Queue};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ===== Helpers =====

/// Queues of 1..40 tracks with distinct ids
fn arbitrary_tracks() -> impl Strategy<Value = Vec<Track>> {
    (1usize..40).prop_map(|len| {
        (0..len)
            .map(|i| {
                Track::new(format!("t{i}"), format!("Track {i}"))
                    .with_source(format!("https://cdn.example/{i}.mp3"))
            })
            .collect()
    })
}

fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.to_string()).collect()
}

fn arbitrary_loop_mode() -> impl Strategy<Value = LoopMode> {
    prop_oneof![Just(LoopMode::Off), Just(LoopMode::All), Just(LoopMode::One)]
}

// ===== Property Tests =====

proptest! {
    /// Property: the selected track survives shuffling on and off
    #[test]
    fn shuffle_preserves_current_track(
        tracks in arbitrary_tracks(),
        pick in any::<prop::sample::Index>(),
        seed in any::<u64>(),
    ) {
        let selected = tracks[pick.index(tracks.len())].id.clone();
        let mut queue = Queue::new();
        queue.load(tracks, Some(&selected)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        queue.shuffle_with(true, &mut rng);
        prop_assert_eq!(&queue.current().unwrap().id, &selected);

        queue.shuffle_with(false, &mut rng);
        prop_assert_eq!(&queue.current().unwrap().id, &selected);
    }

    /// Property: shuffle on then off restores the loaded order exactly
    #[test]
    fn restore_is_exact(tracks in arbitrary_tracks(), seed in any::<u64>()) {
        let mut queue = Queue::new();
        queue.load(tracks.clone(), None).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        queue.shuffle_with(true, &mut rng);
        queue.shuffle_with(false, &mut rng);

        prop_assert_eq!(ids(queue.tracks()), ids(&tracks));
        prop_assert_eq!(ids(queue.original_order()), ids(&tracks));
        prop_assert!(!queue.is_shuffled());
    }

    /// Property: shuffled order is a permutation and the original is untouched
    #[test]
    fn shuffle_is_a_permutation(tracks in arbitrary_tracks(), seed in any::<u64>()) {
        let mut queue = Queue::new();
        queue.load(tracks.clone(), None).unwrap();
        queue.shuffle_with(true, &mut StdRng::seed_from_u64(seed));

        let mut active = ids(queue.tracks());
        let mut expected = ids(&tracks);
        active.sort();
        expected.sort();

        prop_assert_eq!(active, expected);
        prop_assert_eq!(ids(queue.original_order()), ids(&tracks));
    }

    /// Property: current index stays valid for the active order after any
    /// sequence of operations
    #[test]
    fn current_index_always_valid(
        tracks in arbitrary_tracks(),
        operations in prop::collection::vec(0u8..5, 1..40),
        mode in arbitrary_loop_mode(),
        seed in any::<u64>(),
    ) {
        let mut queue = Queue::new();
        queue.load(tracks, None).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);

        for op in operations {
            match op {
                0 => { queue.advance(mode).unwrap(); }
                1 => { queue.retreat().unwrap(); }
                2 => { queue.shuffle_with(true, &mut rng); }
                3 => { queue.shuffle_with(false, &mut rng); }
                _ => queue.deselect(),
            }

            if let Some(index) = queue.current_index() {
                prop_assert!(index < queue.len());
            }
        }
    }

    /// Property: past the last track only loop-all wraps
    #[test]
    fn next_wraps_only_under_loop_all(tracks in arbitrary_tracks(), mode in arbitrary_loop_mode()) {
        let last = tracks.last().unwrap().id.clone();
        let mut queue = Queue::new();
        queue.load(tracks.clone(), Some(&last)).unwrap();

        let result = queue.advance(mode).unwrap();

        if mode == LoopMode::All {
            prop_assert_eq!(result, Advance::Moved { index: 0, track: tracks[0].clone() });
        } else {
            prop_assert_eq!(result, Advance::EndOfQueue);
            prop_assert_eq!(queue.current_index(), Some(tracks.len() - 1));
        }
    }

    /// Property: previous at the first track never wraps
    #[test]
    fn previous_never_wraps(tracks in arbitrary_tracks()) {
        let mut queue = Queue::new();
        queue.load(tracks, None).unwrap();

        prop_assert_eq!(queue.retreat().unwrap(), Advance::StartOfQueue);
        prop_assert_eq!(queue.current_index(), Some(0));
    }
}

#[test]
fn three_track_queue_at_end() {
    let tracks: Vec<Track> = ["A", "B", "C"]
        .iter()
        .map(|id| Track::new(*id, *id).with_source("https://cdn.example/x.mp3"))
        .collect();

    for (mode, wraps) in [
        (LoopMode::Off, false),
        (LoopMode::One, false),
        (LoopMode::All, true),
    ] {
        let mut queue = Queue::new();
        queue.load(tracks.clone(), Some(&"C".into())).unwrap();

        match queue.advance(mode).unwrap() {
            Advance::Moved { index, .. } => {
                assert!(wraps, "{mode:?} must not wrap");
                assert_eq!(index, 0);
            }
            Advance::EndOfQueue => assert!(!wraps, "{mode:?} must wrap"),
            Advance::StartOfQueue => panic!("advance never yields StartOfQueue"),
        }
    }
}

#[test]
fn empty_queue_operations_fail() {
    let mut queue = Queue::new();
    assert!(queue.load(Vec::new(), None).is_err());
    assert!(queue.advance(LoopMode::All).is_err());
    assert!(queue.retreat().is_err());
}
