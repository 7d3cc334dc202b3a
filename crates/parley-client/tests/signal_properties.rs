//! Property-based tests for the shutdown signal.
//!
//! Any interleaving of stops and checks across clones must look like a
//! single flag that moves running → stopped exactly once.

use parley_client::ShutdownSignal;
use proptest::prelude::*;

/// One step taken through one of the session's clones.
#[derive(Debug, Clone)]
enum SignalOp {
    Stop(usize),
    Check(usize),
}

const CLONES: usize = 3;

fn op_strategy() -> impl Strategy<Value = SignalOp> {
    prop_oneof![(0..CLONES).prop_map(SignalOp::Stop), (0..CLONES).prop_map(SignalOp::Check)]
}

proptest! {
    #[test]
    fn prop_stop_flips_once_across_clones(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let signal = ShutdownSignal::new();
        let clones: Vec<ShutdownSignal> = (0..CLONES).map(|_| signal.clone()).collect();
        let mut running = true;
        let mut flips = 0;

        for op in ops {
            match op {
                SignalOp::Stop(i) => {
                    let flipped = clones[i].stop();
                    prop_assert_eq!(flipped, running);
                    if flipped {
                        flips += 1;
                    }
                    running = false;
                },
                SignalOp::Check(i) => prop_assert_eq!(clones[i].is_running(), running),
            }
        }

        prop_assert!(flips <= 1);
        prop_assert_eq!(signal.is_running(), running);
    }

    #[test]
    fn prop_concurrent_stops_flip_once(threads in 1usize..16) {
        let signal = ShutdownSignal::new();
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let signal = signal.clone();
                std::thread::spawn(move || signal.stop())
            })
            .collect();

        let flips = handles.into_iter().map(|h| h.join().unwrap()).filter(|flipped| *flipped).count();
        prop_assert_eq!(flips, 1);
        prop_assert!(!signal.is_running());
    }
}
