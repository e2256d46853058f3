//! Multi-root orchestration with bounded concurrency.
//!
//! Each root target is walked on its own worker thread, but a worker is only
//! started after it has taken a permit from the shared [`AdmissionGate`]. The
//! gate's capacity caps how many walks are active at any instant; remaining
//! roots wait for a permit to free up. Each finished walk is published as a
//! [`WalkResult`] on a channel, in completion order.

use std::{
    path::{Path, PathBuf},
    thread,
};

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::{output::OutputSink, utils::SizeFormatter, walker::TreeWalker};

/// Number of walks allowed to run at once unless configured otherwise.
pub const DEFAULT_GATE_CAPACITY: usize = 20;

/// Aggregated size of one root target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkResult {
    /// The root exactly as it was supplied.
    pub path: PathBuf,

    /// Sum of regular-file sizes under the root, in bytes.
    pub size: u64,

    /// Number of entries that could not be read during the walk.
    pub errors: usize,

    /// Whether the root itself could not be traversed.
    pub root_failed: bool,
}

/// Counting semaphore limiting how many walks run concurrently.
///
/// Tokens are slots in a bounded channel: acquiring pushes a token (blocking
/// while the channel is full) and releasing pops one.
#[derive(Debug)]
pub struct AdmissionGate {
    tokens: Sender<()>,
    slots: Receiver<()>,
    capacity: usize,
}

/// Proof of admission; the token goes back to the gate when this is dropped.
#[derive(Debug)]
#[must_use = "the walk is only admitted while the permit is held"]
pub struct GatePermit<'a> {
    gate: &'a AdmissionGate,
}

impl AdmissionGate {
    /// Create a gate admitting up to `capacity` holders at once.
    ///
    /// A capacity of zero is raised to one so that acquiring can never block
    /// forever.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tokens, slots) = bounded(capacity);
        Self {
            tokens,
            slots,
            capacity,
        }
    }

    /// Block until a token is available and take it.
    pub fn acquire(&self) -> GatePermit<'_> {
        // Both channel ends live in `self`, so the send cannot fail.
        let _ = self.tokens.send(());
        GatePermit { gate: self }
    }

    /// Number of tokens currently held.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.tokens.len()
    }

    /// Maximum number of tokens that can be held at once.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for AdmissionGate {
    fn default() -> Self {
        Self::new(DEFAULT_GATE_CAPACITY)
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        let _ = self.gate.slots.try_recv();
    }
}

/// Runs one [`TreeWalker`] per root target behind an [`AdmissionGate`].
#[derive(Debug)]
pub struct DirectoryAggregator<'a> {
    gate: AdmissionGate,
    walker: TreeWalker<'a>,
}

impl<'a> DirectoryAggregator<'a> {
    /// Create an aggregator whose gate admits `capacity` walks at once.
    #[must_use]
    pub fn new(
        capacity: usize,
        formatter: SizeFormatter,
        recursive: bool,
        sink: &'a dyn OutputSink,
    ) -> Self {
        Self {
            gate: AdmissionGate::new(capacity),
            walker: TreeWalker::new(formatter, recursive, sink),
        }
    }

    /// The gate shared by every walk started from this aggregator.
    #[must_use]
    pub const fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// Walk every root concurrently and publish one result per root.
    ///
    /// Roots are not deduplicated. A worker thread is only started once the
    /// gate has admitted its root, so at most `capacity` walk threads exist
    /// at any time and the remaining roots wait in this loop. The permit is
    /// released as soon as a walk finishes, before its result is sent, so a
    /// slow consumer never holds back other walks. Returns once every worker
    /// has finished; `results` is dropped at that point, which closes the
    /// channel for the consumer.
    pub fn run(&self, roots: &[PathBuf], results: Sender<WalkResult>) {
        thread::scope(|s| {
            for root in roots {
                let permit = self.gate.acquire();
                let results = results.clone();
                s.spawn(move || {
                    let result = self.walk_root(root, permit);
                    // A dropped receiver means nobody wants the report any more.
                    let _ = results.send(result);
                });
            }
        });
    }

    fn walk_root(&self, root: &Path, permit: GatePermit<'_>) -> WalkResult {
        let summary = self.walker.walk(root);
        drop(permit);

        WalkResult {
            path: root.to_path_buf(),
            size: summary.size,
            errors: summary.errors,
            root_failed: summary.root_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::{
            Barrier,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };

    use crossbeam_channel::unbounded;
    use tempfile::TempDir;

    use super::*;
    use crate::output::BufferSink;

    #[test]
    fn test_gate_capacity_floor() {
        assert_eq!(AdmissionGate::new(0).capacity(), 1);
        assert_eq!(AdmissionGate::default().capacity(), DEFAULT_GATE_CAPACITY);
    }

    #[test]
    fn test_permit_released_on_drop() {
        let gate = AdmissionGate::new(2);
        let first = gate.acquire();
        let second = gate.acquire();
        assert_eq!(gate.in_use(), 2);

        drop(first);
        assert_eq!(gate.in_use(), 1);
        drop(second);
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn test_permit_released_on_panic() {
        let gate = AdmissionGate::new(1);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _permit = gate.acquire();
            panic!("walk blew up");
        }));

        assert!(outcome.is_err());
        assert_eq!(gate.in_use(), 0);
        drop(gate.acquire());
    }

    #[test]
    fn test_gate_admits_up_to_capacity_together() {
        let capacity = 4;
        let gate = AdmissionGate::new(capacity);
        let barrier = Barrier::new(capacity);

        // Every holder waits for all the others while holding its permit,
        // which only completes if all of them are admitted at once.
        thread::scope(|s| {
            for _ in 0..capacity {
                s.spawn(|| {
                    let _permit = gate.acquire();
                    barrier.wait();
                });
            }
        });

        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn test_gate_never_exceeds_capacity() {
        let gate = AdmissionGate::new(3);
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        thread::scope(|s| {
            for _ in 0..12 {
                s.spawn(|| {
                    let _permit = gate.acquire();
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(10));
                    active.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
        assert_eq!(gate.in_use(), 0);
    }

    #[test]
    fn test_run_queues_roots_beyond_capacity() {
        let dir = TempDir::new().unwrap();
        for i in 0..50 {
            fs::write(dir.path().join(format!("f{i}")), [0u8; 3]).unwrap();
        }

        let sink = BufferSink::new();
        let aggregator = DirectoryAggregator::new(1, SizeFormatter::Raw, false, &sink);
        let (tx, rx) = unbounded();
        let roots = vec![dir.path().to_path_buf(); 5_000];

        aggregator.run(&roots, tx);

        let results: Vec<WalkResult> = rx.iter().collect();
        assert_eq!(results.len(), 5_000);
        assert!(results.iter().all(|r| r.size == 150 && r.errors == 0));
        assert_eq!(aggregator.gate().in_use(), 0);
    }

    #[test]
    fn test_run_publishes_one_result_per_root() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        fs::create_dir(&a).unwrap();
        fs::create_dir(&b).unwrap();
        fs::write(a.join("x"), vec![0u8; 100]).unwrap();
        fs::write(b.join("y"), vec![0u8; 50]).unwrap();

        let sink = BufferSink::new();
        let aggregator = DirectoryAggregator::new(1, SizeFormatter::Raw, false, &sink);
        let (tx, rx) = unbounded();
        let roots = vec![a.clone(), b.clone(), a.clone(), dir.path().join("missing")];

        aggregator.run(&roots, tx);

        let mut results: Vec<WalkResult> = rx.iter().collect();
        results.sort_by(|l, r| l.path.cmp(&r.path).then(l.size.cmp(&r.size)));

        assert_eq!(results.len(), 4);
        assert_eq!(results.iter().filter(|r| r.path == a).count(), 2);
        assert!(results.iter().filter(|r| r.path == a).all(|r| r.size == 100));
        assert_eq!(results.iter().find(|r| r.path == b).map(|r| r.size), Some(50));

        let missing = results.iter().find(|r| r.root_failed).unwrap();
        assert_eq!(missing.size, 0);
        assert_eq!(aggregator.gate().in_use(), 0);
    }
}
