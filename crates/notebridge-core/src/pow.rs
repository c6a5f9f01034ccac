//! Proof-of-work mining over event identifiers.
//!
//! Difficulty is the number of leading zero bits of the event id, read as a
//! big-endian bit string. The miner rewrites a trailing
//! `["nonce", "<n>", "<difficulty>"]` tag and re-hashes until the id meets
//! the target, the deadline passes, or the caller cancels.
//!
//! The search is brute force and CPU-bound; callers should run it off any
//! async executor (for example on `spawn_blocking`) and keep a [`CancelFlag`]
//! to abort it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::MiningError;
use crate::event::EventDraft;
use crate::types::{EventId, Tag};

/// Hard ceiling on a single mining run.
pub const MINING_DEADLINE: Duration = Duration::from_secs(120);

/// Default cadence for progress notifications.
pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// An id has 256 bits; nothing above this can be met.
pub const MAX_DIFFICULTY: u32 = 256;

/// Outcome of a mining run.
pub type MiningResult = Result<MinedDraft, MiningError>;

/// Hex digit `i` (0 = most significant) of an id.
fn hex_digit(id: &EventId, i: usize) -> u8 {
    let byte = id.0[i / 2];
    if i % 2 == 0 {
        byte >> 4
    } else {
        byte & 0x0f
    }
}

/// Check an id against a target difficulty.
///
/// The first `difficulty / 4` hex digits must be `0`; if the difficulty is
/// not a multiple of four, the next digit shifted right by
/// `4 - difficulty % 4` must also be zero.
pub fn meets_difficulty(id: &EventId, difficulty: u32) -> bool {
    if difficulty > MAX_DIFFICULTY {
        return false;
    }

    let full_zero_digits = (difficulty / 4) as usize;
    if (0..full_zero_digits).any(|i| hex_digit(id, i) != 0) {
        return false;
    }

    let remainder = difficulty % 4;
    remainder == 0 || hex_digit(id, full_zero_digits) >> (4 - remainder) == 0
}

/// Count the leading zero bits of an id.
pub fn leading_zero_bits(id: &EventId) -> u32 {
    let mut count = 0;
    for &byte in id.0.iter() {
        if byte == 0 {
            count += 8;
        } else {
            count += byte.leading_zeros();
            break;
        }
    }
    count
}

/// Target difficulty committed in a trailing nonce tag, if present.
pub fn committed_difficulty(tags: &[Tag]) -> Option<u32> {
    let tag = tags.last().filter(|t| t.is_nonce())?;
    tag.values().get(1)?.parse().ok()
}

/// Cooperative cancellation signal for a mining run.
///
/// Clones share the same flag. A [`child`](CancelFlag::child) also reports
/// cancellation when any of its ancestors is raised, but raising the child
/// leaves the ancestors untouched.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    raised: Arc<AtomicBool>,
    ancestors: Vec<Arc<AtomicBool>>,
}

impl CancelFlag {
    /// A fresh, unraised flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// A new flag that is also cancelled whenever `self` is.
    pub fn child(&self) -> Self {
        let mut ancestors = self.ancestors.clone();
        ancestors.push(Arc::clone(&self.raised));
        Self {
            raised: Arc::new(AtomicBool::new(false)),
            ancestors,
        }
    }

    /// Ask every holder of this flag to stop.
    pub fn cancel(&self) {
        self.raised.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested here or on an ancestor.
    pub fn is_cancelled(&self) -> bool {
        self.raised.load(Ordering::Relaxed)
            || self.ancestors.iter().any(|a| a.load(Ordering::Relaxed))
    }

    /// Consume the flag into a guard that raises it when dropped.
    pub fn drop_guard(self) -> CancelGuard {
        CancelGuard(self)
    }
}

/// Raises its [`CancelFlag`] when dropped.
///
/// Tie one to a future to stop detached mining work when that future is
/// abandoned.
#[derive(Debug)]
#[must_use = "the flag is raised as soon as the guard is dropped"]
pub struct CancelGuard(CancelFlag);

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Snapshot handed to a [`MiningObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningProgress {
    /// Target difficulty.
    pub difficulty: u32,
    /// Hashes computed so far.
    pub attempts: u64,
    /// Time since the run started.
    pub elapsed: Duration,
    /// Highest leading-zero-bit count seen so far.
    pub best_difficulty: u32,
}

/// Receives periodic progress while mining runs.
///
/// Purely advisory: the result is the same with or without an observer.
pub trait MiningObserver: Send + Sync {
    fn on_progress(&self, progress: &MiningProgress);
}

impl<F> MiningObserver for F
where
    F: Fn(&MiningProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &MiningProgress) {
        self(progress)
    }
}

/// A draft whose id meets the requested difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinedDraft {
    /// The draft with its final nonce tag. Must be signed again.
    pub draft: EventDraft,
    /// Id of `draft`.
    pub id: EventId,
    /// The winning nonce.
    pub nonce: u64,
    /// Hashes computed, including the winning one.
    pub attempts: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Brute-force nonce search.
#[derive(Debug, Clone)]
pub struct PowMiner {
    difficulty: u32,
    deadline: Duration,
    progress_interval: Duration,
}

impl PowMiner {
    /// A miner for `difficulty` bits with the standard deadline.
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            deadline: MINING_DEADLINE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Lower the deadline. Values above [`MINING_DEADLINE`] are clamped.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline.min(MINING_DEADLINE);
        self
    }

    /// Set how often the observer is notified.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Target difficulty in bits.
    pub fn difficulty(&self) -> u32 {
        self.difficulty
    }

    /// Deadline for a run.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Search for a nonce that makes the draft's id meet the difficulty.
    ///
    /// Works on a copy: `draft` itself is never modified, so a timeout or
    /// cancellation leaves no partial nonce tag behind.
    pub fn mine(
        &self,
        draft: &EventDraft,
        cancel: &CancelFlag,
        observer: Option<&dyn MiningObserver>,
    ) -> MiningResult {
        if self.difficulty == 0 {
            return Err(MiningError::DifficultyDisabled);
        }

        let mut working = draft.clone();
        let slot = {
            let tags = working.tags_mut();
            let nonce_tag = Tag::nonce(0, self.difficulty);
            match tags.last_mut() {
                Some(last) if last.is_nonce() => *last = nonce_tag,
                _ => tags.push(nonce_tag),
            }
            tags.len() - 1
        };

        tracing::debug!(
            difficulty = self.difficulty,
            deadline = ?self.deadline,
            "mining started"
        );

        let start = Instant::now();
        let mut last_report = start;
        let mut best_difficulty = 0;
        let mut nonce: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                tracing::debug!(attempts = nonce, "mining cancelled");
                return Err(MiningError::Cancelled { attempts: nonce });
            }

            let elapsed = start.elapsed();
            if elapsed >= self.deadline {
                tracing::warn!(
                    difficulty = self.difficulty,
                    attempts = nonce,
                    ?elapsed,
                    "mining deadline reached"
                );
                return Err(MiningError::Timeout {
                    difficulty: self.difficulty,
                    attempts: nonce,
                    elapsed,
                });
            }

            working.tags_mut()[slot].0[1] = nonce.to_string();
            let id = working.compute_id();
            let attempts = nonce + 1;

            if meets_difficulty(&id, self.difficulty) {
                let elapsed = start.elapsed();
                tracing::debug!(
                    difficulty = self.difficulty,
                    attempts,
                    ?elapsed,
                    id = %id,
                    "mining succeeded"
                );
                return Ok(MinedDraft {
                    draft: working,
                    id,
                    nonce,
                    attempts,
                    elapsed,
                });
            }

            best_difficulty = best_difficulty.max(leading_zero_bits(&id));

            if let Some(observer) = observer {
                if last_report.elapsed() >= self.progress_interval {
                    last_report = Instant::now();
                    observer.on_progress(&MiningProgress {
                        difficulty: self.difficulty,
                        attempts,
                        elapsed: start.elapsed(),
                        best_difficulty,
                    });
                }
            }

            nonce += 1;
        }
    }
}
