//! Generation-keyed deferred effects
//!
//! Timed consequences (invincibility expiry, delayed restarts)
//! are queued here instead of being fired from host timers. Each entry is
//! stamped with the queue's generation at schedule time; bumping the
//! generation on reset expires everything still pending.

use serde::Serialize;

/// A queued effect
#[derive(Debug, Clone, Serialize)]
pub struct Scheduled<E> {
    /// Time at which the effect becomes due (frames or ms, caller's unit)
    pub due: u64,
    /// Generation the effect belongs to
    pub generation: u32,
    /// Insertion order, breaks ties between equal `due`
    seq: u64,
    pub effect: E,
}

/// Deferred effect queue
#[derive(Debug, Clone, Serialize)]
pub struct EffectQueue<E> {
    pending: Vec<Scheduled<E>>,
    generation: u32,
    next_seq: u64,
}

impl<E> Default for EffectQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> EffectQueue<E> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            generation: 0,
            next_seq: 0,
        }
    }

    /// Current generation
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Start a new generation; everything already queued becomes stale
    pub fn advance_generation(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    /// Queue `effect` to fire at `due` in the current generation
    pub fn schedule(&mut self, due: u64, effect: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled {
            due,
            generation: self.generation,
            seq,
            effect,
        });
    }

    /// Remove and return every live effect due at or before `now`, in due order.
    /// Stale entries are discarded whether due or not.
    pub fn drain_due(&mut self, now: u64) -> Vec<E> {
        let generation = self.generation;
        let before = self.pending.len();
        self.pending.retain(|s| s.generation == generation);
        let dropped = before - self.pending.len();
        if dropped > 0 {
            log::debug!("Dropped {} stale effect(s) from earlier generations", dropped);
        }

        if !self.pending.iter().any(|s| s.due <= now) {
            return Vec::new();
        }

        let (mut due, later): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = later;
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.effect).collect()
    }

    /// Number of queued entries (including stale ones not yet swept)
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything without changing generation
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Due time of the earliest live entry
    pub fn next_due(&self) -> Option<u64> {
        self.pending
            .iter()
            .filter(|s| s.generation == self.generation)
            .map(|s| s.due)
            .min()
    }
}
