use duet_core::IceCandidate;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Outbound local candidates, each held back by a fixed delay before it goes to the room.
#[derive(Debug)]
pub struct CandidateQueue {
    delay: Duration,
    pending: VecDeque<(Instant, IceCandidate)>,
}

impl CandidateQueue {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: VecDeque::new(),
        }
    }

    /// Queues a gathered candidate. `None` (end of gathering) is not queued.
    pub fn schedule(&mut self, candidate: Option<IceCandidate>, generated_at: Instant) -> bool {
        let Some(candidate) = candidate else {
            return false;
        };
        self.pending.push_back((generated_at + self.delay, candidate));
        true
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().map(|(deadline, _)| *deadline)
    }

    /// Oldest candidate whose deadline has passed, left in place.
    pub fn peek_due(&self, now: Instant) -> Option<&IceCandidate> {
        match self.pending.front() {
            Some((deadline, candidate)) if *deadline <= now => Some(candidate),
            _ => None,
        }
    }

    /// Removes and returns the oldest candidate whose deadline has passed.
    pub fn pop_due(&mut self, now: Instant) -> Option<IceCandidate> {
        self.peek_due(now)?;
        self.pending.pop_front().map(|(_, candidate)| candidate)
    }

    /// Pushes every due candidate back by one delay, keeping their order.
    pub fn postpone_due(&mut self, now: Instant) {
        let retry_at = now + self.delay;
        for (deadline, _) in self.pending.iter_mut() {
            if *deadline <= now {
                *deadline = retry_at;
            }
        }
    }

    /// Forgets every queued candidate.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
