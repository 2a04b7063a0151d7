use serde::{Deserialize, Serialize};

/// Render state for the single render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RenderPhase {
    #[default]
    Idle,
    Rendering,
}

/// Coalesces render requests into at most one in-flight plus one pending pass.
///
/// Any number of requests arriving while a pass is in flight collapse into a
/// single `queued` flag — there is no queue of request objects. The follow-up
/// pass renders whatever state is current when it runs, never a stale
/// snapshot, which is what makes the final render eventually consistent.
///
/// Driving contract:
/// - [`Self::request`] returning `true` obligates the caller to perform a
///   pass and then call [`Self::complete`] (or [`Self::fail`] on error).
/// - [`Self::complete`] returning `true` obligates exactly one more pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderScheduler {
    phase: RenderPhase,
    queued: bool,
}

impl RenderScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(self) -> RenderPhase {
        self.phase
    }

    #[must_use]
    pub fn is_queued(self) -> bool {
        self.queued
    }

    /// Requests a render. Returns `true` when the caller should perform the
    /// pass now; while a pass is in flight the request is absorbed into the
    /// queued flag and `false` is returned immediately.
    pub fn request(&mut self) -> bool {
        match self.phase {
            RenderPhase::Idle => {
                self.phase = RenderPhase::Rendering;
                true
            }
            RenderPhase::Rendering => {
                self.queued = true;
                false
            }
        }
    }

    /// Marks the in-flight pass finished. Returns `true` when a request was
    /// absorbed mid-pass, in which case the scheduler stays in `Rendering`
    /// and the caller owes exactly one more pass.
    pub fn complete(&mut self) -> bool {
        if self.phase == RenderPhase::Idle {
            return false;
        }
        if self.queued {
            self.queued = false;
            true
        } else {
            self.phase = RenderPhase::Idle;
            false
        }
    }

    /// Unconditional reset after a failed pass so one bad draw never wedges
    /// the scheduler. Any absorbed request is dropped with it; the failing
    /// operation already surfaced an error to the host.
    pub fn fail(&mut self) {
        self.phase = RenderPhase::Idle;
        self.queued = false;
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderPhase, RenderScheduler};

    #[test]
    fn requests_while_rendering_collapse_to_one_follow_up() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.request());

        // A burst of requests during the in-flight pass.
        for _ in 0..25 {
            assert!(!scheduler.request());
        }

        // Exactly one follow-up pass, then idle.
        assert!(scheduler.complete());
        assert!(!scheduler.complete());
        assert_eq!(scheduler.phase(), RenderPhase::Idle);
        assert!(!scheduler.is_queued());
    }

    #[test]
    fn completing_without_queued_requests_goes_idle() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.request());
        assert!(!scheduler.complete());
        assert_eq!(scheduler.phase(), RenderPhase::Idle);
    }

    #[test]
    fn requests_between_passes_start_fresh() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.request());
        assert!(!scheduler.complete());

        assert!(scheduler.request());
        assert!(!scheduler.complete());
    }

    #[test]
    fn fail_resets_phase_and_drops_absorbed_requests() {
        let mut scheduler = RenderScheduler::new();
        assert!(scheduler.request());
        assert!(!scheduler.request());
        assert!(scheduler.is_queued());

        scheduler.fail();
        assert_eq!(scheduler.phase(), RenderPhase::Idle);
        assert!(!scheduler.is_queued());

        // Next request renders normally again.
        assert!(scheduler.request());
    }
}
