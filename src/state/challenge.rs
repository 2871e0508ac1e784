//! Lifecycle of the single global step challenge.

use thiserror::Error;
use time::{Duration, OffsetDateTime};

/// Observable phase of the challenge, derived from the timeline fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengePhase {
    /// No duration proposed, nothing running.
    Idle,
    /// A duration is on the table, waiting for confirmation.
    Proposed {
        /// Proposed length in days.
        days: u32,
    },
    /// A confirmed challenge is counting down.
    Active {
        /// Deadline after which the watcher concludes the challenge.
        ends_at: OffsetDateTime,
    },
}

/// Error raised when proposing a non-positive duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("challenge duration must be at least one day")]
pub struct InvalidDuration;

/// Error raised when confirming without a pending proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no challenge duration has been proposed")]
pub struct NotProposed;

/// Duration/deadline pair backing the challenge state machine.
///
/// There is exactly one of these per deployment; all transitions happen under
/// the shared state's write lock, which is what makes `poll_and_maybe_conclude`
/// an atomic check-and-clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChallengeTimeline {
    proposed_days: Option<u32>,
    ends_at: Option<OffsetDateTime>,
}

impl ChallengeTimeline {
    /// Current phase. An armed deadline dominates a pending proposal.
    pub fn phase(&self) -> ChallengePhase {
        match (self.ends_at, self.proposed_days) {
            (Some(ends_at), _) => ChallengePhase::Active { ends_at },
            (None, Some(days)) => ChallengePhase::Proposed { days },
            (None, None) => ChallengePhase::Idle,
        }
    }

    /// Proposed duration, if any (kept even while a challenge runs).
    pub fn proposed_days(&self) -> Option<u32> {
        self.proposed_days
    }

    /// Deadline of the running challenge, if one is armed.
    pub fn ends_at(&self) -> Option<OffsetDateTime> {
        self.ends_at
    }

    /// Record a new proposal, replacing any earlier unconfirmed one.
    ///
    /// A running challenge is not affected: its deadline only moves if the
    /// proposal is subsequently confirmed.
    pub fn propose(&mut self, days: u32) -> Result<(), InvalidDuration> {
        if days == 0 {
            return Err(InvalidDuration);
        }
        self.proposed_days = Some(days);
        Ok(())
    }

    /// Arm the deadline from the latest proposal.
    ///
    /// Confirming while a challenge is already active re-arms the deadline
    /// from `now`, matching the bot's historical behavior.
    pub fn confirm(&mut self, now: OffsetDateTime) -> Result<OffsetDateTime, NotProposed> {
        let days = self.proposed_days.ok_or(NotProposed)?;
        let ends_at = now + Duration::days(i64::from(days));
        self.ends_at = Some(ends_at);
        Ok(ends_at)
    }

    /// Conclude the challenge if its deadline has passed.
    ///
    /// Clears both the duration and the deadline in the same call and returns
    /// the elapsed deadline, so the caller announces winners exactly once no
    /// matter how often it polls past the deadline.
    pub fn poll_and_maybe_conclude(&mut self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let ends_at = self.ends_at?;
        if now < ends_at {
            return None;
        }
        self.ends_at = None;
        self.proposed_days = None;
        Some(ends_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2025-06-01 12:00 UTC);

    #[test]
    fn starts_idle() {
        assert_eq!(ChallengeTimeline::default().phase(), ChallengePhase::Idle);
    }

    #[test]
    fn zero_day_proposal_is_rejected() {
        let mut timeline = ChallengeTimeline::default();
        assert_eq!(timeline.propose(0), Err(InvalidDuration));
        assert_eq!(timeline.phase(), ChallengePhase::Idle);
    }

    #[test]
    fn propose_then_confirm_arms_the_deadline() {
        let mut timeline = ChallengeTimeline::default();
        timeline.propose(5).unwrap();
        assert_eq!(timeline.phase(), ChallengePhase::Proposed { days: 5 });

        let ends_at = timeline.confirm(NOW).unwrap();
        assert_eq!(ends_at, NOW + Duration::days(5));
        assert_eq!(timeline.phase(), ChallengePhase::Active { ends_at });
    }

    #[test]
    fn confirm_without_proposal_fails() {
        let mut timeline = ChallengeTimeline::default();
        assert_eq!(timeline.confirm(NOW), Err(NotProposed));
    }

    #[test]
    fn reproposing_overwrites_the_pending_duration() {
        let mut timeline = ChallengeTimeline::default();
        timeline.propose(3).unwrap();
        timeline.propose(7).unwrap();
        let ends_at = timeline.confirm(NOW).unwrap();
        assert_eq!(ends_at, NOW + Duration::days(7));
    }

    #[test]
    fn proposal_during_active_challenge_leaves_the_deadline_alone() {
        let mut timeline = ChallengeTimeline::default();
        timeline.propose(5).unwrap();
        let armed = timeline.confirm(NOW).unwrap();

        timeline.propose(1).unwrap();
        assert_eq!(timeline.ends_at(), Some(armed));

        // Confirming the fresh proposal re-arms from the new "now".
        let later = NOW + Duration::hours(6);
        let rearmed = timeline.confirm(later).unwrap();
        assert_eq!(rearmed, later + Duration::days(1));
    }

    #[test]
    fn poll_before_deadline_does_nothing() {
        let mut timeline = ChallengeTimeline::default();
        timeline.propose(2).unwrap();
        let ends_at = timeline.confirm(NOW).unwrap();

        assert_eq!(timeline.poll_and_maybe_conclude(NOW), None);
        assert_eq!(
            timeline.poll_and_maybe_conclude(ends_at - Duration::seconds(1)),
            None
        );
        assert_eq!(timeline.phase(), ChallengePhase::Active { ends_at });
    }

    #[test]
    fn conclusion_fires_exactly_once() {
        let mut timeline = ChallengeTimeline::default();
        timeline.propose(1).unwrap();
        let ends_at = timeline.confirm(NOW).unwrap();

        let after = ends_at + Duration::hours(3);
        assert_eq!(timeline.poll_and_maybe_conclude(after), Some(ends_at));
        // Repeated polls past the same deadline stay quiet.
        assert_eq!(timeline.poll_and_maybe_conclude(after), None);
        assert_eq!(
            timeline.poll_and_maybe_conclude(after + Duration::days(1)),
            None
        );
        assert_eq!(timeline.phase(), ChallengePhase::Idle);
    }

    #[test]
    fn poll_at_exact_deadline_concludes() {
        let mut timeline = ChallengeTimeline::default();
        timeline.propose(1).unwrap();
        let ends_at = timeline.confirm(NOW).unwrap();
        assert_eq!(timeline.poll_and_maybe_conclude(ends_at), Some(ends_at));
    }
}
