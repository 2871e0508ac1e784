//! Shared application state: the score board and challenge timeline behind
//! coarse async locks, with persist-before-commit mutation semantics.

pub mod challenge;
pub mod scores;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::{
    clock::Clock,
    dao::{score_store::SnapshotStore, storage::StorageError},
    error::ServiceError,
};

pub use self::challenge::{ChallengePhase, ChallengeTimeline};
pub use self::scores::{GroupId, LeaderboardRow, ScoreBoard, UserId};

/// Cheaply clonable handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state shared by the HTTP gateway and both background
/// loops.
///
/// Mutations take the relevant write lock for their whole read-modify-persist
/// cycle; the loops only ever copy data out under a read lock and send
/// notifications after releasing it.
pub struct AppState {
    board: RwLock<ScoreBoard>,
    challenge: RwLock<ChallengeTimeline>,
    store: Arc<dyn SnapshotStore>,
    clock: Arc<dyn Clock>,
    degraded: AtomicBool,
}

impl AppState {
    /// Wrap the initial board and collaborators into a [`SharedState`].
    pub fn new(
        board: ScoreBoard,
        store: Arc<dyn SnapshotStore>,
        clock: Arc<dyn Clock>,
    ) -> SharedState {
        Arc::new(Self {
            board: RwLock::new(board),
            challenge: RwLock::new(ChallengeTimeline::default()),
            store,
            clock,
            degraded: AtomicBool::new(false),
        })
    }

    /// Single "now" source for a poll cycle or command.
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    /// Whether the last persist attempt failed.
    pub fn is_degraded(&self) -> bool {
        self.degraded.load(Ordering::Relaxed)
    }

    /// Apply a step delta for a participant and persist the snapshot.
    ///
    /// The mutation is staged on a copy of the board and only committed once
    /// the snapshot write succeeds, so a persistence failure surfaces as a
    /// rejected mutation instead of silently diverging from disk.
    pub async fn log_steps(
        &self,
        group: GroupId,
        user: UserId,
        name: &str,
        delta: i64,
    ) -> Result<i64, ServiceError> {
        let mut board = self.board.write().await;
        let mut staged = board.clone();
        let total = staged.increment(group, user, name, delta);
        self.persist_staged(&mut board, staged).await?;
        Ok(total)
    }

    /// Zero a participant's total and persist the snapshot.
    pub async fn reset_steps(&self, group: GroupId, user: UserId) -> Result<(), ServiceError> {
        let mut board = self.board.write().await;
        let mut staged = board.clone();
        staged.reset(group, user)?;
        self.persist_staged(&mut board, staged).await?;
        Ok(())
    }

    /// Ranked rows for one group.
    pub async fn leaderboard(&self, group: GroupId) -> Vec<LeaderboardRow> {
        self.board.read().await.leaderboard(group)
    }

    /// Groups with at least one record, in first-seen order.
    pub async fn groups(&self) -> Vec<GroupId> {
        self.board.read().await.groups()
    }

    /// Consistent per-group leaderboards, all taken under one read guard.
    ///
    /// This is the snapshot the background loops broadcast from after
    /// releasing the lock.
    pub async fn group_leaderboards(&self) -> Vec<(GroupId, Vec<LeaderboardRow>)> {
        let board = self.board.read().await;
        board
            .groups()
            .into_iter()
            .map(|group| (group, board.leaderboard(group)))
            .collect()
    }

    /// Re-persist the current board as-is (defensive save after a challenge
    /// concludes).
    pub async fn resave(&self) -> Result<(), StorageError> {
        let board = self.board.read().await;
        let outcome = self.store.persist(board.snapshot()).await;
        self.degraded.store(outcome.is_err(), Ordering::Relaxed);
        outcome
    }

    /// Record a new challenge proposal.
    pub async fn propose_challenge(&self, days: u32) -> Result<(), ServiceError> {
        let mut timeline = self.challenge.write().await;
        timeline.propose(days)?;
        Ok(())
    }

    /// Confirm the pending proposal, arming the deadline from the clock.
    pub async fn confirm_challenge(&self) -> Result<OffsetDateTime, ServiceError> {
        let now = self.now();
        let mut timeline = self.challenge.write().await;
        Ok(timeline.confirm(now)?)
    }

    /// Current challenge phase.
    pub async fn challenge_phase(&self) -> ChallengePhase {
        self.challenge.read().await.phase()
    }

    /// Atomically conclude the challenge if its deadline has passed.
    ///
    /// Holding the write lock across the check-and-clear is what guarantees
    /// at most one caller observes the conclusion.
    pub async fn conclude_challenge_if_due(&self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let mut timeline = self.challenge.write().await;
        timeline.poll_and_maybe_conclude(now)
    }

    async fn persist_staged(
        &self,
        board: &mut ScoreBoard,
        staged: ScoreBoard,
    ) -> Result<(), ServiceError> {
        match self.store.persist(staged.snapshot()).await {
            Ok(()) => {
                *board = staged;
                self.degraded.store(false, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.degraded.store(true, Ordering::Relaxed);
                Err(ServiceError::Persistence(err))
            }
        }
    }
}
