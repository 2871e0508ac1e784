//! Aggregated OpenAPI document.

use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for stride-back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::steps::log_steps,
        crate::routes::steps::reset_steps,
        crate::routes::steps::leaderboard,
        crate::routes::challenge::propose_challenge,
        crate::routes::challenge::confirm_challenge,
        crate::routes::challenge::challenge_status,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::steps::LogStepsRequest,
            crate::dto::steps::StepTotal,
            crate::dto::steps::ActionResponse,
            crate::dto::steps::LeaderboardEntry,
            crate::dto::steps::LeaderboardResponse,
            crate::dto::challenge::ProposeChallengeRequest,
            crate::dto::challenge::ChallengeProposed,
            crate::dto::challenge::ChallengeConfirmed,
            crate::dto::challenge::ChallengeStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "steps", description = "Step logging and leaderboards"),
        (name = "challenge", description = "Challenge lifecycle"),
    )
)]
pub struct ApiDoc;
