use agencydir_core::VerificationMode;

/// Acceptance threshold used when `--min-score` is not given.
pub const DEFAULT_MIN_SCORE: u32 = 45;

/// Effective threshold for a mode when the caller did not choose one.
///
/// Strict never drops below 45, moderate relaxes by 10 (floor 30) and
/// lenient by 20 (floor 20).
#[must_use]
pub fn default_min_score(mode: VerificationMode, requested: u32) -> u32 {
    match mode {
        VerificationMode::Strict => requested.max(45),
        VerificationMode::Moderate => requested.saturating_sub(10).max(30),
        VerificationMode::Lenient => requested.saturating_sub(20).max(20),
    }
}
