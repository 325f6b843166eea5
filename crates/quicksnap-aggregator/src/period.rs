use quicksnap_types::PeriodId;

/// The incentive period containing the unix timestamp `now`.
///
/// `floor(now / WEEK) * WEEK`: every timestamp of a week maps to the same period.
#[must_use]
pub fn compute_active_period(now: u64) -> PeriodId {
    PeriodId::containing(now)
}

/// The current unix timestamp, in seconds.
///
/// Take it once per pass and derive every period from it.
#[must_use]
pub fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}
