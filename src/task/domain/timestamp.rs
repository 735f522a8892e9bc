//! Wall-clock readings at the precision the stores keep.

use chrono::{DateTime, SubsecRound, Utc};
use mockable::Clock;

/// Fractional-second digits kept by `TIMESTAMPTZ`.
const STORED_SUBSEC_DIGITS: u16 = 6;

/// Reads the clock and truncates to microseconds.
///
/// Timestamps stamped on tasks and log entries go through here so that a
/// value returned from a write equals the value read back from Postgres,
/// including copies embedded in JSONB snapshots.
#[must_use]
pub fn stored_now(clock: &impl Clock) -> DateTime<Utc> {
    clock.utc().trunc_subsecs(STORED_SUBSEC_DIGITS)
}
