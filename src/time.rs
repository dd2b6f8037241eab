//! Regional time handling.
//!
//! The backing store renders instants in a fixed +07:00 regional offset.
//! The conversion lives here and is applied at the serialization boundary
//! only; everything else in the crate works with plain UTC instants.

use chrono::{DateTime, Datelike, FixedOffset, Utc};
use std::fmt;

/// The store's fixed display offset, in seconds east of UTC.
pub const REGION_OFFSET_SECS: i32 = 7 * 3600;

pub fn region() -> FixedOffset {
    FixedOffset::east_opt(REGION_OFFSET_SECS).unwrap()
}

/// Re-labels an instant with the regional offset. The instant itself is
/// unchanged; only its serialized form carries the +07:00 wall time.
pub fn to_regional(time: DateTime<Utc>) -> DateTime<FixedOffset> {
    time.with_timezone(&region())
}

pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|it| it.with_timezone(&Utc))
        .map_err(|err| format!("invalid instant {s:?}: {err}"))
}

/// Coarse relative stamp for a post's publication date, as shown on the
/// post board ("12 minutes ago", "Yesterday", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeStamp {
    MinutesAgo(i64),
    HoursAgo(i64),
    Yesterday,
    Tomorrow,
    OnDate { year: i32, month: u32, day: u32 },
}

impl RelativeStamp {
    pub fn new(now: DateTime<Utc>, time: DateTime<Utc>) -> Self {
        let diff = now - time;
        match diff.num_days() {
            0 => {
                if diff.num_hours() == 0 {
                    Self::MinutesAgo(diff.num_minutes())
                } else {
                    Self::HoursAgo(diff.num_hours())
                }
            }
            1 => Self::Yesterday,
            -1 => Self::Tomorrow,
            _ => {
                let local = to_regional(time);
                Self::OnDate {
                    year: local.year(),
                    month: local.month(),
                    day: local.day(),
                }
            }
        }
    }
}

impl fmt::Display for RelativeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MinutesAgo(n) => write!(f, "{n} minutes ago"),
            Self::HoursAgo(n) => write!(f, "{n} hours ago"),
            Self::Yesterday => write!(f, "Yesterday"),
            Self::Tomorrow => write!(f, "Tomorrow"),
            Self::OnDate { year, month, day } => write!(f, "{day:02}/{month:02}/{year}"),
        }
    }
}
