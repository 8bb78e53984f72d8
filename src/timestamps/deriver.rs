use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use regex::Regex;

use crate::models::ContainerKind;

static FLV_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<stamp>\d{4}/\d{2}/\d{2}/\d{6})\.flv$").expect("FLV stamp pattern is valid")
});

static MP4_STAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?P<stamp>\d{4}-\d{2}-\d{2}/\d{2}-\d{2}-\d{2})\.mp4$")
        .expect("MP4 stamp pattern is valid")
});

/// Outcome of deriving a capture time from a segment path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureTime {
    Parsed(DateTime<Utc>),
    /// The path does not follow the naming convention for its container kind
    Unparseable,
}

impl CaptureTime {
    pub fn parsed(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Parsed(ts) => Some(ts),
            Self::Unparseable => None,
        }
    }

    /// Collapse to the legacy representation where the Unix epoch marks a failed parse
    pub fn or_epoch(self) -> DateTime<Utc> {
        self.parsed().unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Derive the capture time encoded at the end of a `/`-separated relative path
///
/// The timestamp portion sits immediately before the extension and is interpreted as
/// wall-clock time in `zone`. Any prefix before it is ignored, so archives nested under
/// extra directories still resolve. Invalid calendar values (month 13, 25:00:00) and
/// paths too short to hold a timestamp yield [`CaptureTime::Unparseable`].
///
/// # Examples
///
/// ```
/// use chrono::FixedOffset;
/// use rec_archive::models::ContainerKind;
/// use rec_archive::timestamps::derive_timestamp;
///
/// let zone = FixedOffset::east_opt(8 * 3600).unwrap();
/// let ts = derive_timestamp("hk/2021/09/24/143046.flv", ContainerKind::Flv, &zone);
/// assert_eq!(ts.parsed().map(|t| t.timestamp()), Some(1632465046));
/// ```
pub fn derive_timestamp(
    relative_path: &str,
    kind: ContainerKind,
    zone: &FixedOffset,
) -> CaptureTime {
    let pattern = match kind {
        ContainerKind::Flv => &*FLV_STAMP,
        ContainerKind::Mp4 => &*MP4_STAMP,
    };

    let Some(stamp) = pattern.captures(relative_path).and_then(|c| c.name("stamp")) else {
        return CaptureTime::Unparseable;
    };

    let Ok(naive) = NaiveDateTime::parse_from_str(stamp.as_str(), kind.layout()) else {
        return CaptureTime::Unparseable;
    };

    match zone.from_local_datetime(&naive).single() {
        Some(local) => CaptureTime::Parsed(local.with_timezone(&Utc)),
        None => CaptureTime::Unparseable,
    }
}
