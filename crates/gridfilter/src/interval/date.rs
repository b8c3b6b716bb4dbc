use chrono::{Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{Filter, FilterValue};
use crate::property::TemporalType;

/// The coarsest time unit of interest in a date input, finest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

/// Which edge of a range a value sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Clamp finer units to their minimum.
    Start,
    /// Clamp finer units to their maximum.
    End,
}

/// Round `value` to `resolution` for the given range edge.
///
/// Only units strictly finer than `resolution` are clamped; the unit itself
/// and anything coarser keep their values. Sub-second precision is always
/// clamped.
pub fn truncate(value: NaiveDateTime, resolution: Resolution, edge: Edge) -> NaiveDateTime {
    let (year, mut month, mut day) = (value.year(), value.month(), value.day());
    let (mut hour, mut minute, mut second) = (value.hour(), value.minute(), value.second());

    let nanos = match edge {
        Edge::Start => {
            if resolution > Resolution::Second {
                second = 0;
            }
            if resolution > Resolution::Minute {
                minute = 0;
            }
            if resolution > Resolution::Hour {
                hour = 0;
            }
            if resolution > Resolution::Day {
                day = 1;
            }
            if resolution > Resolution::Month {
                month = 1;
            }
            0
        }
        Edge::End => {
            if resolution > Resolution::Second {
                second = 59;
            }
            if resolution > Resolution::Minute {
                minute = 59;
            }
            if resolution > Resolution::Hour {
                hour = 23;
            }
            // Month first: the last day depends on it.
            if resolution > Resolution::Month {
                month = 12;
            }
            if resolution > Resolution::Day {
                day = last_day_of_month(year, month);
            }
            999_999_999
        }
    };

    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_nano_opt(hour, minute, second, nanos))
        .unwrap_or(value)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// A from/to range of local date-times, either end optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl DateInterval {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn since(mut self, from: NaiveDateTime) -> Self {
        self.from = Some(from);
        self
    }

    pub fn until(mut self, to: NaiveDateTime) -> Self {
        self.to = Some(to);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Round `from` as a start edge and `to` as an end edge.
    pub fn truncated(&self, resolution: Resolution) -> Self {
        Self {
            from: self.from.map(|v| truncate(v, resolution, Edge::Start)),
            to: self.to.map(|v| truncate(v, resolution, Edge::End)),
        }
    }

    /// Reduce to inclusive bounds on `field`.
    ///
    /// Values are first brought to the field's temporal type: plain dates drop
    /// the time of day, local date-times are used as-is, and zoned fields read
    /// the value in `viewer_offset` and compare in UTC.
    pub fn to_filter(
        &self,
        field: &str,
        temporal: TemporalType,
        viewer_offset: FixedOffset,
    ) -> Option<Filter> {
        let ge = self
            .from
            .map(|v| Filter::ge(field, temporal_value(v, temporal, viewer_offset)));
        let le = self
            .to
            .map(|v| Filter::le(field, temporal_value(v, temporal, viewer_offset)));
        Filter::and([ge, le])
    }
}

/// Bring a local date-time picked by the viewer to the field's temporal type.
pub(crate) fn temporal_value(
    value: NaiveDateTime,
    temporal: TemporalType,
    offset: FixedOffset,
) -> FilterValue {
    match temporal {
        TemporalType::Date => FilterValue::Date(value.date()),
        TemporalType::DateTime => FilterValue::DateTime(value),
        TemporalType::Zoned => {
            let instant = offset
                .from_local_datetime(&value)
                .single()
                .map(|local| local.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&value));
            FilterValue::Instant(instant)
        }
    }
}
