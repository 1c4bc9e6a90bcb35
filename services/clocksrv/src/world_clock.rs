//! Offline world clock
//!
//! A fixed table of cities with their standard UTC offset and daylight-saving
//! rule. Local times are computed from the injected [`TimeProvider`], so no
//! time zone database is needed at runtime.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
    Weekday,
};
use common::TimeProvider;
use serde::Serialize;

/// Daylight-saving schedules used by the city table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DstRule {
    None,
    /// Last Sunday of March to last Sunday of October, switching at 01:00 UTC
    Eu,
    /// Second Sunday of March to first Sunday of November, 02:00 local
    NorthAmerica,
    /// First Sunday of October to first Sunday of April, 02:00/03:00 local
    AustraliaSouthEast,
    /// Last Friday of April to the end of the last Thursday of October
    Egypt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct City {
    pub name: &'static str,
    /// IANA zone name, also used for timeapi.io lookups
    pub timezone: &'static str,
    pub standard_offset_minutes: i32,
    pub dst: DstRule,
    pub latitude: f64,
    pub longitude: f64,
}

pub const CITIES: &[City] = &[
    City {
        name: "Madrid",
        timezone: "Europe/Madrid",
        standard_offset_minutes: 60,
        dst: DstRule::Eu,
        latitude: 40.4165,
        longitude: -3.70256,
    },
    City {
        name: "Buenos Aires",
        timezone: "America/Argentina/Buenos_Aires",
        standard_offset_minutes: -180,
        dst: DstRule::None,
        latitude: -34.6037,
        longitude: -58.3816,
    },
    City {
        name: "New York",
        timezone: "America/New_York",
        standard_offset_minutes: -300,
        dst: DstRule::NorthAmerica,
        latitude: 40.7128,
        longitude: -74.0060,
    },
    City {
        name: "Tokyo",
        timezone: "Asia/Tokyo",
        standard_offset_minutes: 540,
        dst: DstRule::None,
        latitude: 35.6895,
        longitude: 139.6917,
    },
    City {
        name: "London",
        timezone: "Europe/London",
        standard_offset_minutes: 0,
        dst: DstRule::Eu,
        latitude: 51.5074,
        longitude: -0.1278,
    },
    City {
        name: "Paris",
        timezone: "Europe/Paris",
        standard_offset_minutes: 60,
        dst: DstRule::Eu,
        latitude: 48.8566,
        longitude: 2.3522,
    },
    City {
        name: "Los Angeles",
        timezone: "America/Los_Angeles",
        standard_offset_minutes: -480,
        dst: DstRule::NorthAmerica,
        latitude: 34.0522,
        longitude: -118.2437,
    },
    City {
        name: "Sydney",
        timezone: "Australia/Sydney",
        standard_offset_minutes: 600,
        dst: DstRule::AustraliaSouthEast,
        latitude: -33.8688,
        longitude: 151.2093,
    },
    City {
        name: "Mexico City",
        timezone: "America/Mexico_City",
        standard_offset_minutes: -360,
        dst: DstRule::None,
        latitude: 19.4326,
        longitude: -99.1332,
    },
    City {
        name: "Cairo",
        timezone: "Africa/Cairo",
        standard_offset_minutes: 120,
        dst: DstRule::Egypt,
        latitude: 30.0444,
        longitude: 31.2357,
    },
];

/// Case-insensitive lookup in [`CITIES`]
pub fn find_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

impl City {
    /// UTC offset in effect at `utc`, in minutes
    pub fn offset_minutes_at(&self, utc: DateTime<Utc>) -> i32 {
        if self.dst_active(utc) {
            self.standard_offset_minutes + 60
        } else {
            self.standard_offset_minutes
        }
    }

    pub fn offset_at(&self, utc: DateTime<Utc>) -> FixedOffset {
        offset_from_minutes(self.offset_minutes_at(utc))
    }

    pub fn local_time(&self, utc: DateTime<Utc>) -> DateTime<FixedOffset> {
        utc.with_timezone(&self.offset_at(utc))
    }

    pub fn dst_active(&self, utc: DateTime<Utc>) -> bool {
        let year = utc.year();
        let standard = self.standard_offset_minutes;
        let window = match self.dst {
            DstRule::None => return false,
            DstRule::Eu => (
                last_weekday(year, 3, Weekday::Sun).and_then(|d| at_utc(d, 1, 0)),
                last_weekday(year, 10, Weekday::Sun).and_then(|d| at_utc(d, 1, 0)),
            ),
            DstRule::NorthAmerica => (
                nth_weekday(year, 3, Weekday::Sun, 2).and_then(|d| at_utc(d, 2, standard)),
                nth_weekday(year, 11, Weekday::Sun, 1).and_then(|d| at_utc(d, 2, standard + 60)),
            ),
            DstRule::AustraliaSouthEast => {
                // Southern hemisphere: the window wraps the new year
                let start = nth_weekday(year, 10, Weekday::Sun, 1).and_then(|d| at_utc(d, 2, standard));
                let end = nth_weekday(year, 4, Weekday::Sun, 1).and_then(|d| at_utc(d, 3, standard + 60));
                return match (start, end) {
                    (Some(start), Some(end)) => utc >= start || utc < end,
                    _ => false,
                };
            },
            DstRule::Egypt => (
                last_weekday(year, 4, Weekday::Fri).and_then(|d| at_utc(d, 0, standard)),
                last_weekday(year, 10, Weekday::Thu)
                    .and_then(|d| d.succ_opt())
                    .and_then(|d| at_utc(d, 0, standard + 60)),
            ),
        };

        match window {
            (Some(start), Some(end)) => utc >= start && utc < end,
            _ => false,
        }
    }
}

fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// `±HH:MM`
pub fn format_utc_offset(minutes: i32) -> String {
    let sign = if minutes >= 0 { '+' } else { '-' };
    let minutes = minutes.abs();
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// Instant at which local wall time `hour:00` on `date` occurs, given the
/// offset in force just before the switch
fn at_utc(date: NaiveDate, hour: u32, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let local: NaiveDateTime = date.and_hms_opt(hour, 0, 0)?;
    Some((local - Duration::minutes(i64::from(offset_minutes))).and_utc())
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut day = first_of_next.pred_opt()?;
    while day.weekday() != weekday {
        day = day.pred_opt()?;
    }
    Some(day)
}

pub(crate) fn utc_from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_default()
}

/// Local time of one city, as served by `/api/worldclock/{city}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CityTime {
    pub city: String,
    /// `HH:MM:SS`
    pub time: String,
    /// `MM/DD/YYYY`
    pub date: String,
    pub timezone: String,
    /// `±HH:MM`
    pub utc_offset: String,
    pub success: bool,
}

impl CityTime {
    pub fn from_local(city: &str, timezone: &str, local: DateTime<FixedOffset>) -> Self {
        Self {
            city: city.to_string(),
            time: local.format("%H:%M:%S").to_string(),
            date: local.format("%m/%d/%Y").to_string(),
            timezone: timezone.to_string(),
            utc_offset: format_utc_offset(local.offset().local_minus_utc() / 60),
            success: true,
        }
    }

    /// UTC stand-in for cities outside the table
    pub fn utc_fallback(city: &str, utc: DateTime<Utc>) -> Self {
        Self {
            success: false,
            ..Self::from_local(city, "UTC", utc.with_timezone(&Utc.fix()))
        }
    }

    /// Hour of day parsed back out of `time`
    pub fn hour(&self) -> Option<u32> {
        self.time.get(..2).and_then(|h| h.parse().ok())
    }
}

/// World clock over [`CITIES`]
pub struct WorldClock {
    clock: Arc<dyn TimeProvider>,
}

impl WorldClock {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self { clock }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        utc_from_millis(self.clock.now_millis())
    }

    pub fn city_names(&self) -> Vec<&'static str> {
        CITIES.iter().map(|c| c.name).collect()
    }

    pub fn city_time(&self, name: &str) -> Option<CityTime> {
        find_city(name).map(|city| self.time_in(city))
    }

    pub fn time_in(&self, city: &City) -> CityTime {
        CityTime::from_local(city.name, city.timezone, city.local_time(self.now_utc()))
    }

    /// Every city, keyed and sorted by name
    pub fn all(&self) -> BTreeMap<&'static str, CityTime> {
        let now = self.now_utc();
        CITIES
            .iter()
            .map(|city| {
                (
                    city.name,
                    CityTime::from_local(city.name, city.timezone, city.local_time(now)),
                )
            })
            .collect()
    }
}
