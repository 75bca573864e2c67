use chrono::{DateTime, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar day in local time, rendered as `YYYY-MM-DD`.
///
/// This is the only join criterion between a selected calendar cell and an
/// entry's `created_at`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DateKey(String);

impl DateKey {
    pub fn from_day(day: NaiveDate) -> Self {
        DateKey(day.format("%Y-%m-%d").to_string())
    }

    /// Key of the local calendar day `instant` falls on.
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::from_day(instant.with_timezone(&Local).date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(day: NaiveDate) -> Self {
        Self::from_day(day)
    }
}

pub fn to_key<Tz: TimeZone>(instant: &DateTime<Tz>) -> DateKey {
    DateKey::of(instant)
}

pub fn same_day<A: TimeZone, B: TimeZone>(a: &DateTime<A>, b: &DateTime<B>) -> bool {
    to_key(a) == to_key(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, min, 0).earliest().unwrap()
    }

    #[test]
    fn key_is_zero_padded() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(DateKey::from_day(day).as_str(), "2024-05-01");
        assert_eq!(to_key(&local(2024, 5, 1, 9, 30)).as_str(), "2024-05-01");
    }

    #[rstest]
    #[case(0, 5, 23, 59)]
    #[case(6, 0, 12, 0)]
    #[case(1, 1, 22, 58)]
    fn times_on_the_same_local_day_share_a_key(
        #[case] h1: u32,
        #[case] m1: u32,
        #[case] h2: u32,
        #[case] m2: u32,
    ) {
        let a = local(2024, 2, 29, h1, m1);
        let b = local(2024, 2, 29, h2, m2);
        assert!(same_day(&a, &b));
        assert_eq!(to_key(&a), to_key(&b));
    }

    #[test]
    fn adjacent_days_differ() {
        let a = local(2023, 12, 31, 23, 59);
        let b = local(2024, 1, 1, 0, 1);
        assert!(!same_day(&a, &b));
    }

    #[test]
    fn utc_instants_are_keyed_in_local_time() {
        let noon = local(2024, 5, 1, 12, 0);
        let as_utc = noon.with_timezone(&Utc);
        assert_eq!(to_key(&as_utc), DateKey::from_day(noon.date_naive()));
        assert!(same_day(&noon, &as_utc));
    }
}
