use crate::date_key::DateKey;
use crate::journal_entry::JournalEntry;
use chrono::NaiveDate;
use std::collections::HashMap;

/// Marks every day that has at least one entry.
pub fn entries_by_day(entries: &[JournalEntry]) -> HashMap<DateKey, bool> {
    entries.iter().map(|e| (e.day(), true)).collect()
}

/// First entry in store order whose `created_at` falls on `day`.
pub fn find_for_date(entries: &[JournalEntry], day: NaiveDate) -> Option<&JournalEntry> {
    let key = DateKey::from_day(day);
    entries.iter().find(|e| e.day() == key)
}

/// Case-insensitive substring match on title or content. An empty query keeps
/// everything. Relative order is preserved.
pub fn filter_by_search<'a>(entries: &'a [JournalEntry], query: &str) -> Vec<&'a JournalEntry> {
    let needle = query.to_lowercase();
    entries.iter().filter(|e| e.matches(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::entry_on;
    use crate::journal_entry::EntryId;
    use rstest::{fixture, rstest};

    #[fixture]
    fn entries() -> Vec<JournalEntry> {
        vec![
            entry_on("a", "Beach", "Sun", 2024, 5, 1),
            entry_on("b", "Work", "Meetings", 2024, 5, 2),
        ]
    }

    #[rstest]
    fn search_scenario_matches_only_meetings(entries: Vec<JournalEntry>) {
        let found = filter_by_search(&entries, "meet");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, EntryId("b".into()));
    }

    #[rstest]
    fn empty_query_returns_everything_in_order(entries: Vec<JournalEntry>) {
        let found: Vec<_> = filter_by_search(&entries, "").into_iter().cloned().collect();
        assert_eq!(found, entries);
    }

    #[rstest]
    #[case("beach")]
    #[case("BEACH")]
    #[case("eAc")]
    #[case("sun")]
    fn search_ignores_case(entries: Vec<JournalEntry>, #[case] query: &str) {
        let found = filter_by_search(&entries, query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Beach");
    }

    #[rstest]
    fn find_for_date_is_stable(entries: Vec<JournalEntry>) {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let first = find_for_date(&entries, day);
        let second = find_for_date(&entries, day);
        assert_eq!(first, second);
        assert_eq!(first.map(|e| e.title.as_str()), Some("Work"));
        assert!(find_for_date(&entries, day.succ_opt().unwrap()).is_none());
    }

    #[test]
    fn duplicate_day_resolves_to_first_in_store_order() {
        let entries = vec![
            entry_on("first", "One", "", 2024, 6, 3),
            entry_on("second", "Two", "", 2024, 6, 3),
        ];
        let day = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(find_for_date(&entries, day).unwrap().id, EntryId("first".into()));

        let marks = entries_by_day(&entries);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks.get(&DateKey::from_day(day)), Some(&true));
    }
}
