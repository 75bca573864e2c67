use crate::date_key::DateKey;
use chrono::{Datelike, Months, NaiveDate};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    pub has_entry: bool,
    pub is_selected: bool,
    pub is_today: bool,
}

/// One month laid out for a Sunday-first grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub first: NaiveDate,
    /// Empty cells before the 1st.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

impl MonthView {
    pub fn build(selected: NaiveDate, today: NaiveDate, marks: &HashMap<DateKey, bool>) -> Self {
        let first = first_of_month(selected);
        let days = first
            .iter_days()
            .take_while(|d| d.month() == first.month())
            .map(|date| DayCell {
                date,
                has_entry: marks.get(&DateKey::from_day(date)).copied().unwrap_or(false),
                is_selected: date == selected,
                is_today: date == today,
            })
            .collect();
        MonthView {
            first,
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        }
    }

    /// Days of this month that have an entry.
    pub fn journaled(&self) -> usize {
        self.days.iter().filter(|d| d.has_entry).count()
    }

    pub fn title(&self) -> String {
        self.first.format("%B %Y").to_string()
    }

    /// Rows of seven cells, `None` for padding.
    pub fn weeks(&self) -> Vec<Vec<Option<&DayCell>>> {
        let mut cells: Vec<Option<&DayCell>> = (0..self.leading_blanks).map(|_| None).collect();
        cells.extend(self.days.iter().map(Some));
        while cells.len() % 7 != 0 {
            cells.push(None);
        }
        cells.chunks(7).map(|week| week.to_vec()).collect()
    }
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Moves by whole months, clamping the day to the target month's length.
pub fn shift_months(day: NaiveDate, months: i32) -> NaiveDate {
    let shifted = if months >= 0 {
        day.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        day.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.unwrap_or(day)
}

pub fn shift_days(day: NaiveDate, days: i64) -> NaiveDate {
    day.checked_add_signed(chrono::Duration::days(days))
        .unwrap_or(day)
}
