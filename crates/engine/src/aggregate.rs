//! Grouping and rolling-window statistics.
//!
//! Both operations are pure: they only look at the records they are given and
//! at the caller's notion of "now", a local wall-clock instant.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::{Expense, Money};

/// All records sharing one `date`, with their total.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DateGroup<'a> {
    pub date: NaiveDate,
    pub items: Vec<&'a Expense>,
    pub subtotal: Money,
}

/// Partitions records by `date`, newest date first.
///
/// Items keep their input order inside each group.
pub fn group_by_date<'a, I>(records: I) -> Vec<DateGroup<'a>>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut by_date: BTreeMap<NaiveDate, Vec<&'a Expense>> = BTreeMap::new();
    for record in records {
        by_date.entry(record.date).or_default().push(record);
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, items)| DateGroup {
            date,
            subtotal: items.iter().map(|item| item.amount).sum(),
            items,
        })
        .collect()
}

/// Lower bounds (inclusive) of the rolling windows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Windows {
    pub start_of_day: NaiveDateTime,
    /// Weeks start on Sunday.
    pub start_of_week: NaiveDateTime,
    pub start_of_month: NaiveDateTime,
}

impl Windows {
    #[must_use]
    pub fn at(now: NaiveDateTime) -> Self {
        let today = now.date();
        let sunday = today
            .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
            .unwrap_or(NaiveDate::MIN);
        let first = today.with_day(1).unwrap_or(today);

        Self {
            start_of_day: today.and_time(NaiveTime::MIN),
            start_of_week: sunday.and_time(NaiveTime::MIN),
            start_of_month: first.and_time(NaiveTime::MIN),
        }
    }
}

/// Totals over the four windows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub today: Money,
    pub week: Money,
    pub month: Money,
    pub all: Money,
}

/// Sums amounts per window.
///
/// A record's `date` is read as midnight of that day; its `time` is ignored.
/// Future-dated records fall in every window.
pub fn compute_stats<'a, I>(records: I, now: NaiveDateTime) -> Stats
where
    I: IntoIterator<Item = &'a Expense>,
{
    let windows = Windows::at(now);
    let mut stats = Stats::default();

    for record in records {
        let day = record.date.and_time(NaiveTime::MIN);
        let amount = record.amount;

        stats.all = stats.all.saturating_add(amount);
        if day >= windows.start_of_day {
            stats.today = stats.today.saturating_add(amount);
        }
        if day >= windows.start_of_week {
            stats.week = stats.week.saturating_add(amount);
        }
        if day >= windows.start_of_month {
            stats.month = stats.month.saturating_add(amount);
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn expense(n: u128, major: i64, category: &str, date: &str) -> Expense {
        Expense {
            id: Uuid::from_u128(n),
            amount: Money::new(major * 100),
            category: category.to_string(),
            note: String::new(),
            date: date.parse().unwrap(),
            time: Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap(),
        }
    }

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn groups_newest_date_first_with_subtotals() {
        let records = vec![
            expense(1, 100, "Food", "2024-01-01"),
            expense(2, 50, "Travel", "2024-01-01"),
            expense(3, 30, "Food", "2024-01-02"),
        ];
        let groups = group_by_date(&records);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].date, "2024-01-02".parse::<NaiveDate>().unwrap());
        assert_eq!(groups[0].items, vec![&records[2]]);
        assert_eq!(groups[0].subtotal, Money::new(3_000));
        assert_eq!(groups[1].date, "2024-01-01".parse::<NaiveDate>().unwrap());
        assert_eq!(groups[1].items, vec![&records[0], &records[1]]);
        assert_eq!(groups[1].subtotal, Money::new(15_000));
    }

    #[test]
    fn groups_partition_input_exactly() {
        let records: Vec<Expense> = (0..20)
            .map(|n| expense(n, 1, "X", &format!("2024-02-{:02}", 1 + (n * 7) % 11)))
            .collect();
        let groups = group_by_date(&records);

        let total: usize = groups.iter().map(|g| g.items.len()).sum();
        assert_eq!(total, records.len());
        assert!(groups.windows(2).all(|pair| pair[0].date > pair[1].date));
        for group in &groups {
            assert!(group.items.iter().all(|item| item.date == group.date));
        }
    }

    #[test]
    fn empty_input_has_no_groups_and_zero_stats() {
        let none: Vec<Expense> = Vec::new();
        assert!(group_by_date(&none).is_empty());
        assert_eq!(compute_stats(&none, at("2024-05-15 12:00")), Stats::default());
    }

    #[test]
    fn windows_start_at_midnight_sunday_and_first_of_month() {
        // 2024-05-15 is a Wednesday.
        let windows = Windows::at(at("2024-05-15 18:45"));
        assert_eq!(windows.start_of_day, at("2024-05-15 00:00"));
        assert_eq!(windows.start_of_week, at("2024-05-12 00:00"));
        assert_eq!(windows.start_of_month, at("2024-05-01 00:00"));
    }

    #[test]
    fn sunday_is_its_own_week_start() {
        let windows = Windows::at(at("2024-05-12 09:00"));
        assert_eq!(windows.start_of_week, at("2024-05-12 00:00"));
    }

    #[test]
    fn week_can_start_in_previous_month() {
        // 2024-06-01 is a Saturday; its week began on 2024-05-26.
        let now = at("2024-06-01 10:00");
        let windows = Windows::at(now);
        assert!(windows.start_of_week < windows.start_of_month);

        let records = vec![expense(1, 10, "Food", "2024-05-28")];
        let stats = compute_stats(&records, now);
        assert_eq!(stats.week, Money::new(1_000));
        assert_eq!(stats.month, Money::ZERO);
        assert_eq!(stats.all, Money::new(1_000));
    }

    #[test]
    fn stats_use_inclusive_boundaries() {
        let now = at("2024-05-15 23:59");
        let records = vec![
            expense(1, 1, "A", "2024-05-15"),
            expense(2, 10, "A", "2024-05-12"),
            expense(3, 100, "A", "2024-05-01"),
            expense(4, 1000, "A", "2024-04-30"),
        ];
        let stats = compute_stats(&records, now);

        assert_eq!(stats.today, Money::new(100));
        assert_eq!(stats.week, Money::new(1_100));
        assert_eq!(stats.month, Money::new(11_100));
        assert_eq!(stats.all, Money::new(111_100));
    }

    #[test]
    fn record_dated_today_counts_in_every_window() {
        let now = at("2024-05-15 00:00");
        let records = vec![expense(1, 5, "A", "2024-05-15")];
        let stats = compute_stats(&records, now);
        assert_eq!(stats.today, stats.all);
        assert_eq!(stats.week, stats.all);
        assert_eq!(stats.month, stats.all);
    }

    #[test]
    fn ten_days_ago_counts_in_month_only_mid_month() {
        let now = at("2024-05-20 12:00");
        let records = vec![expense(1, 7, "A", "2024-05-10")];
        let stats = compute_stats(&records, now);
        assert_eq!(stats.today, Money::ZERO);
        assert_eq!(stats.week, Money::ZERO);
        assert_eq!(stats.month, Money::new(700));
    }

    #[test]
    fn zero_amounts_contribute_nothing() {
        let mut broken = expense(1, 0, "A", "2024-05-15");
        broken.amount = Money::ZERO;
        let records = vec![broken, expense(2, 3, "A", "2024-05-15")];
        assert_eq!(compute_stats(&records, at("2024-05-15 08:00")).all, Money::new(300));
    }
}
