//! View model for the expense list page.
//!
//! [`render`] maps grouped records and statistics to plain strings, so any
//! front end (terminal, web, tests) can display the same page.

use std::fmt::Display;

use chrono::TimeZone;
use serde::Serialize;
use uuid::Uuid;

use crate::{Currency, DateGroup, Stats};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatsView {
    pub today: String,
    pub week: String,
    pub month: String,
    pub all: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ItemView {
    pub id: Uuid,
    pub category: String,
    pub amount: String,
    pub note: String,
    /// `Saved: <local time>`
    pub saved: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GroupView {
    /// `<date> • <subtotal>`
    pub header: String,
    pub items: Vec<ItemView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub stats: StatsView,
    pub groups: Vec<GroupView>,
    /// No record passes the active filters.
    pub empty: bool,
}

impl StatsView {
    #[must_use]
    pub fn new(stats: &Stats, currency: Currency) -> Self {
        Self {
            today: stats.today.format(currency),
            week: stats.week.format(currency),
            month: stats.month.format(currency),
            all: stats.all.format(currency),
        }
    }
}

/// Builds the page. Save times are shown in `tz`.
pub fn render<Tz>(groups: &[DateGroup<'_>], stats: &Stats, currency: Currency, tz: &Tz) -> ViewModel
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let groups: Vec<GroupView> = groups
        .iter()
        .map(|group| GroupView {
            header: format!(
                "{} • {}",
                group.date.format("%Y-%m-%d"),
                group.subtotal.format(currency)
            ),
            items: group
                .items
                .iter()
                .map(|item| ItemView {
                    id: item.id,
                    category: item.category.clone(),
                    amount: item.amount.format(currency),
                    note: item.note.clone(),
                    saved: format!(
                        "Saved: {}",
                        item.time.with_timezone(tz).format("%d/%m/%Y, %H:%M:%S")
                    ),
                })
                .collect(),
        })
        .collect();

    ViewModel {
        stats: StatsView::new(stats, currency),
        empty: groups.is_empty(),
        groups,
    }
}
