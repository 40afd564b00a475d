use chrono::NaiveDate;

use crate::Expense;

/// Filters for the expense list and the exports.
///
/// Every predicate is optional and they are ANDed together:
/// - `text`: case-insensitive substring of `note` or `category`
/// - `date`: exact match on `date`
/// - `category`: exact (case-sensitive) match on `category`
///
/// Blank `text` or `category` behave as absent, like cleared inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pub text: Option<String>,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
}

impl Query {
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// `true` when no predicate is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle().is_none() && self.date.is_none() && self.category_filter().is_none()
    }

    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        self.matches_text(expense) && self.matches_date(expense) && self.matches_category(expense)
    }

    fn needle(&self) -> Option<String> {
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }

    fn category_filter(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    fn matches_text(&self, expense: &Expense) -> bool {
        match self.needle() {
            None => true,
            Some(needle) => {
                expense.note.to_lowercase().contains(&needle)
                    || expense.category.to_lowercase().contains(&needle)
            }
        }
    }

    fn matches_date(&self, expense: &Expense) -> bool {
        self.date.is_none_or(|date| expense.date == date)
    }

    fn matches_category(&self, expense: &Expense) -> bool {
        self.category_filter()
            .is_none_or(|category| expense.category == category)
    }
}

/// Returns the records matching `query`, in store order.
pub fn filter<'a>(records: &'a [Expense], query: &Query) -> Vec<&'a Expense> {
    if query.is_empty() {
        return records.iter().collect();
    }
    records.iter().filter(|record| query.matches(record)).collect()
}
