use engine::ViewModel;

/// Lays the page out as plain text: the four statistic cards, then the list.
pub fn page(view: &ViewModel) -> String {
    let mut out = String::new();
    let stats = &view.stats;
    out.push_str(&format!(
        "Today {}  |  This week {}  |  This month {}  |  All time {}\n",
        stats.today, stats.week, stats.month, stats.all
    ));
    out.push('\n');

    if view.empty {
        out.push_str("No expenses match the current filters.\n");
        return out;
    }

    for group in &view.groups {
        out.push_str(&group.header);
        out.push('\n');
        for item in &group.items {
            out.push_str(&format!(
                "  {} • {}  [{}]\n",
                item.category, item.amount, item.id
            ));
            if !item.note.is_empty() {
                out.push_str(&format!("    {}\n", item.note));
            }
            out.push_str(&format!("    {}\n", item.saved));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use engine::{GroupView, ItemView, StatsView};
    use uuid::Uuid;

    use super::*;

    fn stats() -> StatsView {
        StatsView {
            today: "₹1.00".to_string(),
            week: "₹2.00".to_string(),
            month: "₹3.00".to_string(),
            all: "₹4.00".to_string(),
        }
    }

    #[test]
    fn empty_view_shows_stats_and_empty_state() {
        let view = ViewModel {
            stats: stats(),
            groups: Vec::new(),
            empty: true,
        };
        let text = page(&view);
        assert!(text.starts_with("Today ₹1.00  |  This week ₹2.00"));
        assert!(text.ends_with("No expenses match the current filters.\n"));
    }

    #[test]
    fn groups_are_listed_with_items() {
        let view = ViewModel {
            stats: stats(),
            groups: vec![GroupView {
                header: "2024-01-01 • ₹1.00".to_string(),
                items: vec![ItemView {
                    id: Uuid::from_u128(1),
                    category: "Food".to_string(),
                    amount: "₹1.00".to_string(),
                    note: String::new(),
                    saved: "Saved: 01/01/2024, 10:00:00".to_string(),
                }],
            }],
            empty: false,
        };
        let text = page(&view);
        assert!(text.contains("2024-01-01 • ₹1.00\n  Food • ₹1.00  [00000000-0000-0000-0000-000000000001]\n    Saved: 01/01/2024, 10:00:00\n"));
    }
}
