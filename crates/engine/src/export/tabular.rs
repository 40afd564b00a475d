use chrono::SecondsFormat;
use csv::{QuoteStyle, Terminator, WriterBuilder};

use super::Artifact;
use crate::{Currency, Expense, ResultEngine};

pub const HEADER: [&str; 6] = ["id", "date", "amount", "category", "note", "time"];

const FILE_NAME: &str = "expenses.csv";
const CONTENT_TYPE: &str = "text/csv;charset=utf-8";

/// Writes `subset` as CSV with every field quoted.
///
/// An empty subset yields a header-only file.
pub fn export_tabular(subset: &[&Expense], currency: Currency) -> ResultEngine<Artifact> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(HEADER)?;
    for expense in subset {
        writer.write_record([
            expense.id.to_string(),
            expense.date.format("%Y-%m-%d").to_string(),
            expense.amount.to_major_string(currency),
            expense.category.clone(),
            expense.note.clone(),
            expense.time.to_rfc3339_opts(SecondsFormat::Millis, true),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|err| err.into_error())?;
    tracing::debug!("exported {} rows to {FILE_NAME}", subset.len());

    Ok(Artifact {
        file_name: FILE_NAME,
        content_type: CONTENT_TYPE,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use csv::ReaderBuilder;
    use uuid::Uuid;

    use super::*;
    use crate::Money;

    fn expense(n: u128, note: &str) -> Expense {
        Expense {
            id: Uuid::from_u128(n),
            amount: Money::new(12_345),
            category: "Food".to_string(),
            note: note.to_string(),
            date: "2024-01-01".parse().unwrap(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 15, 0).unwrap(),
        }
    }

    fn parse(bytes: &[u8]) -> Vec<Vec<String>> {
        ReaderBuilder::new()
            .has_headers(false)
            .from_reader(bytes)
            .records()
            .map(|record| record.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn every_field_is_quoted() {
        let record = expense(1, "chai");
        let artifact = export_tabular(&[&record], Currency::Inr).unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();

        assert_eq!(artifact.file_name, "expenses.csv");
        assert_eq!(
            text,
            "\"id\",\"date\",\"amount\",\"category\",\"note\",\"time\"\n\
             \"00000000-0000-0000-0000-000000000001\",\"2024-01-01\",\"123.45\",\"Food\",\"chai\",\"2024-01-01T09:15:00.000Z\"\n"
        );
    }

    #[test]
    fn reparsing_recovers_tricky_notes() {
        let notes = [
            "said \"hello\"",
            "comma, separated",
            "two\nlines",
            "",
            "\"\"",
        ];
        let records: Vec<Expense> = notes
            .iter()
            .enumerate()
            .map(|(n, note)| expense(n as u128, note))
            .collect();
        let subset: Vec<&Expense> = records.iter().collect();

        let rows = parse(&export_tabular(&subset, Currency::Inr).unwrap().bytes);

        assert_eq!(rows[0], HEADER);
        assert_eq!(rows.len(), notes.len() + 1);
        for (row, record) in rows[1..].iter().zip(&records) {
            assert_eq!(row[0], record.id.to_string());
            assert_eq!(row[3], record.category);
            assert_eq!(row[4], record.note);
        }
    }

    #[test]
    fn empty_subset_is_header_only() {
        let rows = parse(&export_tabular(&[], Currency::Inr).unwrap().bytes);
        assert_eq!(rows, vec![HEADER.map(str::to_string).to_vec()]);
    }
}
