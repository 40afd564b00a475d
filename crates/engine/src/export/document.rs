//! Paginated document export.
//!
//! The exporter lays the table out itself (A4 portrait, in points, origin at
//! the top-left corner) and hands positioned text to a [`DocumentRenderer`],
//! which only has to draw it. The renderer is optional: when none is
//! available the export fails with [`EngineError::RendererUnavailable`].

use std::ops::Range;

use chrono::NaiveDateTime;

use super::Artifact;
use crate::{Currency, EngineError, Expense, Money, ResultEngine};

pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;
pub const PRODUCT_LABEL: &str = "Mera Expense";

const TITLE: &str = "Mera Expense — Export";
const FILE_NAME: &str = "expenses.pdf";
const CONTENT_TYPE: &str = "application/pdf";

const MARGIN: f32 = 40.0;
const TITLE_Y: f32 = 40.0;
const TITLE_SIZE: f32 = 16.0;
const GENERATED_Y: f32 = 58.0;
const TABLE_TOP: f32 = 80.0;
const FONT_SIZE: f32 = 10.0;
const FOOTER_SIZE: f32 = 9.0;
const CELL_PADDING: f32 = 6.0;
const LINE_HEIGHT: f32 = FONT_SIZE * 1.15;
const FOOTER_Y: f32 = PAGE_HEIGHT - 20.0;
const TOTAL_X: f32 = PAGE_WIDTH - 160.0;
const DATE_WIDTH: f32 = 80.0;
const CATEGORY_WIDTH: f32 = 110.0;
const AMOUNT_WIDTH: f32 = 95.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A run of text. `y` is the baseline, measured from the top of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Text {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub content: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub texts: Vec<Text>,
    /// Number of expense rows starting on this page. A row split across
    /// pages counts on the page where it starts.
    pub rows: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub pages: Vec<Page>,
}

/// Turns a laid-out [`Document`] into file bytes.
pub trait DocumentRenderer {
    fn render(&self, document: &Document) -> ResultEngine<Vec<u8>>;
}

struct Column {
    title: String,
    x: f32,
    width: f32,
    align: Align,
}

impl Column {
    fn max_chars(&self) -> usize {
        let usable = self.width - 2.0 * CELL_PADDING;
        ((usable / (FONT_SIZE * 0.5)).floor() as usize).max(1)
    }

    fn text_x(&self, content: &str, size: f32) -> f32 {
        match self.align {
            Align::Left => self.x + CELL_PADDING,
            Align::Right => self.x + self.width - CELL_PADDING - text_width(content, size),
        }
    }
}

fn columns(currency: Currency) -> [Column; 4] {
    let note_width = PAGE_WIDTH - 2.0 * MARGIN - DATE_WIDTH - CATEGORY_WIDTH - AMOUNT_WIDTH;
    let mut x = MARGIN;
    let mut next = |title: String, width: f32, align: Align| {
        let column = Column {
            title,
            x,
            width,
            align,
        };
        x += width;
        column
    };
    [
        next("Date".to_string(), DATE_WIDTH, Align::Left),
        next("Category".to_string(), CATEGORY_WIDTH, Align::Left),
        next(format!("Amount ({})", currency.code()), AMOUNT_WIDTH, Align::Right),
        next("Note".to_string(), note_width, Align::Left),
    ]
}

/// Approximate Helvetica advance width.
fn text_width(content: &str, size: f32) -> f32 {
    content
        .chars()
        .map(|c| match c {
            '0'..='9' => 0.556,
            '.' | ',' | ' ' => 0.278,
            _ => 0.5,
        })
        .sum::<f32>()
        * size
}

/// Splits `content` into lines of at most `max` characters, on whitespace when
/// possible.
fn wrap(content: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in content.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..max).collect());
            }
            let word: String = word.into_iter().collect();
            if line.is_empty() {
                line = word;
            } else if line.chars().count() + 1 + word.chars().count() <= max {
                line.push(' ');
                line.push_str(&word);
            } else {
                lines.push(std::mem::replace(&mut line, word));
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn row_height(lines: usize) -> f32 {
    lines as f32 * LINE_HEIGHT + 2.0 * CELL_PADDING
}

fn line_count(cells: &[Vec<String>]) -> usize {
    cells.iter().map(Vec::len).max().unwrap_or(1)
}

struct PageBuilder {
    page: Page,
    cursor: f32,
    /// Some body line has been placed on this page.
    has_body: bool,
}

impl PageBuilder {
    fn new(top: f32, columns: &[Column]) -> Self {
        let mut builder = Self {
            page: Page::default(),
            cursor: top,
            has_body: false,
        };
        let cells: Vec<Vec<String>> = columns.iter().map(|c| vec![c.title.clone()]).collect();
        builder.place_lines(columns, &cells, 0..1, true);
        builder
    }

    /// How many text lines of one row still fit above the bottom margin.
    fn line_capacity(&self) -> usize {
        let free = PAGE_HEIGHT - MARGIN - self.cursor - 2.0 * CELL_PADDING;
        if free < LINE_HEIGHT {
            return 0;
        }
        (free / LINE_HEIGHT).floor() as usize
    }

    /// Places lines `range` of every cell as one table row.
    fn place_lines(
        &mut self,
        columns: &[Column],
        cells: &[Vec<String>],
        range: Range<usize>,
        bold: bool,
    ) {
        for (column, cell) in columns.iter().zip(cells) {
            for (offset, line) in cell
                .iter()
                .skip(range.start)
                .take(range.len())
                .enumerate()
            {
                if line.is_empty() {
                    continue;
                }
                self.page.texts.push(Text {
                    x: column.text_x(line, FONT_SIZE),
                    y: self.cursor + CELL_PADDING + FONT_SIZE + offset as f32 * LINE_HEIGHT,
                    size: FONT_SIZE,
                    bold,
                    content: line.clone(),
                });
            }
        }
        self.cursor += row_height(range.len());
    }

    fn finish(mut self, total: &str) -> Page {
        self.page.texts.push(Text {
            x: TOTAL_X,
            y: FOOTER_Y,
            size: FOOTER_SIZE,
            bold: false,
            content: total.to_string(),
        });
        self.page.texts.push(Text {
            x: MARGIN,
            y: FOOTER_Y,
            size: FOOTER_SIZE,
            bold: false,
            content: PRODUCT_LABEL.to_string(),
        });
        self.page
    }
}

/// Lays out the export: title block on the first page, a table whose header
/// repeats on every page, and a footer with the grand total on every page.
#[must_use]
pub fn layout_document(
    subset: &[&Expense],
    currency: Currency,
    generated_at: NaiveDateTime,
) -> Document {
    let columns = columns(currency);
    let total: Money = subset.iter().map(|expense| expense.amount).sum();
    let total = format!("Total: {} {}", currency.code(), total.format_plain(currency));

    let mut pages = Vec::new();
    let mut builder = PageBuilder::new(TABLE_TOP, &columns);
    builder.page.texts.push(Text {
        x: MARGIN,
        y: TITLE_Y,
        size: TITLE_SIZE,
        bold: true,
        content: TITLE.to_string(),
    });
    builder.page.texts.push(Text {
        x: MARGIN,
        y: GENERATED_Y,
        size: FONT_SIZE,
        bold: false,
        content: format!("Generated: {}", generated_at.format("%d/%m/%Y, %H:%M:%S")),
    });

    let fresh_capacity = PageBuilder::new(MARGIN, &columns).line_capacity();
    for expense in subset {
        let values = [
            expense.date.format("%Y-%m-%d").to_string(),
            expense.category.clone(),
            expense.amount.format_plain(currency),
            expense.note.clone(),
        ];
        let cells: Vec<Vec<String>> = columns
            .iter()
            .zip(&values)
            .map(|(column, value)| wrap(value, column.max_chars()))
            .collect();
        let lines = line_count(&cells);

        // A row that fits on a fresh page is moved there whole; a taller one
        // is split, continuing below the repeated header.
        let mut start = 0;
        while start < lines {
            let remaining = lines - start;
            let room = builder.line_capacity();
            let move_whole = start == 0 && remaining <= fresh_capacity;
            if builder.has_body && room < remaining && (room == 0 || move_whole) {
                pages.push(builder.finish(&total));
                builder = PageBuilder::new(MARGIN, &columns);
                continue;
            }
            let end = start + remaining.min(room.max(1));
            builder.place_lines(&columns, &cells, start..end, false);
            if start == 0 {
                builder.page.rows += 1;
            }
            builder.has_body = true;
            start = end;
        }
    }
    pages.push(builder.finish(&total));

    Document {
        title: TITLE.to_string(),
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        pages,
    }
}

/// Renders `subset` as a paginated document.
///
/// Fails before producing anything when the subset is empty or when no
/// renderer is available.
pub fn export_document(
    subset: &[&Expense],
    currency: Currency,
    generated_at: NaiveDateTime,
    renderer: Option<&dyn DocumentRenderer>,
) -> ResultEngine<Artifact> {
    if subset.is_empty() {
        return Err(EngineError::NothingToExport);
    }
    let renderer = renderer.ok_or(EngineError::RendererUnavailable)?;

    let document = layout_document(subset, currency, generated_at);
    let bytes = renderer.render(&document)?;
    tracing::debug!(
        "exported {} rows on {} pages to {FILE_NAME}",
        subset.len(),
        document.pages.len()
    );

    Ok(Artifact {
        file_name: FILE_NAME,
        content_type: CONTENT_TYPE,
        bytes,
    })
}
