//! PDF renderer backed by `printpdf`.
//!
//! By default text is drawn with the built-in Helvetica faces, which only
//! cover the Windows-1252 repertoire. Text outside it would vanish from the
//! file, so rendering fails instead. Loading a TrueType font with
//! [`PdfRenderer::with_font`] lifts the restriction.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use super::{Document, DocumentRenderer};
use crate::{EngineError, ResultEngine};

const LAYER: &str = "Layer 1";

#[derive(Clone, Debug, Default)]
pub struct PdfRenderer {
    /// TrueType font bytes used for every text run.
    font: Option<Vec<u8>>,
}

impl PdfRenderer {
    /// Renderer using the built-in Helvetica faces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renderer embedding `font` (TTF bytes), for text beyond Windows-1252.
    #[must_use]
    pub fn with_font(font: Vec<u8>) -> Self {
        Self { font: Some(font) }
    }

    fn fonts(
        &self,
        pdf: &PdfDocumentReference,
    ) -> ResultEngine<(IndirectFontRef, IndirectFontRef)> {
        match &self.font {
            Some(font) => {
                let embedded = pdf.add_external_font(font.as_slice()).map_err(render_error)?;
                Ok((embedded.clone(), embedded))
            }
            None => {
                let regular = pdf
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(render_error)?;
                let bold = pdf
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(render_error)?;
                Ok((regular, bold))
            }
        }
    }
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn render_error(err: printpdf::Error) -> EngineError {
    EngineError::Render(err.to_string())
}

/// Whether the built-in fonts can draw `c` (Windows-1252, printable).
fn builtin_encodable(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{a0}'..='\u{ff}')
        || matches!(
            c,
            '€' | '‚'
                | 'ƒ'
                | '„'
                | '…'
                | '†'
                | '‡'
                | 'ˆ'
                | '‰'
                | 'Š'
                | '‹'
                | 'Œ'
                | 'Ž'
                | '‘'
                | '’'
                | '“'
                | '”'
                | '•'
                | '–'
                | '—'
                | '˜'
                | '™'
                | 'š'
                | '›'
                | 'œ'
                | 'ž'
                | 'Ÿ'
        )
}

/// Fails on the first text run the built-in fonts cannot draw.
fn check_builtin_coverage(document: &Document) -> ResultEngine<()> {
    let unsupported = document
        .pages
        .iter()
        .flat_map(|page| &page.texts)
        .find_map(|text| {
            text.content
                .chars()
                .find(|c| !builtin_encodable(*c))
                .map(|c| (c, &text.content))
        });
    match unsupported {
        Some((c, content)) => Err(EngineError::Render(format!(
            "character {c:?} in {content:?} needs an embedded font (set `pdf_font`)"
        ))),
        None => Ok(()),
    }
}

impl DocumentRenderer for PdfRenderer {
    fn render(&self, document: &Document) -> ResultEngine<Vec<u8>> {
        if self.font.is_none() {
            check_builtin_coverage(document)?;
        }

        let (width, height) = (mm(document.width), mm(document.height));
        let (pdf, first_page, first_layer) =
            PdfDocument::new(document.title.as_str(), width, height, LAYER);
        let (regular, bold) = self.fonts(&pdf)?;

        for (index, page) in document.pages.iter().enumerate() {
            let (page_index, layer_index) = if index == 0 {
                (first_page, first_layer)
            } else {
                pdf.add_page(width, height, LAYER)
            };
            let layer = pdf.get_page(page_index).get_layer(layer_index);
            for text in &page.texts {
                let font = if text.bold { &bold } else { &regular };
                // PDF space grows upwards from the bottom edge.
                layer.use_text(
                    text.content.as_str(),
                    text.size,
                    mm(text.x),
                    mm(document.height - text.y),
                    font,
                );
            }
        }

        pdf.save_to_bytes().map_err(render_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::{Currency, Expense, Money, export::layout_document};

    fn expense(category: &str, note: &str) -> Expense {
        Expense {
            id: Uuid::from_u128(1),
            amount: Money::new(100),
            category: category.to_string(),
            note: note.to_string(),
            date: "2024-01-01".parse().unwrap(),
            time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        }
    }

    fn document(record: &Expense) -> Document {
        let generated_at =
            NaiveDateTime::parse_from_str("2024-01-05 18:30", "%Y-%m-%d %H:%M").unwrap();
        layout_document(&[record], Currency::Inr, generated_at)
    }

    #[test]
    fn latin_text_renders_with_builtin_fonts() {
        let bytes = PdfRenderer::new()
            .render(&document(&expense("Café", "crème brûlée — 2×")))
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn text_outside_builtin_fonts_is_an_error() {
        let err = PdfRenderer::new()
            .render(&document(&expense("खाना", "चाय")))
            .unwrap_err();
        assert!(
            matches!(&err, EngineError::Render(message) if message.contains("खाना")),
            "{err:?}"
        );
    }

    #[test]
    fn builtin_coverage_is_windows_1252() {
        for c in ['a', '~', 'é', 'ÿ', '€', '—', '•', '™'] {
            assert!(builtin_encodable(c), "{c:?}");
        }
        for c in ['₹', 'च', '\n', '\u{7f}', 'Ā', '😀'] {
            assert!(!builtin_encodable(c), "{c:?}");
        }
    }
}
