//! Flashcard PDF export.
//!
//! Layout and rendering are separate: `layout_document` decides what goes on
//! which page in millimetres measured from the top-left corner, and
//! `render_pdf` draws that with printpdf's built-in Helvetica fonts.

use crate::error::{QuizError, Result};
use crate::models::Question;
use crate::utils::wrap_words;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rgb,
};
use std::fs;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthChar;

pub const PDF_FILE_NAME: &str = "flashcards.pdf";
pub const TITLE: &str = "Generated Flashcards";

/// A4 portrait.
pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 15.0;
pub const MAX_LINE_WIDTH_MM: f32 = PAGE_WIDTH_MM - MARGIN_MM * 2.0;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;
const FOOTNOTE_SIZE: f32 = 10.0;

const HEADING_LINE_MM: f32 = 5.0;
const BODY_LINE_MM: f32 = 5.0;
const FOOTNOTE_LINE_MM: f32 = 4.0;

const PT_TO_MM: f32 = 25.4 / 72.0;
/// Average Helvetica advance as a fraction of the font size.
const AVG_GLYPH_RATIO: f32 = 0.5;

const BLACK: (u8, u8, u8) = (0, 0, 0);
const GREY: (u8, u8, u8) = (128, 128, 128);
const SEPARATOR: (u8, u8, u8) = (220, 220, 220);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        lines: Vec<String>,
        /// Left edge, or the centre line for `Align::Center`.
        x: f32,
        /// Baseline of the first line, from the top of the page.
        y: f32,
        line_height: f32,
        size: f32,
        style: FontStyle,
        color: (u8, u8, u8),
        align: Align,
    },
    Separator {
        y: f32,
        x1: f32,
        x2: f32,
        color: (u8, u8, u8),
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub ops: Vec<DrawOp>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn separator_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.ops)
            .filter(|op| matches!(op, DrawOp::Separator { .. }))
            .count()
    }
}

fn char_width_mm(ch: char, size: f32) -> f32 {
    ch.width().unwrap_or(0) as f32 * size * PT_TO_MM * AVG_GLYPH_RATIO
}

pub fn text_width_mm(text: &str, size: f32) -> f32 {
    text.chars().map(|c| char_width_mm(c, size)).sum()
}

pub fn split_text_to_size(text: &str, size: f32) -> Vec<String> {
    wrap_words(text, MAX_LINE_WIDTH_MM, |c| char_width_mm(c, size))
}

pub fn layout_document(questions: &[Question]) -> DocumentLayout {
    let mut pages = Vec::new();
    let mut page = PageLayout::default();
    let mut y = MARGIN_MM;

    page.ops.push(DrawOp::Text {
        lines: vec![TITLE.to_string()],
        x: PAGE_WIDTH_MM / 2.0,
        y,
        line_height: 0.0,
        size: TITLE_SIZE,
        style: FontStyle::Bold,
        color: BLACK,
        align: Align::Center,
    });
    y += 15.0;

    for (index, card) in questions.iter().enumerate() {
        let heading = split_text_to_size(&format!("Q{}: {}", index + 1, card.question), HEADING_SIZE);
        let body = split_text_to_size(&format!("Answer: {}", card.answer), BODY_SIZE);
        let footnote = split_text_to_size(card.explanation_text(), FOOTNOTE_SIZE);

        let heading_height = heading.len() as f32 * HEADING_LINE_MM;
        let body_height = body.len() as f32 * BODY_LINE_MM;
        let footnote_height = footnote.len() as f32 * FOOTNOTE_LINE_MM;
        let block_height = heading_height + body_height + footnote_height + 15.0;

        if y + block_height > PAGE_HEIGHT_MM - MARGIN_MM {
            pages.push(std::mem::take(&mut page));
            y = MARGIN_MM;
        }

        page.ops.push(DrawOp::Text {
            lines: heading,
            x: MARGIN_MM,
            y,
            line_height: HEADING_LINE_MM,
            size: HEADING_SIZE,
            style: FontStyle::Bold,
            color: BLACK,
            align: Align::Left,
        });
        y += heading_height + 2.0;

        page.ops.push(DrawOp::Text {
            lines: body,
            x: MARGIN_MM,
            y,
            line_height: BODY_LINE_MM,
            size: BODY_SIZE,
            style: FontStyle::Normal,
            color: BLACK,
            align: Align::Left,
        });
        y += body_height + 2.0;

        page.ops.push(DrawOp::Text {
            lines: footnote,
            x: MARGIN_MM,
            y,
            line_height: FOOTNOTE_LINE_MM,
            size: FOOTNOTE_SIZE,
            style: FontStyle::Italic,
            color: GREY,
            align: Align::Left,
        });
        y += footnote_height + 10.0;

        if index + 1 < questions.len() {
            page.ops.push(DrawOp::Separator {
                y,
                x1: MARGIN_MM,
                x2: PAGE_WIDTH_MM - MARGIN_MM,
                color: SEPARATOR,
            });
            y += 10.0;
        }
    }

    pages.push(page);
    DocumentLayout { pages }
}

struct Fonts {
    normal: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Normal => &self.normal,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn pdf_error(e: printpdf::Error) -> QuizError {
    QuizError::Export(e.to_string())
}

fn draw_op(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::Text {
            lines,
            x,
            y,
            line_height,
            size,
            style,
            color,
            align,
        } => {
            layer.set_fill_color(rgb(*color));
            for (i, line) in lines.iter().enumerate() {
                let left = match align {
                    Align::Left => *x,
                    Align::Center => x - text_width_mm(line, *size) / 2.0,
                };
                let baseline = y + i as f32 * line_height;
                layer.use_text(
                    line.as_str(),
                    *size,
                    Mm(left),
                    Mm(PAGE_HEIGHT_MM - baseline),
                    fonts.get(*style),
                );
            }
        }
        DrawOp::Separator { y, x1, x2, color } => {
            layer.set_outline_color(rgb(*color));
            layer.set_outline_thickness(0.5);
            let pdf_y = Mm(PAGE_HEIGHT_MM - y);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), pdf_y), false),
                    (Point::new(Mm(*x2), pdf_y), false),
                ],
                is_closed: false,
            });
        }
    }
}

pub fn render_pdf(layout: &DocumentLayout) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        TITLE,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let fonts = Fonts {
        normal: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?,
    };

    for (index, page) in layout.pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) =
                doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            doc.get_page(page_index).get_layer(layer_index)
        };
        for op in &page.ops {
            draw_op(&layer, &fonts, op);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

pub fn write_pdf(dir: &Path, questions: &[Question]) -> Result<PathBuf> {
    let layout = layout_document(questions);
    let bytes = render_pdf(&layout)?;

    fs::create_dir_all(dir)?;
    let path = dir.join(PDF_FILE_NAME);
    fs::write(&path, bytes)?;
    log::info!(
        "Wrote {} flashcards on {} page(s) to {}",
        questions.len(),
        layout.pages.len(),
        path.display()
    );
    Ok(path)
}
