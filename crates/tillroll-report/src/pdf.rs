//! PDF report assembly.
//!
//! The report is built from plain PDF primitives: two Type1 fonts, raw RGB
//! image XObjects for the charts and the optional logo, and a y-cursor layout
//! that breaks to a new page when a block does not fit. All content-stream
//! operands are integers; positions are whole points on an A4 page.

use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use time::macros::format_description;

use tillroll_core::ReportData;

use crate::chart;
use crate::error::RenderError;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const LINE_GAP: i64 = 6;

const PIE_SIZE: i64 = 220;
const BAR_WIDTH: i64 = 420;
const BAR_HEIGHT: i64 = 180;
const LOGO_SIZE: i64 = 72;

/// Fixed text blocks on the report's first page.
#[derive(Debug, Clone)]
pub struct ReportLabels {
    pub title: String,
    pub date_range: String,
    pub department: String,
    pub office: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            title: "Event Sales Report".to_string(),
            date_range: "01/05/2023 - 01/05/2024".to_string(),
            department: "Dept: Sales".to_string(),
            office: "0 Head Office".to_string(),
        }
    }
}

/// Assemble the full report as PDF bytes.
///
/// # Errors
/// Returns an error if the logo cannot be decoded or the document cannot be
/// serialized.
pub fn render_pdf(
    report: &ReportData,
    labels: &ReportLabels,
    logo: Option<&Path>,
) -> Result<Vec<u8>, RenderError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });

    let pie_series = report.pie_series();
    let pie_weights: Vec<f64> = pie_series.iter().map(|(_, weight)| *weight).collect();
    let daily: Vec<f64> = report.daily_revenue.values().copied().collect();

    let mut xobjects = Dictionary::new();
    if let Some(path) = logo {
        let decoded = image::open(path)
            .map_err(|error| RenderError::Logo(error.to_string()))?
            .to_rgb8();
        xobjects.set("Logo", add_image(&mut doc, &decoded));
    }
    let pie = chart::pie_chart(&pie_weights, 440);
    xobjects.set("Pie", add_image(&mut doc, &pie));
    let bar = chart::bar_chart(&daily, 840, 360);
    xobjects.set("Bar", add_image(&mut doc, &bar));

    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular,
            "F2" => bold,
        },
        "XObject" => Object::Dictionary(xobjects),
    });

    let mut layout = Layout::new();
    front_matter(&mut layout, labels, report, logo.is_some());
    product_section(&mut layout, &pie_series);
    daily_section(&mut layout, report);
    table_section(&mut layout, report);
    footer(&mut layout);

    let mut kids = Vec::new();
    for operations in layout.finish() {
        let encoded = Content { operations }
            .encode()
            .map_err(|error| RenderError::Pdf(error.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    let count = i64::try_from(kids.len()).unwrap_or(0);
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|error| RenderError::Pdf(error.to_string()))?;
    Ok(buffer)
}

fn front_matter(layout: &mut Layout, labels: &ReportLabels, report: &ReportData, has_logo: bool) {
    if has_logo {
        layout.image("Logo", MARGIN, LOGO_SIZE, LOGO_SIZE);
        layout.advance(LINE_GAP);
    } else {
        layout.text(Font::Regular, 10, MARGIN, "No Logo");
    }
    layout.text(Font::Bold, 20, MARGIN, &labels.title);
    layout.text(Font::Regular, 12, MARGIN, &labels.date_range);
    layout.text(Font::Regular, 12, MARGIN, &labels.department);
    layout.text(Font::Regular, 12, MARGIN, &labels.office);
    layout.advance(12);
    layout.text(
        Font::Bold,
        14,
        MARGIN,
        &format!("Total revenue: {:.2}", report.grand_total),
    );
    layout.advance(12);
}

fn product_section(layout: &mut Layout, pie_series: &[(String, f64)]) {
    let legend_height = i64::try_from(pie_series.len()).unwrap_or(0) * 16;
    layout.ensure(20 + PIE_SIZE + legend_height + 24);
    layout.text(Font::Bold, 14, MARGIN, "Sales volume by product");
    layout.advance(LINE_GAP);
    layout.image("Pie", MARGIN, PIE_SIZE, PIE_SIZE);
    layout.advance(LINE_GAP);

    // Legend order matches slice order, clockwise from the top.
    for (index, (name, weight)) in pie_series.iter().enumerate() {
        layout.swatch(chart::series_color(index), MARGIN);
        layout.text(
            Font::Regular,
            10,
            MARGIN + 16,
            &format!("{name}: {weight:.2}"),
        );
    }
    layout.advance(12);
}

fn daily_section(layout: &mut Layout, report: &ReportData) {
    layout.ensure(20 + BAR_HEIGHT + 24);
    layout.text(Font::Bold, 14, MARGIN, "Revenue by day");
    layout.advance(LINE_GAP);
    layout.image("Bar", MARGIN, BAR_WIDTH, BAR_HEIGHT);
    layout.advance(LINE_GAP);

    let day_format = format_description!("[day]/[month]/[year]");
    for (date, revenue) in &report.daily_revenue {
        let label = date
            .format(day_format)
            .unwrap_or_else(|_| date.to_string());
        layout.text(Font::Regular, 10, MARGIN, &format!("{label}: {revenue:.2}"));
    }
    layout.advance(12);
}

fn table_section(layout: &mut Layout, report: &ReportData) {
    layout.ensure(60);
    layout.text(Font::Bold, 14, MARGIN, "Recorded sales");
    layout.advance(LINE_GAP);
    table_header(layout);

    let day_format = format_description!("[day]/[month]/[year]");
    for row in &report.rows {
        layout.ensure(16);
        if layout.at_top() {
            table_header(layout);
        }

        let date = row
            .date
            .format(day_format)
            .unwrap_or_else(|_| row.date.to_string());
        layout.columns(
            Font::Regular,
            9,
            &[
                (MARGIN, clip(&row.event_name, 24)),
                (190, date),
                (260, clip(&row.products.join(", "), 30)),
                (420, format!("{:.2}", row.volume)),
                (475, format!("{:.2}", row.price)),
                (525, format!("{:.2}", row.revenue())),
            ],
        );
    }

    layout.ensure(40);
    layout.advance(4);
    layout.columns(
        Font::Bold,
        10,
        &[
            (MARGIN, "Grand Total".to_string()),
            (525, format!("{:.2}", report.grand_total)),
        ],
    );
}

fn table_header(layout: &mut Layout) {
    layout.columns(
        Font::Bold,
        9,
        &[
            (MARGIN, "Event Name".to_string()),
            (190, "Date".to_string()),
            (260, "Prod Name".to_string()),
            (420, "Sales Vol".to_string()),
            (475, "Price/Unit".to_string()),
            (525, "Revenue".to_string()),
        ],
    );
}

fn footer(layout: &mut Layout) {
    layout.ensure(30);
    layout.advance(8);
    layout.rule();
    let stamp_format = format_description!("[day]/[month]/[year] [hour]:[minute]:[second]");
    let stamp = time::OffsetDateTime::now_utc()
        .format(stamp_format)
        .unwrap_or_default();
    layout.text(
        Font::Regular,
        9,
        MARGIN,
        &format!("Receipt Generated: {stamp}"),
    );
}

fn clip(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

/// Register raw RGB pixels as an image XObject.
fn add_image(doc: &mut Document, pixels: &RgbImage) -> Object {
    let (width, height) = pixels.dimensions();
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        pixels.clone().into_raw(),
    );
    Object::Reference(doc.add_object(stream))
}

#[derive(Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn name(self) -> &'static [u8] {
        match self {
            Font::Regular => b"F1",
            Font::Bold => b"F2",
        }
    }
}

/// A y-cursor over a growing list of pages.
struct Layout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    y: i64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn finish(mut self) -> Vec<Vec<Operation>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }
        self.pages
    }

    fn break_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.y = PAGE_HEIGHT - MARGIN;
    }

    /// Break to a fresh page unless `needed` points still fit.
    fn ensure(&mut self, needed: i64) {
        if self.y - needed < MARGIN {
            self.break_page();
        }
    }

    fn at_top(&self) -> bool {
        self.y == PAGE_HEIGHT - MARGIN
    }

    fn advance(&mut self, points: i64) {
        self.y -= points;
    }

    /// Typeset one line at `x`, advancing the cursor below it.
    fn text(&mut self, font: Font, size: i64, x: i64, text: &str) {
        self.ensure(size + LINE_GAP);
        self.y -= size;
        self.draw_text(font, size, x, self.y, text);
        self.y -= LINE_GAP;
    }

    /// Typeset several cells on one shared baseline.
    fn columns(&mut self, font: Font, size: i64, cells: &[(i64, String)]) {
        self.ensure(size + LINE_GAP);
        self.y -= size;
        for (x, cell) in cells {
            self.draw_text(font, size, *x, self.y, cell);
        }
        self.y -= LINE_GAP;
    }

    fn draw_text(&mut self, font: Font, size: i64, x: i64, y: i64, text: &str) {
        self.current.push(Operation::new("BT", vec![]));
        self.current.push(Operation::new(
            "Tf",
            vec![Object::Name(font.name().to_vec()), size.into()],
        ));
        self.current
            .push(Operation::new("Td", vec![x.into(), y.into()]));
        self.current
            .push(Operation::new("Tj", vec![Object::string_literal(text)]));
        self.current.push(Operation::new("ET", vec![]));
    }

    /// Place a named image XObject with its top edge at the cursor.
    fn image(&mut self, name: &str, x: i64, width: i64, height: i64) {
        self.ensure(height + LINE_GAP);
        self.y -= height;
        self.current.push(Operation::new("q", vec![]));
        self.current.push(Operation::new(
            "cm",
            vec![
                width.into(),
                0.into(),
                0.into(),
                height.into(),
                x.into(),
                self.y.into(),
            ],
        ));
        self.current.push(Operation::new(
            "Do",
            vec![Object::Name(name.as_bytes().to_vec())],
        ));
        self.current.push(Operation::new("Q", vec![]));
    }

    /// Full-width horizontal rule at the cursor.
    fn rule(&mut self) {
        self.y -= 2;
        self.current.push(Operation::new(
            "m",
            vec![MARGIN.into(), self.y.into()],
        ));
        self.current.push(Operation::new(
            "l",
            vec![(PAGE_WIDTH - MARGIN).into(), self.y.into()],
        ));
        self.current.push(Operation::new("S", vec![]));
        self.y -= LINE_GAP;
    }

    /// Filled legend square on the next line's baseline, without moving the
    /// cursor. Palette channels are 0 or 255, so color operands stay integral.
    fn swatch(&mut self, color: [u8; 3], x: i64) {
        let components: Vec<Object> = color
            .iter()
            .map(|channel| i64::from(channel / 255).into())
            .collect();
        self.current.push(Operation::new("q", vec![]));
        self.current.push(Operation::new("rg", components));
        self.current.push(Operation::new(
            "re",
            vec![x.into(), (self.y - 10).into(), 8.into(), 8.into()],
        ));
        self.current.push(Operation::new("f", vec![]));
        self.current.push(Operation::new("Q", vec![]));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use time::macros::date;
    use tillroll_core::RowView;

    fn sample_report(rows: usize) -> ReportData {
        let mut report = ReportData {
            rows: Vec::new(),
            product_volume: BTreeMap::from([
                ("Amstel".to_string(), 80.0),
                ("Fosters".to_string(), 120.0),
            ]),
            daily_revenue: BTreeMap::from([
                (date!(2024 - 03 - 01), 240.0),
                (date!(2024 - 03 - 02), 160.0),
            ]),
            grand_total: 400.0,
        };
        for index in 0..rows {
            report.rows.push(RowView {
                event_name: format!("Event {index}"),
                date: date!(2024 - 03 - 01),
                products: vec!["Fosters".to_string()],
                volume: 120.0,
                price: 2.0,
            });
        }
        report
    }

    #[test]
    fn rendered_report_is_a_pdf_document() {
        let bytes = render_pdf(&sample_report(3), &ReportLabels::default(), None)
            .expect("render");
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn long_tables_paginate() {
        let few = render_pdf(&sample_report(2), &ReportLabels::default(), None)
            .expect("render small");
        let many = render_pdf(&sample_report(200), &ReportLabels::default(), None)
            .expect("render large");

        let pages = |bytes: &[u8]| {
            Document::load_mem(bytes)
                .expect("parse rendered output")
                .get_pages()
                .len()
        };
        assert!(pages(&many) > pages(&few));
    }

    #[test]
    fn missing_logo_file_is_reported() {
        let error = render_pdf(
            &sample_report(1),
            &ReportLabels::default(),
            Some(Path::new("/nonexistent/logo.png")),
        )
        .expect_err("must fail");
        assert!(matches!(error, RenderError::Logo(_)));
    }

    #[test]
    fn clip_marks_truncation() {
        assert_eq!(clip("short", 10), "short");
        assert_eq!(clip("a very long product list", 10), "a very lo~");
    }
}
