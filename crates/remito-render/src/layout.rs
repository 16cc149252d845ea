//! # Page Layout
//!
//! Computes every text run, stroke and fill of a receipt document without
//! touching any PDF machinery. The painter in [`crate::pdf`] only replays
//! what this module decides, so the layout is what tests assert on.
//!
//! ## Page Anatomy
//! ```text
//! ┌───────────────────────────────────────────────┐ ← border, inset 20pt
//! │                                               │
//! │            FERRETERIA SAN MIGUEL              │ 22pt bold, centered
//! │              Receipt No. 0001                 │ 14pt bold, centered
//! │  Date: 14/03/2026                             │ 10pt
//! │                                               │
//! │    ┌────────┬──────────────┬────────┬──────┐  │
//! │    │Quantity│   Product    │  Unit  │ Sub  │  │ header: beige, bold
//! │    ├────────┼──────────────┼────────┼──────┤  │
//! │    │   2    │ Hammer       │ $500.00│$1,000│  │ qty centered,
//! │    │   1    │ Nail box     │ $150.00│ $150 │  │ prices right
//! │    └────────┴──────────────┴────────┴──────┘  │
//! │                           Total: $1,150.00    │ 14pt bold, right
//! │                                               │
//! │         Thank you for your purchase!          │ 10pt gray, centered
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Coordinates are PDF points with the origin at the bottom-left corner.
//! Rows that do not fit continue on a new page under a repeated header row.

use remito_core::{FinalizedReceipt, LineItem};

use crate::metrics::{fit_size, fit_text, text_width, Face};
use crate::renderer::RenderSettings;

// =============================================================================
// Geometry
// =============================================================================

/// A4 portrait width in points.
pub const PAGE_WIDTH: f32 = 595.28;

/// A4 portrait height in points.
pub const PAGE_HEIGHT: f32 = 841.89;

/// Distance from the page edge to any content.
pub const MARGIN: f32 = 40.0;

/// Distance from the page edge to the decorative border.
pub const BORDER_INSET: f32 = 20.0;

pub const BORDER_WIDTH: f32 = 2.0;
pub const GRID_WIDTH: f32 = 1.0;
pub const OUTER_BOX_WIDTH: f32 = 1.5;

/// Table column widths in millimetres: Quantity, Product, Unit Price, Subtotal.
pub const COLUMN_WIDTHS_MM: [f32; 4] = [25.0, 85.0, 32.0, 32.0];

pub const HEADER_LABELS: [&str; 4] = ["Quantity", "Product", "Unit Price", "Subtotal"];

const POINTS_PER_MM: f32 = 72.0 / 25.4;
const ROW_HEIGHT: f32 = 20.0;
const CELL_PADDING: f32 = 4.0;
// Helvetica cap height, in em
const CAP_HEIGHT: f32 = 0.718;

const TITLE_SIZE: f32 = 22.0;
const NUMBER_SIZE: f32 = 14.0;
const DATE_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 10.0;
const TOTAL_SIZE: f32 = 14.0;
const FOOTER_SIZE: f32 = 10.0;

const GAP_AFTER_TABLE: f32 = 20.0;
const GAP_BEFORE_FOOTER: f32 = 24.0;

// =============================================================================
// Layout Model
// =============================================================================

/// RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BRAND: Color = Color::new(0.72, 0.22, 0.16);
    pub const HEADER_FILL: Color = Color::new(0.93, 0.86, 0.82);
    pub const TEXT: Color = Color::new(0.0, 0.0, 0.0);
    pub const MUTED: Color = Color::new(0.4, 0.4, 0.4);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single line of text.
///
/// `x` is the left edge after alignment; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub face: Face,
    pub color: Color,
    pub align: Align,
}

impl TextRun {
    pub fn width(&self) -> f32 {
        text_width(&self.text, self.face, self.size)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width()
    }
}

/// Something drawn on a page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextRun),

    /// Polyline, optionally closed.
    Stroke {
        points: Vec<(f32, f32)>,
        closed: bool,
        width: f32,
        color: Color,
    },

    /// Filled rectangle; `(x, y)` is the bottom-left corner.
    Fill {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub elements: Vec<Element>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.elements.iter().filter_map(|element| match element {
            Element::Text(run) => Some(run),
            _ => None,
        })
    }

    fn text(&mut self, run: TextRun) {
        self.elements.push(Element::Text(run));
    }

    fn rect_outline(&mut self, left: f32, bottom: f32, right: f32, top: f32, width: f32, color: Color) {
        self.elements.push(Element::Stroke {
            points: vec![(left, bottom), (right, bottom), (right, top), (left, top)],
            closed: true,
            width,
            color,
        });
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), width: f32, color: Color) {
        self.elements.push(Element::Stroke {
            points: vec![from, to],
            closed: false,
            width,
            color,
        });
    }
}

/// The full document: one entry per page.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn texts(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::texts)
    }

    /// First text run whose content equals `text`.
    pub fn find_text(&self, text: &str) -> Option<&TextRun> {
        self.texts().find(|run| run.text == text)
    }
}

// =============================================================================
// Table Geometry
// =============================================================================

/// Horizontal extent of each table column.
#[derive(Debug, Clone, Copy)]
struct Columns {
    edges: [f32; 5],
}

impl Columns {
    const ALIGN: [Align; 4] = [Align::Center, Align::Left, Align::Right, Align::Right];
    const PRODUCT: usize = 1;

    /// Columns centered within the content area.
    fn centered() -> Self {
        let widths = COLUMN_WIDTHS_MM.map(|mm| mm * POINTS_PER_MM);
        let table_width: f32 = widths.iter().sum();
        let left = MARGIN + (PAGE_WIDTH - 2.0 * MARGIN - table_width) / 2.0;

        let mut edges = [left; 5];
        for (i, width) in widths.iter().enumerate() {
            edges[i + 1] = edges[i] + width;
        }
        Columns { edges }
    }

    fn left(&self) -> f32 {
        self.edges[0]
    }

    fn right(&self) -> f32 {
        self.edges[4]
    }

    fn cell(&self, column: usize) -> (f32, f32) {
        (
            self.edges[column] + CELL_PADDING,
            self.edges[column + 1] - CELL_PADDING,
        )
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Lays out a receipt.
///
/// Values are taken from `receipt` as given: nothing is recomputed.
pub fn build(receipt: &FinalizedReceipt, settings: &RenderSettings) -> DocumentLayout {
    let mut builder = Builder::new();
    let columns = Columns::centered();
    let content = (MARGIN, PAGE_WIDTH - MARGIN);

    // Title block
    builder.advance(TITLE_SIZE);
    builder.place(
        &settings.business_name,
        content,
        Align::Center,
        TITLE_SIZE,
        Face::Bold,
        Color::BRAND,
    );
    builder.advance(10.0 + NUMBER_SIZE);
    builder.place(
        &format!("Receipt No. {}", receipt.number),
        content,
        Align::Center,
        NUMBER_SIZE,
        Face::Bold,
        Color::BRAND,
    );
    builder.advance(8.0 + DATE_SIZE);
    builder.place(
        &format!("Date: {}", receipt.issued_on.format("%d/%m/%Y")),
        content,
        Align::Left,
        DATE_SIZE,
        Face::Regular,
        Color::TEXT,
    );
    builder.advance(18.0);

    // Table, split across pages
    let rows: Vec<[String; 4]> = receipt
        .items
        .iter()
        .map(|item| body_row(item, settings))
        .collect();
    let mut remaining = rows.as_slice();

    loop {
        if builder.rows_available() < 2 {
            builder.new_page();
        }
        let take = (builder.rows_available() - 1).min(remaining.len());
        builder.table(&columns, &remaining[..take]);
        remaining = &remaining[take..];

        if remaining.is_empty() {
            break;
        }
        builder.new_page();
    }

    // Total and footer stay together
    let closing_height = GAP_AFTER_TABLE + TOTAL_SIZE + GAP_BEFORE_FOOTER + FOOTER_SIZE;
    if builder.y - closing_height < MARGIN {
        builder.new_page();
    }

    builder.advance(GAP_AFTER_TABLE + TOTAL_SIZE);
    builder.place(
        &format!("Total: {}", settings.currency.format(receipt.total)),
        (columns.left(), columns.right()),
        Align::Right,
        TOTAL_SIZE,
        Face::Bold,
        Color::BRAND,
    );
    builder.advance(GAP_BEFORE_FOOTER + FOOTER_SIZE);
    builder.place(
        &settings.footer_message,
        content,
        Align::Center,
        FOOTER_SIZE,
        Face::Regular,
        Color::MUTED,
    );

    builder.finish()
}

fn body_row(item: &LineItem, settings: &RenderSettings) -> [String; 4] {
    [
        item.quantity().to_string(),
        item.product().to_string(),
        settings.currency.format(item.unit_price()),
        settings.currency.format(item.subtotal()),
    ]
}

struct Builder {
    pages: Vec<Page>,
    /// Top of the free space on the current page.
    y: f32,
}

impl Builder {
    fn new() -> Self {
        let mut builder = Builder {
            pages: Vec::new(),
            y: 0.0,
        };
        builder.new_page();
        builder
    }

    fn new_page(&mut self) {
        let mut page = Page::default();
        page.rect_outline(
            BORDER_INSET,
            BORDER_INSET,
            PAGE_WIDTH - BORDER_INSET,
            PAGE_HEIGHT - BORDER_INSET,
            BORDER_WIDTH,
            Color::BRAND,
        );
        self.pages.push(page);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn advance(&mut self, amount: f32) {
        self.y -= amount;
    }

    fn rows_available(&self) -> usize {
        ((self.y - MARGIN) / ROW_HEIGHT).floor().max(0.0) as usize
    }

    /// Places one line of text with its baseline at the current `y`.
    fn place(
        &mut self,
        text: &str,
        (left, right): (f32, f32),
        align: Align,
        size: f32,
        face: Face,
        color: Color,
    ) {
        let y = self.y;
        self.page().text(aligned(text, left, right, y, align, size, face, color));
    }

    /// Draws a header row plus `rows` starting at the current `y`.
    fn table(&mut self, columns: &Columns, rows: &[[String; 4]]) {
        let top = self.y;
        let bottom = top - ROW_HEIGHT * (rows.len() + 1) as f32;
        let page = self.page();

        page.elements.push(Element::Fill {
            x: columns.left(),
            y: top - ROW_HEIGHT,
            width: columns.right() - columns.left(),
            height: ROW_HEIGHT,
            color: Color::HEADER_FILL,
        });

        let baseline = |row: usize| {
            top - ROW_HEIGHT * row as f32 - (ROW_HEIGHT + TABLE_SIZE * CAP_HEIGHT) / 2.0
        };

        for (column, label) in HEADER_LABELS.iter().enumerate() {
            let (left, right) = columns.cell(column);
            page.text(aligned(
                label,
                left,
                right,
                baseline(0),
                Align::Center,
                TABLE_SIZE,
                Face::Bold,
                Color::TEXT,
            ));
        }

        for (index, row) in rows.iter().enumerate() {
            for (column, value) in row.iter().enumerate() {
                let (left, right) = columns.cell(column);
                // Only the product may be shortened; numbers shrink instead.
                let (value, size) = if column == Columns::PRODUCT {
                    (fit_text(value, Face::Regular, TABLE_SIZE, right - left), TABLE_SIZE)
                } else {
                    let size = fit_size(value, Face::Regular, TABLE_SIZE, right - left);
                    (value.clone(), size)
                };
                page.text(aligned(
                    &value,
                    left,
                    right,
                    baseline(index + 1),
                    Columns::ALIGN[column],
                    size,
                    Face::Regular,
                    Color::TEXT,
                ));
            }
        }

        // Grid
        for row in 1..=rows.len() {
            let y = top - ROW_HEIGHT * row as f32;
            page.line((columns.left(), y), (columns.right(), y), GRID_WIDTH, Color::BRAND);
        }
        for x in &columns.edges[1..4] {
            page.line((*x, bottom), (*x, top), GRID_WIDTH, Color::BRAND);
        }
        page.rect_outline(
            columns.left(),
            bottom,
            columns.right(),
            top,
            OUTER_BOX_WIDTH,
            Color::BRAND,
        );

        self.y = bottom;
    }

    fn finish(self) -> DocumentLayout {
        DocumentLayout { pages: self.pages }
    }
}

#[allow(clippy::too_many_arguments)]
fn aligned(
    text: &str,
    left: f32,
    right: f32,
    y: f32,
    align: Align,
    size: f32,
    face: Face,
    color: Color,
) -> TextRun {
    let width = text_width(text, face, size);
    let x = match align {
        Align::Left => left,
        Align::Center => left + (right - left - width) / 2.0,
        Align::Right => right - width,
    };

    TextRun {
        text: text.to_string(),
        x,
        y,
        size,
        face,
        color,
        align,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use remito_core::{Money, ReceiptNumber};

    fn receipt_with(items: Vec<LineItem>) -> FinalizedReceipt {
        FinalizedReceipt {
            number: ReceiptNumber::new(1),
            issued_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            total: items.iter().map(LineItem::subtotal).sum(),
            items,
        }
    }

    fn hammer_receipt() -> FinalizedReceipt {
        receipt_with(vec![
            LineItem::new(2, "Hammer", Money::from_major(500)).unwrap(),
            LineItem::new(1, "Nail box", Money::from_major(150)).unwrap(),
        ])
    }

    fn many_items(count: i64) -> FinalizedReceipt {
        receipt_with(
            (1..=count)
                .map(|i| LineItem::new(i, format!("Item {}", i), Money::from_major(10)).unwrap())
                .collect(),
        )
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_title_block() {
        let layout = build(&hammer_receipt(), &RenderSettings::default());

        let title = layout.find_text("Ferreteria San Miguel").unwrap();
        assert_eq!(title.face, Face::Bold);
        assert_eq!(title.size, TITLE_SIZE);
        assert_eq!(title.color, Color::BRAND);
        assert!(close(title.x + title.width() / 2.0, PAGE_WIDTH / 2.0));

        assert!(layout.find_text("Receipt No. 0001").is_some());
        let date = layout.find_text("Date: 14/03/2026").unwrap();
        assert_eq!(date.x, MARGIN);
    }

    #[test]
    fn test_table_cells_alignment() {
        let layout = build(&hammer_receipt(), &RenderSettings::default());
        let columns = Columns::centered();

        let qty = layout.find_text("2").unwrap();
        assert_eq!(qty.align, Align::Center);
        let (left, right) = columns.cell(0);
        assert!(close(qty.x - left, right - qty.right()));

        let product = layout.find_text("Hammer").unwrap();
        assert_eq!(product.align, Align::Left);
        assert_eq!(product.x, columns.cell(1).0);

        let subtotal = layout.find_text("$1,000.00").unwrap();
        assert_eq!(subtotal.align, Align::Right);
        assert!(close(subtotal.right(), columns.cell(3).1));

        let unit = layout.find_text("$500.00").unwrap();
        assert!(close(unit.right(), columns.cell(2).1));
        // same row
        assert_eq!(unit.y, product.y);
    }

    #[test]
    fn test_items_keep_order() {
        let layout = build(&hammer_receipt(), &RenderSettings::default());

        let hammer = layout.find_text("Hammer").unwrap();
        let nails = layout.find_text("Nail box").unwrap();
        assert!(hammer.y > nails.y);
    }

    #[test]
    fn test_header_row_is_distinguished() {
        let layout = build(&hammer_receipt(), &RenderSettings::default());

        for label in HEADER_LABELS {
            assert_eq!(layout.find_text(label).unwrap().face, Face::Bold);
        }
        assert!(layout.pages[0].elements.iter().any(|element| matches!(
            element,
            Element::Fill { color, .. } if *color == Color::HEADER_FILL
        )));
    }

    #[test]
    fn test_total_is_right_aligned_and_emphasized() {
        let layout = build(&hammer_receipt(), &RenderSettings::default());
        let columns = Columns::centered();

        let total = layout.find_text("Total: $1,150.00").unwrap();
        assert_eq!(total.face, Face::Bold);
        assert_eq!(total.size, TOTAL_SIZE);
        assert!(close(total.right(), columns.right()));

        let footer = layout.find_text("Thank you for your purchase!").unwrap();
        assert_eq!(footer.align, Align::Center);
        assert!(footer.y < total.y);
    }

    #[test]
    fn test_total_is_not_recomputed() {
        let mut receipt = hammer_receipt();
        receipt.total = Money::from_major(7);

        let layout = build(&receipt, &RenderSettings::default());
        assert!(layout.find_text("Total: $7.00").is_some());
    }

    #[test]
    fn test_table_centered_in_content_area() {
        let columns = Columns::centered();
        assert!(close(columns.left() - MARGIN, PAGE_WIDTH - MARGIN - columns.right()));
    }

    #[test]
    fn test_long_product_truncated() {
        let receipt = receipt_with(vec![LineItem::new(
            1,
            "Extra long cordless hammer drill with two batteries and carry case",
            Money::from_major(100),
        )
        .unwrap()]);
        let layout = build(&receipt, &RenderSettings::default());
        let columns = Columns::centered();
        let (left, right) = columns.cell(1);

        let product = layout
            .texts()
            .find(|run| run.text.starts_with("Extra long"))
            .unwrap();
        assert!(product.text.ends_with("..."));
        assert!(product.right() <= right + 0.01);
        assert_eq!(product.x, left);
    }

    #[test]
    fn test_large_numbers_shrink_instead_of_truncating() {
        let receipt = receipt_with(vec![
            LineItem::new(123_456_789_012, "Screws", Money::from_cents(0)).unwrap(),
            LineItem::new(1, "Generator", Money::from_major(1_234_567_890)).unwrap(),
        ]);
        let layout = build(&receipt, &RenderSettings::default());
        let columns = Columns::centered();

        let quantity = layout.find_text("123456789012").unwrap();
        let (left, right) = columns.cell(0);
        assert!(quantity.size < TABLE_SIZE);
        assert!(quantity.x >= left - 0.01);
        assert!(quantity.right() <= right + 0.01);

        let amounts: Vec<_> = layout
            .texts()
            .filter(|run| run.text == "$1,234,567,890.00")
            .collect();
        assert_eq!(amounts.len(), 2);
        for amount in amounts {
            assert!(amount.size < TABLE_SIZE);
        }

        assert!(layout.find_text("Total: $1,234,567,890.00").is_some());
        assert!(!layout.texts().any(|run| run.text.contains("...")));
    }

    #[test]
    fn test_single_page_for_short_receipt() {
        let layout = build(&hammer_receipt(), &RenderSettings::default());
        assert_eq!(layout.pages.len(), 1);
    }

    #[test]
    fn test_long_receipt_paginates_with_header_and_border() {
        let layout = build(&many_items(80), &RenderSettings::default());

        assert!(layout.pages.len() >= 3);
        for page in &layout.pages {
            assert!(page.elements.iter().any(|element| matches!(
                element,
                Element::Stroke { width, .. } if *width == BORDER_WIDTH
            )));
            for run in page.texts() {
                assert!(run.y >= MARGIN - 0.01, "{:?} below the margin", run.text);
            }
        }

        // every page holding rows repeats the header
        for page in &layout.pages {
            let has_rows = page.texts().any(|run| run.text.starts_with("Item "));
            let has_header = page.texts().any(|run| run.text == "Quantity");
            assert_eq!(has_rows, has_header);
        }

        // every item appears exactly once
        for i in 1..=80 {
            let label = format!("Item {}", i);
            assert_eq!(layout.texts().filter(|run| run.text == label).count(), 1);
        }
    }

    #[test]
    fn test_custom_currency() {
        let mut settings = RenderSettings::default();
        settings.currency.thousands_separator = '.';
        settings.currency.decimal_separator = ',';

        let layout = build(&hammer_receipt(), &settings);
        assert!(layout.find_text("Total: $1.150,00").is_some());
    }
}
