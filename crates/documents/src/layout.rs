//! Deterministic invoice page layout.
//!
//! The layout is a list of drawing operations per A4 page with coordinates in
//! millimetres measured from the top-left corner. It depends only on the
//! projection and the style, so the same invoice always lays out the same way.

use projections::InvoiceProjection;

use crate::style::{DocumentStyle, WALK_IN_CUSTOMER};

pub const PAGE_WIDTH_MM: f64 = 210.0;
pub const PAGE_HEIGHT_MM: f64 = 297.0;

/// Shown in place of the items table when the invoice has no lines.
pub const ITEMS_UNAVAILABLE: &str = "Items details not available";

const MARGIN_LEFT: f64 = 20.0;
const CONTENT_WIDTH: f64 = 170.0;
const CENTER_X: f64 = PAGE_WIDTH_MM / 2.0;

const TABLE_TOP: f64 = 85.0;
const CONTINUATION_TABLE_TOP: f64 = 20.0;
const ROW_HEIGHT: f64 = 8.0;
const ROWS_BOTTOM: f64 = 265.0;
const SUMMARY_HEIGHT: f64 = 60.0;
const SUMMARY_BOTTOM: f64 = 275.0;

const COL_INDEX: f64 = 25.0;
const COL_NAME: f64 = 35.0;
const COL_QTY: f64 = 120.0;
const COL_PRICE_RIGHT: f64 = 160.0;
const COL_TOTAL_RIGHT: f64 = 188.0;
const NAME_MAX_WIDTH: f64 = 80.0;

const SUMMARY_X: f64 = 115.0;
const SUMMARY_WIDTH: f64 = 75.0;
const SUMMARY_BOX_HEIGHT: f64 = 45.0;

const TITLE: Ink = Ink::new(24.0, Font::Bold, INDIGO);
const CONTACT: Ink = Ink::new(10.0, Font::Regular, SLATE_500);
const HEADING: Ink = Ink::new(18.0, Font::Bold, SLATE_900);
const LABEL: Ink = Ink::new(12.0, Font::Bold, SLATE_900);
const DETAIL: Ink = Ink::new(10.0, Font::Regular, SLATE_500);
const CUSTOMER: Ink = Ink::new(10.0, Font::Regular, SLATE_600);
const COLUMN: Ink = Ink::new(10.0, Font::Bold, SLATE_600);
const CELL: Ink = Ink::new(10.0, Font::Regular, SLATE_900);
const PLACEHOLDER: Ink = Ink::new(10.0, Font::Regular, SLATE_500);
const SUMMARY: Ink = Ink::new(10.0, Font::Regular, SLATE_600);
const TOTAL_LABEL: Ink = Ink::new(13.0, Font::Bold, INDIGO);
const TOTAL_AMOUNT: Ink = Ink::new(14.0, Font::Bold, INDIGO);
const PAYMENT: Ink = Ink::new(9.0, Font::Regular, SLATE_500);
const FOOTER: Ink = Ink::new(8.0, Font::Regular, SLATE_400);

const INDIGO: Rgb = Rgb(79, 70, 229);
const SLATE_900: Rgb = Rgb(30, 41, 59);
const SLATE_600: Rgb = Rgb(71, 85, 105);
const SLATE_500: Rgb = Rgb(100, 116, 139);
const SLATE_400: Rgb = Rgb(148, 163, 184);
const SLATE_200: Rgb = Rgb(226, 232, 240);
const SLATE_50: Rgb = Rgb(248, 250, 252);
const INDIGO_50: Rgb = Rgb(238, 242, 255);
const GREEN_100: Rgb = Rgb(220, 252, 231);
const GREEN_300: Rgb = Rgb(134, 239, 172);
const GREEN_600: Rgb = Rgb(22, 163, 74);
const AMBER_100: Rgb = Rgb(254, 243, 199);
const AMBER_300: Rgb = Rgb(252, 211, 77);
const AMBER_700: Rgb = Rgb(180, 83, 9);

/// An RGB colour with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

/// Horizontal anchoring of a text run relative to its `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Text whose baseline sits at `y`.
    Text {
        x: f64,
        y: f64,
        size: f64,
        font: Font,
        color: Rgb,
        align: Align,
        text: String,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        width: f64,
        color: Rgb,
    },
    /// Rectangle whose top-left corner is `(x, y)`.
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Rgb>,
        stroke: Option<Rgb>,
    },
}

/// Drawing operations for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    ops: Vec<DrawOp>,
}

impl Page {
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Text runs on this page in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A laid-out invoice document.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLayout {
    pages: Vec<Page>,
}

impl InvoiceLayout {
    /// Lays out `invoice`; long item lists continue on further pages.
    pub fn build(invoice: &InvoiceProjection, style: &DocumentStyle) -> Self {
        let mut builder = LayoutBuilder::default();
        builder.header(invoice, style);
        let after_items = builder.items(invoice, style);
        builder.summary(invoice, style, after_items);
        let layout = builder.finish();

        tracing::debug!(
            invoice_number = invoice.invoice_number(),
            pages = layout.pages.len(),
            "Laid out invoice"
        );
        layout
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// All text runs across pages in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().flat_map(Page::texts)
    }
}

/// Size, face and colour of a text run.
#[derive(Debug, Clone, Copy)]
struct Ink {
    size: f64,
    font: Font,
    color: Rgb,
}

impl Ink {
    const fn new(size: f64, font: Font, color: Rgb) -> Self {
        Self { size, font, color }
    }

    const fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }
}

#[derive(Default)]
struct LayoutBuilder {
    done: Vec<Page>,
    page: Page,
}

impl LayoutBuilder {
    fn push(&mut self, op: DrawOp) {
        self.page.ops.push(op);
    }

    fn text(&mut self, x: f64, y: f64, ink: Ink, align: Align, text: impl Into<String>) {
        self.push(DrawOp::Text {
            x,
            y,
            size: ink.size,
            font: ink.font,
            color: ink.color,
            align,
            text: text.into(),
        });
    }

    fn rect(&mut self, x: f64, y: f64, size: (f64, f64), fill: Option<Rgb>, stroke: Option<Rgb>) {
        self.push(DrawOp::Rect {
            x,
            y,
            width: size.0,
            height: size.1,
            fill,
            stroke,
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb) {
        self.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.page);
        self.done.push(page);
    }

    fn header(&mut self, invoice: &InvoiceProjection, style: &DocumentStyle) {
        self.text(CENTER_X, 20.0, TITLE, Align::Center, &style.business_name);

        let contact: Vec<&str> = [
            style.business_address.as_deref(),
            style.business_phone.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !contact.is_empty() {
            self.text(CENTER_X, 27.0, CONTACT, Align::Center, contact.join(" | "));
        }
        self.line((MARGIN_LEFT, 32.0), (MARGIN_LEFT + CONTENT_WIDTH, 32.0), 0.5, SLATE_200);

        self.text(MARGIN_LEFT, 45.0, HEADING, Align::Left, "INVOICE");

        let mut details = vec![
            format!("Invoice #: {}", invoice.invoice_number()),
            format!("Date: {}", style.format_date(invoice.created_at())),
            format!("Time: {}", style.format_time(invoice.created_at())),
        ];
        if let Some(table) = invoice.table_number() {
            details.push(format!("Table: {table}"));
        }
        if let Some(gst) = &style.gst_number {
            details.push(format!("GSTIN: {gst}"));
        }
        let mut y = 55.0;
        for line in details {
            self.text(MARGIN_LEFT, y, DETAIL, Align::Left, line);
            y += 7.0;
        }

        self.text(120.0, 45.0, LABEL, Align::Left, "BILL TO:");
        let name = invoice
            .customer_name()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(WALK_IN_CUSTOMER);
        self.text(120.0, 55.0, CUSTOMER, Align::Left, name);
        if let Some(phone) = invoice.customer_phone() {
            self.text(120.0, 62.0, CUSTOMER, Align::Left, format!("Phone: {phone}"));
        }
    }

    /// Draws the column header band and returns the first row baseline.
    fn table_header(&mut self, top: f64) -> f64 {
        self.rect(MARGIN_LEFT, top, (CONTENT_WIDTH, 10.0), Some(SLATE_50), None);
        let y = top + 7.0;
        self.text(COL_INDEX, y, COLUMN, Align::Left, "#");
        self.text(COL_NAME, y, COLUMN, Align::Left, "ITEM");
        self.text(COL_QTY, y, COLUMN, Align::Left, "QTY");
        self.text(COL_PRICE_RIGHT, y, COLUMN, Align::Right, "PRICE");
        self.text(COL_TOTAL_RIGHT, y, COLUMN, Align::Right, "TOTAL");
        top + 15.0
    }

    /// Draws the item rows and returns the baseline below the last row.
    fn items(&mut self, invoice: &InvoiceProjection, style: &DocumentStyle) -> f64 {
        let mut y = self.table_header(TABLE_TOP);

        if invoice.items().is_empty() {
            self.text(COL_NAME, y, PLACEHOLDER, Align::Left, ITEMS_UNAVAILABLE);
            return y + ROW_HEIGHT;
        }

        for (index, item) in invoice.items().iter().enumerate() {
            if y > ROWS_BOTTOM {
                self.new_page();
                y = self.table_header(CONTINUATION_TABLE_TOP);
            }
            let name = truncate_to_width(&item.item_name, CELL.size, CELL.font, NAME_MAX_WIDTH);
            self.text(COL_INDEX, y, CELL, Align::Left, (index + 1).to_string());
            self.text(COL_NAME, y, CELL, Align::Left, name);
            self.text(COL_QTY, y, CELL, Align::Left, item.quantity.to_string());
            self.text(COL_PRICE_RIGHT, y, CELL, Align::Right, style.money(item.unit_price));
            self.text(COL_TOTAL_RIGHT, y, CELL, Align::Right, style.money(item.line_total()));
            y += ROW_HEIGHT;
        }
        y
    }

    fn summary(&mut self, invoice: &InvoiceProjection, style: &DocumentStyle, after_items: f64) {
        let mut y = after_items + 15.0;
        if y + SUMMARY_HEIGHT > SUMMARY_BOTTOM {
            self.new_page();
            y = 30.0;
        }

        let left = SUMMARY_X + 5.0;
        let right = SUMMARY_X + SUMMARY_WIDTH - 5.0;

        self.rect(
            SUMMARY_X,
            y - 5.0,
            (SUMMARY_WIDTH, SUMMARY_BOX_HEIGHT),
            Some(SLATE_50),
            Some(SLATE_200),
        );

        y += 5.0;
        self.text(left, y, SUMMARY, Align::Left, "Subtotal:");
        self.text(right, y, SUMMARY, Align::Right, style.money(invoice.subtotal()));

        y += 7.0;
        self.text(left, y, SUMMARY, Align::Left, format!("{}:", invoice.tax_label()));
        self.text(right, y, SUMMARY, Align::Right, style.money(invoice.tax_total()));

        y += 5.0;
        self.line((left, y), (right, y), 1.5, INDIGO);

        y += 8.0;
        self.rect(SUMMARY_X + 3.0, y - 5.0, (SUMMARY_WIDTH - 6.0, 10.0), Some(INDIGO_50), None);
        self.text(left, y, TOTAL_LABEL, Align::Left, "TOTAL:");
        self.text(right, y, TOTAL_AMOUNT, Align::Right, style.money(invoice.total_amount()));

        y += 12.0;
        self.text(
            left,
            y,
            PAYMENT,
            Align::Left,
            format!("Payment Method: {}", invoice.payment_mode()),
        );

        y += 6.0;
        let (fill, border, ink, label) = if invoice.is_paid() {
            (GREEN_100, GREEN_300, GREEN_600, PAID_MARKER)
        } else {
            (AMBER_100, AMBER_300, AMBER_700, UNPAID_MARKER)
        };
        self.rect(left, y - 4.0, (35.0, 6.0), Some(fill), Some(border));
        self.text(SUMMARY_X + 7.0, y, Ink::new(8.0, Font::Bold, ink), Align::Left, label);
    }

    fn finish(mut self) -> InvoiceLayout {
        self.new_page();
        let total = self.done.len();
        for (i, page) in self.done.iter_mut().enumerate() {
            let mut footer = LayoutBuilder {
                done: Vec::new(),
                page: std::mem::take(page),
            };
            footer.text(CENTER_X, 280.0, FOOTER, Align::Center, "Thank you for your business!");
            footer.text(CENTER_X, 285.0, FOOTER, Align::Center, "For any queries, please contact us.");
            if total > 1 {
                footer.text(
                    MARGIN_LEFT + CONTENT_WIDTH,
                    290.0,
                    FOOTER.with_color(SLATE_500),
                    Align::Right,
                    format!("Page {} of {total}", i + 1),
                );
            }
            *page = footer.page;
        }
        InvoiceLayout { pages: self.done }
    }
}

/// Marker drawn for billed invoices.
pub const PAID_MARKER: &str = "PAID";

/// Marker drawn for invoices still awaiting payment.
pub const UNPAID_MARKER: &str = "PAYMENT PENDING";

/// Helvetica advance widths in 1/1000 em for printable ASCII from `' '`.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

const BOLD_WIDTH_FACTOR: f64 = 1.06;
const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Approximate rendered width of `text` in millimetres.
pub fn text_width_mm(text: &str, size: f64, font: Font) -> f64 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let idx = (c as u32).wrapping_sub(' ' as u32) as usize;
            u32::from(HELVETICA_WIDTHS.get(idx).copied().unwrap_or(556))
        })
        .sum();
    let factor = match font {
        Font::Regular => 1.0,
        Font::Bold => BOLD_WIDTH_FACTOR,
    };
    f64::from(units) / 1000.0 * size * factor / POINTS_PER_MM
}

/// Shortens `text` with a trailing `...` so it fits within `max_mm`.
fn truncate_to_width(text: &str, size: f64, font: Font, max_mm: f64) -> String {
    if text_width_mm(text, size, font) <= max_mm {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while !chars.is_empty() {
        chars.pop();
        let candidate: String = chars.iter().collect::<String>() + "...";
        if text_width_mm(&candidate, size, font) <= max_mm {
            return candidate;
        }
    }
    "...".to_string()
}
