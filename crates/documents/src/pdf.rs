//! Minimal PDF 1.4 serialisation of an [`InvoiceLayout`].
//!
//! Uses the standard Helvetica faces with WinAnsi encoding, so no fonts are
//! embedded. Characters outside Latin-1 are transliterated (the rupee sign
//! becomes `Rs.`) or replaced with `?`.

use std::io::Write;
use std::path::Path;

use crate::error::{DocumentError, Result};
use crate::layout::{Align, DrawOp, Font, InvoiceLayout, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, Page, Rgb, text_width_mm};

const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Object numbers fixed ahead of the per-page objects.
const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const FONT_REGULAR_ID: usize = 3;
const FONT_BOLD_ID: usize = 4;
const FIRST_PAGE_ID: usize = 5;

/// Serialises `layout` to PDF bytes.
pub fn render_pdf(layout: &InvoiceLayout) -> Result<Vec<u8>> {
    let pages = layout.pages();
    if pages.is_empty() {
        return Err(DocumentError::NoPages);
    }

    let mut writer = PdfWriter::default();
    writer.raw(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    writer.object(
        CATALOG_ID,
        &format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>"),
    );

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", page_object_id(i)))
        .collect();
    writer.object(
        PAGES_ID,
        &format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            pages.len()
        ),
    );

    writer.object(FONT_REGULAR_ID, &font_dict("Helvetica"));
    writer.object(FONT_BOLD_ID, &font_dict("Helvetica-Bold"));

    let media_box = format!(
        "[0 0 {} {}]",
        num(PAGE_WIDTH_MM * POINTS_PER_MM),
        num(PAGE_HEIGHT_MM * POINTS_PER_MM)
    );
    for (i, page) in pages.iter().enumerate() {
        let page_id = page_object_id(i);
        let content_id = page_id + 1;
        writer.object(
            page_id,
            &format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R /MediaBox {media_box} \
                 /Resources << /Font << /F1 {FONT_REGULAR_ID} 0 R /F2 {FONT_BOLD_ID} 0 R >> >> \
                 /Contents {content_id} 0 R >>"
            ),
        );
        let content = content_stream(page);
        writer.stream(content_id, &content);
    }

    Ok(writer.finish(CATALOG_ID))
}

/// Renders `layout` and writes it to `path`.
pub fn write_pdf(layout: &InvoiceLayout, path: &Path) -> Result<()> {
    let bytes = render_pdf(layout)?;
    let mut file = std::fs::File::create(path)?;
    file.write_all(&bytes)?;
    file.flush()?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote invoice PDF");
    Ok(())
}

fn page_object_id(index: usize) -> usize {
    FIRST_PAGE_ID + index * 2
}

fn font_dict(base: &str) -> String {
    format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base} /Encoding /WinAnsiEncoding >>")
}

#[derive(Default)]
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(usize, usize)>,
}

impl PdfWriter {
    fn raw(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn object(&mut self, id: usize, body: &str) {
        self.offsets.push((id, self.buf.len()));
        self.raw(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn stream(&mut self, id: usize, content: &[u8]) {
        self.offsets.push((id, self.buf.len()));
        self.raw(format!("{id} 0 obj\n<< /Length {} >>\nstream\n", content.len()).as_bytes());
        self.raw(content);
        self.raw(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, root: usize) -> Vec<u8> {
        self.offsets.sort_unstable();
        let size = self.offsets.len() + 1;
        let xref_at = self.buf.len();

        let mut xref = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for (_, offset) in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {size} /Root {root} 0 R >>\nstartxref\n{xref_at}\n%%EOF\n"
        ));
        self.raw(xref.as_bytes());
        self.buf
    }
}

fn content_stream(page: &Page) -> Vec<u8> {
    let mut out = Vec::new();
    for op in page.ops() {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                font,
                color,
                align,
                text,
            } => {
                let encoded = encode_text(text);
                let width = text_width_mm(&latin1_view(text), *size, *font);
                let left = match align {
                    Align::Left => *x,
                    Align::Center => *x - width / 2.0,
                    Align::Right => *x - width,
                };
                let face = match font {
                    Font::Regular => "F1",
                    Font::Bold => "F2",
                };
                push_line(&mut out, &format!("{} rg", rgb(*color)));
                out.extend_from_slice(
                    format!(
                        "BT /{face} {} Tf {} {} Td (",
                        num(*size),
                        pt(left),
                        pt(PAGE_HEIGHT_MM - y)
                    )
                    .as_bytes(),
                );
                out.extend_from_slice(&encoded);
                out.extend_from_slice(b") Tj ET\n");
            }
            DrawOp::Line {
                from,
                to,
                width,
                color,
            } => {
                push_line(
                    &mut out,
                    &format!(
                        "{} RG {} w {} {} m {} {} l S",
                        rgb(*color),
                        num(width * POINTS_PER_MM),
                        pt(from.0),
                        pt(PAGE_HEIGHT_MM - from.1),
                        pt(to.0),
                        pt(PAGE_HEIGHT_MM - to.1)
                    ),
                );
            }
            DrawOp::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
            } => {
                let paint = match (fill, stroke) {
                    (Some(_), Some(_)) => "B",
                    (Some(_), None) => "f",
                    (None, Some(_)) => "S",
                    (None, None) => continue,
                };
                if let Some(fill) = fill {
                    push_line(&mut out, &format!("{} rg", rgb(*fill)));
                }
                if let Some(stroke) = stroke {
                    push_line(&mut out, &format!("{} RG 0.5 w", rgb(*stroke)));
                }
                push_line(
                    &mut out,
                    &format!(
                        "{} {} {} {} re {paint}",
                        pt(*x),
                        pt(PAGE_HEIGHT_MM - y - height),
                        pt(*width),
                        pt(*height)
                    ),
                );
            }
        }
    }
    out
}

fn push_line(out: &mut Vec<u8>, line: &str) {
    out.extend_from_slice(line.as_bytes());
    out.push(b'\n');
}

fn pt(mm: f64) -> String {
    num(mm * POINTS_PER_MM)
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}

fn rgb(Rgb(r, g, b): Rgb) -> String {
    let channel = |c: u8| format!("{:.3}", f64::from(c) / 255.0);
    format!("{} {} {}", channel(r), channel(g), channel(b))
}

/// The text as it will be printed, before byte encoding.
fn latin1_view(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => out.push_str("Rs."),
            '✓' | '✔' => {}
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => out.push(c),
            _ => out.push('?'),
        }
    }
    out
}

/// Encodes text as the body of a PDF literal string.
fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in latin1_view(text).chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            '\u{20}'..='\u{7E}' => out.push(c as u8),
            _ => out.extend_from_slice(format!("\\{:03o}", c as u32).as_bytes()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use common::InvoiceId;
    use domain::{InvoiceRecord, InvoiceStatus, Money};
    use projections::InvoiceProjection;

    use super::*;
    use crate::style::DocumentStyle;

    fn layout() -> InvoiceLayout {
        let record = InvoiceRecord {
            id: InvoiceId::new(1),
            invoice_number: "INV-00007".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 16, 0, 0).unwrap(),
            customer_name: Some("José (VIP)".to_string()),
            customer_phone: None,
            table_number: None,
            status: InvoiceStatus::Completed,
            total_amount: Money::from_major(0),
            payment_mode: "Cash".to_string(),
            items: vec![],
        };
        InvoiceLayout::build(&InvoiceProjection::from_server_invoice(&record), &DocumentStyle::default())
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_pdf_structure() {
        let bytes = render_pdf(&layout()).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4\n"));
        assert!(bytes.ends_with(b"%%EOF\n"));
        assert!(contains(&bytes, b"/BaseFont /Helvetica-Bold"));
        assert!(contains(&bytes, b"/Count 1"));
        assert!(contains(&bytes, b"(Invoice #: INV-00007) Tj"));
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let bytes = render_pdf(&layout()).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        let tail = text.rsplit("startxref\n").next().unwrap();
        let offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(bytes[offset..].starts_with(b"xref\n"));
    }

    #[test]
    fn test_object_offsets_match() {
        let bytes = render_pdf(&layout()).unwrap();
        let text = String::from_utf8_lossy(&bytes).into_owned();
        let xref = text.split("xref\n").nth(1).unwrap();
        let entries: Vec<usize> = xref
            .lines()
            .skip(2)
            .take_while(|l| l.ends_with(" n "))
            .map(|l| l[..10].parse().unwrap())
            .collect();
        assert_eq!(entries.len(), 6);
        for (i, offset) in entries.iter().enumerate() {
            let expected = format!("{} 0 obj", i + 1);
            assert!(bytes[*offset..].starts_with(expected.as_bytes()));
        }
    }

    #[test]
    fn test_rendering_is_deterministic() {
        assert_eq!(render_pdf(&layout()).unwrap(), render_pdf(&layout()).unwrap());
    }

    #[test]
    fn test_text_escaping_and_transliteration() {
        assert_eq!(encode_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(encode_text("₹12.00"), b"Rs.12.00".to_vec());
        assert_eq!(encode_text("José"), b"Jos\\351".to_vec());
        assert_eq!(encode_text("✓ PAID"), b" PAID".to_vec());
        assert_eq!(encode_text("茶"), b"?".to_vec());
    }

    #[test]
    fn test_write_pdf_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Invoice-INV-00007.pdf");
        write_pdf(&layout(), &path).unwrap();
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, render_pdf(&layout()).unwrap());
    }
}
