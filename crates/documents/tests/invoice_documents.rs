//! End-to-end: cart → projection → PDF and share action.

use chrono::{TimeZone, Utc};
use common::ItemId;
use documents::{
    DocumentStyle, InvoiceLayout, ShareAction, UNPAID_MARKER, document_file_name, invoice_pdf,
};
use domain::{BusinessSettings, Cart, CartProduct, CustomerDetails, Money, TaxRate};
use projections::{FixedClock, InvoiceProjector, LocalInvoiceSequence};

fn cart() -> Cart {
    let mut cart = Cart::new();
    let chai = CartProduct::new(ItemId::new(1), "Masala Chai", Money::from_major(15))
        .unwrap()
        .with_tax_rate(TaxRate::from_percent(5).unwrap());
    cart.add(chai.clone());
    cart.add(chai);
    cart.add(CartProduct::new(ItemId::new(2), "Vada Pav", Money::from_major(30)).unwrap());
    cart
}

fn projector() -> InvoiceProjector<LocalInvoiceSequence, FixedClock> {
    InvoiceProjector::new(
        LocalInvoiceSequence::new(),
        FixedClock::new(Utc.with_ymd_and_hms(2025, 3, 1, 13, 45, 0).unwrap()),
    )
}

fn style() -> DocumentStyle {
    DocumentStyle::from_settings(&BusinessSettings {
        hotel_name: Some("Udupi Corner".to_string()),
        address: Some("12 MG Road".to_string()),
        ..Default::default()
    })
}

#[test]
fn test_local_preview_renders_pdf_and_share_link() {
    let projection = projector().project(
        &cart(),
        CustomerDetails::new(Some("Kiran Kumar"), Some("+91 99000 11223")),
        Some("UPI"),
    );

    let layout = InvoiceLayout::build(&projection, &style());
    let texts: Vec<&str> = layout.texts().collect();
    assert!(texts.contains(&"Udupi Corner"));
    assert!(texts.contains(&"12 MG Road"));
    assert!(texts.contains(&"₹61.50"));
    assert!(texts.contains(&UNPAID_MARKER));

    let pdf = invoice_pdf(&projection, &style()).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert_eq!(document_file_name(projection.invoice_number()), "Invoice-INV-00001.pdf");

    let share = ShareAction::for_invoice(&projection, &style());
    assert!(share.is_enabled());
    assert!(share.message.starts_with("Hello Kiran!"));
    assert!(share.message.contains("*TOTAL DUE: ₹61.50*"));
    assert!(share.message.contains("*Udupi Corner Team*"));
    let link = share.link.unwrap();
    assert_eq!(link.path(), "/919900011223");
}

#[test]
fn test_share_disabled_without_phone() {
    let projection = projector().project(&cart(), CustomerDetails::anonymous(), None);
    let share = ShareAction::for_invoice(&projection, &DocumentStyle::default());
    assert!(!share.is_enabled());
    assert!(share.message.starts_with("Hello Valued Customer!"));
}
