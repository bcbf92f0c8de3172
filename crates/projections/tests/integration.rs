//! Integration tests: backend invoices → cart → projection, and the history views.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use common::{InvoiceId, ItemId, TableNumber};
use domain::{
    Cart, CartProduct, CustomerDetails, InvoiceItemRecord, InvoiceRecord, InvoiceStatus, Money,
    TaxRate,
};
use projections::{
    Clock, FixedClock, HistoryFilter, InvoiceHistoryView, InvoiceProjector, LocalInvoiceSequence,
    ProjectionSource, ReadModel,
};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
}

fn pending_for_table(table: u32) -> InvoiceRecord {
    InvoiceRecord {
        id: InvoiceId::new(40 + i64::from(table)),
        invoice_number: format!("INV-20250105-T{table}"),
        created_at: at(5, 9),
        customer_name: None,
        customer_phone: None,
        table_number: Some(TableNumber::new(table)),
        status: InvoiceStatus::Pending,
        total_amount: Money::from_cents(6300),
        payment_mode: "Cash".to_string(),
        items: vec![
            InvoiceItemRecord {
                item_id: Some(ItemId::new(1)),
                item_name: "Masala Dosa".to_string(),
                quantity: 2,
                unit_price: Money::from_major(25),
                tax_amount: Some(Money::from_cents(250)),
                total_price: None,
            },
            InvoiceItemRecord {
                item_id: Some(ItemId::new(2)),
                item_name: "Filter Coffee".to_string(),
                quantity: 1,
                unit_price: Money::from_major(10),
                tax_amount: Some(Money::from_cents(50)),
                total_price: None,
            },
        ],
    }
}

#[test]
fn test_pending_order_reloaded_edited_and_reprojected() {
    let clock = FixedClock::new(at(5, 11));
    let projector = InvoiceProjector::new(LocalInvoiceSequence::starting_after(7), clock.clone());

    let pending = pending_for_table(3);
    let mut cart = Cart::new();
    cart.replace_from_invoice(&pending);

    // rates come back from the stored tax amounts
    assert_eq!(cart.subtotal(), Money::from_major(60));
    assert_eq!(cart.tax_total(), Money::from_major(3));
    assert_eq!(cart.grand_total(), pending.total_amount);

    cart.add(
        CartProduct::new(ItemId::new(2), "Filter Coffee", Money::from_major(10))
            .unwrap()
            .with_tax_rate(TaxRate::from_percent(5).unwrap()),
    );

    let projection = projector.project_for_table(
        &cart,
        TableNumber::new(3),
        CustomerDetails::new(Some("Meera Iyer"), Some("98450 12345")),
        None,
    );

    assert_eq!(projection.invoice_number(), "INV-00008");
    assert_eq!(projection.created_at(), clock.now());
    assert_eq!(projection.source(), ProjectionSource::Local);
    assert_eq!(projection.items()[1].quantity, 2);
    assert_eq!(projection.subtotal(), Money::from_major(70));
    assert_eq!(projection.tax_total(), Money::from_cents(350));
    assert_eq!(projection.total_amount(), Money::from_cents(7350));
    assert_eq!(projection.total_amount(), cart.grand_total());
}

fn stored_rows() -> impl Strategy<Value = Vec<InvoiceItemRecord>> {
    prop::collection::vec(("[A-Z][a-z]{2,12}", 1_u32..10, 1_i64..50_000, 0_u32..=18), 1..6).prop_map(
        |rows| {
            rows.into_iter()
                .enumerate()
                .map(|(idx, (name, quantity, cents, percent))| {
                    let unit_price = Money::from_cents(cents);
                    let rate = TaxRate::from_percent(percent).unwrap();
                    InvoiceItemRecord {
                        item_id: Some(ItemId::new(idx as i64 + 1)),
                        item_name: name,
                        quantity,
                        unit_price,
                        tax_amount: Some(unit_price.multiply(quantity).apply_rate(rate).rounded()),
                        total_price: None,
                    }
                })
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(Config::with_cases(64))]

    #[test]
    fn replace_then_project_keeps_rows_and_tax(items in stored_rows()) {
        let projector = InvoiceProjector::new(LocalInvoiceSequence::new(), FixedClock::new(at(5, 11)));
        let mut pending = pending_for_table(6);
        pending.items = items;
        let mut cart = Cart::new();
        cart.replace_from_invoice(&pending);

        let projection = projector.project_for_table(
            &cart,
            TableNumber::new(6),
            CustomerDetails::anonymous(),
            None,
        );

        let projected: Vec<_> = projection
            .items()
            .iter()
            .map(|i| (i.item_name.clone(), i.quantity, i.unit_price))
            .collect();
        let stored: Vec<_> = pending
            .items
            .iter()
            .map(|i| (i.item_name.clone(), i.quantity, i.unit_price))
            .collect();
        prop_assert_eq!(projected, stored);

        let stored_tax: Money = pending.items.iter().filter_map(|i| i.tax_amount).sum();
        let projected_tax: Money = projection
            .items()
            .iter()
            .filter_map(|i| i.tax_amount)
            .map(|tax| tax.rounded())
            .sum();
        prop_assert_eq!(projected_tax, stored_tax);
        prop_assert_eq!(projection.total_amount(), cart.grand_total());
    }
}

#[test]
fn test_server_projection_keeps_server_total() {
    let projector = InvoiceProjector::new(LocalInvoiceSequence::new(), FixedClock::new(at(5, 12)));
    let pending = pending_for_table(5);

    let projection = projector.project_from_server_invoice(&pending);

    assert_eq!(projection.total_amount(), Money::from_cents(6300));
    assert_eq!(projection.subtotal(), Money::from_major(60));
    assert_eq!(projection.tax_label(), "Tax (5%)");
    assert_eq!(projection.created_at(), at(5, 9));
    // no local number consumed
    assert_eq!(projector.project(&Cart::new(), CustomerDetails::anonymous(), None).invoice_number(), "INV-00001");
}

#[tokio::test]
async fn test_history_view_filters_and_summarises() {
    let view = InvoiceHistoryView::new();
    let mut completed = pending_for_table(1);
    completed.status = InvoiceStatus::Completed;
    completed.customer_name = Some("Meera Iyer".to_string());

    let mut older = pending_for_table(2);
    older.status = InvoiceStatus::Completed;
    older.created_at = at(2, 20);

    view.load(vec![older, completed]).await;
    assert_eq!(view.count(), 2);

    let filter = HistoryFilter::new()
        .with_search("meera")
        .with_date_range(NaiveDate::from_ymd_opt(2025, 1, 5), None)
        .unwrap();
    let hits = view.filter(&filter).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].table_number, Some(TableNumber::new(1)));

    let summary = view.summary(&FixedClock::new(at(5, 22))).await;
    assert_eq!(summary.total_revenue, Money::from_major(126));
    assert_eq!(summary.average_order_value, Money::from_major(63));
    assert_eq!(summary.today_order_count, 1);
}
