//! Shareable invoice text for messaging apps.

use projections::InvoiceProjection;

use crate::layout::ITEMS_UNAVAILABLE;
use crate::style::{DocumentStyle, VALUED_CUSTOMER};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Returns the greeting name: the first whitespace-separated token of the
/// customer name, or the fallback when the name is missing or blank.
pub fn first_name(customer_name: Option<&str>) -> &str {
    customer_name
        .and_then(|name| name.split_whitespace().next())
        .unwrap_or(VALUED_CUSTOMER)
}

/// Formats the personalised share message for `invoice`.
///
/// Amounts always carry exactly two decimals. Line totals are recomputed
/// from unit price and quantity.
pub fn share_message(invoice: &InvoiceProjection, style: &DocumentStyle) -> String {
    let customer = invoice
        .customer_name()
        .map(str::trim)
        .filter(|n| !n.is_empty());
    let greeting = first_name(customer);

    let items = if invoice.items().is_empty() {
        ITEMS_UNAVAILABLE.to_string()
    } else {
        invoice
            .items()
            .iter()
            .enumerate()
            .map(|(i, item)| {
                format!(
                    "{}. {}\n   Qty: {} × {} = {}",
                    i + 1,
                    item.item_name,
                    item.quantity,
                    style.money(item.unit_price),
                    style.money(item.line_total())
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let mut lines = vec![
        format!("Hello {greeting}! 👋"),
        String::new(),
        format!("Thank you for choosing {}!", style.business_name),
        String::new(),
        RULE.to_string(),
        "📄 *INVOICE DETAILS*".to_string(),
        RULE.to_string(),
        String::new(),
        format!("*Invoice #:* {}", invoice.invoice_number()),
        format!("*Date:* {}", style.format_date(invoice.created_at())),
        format!("*Time:* {}", style.format_time(invoice.created_at())),
        format!("*Customer:* {}", customer.unwrap_or(VALUED_CUSTOMER)),
    ];
    if let Some(table) = invoice.table_number() {
        lines.push(format!("*Table:* {table}"));
    }
    lines.extend([
        String::new(),
        RULE.to_string(),
        "🛍️ *ITEMS PURCHASED*".to_string(),
        RULE.to_string(),
        String::new(),
        items,
        String::new(),
        RULE.to_string(),
        "💰 *PAYMENT SUMMARY*".to_string(),
        RULE.to_string(),
        String::new(),
        format!("Subtotal: {}", style.money(invoice.subtotal())),
        format!("{}: {}", invoice.tax_label(), style.money(invoice.tax_total())),
        RULE.to_string(),
    ]);

    if invoice.is_paid() {
        lines.push(format!("*TOTAL PAID: {}*", style.money(invoice.total_amount())));
    } else {
        lines.push(format!("*TOTAL DUE: {}*", style.money(invoice.total_amount())));
    }
    lines.extend([
        RULE.to_string(),
        String::new(),
        format!("Payment Method: {}", invoice.payment_mode()),
        String::new(),
    ]);
    if invoice.is_paid() {
        lines.push("✅ Payment received successfully!".to_string());
        lines.push(String::new());
    }
    lines.extend([
        "We appreciate your business and look forward to serving you again! 😊".to_string(),
        String::new(),
        "If you have any questions about this invoice, feel free to reply to this message."
            .to_string(),
        String::new(),
        "Best regards,".to_string(),
        format!("*{} Team*", style.business_name),
    ]);

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use common::{InvoiceId, ItemId};
    use domain::{InvoiceItemRecord, InvoiceRecord, InvoiceStatus, Money};

    use super::*;

    fn invoice(name: Option<&str>, items: Vec<InvoiceItemRecord>, total: Money) -> InvoiceProjection {
        InvoiceProjection::from_server_invoice(&InvoiceRecord {
            id: InvoiceId::new(3),
            invoice_number: "INV-20250105-0003".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 5, 9, 5, 0).unwrap(),
            customer_name: name.map(str::to_string),
            customer_phone: Some("98765 43210".to_string()),
            table_number: None,
            status: InvoiceStatus::Completed,
            total_amount: total,
            payment_mode: "Cash".to_string(),
            items,
        })
    }

    fn tea() -> InvoiceItemRecord {
        InvoiceItemRecord {
            item_id: Some(ItemId::new(1)),
            item_name: "Tea".to_string(),
            quantity: 2,
            unit_price: Money::from_major(10),
            tax_amount: None,
            total_price: None,
        }
    }

    #[test]
    fn test_first_name_token() {
        assert_eq!(first_name(Some("Asha Rao")), "Asha");
        assert_eq!(first_name(Some("Ravi")), "Ravi");
        assert_eq!(first_name(Some("   ")), VALUED_CUSTOMER);
        assert_eq!(first_name(None), VALUED_CUSTOMER);
    }

    #[test]
    fn test_message_personalised_with_two_decimal_amounts() {
        let message = share_message(
            &invoice(Some("Asha Rao"), vec![tea()], Money::from_major(22)),
            &DocumentStyle::default(),
        );
        assert!(message.starts_with("Hello Asha! 👋"));
        assert!(message.contains("*Customer:* Asha Rao"));
        assert!(message.contains("1. Tea\n   Qty: 2 × ₹10.00 = ₹20.00"));
        assert!(message.contains("Subtotal: ₹20.00"));
        assert!(message.contains("Tax (10%): ₹2.00"));
        assert!(message.contains("*TOTAL PAID: ₹22.00*"));
        assert!(message.contains("*Date:* January 5, 2025"));
        assert!(message.contains("*Time:* 09:05 AM"));
        assert!(message.contains("✅ Payment received successfully!"));
    }

    #[test]
    fn test_tax_label_not_hardcoded() {
        let message = share_message(
            &invoice(None, vec![tea()], Money::from_major(21)),
            &DocumentStyle::default(),
        );
        assert!(message.contains("Tax (5%): ₹1.00"));
        assert!(!message.contains("Tax (10%)"));
    }

    #[test]
    fn test_fallbacks_for_missing_name_and_items() {
        let message = share_message(&invoice(None, vec![], Money::zero()), &DocumentStyle::default());
        assert!(message.starts_with("Hello Valued Customer!"));
        assert!(message.contains(ITEMS_UNAVAILABLE));
        assert!(message.contains("Tax: ₹0.00"));
    }

    #[test]
    fn test_style_currency_applies() {
        let style = DocumentStyle::default().with_currency_symbol("$");
        let message = share_message(&invoice(Some("Sam"), vec![tea()], Money::from_cents(2000)), &style);
        assert!(message.contains("*TOTAL PAID: $20.00*"));
        assert!(message.contains("Tax: $0.00"));
    }
}
