use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use clap::Args;
use client::HttpBackend;
use common::{InvoiceId, ItemId, TableNumber};
use documents::{DocumentStyle, InvoiceLayout, ShareAction, document_file_name, write_pdf};
use domain::{CartProduct, Completion, CustomerDetails, DEFAULT_PAYMENT_MODE};
use projections::InvoiceProjection;
use session::OrderSession;

use super::context::{Context, describe_session};

/// `ID` or `ID:QUANTITY`, e.g. `12:3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ItemEntry {
    id: ItemId,
    quantity: u32,
}

impl FromStr for ItemEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, quantity) = match s.split_once(':') {
            Some((id, quantity)) => (id, quantity),
            None => (s, "1"),
        };
        let id: i64 = id
            .trim()
            .parse()
            .map_err(|_| format!("invalid item id in {s:?}"))?;
        let quantity: u32 = quantity
            .trim()
            .parse()
            .map_err(|_| format!("invalid quantity in {s:?}"))?;
        if quantity == 0 {
            return Err(format!("quantity must be at least 1 in {s:?}"));
        }
        Ok(Self {
            id: ItemId::new(id),
            quantity,
        })
    }
}

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    /// Table to save the order for
    #[arg(long)]
    table: u32,

    /// Item to add as ID or ID:QUANTITY; repeatable
    #[arg(long = "item", required = true)]
    items: Vec<ItemEntry>,
}

#[derive(Debug, Args)]
pub(crate) struct CustomerArgs {
    /// Customer name
    #[arg(long)]
    name: Option<String>,

    /// Customer phone number
    #[arg(long)]
    phone: Option<String>,

    /// Payment mode
    #[arg(long, default_value = DEFAULT_PAYMENT_MODE)]
    payment_mode: String,
}

impl CustomerArgs {
    fn details(&self) -> CustomerDetails {
        CustomerDetails::new(self.name.as_deref(), self.phone.as_deref())
    }
}

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Item to bill as ID or ID:QUANTITY; repeatable
    #[arg(long = "item", required = true)]
    items: Vec<ItemEntry>,

    #[command(flatten)]
    customer: CustomerArgs,

    /// Show a locally numbered preview instead of billing
    #[arg(long)]
    preview: bool,

    /// Also write the invoice PDF to this file or directory
    #[arg(long)]
    pdf: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct CompleteArgs {
    /// Backend id of the pending order (see `pos pending`)
    order_id: i64,

    #[command(flatten)]
    customer: CustomerArgs,
}

pub(crate) async fn order(context: &Context, args: OrderArgs) -> Result<(), String> {
    let session = context.session();
    session
        .refresh_pending()
        .await
        .map_err(|e| describe_session(&e))?;

    let table = TableNumber::new(args.table);
    session.select_table(table);
    if let Some(order_id) = session.current_order_id() {
        println!("Adding to saved order #{order_id} for table {table}");
    }

    fill_cart(context, &session, &args.items).await?;
    let saved = session.save().await.map_err(|e| describe_session(&e))?;

    println!(
        "Saved order #{} for table {table}: {}",
        saved.id,
        saved.total_amount.format_with(&context.config.currency_symbol)
    );
    Ok(())
}

pub(crate) async fn checkout(context: &Context, args: CheckoutArgs) -> Result<(), String> {
    let session = context.session();
    fill_cart(context, &session, &args.items).await?;

    let invoice = if args.preview {
        session.preview(args.customer.details(), Some(args.customer.payment_mode.as_str()))
    } else {
        session
            .checkout(args.customer.details(), Some(args.customer.payment_mode.as_str()))
            .await
            .map_err(|e| describe_session(&e))?
    };

    let style = context.style().await?;
    print_invoice(&invoice, &style);
    if let Some(out) = args.pdf {
        save_pdf(&invoice, &style, out)?;
    }
    Ok(())
}

pub(crate) async fn complete(context: &Context, args: CompleteArgs) -> Result<(), String> {
    let session = context.session();
    let completion =
        Completion::new(args.customer.details()).with_payment_mode(args.customer.payment_mode);

    let invoice = session
        .complete(InvoiceId::new(args.order_id), completion)
        .await
        .map_err(|e| describe_session(&e))?;

    let style = context.style().await?;
    print_invoice(&invoice, &style);

    let action = ShareAction::for_invoice(&invoice, &style);
    if let Some(link) = action.link {
        println!();
        println!("Share: {link}");
    }
    Ok(())
}

async fn fill_cart(
    context: &Context,
    session: &OrderSession<Arc<HttpBackend>>,
    items: &[ItemEntry],
) -> Result<(), String> {
    let catalog = context.catalog().await?;
    for entry in items {
        let item = catalog
            .get(entry.id)
            .ok_or_else(|| format!("Unknown item {}", entry.id))?;
        let product = CartProduct::try_from(item).map_err(|e| e.to_string())?;
        for _ in 0..entry.quantity {
            session.add_item(product.clone());
        }
    }
    Ok(())
}

fn print_invoice(invoice: &InvoiceProjection, style: &DocumentStyle) {
    println!(
        "{}  {} {}",
        invoice.invoice_number(),
        style.format_date(invoice.created_at()),
        style.format_time(invoice.created_at())
    );
    if let Some(name) = invoice.customer_name() {
        println!("Customer: {name}");
    }
    for item in invoice.items() {
        println!(
            "  {:>3} x {:<28} {:>12}",
            item.quantity,
            item.item_name,
            style.money(item.line_total())
        );
    }
    println!("  Subtotal: {}", style.money(invoice.subtotal()));
    println!("  {}: {}", invoice.tax_label(), style.money(invoice.tax_total()));
    println!("  Total: {}", style.money(invoice.total_amount()));
}

fn save_pdf(invoice: &InvoiceProjection, style: &DocumentStyle, out: PathBuf) -> Result<(), String> {
    let path = if out.is_dir() {
        out.join(document_file_name(invoice.invoice_number()))
    } else {
        out
    };
    write_pdf(&InvoiceLayout::build(invoice, style), &path).map_err(|error| error.to_string())?;
    println!("Wrote {}", path.display());
    Ok(())
}
