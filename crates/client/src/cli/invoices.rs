use chrono::NaiveDate;
use clap::Args;
use projections::{HistoryFilter, SystemClock};

use super::context::Context;

#[derive(Debug, Args)]
pub(crate) struct HistoryArgs {
    /// Matches invoice number or customer name
    #[arg(long)]
    search: Option<String>,

    /// First day to include (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

pub(crate) async fn history(context: &Context, args: HistoryArgs) -> Result<(), String> {
    let mut filter = HistoryFilter::new()
        .with_date_range(args.from, args.to)
        .map_err(|error| error.to_string())?;
    if let Some(search) = args.search.as_deref() {
        filter = filter.with_search(search);
    }

    let invoices = context.history().await?.filter(&filter).await;
    if invoices.is_empty() {
        println!("No invoices found");
        return Ok(());
    }

    let style = context.style().await?;
    for invoice in invoices {
        println!(
            "{:<28} {:<18} {:<10} {:<24} {:>12}",
            invoice.invoice_number,
            style.format_date(invoice.created_at),
            invoice.status.as_str(),
            invoice.customer_name.as_deref().unwrap_or("-"),
            style.money(invoice.total_amount)
        );
    }

    Ok(())
}

pub(crate) async fn summary(context: &Context) -> Result<(), String> {
    let summary = context.history().await?.summary(&SystemClock).await;
    let symbol = &context.config.currency_symbol;

    println!("Total revenue:       {}", summary.total_revenue.format_with(symbol));
    println!("Orders:              {}", summary.order_count);
    println!("Average order value: {}", summary.average_order_value.format_with(symbol));
    println!(
        "Today ({}):     {} from {} orders",
        summary.today,
        summary.today_revenue.format_with(symbol),
        summary.today_order_count
    );

    Ok(())
}
