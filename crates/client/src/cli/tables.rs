use session::PosBackend;

use super::context::{Context, describe, describe_session};

pub(crate) async fn run(context: &Context) -> Result<(), String> {
    let settings = context.backend.settings().await.map_err(|e| describe(&e))?;
    let session = context.session();
    session
        .refresh_pending()
        .await
        .map_err(|e| describe_session(&e))?;

    let board = session.table_board(&settings);
    for table in board.tables() {
        println!("{}", table.label());
    }
    println!("{} of {} tables active", board.active_count(), board.tables().len());

    Ok(())
}

pub(crate) async fn pending(context: &Context) -> Result<(), String> {
    let session = context.session();
    let count = session
        .refresh_pending()
        .await
        .map_err(|e| describe_session(&e))?;
    if count == 0 {
        println!("No pending orders");
        return Ok(());
    }

    let symbol = &context.config.currency_symbol;
    for order in session.pending_orders() {
        let table = order
            .table_number
            .map(|t| format!("Table {t}"))
            .unwrap_or_else(|| "No table".to_string());
        let quantity: u32 = order.items.iter().map(|item| item.quantity).sum();
        println!(
            "#{:<6} {:<10} {:<28} {:>4} items  {:>12}",
            order.id.as_i64(),
            table,
            order.invoice_number,
            quantity,
            order.total_amount.format_with(symbol)
        );
    }

    Ok(())
}
