use clap::Args;
use domain::catalog::ALL_CATEGORIES;

use super::context::Context;

#[derive(Debug, Args)]
pub(crate) struct ItemsArgs {
    /// Category to show
    #[arg(long, default_value = ALL_CATEGORIES)]
    category: String,

    /// Case-insensitive name search
    #[arg(long, default_value = "")]
    search: String,
}

pub(crate) async fn run(context: &Context, args: ItemsArgs) -> Result<(), String> {
    let catalog = context.catalog().await?;
    let symbol = &context.config.currency_symbol;

    println!("Categories: {}", catalog.categories().join(", "));

    let items = catalog.filter(&args.category, &args.search);
    if items.is_empty() {
        println!("No items found");
        return Ok(());
    }

    for item in items {
        let stock = if item.is_low_stock() {
            format!("  low stock: {}", item.stock_quantity)
        } else {
            String::new()
        };
        println!(
            "{:>5}  {:<32} {:>12}  {}{}",
            item.id.as_i64(),
            item.name,
            item.price.format_with(symbol),
            item.display_category(),
            stock
        );
    }

    Ok(())
}
