use clap::{Args, Parser, Subcommand};
use client::Config;

mod context;
mod export;
mod invoices;
mod items;
mod login;
mod orders;
mod tables;

use context::Context;

#[derive(Debug, Parser)]
#[command(name = "pos", about = "Point-of-sale client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// Backend base URL; overrides POS_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token; overrides POS_API_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and print a bearer token
    Login(login::LoginArgs),
    /// Browse the product catalog
    Items(items::ItemsArgs),
    /// Show tables and which have a saved order
    Tables,
    /// List saved table orders
    Pending,
    /// Search past invoices
    History(invoices::HistoryArgs),
    /// Show revenue and order counts
    Summary,
    /// Write an invoice PDF
    Pdf(export::PdfArgs),
    /// Print the share message and messaging link for an invoice
    Share(export::ShareArgs),
    /// Save items as a table's pending order
    Order(orders::OrderArgs),
    /// Bill items directly without a table
    Checkout(orders::CheckoutArgs),
    /// Finalise a saved table order
    Complete(orders::CompleteArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        let config = self.config()?;
        client::telemetry::init(&config).map_err(|error| error.to_string())?;
        let context = Context::new(config)?;

        match self.command {
            Commands::Login(args) => login::run(&context, args).await,
            Commands::Items(args) => items::run(&context, args).await,
            Commands::Tables => tables::run(&context).await,
            Commands::Pending => tables::pending(&context).await,
            Commands::History(args) => invoices::history(&context, args).await,
            Commands::Summary => invoices::summary(&context).await,
            Commands::Pdf(args) => export::pdf(&context, args).await,
            Commands::Share(args) => export::share(&context, args).await,
            Commands::Order(args) => orders::order(&context, args).await,
            Commands::Checkout(args) => orders::checkout(&context, args).await,
            Commands::Complete(args) => orders::complete(&context, args).await,
        }
    }

    fn config(&self) -> Result<Config, String> {
        let mut config = Config::from_env().map_err(|error| error.to_string())?;
        if let Some(url) = self.global.api_url.as_deref() {
            config = config.with_api_url(url).map_err(|error| error.to_string())?;
        }
        if let Some(token) = self.global.token.clone() {
            config.api_token = Some(token);
        }
        Ok(config)
    }
}
