use std::path::PathBuf;

use clap::Args;
use documents::{InvoiceLayout, ShareAction, document_file_name, write_pdf};

use super::context::Context;

#[derive(Debug, Args)]
pub(crate) struct PdfArgs {
    /// Invoice number as printed on the invoice
    invoice_number: String,

    /// Output file or directory; defaults to the current directory
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct ShareArgs {
    /// Invoice number as printed on the invoice
    invoice_number: String,
}

pub(crate) async fn pdf(context: &Context, args: PdfArgs) -> Result<(), String> {
    let invoice = context.find_invoice(&args.invoice_number).await?;
    let style = context.style().await?;

    let file_name = document_file_name(invoice.invoice_number());
    let path = match args.out {
        Some(out) if out.is_dir() => out.join(file_name),
        Some(out) => out,
        None => PathBuf::from(file_name),
    };

    let layout = InvoiceLayout::build(&invoice, &style);
    write_pdf(&layout, &path).map_err(|error| error.to_string())?;

    println!("Wrote {} ({} pages)", path.display(), layout.pages().len());
    Ok(())
}

pub(crate) async fn share(context: &Context, args: ShareArgs) -> Result<(), String> {
    let invoice = context.find_invoice(&args.invoice_number).await?;
    let style = context.style().await?;

    let action = ShareAction::for_invoice(&invoice, &style);
    println!("{}", action.message);
    println!();
    match action.link {
        Some(link) => println!("{link}"),
        None => println!("Sharing unavailable: no valid customer phone number"),
    }

    Ok(())
}
