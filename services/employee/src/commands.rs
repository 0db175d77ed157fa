use std::path::PathBuf;
use std::sync::Arc;

use billed::config::AppConfig;
use billed::error::AppError;
use billed::workflows::bills::{
    render_bills_page, render_new_bill_page, BillForm, BillListing, BillSubmission, BillsPage,
    ReceiptFile, Route, SubmissionError,
};
use chrono::{Local, NaiveDate};
use clap::Args;
use tracing::info;

use crate::infra::{ConsoleAlert, ConsoleModal, ConsoleNavigator, InMemoryBillStore};

const DEMO_RECEIPT_PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

#[derive(Args, Debug, Default)]
pub(crate) struct ListArgs {
    /// Bills JSON fixture to seed the store with (overrides BILLED_FIXTURES)
    #[arg(long)]
    pub(crate) fixtures: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct NewBillArgs {
    /// Receipt image to upload (jpg, jpeg or png)
    #[arg(long)]
    pub(crate) receipt: PathBuf,
    /// Expense category, e.g. "Transports"
    #[arg(long)]
    pub(crate) expense_type: String,
    /// Short label for the expense
    #[arg(long)]
    pub(crate) name: String,
    /// Amount in euros, VAT included
    #[arg(long)]
    pub(crate) amount: u32,
    /// Expense date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) date: NaiveDate,
    #[arg(long, default_value = "")]
    pub(crate) vat: String,
    /// VAT percentage (defaults to 20)
    #[arg(long)]
    pub(crate) pct: Option<u32>,
    #[arg(long, default_value = "")]
    pub(crate) commentary: String,
    /// Bills JSON fixture to seed the store with (overrides BILLED_FIXTURES)
    #[arg(long)]
    pub(crate) fixtures: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Bills JSON fixture to seed the store with (overrides BILLED_FIXTURES)
    #[arg(long)]
    pub(crate) fixtures: Option<PathBuf>,
}

/// Adapters shared by both pages for one command run.
struct Workbench {
    config: AppConfig,
    store: Arc<InMemoryBillStore>,
    navigator: Arc<ConsoleNavigator>,
}

impl Workbench {
    fn new(config: &AppConfig, fixtures: Option<PathBuf>) -> Result<Self, AppError> {
        let fixtures = fixtures.or_else(|| config.store.fixtures.clone());
        let store = InMemoryBillStore::from_fixture(fixtures.as_deref())?;
        Ok(Self {
            config: config.clone(),
            store: Arc::new(store),
            navigator: Arc::new(ConsoleNavigator::default()),
        })
    }

    fn listing(&self) -> BillListing {
        BillListing::new(
            self.store.clone(),
            self.navigator.clone(),
            Arc::new(ConsoleModal::new(self.config.ui.modal_width)),
            self.config.session.user.clone(),
        )
    }

    fn submission(&self) -> BillSubmission {
        BillSubmission::new(
            self.store.clone(),
            self.navigator.clone(),
            Arc::new(ConsoleAlert),
            self.config.session.user.clone(),
        )
    }

    /// Render whatever page the last navigation signal pointed at.
    async fn follow_navigation(&self) {
        match self.navigator.take_route() {
            Some(Route::Bills) => {
                let page = self.listing().load_page().await;
                println!("{}", render_bills_page(&page));
            }
            Some(Route::NewBill) => println!("{}", render_new_bill_page()),
            Some(other) => info!(route = %other, "route is handled by another shell"),
            None => {}
        }
    }
}

pub(crate) async fn run_list(config: &AppConfig, args: ListArgs) -> Result<(), AppError> {
    let bench = Workbench::new(config, args.fixtures)?;
    let page = bench.listing().load_page().await;
    println!("{}", render_bills_page(&page));
    Ok(())
}

pub(crate) async fn run_new_bill(config: &AppConfig, args: NewBillArgs) -> Result<(), AppError> {
    let NewBillArgs {
        receipt,
        expense_type,
        name,
        amount,
        date,
        vat,
        pct,
        commentary,
        fixtures,
    } = args;

    let bench = Workbench::new(config, fixtures)?;
    let bytes = std::fs::read(&receipt)?;
    let file_name = receipt
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = mime_guess::from_path(&receipt).first_or_octet_stream();

    let mut submission = bench.submission();
    submission
        .on_file_selected(ReceiptFile::new(file_name, content_type, bytes))
        .await?;
    submission
        .on_submit(BillForm {
            expense_type,
            name,
            amount,
            date,
            vat,
            pct,
            commentary,
        })
        .await?;

    bench.follow_navigation().await;
    Ok(())
}

pub(crate) async fn run_demo(config: &AppConfig, args: DemoArgs) -> Result<(), AppError> {
    let bench = Workbench::new(config, args.fixtures)?;
    let listing = bench.listing();

    println!("Bill list for {}", config.session.user.email);
    println!("{}", render_bills_page(&BillsPage::Loading));
    let page = listing.load_page().await;
    println!("{}", render_bills_page(&page));

    if let BillsPage::Ready(rows) = &page {
        if let Some(first) = rows.first() {
            println!("Previewing receipt of '{}'", first.name);
            listing.on_view_bill(first);
        }
    }

    listing.on_create_new_bill();
    bench.follow_navigation().await;

    let mut submission = bench.submission();
    match submission
        .on_file_selected(ReceiptFile::new("notes.txt", mime::TEXT_PLAIN, Vec::new()))
        .await
    {
        Err(SubmissionError::UnsupportedReceipt { file_name }) => {
            println!("Receipt '{file_name}' refused, picking an image instead");
        }
        Err(other) => return Err(other.into()),
        Ok(_) => {}
    }

    let draft = submission
        .on_file_selected(ReceiptFile::new(
            "receipt-demo.png",
            mime::IMAGE_PNG,
            DEMO_RECEIPT_PNG.to_vec(),
        ))
        .await?;
    println!("Draft {} stored at {}", draft.key, draft.file_url);

    submission
        .on_submit(BillForm {
            expense_type: "Transports".to_string(),
            name: "Vol Paris Londres".to_string(),
            amount: 348,
            date: Local::now().date_naive(),
            vat: "70".to_string(),
            pct: None,
            commentary: "Demo submission".to_string(),
        })
        .await?;

    bench.follow_navigation().await;
    Ok(())
}
