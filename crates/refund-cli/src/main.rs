use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use expense_ledger::{ExpenseCategory, ExpenseRecord, Ledger};
use receipt_report::{Amount, ReportOptions, ReportRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "refund", about = "Expense reimbursement intake and report tool", version)]
struct Cli {
    /// Expense ledger file
    #[arg(long, global = true, default_value = "expenses.csv")]
    ledger: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete every recorded expense
    Reset,

    /// Record one expense with its receipts
    Add {
        /// Person who paid
        #[arg(long, default_value = "")]
        payer: String,

        /// Person who approved the expense
        #[arg(long)]
        approver: String,

        /// Expense category
        #[arg(long, value_enum)]
        category: CategoryArg,

        /// Amount in RSD, e.g. 1250.00
        #[arg(long)]
        amount: Amount,

        /// Receipt file(s): .jpg, .jpeg, .png or .pdf
        #[arg(short, long, required = true, num_args = 1..)]
        receipt: Vec<PathBuf>,

        /// Directory receipts are copied into
        #[arg(long, default_value = "uploads")]
        uploads: PathBuf,
    },

    /// Show totals per category
    Summary,

    /// Compile the PDF report
    Compile {
        /// Requester name (defaults to the payer of the latest expense)
        #[arg(long)]
        requester: Option<String>,

        /// Approver name (defaults to the approver of the latest expense)
        #[arg(long)]
        approver: Option<String>,

        /// Request date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Output PDF file (defaults to reimbursement_<date>.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report options JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Abort if compilation takes longer than this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },

    /// Write the default report options to a JSON file
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Transport,
    Fuel,
    Tolls,
    Representation,
    Other,
}

impl From<CategoryArg> for ExpenseCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Transport => Self::Transport,
            CategoryArg::Fuel => Self::Fuel,
            CategoryArg::Tolls => Self::Tolls,
            CategoryArg::Representation => Self::Representation,
            CategoryArg::Other => Self::Other,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ledger = Ledger::new(&cli.ledger);

    match cli.command {
        Commands::Reset => {
            ledger.reset().await?;
            println!("Ledger reset → {}", cli.ledger.display());
        }

        Commands::Add {
            payer,
            approver,
            category,
            amount,
            receipt,
            uploads,
        } => {
            let mut receipts = Vec::with_capacity(receipt.len());
            for path in &receipt {
                receipts.push(expense_ledger::store_upload(path, &uploads).await?);
            }

            let record = ExpenseRecord::new(payer, approver, category.into(), amount, receipts);
            ledger.append(&record).await?;
            println!(
                "Added {} {} to {} ({} receipt(s))",
                record.amount,
                record.currency,
                record.category,
                record.receipts.len()
            );
        }

        Commands::Summary => {
            let records = ledger.load().await?;
            if records.is_empty() {
                println!("No expenses recorded.");
                return Ok(());
            }

            let summaries = expense_ledger::aggregate(&records)?;
            let total = expense_ledger::grand_total(&records)?;

            println!("Totals by category:");
            for summary in summaries {
                println!(
                    "  {}: {} {} ({} receipt(s))",
                    summary.label,
                    summary.total,
                    expense_ledger::CURRENCY,
                    summary.receipts.len()
                );
            }
            println!("TOTAL: {} {}", total, expense_ledger::CURRENCY);
        }

        Commands::Compile {
            requester,
            approver,
            date,
            output,
            config,
            deadline_secs,
        } => {
            let records = ledger.load().await?;
            let Some(latest) = records.last() else {
                bail!("No expenses recorded, nothing to report");
            };

            let mut options = match config {
                Some(path) => ReportOptions::load(&path).await?,
                None => ReportOptions::default(),
            };
            if deadline_secs.is_some() {
                options.deadline_secs = deadline_secs;
            }

            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let request = ReportRequest {
                requester: requester.unwrap_or_else(|| latest.payer.clone()),
                approver: approver.unwrap_or_else(|| latest.approver.clone()),
                date,
                categories: expense_ledger::aggregate(&records)?,
            };

            let report = receipt_report::compile_report(&request, &options).await?;
            let output =
                output.unwrap_or_else(|| PathBuf::from(receipt_report::default_file_name(date)));
            receipt_report::save_report(&report, &output).await?;

            println!("Report Statistics:");
            println!("  Pages: {}", report.page_count);
            println!("  Receipt pages: {}", report.receipt_pages());
            println!("  Duplicates skipped: {}", report.statistics.duplicates);
            for skipped in &report.skipped {
                println!(
                    "  Skipped {}: {}",
                    skipped.receipt.path.display(),
                    skipped.reason
                );
            }
            if report.receipt_pages() == 0 {
                log::warn!("The report contains only the summary page");
            }
            println!("Compiled → {}", output.display());
        }

        Commands::InitConfig { path } => {
            ReportOptions::default().save(&path).await?;
            println!("Default options → {}", path.display());
        }
    }

    Ok(())
}
