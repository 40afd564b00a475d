use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{ExpenseForm, Query};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "mera")]
#[command(about = "Personal expense tracker: record, filter, summarise and export expenses")]
pub struct Cli {
    /// Optional config file path (TOML).
    #[arg(long)]
    pub config: Option<String>,
    /// Override the data directory.
    #[arg(long)]
    pub data_dir: Option<String>,
    /// Override the display currency (INR, EUR).
    #[arg(long)]
    pub currency: Option<String>,
    /// Override timezone (IANA name).
    #[arg(long)]
    pub timezone: Option<String>,
    /// Override log level.
    #[arg(long)]
    pub level: Option<String>,
    /// TrueType font to embed in PDF exports.
    #[arg(long)]
    pub pdf_font: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new expense.
    Add(AddArgs),
    /// Change an existing expense.
    Edit(EditArgs),
    /// Delete an expense after confirmation.
    Delete(DeleteArgs),
    /// Show the statistics and the (filtered) list grouped by date.
    List(FilterArgs),
    /// Export the filtered list.
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub amount: String,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
    /// Defaults to today.
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: Uuid,
    #[arg(long)]
    pub amount: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: Uuid,
    /// Skip the confirmation prompt.
    #[arg(long, short)]
    pub yes: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Case-insensitive text searched in note and category.
    #[arg(long)]
    pub search: Option<String>,
    /// Only expenses on this date.
    #[arg(long)]
    pub on: Option<NaiveDate>,
    /// Only expenses in exactly this category.
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Pdf,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub format: ExportFormat,
    /// Output path; defaults to the export's file name.
    #[arg(long)]
    pub out: Option<String>,
    #[command(flatten)]
    pub filters: FilterArgs,
}

impl AddArgs {
    pub fn into_form(self) -> ExpenseForm {
        ExpenseForm {
            id: None,
            amount: self.amount,
            category: self.category.unwrap_or_default(),
            note: self.note.unwrap_or_default(),
            date: self.date,
        }
    }
}

impl EditArgs {
    /// Overwrites the loaded form with the fields given on the command line.
    pub fn apply(self, form: &mut ExpenseForm) {
        if let Some(amount) = self.amount {
            form.amount = amount;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(note) = self.note {
            form.note = note;
        }
        if let Some(date) = self.date {
            form.date = Some(date);
        }
    }
}

impl From<FilterArgs> for Query {
    fn from(args: FilterArgs) -> Self {
        Query {
            text: args.search,
            date: args.on,
            category: args.category,
        }
    }
}
