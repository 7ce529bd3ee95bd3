use anyhow::Result;
use blazar::{Error, Record};
use clap::Args;

use crate::format::{print_list, print_record, select_columns, OutputFormat};

/// Options shared by every listing.
#[derive(Args, Clone, Debug)]
pub struct ListArgs {
    #[arg(long, help = "Column name used to sort result")]
    pub sort_by: Option<String>,

    #[arg(
        short = 'c',
        long = "column",
        help = "Column to include, can be repeated"
    )]
    pub columns: Vec<String>,

    #[arg(short, long, value_enum, default_value = "table", help = "Output format")]
    pub format: OutputFormat,
}

impl ListArgs {
    /// The sort column, falling back to `default`. Only listed columns are accepted.
    pub fn sort_key(&self, default: &str, list_columns: &[&str]) -> Result<String, Error> {
        let key = self.sort_by.as_deref().unwrap_or(default);
        if list_columns.contains(&key) {
            Ok(key.to_string())
        } else {
            Err(Error::InvalidArgument(format!("Invalid sort option {}", key)))
        }
    }

    pub fn print(&self, records: &[Record], list_columns: &[&str]) -> Result<()> {
        let columns = select_columns(records, &self.columns, list_columns);
        print_list(records, &columns, self.format)
    }
}

#[derive(Args, Clone, Debug)]
pub struct ShowArgs {
    #[arg(short, long, value_enum, default_value = "table", help = "Output format")]
    pub format: OutputFormat,
}

impl ShowArgs {
    pub fn print(&self, record: &Record) -> Result<()> {
        print_record(record, self.format)
    }

    /// Prints `message` ahead of the record unless a machine format was asked for.
    pub fn print_with(&self, message: &str, record: &Record) -> Result<()> {
        if self.format == OutputFormat::Table {
            println!("{}", message);
        }
        self.print(record)
    }
}
