use anyhow::Result;
use blazar::lease::LeaseUpdate;
use clap::Parser;

use crate::cli::ShellContext;

#[derive(Parser)]
#[command(about = "Update a lease")]
pub struct LeaseUpdateCommand {
    #[arg(help = "ID or name of the lease to update")]
    id: String,

    #[arg(long, help = "New name for the lease")]
    name: Option<String>,

    #[arg(
        long = "reservation",
        value_name = "id=reservation-id,key=value",
        help = "Reservation values to update, can be repeated"
    )]
    reservations: Vec<String>,

    #[arg(
        long,
        value_name = "TIME",
        conflicts_with_all = ["reduce_by", "end_date"],
        help = "Time to prolong the lease for, e.g. 30m, 2h or 1d"
    )]
    prolong_for: Option<String>,

    #[arg(
        long,
        value_name = "TIME",
        conflicts_with = "end_date",
        help = "Time to reduce the lease by"
    )]
    reduce_by: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "End date of the lease")]
    end_date: Option<String>,

    #[arg(
        long,
        value_name = "TIME",
        conflicts_with_all = ["advance_by", "start_date"],
        help = "Time to defer the lease start by"
    )]
    defer_by: Option<String>,

    #[arg(
        long,
        value_name = "TIME",
        conflicts_with = "start_date",
        help = "Time to advance the lease start by"
    )]
    advance_by: Option<String>,

    #[arg(long, value_name = "YYYY-MM-DD HH:MM", help = "Start date of the lease")]
    start_date: Option<String>,
}

impl LeaseUpdateCommand {
    pub fn update(&self) -> Result<LeaseUpdate> {
        Ok(LeaseUpdate {
            name: self.name.clone(),
            prolong_for: self.prolong_for.clone(),
            reduce_by: self.reduce_by.clone(),
            end_date: self.end_date.clone(),
            defer_by: self.defer_by.clone(),
            advance_by: self.advance_by.clone(),
            start_date: self.start_date.clone(),
            reservations: LeaseUpdate::parse_reservations(&self.reservations)?,
        })
    }

    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let update = self.update()?;
        let client = context.client()?;
        let leases = client.leases();
        let id = leases.resolve(&self.id).await?;
        leases.update(&id, &update).await?;
        println!("Updated lease: {}", self.id);
        Ok(())
    }
}
