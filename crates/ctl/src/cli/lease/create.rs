use anyhow::Result;
use blazar::lease::{LeaseCreateArgs, START_NOW};
use chrono::Utc;
use clap::Parser;
use log::debug;

use crate::cli::{list::ShowArgs, ShellContext};

#[derive(Parser)]
#[command(about = "Create a lease")]
pub struct LeaseCreateCommand {
    #[arg(help = "Name for the lease")]
    name: String,

    #[arg(
        long = "start-date",
        value_name = "YYYY-MM-DD HH:MM",
        default_value = START_NOW,
        help = "Time in UTC for starting the lease (default: current time on the server)"
    )]
    start: String,

    #[arg(
        long = "end-date",
        value_name = "YYYY-MM-DD HH:MM",
        help = "Time in UTC for ending the lease (default: 24h from now)"
    )]
    end: Option<String>,

    #[arg(
        long = "before-end-date",
        value_name = "YYYY-MM-DD HH:MM",
        help = "Time in UTC for taking an action before the end of the lease"
    )]
    before_end: Option<String>,

    #[arg(
        long = "physical-reservation",
        value_name = "min=int,max=int,hypervisor_properties=str,resource_properties=str,before_end=str",
        help = "Reservation of physical compute hosts, can be repeated"
    )]
    physical_reservations: Vec<String>,

    #[arg(
        long = "reservation",
        value_name = "key=value",
        help = "Reservation of any resource type, selected with resource_type=<type>, can be repeated"
    )]
    reservations: Vec<String>,

    #[arg(
        long = "event",
        value_name = "event_type=str,event_date=time",
        help = "Event to schedule on the lease, can be repeated"
    )]
    events: Vec<String>,

    #[command(flatten)]
    show: ShowArgs,
}

impl LeaseCreateCommand {
    pub fn args(&self) -> LeaseCreateArgs {
        LeaseCreateArgs {
            name: self.name.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            before_end: self.before_end.clone(),
            reservations: self.reservations.clone(),
            physical_reservations: self.physical_reservations.clone(),
            events: self.events.clone(),
        }
    }

    pub async fn run(self, context: &ShellContext) -> Result<()> {
        let request = self.args().to_request(Utc::now().naive_utc())?;
        debug!("lease request: {}", serde_json::to_string(&request)?);
        let client = context.client()?;
        let lease = client.leases().create(&request).await?;
        self.show.print_with("Created a new lease:", &lease)
    }
}

#[cfg(test)]
mod test {
    use blazar::{timeutil::parse_api_date, Error};

    use super::*;

    #[test]
    fn test_repeated_reservations() {
        let command = LeaseCreateCommand::try_parse_from([
            "create",
            "lease-1",
            "--end-date",
            "2030-01-02 10:00",
            "--physical-reservation",
            "min=1,max=2",
            "--reservation",
            "resource_type=virtual:floatingip,network_id=ext-net,amount=2",
            "--event",
            "event_type=notification,event_date=2030-01-02 09:00",
        ])
        .unwrap();
        assert_eq!(command.start, "now");

        let request = command
            .args()
            .to_request(parse_api_date("2030-01-01 00:00").unwrap())
            .unwrap();
        assert_eq!(request.reservations.len(), 2);
        assert_eq!(request.reservations[1]["amount"], 2);
        assert_eq!(request.events.len(), 1);
    }

    #[test]
    fn test_start_after_end() {
        let command = LeaseCreateCommand::try_parse_from([
            "create",
            "lease-1",
            "--start-date",
            "2030-01-03 00:00",
            "--end-date",
            "2030-01-02 00:00",
            "--physical-reservation",
            "min=1,max=1",
        ])
        .unwrap();
        let error = command
            .args()
            .to_request(parse_api_date("2030-01-01 00:00").unwrap())
            .unwrap_err();
        assert!(matches!(error, Error::IncorrectLease(_)));
    }
}
