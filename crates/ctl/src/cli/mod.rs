pub mod allocation;
pub mod completion;
pub mod device;
pub mod floatingip;
pub mod host;
pub mod lease;
pub mod list;
pub mod network;
pub mod resource;

use std::{io::Write, time::Duration};

use anyhow::Result;
use blazar::{client::DEFAULT_USER_AGENT, BlazarClient, ClientOptions};
use clap::{ArgAction, Parser, Subcommand};
use log::{debug, LevelFilter, Record};
use url::Url;

use crate::cli::{
    allocation::AllocationCommand, completion::BashCompletionCommand, device::DeviceCommand,
    floatingip::FloatingIpCommand, host::HostCommand, lease::LeaseCommand,
    network::NetworkCommand,
};

#[derive(Parser)]
#[command(
    name = "blazarctl",
    version,
    about = "Command-line interface to the blazar resource reservation service"
)]
pub struct ControlCommand {
    #[arg(
        long,
        env = "OS_RESERVATION_URL",
        help = "Endpoint of the reservation service, including its version prefix"
    )]
    os_reservation_url: Option<Url>,

    #[arg(
        long,
        env = "OS_AUTH_TOKEN",
        hide_env_values = true,
        help = "Authentication token sent with every request"
    )]
    os_auth_token: Option<String>,

    #[arg(
        long,
        env = "OS_RESERVATION_API_VERSION",
        default_value = "1",
        help = "Reservation API version"
    )]
    os_reservation_api_version: String,

    #[arg(long, default_value_t = 30, help = "Request timeout in seconds")]
    timeout: u64,

    #[arg(long, global = true, help = "Print debugging output")]
    pub debug: bool,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase verbosity of output, can be repeated"
    )]
    verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Suppress output except errors, each use cancels one --verbose"
    )]
    quiet: u8,

    #[command(subcommand)]
    command: ControlCommands,
}

#[derive(Subcommand)]
pub enum ControlCommands {
    Lease(LeaseCommand),
    Host(HostCommand),
    Network(NetworkCommand),
    Device(DeviceCommand),
    #[command(name = "floatingip")]
    FloatingIp(FloatingIpCommand),
    Allocation(AllocationCommand),
    BashCompletion(BashCompletionCommand),
}

/// State shared by every subcommand of one invocation.
pub struct ShellContext {
    pub options: ClientOptions,
    pub api_version: String,
    /// Arguments given after a literal `--`.
    pub values_specs: Vec<String>,
}

impl ShellContext {
    pub fn client(&self) -> Result<BlazarClient> {
        Ok(BlazarClient::new(&self.api_version, self.options.clone())?)
    }
}

/// Log lines carry the message only, with no level or timestamp.
pub fn write_log_line<W: Write>(buf: &mut W, record: &Record) -> std::io::Result<()> {
    writeln!(buf, "{}", record.args())
}

/// Splits the arguments at the first literal `--`. The first half goes to
/// the parser, the rest is handed to commands untouched.
pub fn split_values_specs(mut args: Vec<String>) -> (Vec<String>, Vec<String>) {
    match args.iter().position(|x| x == "--") {
        Some(index) => {
            let rest = args.split_off(index);
            (args, rest.into_iter().skip(1).collect())
        }
        None => (args, Vec::new()),
    }
}

impl ControlCommand {
    pub fn log_level(&self) -> LevelFilter {
        if self.debug {
            return LevelFilter::Debug;
        }
        match i16::from(self.verbose) - i16::from(self.quiet) {
            i16::MIN..=-1 => LevelFilter::Error,
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }

    fn context(&self, values_specs: Vec<String>) -> ShellContext {
        ShellContext {
            options: ClientOptions {
                endpoint: self.os_reservation_url.clone(),
                auth_token: self.os_auth_token.clone(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                timeout: Duration::from_secs(self.timeout),
            },
            api_version: self.os_reservation_api_version.clone(),
            values_specs,
        }
    }

    pub async fn run(self, values_specs: Vec<String>) -> Result<()> {
        let context = self.context(values_specs);
        if !context.values_specs.is_empty() {
            debug!("extra arguments: {:?}", context.values_specs);
        }
        self.command.run(&context).await
    }
}

impl ControlCommands {
    pub async fn run(self, context: &ShellContext) -> Result<()> {
        match self {
            ControlCommands::Lease(lease) => lease.run(context).await,

            ControlCommands::Host(host) => host.run(context).await,

            ControlCommands::Network(network) => network.run(context).await,

            ControlCommands::Device(device) => device.run(context).await,

            ControlCommands::FloatingIp(floatingip) => floatingip.run(context).await,

            ControlCommands::Allocation(allocation) => allocation.run(context).await,

            ControlCommands::BashCompletion(completion) => completion.run(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(args: &[&str]) -> ControlCommand {
        ControlCommand::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_split_values_specs() {
        let args = ["blazarctl", "host", "list", "--", "--foo", "bar"]
            .iter()
            .map(|x| x.to_string())
            .collect();
        let (args, values_specs) = split_values_specs(args);
        assert_eq!(args, vec!["blazarctl", "host", "list"]);
        assert_eq!(values_specs, vec!["--foo", "bar"]);

        let (args, values_specs) = split_values_specs(vec!["blazarctl".to_string()]);
        assert_eq!(args, vec!["blazarctl"]);
        assert!(values_specs.is_empty());
    }

    #[test]
    fn test_verbosity() {
        assert_eq!(parse(&["blazarctl", "lease", "list"]).log_level(), LevelFilter::Warn);
        assert_eq!(
            parse(&["blazarctl", "-v", "lease", "list"]).log_level(),
            LevelFilter::Info
        );
        assert_eq!(
            parse(&["blazarctl", "lease", "list", "-vv"]).log_level(),
            LevelFilter::Debug
        );
        assert_eq!(
            parse(&["blazarctl", "-q", "lease", "list"]).log_level(),
            LevelFilter::Error
        );
        assert_eq!(
            parse(&["blazarctl", "--debug", "-q", "lease", "list"]).log_level(),
            LevelFilter::Debug
        );
    }

    #[test]
    fn test_quiet_and_verbose_together() {
        assert_eq!(
            parse(&["blazarctl", "-q", "-v", "lease", "list"]).log_level(),
            LevelFilter::Warn
        );
        assert_eq!(
            parse(&["blazarctl", "-q", "lease", "list", "-vv"]).log_level(),
            LevelFilter::Info
        );
        assert_eq!(
            parse(&["blazarctl", "-v", "-qq", "lease", "list"]).log_level(),
            LevelFilter::Error
        );
    }

    #[test]
    fn test_log_line_is_message_only() {
        let mut buf = Vec::new();
        let record = Record::builder()
            .args(format_args!("Lease name already exists"))
            .level(log::Level::Error)
            .target("blazarctl")
            .build();
        write_log_line(&mut buf, &record).unwrap();
        assert_eq!(buf, b"Lease name already exists\n");
    }

    #[test]
    fn test_context_options() {
        let command = parse(&[
            "blazarctl",
            "--os-reservation-url",
            "http://blazar:1234/v1",
            "--os-auth-token",
            "token",
            "--os-reservation-api-version",
            "1a0",
            "--timeout",
            "5",
            "lease",
            "list",
        ]);
        let context = command.context(Vec::new());
        assert_eq!(
            context.options.endpoint.as_ref().map(Url::as_str),
            Some("http://blazar:1234/v1")
        );
        assert_eq!(context.options.timeout, Duration::from_secs(5));
        assert_eq!(context.client().unwrap().version(), "1a0");
    }

    #[test]
    fn test_missing_credentials() {
        let command = ControlCommand::try_parse_from(["blazarctl", "lease", "list"]).unwrap();
        let context = ShellContext {
            options: ClientOptions::default(),
            ..command.context(Vec::new())
        };
        let error = context.client().err().unwrap();
        assert!(matches!(
            error.downcast_ref::<blazar::Error>(),
            Some(blazar::Error::InsufficientAuthInformation)
        ));
    }
}
