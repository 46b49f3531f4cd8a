//! livebox: manage Livebox port forwarding rules from the command line
//!
//! # Usage
//!
//! ```bash
//! export LIVEBOX_HOST=https://192.168.1.1
//! export LIVEBOX_PASSWORD=...
//!
//! livebox list
//! livebox get wireguard
//! livebox upsert wireguard udp 51820 51820 192.168.1.200
//! livebox upsert games tcp/udp 27015 27015 192.168.1.20 --range 15 --disabled
//! livebox delete wireguard
//! ```

use anyhow::{bail, Context, Result};
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

use livebox::{Client, ClientConfig, PortForwardingConfig, Protocol};

/// Operation requested on the command line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    List,
    Get { name: String },
    Upsert(PortForwardingConfig),
    Delete { name: String },
}

/// Command-line arguments
#[derive(Debug)]
struct Args {
    host: Option<String>,
    password: Option<String>,
    log_level: Level,
    command: Command,
}

enum Parsed {
    Run(Args),
    Help,
    Version,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Parsed> {
        let mut args = args.into_iter();
        let mut host = None;
        let mut password = None;
        let mut log_level = Level::WARN;
        let mut range = 0;
        let mut enabled = true;
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" => host = Some(args.next().context("--host requires a value")?),
                "--password" => password = Some(args.next().context("--password requires a value")?),
                "--log-level" => {
                    let level = args.next().context("--log-level requires a value")?;
                    log_level = level
                        .parse()
                        .with_context(|| format!("invalid log level: {level}"))?;
                }
                "--range" => {
                    let value = args.next().context("--range requires a value")?;
                    range = value
                        .parse()
                        .with_context(|| format!("invalid port range: {value}"))?;
                }
                "--disabled" => enabled = false,
                "-h" | "--help" => return Ok(Parsed::Help),
                "-v" | "--version" => return Ok(Parsed::Version),
                flag if flag.starts_with("--") => bail!("unknown argument: {flag}"),
                _ => positional.push(arg),
            }
        }

        let command = match positional.as_slice() {
            [cmd] if cmd == "list" => Command::List,
            [cmd, name] if cmd == "get" => Command::Get { name: name.clone() },
            [cmd, name] if cmd == "delete" => Command::Delete { name: name.clone() },
            [cmd, name, protocol, external, internal, destination] if cmd == "upsert" => {
                Command::Upsert(PortForwardingConfig {
                    name: name.clone(),
                    protocol: protocol.parse::<Protocol>()?,
                    external_port: external
                        .parse()
                        .with_context(|| format!("invalid external port: {external}"))?,
                    internal_port: internal
                        .parse()
                        .with_context(|| format!("invalid internal port: {internal}"))?,
                    port_range: range,
                    destination: destination.clone(),
                    enabled,
                })
            }
            [] => bail!("missing command; see --help"),
            other => bail!("invalid command: {}", other.join(" ")),
        };

        Ok(Parsed::Run(Self {
            host,
            password,
            log_level,
            command,
        }))
    }
}

fn print_help() {
    println!(
        r#"livebox v{}

Manage NAT port forwarding rules on a Livebox router.

USAGE:
    livebox [OPTIONS] <COMMAND>

COMMANDS:
    list                                   List all rules
    get <NAME>                             Show one rule
    upsert <NAME> <PROTOCOL> <EXTERNAL_PORT> <INTERNAL_PORT> <DESTINATION>
                                           Create or replace a rule
                                           PROTOCOL is one of tcp, udp, tcp/udp
    delete <NAME>                          Delete a rule

OPTIONS:
    --host <URI>            Router URI, e.g. https://192.168.1.1
    --password <PASSWORD>   Administrator password
    --range <N>             Extra ports forwarded after EXTERNAL_PORT [default: 0]
    --disabled              Create the rule disabled
    --log-level <LEVEL>     trace, debug, info, warn, error [default: warn]
    -h, --help              Print help information
    -v, --version           Print version information

ENVIRONMENT:
    LIVEBOX_HOST            Router URI used when --host is not given
    LIVEBOX_PASSWORD        Password used when --password is not given
    RUST_LOG                Additional log filter directives
"#,
        livebox::VERSION
    );
}

/// Initialize logging on stderr, keeping stdout for command output
fn init_logging(level: Level) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("rustls=warn".parse()?);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::resolve(args.host, args.password)?;
    debug!(?config, "resolved configuration");

    let client = Client::from_config(&config).await?;

    match args.command {
        Command::List => {
            let rules = client.list_port_forwardings().await?;
            println!("{}", serde_json::to_string_pretty(&rules)?);
        }
        Command::Get { name } => {
            let rule = client.get_port_forwarding(&name).await?;
            println!("{}", serde_json::to_string_pretty(&rule)?);
        }
        Command::Upsert(config) => {
            let rule = client.upsert_port_forwarding(config).await?;
            println!("{}", serde_json::to_string_pretty(&rule)?);
        }
        Command::Delete { name } => {
            client.delete_port_forwarding(&name).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match Args::parse(std::env::args().skip(1))? {
        Parsed::Run(args) => args,
        Parsed::Help => {
            print_help();
            return Ok(());
        }
        Parsed::Version => {
            println!("livebox v{}", livebox::VERSION);
            return Ok(());
        }
    };

    init_logging(args.log_level)?;

    run(args).await
}
