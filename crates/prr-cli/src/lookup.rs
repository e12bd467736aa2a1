//! # Lookup Subcommand
//!
//! Read-only listings over the network, printed one report line each.

use anyhow::Result;
use clap::{Args, Subcommand};

use prr_network::{Network, Report};

/// Arguments for the `prr lookup` subcommand.
#[derive(Args, Debug)]
pub struct LookupArgs {
    #[command(subcommand)]
    pub command: LookupCommand,
}

/// Lookup subcommands.
#[derive(Subcommand, Debug)]
pub enum LookupCommand {
    /// All clients.
    Clients,
    /// Clients with debts, largest debt first.
    ClientsWithDebts,
    /// Clients without debts.
    ClientsWithoutDebts,
    /// All terminals.
    Terminals,
    /// Terminals that never took part in a communication.
    Unused,
    /// Terminals whose payments exceed their debts.
    PositiveBalance,
    /// All communications.
    Communications,
    /// Communications sent from the client's terminals.
    From {
        /// Client key.
        client: String,
    },
    /// Communications received by the client's terminals.
    To {
        /// Client key.
        client: String,
    },
    /// Network-wide payments and debts.
    Global,
}

/// Execute the lookup subcommand.
pub fn run_lookup(args: &LookupArgs, network: &Network) -> Result<u8> {
    match &args.command {
        LookupCommand::Clients => print_all(network.clients().map(Report::Client)),
        LookupCommand::ClientsWithDebts => {
            print_all(network.clients_with_debts().into_iter().map(Report::Client))
        }
        LookupCommand::ClientsWithoutDebts => {
            print_all(network.clients_without_debts().map(Report::Client))
        }
        LookupCommand::Terminals => print_all(network.terminals().map(Report::Terminal)),
        LookupCommand::Unused => print_all(network.unused_terminals().map(Report::Terminal)),
        LookupCommand::PositiveBalance => {
            print_all(network.terminals_with_positive_balance().map(Report::Terminal))
        }
        LookupCommand::Communications => {
            print_all(network.communications().map(Report::Communication))
        }
        LookupCommand::From { client } => print_all(
            network
                .communications_from_client(client)?
                .into_iter()
                .map(Report::Communication),
        ),
        LookupCommand::To { client } => print_all(
            network
                .communications_to_client(client)?
                .into_iter()
                .map(Report::Communication),
        ),
        LookupCommand::Global => {
            println!(
                "payments {} debts {}",
                network.global_payments().round(),
                network.global_debts().round()
            );
        }
    }
    Ok(0)
}

fn print_all<'a>(reports: impl Iterator<Item = Report<'a>>) {
    for report in reports {
        println!("{report}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prr_core::{NetworkError, TaxId};

    fn run(network: &Network, command: LookupCommand) -> Result<u8> {
        run_lookup(&LookupArgs { command }, network)
    }

    #[test]
    fn every_listing_succeeds_on_a_populated_network() {
        let mut net = Network::default();
        net.register_client("ana", "Ana", TaxId(1)).unwrap();
        net.register_terminal("FANCY", "111111", "ana").unwrap();
        net.register_terminal("BASIC", "222222", "ana").unwrap();
        net.send_sms("111111", "222222", "hello").unwrap();

        let commands = [
            LookupCommand::Clients,
            LookupCommand::ClientsWithDebts,
            LookupCommand::ClientsWithoutDebts,
            LookupCommand::Terminals,
            LookupCommand::Unused,
            LookupCommand::PositiveBalance,
            LookupCommand::Communications,
            LookupCommand::From { client: "ana".into() },
            LookupCommand::To { client: "ana".into() },
            LookupCommand::Global,
        ];
        for command in commands {
            assert_eq!(run(&net, command).unwrap(), 0);
        }
    }

    #[test]
    fn unknown_client_is_an_error() {
        let net = Network::default();
        let err = run(&net, LookupCommand::From { client: "zed".into() }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NetworkError>(),
            Some(NetworkError::UnknownClientKey(_))
        ));
    }
}
