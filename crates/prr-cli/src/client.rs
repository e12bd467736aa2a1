//! # Client Subcommand
//!
//! Client registration, inspection and notification settings.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use prr_core::TaxId;
use prr_network::{Network, Report};
use prr_state::DeliveryMethod;

/// Arguments for the `prr client` subcommand.
#[derive(Args, Debug)]
pub struct ClientArgs {
    #[command(subcommand)]
    pub command: ClientCommand,
}

/// How notifications reach a client.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Keep them in the inbox until read.
    Inbox,
    /// Log them as they happen.
    Trace,
}

impl From<Delivery> for DeliveryMethod {
    fn from(value: Delivery) -> Self {
        match value {
            Delivery::Inbox => DeliveryMethod::Inbox,
            Delivery::Trace => DeliveryMethod::Trace,
        }
    }
}

/// Client subcommands.
#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// Register a new client.
    Register {
        /// Client key.
        #[arg(long)]
        id: String,
        /// Display name.
        #[arg(long)]
        name: String,
        /// Tax number.
        #[arg(long)]
        tax_id: u32,
    },

    /// Show one client.
    Show {
        /// Client key.
        id: String,
    },

    /// Read and clear the client's notifications.
    Notifications {
        /// Client key.
        id: String,
    },

    /// Turn notifications on.
    EnableNotifications {
        /// Client key.
        id: String,
    },

    /// Turn notifications off.
    DisableNotifications {
        /// Client key.
        id: String,
    },

    /// Choose how notifications are delivered.
    Delivery {
        /// Client key.
        id: String,
        /// Delivery method.
        #[arg(value_enum)]
        method: Delivery,
    },

    /// Show the client's payments and debts.
    Account {
        /// Client key.
        id: String,
    },
}

/// Execute the client subcommand.
pub fn run_client(args: &ClientArgs, network: &mut Network) -> Result<u8> {
    match &args.command {
        ClientCommand::Register { id, name, tax_id } => {
            network.register_client(id, name, TaxId(*tax_id))?;
            println!("OK: registered client {id}");
        }
        ClientCommand::Show { id } => {
            println!("{}", Report::Client(network.client(id)?));
        }
        ClientCommand::Notifications { id } => {
            for notification in network.client_notifications(id)? {
                println!("{}", Report::Notification(&notification));
            }
        }
        ClientCommand::EnableNotifications { id } => {
            if !network.enable_client_notifications(id)? {
                println!("notifications already enabled for {id}");
                return Ok(1);
            }
            println!("OK: notifications enabled for {id}");
        }
        ClientCommand::DisableNotifications { id } => {
            if !network.disable_client_notifications(id)? {
                println!("notifications already disabled for {id}");
                return Ok(1);
            }
            println!("OK: notifications disabled for {id}");
        }
        ClientCommand::Delivery { id, method } => {
            network.set_delivery_method(id, (*method).into())?;
            println!("OK: delivery for {id} set to {method:?}");
        }
        ClientCommand::Account { id } => {
            let client = network.client(id)?;
            println!(
                "{id}: payments {} debts {}",
                client.payments().round(),
                client.debts().round()
            );
        }
    }
    Ok(0)
}
