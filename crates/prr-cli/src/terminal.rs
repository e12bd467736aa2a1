//! # Terminal Subcommand
//!
//! Terminal registration, communications, payments, friends and status.
//!
//! Origination from a terminal that cannot start a communication and
//! ending a call the terminal did not originate both succeed without
//! effect; they exit with code 1 so scripts can tell.

use anyhow::Result;
use clap::{Args, Subcommand};

use prr_core::CommunicationId;
use prr_network::{Network, Report};

/// Arguments for the `prr terminal` subcommand.
#[derive(Args, Debug)]
pub struct TerminalArgs {
    #[command(subcommand)]
    pub command: TerminalCommand,
}

/// Terminal subcommands.
#[derive(Subcommand, Debug)]
pub enum TerminalCommand {
    /// Register a new idle terminal.
    Register {
        /// Terminal type (BASIC or FANCY).
        #[arg(long = "type")]
        kind: String,
        /// Terminal key (six digits).
        #[arg(long)]
        id: String,
        /// Owning client key.
        #[arg(long)]
        owner: String,
    },

    /// Show one terminal.
    Show {
        /// Terminal key.
        id: String,
    },

    /// Send a text message.
    Sms {
        /// Sending terminal.
        from: String,
        /// Receiving terminal.
        to: String,
        /// Message body.
        message: String,
    },

    /// Start a voice call.
    Voice {
        /// Calling terminal.
        from: String,
        /// Called terminal.
        to: String,
    },

    /// Start a video call.
    Video {
        /// Calling terminal.
        from: String,
        /// Called terminal.
        to: String,
    },

    /// End the call this terminal originated.
    End {
        /// Calling terminal.
        id: String,
        /// Call duration in units.
        duration: u32,
    },

    /// Show the call this terminal is part of.
    Ongoing {
        /// Terminal key.
        id: String,
    },

    /// Pay a finished call.
    Pay {
        /// Paying terminal.
        id: String,
        /// Communication key.
        communication: u32,
    },

    /// Add a friend.
    AddFriend {
        /// Terminal key.
        id: String,
        /// Friend terminal key.
        friend: String,
    },

    /// Remove a friend.
    RemoveFriend {
        /// Terminal key.
        id: String,
        /// Friend terminal key.
        friend: String,
    },

    /// Turn the terminal on.
    On {
        /// Terminal key.
        id: String,
    },

    /// Silence the terminal.
    Silence {
        /// Terminal key.
        id: String,
    },

    /// Turn the terminal off.
    Off {
        /// Terminal key.
        id: String,
    },

    /// Overwrite the status from a literal (ON, OFF, SILENCE).
    SetStatus {
        /// Terminal key.
        id: String,
        /// Status literal.
        status: String,
    },
}

/// Execute the terminal subcommand.
pub fn run_terminal(args: &TerminalArgs, network: &mut Network) -> Result<u8> {
    match &args.command {
        TerminalCommand::Register { kind, id, owner } => {
            network.register_terminal(kind, id, owner)?;
            println!("OK: registered terminal {id}");
        }
        TerminalCommand::Show { id } => {
            println!("{}", Report::Terminal(network.terminal(id)?));
        }
        TerminalCommand::Sms { from, to, message } => {
            return started(network.send_sms(from, to, message)?, from);
        }
        TerminalCommand::Voice { from, to } => {
            return started(network.make_voice_call(from, to)?, from);
        }
        TerminalCommand::Video { from, to } => {
            return started(network.make_video_call(from, to)?, from);
        }
        TerminalCommand::End { id, duration } => {
            let ongoing = network.terminal(id)?.ongoing();
            let price = network.end_ongoing_communication(id, *duration)?;
            let ended = ongoing
                .and_then(|c| network.communication(c).ok())
                .is_some_and(|c| !c.is_ongoing());
            if !ended {
                println!("{id} has no call of its own to end");
                return Ok(1);
            }
            println!("OK: call ended, price {}", price.round());
        }
        TerminalCommand::Ongoing { id } => {
            println!("{}", Report::Communication(network.ongoing_communication(id)?));
        }
        TerminalCommand::Pay { id, communication } => {
            network.perform_payment(id, CommunicationId::new(*communication))?;
            println!("OK: communication {communication} paid");
        }
        TerminalCommand::AddFriend { id, friend } => {
            network.add_friend(id, friend)?;
            println!("OK: {friend} added to friends of {id}");
        }
        TerminalCommand::RemoveFriend { id, friend } => {
            network.remove_friend(id, friend)?;
            println!("OK: {friend} removed from friends of {id}");
        }
        TerminalCommand::On { id } => {
            network.turn_on(id)?;
            println!("OK: {id} is on");
        }
        TerminalCommand::Silence { id } => {
            network.set_on_silent(id)?;
            println!("OK: {id} is silenced");
        }
        TerminalCommand::Off { id } => {
            network.turn_off(id)?;
            println!("OK: {id} is off");
        }
        TerminalCommand::SetStatus { id, status } => {
            network.set_status(id, status)?;
            println!("OK: {id} status set to {}", network.terminal(id)?.status());
        }
    }
    Ok(0)
}

fn started(communication: Option<CommunicationId>, from: &str) -> Result<u8> {
    match communication {
        Some(id) => {
            println!("OK: communication {id} started");
            Ok(0)
        }
        None => {
            println!("{from} cannot start a communication now");
            Ok(1)
        }
    }
}
