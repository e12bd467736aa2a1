//! # Versioned Snapshot
//!
//! A [`NetworkSnapshot`] is a flat, serializable image of a [`Network`]:
//! every cross reference is a key, never a pointer. [`Network::restore`]
//! re-resolves those keys and refuses any snapshot whose references do not
//! line up, so a restored network satisfies the same invariants as one
//! built through registration.
//!
//! Reading and writing snapshot files is left to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use prr_core::{ClientId, CommunicationId, NetworkConfig, TerminalId};
use prr_state::Communication;

use crate::client::Client;
use crate::network::Network;
use crate::terminal::Terminal;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of a network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    /// Schema version; must equal [`SNAPSHOT_VERSION`].
    pub version: u32,
    /// Key the next communication will receive.
    pub next_communication_id: CommunicationId,
    /// Clients, ordered by key.
    pub clients: Vec<Client>,
    /// Terminals, ordered by key.
    pub terminals: Vec<Terminal>,
    /// Communications, ordered by key.
    pub communications: Vec<Communication>,
}

/// Why a snapshot could not be restored.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Written by an incompatible schema.
    #[error("unsupported snapshot version {found} (expected {expected})", expected = SNAPSHOT_VERSION)]
    UnsupportedVersion {
        /// Version found in the snapshot.
        found: u32,
    },

    /// The same key appears twice.
    #[error("duplicate key in snapshot: {0}")]
    DuplicateKey(String),

    /// A terminal names an owner that is not in the snapshot.
    #[error("terminal {terminal} is owned by unknown client {owner}")]
    MissingOwner {
        /// The terminal.
        terminal: TerminalId,
        /// Its recorded owner.
        owner: ClientId,
    },

    /// A client's terminal list and the terminals' owners disagree.
    #[error("client {client} and terminal {terminal} disagree on ownership")]
    OwnershipMismatch {
        /// The client.
        client: ClientId,
        /// The terminal.
        terminal: TerminalId,
    },

    /// A communication or friend list names a terminal not in the snapshot.
    #[error("{context} refers to unknown terminal {terminal}")]
    MissingTerminal {
        /// Where the reference was found.
        context: String,
        /// The missing key.
        terminal: TerminalId,
    },

    /// A terminal names a communication not in the snapshot.
    #[error("terminal {terminal} refers to unknown communication {communication}")]
    MissingCommunication {
        /// The terminal.
        terminal: TerminalId,
        /// The missing key.
        communication: CommunicationId,
    },

    /// A terminal's ongoing reference is not an ongoing call it takes part in.
    #[error("terminal {terminal} holds a stale ongoing reference to {communication}")]
    StaleOngoing {
        /// The terminal.
        terminal: TerminalId,
        /// The referenced communication.
        communication: CommunicationId,
    },

    /// A communication key is not below the id counter.
    #[error("communication {0} is not below the next id")]
    IdCounterBehind(CommunicationId),
}

impl Network {
    /// Capture the network as a snapshot.
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot {
            version: SNAPSHOT_VERSION,
            next_communication_id: self.next_communication_id,
            clients: self.clients.values().cloned().collect(),
            terminals: self.terminals.values().cloned().collect(),
            communications: self.communications.values().cloned().collect(),
        }
    }

    /// Rebuild a network from a snapshot. The result is not dirty.
    ///
    /// # Errors
    ///
    /// [`SnapshotError`] if the version is unsupported or any reference
    /// fails to resolve.
    pub fn restore(
        snapshot: NetworkSnapshot,
        config: NetworkConfig,
    ) -> Result<Network, SnapshotError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: snapshot.version,
            });
        }

        let clients = index(snapshot.clients, |c| c.id().clone())?;
        let terminals = index(snapshot.terminals, |t| t.id().clone())?;
        let communications = index(snapshot.communications, |c| c.id())?;

        for terminal in terminals.values() {
            check_terminal(terminal, &clients, &terminals, &communications)?;
        }
        for client in clients.values() {
            for id in client.terminals() {
                let owned = terminals.get(id).is_some_and(|t| t.owner() == client.id());
                if !owned {
                    return Err(SnapshotError::OwnershipMismatch {
                        client: client.id().clone(),
                        terminal: id.clone(),
                    });
                }
            }
        }
        for communication in communications.values() {
            for endpoint in [communication.sender(), communication.receiver()] {
                if !terminals.contains_key(endpoint) {
                    return Err(SnapshotError::MissingTerminal {
                        context: format!("communication {}", communication.id()),
                        terminal: endpoint.clone(),
                    });
                }
            }
            if communication.id() >= snapshot.next_communication_id {
                return Err(SnapshotError::IdCounterBehind(communication.id()));
            }
        }

        tracing::debug!(
            clients = clients.len(),
            terminals = terminals.len(),
            communications = communications.len(),
            "network restored"
        );
        Ok(Network {
            config,
            clients,
            terminals,
            communications,
            next_communication_id: snapshot.next_communication_id,
            dirty: false,
        })
    }
}

fn index<K: Ord + ToString, V>(
    items: Vec<V>,
    key: impl Fn(&V) -> K,
) -> Result<BTreeMap<K, V>, SnapshotError> {
    let mut map = BTreeMap::new();
    for item in items {
        let k = key(&item);
        if map.contains_key(&k) {
            return Err(SnapshotError::DuplicateKey(k.to_string()));
        }
        map.insert(k, item);
    }
    Ok(map)
}

fn check_terminal(
    terminal: &Terminal,
    clients: &BTreeMap<ClientId, Client>,
    terminals: &BTreeMap<TerminalId, Terminal>,
    communications: &BTreeMap<CommunicationId, Communication>,
) -> Result<(), SnapshotError> {
    let id = terminal.id();
    let owner = clients
        .get(terminal.owner())
        .ok_or_else(|| SnapshotError::MissingOwner {
            terminal: id.clone(),
            owner: terminal.owner().clone(),
        })?;
    if !owner.owns(id) {
        return Err(SnapshotError::OwnershipMismatch {
            client: owner.id().clone(),
            terminal: id.clone(),
        });
    }
    for friend in terminal.friends() {
        if !terminals.contains_key(friend) {
            return Err(SnapshotError::MissingTerminal {
                context: format!("friend list of {id}"),
                terminal: friend.clone(),
            });
        }
    }
    for communication in terminal.communications() {
        if !communications.contains_key(communication) {
            return Err(SnapshotError::MissingCommunication {
                terminal: id.clone(),
                communication: *communication,
            });
        }
    }
    if let Some(ongoing) = terminal.ongoing() {
        let live = communications
            .get(&ongoing)
            .is_some_and(|c| c.is_ongoing() && (c.sender() == id || c.receiver() == id));
        if !live {
            return Err(SnapshotError::StaleOngoing {
                terminal: id.clone(),
                communication: ongoing,
            });
        }
    }
    for client in terminal.pending_notify() {
        if !clients.contains_key(client) {
            return Err(SnapshotError::MissingOwner {
                terminal: id.clone(),
                owner: client.clone(),
            });
        }
    }
    Ok(())
}
