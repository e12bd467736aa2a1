//! # Network Registry
//!
//! [`Network`] owns every client, terminal and communication, keyed by id,
//! and is the single entry point for mutation. Operations that touch more
//! than one entity (a terminal and its owner's tier, a sender and a
//! receiver, a recovered terminal and the clients waiting on it) are
//! orchestrated here so that no entity holds a reference to another.
//!
//! ## Ledgers
//!
//! A terminal's ledger and its owner's tier ledger are two independent
//! values. Every charge or settlement goes through one helper that applies
//! the same delta to both. The owner's ledger drives promotion.
//!
//! ## Silent no-ops
//!
//! Originating from a terminal that is not `Idle` returns `Ok(None)` and
//! changes nothing. Ending a call from a terminal that is not its sender,
//! or when nothing is ongoing, returns `Ok(0.0)` and changes nothing.

use std::collections::BTreeMap;

use prr_core::{
    ClientId, CommunicationId, InvalidCommunicationReason, NetworkConfig, NetworkError, TaxId,
    TerminalId,
};
use prr_state::{
    Communication, DeliveryMethod, Notification, NotificationKind, Reception, StatusChange,
};
use prr_tariff::CommunicationKind;

use crate::client::Client;
use crate::terminal::{Terminal, TerminalKind};

/// The registry of clients, terminals and communications.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) config: NetworkConfig,
    pub(crate) clients: BTreeMap<ClientId, Client>,
    pub(crate) terminals: BTreeMap<TerminalId, Terminal>,
    pub(crate) communications: BTreeMap<CommunicationId, Communication>,
    pub(crate) next_communication_id: CommunicationId,
    pub(crate) dirty: bool,
}

impl Default for Network {
    fn default() -> Self {
        Self::new(NetworkConfig::default())
    }
}

impl Network {
    /// An empty network.
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            config,
            clients: BTreeMap::new(),
            terminals: BTreeMap::new(),
            communications: BTreeMap::new(),
            next_communication_id: CommunicationId::FIRST,
            dirty: false,
        }
    }

    /// Promotion thresholds and other settings.
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    // ── Dirty tracking ───────────────────────────────────────────────

    /// Mark the network as modified since the last save.
    pub fn changed(&mut self) {
        self.dirty = true;
    }

    /// Whether the network was modified since the last save.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the modified flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── Registration ─────────────────────────────────────────────────

    /// Register a new client.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for a malformed key, `DuplicateClientKey` if taken.
    pub fn register_client(
        &mut self,
        id: &str,
        name: &str,
        tax_id: TaxId,
    ) -> Result<&Client, NetworkError> {
        let id = ClientId::new(id)?;
        if self.clients.contains_key(&id) {
            return Err(NetworkError::DuplicateClientKey(id));
        }
        tracing::debug!(client = %id, "client registered");
        self.changed();
        let client = Client::new(id.clone(), name, tax_id);
        Ok(self.clients.entry(id).or_insert(client))
    }

    /// Register a new idle terminal of type `kind` (`BASIC` or `FANCY`)
    /// owned by `owner`.
    ///
    /// # Errors
    ///
    /// `InvalidKey`, `UnknownTerminalType`, `DuplicateTerminalKey` or
    /// `UnknownClientKey`.
    pub fn register_terminal(
        &mut self,
        kind: &str,
        id: &str,
        owner: &str,
    ) -> Result<&Terminal, NetworkError> {
        let id = TerminalId::new(id)?;
        let kind = TerminalKind::from_literal(kind)?;
        if self.terminals.contains_key(&id) {
            return Err(NetworkError::DuplicateTerminalKey(id));
        }
        let owner = self.resolve_client(owner)?;
        if let Some(client) = self.clients.get_mut(&owner) {
            client.add_terminal(id.clone());
        }
        tracing::debug!(terminal = %id, kind = %kind, owner = %owner, "terminal registered");
        self.changed();
        let terminal = Terminal::new(id.clone(), kind, owner);
        Ok(self.terminals.entry(id).or_insert(terminal))
    }

    // ── Lookup by key ────────────────────────────────────────────────

    /// The client with key `id`.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn client(&self, id: &str) -> Result<&Client, NetworkError> {
        let id = self.resolve_client(id)?;
        self.find_client(&id)
    }

    /// The terminal with key `id`.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, including for malformed keys.
    pub fn terminal(&self, id: &str) -> Result<&Terminal, NetworkError> {
        let id = self.resolve_terminal(id)?;
        self.find_terminal(&id)
    }

    /// The communication with key `id`.
    ///
    /// # Errors
    ///
    /// `InvalidCommunication(UnknownId)`.
    pub fn communication(&self, id: CommunicationId) -> Result<&Communication, NetworkError> {
        self.communications.get(&id).ok_or(NetworkError::InvalidCommunication(
            InvalidCommunicationReason::UnknownId(id),
        ))
    }

    /// The interactive communication `terminal` is part of.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, or `InvalidCommunication(NoneOngoing)`.
    pub fn ongoing_communication(&self, terminal: &str) -> Result<&Communication, NetworkError> {
        let id = self
            .terminal(terminal)?
            .ongoing()
            .ok_or(NetworkError::InvalidCommunication(InvalidCommunicationReason::NoneOngoing))?;
        self.communication(id)
    }

    // ── Client notifications ─────────────────────────────────────────

    /// Read and clear the client's inbox.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn client_notifications(&mut self, id: &str) -> Result<Vec<Notification>, NetworkError> {
        let id = self.resolve_client(id)?;
        let read = self.find_client_mut(&id)?.read_notifications();
        if !read.is_empty() {
            self.changed();
        }
        Ok(read)
    }

    /// Turn notifications on. Returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn enable_client_notifications(&mut self, id: &str) -> Result<bool, NetworkError> {
        self.set_client_notifications(id, true)
    }

    /// Turn notifications off. Returns whether the flag changed.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn disable_client_notifications(&mut self, id: &str) -> Result<bool, NetworkError> {
        self.set_client_notifications(id, false)
    }

    fn set_client_notifications(&mut self, id: &str, enabled: bool) -> Result<bool, NetworkError> {
        let id = self.resolve_client(id)?;
        let changed = self.find_client_mut(&id)?.set_notifications_enabled(enabled);
        if changed {
            tracing::debug!(client = %id, enabled, "client notifications toggled");
            self.changed();
        }
        Ok(changed)
    }

    /// Choose how the client receives notifications.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn set_delivery_method(
        &mut self,
        id: &str,
        method: DeliveryMethod,
    ) -> Result<(), NetworkError> {
        let id = self.resolve_client(id)?;
        self.find_client_mut(&id)?.set_delivery_method(method);
        self.changed();
        Ok(())
    }

    // ── Communications ───────────────────────────────────────────────

    /// Send a text from `sender` to `receiver`.
    ///
    /// The text is priced under the sender owner's tier and its price is
    /// added to the sender's debts. It is never separately paid. A `Silent`
    /// or `Busy` receiver accepts it and queues the sender's owner for
    /// notification.
    ///
    /// Returns `Ok(None)` without effect if the sender cannot start a
    /// communication.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, or `UnreachableOffTerminal` (the sender's owner
    /// is queued on the receiver first).
    pub fn send_sms(
        &mut self,
        sender: &str,
        receiver: &str,
        message: &str,
    ) -> Result<Option<CommunicationId>, NetworkError> {
        let sender = self.resolve_terminal(sender)?;
        if !self.find_terminal(&sender)?.can_start_communication() {
            return Ok(None);
        }
        let receiver = self.resolve_terminal(receiver)?;
        let owner = self.find_terminal(&sender)?.owner().clone();

        let reception = self.find_terminal(&receiver)?.status().assert_text_reception(&receiver);
        match reception {
            Err(e) => {
                if e.is_unreachable() {
                    self.defer(&receiver, owner);
                }
                return Err(e);
            }
            Ok(Reception::Deferred) => self.defer(&receiver, owner.clone()),
            Ok(Reception::Direct) => {}
        }

        let friends = self.find_terminal(&sender)?.is_friend(&receiver);
        let client = self.find_client(&owner)?;
        let id = self.next_communication_id;
        let communication = Communication::text(
            id,
            sender.clone(),
            receiver.clone(),
            message.to_string(),
            |kind, units| client.price(kind, units, friends),
        );
        let price = communication.price();

        self.next_communication_id = id.next();
        self.communications.insert(id, communication);
        self.record(&sender, &receiver, id);
        self.find_client_mut(&owner)?.record(CommunicationKind::Text);
        self.apply_delta(&sender, -price)?;
        self.check_promotion(&owner, false);

        tracing::debug!(communication = %id, sender = %sender, receiver = %receiver, price, "text sent");
        self.changed();
        Ok(Some(id))
    }

    /// Start a voice call from `sender` to `receiver`.
    ///
    /// Both endpoints become `Busy` and reference the new call. Returns
    /// `Ok(None)` without effect if the sender cannot start a
    /// communication.
    ///
    /// # Errors
    ///
    /// `InvalidCommunication(SelfTargeted)`, `UnknownTerminalKey`, or the
    /// receiver's interactive reception error (the sender's owner is queued
    /// on the receiver first).
    pub fn make_voice_call(
        &mut self,
        sender: &str,
        receiver: &str,
    ) -> Result<Option<CommunicationId>, NetworkError> {
        let sender = self.resolve_terminal(sender)?;
        Self::reject_self_call(&sender, receiver)?;
        if !self.find_terminal(&sender)?.can_start_communication() {
            return Ok(None);
        }
        let receiver = self.resolve_terminal(receiver)?;
        self.start_call(sender, receiver, CommunicationKind::Voice).map(Some)
    }

    /// Start a video call from `sender` to `receiver`.
    ///
    /// Like [`Network::make_voice_call`], but both terminals must be
    /// video capable.
    ///
    /// # Errors
    ///
    /// As for voice, plus `UnsupportedCommunicationAtOrigin` (checked
    /// before the sender's status) and `UnsupportedCommunicationAtDestination`.
    pub fn make_video_call(
        &mut self,
        sender: &str,
        receiver: &str,
    ) -> Result<Option<CommunicationId>, NetworkError> {
        let sender = self.resolve_terminal(sender)?;
        Self::reject_self_call(&sender, receiver)?;
        let origin = self.find_terminal(&sender)?;
        if !origin.kind().supports_video() {
            return Err(NetworkError::UnsupportedCommunicationAtOrigin {
                terminal: sender,
                communication: CommunicationKind::Video.as_str(),
            });
        }
        if !origin.can_start_communication() {
            return Ok(None);
        }
        let receiver = self.resolve_terminal(receiver)?;
        if !self.find_terminal(&receiver)?.kind().supports_video() {
            return Err(NetworkError::UnsupportedCommunicationAtDestination {
                terminal: receiver,
                communication: CommunicationKind::Video.as_str(),
            });
        }
        self.start_call(sender, receiver, CommunicationKind::Video).map(Some)
    }

    fn reject_self_call(sender: &TerminalId, receiver: &str) -> Result<(), NetworkError> {
        if sender.as_str() == receiver {
            return Err(NetworkError::InvalidCommunication(
                InvalidCommunicationReason::SelfTargeted,
            ));
        }
        Ok(())
    }

    fn start_call(
        &mut self,
        sender: TerminalId,
        receiver: TerminalId,
        kind: CommunicationKind,
    ) -> Result<CommunicationId, NetworkError> {
        let owner = self.find_terminal(&sender)?.owner().clone();
        let reception = self
            .find_terminal(&receiver)?
            .status()
            .assert_interactive_reception(&receiver);
        if let Err(e) = reception {
            if e.is_unreachable() {
                self.defer(&receiver, owner);
            }
            return Err(e);
        }

        let id = self.next_communication_id;
        let communication = match kind {
            CommunicationKind::Video => Communication::video(id, sender.clone(), receiver.clone()),
            _ => Communication::voice(id, sender.clone(), receiver.clone()),
        };

        // Both endpoints were checked to be Idle above.
        for endpoint in [&receiver, &sender] {
            let terminal = self.find_terminal_mut(endpoint)?;
            terminal.status_mut().set_on_busy(endpoint)?;
            terminal.set_ongoing(Some(id));
        }
        self.next_communication_id = id.next();
        self.communications.insert(id, communication);
        self.record(&sender, &receiver, id);
        self.find_client_mut(&owner)?.record(kind);

        tracing::debug!(communication = %id, sender = %sender, receiver = %receiver, kind = %kind, "call started");
        self.changed();
        Ok(id)
    }

    /// End the call `terminal` originated, after `duration` units.
    ///
    /// The call is priced under the sender owner's tier and charged to the
    /// sender, unpaid. Both endpoints return to `Idle` and flush their
    /// pending-notify queues. Returns the price, or `0.0` without effect if
    /// `terminal` has no ongoing call or is not its sender.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`.
    pub fn end_ongoing_communication(
        &mut self,
        terminal: &str,
        duration: u32,
    ) -> Result<f64, NetworkError> {
        let sender = self.resolve_terminal(terminal)?;
        let origin = self.find_terminal(&sender)?;
        let Some(id) = origin.ongoing() else {
            return Ok(0.0);
        };
        let owner = origin.owner().clone();
        let Some(receiver) = self
            .communications
            .get(&id)
            .filter(|c| c.sender() == &sender)
            .map(|c| c.receiver().clone())
        else {
            return Ok(0.0);
        };
        let friends = origin.is_friend(&receiver);

        let client = self
            .clients
            .get(&owner)
            .ok_or_else(|| NetworkError::UnknownClientKey(owner.to_string()))?;
        let Some(price) = self
            .communications
            .get_mut(&id)
            .and_then(|c| c.finish(&sender, duration, |kind, units| client.price(kind, units, friends)))
        else {
            return Ok(0.0);
        };

        for endpoint in [&sender, &receiver] {
            let terminal = self.find_terminal_mut(endpoint)?;
            terminal.set_ongoing(None);
            let change = terminal.status_mut().un_busy();
            if let Some(change) = change {
                self.flush(endpoint, change);
            }
        }
        self.apply_delta(&sender, -price)?;
        self.check_promotion(&owner, false);

        tracing::debug!(communication = %id, terminal = %sender, duration, price, "call ended");
        self.changed();
        Ok(price)
    }

    /// Pay a finished call originated by `terminal`.
    ///
    /// Moves the price from debts to payments on the terminal and its
    /// owner, then checks the owner for promotion.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, or `InvalidCommunication` if the call is
    /// unknown, not originated by `terminal`, a text, ongoing or already
    /// paid.
    pub fn perform_payment(
        &mut self,
        terminal: &str,
        communication: CommunicationId,
    ) -> Result<(), NetworkError> {
        let payer = self.resolve_terminal(terminal)?;
        let amount = self
            .communications
            .get_mut(&communication)
            .ok_or(NetworkError::InvalidCommunication(
                InvalidCommunicationReason::UnknownId(communication),
            ))?
            .pay(&payer)?;
        self.apply_delta(&payer, amount)?;
        let owner = self.find_terminal(&payer)?.owner().clone();
        self.check_promotion(&owner, true);

        tracing::debug!(communication = %communication, terminal = %payer, amount, "payment performed");
        self.changed();
        Ok(())
    }

    // ── Friends ──────────────────────────────────────────────────────

    /// Add `friend` to `terminal`'s friend list.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey` for either key, or `InvalidFriend` for self or
    /// an existing friend.
    pub fn add_friend(&mut self, terminal: &str, friend: &str) -> Result<(), NetworkError> {
        let id = self.resolve_terminal(terminal)?;
        let friend = self.resolve_terminal(friend)?;
        self.find_terminal_mut(&id)?.add_friend(friend.clone())?;
        tracing::debug!(terminal = %id, friend = %friend, "friend added");
        self.changed();
        Ok(())
    }

    /// Remove `friend` from `terminal`'s friend list.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey` for either key, or `InvalidFriend` if `friend`
    /// is not listed.
    pub fn remove_friend(&mut self, terminal: &str, friend: &str) -> Result<(), NetworkError> {
        let id = self.resolve_terminal(terminal)?;
        let friend = self.resolve_terminal(friend)?;
        self.find_terminal_mut(&id)?.remove_friend(&friend)?;
        tracing::debug!(terminal = %id, friend = %friend, "friend removed");
        self.changed();
        Ok(())
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Overwrite the status from a literal (`ON`/`IDLE`, `OFF`,
    /// `SILENCE`/`SILENT`). Same-state writes are accepted and the
    /// pending-notify queue is never flushed. A terminal in a call keeps
    /// its status until the call ends.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, `UnreachableBusyTerminal` while the terminal
    /// is part of an ongoing call, or `IllegalStatusTransition` for an
    /// unrecognised literal.
    pub fn set_status(&mut self, terminal: &str, literal: &str) -> Result<(), NetworkError> {
        let id = self.resolve_terminal(terminal)?;
        let target = self.find_terminal_mut(&id)?;
        if target.ongoing().is_some() {
            return Err(NetworkError::UnreachableBusyTerminal(id));
        }
        let change = target.status_mut().set_literal(literal, &id)?;
        tracing::debug!(terminal = %id, from = %change.from, to = %change.to, "status set");
        self.changed();
        Ok(())
    }

    /// Owner turns the terminal on.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, `UnreachableBusyTerminal`, or
    /// `IllegalStatusTransition` if already `Idle`.
    pub fn turn_on(&mut self, terminal: &str) -> Result<(), NetworkError> {
        self.owner_transition(terminal, |status, id| status.set_on_idle(id))
    }

    /// Owner silences the terminal.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, `UnreachableBusyTerminal`, or
    /// `IllegalStatusTransition` if already `Silent`.
    pub fn set_on_silent(&mut self, terminal: &str) -> Result<(), NetworkError> {
        self.owner_transition(terminal, |status, id| status.set_on_silent(id))
    }

    /// Owner switches the terminal off.
    ///
    /// # Errors
    ///
    /// `UnknownTerminalKey`, `UnreachableBusyTerminal`, or
    /// `IllegalStatusTransition` if already `Off`.
    pub fn turn_off(&mut self, terminal: &str) -> Result<(), NetworkError> {
        self.owner_transition(terminal, |status, id| status.turn_off(id))
    }

    fn owner_transition(
        &mut self,
        terminal: &str,
        transition: impl FnOnce(
            &mut prr_state::TerminalStatus,
            &TerminalId,
        ) -> Result<StatusChange, NetworkError>,
    ) -> Result<(), NetworkError> {
        let id = self.resolve_terminal(terminal)?;
        let change = transition(self.find_terminal_mut(&id)?.status_mut(), &id)?;
        tracing::debug!(terminal = %id, from = %change.from, to = %change.to, "status changed");
        self.flush(&id, change);
        self.changed();
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────

    pub(crate) fn resolve_client(&self, raw: &str) -> Result<ClientId, NetworkError> {
        ClientId::new(raw)
            .ok()
            .filter(|id| self.clients.contains_key(id))
            .ok_or_else(|| NetworkError::UnknownClientKey(raw.to_string()))
    }

    pub(crate) fn resolve_terminal(&self, raw: &str) -> Result<TerminalId, NetworkError> {
        TerminalId::new(raw)
            .ok()
            .filter(|id| self.terminals.contains_key(id))
            .ok_or_else(|| NetworkError::UnknownTerminalKey(raw.to_string()))
    }

    pub(crate) fn find_client(&self, id: &ClientId) -> Result<&Client, NetworkError> {
        self.clients
            .get(id)
            .ok_or_else(|| NetworkError::UnknownClientKey(id.to_string()))
    }

    fn find_client_mut(&mut self, id: &ClientId) -> Result<&mut Client, NetworkError> {
        self.clients
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownClientKey(id.to_string()))
    }

    pub(crate) fn find_terminal(&self, id: &TerminalId) -> Result<&Terminal, NetworkError> {
        self.terminals
            .get(id)
            .ok_or_else(|| NetworkError::UnknownTerminalKey(id.to_string()))
    }

    fn find_terminal_mut(&mut self, id: &TerminalId) -> Result<&mut Terminal, NetworkError> {
        self.terminals
            .get_mut(id)
            .ok_or_else(|| NetworkError::UnknownTerminalKey(id.to_string()))
    }

    /// Apply one ledger delta to a terminal and to its owner's tier.
    fn apply_delta(&mut self, terminal: &TerminalId, delta: f64) -> Result<(), NetworkError> {
        let owner = self.find_terminal(terminal)?.owner().clone();
        self.find_client(&owner)?;
        self.find_terminal_mut(terminal)?.apply(delta);
        self.find_client_mut(&owner)?.apply(delta);
        Ok(())
    }

    fn check_promotion(&mut self, owner: &ClientId, payment_completed: bool) {
        let thresholds = self.config.promotion;
        if let Some(client) = self.clients.get_mut(owner) {
            if let Some(tier) = client.check_promotion(payment_completed, &thresholds) {
                tracing::debug!(client = %owner, tier = %tier, "client promoted");
            }
        }
    }

    fn record(&mut self, sender: &TerminalId, receiver: &TerminalId, id: CommunicationId) {
        for endpoint in [sender, receiver] {
            if let Some(terminal) = self.terminals.get_mut(endpoint) {
                terminal.record(id);
            }
        }
    }

    /// Queue `client` on `receiver`. A rejected delivery still changes the
    /// network through this queue.
    fn defer(&mut self, receiver: &TerminalId, client: ClientId) {
        let Some(terminal) = self.terminals.get_mut(receiver) else {
            return;
        };
        if terminal.enqueue(client.clone()) {
            tracing::debug!(terminal = %receiver, client = %client, "client queued for notification");
        }
        self.changed();
    }

    /// Notify every client queued on `terminal` if `change` is a recovery.
    fn flush(&mut self, terminal: &TerminalId, change: StatusChange) {
        let Some(kind) = NotificationKind::for_change(change) else {
            return;
        };
        let Some(pending) = self.terminals.get_mut(terminal).map(Terminal::take_pending) else {
            return;
        };
        for client in &pending {
            if let Some(client) = self.clients.get_mut(client) {
                client.notify(Notification {
                    kind,
                    terminal: terminal.clone(),
                });
            }
        }
        tracing::debug!(terminal = %terminal, kind = %kind, clients = pending.len(), "pending notifications flushed");
    }
}
