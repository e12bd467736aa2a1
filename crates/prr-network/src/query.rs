//! Read-only lookups over a [`Network`].

use prr_core::NetworkError;
use prr_state::Communication;

use crate::client::Client;
use crate::network::Network;
use crate::terminal::Terminal;

impl Network {
    /// Every client, ordered by key.
    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    /// Every terminal, ordered by key.
    pub fn terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals.values()
    }

    /// Every communication, ordered by key.
    pub fn communications(&self) -> impl Iterator<Item = &Communication> {
        self.communications.values()
    }

    /// Terminals that never sent or received a communication.
    pub fn unused_terminals(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals().filter(|t| t.is_unused())
    }

    /// Terminals whose payments exceed their debts.
    pub fn terminals_with_positive_balance(&self) -> impl Iterator<Item = &Terminal> {
        self.terminals().filter(|t| t.balance() > 0.0)
    }

    /// Clients that owe something, largest debt first, then by key.
    pub fn clients_with_debts(&self) -> Vec<&Client> {
        let mut owing: Vec<&Client> = self.clients().filter(|c| c.debts() > 0.0).collect();
        owing.sort_by(|a, b| b.debts().total_cmp(&a.debts()).then_with(|| a.id().cmp(b.id())));
        owing
    }

    /// Clients that owe nothing, ordered by key.
    pub fn clients_without_debts(&self) -> impl Iterator<Item = &Client> {
        self.clients().filter(|c| c.debts() <= 0.0)
    }

    /// Communications originated by any of the client's terminals.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn communications_from_client(&self, id: &str) -> Result<Vec<&Communication>, NetworkError> {
        let client = self.client(id)?;
        Ok(self.communications().filter(|c| client.owns(c.sender())).collect())
    }

    /// Communications received by any of the client's terminals.
    ///
    /// # Errors
    ///
    /// `UnknownClientKey`.
    pub fn communications_to_client(&self, id: &str) -> Result<Vec<&Communication>, NetworkError> {
        let client = self.client(id)?;
        Ok(self.communications().filter(|c| client.owns(c.receiver())).collect())
    }

    /// Sum of all clients' payments.
    pub fn global_payments(&self) -> f64 {
        self.clients().map(Client::payments).sum()
    }

    /// Sum of all clients' debts.
    pub fn global_debts(&self) -> f64 {
        self.clients().map(Client::debts).sum()
    }
}

#[cfg(test)]
mod tests {
    use prr_core::{NetworkConfig, TaxId, TerminalId};

    use super::*;

    fn network() -> Network {
        let mut net = Network::new(NetworkConfig::default());
        for (id, tax) in [("ana", 1), ("bea", 2), ("rui", 3)] {
            net.register_client(id, id, TaxId(tax)).unwrap();
        }
        net.register_terminal("BASIC", "100001", "ana").unwrap();
        net.register_terminal("BASIC", "100002", "bea").unwrap();
        net.register_terminal("BASIC", "100003", "rui").unwrap();
        net.register_terminal("BASIC", "100004", "rui").unwrap();
        net
    }

    fn ids<'a>(terminals: impl Iterator<Item = &'a Terminal>) -> Vec<&'a str> {
        terminals.map(|t| t.id().as_str()).collect()
    }

    #[test]
    fn unused_terminals_excludes_both_endpoints() {
        let mut net = network();
        net.send_sms("100001", "100002", "hello").unwrap();
        assert_eq!(ids(net.unused_terminals()), vec!["100003", "100004"]);
    }

    #[test]
    fn debts_ordering() {
        let mut net = network();
        net.send_sms("100001", "100002", &"x".repeat(10)).unwrap(); // 10
        net.send_sms("100003", "100002", &"x".repeat(60)).unwrap(); // 16
        net.send_sms("100002", "100001", &"x".repeat(10)).unwrap(); // 10
        let owing: Vec<&str> = net.clients_with_debts().iter().map(|c| c.id().as_str()).collect();
        assert_eq!(owing, vec!["rui", "ana", "bea"]);
        assert_eq!(net.clients_without_debts().count(), 0);
        assert_eq!(net.global_debts(), 36.0);
        assert_eq!(net.global_payments(), 0.0);
    }

    #[test]
    fn positive_balance_after_payment() {
        let mut net = network();
        assert_eq!(net.terminals_with_positive_balance().count(), 0);
        let id = net.make_voice_call("100001", "100002").unwrap().unwrap();
        net.end_ongoing_communication("100001", 1).unwrap();
        net.perform_payment("100001", id).unwrap();
        assert_eq!(ids(net.terminals_with_positive_balance()), vec!["100001"]);
        assert_eq!(net.global_payments(), 20.0);
    }

    #[test]
    fn communications_by_client() {
        let mut net = network();
        net.send_sms("100003", "100001", "a").unwrap();
        net.send_sms("100004", "100002", "b").unwrap();
        net.send_sms("100001", "100004", "c").unwrap();
        assert_eq!(net.communications_from_client("rui").unwrap().len(), 2);
        let to_rui = net.communications_to_client("rui").unwrap();
        assert_eq!(to_rui.len(), 1);
        assert_eq!(to_rui[0].receiver(), &TerminalId::new("100004").unwrap());
        assert!(matches!(
            net.communications_from_client("zed"),
            Err(NetworkError::UnknownClientKey(_))
        ));
    }
}
