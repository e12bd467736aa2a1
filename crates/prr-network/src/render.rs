//! # Report Rendering
//!
//! One pipe-separated line per entity. Entities know nothing about how they
//! are printed; [`Report`] wraps a borrowed entity and its `Display` impl
//! does the formatting.
//!
//! | Entity        | Line                                                      |
//! |---------------|-----------------------------------------------------------|
//! | Client        | `CLIENT\|id\|name\|taxId\|TIER\|YES/NO\|terminals\|payments\|debts` |
//! | Terminal      | `TYPE\|id\|owner\|STATUS\|payments\|debts[\|friend,friend]` |
//! | Communication | `KIND\|id\|sender\|receiver\|units\|price\|ONGOING/FINISHED` |
//! | Notification  | `O2I\|terminal`                                           |
//!
//! Money is rounded to the nearest integer.

use std::fmt;

use prr_state::{Communication, Notification};

use crate::client::Client;
use crate::terminal::Terminal;

/// A borrowed entity ready to be printed as a report line.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    /// A client line.
    Client(&'a Client),
    /// A terminal line.
    Terminal(&'a Terminal),
    /// A communication line.
    Communication(&'a Communication),
    /// A notification line.
    Notification(&'a Notification),
}

fn money(value: f64) -> i64 {
    value.round() as i64
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Client(c) => write!(
                f,
                "CLIENT|{}|{}|{}|{}|{}|{}|{}|{}",
                c.id(),
                c.name(),
                c.tax_id(),
                c.tier_kind(),
                yes_no(c.notifications_enabled()),
                c.terminals().len(),
                money(c.payments()),
                money(c.debts()),
            ),
            Report::Terminal(t) => {
                write!(
                    f,
                    "{}|{}|{}|{}|{}|{}",
                    t.kind(),
                    t.id(),
                    t.owner(),
                    t.status(),
                    money(t.ledger().payments()),
                    money(t.ledger().debts()),
                )?;
                if !t.friends().is_empty() {
                    let friends: Vec<&str> = t.friends().iter().map(|id| id.as_str()).collect();
                    write!(f, "|{}", friends.join(","))?;
                }
                Ok(())
            }
            Report::Communication(c) => write!(
                f,
                "{}|{}|{}|{}|{}|{}|{}",
                c.kind(),
                c.id(),
                c.sender(),
                c.receiver(),
                c.units(),
                money(c.price()),
                if c.is_ongoing() { "ONGOING" } else { "FINISHED" },
            ),
            Report::Notification(n) => write!(f, "{}|{}", n.kind, n.terminal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prr_core::{ClientId, CommunicationId, TaxId, TerminalId};
    use prr_state::NotificationKind;

    use crate::terminal::TerminalKind;

    fn tid(s: &str) -> TerminalId {
        TerminalId::new(s).unwrap()
    }

    #[test]
    fn client_line() {
        let c = Client::new(ClientId::new("ana").unwrap(), "Ana Lima", TaxId(123456789));
        assert_eq!(
            Report::Client(&c).to_string(),
            "CLIENT|ana|Ana Lima|123456789|NORMAL|YES|0|0|0"
        );
    }

    #[test]
    fn terminal_line_lists_friends_only_when_present() {
        let mut t = Terminal::new(tid("111111"), TerminalKind::Fancy, ClientId::new("ana").unwrap());
        assert_eq!(Report::Terminal(&t).to_string(), "FANCY|111111|ana|IDLE|0|0");
        t.add_friend(tid("333333")).unwrap();
        t.add_friend(tid("222222")).unwrap();
        t.apply(-12.6);
        assert_eq!(
            Report::Terminal(&t).to_string(),
            "FANCY|111111|ana|IDLE|0|13|222222,333333"
        );
    }

    #[test]
    fn communication_lines() {
        let text = Communication::text(
            CommunicationId::new(4),
            tid("111111"),
            tid("222222"),
            "hello".to_string(),
            |_, _| 10.0,
        );
        assert_eq!(Report::Communication(&text).to_string(), "TEXT|4|111111|222222|5|10|FINISHED");

        let call = Communication::voice(CommunicationId::new(5), tid("111111"), tid("222222"));
        assert_eq!(Report::Communication(&call).to_string(), "VOICE|5|111111|222222|0|0|ONGOING");
    }

    #[test]
    fn notification_line() {
        let n = Notification {
            kind: NotificationKind::BusyToIdle,
            terminal: tid("222222"),
        };
        assert_eq!(Report::Notification(&n).to_string(), "B2I|222222");
    }
}
