//! Client-side narrowing of the rows already loaded for the current page.
//!
//! This is separate from the committed filters in [super::ListView], which
//! are sent with the next list request. The quick filter never triggers a
//! request and only sees the rows of the page on screen.

use crate::transaction::{Transaction, UserRef};

/// Keep the rows whose sender username, receiver username or type contains
/// `query`, ignoring case and surrounding whitespace.
///
/// An empty query keeps every row.
pub fn quick_filter<'a>(rows: &'a [Transaction], query: &str) -> Vec<&'a Transaction> {
    let needle = query.trim().to_lowercase();

    if needle.is_empty() {
        return rows.iter().collect();
    }

    rows.iter()
        .filter(|transaction| matches_quick_filter(transaction, &needle))
        .collect()
}

fn matches_quick_filter(transaction: &Transaction, needle: &str) -> bool {
    let username_matches = |user: &Option<UserRef>| {
        user.as_ref()
            .and_then(|user| user.username.as_deref())
            .is_some_and(|username| username.to_lowercase().contains(needle))
    };

    username_matches(&transaction.sender)
        || username_matches(&transaction.receiver)
        || transaction
            .transaction_type
            .as_str()
            .to_lowercase()
            .contains(needle)
}

#[cfg(test)]
mod tests {
    use crate::transaction::{Transaction, TransactionStatus, TransactionType, UserRef};

    use super::quick_filter;

    fn create_row(
        id: &str,
        sender: &str,
        receiver: &str,
        transaction_type: TransactionType,
    ) -> Transaction {
        let user = |name: &str| {
            Some(UserRef {
                id: format!("id-{name}"),
                username: Some(name.to_owned()),
            })
        };

        Transaction {
            id: id.to_owned(),
            amount: 10.0,
            transaction_type,
            status: TransactionStatus::Completed,
            created_at: None,
            sender: user(sender),
            receiver: user(receiver),
        }
    }

    fn rows() -> Vec<Transaction> {
        vec![
            create_row("1", "Alice", "Bob", TransactionType::Send),
            create_row("2", "agent_carol", "Dave", TransactionType::Deposit),
            create_row("3", "Erin", "agent_carol", TransactionType::Withdraw),
        ]
    }

    fn ids(rows: Vec<&Transaction>) -> Vec<&str> {
        rows.into_iter().map(|row| row.id.as_str()).collect()
    }

    #[test]
    fn empty_query_keeps_all_rows() {
        let rows = rows();

        assert_eq!(ids(quick_filter(&rows, "")), ["1", "2", "3"]);
        assert_eq!(ids(quick_filter(&rows, "   ")), ["1", "2", "3"]);
    }

    #[test]
    fn matches_sender_and_receiver_case_insensitively() {
        let rows = rows();

        assert_eq!(ids(quick_filter(&rows, "CAROL")), ["2", "3"]);
        assert_eq!(ids(quick_filter(&rows, " bob ")), ["1"]);
    }

    #[test]
    fn matches_type() {
        let rows = rows();

        assert_eq!(ids(quick_filter(&rows, "withdraw")), ["3"]);
        assert_eq!(ids(quick_filter(&rows, "DEP")), ["2"]);
    }

    #[test]
    fn rows_without_usernames_only_match_on_type() {
        let rows = vec![Transaction {
            sender: None,
            receiver: Some(UserRef {
                id: "u9".to_owned(),
                username: None,
            }),
            ..create_row("9", "x", "y", TransactionType::Send)
        }];

        assert!(quick_filter(&rows, "u9").is_empty());
        assert_eq!(ids(quick_filter(&rows, "send")), ["9"]);
    }

    #[test]
    fn no_match_returns_nothing() {
        let rows = rows();

        assert!(quick_filter(&rows, "zelda").is_empty());
    }
}
