//! The filter sets behind each list on the User, Agent and Admin dashboards.
//!
//! Field names serialize in camelCase because the filter sets double as the
//! query parameters of list requests.

use serde::{Deserialize, Serialize};

use crate::{
    calendar::DayKey,
    transaction::{TransactionStatus, TransactionType},
};

use super::FilterSet;

/// The role of a wallet user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A regular wallet holder.
    User,
    /// A cash-in/cash-out agent.
    Agent,
    /// An administrator.
    Admin,
}

impl Role {
    /// The wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Agent => "agent",
            Self::Admin => "admin",
        }
    }
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().is_none_or(|text| text.trim().is_empty())
}

fn drop_blank(text: Option<String>) -> Option<String> {
    text.filter(|text| !text.trim().is_empty())
}

/// Filters for the signed-in user's own transactions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MyTransactionFilters {
    /// Only show this type of transaction.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Only show transactions on or after this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DayKey>,
    /// Only show transactions on or before this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DayKey>,
}

impl FilterSet for MyTransactionFilters {}

/// Filters for the admin transaction list, which the ledger also accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    /// Only show this type of transaction.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,
    /// Only show transactions with this status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    /// Only show transactions on or after this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<DayKey>,
    /// Only show transactions on or before this day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<DayKey>,
    /// Only show transactions sent or received by this user.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub user_id: Option<String>,
    /// Only show transactions of at least this amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
    /// Only show transactions of at most this amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<f64>,
}

impl FilterSet for TransactionFilters {
    fn normalized(self) -> Self {
        Self {
            user_id: drop_blank(self.user_id),
            ..self
        }
    }
}

impl From<MyTransactionFilters> for TransactionFilters {
    fn from(filters: MyTransactionFilters) -> Self {
        Self {
            transaction_type: filters.transaction_type,
            date_from: filters.date_from,
            date_to: filters.date_to,
            ..Default::default()
        }
    }
}

/// Filters for the admin user list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilters {
    /// Only show users with this role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Only show approved (or only unapproved) users.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    /// Match against username, email or phone.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: Option<String>,
}

impl FilterSet for UserFilters {
    fn normalized(self) -> Self {
        Self {
            search: drop_blank(self.search),
            ..self
        }
    }
}

/// Filters for the admin wallet list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletFilters {
    /// Only show blocked (or only unblocked) wallets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    /// Only show wallets whose owner has this role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Only show wallets whose owner is approved (or not).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved: Option<bool>,
    /// Only show wallets holding at least this balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_balance: Option<f64>,
    /// Only show wallets holding at most this balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_balance: Option<f64>,
    /// Only show the wallet of this user.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub user_id: Option<String>,
    /// Match against the owner's username, email or phone.
    #[serde(default, skip_serializing_if = "is_blank")]
    pub search: Option<String>,
}

impl FilterSet for WalletFilters {
    fn normalized(self) -> Self {
        Self {
            user_id: drop_blank(self.user_id),
            search: drop_blank(self.search),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        calendar::DayKey,
        transaction::TransactionType,
        view_state::{
            FilterSet,
            filters::{MyTransactionFilters, Role, TransactionFilters, UserFilters, WalletFilters},
        },
    };

    #[test]
    fn default_filters_are_empty() {
        assert!(MyTransactionFilters::default().is_empty());
        assert!(TransactionFilters::default().is_empty());
        assert!(UserFilters::default().is_empty());
        assert!(WalletFilters::default().is_empty());
    }

    #[test]
    fn setting_a_field_makes_filters_non_empty() {
        let filters = UserFilters {
            role: Some(Role::Agent),
            ..Default::default()
        };

        assert!(!filters.is_empty());
    }

    #[test]
    fn blank_text_filters_are_empty() {
        let users = UserFilters {
            search: Some(" \t".to_owned()),
            ..Default::default()
        };
        let wallets = WalletFilters {
            user_id: Some(String::new()),
            search: Some("  ".to_owned()),
            ..Default::default()
        };

        assert!(users.is_empty());
        assert!(wallets.is_empty());
        assert_eq!(wallets.normalized(), WalletFilters::default());
    }

    #[test]
    fn normalizing_keeps_non_blank_text() {
        let filters = UserFilters {
            search: Some(" jo ".to_owned()),
            ..Default::default()
        };

        assert_eq!(filters.clone().normalized(), filters);
    }

    #[test]
    fn my_filters_convert_to_ledger_filters() {
        let mine = MyTransactionFilters {
            transaction_type: Some(TransactionType::Send),
            date_from: Some(DayKey::new(date!(2025 - 01 - 01))),
            date_to: None,
        };

        let filters = TransactionFilters::from(mine);

        assert_eq!(filters.transaction_type, Some(TransactionType::Send));
        assert_eq!(filters.date_from, Some(DayKey::new(date!(2025 - 01 - 01))));
        assert_eq!(filters.status, None);
        assert_eq!(filters.user_id, None);
    }

    #[test]
    fn blank_search_is_not_serialized() {
        let filters = UserFilters {
            search: Some("   ".to_owned()),
            ..Default::default()
        };

        let json = serde_json::to_value(&filters).unwrap();

        assert_eq!(json, serde_json::json!({}));
    }

    #[test]
    fn wallet_filters_serialize_in_camel_case() {
        let filters = WalletFilters {
            blocked: Some(false),
            min_balance: Some(10.5),
            ..Default::default()
        };

        let json = serde_json::to_value(&filters).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"blocked": false, "minBalance": 10.5})
        );
    }
}
