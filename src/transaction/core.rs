//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de::IgnoredAny};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

use crate::{Error, calendar::DayKey};

// ============================================================================
// MODELS
// ============================================================================

/// What kind of money movement a transaction records.
///
/// Unknown type tags deserialize into [TransactionType::Other] so that
/// records from a newer backend are still readable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransactionType {
    /// Money sent from one wallet to another.
    Send,
    /// Money taken out of a wallet, e.g. an agent cash-out.
    Withdraw,
    /// Money put into a wallet, e.g. an agent cash-in.
    Deposit,
    /// A type tag this version does not know about.
    Other(String),
}

impl TransactionType {
    /// The wire name of the type, e.g. "send".
    pub fn as_str(&self) -> &str {
        match self {
            Self::Send => "send",
            Self::Withdraw => "withdraw",
            Self::Deposit => "deposit",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for TransactionType {
    fn from(name: &str) -> Self {
        match name {
            "send" => Self::Send,
            "withdraw" => Self::Withdraw,
            "deposit" => Self::Deposit,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl From<String> for TransactionType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<TransactionType> for String {
    fn from(transaction_type: TransactionType) -> Self {
        match transaction_type {
            TransactionType::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

/// Whether the backend managed to carry out a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// The money moved.
    #[default]
    Completed,
    /// The transaction was rejected.
    Failed,
}

impl TransactionStatus {
    /// The wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    fn from_db(name: &str) -> Self {
        match name {
            "failed" => Self::Failed,
            _ => Self::Completed,
        }
    }
}

/// A reference to the user on one side of a transaction.
///
/// The backend sends either a bare ID or a populated user object, both of
/// which deserialize into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawUserRef")]
pub struct UserRef {
    /// The opaque ID of the user.
    pub id: String,
    /// The user's display name, when the backend populated it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawUserRef {
    Id(String),
    User {
        #[serde(alias = "_id", default)]
        id: String,
        #[serde(default)]
        username: Option<String>,
    },
}

impl From<RawUserRef> for UserRef {
    fn from(raw: RawUserRef) -> Self {
        match raw {
            RawUserRef::Id(id) => Self { id, username: None },
            RawUserRef::User { id, username } => Self { id, username },
        }
    }
}

/// A movement of money between wallets, as reported by the wallet backend.
///
/// Deserialization is lenient about `amount` and `createdAt`: a malformed
/// amount becomes `0.0` and a malformed timestamp becomes `None`, so a single
/// bad record degrades a chart instead of failing the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The opaque ID of the transaction.
    #[serde(alias = "_id")]
    pub id: String,
    /// How much money moved.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// What kind of movement this was.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Whether the movement went through.
    #[serde(default)]
    pub status: TransactionStatus,
    /// When the transaction happened, if known.
    #[serde(
        default,
        deserialize_with = "deserialize_created_at",
        serialize_with = "serialize_created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    /// The user the money came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserRef>,
    /// The user the money went to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<UserRef>,
}

/// The data needed to record a new transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// How much money moved. Must be positive.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// What kind of movement this was.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Whether the movement went through.
    #[serde(default)]
    pub status: TransactionStatus,
    /// When the transaction happened. Defaults to the time it is recorded.
    #[serde(
        default,
        deserialize_with = "deserialize_created_at",
        serialize_with = "serialize_created_at",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    /// The user the money came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<UserRef>,
    /// The user the money went to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<UserRef>,
}

impl NewTransaction {
    /// Start a new completed transaction with no timestamp or parties.
    pub fn new(amount: f64, transaction_type: TransactionType) -> Self {
        Self {
            amount,
            transaction_type,
            status: TransactionStatus::Completed,
            created_at: None,
            sender: None,
            receiver: None,
        }
    }

    /// Set when the transaction happened.
    pub fn created_at(mut self, created_at: OffsetDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Set the status of the transaction.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the sending user.
    pub fn sender(mut self, id: &str, username: &str) -> Self {
        self.sender = Some(UserRef {
            id: id.to_owned(),
            username: Some(username.to_owned()),
        });
        self
    }

    /// Set the receiving user.
    pub fn receiver(mut self, id: &str, username: &str) -> Self {
        self.receiver = Some(UserRef {
            id: id.to_owned(),
            username: Some(username.to_owned()),
        });
        self
    }
}

// ============================================================================
// LENIENT SERDE HELPERS
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Coerce a textual amount to a number, treating anything unparsable as zero.
pub(crate) fn coerce_amount(text: &str) -> f64 {
    let text = text.trim();

    if text.is_empty() {
        return 0.0;
    }

    match text.parse::<f64>() {
        Ok(amount) if amount.is_finite() => amount,
        _ => 0.0,
    }
}

fn deserialize_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let amount = match RawAmount::deserialize(deserializer)? {
        RawAmount::Number(amount) if amount.is_finite() => amount,
        RawAmount::Text(text) => coerce_amount(&text),
        RawAmount::Number(_) | RawAmount::Other(_) => 0.0,
    };

    Ok(amount)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    Other(IgnoredAny),
}

/// Parse an RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as UTC midnight.
pub(crate) fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    if let Ok(timestamp) = OffsetDateTime::parse(text.trim(), &Rfc3339) {
        return Some(timestamp);
    }

    text.parse::<DayKey>()
        .ok()
        .map(|day| day.date().midnight().assume_utc())
}

fn deserialize_created_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error> {
    let created_at = match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Text(text)) => parse_timestamp(&text),
        Some(RawTimestamp::Other(_)) | None => None,
    };

    Ok(created_at)
}

fn serialize_created_at<S: Serializer>(
    created_at: &Option<OffsetDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match created_at {
        Some(timestamp) => {
            let text = timestamp
                .to_offset(UtcOffset::UTC)
                .format(&Rfc3339)
                .map_err(serde::ser::Error::custom)?;
            serializer.serialize_some(&text)
        }
        None => serializer.serialize_none(),
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table.
///
/// Timestamps are stored as UTC Unix seconds so that range filters are plain
/// integer comparisons.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                amount REAL NOT NULL,
                type TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'completed',
                created_at INTEGER,
                sender_id TEXT,
                sender_username TEXT,
                receiver_id TEXT,
                receiver_username TEXT
            )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_created_at ON \"transaction\"(created_at)",
        (),
    )?;

    Ok(())
}

/// Record a new transaction in the database.
///
/// Transactions without a timestamp are stamped with `now`.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the amount is not a positive number, or
/// [Error::SqlError] if the insert fails.
pub fn create_transaction(
    new_transaction: NewTransaction,
    now: OffsetDateTime,
    connection: &Connection,
) -> Result<Transaction, Error> {
    if !(new_transaction.amount.is_finite() && new_transaction.amount > 0.0) {
        return Err(Error::InvalidAmount(new_transaction.amount));
    }

    let created_at = new_transaction.created_at.unwrap_or(now);
    let sender = new_transaction.sender.as_ref();
    let receiver = new_transaction.receiver.as_ref();

    connection.execute(
        "INSERT INTO \"transaction\" \
            (amount, type, status, created_at, sender_id, sender_username, receiver_id, receiver_username) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        (
            new_transaction.amount,
            new_transaction.transaction_type.as_str(),
            new_transaction.status.as_str(),
            created_at.unix_timestamp(),
            sender.map(|user| user.id.as_str()),
            sender.and_then(|user| user.username.as_deref()),
            receiver.map(|user| user.id.as_str()),
            receiver.and_then(|user| user.username.as_deref()),
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Transaction {
        id: id.to_string(),
        amount: new_transaction.amount,
        transaction_type: new_transaction.transaction_type,
        status: new_transaction.status,
        created_at: OffsetDateTime::from_unix_timestamp(created_at.unix_timestamp()).ok(),
        sender: new_transaction.sender,
        receiver: new_transaction.receiver,
    })
}

/// The columns [map_transaction_row] expects, in order.
pub(crate) const TRANSACTION_COLUMNS: &str = "id, amount, type, status, created_at, \
    sender_id, sender_username, receiver_id, receiver_username";

/// Map a database row selected with [TRANSACTION_COLUMNS] to a [Transaction].
///
/// # Errors
/// Returns an error if a column is missing or has the wrong type.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id: i64 = row.get(0)?;
    let transaction_type: String = row.get(2)?;
    let status: String = row.get(3)?;
    let created_at: Option<i64> = row.get(4)?;

    let user_ref = |id: Option<String>, username: Option<String>| {
        id.map(|id| UserRef { id, username })
    };

    Ok(Transaction {
        id: id.to_string(),
        amount: row.get(1)?,
        transaction_type: TransactionType::from(transaction_type),
        status: TransactionStatus::from_db(&status),
        created_at: created_at
            .and_then(|timestamp| OffsetDateTime::from_unix_timestamp(timestamp).ok()),
        sender: user_ref(row.get(5)?, row.get(6)?),
        receiver: user_ref(row.get(7)?, row.get(8)?),
    })
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn count_transactions(connection: &Connection) -> Result<u64, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM \"transaction\";", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|count| count as u64)
        .map_err(|error| error.into())
}
