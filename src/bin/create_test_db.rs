use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use wallet_dashboard::{
    NewTransaction, TransactionStatus, TransactionType, create_transaction, initialize_db,
};

/// A utility for creating a test database for the wallet dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The number of days of transactions to create, ending today.
    #[arg(long, default_value_t = 90)]
    days: i64,
}

const USERS: [(&str, &str); 4] = [
    ("u1", "alice"),
    ("u2", "bob"),
    ("u3", "erin"),
    ("a1", "agent_carol"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test transactions...");

    let now = OffsetDateTime::now_utc();
    let mut count = 0;

    for day in 0..args.days.max(0) {
        for slot in 0..(day % 4) {
            let seed = (day * 7 + slot * 13) as usize;
            let amount = ((seed * 37) % 500 + 5) as f64 + (seed % 100) as f64 / 100.0;
            let (sender_id, sender) = USERS[seed % USERS.len()];
            let (receiver_id, receiver) = USERS[(seed + 1) % USERS.len()];
            let (transaction_type, status) = match seed % 5 {
                0 | 1 => (TransactionType::Send, TransactionStatus::Completed),
                2 => (TransactionType::Deposit, TransactionStatus::Completed),
                3 => (TransactionType::Withdraw, TransactionStatus::Completed),
                _ => (TransactionType::Send, TransactionStatus::Failed),
            };

            let new_transaction = NewTransaction::new(amount, transaction_type)
                .status(status)
                .created_at(now - Duration::days(day) - Duration::hours(slot * 3))
                .sender(sender_id, sender)
                .receiver(receiver_id, receiver);

            create_transaction(new_transaction, now, &conn)?;
            count += 1;
        }
    }

    println!("Created {count} transactions.");
    println!("Success!");

    Ok(())
}
