//! Transaction data aggregation for the dashboard charts.
//!
//! Turns an unordered list of transactions into a fixed, gap-free daily
//! series and into per-type totals. Both functions are pure and never fail:
//! transactions without a timestamp or outside the window are skipped, and
//! malformed amounts have already been coerced to zero when the transactions
//! were deserialized.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    calendar::{DayAlignment, DayKey},
    transaction::{Transaction, TransactionType},
};

/// The aggregated transaction amounts of one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// The day the amounts belong to.
    pub date: DayKey,
    /// The sum of `send` transactions.
    pub send: f64,
    /// The sum of `withdraw` transactions.
    pub withdraw: f64,
    /// The sum of `deposit` transactions.
    pub deposit: f64,
    /// The sum of all transactions on the day, including unknown types.
    pub total: f64,
}

impl DailyBucket {
    fn empty(date: DayKey) -> Self {
        Self {
            date,
            send: 0.0,
            withdraw: 0.0,
            deposit: 0.0,
            total: 0.0,
        }
    }

    fn add(&mut self, transaction_type: &TransactionType, amount: f64) {
        match transaction_type {
            TransactionType::Send => self.send += amount,
            TransactionType::Withdraw => self.withdraw += amount,
            TransactionType::Deposit => self.deposit += amount,
            TransactionType::Other(_) => {}
        }

        self.total += amount;
    }
}

/// The total amount moved per transaction type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeTotals {
    /// The sum of `send` transactions.
    pub send: f64,
    /// The sum of `withdraw` transactions.
    pub withdraw: f64,
    /// The sum of `deposit` transactions.
    pub deposit: f64,
}

impl TypeTotals {
    /// Labelled totals for a pie chart, in the order deposit, withdraw, send.
    pub fn slices(&self) -> [(&'static str, f64); 3] {
        [
            ("Deposit", self.deposit),
            ("Withdraw", self.withdraw),
            ("Send", self.send),
        ]
    }

    /// The sum over all three types.
    pub fn sum(&self) -> f64 {
        self.send + self.withdraw + self.deposit
    }
}

/// Build one bucket per day for the `window_days` days ending on `today`,
/// oldest first.
///
/// Every day in the window gets a bucket, even if nothing happened on it. A
/// window reaching back past the first supported date is cut short there, so
/// the series still ends on `today`.
/// Transactions are assigned to days with `alignment`. Transactions without
/// a timestamp or outside the window are skipped. Transactions with an
/// unknown type count towards `total` but none of the per-type sums.
pub fn build_daily_series(
    transactions: &[Transaction],
    window_days: u32,
    today: DayKey,
    alignment: DayAlignment,
) -> Vec<DailyBucket> {
    let Some(days_back) = window_days.checked_sub(1) else {
        return Vec::new();
    };
    let first_day = today
        .days_before(days_back)
        .unwrap_or(DayKey::new(Date::MIN));

    let day_count = (today.date() - first_day.date()).whole_days() + 1;
    let mut buckets = Vec::with_capacity(usize::try_from(day_count).unwrap_or_default());
    let mut day = Some(first_day);

    while let Some(current) = day.filter(|current| *current <= today) {
        buckets.push(DailyBucket::empty(current));
        day = current.next();
    }

    let index_by_day: HashMap<DayKey, usize> = buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| (bucket.date, index))
        .collect();

    for transaction in transactions {
        let Some(created_at) = transaction.created_at else {
            continue;
        };

        let Some(&index) = index_by_day.get(&alignment.day_key(created_at)) else {
            continue;
        };

        buckets[index].add(&transaction.transaction_type, transaction.amount);
    }

    buckets
}

/// [build_daily_series] for the window ending on the current day.
pub fn build_daily_series_now(
    transactions: &[Transaction],
    window_days: u32,
    alignment: DayAlignment,
) -> Vec<DailyBucket> {
    let today = alignment.today(OffsetDateTime::now_utc());
    build_daily_series(transactions, window_days, today, alignment)
}

/// Sum the amounts of `transactions` per type, ignoring time entirely.
///
/// Callers that want totals for a date range must pass only the
/// transactions in that range. Unknown types are ignored.
pub fn sum_by_type(transactions: &[Transaction]) -> TypeTotals {
    transactions
        .iter()
        .fold(TypeTotals::default(), |mut totals, transaction| {
            match transaction.transaction_type {
                TransactionType::Send => totals.send += transaction.amount,
                TransactionType::Withdraw => totals.withdraw += transaction.amount,
                TransactionType::Deposit => totals.deposit += transaction.amount,
                TransactionType::Other(_) => {}
            }

            totals
        })
}

#[cfg(test)]
mod tests {
    use time::{
        Date, Duration, OffsetDateTime,
        macros::{date, datetime, offset},
    };

    use crate::{
        calendar::{DayAlignment, DayKey},
        transaction::{Transaction, TransactionStatus, TransactionType},
    };

    use super::{TypeTotals, build_daily_series, build_daily_series_now, sum_by_type};

    const TODAY: DayKey = DayKey::new(date!(2025 - 03 - 15));

    fn create_test_transaction(
        amount: f64,
        transaction_type: TransactionType,
        created_at: Option<OffsetDateTime>,
    ) -> Transaction {
        Transaction {
            id: format!("{amount}-{}", transaction_type.as_str()),
            amount,
            transaction_type,
            status: TransactionStatus::Completed,
            created_at,
            sender: None,
            receiver: None,
        }
    }

    fn noon(days_ago: i64) -> Option<OffsetDateTime> {
        Some(datetime!(2025-03-15 12:00 UTC) - Duration::days(days_ago))
    }

    #[test]
    fn empty_input_gives_zeroed_window_ending_today() {
        let series = build_daily_series(&[], 30, TODAY, DayAlignment::Utc);

        assert_eq!(series.len(), 30);
        assert_eq!(series.first().unwrap().date, DayKey::new(date!(2025 - 02 - 14)));
        assert_eq!(series.last().unwrap().date, TODAY);
        assert!(series.windows(2).all(|pair| pair[0].date < pair[1].date));
        assert!(series.iter().all(|bucket| bucket.send == 0.0
            && bucket.withdraw == 0.0
            && bucket.deposit == 0.0
            && bucket.total == 0.0));
    }

    #[test]
    fn zero_day_window_is_empty() {
        let transactions = vec![create_test_transaction(5.0, TransactionType::Send, noon(0))];

        let series = build_daily_series(&transactions, 0, TODAY, DayAlignment::Utc);

        assert!(series.is_empty());
    }

    #[test]
    fn window_is_cut_short_at_first_supported_date() {
        let today = DayKey::new(Date::MIN.next_day().unwrap().next_day().unwrap());

        let series = build_daily_series(&[], 10, today, DayAlignment::Utc);

        assert_eq!(series.len(), 3);
        assert_eq!(series[0].date, DayKey::new(Date::MIN));
        assert_eq!(series.last().unwrap().date, today);
    }

    #[test]
    fn one_day_window_only_contains_today() {
        let transactions = vec![
            create_test_transaction(5.0, TransactionType::Send, noon(0)),
            create_test_transaction(7.0, TransactionType::Send, noon(1)),
        ];

        let series = build_daily_series(&transactions, 1, TODAY, DayAlignment::Utc);

        assert_eq!(series.len(), 1);
        assert_eq!(series[0].date, TODAY);
        assert_eq!(series[0].total, 5.0);
    }

    #[test]
    fn buckets_todays_transactions_and_drops_old_ones() {
        let transactions = vec![
            create_test_transaction(100.0, TransactionType::Deposit, noon(0)),
            create_test_transaction(40.0, TransactionType::Send, noon(0)),
            create_test_transaction(10.0, TransactionType::Withdraw, noon(40)),
        ];

        let series = build_daily_series(&transactions, 30, TODAY, DayAlignment::Utc);

        let today = series.last().unwrap();
        assert_eq!(today.deposit, 100.0);
        assert_eq!(today.send, 40.0);
        assert_eq!(today.withdraw, 0.0);
        assert_eq!(today.total, 140.0);

        let windowed_total: f64 = series.iter().map(|bucket| bucket.total).sum();
        assert_eq!(windowed_total, 140.0);

        let totals = sum_by_type(&transactions);
        assert_eq!(totals.withdraw, 10.0);
    }

    #[test]
    fn deposit_only_lands_in_deposit_and_total() {
        let transactions = vec![create_test_transaction(
            25.0,
            TransactionType::Deposit,
            noon(3),
        )];

        let series = build_daily_series(&transactions, 7, TODAY, DayAlignment::Utc);

        let bucket = series
            .iter()
            .find(|bucket| bucket.date == DayKey::new(date!(2025 - 03 - 12)))
            .unwrap();
        assert_eq!(bucket.deposit, 25.0);
        assert_eq!(bucket.total, 25.0);
        assert_eq!(bucket.send, 0.0);
        assert_eq!(bucket.withdraw, 0.0);
    }

    #[test]
    fn window_total_equals_sum_of_in_window_amounts() {
        let transactions: Vec<Transaction> = (0..60)
            .map(|days_ago| {
                let transaction_type = match days_ago % 3 {
                    0 => TransactionType::Send,
                    1 => TransactionType::Withdraw,
                    _ => TransactionType::Deposit,
                };
                create_test_transaction((days_ago + 1) as f64, transaction_type, noon(days_ago))
            })
            .collect();

        let series = build_daily_series(&transactions, 30, TODAY, DayAlignment::Utc);

        let series_total: f64 = series.iter().map(|bucket| bucket.total).sum();
        let want: f64 = (1..=30).map(|amount| amount as f64).sum();
        assert_eq!(series_total, want);
    }

    #[test]
    fn unknown_type_counts_towards_total_only() {
        let transactions = vec![create_test_transaction(
            9.0,
            TransactionType::Other("refund".to_owned()),
            noon(0),
        )];

        let series = build_daily_series(&transactions, 3, TODAY, DayAlignment::Utc);

        let today = series.last().unwrap();
        assert_eq!(today.total, 9.0);
        assert_eq!(today.send + today.withdraw + today.deposit, 0.0);
        assert_eq!(sum_by_type(&transactions), TypeTotals::default());
    }

    #[test]
    fn transactions_without_timestamp_are_skipped() {
        let transactions = vec![create_test_transaction(50.0, TransactionType::Send, None)];

        let series = build_daily_series(&transactions, 5, TODAY, DayAlignment::Utc);

        assert!(series.iter().all(|bucket| bucket.total == 0.0));
        assert_eq!(sum_by_type(&transactions).send, 50.0);
    }

    #[test]
    fn zero_amount_contributes_nothing() {
        let transactions = vec![create_test_transaction(0.0, TransactionType::Send, noon(0))];

        let series = build_daily_series(&transactions, 2, TODAY, DayAlignment::Utc);

        assert_eq!(series.last().unwrap().total, 0.0);
    }

    #[test]
    fn future_transactions_are_outside_the_window() {
        let transactions = vec![create_test_transaction(
            12.0,
            TransactionType::Deposit,
            noon(-1),
        )];

        let series = build_daily_series(&transactions, 30, TODAY, DayAlignment::Utc);

        assert!(series.iter().all(|bucket| bucket.total == 0.0));
    }

    #[test]
    fn alignment_decides_the_bucket() {
        let late_evening = Some(datetime!(2025-03-14 23:30 -5));
        let transactions = vec![create_test_transaction(
            20.0,
            TransactionType::Send,
            late_evening,
        )];

        let utc = build_daily_series(&transactions, 2, TODAY, DayAlignment::Utc);
        let local = build_daily_series(
            &transactions,
            2,
            TODAY,
            DayAlignment::Offset(offset!(-5)),
        );

        assert_eq!(utc[0].total, 0.0);
        assert_eq!(utc[1].total, 20.0);
        assert_eq!(local[0].total, 20.0);
        assert_eq!(local[1].total, 0.0);
    }

    #[test]
    fn series_now_ends_on_current_day() {
        let series = build_daily_series_now(&[], 7, DayAlignment::Utc);

        assert_eq!(series.len(), 7);
        assert_eq!(
            series.last().unwrap().date,
            DayAlignment::Utc.today(OffsetDateTime::now_utc())
        );
    }

    #[test]
    fn series_serializes_dates_as_day_keys() {
        let series = build_daily_series(&[], 1, TODAY, DayAlignment::Utc);

        let json = serde_json::to_value(&series).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "date": "2025-03-15",
                "send": 0.0,
                "withdraw": 0.0,
                "deposit": 0.0,
                "total": 0.0
            }])
        );
    }

    #[test]
    fn sum_by_type_of_empty_list_is_zero() {
        assert_eq!(
            sum_by_type(&[]),
            TypeTotals {
                send: 0.0,
                withdraw: 0.0,
                deposit: 0.0
            }
        );
    }

    #[test]
    fn sum_by_type_ignores_order() {
        let mut transactions = vec![
            create_test_transaction(1.5, TransactionType::Send, noon(0)),
            create_test_transaction(2.0, TransactionType::Deposit, noon(90)),
            create_test_transaction(4.0, TransactionType::Withdraw, None),
            create_test_transaction(8.0, TransactionType::Send, noon(5)),
        ];

        let forwards = sum_by_type(&transactions);
        transactions.reverse();
        let backwards = sum_by_type(&transactions);

        assert_eq!(forwards, backwards);
        assert_eq!(
            forwards,
            TypeTotals {
                send: 9.5,
                withdraw: 4.0,
                deposit: 2.0
            }
        );
    }

    #[test]
    fn slices_are_labelled_in_chart_order() {
        let totals = TypeTotals {
            send: 1.0,
            withdraw: 2.0,
            deposit: 3.0,
        };

        assert_eq!(
            totals.slices(),
            [("Deposit", 3.0), ("Withdraw", 2.0), ("Send", 1.0)]
        );
        assert_eq!(totals.sum(), 6.0);
    }
}
