//! # LedgerDb — Persistent Storage Engine
//!
//! The persistence layer for the ledger, built on SQLite through sqlx.
//!
//! ## Table Layout
//!
//! | Table          | Row type              | Integrity                                  |
//! |----------------|-----------------------|--------------------------------------------|
//! | `users`        | [`User`]              | UNIQUE email                               |
//! | `wallets`      | [`Wallet`]            | FK user_id, CHECK balance ≥ 0, enum CHECK, UNIQUE (user_id, currency) |
//! | `transactions` | [`TransactionRecord`] | FK wallet_id, UNIQUE reference, enum CHECKs |
//!
//! ## Atomicity
//!
//! Callers group writes with [`LedgerDb::begin`]: either every statement in
//! the transaction commits or none does. Dropping the transaction without
//! committing rolls it back, so early-return error paths need no cleanup.
//!
//! ## Balance Arithmetic
//!
//! `balance` is only ever mutated through [`LedgerDb::credit_balance`] and
//! [`LedgerDb::debit_balance`] — `balance = balance ± delta` evaluated
//! inside SQLite, never computed in process space. Two concurrent mutations
//! of the same wallet therefore cannot lose an update: SQLite admits one
//! writer at a time and the arithmetic happens under that writer's lock.
//! The debit form carries a `balance >= delta` guard so check-and-debit is
//! a single indivisible statement.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqliteConnection, Transaction};

use crate::config::{DB_BUSY_TIMEOUT, DB_MAX_CONNECTIONS};
use crate::error::{LedgerError, LedgerResult};
use crate::model::{Currency, TransactionRecord, User, Wallet};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Executed in order at open. Each statement is idempotent so re-opening an
/// existing database is a no-op.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS users (
        id         TEXT PRIMARY KEY,
        email      TEXT NOT NULL UNIQUE,
        full_name  TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS wallets (
        id         TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL REFERENCES users(id),
        currency   TEXT NOT NULL DEFAULT 'NGN'
                   CHECK (currency IN ('NGN', 'USD')),
        balance    INTEGER NOT NULL DEFAULT 0 CHECK (balance >= 0),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS transactions (
        id          TEXT PRIMARY KEY,
        wallet_id   TEXT NOT NULL REFERENCES wallets(id),
        amount      INTEGER NOT NULL,
        type        TEXT NOT NULL
                    CHECK (type IN ('deposit', 'withdrawal', 'transfer', 'interest', 'fee')),
        status      TEXT NOT NULL DEFAULT 'pending'
                    CHECK (status IN ('pending', 'completed', 'failed')),
        reference   TEXT UNIQUE,
        description TEXT,
        created_at  TEXT NOT NULL
    )",
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_wallets_user_currency
        ON wallets (user_id, currency)",
    "CREATE INDEX IF NOT EXISTS idx_transactions_wallet_created
        ON transactions (wallet_id, created_at DESC)",
];

// ---------------------------------------------------------------------------
// LedgerDb
// ---------------------------------------------------------------------------

/// Persistent storage engine for the wallet ledger.
///
/// Wraps a sqlx connection pool and exposes typed accessors for users,
/// wallets, and transaction rows. Constructed once at process start and
/// injected into the engine — no hidden global handle.
///
/// # Thread Safety
///
/// `LedgerDb` is `Clone` (the pool is internally reference-counted) and can
/// be shared across tasks freely. SQLite serializes writers; readers run
/// concurrently under WAL.
#[derive(Debug, Clone)]
pub struct LedgerDb {
    pool: SqlitePool,
}

impl LedgerDb {
    /// Opens (or creates) a database file at the given path and ensures
    /// the schema exists.
    pub async fn open<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(DB_BUSY_TIMEOUT)
            .foreign_keys(true);

        Self::connect(options, DB_MAX_CONNECTIONS).await
    }

    /// Opens a private in-memory database.
    ///
    /// Ideal for unit tests — no filesystem side effects, no cleanup. The
    /// pool is pinned to a single connection that is never reaped, because
    /// an in-memory SQLite database lives and dies with its connection.
    pub async fn open_in_memory() -> LedgerResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Connects with explicit options. Escape hatch for deployments that
    /// need different pragmas or pool sizing.
    pub async fn connect(options: SqliteConnectOptions, max_connections: u32) -> LedgerResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.init_schema().await?;
        Ok(db)
    }

    /// Creates all tables and indexes if they don't exist. Idempotent.
    async fn init_schema(&self) -> LedgerResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Begins an atomic unit of work.
    ///
    /// Every multi-row mutation in the engine runs inside one of these.
    /// Commit explicitly; dropping without commit rolls back every write.
    pub async fn begin(&self) -> LedgerResult<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    // -- User reads ---------------------------------------------------------

    /// Fetches a user by primary key.
    pub async fn get_user(&self, id: &str) -> LedgerResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, full_name, created_at FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    /// Fetches a user by unique email.
    pub async fn get_user_by_email(&self, email: &str) -> LedgerResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, full_name, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    // -- Wallet reads -------------------------------------------------------

    /// Fetches a wallet by primary key.
    pub async fn get_wallet(&self, id: &str) -> LedgerResult<Option<Wallet>> {
        let row = sqlx::query(
            "SELECT id, user_id, currency, balance, created_at, updated_at
             FROM wallets WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_wallet).transpose()
    }

    /// Fetches the wallet a user holds in a given currency.
    pub async fn get_wallet_for_user(
        &self,
        user_id: &str,
        currency: Currency,
    ) -> LedgerResult<Option<Wallet>> {
        let row = sqlx::query(
            "SELECT id, user_id, currency, balance, created_at, updated_at
             FROM wallets WHERE user_id = ? AND currency = ?",
        )
        .bind(user_id)
        .bind(currency.as_str())
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_wallet).transpose()
    }

    /// Transaction-scoped variant of [`get_wallet_for_user`](Self::get_wallet_for_user)
    /// — the read sees the transaction-local view, which is what a transfer's
    /// balance check must be based on.
    pub async fn get_wallet_for_user_in(
        conn: &mut SqliteConnection,
        user_id: &str,
        currency: Currency,
    ) -> LedgerResult<Option<Wallet>> {
        let row = sqlx::query(
            "SELECT id, user_id, currency, balance, created_at, updated_at
             FROM wallets WHERE user_id = ? AND currency = ?",
        )
        .bind(user_id)
        .bind(currency.as_str())
        .fetch_optional(conn)
        .await?;
        row.as_ref().map(map_wallet).transpose()
    }

    /// Transaction-scoped user-by-email lookup.
    pub async fn get_user_by_email_in(
        conn: &mut SqliteConnection,
        email: &str,
    ) -> LedgerResult<Option<User>> {
        let row = sqlx::query("SELECT id, email, full_name, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(conn)
            .await?;
        row.as_ref().map(map_user).transpose()
    }

    // -- Transaction-row reads ----------------------------------------------

    /// Fetches a ledger entry by primary key.
    pub async fn get_transaction(&self, id: &str) -> LedgerResult<Option<TransactionRecord>> {
        let row = sqlx::query(
            "SELECT id, wallet_id, amount, type, status, reference, description, created_at
             FROM transactions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_transaction).transpose()
    }

    /// Fetches a ledger entry by its unique external reference.
    pub async fn get_transaction_by_reference(
        &self,
        reference: &str,
    ) -> LedgerResult<Option<TransactionRecord>> {
        let row = sqlx::query(
            "SELECT id, wallet_id, amount, type, status, reference, description, created_at
             FROM transactions WHERE reference = ?",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(map_transaction).transpose()
    }

    /// The most recent entries for a wallet, newest first.
    ///
    /// Ordered by creation time with insertion order (rowid) breaking ties,
    /// so two entries written in the same millisecond — a transfer's debit
    /// and credit, say — still come back in a stable, meaningful order.
    pub async fn recent_transactions(
        &self,
        wallet_id: &str,
        limit: u32,
    ) -> LedgerResult<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            "SELECT id, wallet_id, amount, type, status, reference, description, created_at
             FROM transactions WHERE wallet_id = ?
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?",
        )
        .bind(wallet_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_transaction).collect()
    }

    /// Sum of completed entry amounts for a wallet.
    ///
    /// The reconciliation check: this must equal the wallet's balance after
    /// every committed operation.
    pub async fn completed_sum(&self, wallet_id: &str) -> LedgerResult<i64> {
        let sum: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM transactions
             WHERE wallet_id = ? AND status = 'completed'",
        )
        .bind(wallet_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(sum)
    }

    // -- Writes (transaction-scoped) ----------------------------------------

    /// Inserts a user row.
    pub async fn insert_user(conn: &mut SqliteConnection, user: &User) -> LedgerResult<()> {
        sqlx::query("INSERT INTO users (id, email, full_name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.full_name)
            .bind(user.created_at)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Inserts a wallet row.
    pub async fn insert_wallet(conn: &mut SqliteConnection, wallet: &Wallet) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO wallets (id, user_id, currency, balance, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&wallet.id)
        .bind(&wallet.user_id)
        .bind(wallet.currency.as_str())
        .bind(wallet.balance)
        .bind(wallet.created_at)
        .bind(wallet.updated_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Inserts a ledger entry.
    pub async fn insert_transaction(
        conn: &mut SqliteConnection,
        record: &TransactionRecord,
    ) -> LedgerResult<()> {
        sqlx::query(
            "INSERT INTO transactions
                (id, wallet_id, amount, type, status, reference, description, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.wallet_id)
        .bind(record.amount)
        .bind(record.kind.as_str())
        .bind(record.status.as_str())
        .bind(&record.reference)
        .bind(&record.description)
        .bind(record.created_at)
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Server-side balance increment: `balance = balance + amount`,
    /// refreshing `updated_at`. Returns the number of rows touched — zero
    /// means the wallet doesn't exist.
    pub async fn credit_balance(
        conn: &mut SqliteConnection,
        wallet_id: &str,
        amount: i64,
        now: DateTime<Utc>,
    ) -> LedgerResult<u64> {
        let result = sqlx::query("UPDATE wallets SET balance = balance + ?, updated_at = ? WHERE id = ?")
            .bind(amount)
            .bind(now)
            .bind(wallet_id)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    /// Guarded server-side balance decrement.
    ///
    /// The `balance >= amount` predicate makes check-and-debit one
    /// indivisible statement: zero rows touched means either the wallet is
    /// missing or the funds aren't there, and in both cases nothing moved.
    /// Correct at any isolation level — this is the statement that closes
    /// the read-then-write overdraft race.
    pub async fn debit_balance(
        conn: &mut SqliteConnection,
        wallet_id: &str,
        amount: i64,
        now: DateTime<Utc>,
    ) -> LedgerResult<u64> {
        let result = sqlx::query(
            "UPDATE wallets SET balance = balance - ?, updated_at = ?
             WHERE id = ? AND balance >= ?",
        )
        .bind(amount)
        .bind(now)
        .bind(wallet_id)
        .bind(amount)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    // -- Utility operations -------------------------------------------------

    /// Number of user rows.
    pub async fn user_count(&self) -> LedgerResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Number of wallet rows.
    pub async fn wallet_count(&self) -> LedgerResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM wallets")
            .fetch_one(&self.pool)
            .await?)
    }

    /// Number of ledger entries.
    pub async fn transaction_count(&self) -> LedgerResult<i64> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM transactions")
            .fetch_one(&self.pool)
            .await?)
    }
}

// ---------------------------------------------------------------------------
// Row Mapping
// ---------------------------------------------------------------------------

fn map_user(row: &SqliteRow) -> LedgerResult<User> {
    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        created_at: row.try_get("created_at")?,
    })
}

fn map_wallet(row: &SqliteRow) -> LedgerResult<Wallet> {
    let currency: String = row.try_get("currency")?;
    Ok(Wallet {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        currency: currency
            .parse()
            .map_err(|e: crate::model::types::UnknownEnumValue| {
                LedgerError::CorruptRecord(e.to_string())
            })?,
        balance: row.try_get("balance")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn map_transaction(row: &SqliteRow) -> LedgerResult<TransactionRecord> {
    let kind: String = row.try_get("type")?;
    let status: String = row.try_get("status")?;
    Ok(TransactionRecord {
        id: row.try_get("id")?,
        wallet_id: row.try_get("wallet_id")?,
        amount: row.try_get("amount")?,
        kind: kind
            .parse()
            .map_err(|e: crate::model::types::UnknownEnumValue| {
                LedgerError::CorruptRecord(e.to_string())
            })?,
        status: status
            .parse()
            .map_err(|e: crate::model::types::UnknownEnumValue| {
                LedgerError::CorruptRecord(e.to_string())
            })?,
        reference: row.try_get("reference")?,
        description: row.try_get("description")?,
        created_at: row.try_get("created_at")?,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::is_unique_violation;
    use crate::model::{TransactionKind, TransactionStatus};

    async fn seeded_db() -> (LedgerDb, User, Wallet) {
        let db = LedgerDb::open_in_memory().await.expect("open db");
        let user = User::new("ada@kudi.test", Some("Ada"));
        let wallet = Wallet::new(&user.id, Currency::Ngn);

        let mut tx = db.begin().await.unwrap();
        LedgerDb::insert_user(&mut tx, &user).await.unwrap();
        LedgerDb::insert_wallet(&mut tx, &wallet).await.unwrap();
        tx.commit().await.unwrap();

        (db, user, wallet)
    }

    #[tokio::test]
    async fn open_in_memory_starts_empty() {
        let db = LedgerDb::open_in_memory().await.expect("open db");
        assert_eq!(db.user_count().await.unwrap(), 0);
        assert_eq!(db.wallet_count().await.unwrap(), 0);
        assert_eq!(db.transaction_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn open_persistent_database() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ledger.db");

        let db = LedgerDb::open(&path).await.expect("open db");
        let user = User::new("first@kudi.test", None);
        let mut tx = db.begin().await.unwrap();
        LedgerDb::insert_user(&mut tx, &user).await.unwrap();
        tx.commit().await.unwrap();
        drop(db);

        // Re-open: data survives, schema init is idempotent.
        let db2 = LedgerDb::open(&path).await.expect("reopen db");
        assert_eq!(db2.user_count().await.unwrap(), 1);
        let found = db2.get_user(&user.id).await.unwrap().expect("user persists");
        assert_eq!(found.email, "first@kudi.test");
    }

    #[tokio::test]
    async fn user_round_trip() {
        let (db, user, _) = seeded_db().await;

        let by_id = db.get_user(&user.id).await.unwrap().expect("by id");
        assert_eq!(by_id, user);

        let by_email = db
            .get_user_by_email("ada@kudi.test")
            .await
            .unwrap()
            .expect("by email");
        assert_eq!(by_email.id, user.id);

        assert!(db.get_user("nope").await.unwrap().is_none());
        assert!(db.get_user_by_email("nobody@x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_hits_unique_constraint() {
        let (db, _, _) = seeded_db().await;
        let dup = User::new("ada@kudi.test", None);

        let mut tx = db.begin().await.unwrap();
        let err = LedgerDb::insert_user(&mut tx, &dup).await.unwrap_err();
        match err {
            LedgerError::Storage(e) => assert!(is_unique_violation(&e)),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wallet_round_trip_and_user_currency_lookup() {
        let (db, user, wallet) = seeded_db().await;

        let by_id = db.get_wallet(&wallet.id).await.unwrap().expect("by id");
        assert_eq!(by_id.balance, 0);
        assert_eq!(by_id.currency, Currency::Ngn);

        let by_user = db
            .get_wallet_for_user(&user.id, Currency::Ngn)
            .await
            .unwrap()
            .expect("by user");
        assert_eq!(by_user.id, wallet.id);

        assert!(db
            .get_wallet_for_user(&user.id, Currency::Usd)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn second_wallet_same_currency_rejected() {
        let (db, user, _) = seeded_db().await;
        let second = Wallet::new(&user.id, Currency::Ngn);

        let mut tx = db.begin().await.unwrap();
        let err = LedgerDb::insert_wallet(&mut tx, &second).await.unwrap_err();
        match err {
            LedgerError::Storage(e) => assert!(is_unique_violation(&e)),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn wallet_requires_existing_user() {
        let db = LedgerDb::open_in_memory().await.unwrap();
        let orphan = Wallet::new("ghost-user", Currency::Ngn);

        let mut tx = db.begin().await.unwrap();
        let result = LedgerDb::insert_wallet(&mut tx, &orphan).await;
        assert!(result.is_err(), "foreign key should reject orphan wallet");
    }

    #[tokio::test]
    async fn credit_and_debit_move_balance() {
        let (db, _, wallet) = seeded_db().await;
        let now = Utc::now();

        let mut tx = db.begin().await.unwrap();
        assert_eq!(
            LedgerDb::credit_balance(&mut tx, &wallet.id, 5000, now)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            LedgerDb::debit_balance(&mut tx, &wallet.id, 2000, now)
                .await
                .unwrap(),
            1
        );
        tx.commit().await.unwrap();

        let after = db.get_wallet(&wallet.id).await.unwrap().unwrap();
        assert_eq!(after.balance, 3000);
        assert!(after.updated_at >= wallet.updated_at);
    }

    #[tokio::test]
    async fn guarded_debit_refuses_overdraft() {
        let (db, _, wallet) = seeded_db().await;
        let now = Utc::now();

        let mut tx = db.begin().await.unwrap();
        LedgerDb::credit_balance(&mut tx, &wallet.id, 100, now)
            .await
            .unwrap();
        // 200 > 100: guard fails, zero rows touched.
        assert_eq!(
            LedgerDb::debit_balance(&mut tx, &wallet.id, 200, now)
                .await
                .unwrap(),
            0
        );
        tx.commit().await.unwrap();

        let after = db.get_wallet(&wallet.id).await.unwrap().unwrap();
        assert_eq!(after.balance, 100);
    }

    #[tokio::test]
    async fn credit_missing_wallet_touches_nothing() {
        let (db, _, _) = seeded_db().await;
        let mut tx = db.begin().await.unwrap();
        assert_eq!(
            LedgerDb::credit_balance(&mut tx, "no-such-wallet", 100, Utc::now())
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn check_constraint_is_the_backstop() {
        // Bypassing the guard must still not produce a negative balance:
        // the CHECK constraint is the last line of defense.
        let (db, _, wallet) = seeded_db().await;
        let mut tx = db.begin().await.unwrap();
        let result = sqlx::query("UPDATE wallets SET balance = balance - 1 WHERE id = ?")
            .bind(&wallet.id)
            .execute(&mut *tx)
            .await;
        assert!(result.is_err(), "CHECK (balance >= 0) should reject");
    }

    #[tokio::test]
    async fn transaction_row_round_trip() {
        let (db, _, wallet) = seeded_db().await;
        let record = TransactionRecord::completed(
            &wallet.id,
            5000,
            TransactionKind::Deposit,
            Some("REF-roundtrip".into()),
            Some("Wallet Deposit".into()),
        );

        let mut tx = db.begin().await.unwrap();
        LedgerDb::insert_transaction(&mut tx, &record).await.unwrap();
        tx.commit().await.unwrap();

        let by_id = db.get_transaction(&record.id).await.unwrap().expect("by id");
        assert_eq!(by_id.amount, 5000);
        assert_eq!(by_id.kind, TransactionKind::Deposit);
        assert_eq!(by_id.status, TransactionStatus::Completed);

        let by_ref = db
            .get_transaction_by_reference("REF-roundtrip")
            .await
            .unwrap()
            .expect("by reference");
        assert_eq!(by_ref.id, record.id);
    }

    #[tokio::test]
    async fn duplicate_reference_hits_unique_constraint() {
        let (db, _, wallet) = seeded_db().await;
        let first = TransactionRecord::completed(
            &wallet.id,
            100,
            TransactionKind::Deposit,
            Some("REF-once".into()),
            None,
        );
        let second = TransactionRecord::completed(
            &wallet.id,
            100,
            TransactionKind::Deposit,
            Some("REF-once".into()),
            None,
        );

        let mut tx = db.begin().await.unwrap();
        LedgerDb::insert_transaction(&mut tx, &first).await.unwrap();
        tx.commit().await.unwrap();

        let mut tx = db.begin().await.unwrap();
        let err = LedgerDb::insert_transaction(&mut tx, &second).await.unwrap_err();
        match err {
            LedgerError::Storage(e) => assert!(is_unique_violation(&e)),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn null_references_do_not_collide() {
        // UNIQUE on a nullable column: NULLs are all distinct in SQLite.
        let (db, _, wallet) = seeded_db().await;
        let a = TransactionRecord::completed(&wallet.id, 10, TransactionKind::Interest, None, None);
        let b = TransactionRecord::completed(&wallet.id, 20, TransactionKind::Interest, None, None);

        let mut tx = db.begin().await.unwrap();
        LedgerDb::insert_transaction(&mut tx, &a).await.unwrap();
        LedgerDb::insert_transaction(&mut tx, &b).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.transaction_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn recent_transactions_newest_first() {
        let (db, _, wallet) = seeded_db().await;

        let mut tx = db.begin().await.unwrap();
        for i in 0..5i64 {
            let mut record = TransactionRecord::completed(
                &wallet.id,
                (i + 1) * 100,
                TransactionKind::Deposit,
                Some(format!("REF-{i}")),
                None,
            );
            // Spread creation times one second apart so ordering is by time,
            // not just insertion.
            record.created_at = Utc::now() - chrono::Duration::seconds(10 - i);
            LedgerDb::insert_transaction(&mut tx, &record).await.unwrap();
        }
        tx.commit().await.unwrap();

        let recent = db.recent_transactions(&wallet.id, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].amount, 500);
        assert_eq!(recent[1].amount, 400);
        assert_eq!(recent[2].amount, 300);
    }

    #[tokio::test]
    async fn recent_transactions_ties_break_by_insertion_order() {
        let (db, _, wallet) = seeded_db().await;
        let stamp = Utc::now();

        let mut tx = db.begin().await.unwrap();
        for i in 0..3i64 {
            let mut record = TransactionRecord::completed(
                &wallet.id,
                i + 1,
                TransactionKind::Deposit,
                Some(format!("REF-tie-{i}")),
                None,
            );
            record.created_at = stamp;
            LedgerDb::insert_transaction(&mut tx, &record).await.unwrap();
        }
        tx.commit().await.unwrap();

        let recent = db.recent_transactions(&wallet.id, 10).await.unwrap();
        // Same timestamp: latest insertion wins.
        assert_eq!(recent.iter().map(|t| t.amount).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn completed_sum_ignores_pending_and_failed() {
        let (db, _, wallet) = seeded_db().await;

        let mut completed =
            TransactionRecord::completed(&wallet.id, 5000, TransactionKind::Deposit, None, None);
        completed.status = TransactionStatus::Completed;
        let mut pending =
            TransactionRecord::completed(&wallet.id, 700, TransactionKind::Deposit, None, None);
        pending.status = TransactionStatus::Pending;
        let mut failed =
            TransactionRecord::completed(&wallet.id, -300, TransactionKind::Transfer, None, None);
        failed.status = TransactionStatus::Failed;

        let mut tx = db.begin().await.unwrap();
        for record in [&completed, &pending, &failed] {
            LedgerDb::insert_transaction(&mut tx, record).await.unwrap();
        }
        tx.commit().await.unwrap();

        assert_eq!(db.completed_sum(&wallet.id).await.unwrap(), 5000);
    }

    #[tokio::test]
    async fn dropped_transaction_rolls_back() {
        let (db, _, wallet) = seeded_db().await;

        {
            let mut tx = db.begin().await.unwrap();
            LedgerDb::credit_balance(&mut tx, &wallet.id, 9999, Utc::now())
                .await
                .unwrap();
            // tx dropped here without commit.
        }

        let after = db.get_wallet(&wallet.id).await.unwrap().unwrap();
        assert_eq!(after.balance, 0, "uncommitted credit must vanish");
    }

    #[tokio::test]
    async fn schema_rejects_unknown_enum_text() {
        let (db, _, wallet) = seeded_db().await;
        let mut tx = db.begin().await.unwrap();
        let result = sqlx::query(
            "INSERT INTO transactions (id, wallet_id, amount, type, status, created_at)
             VALUES ('x', ?, 1, 'chargeback', 'completed', ?)",
        )
        .bind(&wallet.id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await;
        assert!(result.is_err(), "CHECK on type should reject unknown kind");
    }
}
