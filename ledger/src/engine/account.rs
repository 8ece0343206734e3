//! Account provisioning: explicit creation and idempotent first-contact
//! provisioning.
//!
//! Both paths uphold the same invariant: a user row never exists without
//! its NGN wallet row. User and wallet are inserted in one transaction, so
//! there is no window where an account is half-created.

use tracing::{debug, info};

use crate::error::{is_unique_violation, LedgerError, LedgerResult};
use crate::model::{Currency, User, Wallet};
use crate::store::LedgerDb;

use super::{CallerIdentity, CreateAccountInput, LedgerEngine};

impl LedgerEngine {
    /// Creates a new account: a user row plus a zero-balance NGN wallet.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MissingEmail`] for an empty email,
    /// [`LedgerError::DuplicateAccount`] when the email is already
    /// registered. On any error nothing is persisted.
    pub async fn create_account(&self, input: CreateAccountInput) -> LedgerResult<(User, Wallet)> {
        let email = input.email.trim();
        if email.is_empty() {
            return Err(LedgerError::MissingEmail);
        }

        let user = User::new(email, input.full_name.as_deref());
        let wallet = Wallet::new(&user.id, Currency::Ngn);

        let mut tx = self.db.begin().await?;
        if let Err(err) = LedgerDb::insert_user(&mut tx, &user).await {
            return Err(match err {
                LedgerError::Storage(e) if is_unique_violation(&e) => {
                    LedgerError::DuplicateAccount {
                        email: email.to_string(),
                    }
                }
                other => other,
            });
        }
        LedgerDb::insert_wallet(&mut tx, &wallet).await?;
        tx.commit().await?;

        info!(user_id = %user.id, wallet_id = %wallet.id, "account created");
        Ok((user, wallet))
    }

    /// Returns the caller's account, provisioning it on first contact.
    ///
    /// The created user row carries the identity's externally-issued id, so
    /// later calls with the same identity resolve to the same account. Two
    /// concurrent first contacts race on the unique constraints; the loser
    /// re-reads and returns the winner's rows. Idempotent by construction.
    ///
    /// # Errors
    ///
    /// [`LedgerError::MissingEmail`] if provisioning is needed and the
    /// identity has no email; [`LedgerError::DuplicateAccount`] if the
    /// email is already bound to a *different* user id.
    pub async fn ensure_account(&self, identity: &CallerIdentity) -> LedgerResult<(User, Wallet)> {
        if let Some(existing) = self.lookup_account(&identity.id).await? {
            return Ok(existing);
        }

        let email = identity.email.trim();
        if email.is_empty() {
            return Err(LedgerError::MissingEmail);
        }

        let user = User {
            id: identity.id.clone(),
            email: email.to_string(),
            full_name: identity.full_name.clone(),
            created_at: chrono::Utc::now(),
        };
        let wallet = Wallet::new(&user.id, Currency::Ngn);

        let mut tx = self.db.begin().await?;
        match LedgerDb::insert_user(&mut tx, &user).await {
            Ok(()) => {
                LedgerDb::insert_wallet(&mut tx, &wallet).await?;
                tx.commit().await?;
                info!(user_id = %user.id, "account provisioned on first contact");
                Ok((user, wallet))
            }
            Err(LedgerError::Storage(e)) if is_unique_violation(&e) => {
                // Lost a provisioning race (same id) or the email belongs to
                // an account created some other way. Re-read settles which.
                drop(tx);
                debug!(user_id = %identity.id, "provisioning raced, re-reading");
                self.lookup_account(&identity.id)
                    .await?
                    .ok_or(LedgerError::DuplicateAccount {
                        email: email.to_string(),
                    })
            }
            Err(other) => Err(other),
        }
    }

    /// Fetches user + NGN wallet by user id, or `None` if no such user.
    async fn lookup_account(&self, user_id: &str) -> LedgerResult<Option<(User, Wallet)>> {
        let Some(user) = self.db.get_user(user_id).await? else {
            return Ok(None);
        };
        let wallet = self
            .db
            .get_wallet_for_user(&user.id, Currency::Ngn)
            .await?
            .ok_or_else(|| {
                LedgerError::CorruptRecord(format!("user {} has no NGN wallet", user.id))
            })?;
        Ok(Some((user, wallet)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
