//! # Account Manager
//!
//! Owns the account repository and hands out fresh signing sessions.
//!
//! ## Concurrency
//!
//! Repository access goes through a read/write lock: session resolution
//! takes the read lock, generate/import take the write lock. Addresses are
//! case-normalized to lower-cased hex before every lookup or store. Lock
//! guards are never held across await points.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use shared_types::{address_to_hex, Address};

use crate::domain::account::Account;
use crate::domain::errors::SignerError;
use crate::domain::session::{AccountSet, SigningSession, Unconfigured};
use crate::ports::SecretStore;

/// Account repository plus secret-store persistence.
///
/// The backend varies at construction time (in-memory, vault-backed); the
/// manager itself is internally synchronized and safe to share across
/// envelope tasks behind an `Arc`.
pub struct AccountManager<S> {
    accounts: RwLock<HashMap<String, Account>>,
    store: S,
}

impl<S: SecretStore> AccountManager<S> {
    /// Creates a manager over the given secret store.
    pub fn new(store: S) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            store,
        }
    }

    /// Resolves a fresh signing session bound to the account registered
    /// under `address`.
    ///
    /// Falls back to the secret store on a repository miss so restarts do
    /// not lose imported accounts. Unknown addresses yield a not-found
    /// error.
    pub async fn signing_session(
        &self,
        address: &Address,
    ) -> Result<SigningSession<AccountSet>, SignerError> {
        let key = address_to_hex(address);

        let cached = self.accounts.read().get(&key).cloned();
        if let Some(account) = cached {
            return Ok(SigningSession::new().with_account(account));
        }

        match self.store.load(&key).await? {
            Some(hex_key) => {
                let account = Account::from_hex_key(&hex_key)?;
                debug!(address = %key, "Account rehydrated from secret store");
                self.accounts.write().insert(key, account.clone());
                Ok(SigningSession::new().with_account(account))
            }
            None => Err(SignerError::NotFound(key)),
        }
    }

    /// Generates, persists, and registers a new account. Returns its
    /// address.
    pub async fn generate_account(&self) -> Result<Address, SignerError> {
        let account = Account::generate();
        let address = self.register(account).await?;
        info!(address = %address_to_hex(&address), "Generated new account");
        Ok(address)
    }

    /// Imports a hex-encoded private key, persisting it under its derived
    /// address.
    pub async fn import_private_key(&self, hex_key: &str) -> Result<Address, SignerError> {
        let account = Account::from_hex_key(hex_key)?;
        let address = self.register(account).await?;
        info!(address = %address_to_hex(&address), "Imported private key");
        Ok(address)
    }

    /// Number of accounts currently in the repository.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.accounts.read().len()
    }

    /// Persists and registers a new account, rejecting address collisions.
    ///
    /// A collision is cryptographically improbable for generated keys but
    /// routine for double imports. Two concurrent imports of the same key
    /// can both pass the probe below (the lock cannot be held across the
    /// store await); the re-check under the write lock is the authoritative
    /// one, and the store write it may leave behind is idempotent because
    /// an identical address always carries identical key material.
    async fn register(&self, account: Account) -> Result<Address, SignerError> {
        let key = account.address_hex();

        let already_cached = self.accounts.read().contains_key(&key);
        if already_cached || self.store.load(&key).await?.is_some() {
            return Err(SignerError::AlreadyExists(key));
        }

        self.store.store(&key, &account.to_hex_key()).await?;
        let address = account.address();

        let mut accounts = self.accounts.write();
        if accounts.contains_key(&key) {
            return Err(SignerError::AlreadyExists(key));
        }
        accounts.insert(key, account);
        Ok(address)
    }
}

/// Convenience constructor for an unconfigured session, mostly useful when
/// the account comes from outside the repository (tests, tooling).
#[must_use]
pub fn new_session() -> SigningSession<Unconfigured> {
    SigningSession::new()
}
