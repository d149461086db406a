//! Ed25519 signature verification against account keys.
//!
//! An account's identifier is its public key, so a signature "recovers" the
//! account exactly when it verifies under that key.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::{AccountId, LedgerError, Result};

/// Verify `signature` over a 32-byte content digest for `account`.
///
/// # Errors
/// Returns [`LedgerError::InvalidSignature`] if the key is malformed or the
/// signature does not verify.
pub fn verify_digest(account: &AccountId, digest: &[u8; 32], signature: &Signature) -> Result<()> {
    let key = VerifyingKey::from_bytes(account.as_bytes())
        .map_err(|_| LedgerError::InvalidSignature(*account))?;
    key.verify(digest, signature)
        .map_err(|_| LedgerError::InvalidSignature(*account))
}

/// Signing wallet for tests. **Never use in production.**
#[cfg(any(test, feature = "test-helpers"))]
pub struct TestWallet {
    key: ed25519_dalek::SigningKey,
}

#[cfg(any(test, feature = "test-helpers"))]
impl TestWallet {
    /// Generate a wallet with a random key.
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            key: ed25519_dalek::SigningKey::generate(&mut rng),
        }
    }

    pub fn account(&self) -> AccountId {
        AccountId(self.key.verifying_key().to_bytes())
    }

    pub fn sign_digest(&self, digest: &[u8; 32]) -> Signature {
        use ed25519_dalek::Signer;
        self.key.sign(digest)
    }

    pub fn sign_order(&self, order: &crate::Order) -> Signature {
        self.sign_digest(&order.hash().0)
    }

    pub fn sign_withdrawal(&self, withdrawal: &crate::Withdrawal) -> Signature {
        self.sign_digest(&withdrawal.hash().0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_signature_verifies() {
        let wallet = TestWallet::generate();
        let digest = [5u8; 32];
        let sig = wallet.sign_digest(&digest);
        assert!(verify_digest(&wallet.account(), &digest, &sig).is_ok());
    }

    #[test]
    fn wrong_account_rejected() {
        let signer = TestWallet::generate();
        let other = TestWallet::generate();
        let digest = [5u8; 32];
        let sig = signer.sign_digest(&digest);
        assert_eq!(
            verify_digest(&other.account(), &digest, &sig),
            Err(LedgerError::InvalidSignature(other.account()))
        );
    }

    #[test]
    fn tampered_digest_rejected() {
        let wallet = TestWallet::generate();
        let sig = wallet.sign_digest(&[5u8; 32]);
        assert!(verify_digest(&wallet.account(), &[6u8; 32], &sig).is_err());
    }
}
