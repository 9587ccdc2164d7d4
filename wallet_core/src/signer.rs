//! The signing capability consumed by the signing flow.

use meridian_crypto::{derive_address, keypair_from_private, keypair_from_secret, sign_message};
use meridian_types::{Address, KeyPair, PrivateKey, PublicKey, Signature};

use crate::error::{SignerError, WalletError};
use crate::keystore::{decrypt_keystore, KeystoreFile};

/// Anything that turns sign bytes into a signature.
///
/// The signer reports which address it signed for; the caller attaches the
/// signature only when that address owns an endorsement.
pub trait TxSigner {
    fn sign(&self, sign_bytes: &[u8]) -> Result<(Address, Signature), SignerError>;
}

/// Software signer holding an Ed25519 key in memory.
pub struct LocalSigner {
    keypair: KeyPair,
    address: Address,
}

impl LocalSigner {
    pub fn new(keypair: KeyPair) -> Self {
        let address = derive_address(&keypair.public);
        Self { keypair, address }
    }

    pub fn from_private(private: PrivateKey) -> Self {
        Self::new(keypair_from_private(private))
    }

    /// Deterministic signer for test accounts.
    pub fn from_secret(secret: &str) -> Self {
        Self::new(keypair_from_secret(secret))
    }

    /// Unlock a keystore and check it belongs to the address it claims.
    pub fn from_keystore(keystore: &KeystoreFile, password: &str) -> Result<Self, WalletError> {
        let seed = decrypt_keystore(keystore, password)?;
        let signer = Self::from_private(PrivateKey(*seed));
        if signer.address != keystore.address {
            return Err(WalletError::Key(format!(
                "keystore is for {} but key derives {}",
                keystore.address, signer.address
            )));
        }
        Ok(signer)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.keypair.public
    }

    pub(crate) fn private_key(&self) -> &PrivateKey {
        &self.keypair.private
    }
}

impl TxSigner for LocalSigner {
    fn sign(&self, sign_bytes: &[u8]) -> Result<(Address, Signature), SignerError> {
        Ok((self.address, sign_message(sign_bytes, &self.keypair.private)))
    }
}

impl std::fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
