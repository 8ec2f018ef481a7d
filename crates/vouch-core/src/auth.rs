//! # Owner Authorization
//!
//! Administrative operations (adding epochs, creating groups and dapps)
//! require an [`OwnerAuthorization`]. The only constructor is
//! [`Owner::authorize`], so holding one proves the facade already checked
//! the caller. Core operations never look up "the current caller".

use serde::{Deserialize, Serialize};

use crate::error::VouchError;
use crate::identity::Address;

/// The designated registry owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owner(Address);

impl Owner {
    /// Designate `address` as owner.
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    /// The owner's address.
    pub fn address(&self) -> &Address {
        &self.0
    }

    /// Check `caller` against the owner, yielding the capability on success.
    pub fn authorize(&self, caller: &Address) -> Result<OwnerAuthorization, VouchError> {
        if caller == &self.0 && !caller.is_zero() {
            Ok(OwnerAuthorization { owner: self.0 })
        } else {
            Err(VouchError::NotAuthorized {
                caller: caller.to_hex(),
            })
        }
    }
}

/// Proof that the caller of an administrative operation is the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerAuthorization {
    owner: Address,
}

impl OwnerAuthorization {
    /// The authorized owner.
    pub fn owner(&self) -> &Address {
        &self.owner
    }
}
