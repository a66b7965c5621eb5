//! Authorization rules for catalog and user writes.
//!
//! Reads are open to everyone. Category and item writes need any
//! authenticated user. A user record may be changed or removed by its owner
//! or by the administrator. Every denial is the same [`Denied`] value, so
//! callers cannot tell "not logged in" from "not allowed".

use thiserror::Error;

use crate::constants::roles::ADMIN_USERNAME;
use crate::services::auth_service::{AuthScheme, Identity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// List or fetch categories, items or users.
    Read,
    /// Create, update or delete a category or an item.
    WriteCatalog,
    /// Self-registration.
    CreateUser,
    /// Update or delete the user whose username is `owner`.
    ModifyUser { owner: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("please authenticate")]
pub struct Denied;

/// Role predicate. The admin role has no table of its own; it is carried by
/// a single reserved username.
#[must_use]
pub fn is_admin(identity: &Identity) -> bool {
    identity.username() == Some(ADMIN_USERNAME)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AccessPolicy {
    catalog_writes_require_token: bool,
}

impl AccessPolicy {
    #[must_use]
    pub const fn new(catalog_writes_require_token: bool) -> Self {
        Self {
            catalog_writes_require_token,
        }
    }

    pub fn authorize(&self, identity: &Identity, action: Action<'_>) -> Result<(), Denied> {
        match action {
            Action::Read | Action::CreateUser => Ok(()),

            Action::WriteCatalog => match identity.principal() {
                Some(principal)
                    if !self.catalog_writes_require_token
                        || principal.scheme == AuthScheme::Token =>
                {
                    Ok(())
                }
                _ => Err(Denied),
            },

            Action::ModifyUser { owner } => match identity.username() {
                Some(actor) if actor == owner || is_admin(identity) => Ok(()),
                _ => Err(Denied),
            },
        }
    }

    /// Fails unless the identity is authenticated at all.
    pub fn require_authenticated(&self, identity: &Identity) -> Result<(), Denied> {
        if identity.is_authenticated() {
            Ok(())
        } else {
            Err(Denied)
        }
    }
}
