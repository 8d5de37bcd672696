// Copyright 2025 the Embedsync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The allow-list of origins permitted to issue control messages.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

/// Why an origin string was refused when building a [`TrustedOrigins`] set.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum OriginError {
    /// `*` and `null` match no single origin and are never allowed.
    #[error("wildcard origin {0:?} is not allowed")]
    Wildcard(String),
    /// The entry has no `scheme://` prefix.
    #[error("origin {0:?} has no scheme")]
    MissingScheme(String),
    /// The entry carries a path (or a trailing slash), so it can never equal a reported origin.
    #[error("origin {0:?} must not contain a path")]
    HasPath(String),
}

/// An immutable set of origins (scheme, host and port).
///
/// Membership is exact string equality: no wildcards, no prefixes, no case folding.
/// The set is fixed at construction and has no mutating methods.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TrustedOrigins {
    origins: Box<[String]>,
}

impl TrustedOrigins {
    /// Build the set, refusing entries that could never match a browser-reported origin.
    ///
    /// Duplicates are collapsed.
    pub fn new<I, S>(origins: I) -> Result<Self, OriginError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out: Vec<String> = Vec::new();
        for origin in origins {
            let origin = origin.into();
            validate(&origin)?;
            if !out.contains(&origin) {
                out.push(origin);
            }
        }
        Ok(Self {
            origins: out.into_boxed_slice(),
        })
    }

    /// A set that trusts nobody.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if `origin` is exactly one of the trusted origins.
    pub fn contains(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    /// Iterate the trusted origins in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }

    /// Number of trusted origins.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Returns `true` if nothing is trusted.
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

fn validate(origin: &str) -> Result<(), OriginError> {
    if origin == "*" || origin == "null" {
        return Err(OriginError::Wildcard(origin.into()));
    }
    let Some((_, authority)) = origin.split_once("://") else {
        return Err(OriginError::MissingScheme(origin.into()));
    };
    if authority.is_empty() {
        return Err(OriginError::MissingScheme(origin.into()));
    }
    if authority.contains('/') {
        return Err(OriginError::HasPath(origin.into()));
    }
    if authority.contains('*') {
        return Err(OriginError::Wildcard(origin.into()));
    }
    Ok(())
}
