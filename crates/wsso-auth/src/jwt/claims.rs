//! Claims carried inside signed tokens and the tagged payload wrapper.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identity claims minted at login from live directory lookups.
///
/// The admin flag is a snapshot: it reflects group membership at the time
/// of issuance and is trusted until the token expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Directory login name.
    pub username: String,
    /// Group memberships at issuance.
    pub groups: BTreeSet<String>,
    /// Whether the identity belonged to the admin group at issuance.
    pub admin: bool,
}

impl Claims {
    /// Builds claims for the given identity.
    pub fn new(
        username: impl Into<String>,
        groups: impl IntoIterator<Item = String>,
        admin: bool,
    ) -> Self {
        Self {
            username: username.into(),
            groups: groups.into_iter().collect(),
            admin,
        }
    }

    /// Returns true when the claims grant elevated access.
    pub fn is_admin(&self) -> bool {
        self.admin
    }

    /// Checks membership in a named group.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}

/// Purpose of a marker token that carries no identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPurpose {
    /// Short-lived login-link marker. It is reusable until it expires and
    /// only proves the link was minted here; it opens no session.
    Auth,
}

impl MarkerPurpose {
    /// Wire name of the purpose.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
        }
    }
}

impl std::fmt::Display for MarkerPurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized form of everything a token may carry.
///
/// The `kind` tag keeps claims and markers apart at decode time, so a
/// marker can never be mistaken for a claims document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TokenPayload {
    /// Identity claims.
    Claims(Claims),
    /// Purpose-tagged marker.
    Marker {
        /// What the marker authorizes.
        purpose: MarkerPurpose,
    },
}

/// Result of verifying a token: either claims or a marker, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifiedToken {
    Claims(Claims),
    Marker(MarkerPurpose),
}

impl VerifiedToken {
    /// Returns the claims, if this token carries any.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Self::Claims(claims) => Some(claims),
            Self::Marker(_) => None,
        }
    }

    /// Returns true when this is a marker of the given purpose.
    pub fn is_marker(&self, purpose: MarkerPurpose) -> bool {
        matches!(self, Self::Marker(p) if *p == purpose)
    }
}

impl From<TokenPayload> for VerifiedToken {
    fn from(payload: TokenPayload) -> Self {
        match payload {
            TokenPayload::Claims(claims) => Self::Claims(claims),
            TokenPayload::Marker { purpose } => Self::Marker(purpose),
        }
    }
}
