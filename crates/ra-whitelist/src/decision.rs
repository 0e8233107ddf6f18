//! Trust decisions.

use std::fmt;

/// Outcome of checking a peer against the whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustDecision {
    /// Name listed and identity matches exactly.
    Trusted,
    /// Anything else; the protected operation must not run.
    Untrusted(UntrustedReason),
}

impl TrustDecision {
    /// Whether the peer may proceed.
    pub fn is_trusted(&self) -> bool {
        matches!(self, TrustDecision::Trusted)
    }

    /// Label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrustDecision::Trusted => "trusted",
            TrustDecision::Untrusted(reason) => reason.as_str(),
        }
    }
}

/// Why a peer was not trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UntrustedReason {
    /// Claimed component name is not listed.
    UnknownComponent,
    /// Presented identity differs from the stored value.
    IdentityMismatch,
    /// Reserved entry consulted before bootstrap filled it.
    Unpopulated,
}

impl UntrustedReason {
    /// Label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            UntrustedReason::UnknownComponent => "unknown_component",
            UntrustedReason::IdentityMismatch => "identity_mismatch",
            UntrustedReason::Unpopulated => "unpopulated",
        }
    }
}

impl fmt::Display for TrustDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
