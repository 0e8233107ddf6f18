//! The whitelist table and its builder.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use crate::decision::{TrustDecision, UntrustedReason};
use crate::error::WhiteListError;
use crate::identity::IdentityValue;

/// Name of the reserved entry describing this server's own component.
pub const SELF_COMPONENT_LABEL: &str = "AttestationServer";

#[derive(Debug, Clone)]
enum Entry {
    /// Reserved; bootstrap fills it before first use.
    Pending,
    Expected(IdentityValue),
}

/// Immutable component-name to identity table.
#[derive(Debug, Clone, Default)]
pub struct WhiteList {
    entries: HashMap<String, Entry>,
}

impl WhiteList {
    /// Start building a whitelist.
    pub fn builder() -> WhiteListBuilder {
        WhiteListBuilder::default()
    }

    /// Build from `(name, value)` pairs. Duplicate names fail the whole build.
    pub fn from_entries<I, N, V>(entries: I) -> Result<Self, WhiteListError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<IdentityValue>,
    {
        entries
            .into_iter()
            .fold(Self::builder(), |builder, (name, value)| builder.entry(name, value))
            .build()
    }

    /// The built-in list: only the reserved self entry, not yet populated.
    pub fn hard_coded() -> Self {
        let mut entries = HashMap::new();
        entries.insert(SELF_COMPONENT_LABEL.to_string(), Entry::Pending);
        Self { entries }
    }

    /// Expected identity for `name`.
    pub fn lookup(&self, name: &str) -> Result<&IdentityValue, WhiteListError> {
        match self.entries.get(name) {
            Some(Entry::Expected(value)) => Ok(value),
            Some(Entry::Pending) => Err(WhiteListError::Unpopulated(name.to_string())),
            None => Err(WhiteListError::NotFound(name.to_string())),
        }
    }

    /// Whether `name` has an entry, populated or not.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the whitelist has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every entry holds a value.
    pub fn is_populated(&self) -> bool {
        self.entries
            .values()
            .all(|entry| matches!(entry, Entry::Expected(_)))
    }

    /// Component names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Fill the reserved self entry. Consumes the list, so it happens before
    /// the list is shared.
    pub fn populate_reserved(
        mut self,
        value: impl Into<IdentityValue>,
    ) -> Result<Self, WhiteListError> {
        let entry = self
            .entries
            .get_mut(SELF_COMPONENT_LABEL)
            .ok_or_else(|| WhiteListError::NoReservedEntry(SELF_COMPONENT_LABEL.to_string()))?;
        if let Entry::Expected(_) = entry {
            return Err(WhiteListError::AlreadyPopulated(
                SELF_COMPONENT_LABEL.to_string(),
            ));
        }

        *entry = Entry::Expected(value.into());
        debug!(component = SELF_COMPONENT_LABEL, "Reserved whitelist entry populated");
        Ok(self)
    }

    /// Decide whether a peer claiming `name` and presenting `presented` is trusted.
    pub fn decide(&self, name: &str, presented: &[u8]) -> TrustDecision {
        let decision = match self.lookup(name) {
            Ok(expected) if expected.matches(presented) => TrustDecision::Trusted,
            Ok(expected) => {
                warn!(
                    component = %name,
                    expected = %hex::encode(expected.as_bytes()),
                    presented = %hex::encode(presented),
                    "Identity mismatch"
                );
                TrustDecision::Untrusted(UntrustedReason::IdentityMismatch)
            }
            Err(WhiteListError::Unpopulated(_)) => {
                error!(
                    component = %name,
                    "Reserved whitelist entry consulted before bootstrap"
                );
                TrustDecision::Untrusted(UntrustedReason::Unpopulated)
            }
            Err(_) => {
                warn!(component = %name, "Rejected unknown component");
                TrustDecision::Untrusted(UntrustedReason::UnknownComponent)
            }
        };
        debug!(component = %name, decision = %decision, "Trust decision");
        decision
    }
}

/// Collects entries and checks them once in [`WhiteListBuilder::build`].
#[derive(Debug, Default)]
pub struct WhiteListBuilder {
    entries: Vec<(String, Entry)>,
}

impl WhiteListBuilder {
    /// Add a populated entry.
    pub fn entry(mut self, name: impl Into<String>, value: impl Into<IdentityValue>) -> Self {
        self.entries
            .push((name.into(), Entry::Expected(value.into())));
        self
    }

    /// Add the reserved self entry with a placeholder value.
    pub fn reserve_self(mut self) -> Self {
        self.entries
            .push((SELF_COMPONENT_LABEL.to_string(), Entry::Pending));
        self
    }

    /// Build the whitelist, failing on the first duplicate name.
    pub fn build(self) -> Result<WhiteList, WhiteListError> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        for (name, entry) in self.entries {
            if entries.contains_key(&name) {
                return Err(WhiteListError::DuplicateName(name));
            }
            entries.insert(name, entry);
        }
        Ok(WhiteList { entries })
    }
}
