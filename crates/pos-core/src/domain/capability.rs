//! OS capabilities required by the terminal and the ordered sets they form.
//!
//! # Identifiers
//!
//! Each [`Capability`] has two names:
//!
//! - A short kebab-case name (`"radio-scan"`) used in configuration files and
//!   log output.
//! - The OS permission identifier (`"android.permission.BLUETOOTH_SCAN"`)
//!   that a real permission adapter passes to the platform.
//!
//! The order of [`PermissionSet::required`] matters: OS permission prompts
//! return one grant result per requested capability, in request order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error returned when a capability name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown capability name: {0:?}")]
pub struct ParseCapabilityError(pub String);

/// A single OS-level capability the terminal depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    /// Write access to shared storage (EMV configuration files).
    Storage,
    /// Pairing with short-range radio (Bluetooth) peripherals.
    RadioPairing,
    /// Administering the radio adapter (enable/disable, discovery).
    RadioAdmin,
    /// Scanning for nearby radio devices.
    RadioScan,
    /// Connecting to already-paired radio devices.
    RadioConnect,
    /// Approximate location.
    CoarseLocation,
    /// Precise location.
    FineLocation,
}

impl Capability {
    /// All capabilities, in the canonical request order.
    pub const ALL: [Capability; 7] = [
        Capability::Storage,
        Capability::RadioPairing,
        Capability::RadioAdmin,
        Capability::RadioScan,
        Capability::RadioConnect,
        Capability::CoarseLocation,
        Capability::FineLocation,
    ];

    /// Returns the OS permission identifier for this capability.
    pub fn identifier(self) -> &'static str {
        match self {
            Capability::Storage => "android.permission.WRITE_EXTERNAL_STORAGE",
            Capability::RadioPairing => "android.permission.BLUETOOTH",
            Capability::RadioAdmin => "android.permission.BLUETOOTH_ADMIN",
            Capability::RadioScan => "android.permission.BLUETOOTH_SCAN",
            Capability::RadioConnect => "android.permission.BLUETOOTH_CONNECT",
            Capability::CoarseLocation => "android.permission.ACCESS_COARSE_LOCATION",
            Capability::FineLocation => "android.permission.ACCESS_FINE_LOCATION",
        }
    }

    /// Returns the short kebab-case name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Capability::Storage => "storage",
            Capability::RadioPairing => "radio-pairing",
            Capability::RadioAdmin => "radio-admin",
            Capability::RadioScan => "radio-scan",
            Capability::RadioConnect => "radio-connect",
            Capability::CoarseLocation => "coarse-location",
            Capability::FineLocation => "fine-location",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = ParseCapabilityError;

    /// Accepts either the short name or the OS identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .into_iter()
            .find(|c| c.name() == s || c.identifier() == s)
            .ok_or_else(|| ParseCapabilityError(s.to_string()))
    }
}

/// An ordered, duplicate-free sequence of capabilities.
///
/// A set only exists for the duration of one check/request cycle; it has no
/// lifecycle of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Capability>", into = "Vec<Capability>")]
pub struct PermissionSet {
    capabilities: Vec<Capability>,
}

impl PermissionSet {
    /// The seven capabilities the terminal requests at start-up.
    pub fn required() -> Self {
        Self {
            capabilities: Capability::ALL.to_vec(),
        }
    }

    /// Returns the capabilities for which `granted` returns `false`, keeping
    /// the original order.
    pub fn missing(&self, granted: impl Fn(Capability) -> bool) -> PermissionSet {
        Self {
            capabilities: self
                .capabilities
                .iter()
                .copied()
                .filter(|c| !granted(*c))
                .collect(),
        }
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    /// Borrows the set as a slice, in order.
    pub fn as_slice(&self) -> &[Capability] {
        &self.capabilities
    }
}

impl FromIterator<Capability> for PermissionSet {
    /// Builds a set, dropping repeated capabilities (first occurrence wins).
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        let mut capabilities = Vec::new();
        for capability in iter {
            if !capabilities.contains(&capability) {
                capabilities.push(capability);
            }
        }
        Self { capabilities }
    }
}

impl From<Vec<Capability>> for PermissionSet {
    fn from(capabilities: Vec<Capability>) -> Self {
        capabilities.into_iter().collect()
    }
}

impl From<PermissionSet> for Vec<Capability> {
    fn from(set: PermissionSet) -> Self {
        set.capabilities
    }
}

impl<'a> IntoIterator for &'a PermissionSet {
    type Item = Capability;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Capability>>;

    fn into_iter(self) -> Self::IntoIter {
        self.capabilities.iter().copied()
    }
}

/// Correlates one permission request with its single result callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Allocates a fresh, random request identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_set_has_seven_capabilities_in_request_order() {
        let set = PermissionSet::required();

        assert_eq!(set.len(), 7);
        assert_eq!(set.as_slice().first(), Some(&Capability::Storage));
        assert_eq!(set.as_slice().last(), Some(&Capability::FineLocation));
    }

    #[test]
    fn test_missing_keeps_order_and_drops_granted_entries() {
        // Arrange
        let set = PermissionSet::required();

        // Act
        let missing = set.missing(|c| {
            !matches!(c, Capability::RadioAdmin | Capability::FineLocation)
        });

        // Assert
        assert_eq!(
            missing.as_slice(),
            &[Capability::RadioAdmin, Capability::FineLocation]
        );
    }

    #[test]
    fn test_missing_is_empty_when_everything_is_granted() {
        let missing = PermissionSet::required().missing(|_| true);
        assert!(missing.is_empty());
    }

    #[test]
    fn test_from_iter_drops_duplicates() {
        let set: PermissionSet = [
            Capability::RadioScan,
            Capability::Storage,
            Capability::RadioScan,
        ]
        .into_iter()
        .collect();

        assert_eq!(set.as_slice(), &[Capability::RadioScan, Capability::Storage]);
    }

    #[test]
    fn test_capability_parses_short_name_and_os_identifier() {
        assert_eq!("radio-connect".parse::<Capability>(), Ok(Capability::RadioConnect));
        assert_eq!(
            "android.permission.ACCESS_COARSE_LOCATION".parse::<Capability>(),
            Ok(Capability::CoarseLocation)
        );
    }

    #[test]
    fn test_capability_rejects_unknown_name() {
        let err = "camera".parse::<Capability>().unwrap_err();
        assert_eq!(err, ParseCapabilityError("camera".to_string()));
    }

    #[test]
    fn test_capability_display_matches_serde_name() {
        #[derive(Serialize)]
        struct Wrapper {
            capability: Capability,
        }

        for capability in Capability::ALL {
            let text = toml::to_string(&Wrapper { capability }).expect("serialize");
            assert_eq!(text.trim(), format!("capability = \"{capability}\""));
        }
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::new(), RequestId::new());
    }
}
