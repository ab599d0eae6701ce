//! Resource identifiers for NetApp Files objects
//!
//! A [`ResourceHandle`] wraps an ARM resource id such as
//! `/subscriptions/{sub}/resourceGroups/{rg}/providers/Microsoft.NetApp/netAppAccounts/{account}/capacityPools/{pool}/volumes/{volume}`
//! and knows which kind of object it names. Handles are immutable; building
//! one for a different pool produces a new handle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

const PROVIDER: &str = "Microsoft.NetApp";

/// The kinds of resource this tool manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Account,
    Pool,
    Volume,
}

impl ResourceKind {
    /// Number of path segments in an id of this kind
    fn segment_count(self) -> usize {
        match self {
            ResourceKind::Account => 8,
            ResourceKind::Pool => 10,
            ResourceKind::Volume => 12,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResourceKind::Account => "account",
            ResourceKind::Pool => "capacity pool",
            ResourceKind::Volume => "volume",
        };
        f.write_str(label)
    }
}

/// An ARM resource id naming an account, capacity pool or volume
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    id: String,
    kind: ResourceKind,
    segments: Vec<String>,
}

impl ResourceHandle {
    /// Handle for a NetApp account
    pub fn account(subscription_id: &str, resource_group: &str, account: &str) -> Self {
        Self::from_names(&[subscription_id, resource_group, account])
    }

    /// Handle for a capacity pool
    pub fn pool(subscription_id: &str, resource_group: &str, account: &str, pool: &str) -> Self {
        Self::from_names(&[subscription_id, resource_group, account, pool])
    }

    /// Handle for a volume
    pub fn volume(
        subscription_id: &str,
        resource_group: &str,
        account: &str,
        pool: &str,
        volume: &str,
    ) -> Self {
        Self::from_names(&[subscription_id, resource_group, account, pool, volume])
    }

    fn from_names(names: &[&str]) -> Self {
        let keys = [
            "subscriptions",
            "resourceGroups",
            "netAppAccounts",
            "capacityPools",
            "volumes",
        ];
        let mut segments = Vec::with_capacity(names.len() * 2 + 2);
        for (i, (key, name)) in keys.iter().zip(names).enumerate() {
            if i == 2 {
                segments.push("providers".to_string());
                segments.push(PROVIDER.to_string());
            }
            segments.push((*key).to_string());
            segments.push((*name).to_string());
        }
        let kind = match names.len() {
            3 => ResourceKind::Account,
            4 => ResourceKind::Pool,
            _ => ResourceKind::Volume,
        };
        Self {
            id: format!("/{}", segments.join("/")),
            kind,
            segments,
        }
    }

    /// Parse an ARM resource id
    ///
    /// Keys match case-insensitively and empty segments are ignored. The
    /// handle stores the canonical form, so a parsed id compares equal to one
    /// built from the same names.
    pub fn parse(id: &str) -> Result<Self> {
        let mut segments: Vec<String> = id
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let kind = [ResourceKind::Account, ResourceKind::Pool, ResourceKind::Volume]
            .into_iter()
            .find(|k| k.segment_count() == segments.len())
            .ok_or_else(|| invalid(id, "unexpected number of path segments"))?;

        let expected_keys = [
            (0, "subscriptions"),
            (2, "resourceGroups"),
            (4, "providers"),
            (5, PROVIDER),
            (6, "netAppAccounts"),
            (8, "capacityPools"),
            (10, "volumes"),
        ];
        for (index, key) in expected_keys {
            if let Some(segment) = segments.get_mut(index) {
                if !segment.eq_ignore_ascii_case(key) {
                    return Err(invalid(id, &format!("expected '{key}' at '{segment}'")));
                }
                *segment = key.to_string();
            }
        }

        Ok(Self {
            id: format!("/{}", segments.join("/")),
            kind,
            segments,
        })
    }

    /// The canonical id string
    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn subscription_id(&self) -> &str {
        &self.segments[1]
    }

    pub fn resource_group(&self) -> &str {
        &self.segments[3]
    }

    pub fn account_name(&self) -> &str {
        &self.segments[7]
    }

    /// Pool name, for pools and volumes
    pub fn pool_name(&self) -> Option<&str> {
        self.segments.get(9).map(String::as_str)
    }

    /// Volume name, for volumes only
    pub fn volume_name(&self) -> Option<&str> {
        self.segments.get(11).map(String::as_str)
    }

    /// The last name segment of the id
    pub fn name(&self) -> &str {
        self.segments
            .last()
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Human-readable label used in logs and errors, e.g. `volume 'vol1'`
    pub fn describe(&self) -> String {
        format!("{} '{}'", self.kind, self.name())
    }

    /// Fail with a validation error unless this handle names `kind`
    pub fn expect_kind(&self, kind: ResourceKind) -> Result<()> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "expected a {kind} id, got a {} id: {}",
                self.kind, self.id
            )))
        }
    }

    /// The same volume placed under another capacity pool
    pub fn in_pool(&self, pool: &str) -> Result<Self> {
        self.expect_kind(ResourceKind::Volume)?;
        Ok(Self::volume(
            self.subscription_id(),
            self.resource_group(),
            self.account_name(),
            pool,
            self.name(),
        ))
    }
}

fn invalid(id: &str, reason: &str) -> CoreError {
    CoreError::Validation(format!("invalid NetApp resource id '{id}': {reason}"))
}

impl FromStr for ResourceHandle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
