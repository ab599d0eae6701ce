//! NetApp Files request and response models
//!
//! These mirror the ARM JSON shape: top-level `location`/`id`/`name`/`type`
//! with the resource-specific fields nested under `properties`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Smallest capacity pool the service accepts (4 TiB)
pub const MIN_POOL_SIZE: u64 = 4_398_046_511_104;

/// Smallest volume quota the service accepts (100 GiB)
pub const MIN_VOLUME_SIZE: u64 = 107_374_182_400;

/// Performance tier of a capacity pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ServiceLevel {
    Standard,
    Premium,
    Ultra,
}

impl ServiceLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceLevel::Standard => "Standard",
            ServiceLevel::Premium => "Premium",
            ServiceLevel::Ultra => "Ultra",
        }
    }
}

impl fmt::Display for ServiceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(ServiceLevel::Standard),
            "premium" => Ok(ServiceLevel::Premium),
            "ultra" => Ok(ServiceLevel::Ultra),
            other => Err(CoreError::Validation(format!(
                "unknown service level '{other}' (expected Standard, Premium or Ultra)"
            ))),
        }
    }
}

impl TryFrom<String> for ServiceLevel {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ServiceLevel> for String {
    fn from(level: ServiceLevel) -> Self {
        level.as_str().to_string()
    }
}

/// NetApp account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetAppAccount {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub properties: AccountProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

impl NetAppAccount {
    pub fn new(location: &str) -> Self {
        Self {
            location: location.to_lowercase(),
            id: None,
            name: None,
            resource_type: None,
            properties: AccountProperties::default(),
        }
    }
}

/// Capacity pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPool {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub properties: PoolProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolProperties {
    pub service_level: ServiceLevel,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

impl CapacityPool {
    /// Pool request body; the service expects a lower-case location
    pub fn new(location: &str, service_level: ServiceLevel, size: u64) -> Self {
        Self {
            location: location.to_lowercase(),
            id: None,
            name: None,
            resource_type: None,
            properties: PoolProperties {
                service_level,
                size,
                pool_id: None,
                provisioning_state: None,
            },
        }
    }
}

/// Volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volume {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    pub properties: VolumeProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProperties {
    pub creation_token: String,
    pub service_level: ServiceLevel,
    pub usage_threshold: u64,
    pub subnet_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_policy: Option<ExportPolicy>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub protocol_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisioning_state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportPolicy {
    #[serde(default)]
    pub rules: Vec<ExportPolicyRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPolicyRule {
    pub rule_index: u32,
    pub allowed_clients: String,
    pub unix_read_only: bool,
    pub unix_read_write: bool,
    pub cifs: bool,
    pub nfsv3: bool,
    pub nfsv41: bool,
}

impl Volume {
    /// NFSv4.1 volume with a single read-write export rule
    pub fn nfs41(
        location: &str,
        service_level: ServiceLevel,
        creation_token: &str,
        subnet_id: &str,
        usage_threshold: u64,
    ) -> Self {
        let rule = ExportPolicyRule {
            rule_index: 1,
            allowed_clients: "0.0.0.0".to_string(),
            unix_read_only: false,
            unix_read_write: true,
            cifs: false,
            nfsv3: false,
            nfsv41: true,
        };

        Self {
            location: location.to_lowercase(),
            id: None,
            name: None,
            resource_type: None,
            properties: VolumeProperties {
                creation_token: creation_token.to_string(),
                service_level,
                usage_threshold,
                subnet_id: subnet_id.to_string(),
                export_policy: Some(ExportPolicy { rules: vec![rule] }),
                protocol_types: vec!["NFSv4.1".to_string()],
                provisioning_state: None,
            },
        }
    }
}

/// Body of a pool change request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolChangeRequest {
    pub new_pool_resource_id: String,
}

impl PoolChangeRequest {
    pub fn new(new_pool_resource_id: impl Into<String>) -> Self {
        Self {
            new_pool_resource_id: new_pool_resource_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_service_level_parse_is_case_insensitive() {
        assert_eq!("premium".parse::<ServiceLevel>().unwrap(), ServiceLevel::Premium);
        assert_eq!("ULTRA".parse::<ServiceLevel>().unwrap(), ServiceLevel::Ultra);
        assert!("gold".parse::<ServiceLevel>().is_err());
    }

    #[test]
    fn test_pool_body_shape() {
        let pool = CapacityPool::new("WestUS", ServiceLevel::Premium, MIN_POOL_SIZE);
        let body = serde_json::to_value(&pool).unwrap();
        assert_eq!(
            body,
            json!({
                "location": "westus",
                "properties": {
                    "serviceLevel": "Premium",
                    "size": 4_398_046_511_104u64
                }
            })
        );
    }

    #[test]
    fn test_volume_body_has_single_nfs41_rule() {
        let volume = Volume::nfs41(
            "westus",
            ServiceLevel::Standard,
            "anftestvolume",
            "/subnets/default",
            MIN_VOLUME_SIZE,
        );
        let body = serde_json::to_value(&volume).unwrap();
        let props = &body["properties"];
        assert_eq!(props["creationToken"], "anftestvolume");
        assert_eq!(props["usageThreshold"], 107_374_182_400u64);
        assert_eq!(props["protocolTypes"], json!(["NFSv4.1"]));

        let rules = props["exportPolicy"]["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0]["allowedClients"], "0.0.0.0");
        assert_eq!(rules[0]["nfsv41"], true);
        assert_eq!(rules[0]["nfsv3"], false);
        assert_eq!(rules[0]["unixReadWrite"], true);
    }

    #[test]
    fn test_pool_change_request_shape() {
        let req = PoolChangeRequest::new("/subscriptions/s/pools/p2");
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "newPoolResourceId": "/subscriptions/s/pools/p2" })
        );
    }

    #[test]
    fn test_deserialize_service_response() {
        let body = json!({
            "id": "/subscriptions/s/resourceGroups/rg/providers/Microsoft.NetApp/netAppAccounts/a/capacityPools/p",
            "name": "a/p",
            "type": "Microsoft.NetApp/netAppAccounts/capacityPools",
            "location": "westus",
            "properties": {
                "poolId": "9f1c",
                "serviceLevel": "Standard",
                "size": 4_398_046_511_104u64,
                "provisioningState": "Succeeded"
            }
        });
        let pool: CapacityPool = serde_json::from_value(body).unwrap();
        assert_eq!(pool.properties.service_level, ServiceLevel::Standard);
        assert_eq!(pool.properties.provisioning_state.as_deref(), Some("Succeeded"));
        assert_eq!(
            pool.resource_type.as_deref(),
            Some("Microsoft.NetApp/netAppAccounts/capacityPools")
        );
    }
}
