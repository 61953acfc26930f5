//! provider configuration of an infrastructure
//!
//! The configuration arrives as the raw `providerConfig` document of an Infrastructure resource.
//! It is assumed to be validated already, [decode] only maps it onto these types.
use serde::Deserialize;

/// Infrastructure configuration for GCP
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureConfig {
    #[serde(default)]
    pub networks: NetworkConfig,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// An existing VPC to use instead of creating one
    #[serde(default)]
    pub vpc: Option<Vpc>,
    #[serde(default, rename = "cloudNAT")]
    pub cloud_nat: Option<CloudNat>,
    /// Deprecated: same meaning as `workers`, only read when `workers` is empty
    #[serde(default)]
    pub worker: String,
    /// CIDR of the nodes subnet
    #[serde(default)]
    pub workers: String,
    /// CIDR of an additional internal subnet
    #[serde(default)]
    pub internal: Option<String>,
    #[serde(default)]
    pub flow_logs: Option<FlowLogs>,
}

impl NetworkConfig {
    /// The nodes subnet CIDR
    ///
    /// `workers` wins, the legacy `worker` field is only a fallback when it is empty.
    pub fn workers_cidr(&self) -> &str {
        if self.workers.is_empty() {
            return &self.worker;
        }

        &self.workers
    }

    /// An existing VPC was given but no cloud router for it
    ///
    /// In that case neither a cloud router nor a Cloud NAT are created or referenced.
    pub fn vpc_without_cloud_router(&self) -> bool {
        matches!(&self.vpc, Some(vpc) if vpc.cloud_router.is_none())
    }

    /// Name of an existing cloud router, if one is configured and named
    pub fn existing_cloud_router(&self) -> Option<&str> {
        self.vpc
            .as_ref()
            .and_then(|vpc| vpc.cloud_router.as_ref())
            .map(|router| router.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub name: String,
    #[serde(default)]
    pub cloud_router: Option<CloudRouter>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CloudRouter {
    #[serde(default)]
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CloudNat {
    #[serde(default, rename = "minPortsPerVM")]
    pub min_ports_per_vm: Option<i32>,
}

/// VPC flow log settings, each field is optional on its own
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlowLogs {
    #[serde(default)]
    pub aggregation_interval: Option<String>,
    #[serde(default)]
    pub flow_sampling: Option<f32>,
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Decodes a provider config document (YAML or JSON)
pub fn decode(raw: &[u8]) -> Result<InfrastructureConfig, ConfigError> {
    let config = serde_yaml::from_slice(raw)?;
    tracing::trace!(?config, "decoded infrastructure config");
    Ok(config)
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Unable to decode infrastructure config")]
    Decode(#[from] serde_yaml::Error),
}
