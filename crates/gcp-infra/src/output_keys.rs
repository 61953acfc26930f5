//! Terraform output variables shared by the chart templates and the state reader
//!
//! The chart receives the table of [OutputKey::ALL] and exports each variable under its [OutputKey::name].
//! [requested_output_keys] decides which of them exist for a given configuration.
use crate::config::InfrastructureConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKey {
    VpcName,
    CloudNat,
    CloudRouter,
    ServiceAccountEmail,
    SubnetNodes,
    SubnetInternal,
}

impl OutputKey {
    pub const ALL: [OutputKey; 6] = [
        OutputKey::VpcName,
        OutputKey::CloudNat,
        OutputKey::CloudRouter,
        OutputKey::ServiceAccountEmail,
        OutputKey::SubnetNodes,
        OutputKey::SubnetInternal,
    ];

    /// Name of the terraform output variable
    pub fn name(self) -> &'static str {
        match self {
            OutputKey::VpcName => "vpc_name",
            OutputKey::CloudNat => "cloud_nat",
            OutputKey::CloudRouter => "cloud_router",
            OutputKey::ServiceAccountEmail => "service_account_email",
            OutputKey::SubnetNodes => "subnet_nodes",
            OutputKey::SubnetInternal => "subnet_internal",
        }
    }

    /// Key under `outputKeys` in the chart values
    pub fn chart_key(self) -> &'static str {
        match self {
            OutputKey::VpcName => "vpcName",
            OutputKey::CloudNat => "cloudNAT",
            OutputKey::CloudRouter => "cloudRouter",
            OutputKey::ServiceAccountEmail => "serviceAccountEmail",
            OutputKey::SubnetNodes => "subnetNodes",
            OutputKey::SubnetInternal => "subnetInternal",
        }
    }
}

impl std::fmt::Display for OutputKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Output variables the applied configuration is expected to export
///
/// Cloud router and Cloud NAT only exist when the chart created them or was pointed to an existing router.
pub fn requested_output_keys(config: &InfrastructureConfig) -> Vec<OutputKey> {
    let mut keys = vec![
        OutputKey::VpcName,
        OutputKey::SubnetNodes,
        OutputKey::ServiceAccountEmail,
    ];

    if !config.networks.vpc_without_cloud_router() {
        keys.extend([OutputKey::CloudRouter, OutputKey::CloudNat]);
    }

    if config.networks.internal.is_some() {
        keys.push(OutputKey::SubnetInternal);
    }

    keys
}
