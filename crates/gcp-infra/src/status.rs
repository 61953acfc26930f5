//! infrastructure status reported back to the cluster
use crate::config::InfrastructureConfig;
use crate::state::{extract_terraform_state, StateReadError, StateReader, TerraformState};
use serde::{Deserialize, Serialize};

pub const API_VERSION: &str = "gcp.provider.extensions.gardener.cloud/v1alpha1";
pub const KIND: &str = "InfrastructureStatus";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    pub api_version: String,
    pub kind: String,
}

impl Default for TypeMeta {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
        }
    }
}

/// Status of a GCP infrastructure
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InfrastructureStatus {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    pub networks: NetworkStatus,
    pub service_account_email: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct NetworkStatus {
    pub vpc: VpcStatus,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VpcStatus {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_router: Option<CloudRouterStatus>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CloudRouterStatus {
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Subnet {
    pub purpose: SubnetPurpose,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SubnetPurpose {
    Nodes,
    Internal,
}

/// Builds the status from an extracted terraform state
pub fn status_from_terraform_state(state: &TerraformState) -> InfrastructureStatus {
    let cloud_router = (!state.cloud_router_name.is_empty()).then(|| CloudRouterStatus {
        name: state.cloud_router_name.clone(),
    });

    let mut subnets = vec![Subnet {
        purpose: SubnetPurpose::Nodes,
        name: state.subnet_nodes.clone(),
    }];

    if let Some(internal) = &state.subnet_internal {
        subnets.push(Subnet {
            purpose: SubnetPurpose::Internal,
            name: internal.clone(),
        });
    }

    InfrastructureStatus {
        type_meta: TypeMeta::default(),
        networks: NetworkStatus {
            vpc: VpcStatus {
                name: state.vpc_name.clone(),
                cloud_router,
            },
            subnets,
        },
        service_account_email: state.service_account_email.clone(),
    }
}

/// Reads the terraform state for the given configuration and builds the status from it
#[tracing::instrument(level = "debug", skip_all)]
pub fn compute_status(
    reader: &impl StateReader,
    config: &InfrastructureConfig,
) -> Result<InfrastructureStatus, StateReadError> {
    let state = extract_terraform_state(reader, config)?;
    Ok(status_from_terraform_state(&state))
}
