//! terraform state of an infrastructure
use crate::config::InfrastructureConfig;
use crate::output_keys::{requested_output_keys, OutputKey};
use std::collections::HashMap;

/// Reads output variables from the state of an applied terraform configuration
pub trait StateReader {
    /// Returns the values of all requested variables or fails
    fn output_variables(&self, names: &[&str]) -> Result<HashMap<String, String>, StateReadError>;
}

// blanket impl for Fn
impl<F> StateReader for F
where
    F: Fn(&[&str]) -> Result<HashMap<String, String>, StateReadError>,
{
    fn output_variables(&self, names: &[&str]) -> Result<HashMap<String, String>, StateReadError> {
        self(names)
    }
}

/// The terraform state of an infrastructure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerraformState {
    pub vpc_name: String,
    /// Name of the created or existing cloud router, empty if there is none
    pub cloud_router_name: String,
    /// Name of the created Cloud NAT, empty if there is none
    pub cloud_nat_name: String,
    pub service_account_email: String,
    /// CIDR of the nodes subnet
    pub subnet_nodes: String,
    /// CIDR of the internal subnet, only present if one was configured
    pub subnet_internal: Option<String>,
}

/// Reads the output variables the given configuration produced
#[tracing::instrument(level = "debug", skip_all)]
pub fn extract_terraform_state(
    reader: &impl StateReader,
    config: &InfrastructureConfig,
) -> Result<TerraformState, StateReadError> {
    let keys = requested_output_keys(config);
    let names: Vec<&str> = keys.iter().map(|key| key.name()).collect();
    tracing::debug!(?names, "reading terraform output variables");

    let mut variables = reader.output_variables(&names)?;

    let missing: Vec<String> = names
        .iter()
        .filter(|name| !variables.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(StateReadError::MissingOutputs(missing));
    }

    let mut state = TerraformState::default();
    for key in keys {
        let value = variables.remove(key.name()).unwrap_or_default();
        match key {
            OutputKey::VpcName => state.vpc_name = value,
            OutputKey::CloudRouter => state.cloud_router_name = value,
            OutputKey::CloudNat => state.cloud_nat_name = value,
            OutputKey::ServiceAccountEmail => state.service_account_email = value,
            OutputKey::SubnetNodes => state.subnet_nodes = value,
            OutputKey::SubnetInternal => state.subnet_internal = Some(value),
        }
    }

    tracing::trace!(?state, "extracted terraform state");
    Ok(state)
}

#[derive(thiserror::Error, Debug)]
pub enum StateReadError {
    #[error("Unable to read terraform state")]
    Reader(#[source] anyhow::Error),
    #[error("Terraform state has no output variable(s) {}", .0.join(", "))]
    MissingOutputs(Vec<String>),
    #[error("Unable to parse terraform state")]
    Parse(#[from] serde_json::Error),
    #[error("Terraform state is empty")]
    NoState,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{CloudRouter, NetworkConfig, Vpc};
    use pretty_assertions::assert_eq;

    struct Outputs(HashMap<String, String>);

    impl Outputs {
        fn all() -> Self {
            Self(
                OutputKey::ALL
                    .iter()
                    .map(|key| (key.name().to_string(), format!("{key}-value")))
                    .collect(),
            )
        }
    }

    impl StateReader for Outputs {
        fn output_variables(
            &self,
            names: &[&str],
        ) -> Result<HashMap<String, String>, StateReadError> {
            Ok(names
                .iter()
                .filter_map(|name| self.0.get(*name).map(|v| (name.to_string(), v.clone())))
                .collect())
        }
    }

    fn existing_vpc(cloud_router: Option<CloudRouter>) -> NetworkConfig {
        NetworkConfig {
            vpc: Some(Vpc {
                name: "shared".into(),
                cloud_router,
            }),
            ..Default::default()
        }
    }

    #[test]
    fn new_vpc() {
        let state =
            extract_terraform_state(&Outputs::all(), &InfrastructureConfig::default()).unwrap();

        assert_eq!(
            state,
            TerraformState {
                vpc_name: "vpc_name-value".into(),
                cloud_router_name: "cloud_router-value".into(),
                cloud_nat_name: "cloud_nat-value".into(),
                service_account_email: "service_account_email-value".into(),
                subnet_nodes: "subnet_nodes-value".into(),
                subnet_internal: None,
            }
        );
    }

    #[test]
    fn existing_vpc_without_router_leaves_router_and_nat_empty() {
        let config = InfrastructureConfig {
            networks: existing_vpc(None),
        };
        let state = extract_terraform_state(&Outputs::all(), &config).unwrap();

        assert_eq!(state.cloud_router_name, "");
        assert_eq!(state.cloud_nat_name, "");
        assert_eq!(state.vpc_name, "vpc_name-value");
    }

    #[test]
    fn existing_vpc_with_router() {
        let config = InfrastructureConfig {
            networks: existing_vpc(Some(CloudRouter { name: "r1".into() })),
        };
        let state = extract_terraform_state(&Outputs::all(), &config).unwrap();

        assert_eq!(state.cloud_router_name, "cloud_router-value");
        assert_eq!(state.cloud_nat_name, "cloud_nat-value");
    }

    #[test]
    fn internal_subnet() {
        let config = InfrastructureConfig {
            networks: NetworkConfig {
                internal: Some("10.251.0.0/16".into()),
                ..Default::default()
            },
        };
        let state = extract_terraform_state(&Outputs::all(), &config).unwrap();

        assert_eq!(state.subnet_internal.as_deref(), Some("subnet_internal-value"));
    }

    #[test]
    fn only_requested_names_are_read() {
        let reader = |names: &[&str]| -> Result<HashMap<String, String>, StateReadError> {
            assert_eq!(names, ["vpc_name", "subnet_nodes", "service_account_email"]);
            Ok(names
                .iter()
                .map(|name| (name.to_string(), String::new()))
                .collect())
        };

        let config = InfrastructureConfig {
            networks: existing_vpc(None),
        };
        assert!(extract_terraform_state(&reader, &config).is_ok());
    }

    #[test]
    fn missing_output() {
        let mut outputs = Outputs::all();
        outputs.0.remove("cloud_nat");
        outputs.0.remove("subnet_nodes");

        let err = extract_terraform_state(&outputs, &InfrastructureConfig::default()).unwrap_err();
        match err {
            StateReadError::MissingOutputs(missing) => {
                assert_eq!(missing, vec!["subnet_nodes", "cloud_nat"])
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn reader_error_is_propagated() {
        let reader = |_: &[&str]| -> Result<HashMap<String, String>, StateReadError> {
            Err(StateReadError::Reader(anyhow::anyhow!("state unavailable")))
        };

        let err = extract_terraform_state(&reader, &InfrastructureConfig::default()).unwrap_err();
        assert!(matches!(err, StateReadError::Reader(_)));
    }
}
