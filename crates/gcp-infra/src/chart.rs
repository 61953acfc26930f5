//! values for and rendering of the `gcp-infra` terraform chart
use crate::config::InfrastructureConfig;
use crate::object;
use crate::output_keys::OutputKey;
use crate::resources::{Cluster, Infrastructure, ServiceAccount};
use crate::value::{Map, Value};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// VPC name used when the chart creates the network itself
pub const DEFAULT_VPC_NAME: &str = "${google_compute_network.network.name}";

/// Cloud NAT ports per VM unless configured otherwise
pub const DEFAULT_MIN_PORTS_PER_VM: i32 = 2048;

pub const INTERNAL_CHARTS_PATH: &str = "charts/internal";
pub const CHART_NAME: &str = "gcp-infra";

pub const MAIN_FILE: &str = "main.tf";
pub const VARIABLES_FILE: &str = "variables.tf";
pub const TFVARS_FILE: &str = "terraform.tfvars";

/// Computes the values for the `gcp-infra` chart
pub fn compute_chart_values(
    infra: &Infrastructure,
    account: &ServiceAccount,
    config: &InfrastructureConfig,
    cluster: &Cluster,
) -> Value {
    let networks = &config.networks;

    let (vpc_name, create_vpc, create_cloud_router) = match &networks.vpc {
        Some(vpc) => (vpc.name.as_str(), false, false),
        None => (DEFAULT_VPC_NAME, true, true),
    };

    let mut vpc = Map::new();
    vpc.insert("name".into(), vpc_name.into());
    if let Some(cloud_router) = networks.existing_cloud_router() {
        vpc.insert("cloudRouter".into(), object! { "name" => cloud_router });
    }

    let min_ports_per_vm = networks
        .cloud_nat
        .as_ref()
        .and_then(|nat| nat.min_ports_per_vm)
        .unwrap_or(DEFAULT_MIN_PORTS_PER_VM);

    let mut network_values = Map::new();
    network_values.insert("pods".into(), cluster.pod_network().into());
    network_values.insert("services".into(), cluster.service_network().into());
    network_values.insert("workers".into(), networks.workers_cidr().into());
    network_values.insert("internal".into(), networks.internal.as_deref().into());
    network_values.insert(
        "cloudNAT".into(),
        object! { "minPortsPerVM" => min_ports_per_vm },
    );

    if let Some(flow_logs) = &networks.flow_logs {
        let mut values = Map::new();

        if let Some(aggregation_interval) = &flow_logs.aggregation_interval {
            values.insert("aggregationInterval".into(), aggregation_interval.into());
        }

        if let Some(flow_sampling) = flow_logs.flow_sampling {
            values.insert("flowSampling".into(), flow_sampling.into());
        }

        if let Some(metadata) = &flow_logs.metadata {
            values.insert("metadata".into(), metadata.into());
        }

        network_values.insert("flowLogs".into(), Value::Object(values));
    }

    let output_keys: Map = OutputKey::ALL
        .iter()
        .map(|key| (key.chart_key().to_string(), key.name().into()))
        .collect();

    object! {
        "google" => object! {
            "region" => &infra.region,
            "project" => &account.project_id,
        },
        "create" => object! {
            "vpc" => create_vpc,
            "cloudRouter" => create_cloud_router,
        },
        "vpc" => Value::Object(vpc),
        "clusterName" => &infra.namespace,
        "networks" => Value::Object(network_values),
        "outputKeys" => Value::Object(output_keys),
    }
}

/// Renders a chart with the given values
pub trait ChartRenderer {
    fn render(
        &self,
        chart_path: &Path,
        release_name: &str,
        namespace: &str,
        values: &Value,
    ) -> Result<RenderedChart, RenderError>;
}

// blanket impl for Fn
impl<F> ChartRenderer for F
where
    F: Fn(&Path, &str, &str, &Value) -> Result<RenderedChart, RenderError>,
{
    fn render(
        &self,
        chart_path: &Path,
        release_name: &str,
        namespace: &str,
        values: &Value,
    ) -> Result<RenderedChart, RenderError> {
        self(chart_path, release_name, namespace, values)
    }
}

/// Files of a rendered chart by file name
#[derive(derive_new::new, Debug, Clone, Default, PartialEq)]
pub struct RenderedChart {
    files: IndexMap<String, String>,
}

impl RenderedChart {
    /// Content of a rendered file, empty if the chart did not render it
    pub fn file_content(&self, name: &str) -> String {
        self.files.get(name).cloned().unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderedChart {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(name, content)| (name.into(), content.into()))
                .collect(),
        )
    }
}

/// The terraform configuration rendered from the chart
#[derive(derive_new::new, Debug, Clone, PartialEq)]
pub struct TerraformFiles {
    pub main: String,
    pub variables: String,
    pub tf_vars: Vec<u8>,
}

/// Renders the `gcp-infra` chart for an infrastructure
#[tracing::instrument(level = "debug", skip_all, fields(namespace = %infra.namespace))]
pub fn render_terraformer_chart(
    renderer: &impl ChartRenderer,
    infra: &Infrastructure,
    account: &ServiceAccount,
    config: &InfrastructureConfig,
    cluster: &Cluster,
) -> Result<TerraformFiles, RenderError> {
    let values = compute_chart_values(infra, account, config, cluster);
    tracing::trace!(?values, "chart values");

    let chart_path = Path::new(INTERNAL_CHARTS_PATH).join(CHART_NAME);
    let release = renderer.render(&chart_path, CHART_NAME, &infra.namespace, &values)?;

    let main = release.file_content(MAIN_FILE);
    let variables = release.file_content(VARIABLES_FILE);
    let tf_vars = release.file_content(TFVARS_FILE);

    for (file, content) in [
        (MAIN_FILE, &main),
        (VARIABLES_FILE, &variables),
        (TFVARS_FILE, &tf_vars),
    ] {
        check_hcl(file, content)?;
    }

    tracing::debug!("rendered terraform files");
    Ok(TerraformFiles::new(main, variables, tf_vars.into_bytes()))
}

fn check_hcl(file: &str, content: &str) -> Result<(), RenderError> {
    hcl::parse(content).map_err(|source| RenderError::InvalidHcl {
        file: file.to_string(),
        source,
    })?;

    Ok(())
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Unable to render chart {}", .chart.display())]
    Render {
        chart: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("Rendered file {file} is not valid HCL")]
    InvalidHcl {
        file: String,
        #[source]
        source: hcl::Error,
    },
}
