//! # gcp-infra - terraform values and status for GCP infrastructure
//!
//! Translates the provider configuration of an Infrastructure resource into values for the `gcp-infra`
//! terraform chart and, once terraform applied the rendered configuration, maps its output variables back into an
//! [status::InfrastructureStatus].
//!
//! Nothing in here runs terraform, persists anything or retries. The chart renderer and the terraform state are
//! reached through the [chart::ChartRenderer] and [state::StateReader] traits.
//!
//! ## Forward: configuration to terraform files
//!
//! see [chart::compute_chart_values] and [chart::render_terraformer_chart]
//!
//! - no `networks.vpc`: the chart creates the VPC (named [chart::DEFAULT_VPC_NAME]), a cloud router and a Cloud NAT
//! - `networks.vpc` given: the VPC is reused, nothing is created. A named cloud router is passed on as well.
//! - `networks.cloudNAT.minPortsPerVM` defaults to [chart::DEFAULT_MIN_PORTS_PER_VM]
//! - `networks.workers` falls back to the deprecated `networks.worker`
//! - `networks.flowLogs` is only passed on when present, and only with the fields that are set
//!
//! ## Reverse: terraform state to status
//!
//! see [status::compute_status]
//!
//! | **output variable**     | **requested when**                              |
//! |-------------------------|-------------------------------------------------|
//! | `vpc_name`              | always                                          |
//! | `subnet_nodes`          | always                                          |
//! | `service_account_email` | always                                          |
//! | `cloud_router`          | unless an existing VPC without cloud router     |
//! | `cloud_nat`             | unless an existing VPC without cloud router     |
//! | `subnet_internal`       | `networks.internal` is set                      |
//!
//! The chart is told about every variable name through the `outputKeys` value, both directions use
//! [output_keys::OutputKey] so they cannot drift apart.
//!
//! ```
//! use gcp_infra::config::InfrastructureConfig;
//! use gcp_infra::output_keys::{requested_output_keys, OutputKey};
//!
//! let keys = requested_output_keys(&InfrastructureConfig::default());
//! assert!(keys.contains(&OutputKey::CloudRouter));
//! assert!(!keys.contains(&OutputKey::SubnetInternal));
//! ```
pub mod chart;
pub mod config;
pub mod output_keys;
pub mod resources;
pub mod state;
pub mod status;
pub mod tfstate;
pub mod value;
