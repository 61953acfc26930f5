//! [StateReader] backed by a terraform state document
//!
//! Supports the `outputs` map of state format version 4 and the root module outputs of older states.
use crate::state::{StateReadError, StateReader};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerraformStateDocument {
    outputs: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct RawState {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    outputs: BTreeMap<String, RawOutput>,
    #[serde(default)]
    modules: Vec<RawModule>,
}

#[derive(Deserialize)]
struct RawModule {
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    outputs: BTreeMap<String, RawOutput>,
}

#[derive(Deserialize)]
struct RawOutput {
    value: serde_json::Value,
}

impl TerraformStateDocument {
    pub fn from_json(data: &str) -> Result<Self, StateReadError> {
        if data.trim().is_empty() {
            return Err(StateReadError::NoState);
        }

        let state: RawState = serde_json::from_str(data)?;
        let outputs = if state.version >= 4 {
            state.outputs
        } else {
            // only the root module exports the configuration's outputs
            state
                .modules
                .into_iter()
                .find(|module| module.path == ["root"])
                .map(|module| module.outputs)
                .unwrap_or_default()
        };

        tracing::trace!(version = state.version, outputs = outputs.len(), "parsed terraform state");

        Ok(Self {
            outputs: outputs
                .into_iter()
                .map(|(name, output)| (name, output_to_string(output.value)))
                .collect(),
        })
    }
}

fn output_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

impl StateReader for TerraformStateDocument {
    fn output_variables(&self, names: &[&str]) -> Result<HashMap<String, String>, StateReadError> {
        let mut variables = HashMap::with_capacity(names.len());
        let mut missing = vec![];

        for name in names {
            match self.outputs.get(*name) {
                Some(value) => {
                    variables.insert(name.to_string(), value.clone());
                }
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            return Err(StateReadError::MissingOutputs(missing));
        }

        Ok(variables)
    }
}
