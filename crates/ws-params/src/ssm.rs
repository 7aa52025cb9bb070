//! Batched SSM parameter retrieval via the aws CLI.

use std::collections::BTreeMap;
use std::process::Command;

use serde::Deserialize;

use crate::{Error, Result};

/// GetParameters accepts at most 10 names per call.
const MAX_PARAMS_PER_REQUEST: usize = 10;

#[derive(Debug, Deserialize)]
struct SsmParameter {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
struct SsmResponse {
    #[serde(rename = "Parameters", default)]
    parameters: Vec<SsmParameter>,
}

/// A client bound to one profile, region, and environment.
///
/// Parameters live under `/app/<env>/<suffix>`; results are keyed by
/// suffix with the prefix stripped.
#[derive(Debug, Clone)]
pub struct ParamClient {
    profile: Option<String>,
    region: String,
    env: String,
}

impl ParamClient {
    pub fn new(profile: Option<&str>, env: &str, region: &str) -> Self {
        let region = if region.is_empty() {
            "us-east-1".to_string()
        } else {
            region.to_string()
        };
        Self {
            profile: profile.map(str::to_string),
            region,
            env: env.to_string(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn prefix(&self) -> String {
        format!("/app/{}/", self.env)
    }

    fn parameter_name(&self, suffix: &str) -> String {
        format!("{}{}", self.prefix(), suffix)
    }

    /// Fetches many decrypted parameters, batching requests to the
    /// provider's per-call limit. Returns suffix → value; suffixes the
    /// provider did not return are simply absent.
    pub fn fetch_many(&self, suffixes: &[String]) -> Result<BTreeMap<String, String>> {
        let mut result = BTreeMap::new();

        for batch in suffixes.chunks(MAX_PARAMS_PER_REQUEST) {
            let names: Vec<String> = batch.iter().map(|s| self.parameter_name(s)).collect();
            tracing::debug!(count = names.len(), env = %self.env, "fetching SSM batch");

            let mut cmd = Command::new("aws");
            cmd.args(["ssm", "get-parameters", "--names"])
                .args(&names)
                .args(["--with-decryption", "--region", &self.region]);
            if let Some(profile) = &self.profile {
                cmd.args(["--profile", profile]);
            }

            let output = cmd.output()?;
            if !output.status.success() {
                return Err(Error::Provider {
                    message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }

            let body = String::from_utf8_lossy(&output.stdout);
            result.extend(parse_response(&body, &self.prefix())?);
        }

        Ok(result)
    }
}

/// Parses a GetParameters response, keying values by suffix.
fn parse_response(body: &str, prefix: &str) -> Result<BTreeMap<String, String>> {
    let response: SsmResponse = serde_json::from_str(body)?;
    Ok(response
        .parameters
        .into_iter()
        .map(|p| {
            let key = p.name.strip_prefix(prefix).unwrap_or(&p.name).to_string();
            (key, p.value.trim().to_string())
        })
        .collect())
}
