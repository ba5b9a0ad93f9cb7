//! Guest Network Controller
//!
//! One-shot reconciler for a virtual machine's network adapters:
//! - reads the current adapter state from the vSphere backend
//! - computes the minimal add/edit/remove set against a desired-state list
//! - submits the effective operations and reports the resulting facts
//!
//! The desired-state document is YAML, loaded from the path in
//! `RECONCILE_REQUEST`; backend access is configured through `VSPHERE_*`
//! environment variables. The run's result is printed as JSON on stdout.

mod error;
mod reconciler;
#[cfg(test)]
mod test_utils;

use std::env;
use std::sync::Arc;

use adapter_spec::ReconcileRequest;
use tracing::{error, info};
use vsphere_client::{VsphereClient, VsphereClientTrait};

use crate::error::ControllerError;
use crate::reconciler::Reconciler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting guest network reconciliation run");

    // Load configuration from environment variables
    let vsphere_url =
        env::var("VSPHERE_URL").unwrap_or_else(|_| "https://vcenter.local".to_string());
    let username = env::var("VSPHERE_USERNAME").map_err(|_| {
        ControllerError::InvalidConfig("VSPHERE_USERNAME environment variable is required".to_string())
    })?;
    let password = env::var("VSPHERE_PASSWORD").map_err(|_| {
        ControllerError::InvalidConfig("VSPHERE_PASSWORD environment variable is required".to_string())
    })?;
    let insecure = env::var("VSPHERE_INSECURE")
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    let request_path = env::var("RECONCILE_REQUEST").map_err(|_| {
        ControllerError::InvalidConfig(
            "RECONCILE_REQUEST environment variable is required (path to the request document)"
                .to_string(),
        )
    })?;

    info!("Configuration:");
    info!("  vCenter URL: {}", vsphere_url);
    info!("  Request document: {}", request_path);

    let document = std::fs::read_to_string(&request_path).map_err(|source| {
        ControllerError::InvalidConfig(format!(
            "cannot read request document {}: {}",
            request_path, source
        ))
    })?;
    let request: ReconcileRequest = serde_yaml::from_str(&document).map_err(|source| {
        ControllerError::InvalidConfig(format!("invalid request document: {}", source))
    })?;

    let client = Arc::new(VsphereClient::new(vsphere_url, username, password, insecure)?);
    client.create_session().await.map_err(ControllerError::Vsphere)?;

    let reconciler = Reconciler::new(client, request.datacenter.clone());
    match reconciler.run(&request).await {
        Ok(outcome) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if outcome.failed {
                error!(
                    "Reconfiguration task failed: {}",
                    outcome.msg.as_deref().unwrap_or("no message")
                );
                std::process::exit(1);
            }
            Ok(())
        }
        Err(run_error) => {
            error!("Reconciliation failed: {}", run_error);
            let outcome = serde_json::json!({
                "changed": false,
                "failed": true,
                "msg": run_error.to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            std::process::exit(1);
        }
    }
}
