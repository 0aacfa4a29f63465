//! Install Task
//!
//! Drives the host lifecycle for a deployment: install, then activate.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::Result;
use crate::shell::{ActivationReport, Deployment, OfflineShell};

/// Spawns install → activate for `deployment`.
///
/// Activation only starts once install finished successfully. On failure the
/// previously active generation, if any, keeps serving and the error is
/// returned through the handle.
pub fn spawn_install_task(
    shell: Arc<OfflineShell>,
    deployment: Deployment,
) -> JoinHandle<Result<ActivationReport>> {
    tokio::spawn(async move {
        let installed = match shell.install(&deployment).await {
            Ok(installed) => installed,
            Err(err) => {
                error!(
                    "Generation {} not installed, offline shell unavailable: {}",
                    deployment.generation, err
                );
                return Err(err);
            }
        };

        let report = shell.activate(installed).await?;
        info!(
            "Offline shell ready: generation {} serving",
            report.generation
        );
        Ok(report)
    })
}
