// zipkeep-core/src/run.rs
use std::time::SystemTime;

use tracing::{debug, info, warn};
use zipkeep_common::config::Config;
use zipkeep_common::error::Result;

use crate::archive::{create_archive, ArtifactRef};
use crate::owner::{apply_ownership, IdentityResolver, OwnershipSpec};
use crate::retention::{apply_retention, plan_retention, RetentionOutcome};

/// Result of one full archive-then-retain run, for the caller to render.
/// `artifact: None` means the source was empty and the run was a no-op.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub artifact: Option<ArtifactRef>,
    pub actions: Vec<(String, RetentionOutcome)>,
}

/// One full run: resolve ownership, build the archive, chown it, then plan
/// and apply retention over the destination as it now exists. The fresh
/// artifact is itself eligible for deletion under an aggressive policy.
pub fn run_backup(config: &Config, resolver: &dyn IdentityResolver) -> Result<RunSummary> {
    let ownership = resolve_ownership(config, resolver);

    let artifact = match create_archive(
        config.source(),
        config.destination(),
        &config.timestamp_format,
    )? {
        Some(artifact) => artifact,
        None => {
            info!(
                "Source {} is empty, no archive created",
                config.source().display()
            );
            return Ok(RunSummary {
                artifact: None,
                actions: Vec::new(),
            });
        }
    };
    debug!(
        "Archive {} written ({} bytes)",
        artifact.path.display(),
        artifact.size
    );

    apply_ownership(&artifact.path, &ownership)?;

    let plan = plan_retention(config.destination(), &config.policy, SystemTime::now())?;
    let actions = apply_retention(config.destination(), &plan, config.dry_run)?;

    Ok(RunSummary {
        artifact: Some(artifact),
        actions,
    })
}

fn resolve_ownership(config: &Config, resolver: &dyn IdentityResolver) -> OwnershipSpec {
    let uid = resolver.resolve_user(&config.owner).unwrap_or_else(|| {
        warn!("User '{}' not found, falling back to uid 0", config.owner);
        0
    });
    let gid = resolver.resolve_group(&config.group).unwrap_or_else(|| {
        warn!("Group '{}' not found, falling back to gid 0", config.group);
        0
    });
    OwnershipSpec { uid, gid }
}
