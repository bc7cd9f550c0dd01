// zipkeep-core/src/lib.rs
pub mod archive;
pub mod owner;
pub mod retention;
pub mod run;

pub use archive::{create_archive, ArtifactRef};
pub use owner::{IdentityResolver, OwnershipSpec, SystemIdentityResolver};
pub use retention::{apply_retention, plan_retention, RetentionOutcome};
pub use run::{run_backup, RunSummary};
