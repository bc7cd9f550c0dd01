// zipkeep-core/src/retention.rs
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use zipkeep_common::config::{RetentionMode, RetentionPolicy};
use zipkeep_common::error::{Result, ZipkeepError};

const SECS_PER_DAY: u64 = 86_400;

/// What happened (or would happen) to one planned entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionOutcome {
    Deleted,
    WouldDelete,
}

/// Computes which destination entries the policy condemns, ordered oldest
/// first by modification time.
pub fn plan_retention(
    destination: &Path,
    policy: &RetentionPolicy,
    now: SystemTime,
) -> Result<Vec<String>> {
    if policy.is_disabled() {
        debug!("No retention rules configured, nothing to plan");
        return Ok(Vec::new());
    }

    let entries = list_by_mtime(destination)?;
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let mut count_marks = vec![false; entries.len()];
    if let Some(keep) = policy.keep_files {
        // The newest `keep` entries sit at the tail of the ordered listing;
        // everything before them goes. keep == 0 condemns the whole listing.
        let condemned = entries.len().saturating_sub(keep);
        for mark in count_marks.iter_mut().take(condemned) {
            *mark = true;
        }
    }

    let mut age_marks = vec![false; entries.len()];
    if let Some(days) = policy.keep_days {
        match now.checked_sub(Duration::from_secs(days.saturating_mul(SECS_PER_DAY))) {
            Some(cutoff) => {
                // Strictly older than the cutoff; an mtime exactly on the
                // boundary survives.
                for (mark, (_, mtime)) in age_marks.iter_mut().zip(&entries) {
                    *mark = *mtime < cutoff;
                }
            }
            None => {
                warn!("keep-n-days of {days} underflows the clock, age rule skipped");
            }
        }
    }

    let marks: Vec<bool> = match policy.mode {
        // Historical behavior: when both rules are set, the age rule's set
        // replaces the count rule's set entirely.
        RetentionMode::Override => {
            if policy.keep_days.is_some() {
                age_marks
            } else {
                count_marks
            }
        }
        RetentionMode::Combine => count_marks
            .iter()
            .zip(&age_marks)
            .map(|(count, age)| *count || *age)
            .collect(),
    };

    let plan: Vec<String> = entries
        .into_iter()
        .zip(marks)
        .filter_map(|((name, _), marked)| marked.then_some(name))
        .collect();
    debug!("Retention plan condemns {} entries", plan.len());
    Ok(plan)
}

/// Applies a plan in order. Dry-run records `WouldDelete` and touches
/// nothing; otherwise the first failed removal aborts the run, leaving the
/// remaining entries for the next one.
pub fn apply_retention(
    destination: &Path,
    plan: &[String],
    dry_run: bool,
) -> Result<Vec<(String, RetentionOutcome)>> {
    let mut outcomes = Vec::with_capacity(plan.len());
    for name in plan {
        let path = destination.join(name);
        if dry_run {
            debug!("Dry run, keeping {}", path.display());
            outcomes.push((name.clone(), RetentionOutcome::WouldDelete));
            continue;
        }
        fs::remove_file(&path)
            .map_err(|e| ZipkeepError::Deletion(format!("{}: {}", path.display(), e)))?;
        debug!("Deleted {}", path.display());
        outcomes.push((name.clone(), RetentionOutcome::Deleted));
    }
    Ok(outcomes)
}

/// Non-recursive listing of `destination`, sorted ascending by mtime. The
/// sort is stable, so tied mtimes keep their listing order. If the sorted
/// sequence still ends older than it starts, it is reversed rather than
/// re-sorted.
fn list_by_mtime(destination: &Path) -> Result<Vec<(String, SystemTime)>> {
    let reader = fs::read_dir(destination)
        .map_err(|e| ZipkeepError::RetentionList(format!("{}: {}", destination.display(), e)))?;

    let mut entries = Vec::new();
    for entry in reader {
        let entry = entry
            .map_err(|e| ZipkeepError::RetentionList(format!("{}: {}", destination.display(), e)))?;
        let mtime = entry
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| {
                ZipkeepError::RetentionList(format!("{}: {}", entry.path().display(), e))
            })?;
        entries.push((entry.file_name().to_string_lossy().into_owned(), mtime));
    }

    entries.sort_by_key(|(_, mtime)| *mtime);
    if let (Some(first), Some(last)) = (entries.first(), entries.last()) {
        if first.1 > last.1 {
            warn!(
                "Destination {} listed newest-first after sorting, reversing",
                destination.display()
            );
            entries.reverse();
        }
    }
    Ok(entries)
}
