//! Per-stage dependency resolver
//!
//! Builds a dependency graph from each job's `needs` list and orders the
//! stage's jobs by breadth-first (Kahn) leveling: every job in a level only
//! depends on jobs from earlier levels, so the workflow engine may run a
//! level's jobs in parallel. Within a level, jobs keep the insertion order
//! of the original list; callers must not rely on the relative order of
//! independent jobs.
//!
//! Stages are sequential barriers, so a dependency living in a different
//! stage is rejected rather than resolved.

use crate::context::ValidationContext;
use crate::error::Result;
use conveyor_core::constants::JOB_KEY_NEEDS;
use conveyor_core::Job;
use std::collections::HashMap;

/// Order one stage's jobs by dependency level.
///
/// Fails on a `needs` entry naming an unknown job, a job from another
/// stage, or a dependency cycle.
pub(crate) fn order(jobs: Vec<Job>, ctx: &ValidationContext) -> Result<Vec<Job>> {
    let index_of: HashMap<&str, usize> = jobs
        .iter()
        .enumerate()
        .map(|(i, job)| (job.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; jobs.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); jobs.len()];

    for (i, job) in jobs.iter().enumerate() {
        for dependency in &job.needs {
            let needs_path = format!("{}.{}", job.name, JOB_KEY_NEEDS);
            match ctx.job_stages.get(dependency) {
                None => {
                    log::error!(
                        "undefined dependency '{}' required by job '{}'",
                        dependency,
                        job.name
                    );
                    return Err(ctx.error(
                        &needs_path,
                        format!(
                            "Job {} is not defined but is needed by job {}.",
                            dependency, job.name
                        ),
                    ));
                }
                Some(stage) if *stage != job.stage_name => {
                    log::error!(
                        "job '{}' depends on '{}' from stage '{}'",
                        job.name,
                        dependency,
                        stage
                    );
                    return Err(ctx.error(
                        &needs_path,
                        format!(
                            "Job {} is defining a dependency {} that belongs to a different stage",
                            job.name, dependency
                        ),
                    ));
                }
                Some(_) => {
                    // Same stage, so the dependency is in this job list.
                    if let Some(&d) = index_of.get(dependency.as_str()) {
                        in_degree[i] += 1;
                        dependents[d].push(i);
                    }
                }
            }
        }
    }

    // Kahn leveling: drain all currently independent jobs as one level,
    // then release their dependents.
    let total = jobs.len();
    let mut placed = vec![false; total];
    let mut order: Vec<usize> = Vec::with_capacity(total);
    let mut level: Vec<usize> = (0..total).filter(|&i| in_degree[i] == 0).collect();

    while !level.is_empty() {
        for &i in &level {
            placed[i] = true;
            for &dependent in &dependents[i] {
                in_degree[dependent] -= 1;
            }
        }
        log::debug!("level of {} jobs resolved", level.len());
        order.extend(level.iter().copied());
        level = (0..total)
            .filter(|&i| !placed[i] && in_degree[i] == 0)
            .collect();
    }

    if order.len() < total {
        let cyclic: Vec<&str> = jobs
            .iter()
            .enumerate()
            .filter(|(i, _)| !placed[*i])
            .map(|(_, job)| job.name.as_str())
            .collect();
        log::error!("circular dependency among jobs: {:?}", cyclic);
        let first = cyclic.first().copied().unwrap_or_default();
        return Err(ctx.error(
            first,
            format!(
                "Circular dependency detected involving jobs: {}.",
                cyclic.join(", ")
            ),
        ));
    }

    let mut slots: Vec<Option<Job>> = jobs.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect())
}
