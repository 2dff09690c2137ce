//! Dependency staging via Kahn's algorithm.
//!
//! Each round drains the current zero-in-degree set as one stage, preserving
//! declaration order within the round. Unknown dependency ids are warned
//! about and ignored for graph purposes; cycles fall back to one single-op
//! stage per remaining operation in declaration order.

use std::collections::{HashMap, HashSet};

use crate::constants::STAGE_ID_PREFIX;
use crate::types::op::PlannedOperation;
use crate::types::plan::Stage;

pub(crate) struct StagedPlan {
    pub stages: Vec<Stage>,
    pub warnings: Vec<String>,
}

pub(crate) fn build_stages(ops: &[PlannedOperation]) -> StagedPlan {
    let mut warnings = Vec::new();
    if ops.is_empty() {
        return StagedPlan {
            stages: Vec::new(),
            warnings,
        };
    }

    let mut known: HashSet<&str> = HashSet::new();
    for op in ops {
        if !known.insert(op.id()) {
            warnings.push(format!(
                "Duplicate operation id '{}'; ids must be unique within a plan.",
                op.id()
            ));
        }
    }

    // In-degree from declared dependencies restricted to ids in the plan;
    // successors[dep] lists dependent indices.
    let mut in_degree: Vec<usize> = vec![0; ops.len()];
    let mut successors: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, op) in ops.iter().enumerate() {
        for dep in &op.metadata.dependencies {
            if known.contains(dep.as_str()) {
                in_degree[idx] += 1;
                successors.entry(dep.as_str()).or_default().push(idx);
            } else {
                warnings.push(format!(
                    "Operation {} depends on missing operation {}. It will run anyway.",
                    op.id(),
                    dep
                ));
            }
        }
    }

    let mut stages: Vec<Stage> = Vec::new();
    let mut placed = vec![false; ops.len()];
    let mut ready: Vec<usize> = (0..ops.len()).filter(|&i| in_degree[i] == 0).collect();

    while !ready.is_empty() {
        let mut next: Vec<usize> = Vec::new();
        let stage_ops: Vec<PlannedOperation> = ready.iter().map(|&i| ops[i].clone()).collect();
        for &i in &ready {
            placed[i] = true;
            for &succ in successors
                .get(ops[i].id())
                .map(Vec::as_slice)
                .unwrap_or_default()
            {
                in_degree[succ] -= 1;
                if in_degree[succ] == 0 {
                    next.push(succ);
                }
            }
        }
        next.sort_unstable();
        push_stage(&mut stages, stage_ops);
        ready = next;
    }

    let remaining: Vec<usize> = (0..ops.len()).filter(|&i| !placed[i]).collect();
    if !remaining.is_empty() {
        warnings.push(format!(
            "Dependency cycle detected among {} operation(s); they will run sequentially in declaration order.",
            remaining.len()
        ));
        for i in remaining {
            push_stage(&mut stages, vec![ops[i].clone()]);
        }
    }

    // Degenerate guard: non-empty input must always produce stages.
    if stages.is_empty() {
        push_stage(&mut stages, ops.to_vec());
    }

    StagedPlan { stages, warnings }
}

fn push_stage(stages: &mut Vec<Stage>, operations: Vec<PlannedOperation>) {
    let parallel = operations.len() >= 2;
    stages.push(Stage {
        id: format!("{}{}", STAGE_ID_PREFIX, stages.len() + 1),
        operations,
        parallel,
    });
}
