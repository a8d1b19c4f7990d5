//! Diff between persisted task records and a freshly extracted checklist.

use crate::types::{ChangeCounts, ExtractedTask, TaskRecord};
use std::collections::HashMap;

/// A task record to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub node_id: String,
    pub text: String,
    pub is_completed: bool,
    pub order: i64,
    pub completed_at: Option<i64>,
}

/// Changed fields of an existing record. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub is_completed: Option<bool>,
    pub order: Option<i64>,
    /// `Some(None)` clears the completion time.
    pub completed_at: Option<Option<i64>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.is_completed.is_none()
            && self.order.is_none()
            && self.completed_at.is_none()
    }
}

/// One write against the task table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOp {
    Insert(NewTask),
    Patch {
        record_id: String,
        node_id: String,
        patch: TaskPatch,
    },
    Delete {
        record_id: String,
        node_id: String,
    },
}

/// Writes needed to bring a document's records in line with its tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub ops: Vec<TaskOp>,
    /// Records that matched their checklist item exactly and get no write.
    pub unchanged: usize,
}

impl SyncPlan {
    pub fn changes(&self) -> ChangeCounts {
        let mut counts = ChangeCounts {
            unchanged: self.unchanged,
            ..Default::default()
        };
        for op in &self.ops {
            match op {
                TaskOp::Insert(_) => counts.inserted += 1,
                TaskOp::Patch { .. } => counts.updated += 1,
                TaskOp::Delete { .. } => counts.deleted += 1,
            }
        }
        counts
    }

    pub fn is_noop(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Compute the writes that make `existing` match `extracted`.
///
/// Records are matched by `node_id`. A node id repeated within `extracted`
/// resolves to its last occurrence. Unchanged records produce no operation,
/// changed ones a patch of exactly the differing fields, and records with no
/// matching item are deleted.
pub fn plan_sync(existing: &[TaskRecord], extracted: &[ExtractedTask], now: i64) -> SyncPlan {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut targets: Vec<&ExtractedTask> = Vec::with_capacity(extracted.len());
    for task in extracted {
        match slots.get(task.node_id.as_str()) {
            Some(&slot) => targets[slot] = task,
            None => {
                slots.insert(task.node_id.as_str(), targets.len());
                targets.push(task);
            }
        }
    }

    let by_node: HashMap<&str, &TaskRecord> = existing
        .iter()
        .map(|record| (record.node_id.as_str(), record))
        .collect();

    let mut plan = SyncPlan::default();

    for target in targets {
        match by_node.get(target.node_id.as_str()) {
            None => plan.ops.push(TaskOp::Insert(NewTask {
                node_id: target.node_id.clone(),
                text: target.text.clone(),
                is_completed: target.is_completed,
                order: target.order,
                completed_at: target.is_completed.then_some(now),
            })),
            Some(record) => {
                let patch = diff_record(record, target, now);
                if patch.is_empty() {
                    plan.unchanged += 1;
                } else {
                    plan.ops.push(TaskOp::Patch {
                        record_id: record.id.clone(),
                        node_id: record.node_id.clone(),
                        patch,
                    });
                }
            }
        }
    }

    for record in existing {
        let kept = slots.contains_key(record.node_id.as_str())
            && by_node
                .get(record.node_id.as_str())
                .is_some_and(|indexed| indexed.id == record.id);
        if !kept {
            plan.ops.push(TaskOp::Delete {
                record_id: record.id.clone(),
                node_id: record.node_id.clone(),
            });
        }
    }

    plan
}

fn diff_record(record: &TaskRecord, target: &ExtractedTask, now: i64) -> TaskPatch {
    let mut patch = TaskPatch::default();

    if record.text != target.text {
        patch.text = Some(target.text.clone());
    }
    if record.order != target.order {
        patch.order = Some(target.order);
    }
    if record.is_completed != target.is_completed {
        patch.is_completed = Some(target.is_completed);
        patch.completed_at = Some(target.is_completed.then_some(now));
    }

    patch
}
