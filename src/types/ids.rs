use uuid::Uuid;

use super::op::PlannedOperation;
use crate::constants::NS_TAG;

fn namespace() -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_URL, NS_TAG.as_bytes())
}

/// Deterministic plan id: UUIDv5 over the operation list in declaration
/// order. Two runs over the same operations share a plan id.
pub fn plan_id(ops: &[PlannedOperation]) -> Uuid {
    let ns = namespace();
    let mut s = String::new();
    for op in ops {
        s.push_str(op.operation.kind());
        s.push(':');
        s.push_str(op.id());
        s.push(':');
        s.push_str(op.operation.target_path());
        s.push('\n');
    }
    Uuid::new_v5(&ns, s.as_bytes())
}

/// Deterministic per-operation id scoped to a plan.
pub fn operation_uuid(plan_id: &Uuid, op: &PlannedOperation, idx: usize) -> Uuid {
    let name = format!("{}#{}", op.id(), idx);
    Uuid::new_v5(plan_id, name.as_bytes())
}
