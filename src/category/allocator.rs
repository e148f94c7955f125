//! Pure code allocation: next free root or child code given a sibling set.
//!
//! Allocation never mutates anything, so a caller can compute, race, lose,
//! refresh the sibling set, and compute again.

use super::code::Code;

/// Next free root code: one past the highest existing root, or `1`.
pub fn allocate_root_code(siblings: &[Code]) -> Code {
    let max = siblings
        .iter()
        .filter(|code| code.level() == 1)
        .map(Code::last_segment)
        .max()
        .unwrap_or(0);
    Code::root(max + 1)
}

/// Next free child code under `parent`, or the next root when `parent` is
/// `None`. Only direct children of `parent` are considered; anything else in
/// the sibling set is ignored.
pub fn allocate_child_code(parent: Option<&Code>, siblings: &[Code]) -> Code {
    let Some(parent) = parent else {
        return allocate_root_code(siblings);
    };
    let max = siblings
        .iter()
        .filter(|code| code.is_child_of(parent))
        .map(Code::last_segment)
        .max()
        .unwrap_or(0);
    parent.child(max + 1)
}
