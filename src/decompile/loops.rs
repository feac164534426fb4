//! Loop discovery from backward branches.

use std::collections::BTreeSet;

use log::debug;

use crate::code_attribute::opcodes::{GOTO, GOTO_W};
use crate::code_attribute::DecodedInstruction;

use super::cfg::branch_target;
use super::cfg_types::{Bounds, Loop, LoopKind};
use super::{DecompileError, Result};

fn target_of(instructions: &[DecodedInstruction], instr: &DecodedInstruction) -> Result<usize> {
    branch_target(instructions, instr)?.ok_or(DecompileError::BranchTargetNotFound {
        index: instr.index,
        target: instr.branch_target_offset().unwrap_or(-1),
    })
}

fn is_goto(instr: &DecodedInstruction) -> bool {
    matches!(instr.opcode(), GOTO | GOTO_W)
}

/// Finds every loop of a method, innermost-last in scan order (highest end first).
///
/// Each backward branch closes a loop starting at its target. The
/// instructions between a loop's condition start and its end are not
/// scanned again, so a condition made of several branches yields one loop.
pub fn detect_loops(instructions: &[DecodedInstruction], bounds: &Bounds) -> Result<Vec<Loop>> {
    let mut loops = Vec::new();
    let mut starts = BTreeSet::new();

    let mut i = instructions.len();
    while i > 0 {
        i -= 1;
        let instr = &instructions[i];
        match instr.branch_offset() {
            Some(relative) if relative <= 0 => {}
            _ => continue,
        }

        let start = target_of(instructions, instr)?;
        let end = i;

        let break_target = if is_goto(instr) {
            let mut lowest = None;
            for candidate in &instructions[start..end] {
                if candidate.instruction.is_branch() {
                    let target = target_of(instructions, candidate)?;
                    if target > end && lowest.map_or(true, |l| target < l) {
                        lowest = Some(target);
                    }
                }
            }
            lowest.ok_or(DecompileError::LoopBreakTargetNotFound { start, end })?
        } else {
            end + 1
        };

        let entry = match start.checked_sub(1).map(|before| &instructions[before]) {
            Some(before) if is_goto(before) => {
                let target = target_of(instructions, before)?;
                (start < target && target <= end).then_some(target)
            }
            _ => None,
        };
        let (condition_start, kind) = match entry {
            Some(target) => (target, LoopKind::While),
            None => (do_while_condition(instructions, bounds, start, end)?, LoopKind::DoWhile),
        };

        if !starts.insert(start) {
            return Err(DecompileError::DuplicateLoopStart { start, end });
        }
        for candidate in &instructions[start..condition_start] {
            if candidate.instruction.is_branch() {
                let target = target_of(instructions, candidate)?;
                if condition_start < target && target <= end {
                    return Err(DecompileError::AmbiguousLoopCondition {
                        index: candidate.index,
                        target,
                    });
                }
            }
        }

        let found = Loop {
            start,
            condition_start,
            end,
            break_target,
            kind,
        };
        debug!("found loop {:?}", found);
        loops.push(found);
        i = condition_start;
    }
    Ok(loops)
}

/// The lowest bound of the trailing condition of a loop entered at its top.
///
/// The last bound inside the loop starts the condition. A lower bound
/// extends it when the block just above the following bound ends in a
/// branch back to the loop start, as in `while (a ? b : c)`.
fn do_while_condition(
    instructions: &[DecodedInstruction],
    bounds: &Bounds,
    start: usize,
    end: usize,
) -> Result<usize> {
    let mut condition_start = None;
    for (position, bound) in bounds.bounds.iter().enumerate().rev() {
        if bound.index < start || bound.index >= end {
            continue;
        }
        if condition_start.is_none() {
            condition_start = Some(bound.index);
            continue;
        }
        let next = match bounds.bounds.get(position + 1) {
            Some(next) => next.index,
            None => continue,
        };
        let last = &instructions[next - 1];
        if last.instruction.is_branch() && target_of(instructions, last)? == start {
            condition_start = Some(bound.index);
        }
    }
    // `start` is a branch target and therefore always a bound.
    Ok(condition_start.unwrap_or(start))
}
