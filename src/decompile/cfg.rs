use std::collections::{BTreeMap, BTreeSet};

use crate::attribute_info::CodeAttribute;
use crate::code_attribute::{ends_flow, opcodes, DecodedInstruction};
use crate::constant_info::ConstantPool;

use super::cfg_types::*;
use super::refs::decode_class_ref;
use super::{DecompileError, Result};

/// Index of the instruction starting at byte `offset`.
pub fn instruction_at_offset(instructions: &[DecodedInstruction], offset: i64) -> Option<usize> {
    let offset = usize::try_from(offset).ok()?;
    instructions.binary_search_by_key(&offset, |i| i.offset).ok()
}

/// Index a branch instruction jumps to, `None` for other instructions.
pub fn branch_target(instructions: &[DecodedInstruction], instr: &DecodedInstruction) -> Result<Option<usize>> {
    match instr.branch_target_offset() {
        None => Ok(None),
        Some(target) => instruction_at_offset(instructions, target)
            .map(Some)
            .ok_or(DecompileError::BranchTargetNotFound {
                index: instr.index,
                target,
            }),
    }
}

/// Maps the exception table onto instruction indices.
pub fn resolve_exception_regions(
    code_attr: &CodeAttribute,
    instructions: &[DecodedInstruction],
    const_pool: &ConstantPool,
) -> Result<Vec<ExceptionRegion>> {
    let code_len = code_attr.code.len();
    let mut regions = Vec::with_capacity(code_attr.exception_table.len());
    for entry in &code_attr.exception_table {
        let invalid = |reason| DecompileError::InvalidExceptionTable {
            start_pc: entry.start_pc,
            end_pc: entry.end_pc,
            handler_pc: entry.handler_pc,
            reason,
        };
        let index_of = |pc: u16| instruction_at_offset(instructions, pc as i64);

        let start = index_of(entry.start_pc).ok_or_else(|| invalid("start_pc starts no instruction"))?;
        let end = if entry.end_pc as usize == code_len {
            instructions.len()
        } else {
            index_of(entry.end_pc).ok_or_else(|| invalid("end_pc starts no instruction"))?
        };
        let handler = index_of(entry.handler_pc).ok_or_else(|| invalid("handler_pc starts no instruction"))?;
        if end <= start {
            return Err(invalid("empty protected range"));
        }
        if handler < end {
            return Err(invalid("handler precedes the end of its protected range"));
        }

        let exception_type = if entry.catch_type == 0 {
            "Throwable".to_string()
        } else {
            decode_class_ref(const_pool, entry.catch_type)?.type_name()
        };
        regions.push(ExceptionRegion {
            start,
            end,
            handler,
            exception_type,
        });
    }
    Ok(regions)
}

/// Collects every index that starts a block and labels those inside the method.
pub fn compute_bounds(instructions: &[DecodedInstruction], regions: &[ExceptionRegion]) -> Result<Bounds> {
    let len = instructions.len();
    let mut causes: BTreeMap<usize, BTreeSet<BoundCause>> = BTreeMap::new();
    let mut add = |index: usize, cause: BoundCause| {
        causes.entry(index).or_default().insert(cause);
    };

    add(0, BoundCause::MethodStart);
    add(len, BoundCause::MethodEnd);

    for region in regions {
        add(region.start, BoundCause::ExceptionStart);
        add(region.end, BoundCause::ExceptionEnd);
        add(region.handler, BoundCause::ExceptionHandler);
    }

    for instr in instructions {
        if let Some(target) = branch_target(instructions, instr)? {
            add(instr.index + 1, BoundCause::AfterBranch(instr.index));
            add(target, BoundCause::BranchTarget(instr.index));
        }
    }

    let mut labels = BTreeMap::new();
    for &index in causes.keys().filter(|&&index| index < len) {
        let kind = if regions.iter().any(|r| r.handler == index) {
            LabelKind::Catch
        } else {
            LabelKind::Branch
        };
        labels.insert(
            index,
            Label {
                id: labels.len() + 1,
                kind,
            },
        );
    }

    let bounds = causes
        .into_iter()
        .map(|(index, causes)| Bound { index, causes })
        .collect();
    Ok(Bounds { bounds, labels, len })
}

/// Rejects dead code after a return or throw and handlers reachable by normal flow.
pub fn validate_bounds(instructions: &[DecodedInstruction], regions: &[ExceptionRegion], bounds: &Bounds) -> Result<()> {
    for instr in instructions.iter().take(instructions.len().saturating_sub(1)) {
        let opcode = instr.opcode();
        let stops = instr.instruction.is_return() || opcode == opcodes::ATHROW;
        if stops && bounds.label(instr.index + 1).is_none() {
            return Err(DecompileError::UnreachableCode { index: instr.index });
        }
    }

    for region in regions {
        let handler = region.handler;
        match handler.checked_sub(1).map(|i| &instructions[i]) {
            None => {
                return Err(DecompileError::InvalidHandlerEntry {
                    handler,
                    cause: "method entry".to_string(),
                })
            }
            Some(prev) if !ends_flow(prev.opcode()) => {
                return Err(DecompileError::InvalidHandlerEntry {
                    handler,
                    cause: format!("fall-through from {} at instruction {}", prev.mnemonic(), prev.index),
                })
            }
            Some(_) => {}
        }
        if let Some(from) = bounds.get(handler).and_then(Bound::branched_from) {
            return Err(DecompileError::InvalidHandlerEntry {
                handler,
                cause: format!("branch at instruction {}", from),
            });
        }
    }
    Ok(())
}

/// Cuts the method into one block per pair of adjacent bounds.
pub fn build_blocks(
    instructions: &[DecodedInstruction],
    regions: &[ExceptionRegion],
    bounds: &Bounds,
) -> Result<Vec<Block>> {
    let len = instructions.len();
    let indices: Vec<usize> = bounds.indices().collect();
    let mut blocks = Vec::new();

    for pair in indices.windows(2) {
        let (start, end) = (pair[0], pair[1].min(len));
        if start >= end {
            continue;
        }
        let label = bounds
            .label(start)
            .ok_or(DecompileError::MissingTerminator { index: start })?;

        let last = &instructions[end - 1];
        let mut successors = Vec::new();
        if let Some(target) = branch_target(instructions, last)? {
            successors.push(target);
        }
        if !ends_flow(last.opcode()) {
            if end == len {
                return Err(DecompileError::MissingTerminator { index: last.index });
            }
            if !successors.contains(&end) {
                successors.push(end);
            }
        }
        let branch_labels = successors
            .iter()
            .map(|&index| bounds.label(index).ok_or(DecompileError::MissingTerminator { index: last.index }))
            .collect::<Result<Vec<_>>>()?;

        let mut caught: Vec<&str> = Vec::new();
        for region in regions.iter().filter(|r| r.handler == start) {
            if !caught.contains(&region.exception_type.as_str()) {
                caught.push(&region.exception_type);
            }
        }
        let handler_type = if caught.is_empty() {
            None
        } else {
            Some(caught.join(" | "))
        };

        blocks.push(Block {
            start,
            end,
            label,
            branch_labels,
            successors,
            handler_type,
        });
    }
    Ok(blocks)
}
