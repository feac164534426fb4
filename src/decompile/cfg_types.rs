use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::code_attribute::DecodedInstruction;

/// Why an instruction index starts a new block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoundCause {
    MethodStart,
    MethodEnd,
    ExceptionStart,
    ExceptionEnd,
    ExceptionHandler,
    /// Jumped to by the branch at this instruction index.
    BranchTarget(usize),
    /// Follows the branch at this instruction index.
    AfterBranch(usize),
}

/// A block boundary and everything that put it there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bound {
    pub index: usize,
    pub causes: BTreeSet<BoundCause>,
}

impl Bound {
    /// Index of the first branch jumping here, if any.
    pub fn branched_from(&self) -> Option<usize> {
        self.causes.iter().find_map(|cause| match cause {
            BoundCause::BranchTarget(from) => Some(*from),
            _ => None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    Branch,
    Catch,
    Loop,
}

/// A named jump target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    pub id: usize,
    pub kind: LabelKind,
}

impl Label {
    /// The same label, named as the head of a loop.
    pub fn as_loop(self) -> Label {
        Label {
            kind: LabelKind::Loop,
            ..self
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LabelKind::Branch => write!(f, "L{}", self.id),
            LabelKind::Catch => write!(f, "CATCH_L{}", self.id),
            LabelKind::Loop => write!(f, "LOOP_L{}", self.id),
        }
    }
}

/// One exception table entry, in instruction indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExceptionRegion {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
    pub handler: usize,
    pub exception_type: String,
}

/// Sorted block boundaries of one method and the labels assigned to them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub bounds: Vec<Bound>,
    /// Every bound index below the method length.
    pub labels: BTreeMap<usize, Label>,
    /// Number of instructions in the method.
    pub len: usize,
}

impl Bounds {
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bounds.iter().map(|b| b.index)
    }

    pub fn get(&self, index: usize) -> Option<&Bound> {
        self.bounds
            .binary_search_by_key(&index, |b| b.index)
            .ok()
            .map(|i| &self.bounds[i])
    }

    pub fn label(&self, index: usize) -> Option<Label> {
        self.labels.get(&index).copied()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopKind {
    /// Entered through a `goto` to the condition placed after the body.
    While,
    /// Entered at the top of the body; the condition sits at the bottom.
    DoWhile,
}

/// A loop found from a backward branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Loop {
    pub start: usize,
    pub condition_start: usize,
    /// Index of the backward branch.
    pub end: usize,
    pub break_target: usize,
    pub kind: LoopKind,
}

impl Loop {
    /// Index a `continue` jumps to.
    pub fn head(&self) -> usize {
        match self.kind {
            LoopKind::While => self.condition_start,
            LoopKind::DoWhile => self.start,
        }
    }
}

/// A maximal straight-line run of instructions `[start, end)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub label: Label,
    /// Labels control may leave this block for, fall-through included.
    pub branch_labels: Vec<Label>,
    /// Instruction indices matching `branch_labels`.
    pub successors: Vec<usize>,
    /// Caught type when the block is an exception handler.
    pub handler_type: Option<String>,
}

impl Block {
    pub fn instructions<'a>(&self, all: &'a [DecodedInstruction]) -> &'a [DecodedInstruction] {
        &all[self.start..self.end]
    }

    pub fn last_index(&self) -> usize {
        self.end - 1
    }

    pub fn is_handler(&self) -> bool {
        self.handler_type.is_some()
    }
}
