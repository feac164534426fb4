//! Nesting of evaluated blocks into labeled scopes and `while(true)` loops.
//!
//! Blocks are first put in emission order: source order, except that the
//! condition of a `while`-shaped loop is emitted before its body. Every
//! remaining jump must then either leave an enclosing scope forward
//! (`break L#`) or go back to the head of an enclosing loop
//! (`continue LOOP_L#`).

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::code_attribute::{is_unconditional_jump, DecodedInstruction};

use super::cfg::branch_target;
use super::cfg_types::{Block, Bounds, Label, Loop, LoopKind};
use super::stack_sim::render_lines;
use super::{DecompileError, DecompileOptions, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Item {
    Block(usize),
    LoopOpen(usize),
    LoopClose(usize),
    /// `break` out of the loop once its condition falls through.
    LoopExit(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScopeKind {
    Label(Label),
    Loop(usize),
}

/// An open or finished scope. Keys order scopes from inner (small) to outer (large).
#[derive(Clone, Copy, Debug)]
struct Scope {
    key: (usize, u8),
    kind: ScopeKind,
    open_at: usize,
    close_at: usize,
}

/// Which blocks are emitted: the first one, handlers, and every block some
/// other block can reach.
pub fn referenced_blocks(blocks: &[Block]) -> Vec<bool> {
    let referenced: HashSet<usize> = blocks
        .iter()
        .flat_map(|b| b.successors.iter().copied())
        .collect();
    blocks
        .iter()
        .enumerate()
        .map(|(position, block)| position == 0 || block.is_handler() || referenced.contains(&block.start))
        .collect()
}

pub struct Assembler<'a> {
    pub instructions: &'a [DecodedInstruction],
    pub blocks: &'a [Block],
    pub loops: &'a [Loop],
    pub bounds: &'a Bounds,
    pub options: &'a DecompileOptions,
}

impl<'a> Assembler<'a> {
    /// Joins the evaluated lines of every block into a method body.
    ///
    /// `block_lines` runs parallel to the blocks; entries of blocks that are
    /// not referenced are ignored.
    pub fn assemble(&self, mut block_lines: Vec<Vec<Option<String>>>) -> Result<String> {
        let keep = referenced_blocks(self.blocks);
        let items = self.emission_order(&keep)?;

        let mut block_items = HashMap::new();
        let mut loop_close = vec![0; self.loops.len()];
        for (position, item) in items.iter().enumerate() {
            match *item {
                Item::Block(b) => {
                    block_items.insert(self.blocks[b].start, position);
                }
                Item::LoopClose(l) => loop_close[l] = position,
                _ => {}
            }
        }
        let entry_gotos: HashSet<usize> = self
            .loops
            .iter()
            .filter(|l| l.kind == LoopKind::While)
            .map(|l| l.start - 1)
            .collect();

        let mut open: Vec<Scope> = Vec::new();
        let mut closed: Vec<Scope> = Vec::new();
        for (k, item) in items.iter().enumerate() {
            while let Some(scope) = open.pop() {
                if scope.key == (k, 1) {
                    closed.push(Scope { close_at: k, ..scope });
                } else {
                    open.push(scope);
                    break;
                }
            }

            match *item {
                Item::Block(b) => {
                    let block = &self.blocks[b];
                    let last = block.last_index();
                    let line = last - block.start;
                    if entry_gotos.contains(&last) {
                        block_lines[b][line] = None;
                        continue;
                    }
                    let target = match branch_target(self.instructions, &self.instructions[last])? {
                        Some(target) => target,
                        None => continue,
                    };
                    let unstructured = DecompileError::UnstructuredBranch { index: last, target };
                    let label = self.bounds.label(target).ok_or(DecompileError::BranchTargetNotFound {
                        index: last,
                        target: target as i64,
                    })?;
                    let q = block_items.get(&target).copied().ok_or(unstructured)?;

                    let replacement = if q > k {
                        open_label_scope(&mut open, q, k, label);
                        format!("break {}", label)
                    } else {
                        let enclosing = open.iter().rev().find_map(|scope| match scope.kind {
                            ScopeKind::Loop(l) if self.loops[l].head() == target => Some(l),
                            _ => None,
                        });
                        match enclosing {
                            Some(l) => format!("continue {}", self.loop_label(l)?),
                            None => return Err(DecompileError::UnstructuredBranch { index: last, target }),
                        }
                    };
                    if let Some(Some(text)) = block_lines.get_mut(b).and_then(|lines| lines.get_mut(line)) {
                        *text = text.replacen(&format!("goto {}", label), &replacement, 1);
                    }
                }
                Item::LoopOpen(l) => {
                    let key = (loop_close[l], 0);
                    if open.last().map_or(false, |top| top.key < key) {
                        return Err(self.loop_error(l));
                    }
                    open.push(Scope {
                        key,
                        kind: ScopeKind::Loop(l),
                        open_at: k,
                        close_at: 0,
                    });
                }
                Item::LoopClose(l) => match open.pop() {
                    Some(scope) if scope.kind == ScopeKind::Loop(l) => {}
                    _ => return Err(self.loop_error(l)),
                },
                Item::LoopExit(_) => {}
            }
        }

        self.render(&items, &closed, &block_lines)
    }

    fn loop_label(&self, l: usize) -> Result<Label> {
        self.bounds
            .label(self.loops[l].start)
            .map(Label::as_loop)
            .ok_or_else(|| self.loop_error(l))
    }

    fn loop_error(&self, l: usize) -> DecompileError {
        DecompileError::UnstructuredBranch {
            index: self.loops[l].end,
            target: self.loops[l].start,
        }
    }

    fn emission_order(&self, keep: &[bool]) -> Result<Vec<Item>> {
        let block_at: HashMap<usize, usize> = self
            .blocks
            .iter()
            .enumerate()
            .map(|(position, block)| (block.start, position))
            .collect();
        let mut order = EmissionOrder {
            assembler: self,
            keep,
            block_at,
            emitted: vec![false; self.loops.len()],
            items: Vec::new(),
        };
        order.range(0, self.bounds.len)?;
        debug!("emission order: {:?}", order.items);
        Ok(order.items)
    }

    fn render(&self, items: &[Item], scopes: &[Scope], block_lines: &[Vec<Option<String>>]) -> Result<String> {
        let mut lines: Vec<(usize, String)> = Vec::new();
        let mut depth = 1;

        for (k, item) in items.iter().enumerate() {
            let mut closing: Vec<&Scope> = scopes.iter().filter(|s| s.close_at == k).collect();
            closing.sort_by_key(|s| s.key);
            for _ in closing {
                depth -= 1;
                lines.push((depth, "}".to_string()));
            }
            let mut opening: Vec<&Scope> = scopes.iter().filter(|s| s.open_at == k).collect();
            opening.sort_by_key(|s| std::cmp::Reverse(s.key));
            for scope in opening {
                if let ScopeKind::Label(label) = scope.kind {
                    lines.push((depth, format!("{}: {{", label)));
                    depth += 1;
                }
            }

            match *item {
                Item::Block(b) => {
                    let block = &self.blocks[b];
                    if let Some(exception_type) = &block.handler_type {
                        lines.push((depth, format!("// {}: catch ({} exception)", block.label, exception_type)));
                    }
                    let rendered = render_lines(block, &block_lines[b], self.options);
                    lines.extend(rendered.into_iter().map(|line| (depth, line)));
                }
                Item::LoopOpen(l) => {
                    lines.push((depth, format!("{}: while(true) {{", self.loop_label(l)?)));
                    depth += 1;
                }
                Item::LoopClose(_) => {
                    depth -= 1;
                    lines.push((depth, "}".to_string()));
                }
                Item::LoopExit(l) => lines.push((depth, format!("break {};", self.loop_label(l)?))),
            }
        }

        let mut body = String::from("{");
        for (depth, line) in lines {
            let indent = self.options.indent.repeat(depth);
            body.push('\n');
            body.push_str(&indent);
            body.push_str(&line.replace('\n', &format!("\n{}", indent)));
        }
        body.push_str("\n}");
        Ok(body)
    }
}

fn open_label_scope(open: &mut Vec<Scope>, q: usize, k: usize, label: Label) {
    let key = (q, 1);
    if open.iter().any(|scope| scope.key == key) {
        return;
    }
    let scope = Scope {
        key,
        kind: ScopeKind::Label(label),
        open_at: k,
        close_at: 0,
    };
    match open.iter().position(|s| s.key < key) {
        Some(j) => {
            let open_at = open[j].open_at;
            open.insert(j, Scope { open_at, ..scope });
        }
        None => open.push(scope),
    }
}

struct EmissionOrder<'s, 'a> {
    assembler: &'s Assembler<'a>,
    keep: &'s [bool],
    block_at: HashMap<usize, usize>,
    emitted: Vec<bool>,
    items: Vec<Item>,
}

impl EmissionOrder<'_, '_> {
    fn range(&mut self, from: usize, to: usize) -> Result<()> {
        let loops = self.assembler.loops;
        let instructions = self.assembler.instructions;

        let mut index = from;
        while index < to {
            let pending = (0..loops.len()).find(|&l| !self.emitted[l] && loops[l].start == index);
            if let Some(l) = pending {
                let found = loops[l];
                if found.end + 1 > to {
                    return Err(self.assembler.loop_error(l));
                }
                self.emitted[l] = true;
                let conditional = !is_unconditional_jump(instructions[found.end].opcode());

                self.items.push(Item::LoopOpen(l));
                match found.kind {
                    LoopKind::While => {
                        self.range(found.condition_start, found.end + 1)?;
                        if conditional {
                            self.items.push(Item::LoopExit(l));
                        }
                        self.range(found.start, found.condition_start)?;
                    }
                    LoopKind::DoWhile => {
                        self.range(found.start, found.end + 1)?;
                        if conditional {
                            self.items.push(Item::LoopExit(l));
                        }
                    }
                }
                self.items.push(Item::LoopClose(l));
                index = found.end + 1;
                continue;
            }

            let position = *self
                .block_at
                .get(&index)
                .ok_or(DecompileError::MissingTerminator { index })?;
            if self.keep[position] {
                self.items.push(Item::Block(position));
            }
            index = self.assembler.blocks[position].end;
        }
        Ok(())
    }
}
