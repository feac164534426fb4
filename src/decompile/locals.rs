use std::collections::HashMap;

use log::trace;

use crate::attribute_info::LocalVariableTableAttribute;
use crate::constant_info::ConstantPool;

use super::descriptor::{display_class_name, JvmType};
use super::{DecompileError, Result};

/// A named local variable slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVariable {
    pub name: String,
    pub ty: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct TableName {
    slot: u16,
    start_pc: u32,
    end_pc: u32,
    name: String,
}

/// Local variables of one method, shared by all of its blocks.
#[derive(Clone, Debug, Default)]
pub struct LocalVariables {
    slots: HashMap<u16, LocalVariable>,
    table: Vec<TableName>,
}

impl LocalVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slots holding `this` and the arguments on method entry.
    pub fn for_method(
        class_name: &str,
        is_static: bool,
        arg_types: &[JvmType],
        table: Option<(&LocalVariableTableAttribute, &ConstantPool)>,
    ) -> Result<Self> {
        let mut locals = LocalVariables::new();
        if let Some((lvt, const_pool)) = table {
            for item in &lvt.items {
                locals.table.push(TableName {
                    slot: item.index,
                    start_pc: item.start_pc as u32,
                    end_pc: item.start_pc as u32 + item.length as u32,
                    name: const_pool.utf8(item.name_index)?.to_string(),
                });
            }
        }

        let mut slot = 0u16;
        if !is_static {
            locals.slots.insert(
                0,
                LocalVariable {
                    name: "this".to_string(),
                    ty: display_class_name(class_name),
                },
            );
            slot = 1;
        }
        for ty in arg_types {
            let name = locals
                .table_name(slot, 0)
                .unwrap_or_else(|| format!("arg{}", slot));
            locals.slots.insert(
                slot,
                LocalVariable {
                    name,
                    ty: ty.display_name(),
                },
            );
            slot += if ty.is_wide() { 2 } else { 1 };
        }
        Ok(locals)
    }

    /// An existing slot; untyped loads cannot create one.
    pub fn require(&self, slot: u16) -> Result<&LocalVariable> {
        self.slots
            .get(&slot)
            .ok_or(DecompileError::LocalVariableNotFound { slot })
    }

    /// The slot's variable, created with type `ty` on first use.
    /// `pc` selects the LocalVariableTable entry that names it.
    pub fn get_or_create(&mut self, slot: u16, ty: &str, pc: usize) -> &LocalVariable {
        if !self.slots.contains_key(&slot) {
            let name = self
                .table_name(slot, pc as u32)
                .unwrap_or_else(|| format!("var{}", slot));
            trace!("new local {} ({}) in slot {}", name, ty, slot);
            self.slots.insert(
                slot,
                LocalVariable {
                    name,
                    ty: ty.to_string(),
                },
            );
        }
        &self.slots[&slot]
    }

    fn table_name(&self, slot: u16, pc: u32) -> Option<String> {
        let in_range = self
            .table
            .iter()
            .find(|t| t.slot == slot && t.start_pc <= pc && pc < t.end_pc);
        in_range
            .or_else(|| self.table.iter().find(|t| t.slot == slot))
            .map(|t| t.name.clone())
    }
}
