mod types;

pub use self::types::*;

use crate::decompile::{DecompileError, Result};

/// Append-only, 1-based view over a class's constant pool.
///
/// Index 0 is never valid. Wide entries (`Long`, `Double`) are followed by an
/// `Unusable` placeholder so that indices line up with the class file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConstantPool {
    entries: Vec<ConstantInfo>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps entries that already follow the two-slot convention.
    pub fn from_entries(entries: Vec<ConstantInfo>) -> Self {
        ConstantPool { entries }
    }

    /// Number of slots, placeholders included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ConstantInfo] {
        &self.entries
    }

    /// Appends an entry and returns its 1-based index.
    pub fn push(&mut self, entry: ConstantInfo) -> u16 {
        let wide = entry.is_wide();
        self.entries.push(entry);
        let index = self.entries.len() as u16;
        if wide {
            self.entries.push(ConstantInfo::Unusable);
        }
        index
    }

    pub fn get(&self, index: u16) -> Result<&ConstantInfo> {
        (index as usize)
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or(DecompileError::ConstantPoolIndexOutOfRange {
                index,
                len: self.entries.len(),
            })
    }

    pub fn utf8(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantInfo::Utf8(c) => Ok(&c.utf8_string),
            other => Err(bad_reference(index, "Utf8", other)),
        }
    }

    /// Internal (slash separated) name of a `Class` entry.
    pub fn class_name(&self, index: u16) -> Result<&str> {
        match self.get(index)? {
            ConstantInfo::Class(c) => self.utf8(c.name_index),
            other => Err(bad_reference(index, "Class", other)),
        }
    }

    /// `(name, descriptor)` of a `NameAndType` entry.
    pub fn name_and_type(&self, index: u16) -> Result<(&str, &str)> {
        match self.get(index)? {
            ConstantInfo::NameAndType(nt) => {
                Ok((self.utf8(nt.name_index)?, self.utf8(nt.descriptor_index)?))
            }
            other => Err(bad_reference(index, "NameAndType", other)),
        }
    }

    // ---- Builders, deduplicating where the class file format would ----

    pub fn add_utf8(&mut self, value: &str) -> u16 {
        let existing = self.entries.iter().position(
            |e| matches!(e, ConstantInfo::Utf8(c) if c.utf8_string == value),
        );
        match existing {
            Some(i) => (i + 1) as u16,
            None => self.push(ConstantInfo::Utf8(Utf8Constant {
                utf8_string: value.to_string(),
            })),
        }
    }

    pub fn add_class(&mut self, internal_name: &str) -> u16 {
        let name_index = self.add_utf8(internal_name);
        self.push(ConstantInfo::Class(ClassConstant { name_index }))
    }

    pub fn add_string(&mut self, value: &str) -> u16 {
        let string_index = self.add_utf8(value);
        self.push(ConstantInfo::String(StringConstant { string_index }))
    }

    pub fn add_integer(&mut self, value: i32) -> u16 {
        self.push(ConstantInfo::Integer(IntegerConstant { value }))
    }

    pub fn add_float(&mut self, value: f32) -> u16 {
        self.push(ConstantInfo::Float(FloatConstant { value }))
    }

    pub fn add_long(&mut self, value: i64) -> u16 {
        self.push(ConstantInfo::Long(LongConstant { value }))
    }

    pub fn add_double(&mut self, value: f64) -> u16 {
        self.push(ConstantInfo::Double(DoubleConstant { value }))
    }

    pub fn add_name_and_type(&mut self, name: &str, descriptor: &str) -> u16 {
        let name_index = self.add_utf8(name);
        let descriptor_index = self.add_utf8(descriptor);
        self.push(ConstantInfo::NameAndType(NameAndTypeConstant {
            name_index,
            descriptor_index,
        }))
    }

    pub fn add_field_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.add_class(class);
        let name_and_type_index = self.add_name_and_type(name, descriptor);
        self.push(ConstantInfo::FieldRef(FieldRefConstant {
            class_index,
            name_and_type_index,
        }))
    }

    pub fn add_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.add_class(class);
        let name_and_type_index = self.add_name_and_type(name, descriptor);
        self.push(ConstantInfo::MethodRef(MethodRefConstant {
            class_index,
            name_and_type_index,
        }))
    }

    pub fn add_interface_method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> u16 {
        let class_index = self.add_class(class);
        let name_and_type_index = self.add_name_and_type(name, descriptor);
        self.push(ConstantInfo::InterfaceMethodRef(InterfaceMethodRefConstant {
            class_index,
            name_and_type_index,
        }))
    }

    pub fn add_invoke_dynamic(&mut self, bootstrap_method_attr_index: u16, name: &str, descriptor: &str) -> u16 {
        let name_and_type_index = self.add_name_and_type(name, descriptor);
        self.push(ConstantInfo::InvokeDynamic(InvokeDynamicConstant {
            bootstrap_method_attr_index,
            name_and_type_index,
        }))
    }
}

pub(crate) fn bad_reference(index: u16, expected: &'static str, found: &ConstantInfo) -> DecompileError {
    DecompileError::BadConstantPoolReference {
        index,
        expected,
        found: found.kind(),
    }
}
