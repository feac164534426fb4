mod types;

pub use self::types::*;

use std::io::Cursor;

use binrw::{BinRead, BinWrite};

use crate::constant_info::ConstantPool;
use crate::decompile::{DecompileError, Result};

fn malformed(name: &'static str) -> impl FnOnce(binrw::Error) -> DecompileError {
    move |source| DecompileError::MalformedAttribute { name, source }
}

impl AttributeInfo {
    pub fn new(attribute_name_index: u16, info: Vec<u8>) -> Self {
        AttributeInfo {
            attribute_name_index,
            attribute_length: info.len() as u32,
            info,
        }
    }

    pub fn name<'a>(&self, const_pool: &'a ConstantPool) -> Result<&'a str> {
        const_pool.utf8(self.attribute_name_index)
    }
}

impl CodeAttribute {
    pub fn new(
        max_stack: u16,
        max_locals: u16,
        code: Vec<u8>,
        exception_table: Vec<ExceptionEntry>,
        attributes: Vec<AttributeInfo>,
    ) -> Self {
        CodeAttribute {
            max_stack,
            max_locals,
            code_length: code.len() as u32,
            code,
            exception_table_length: exception_table.len() as u16,
            exception_table,
            attributes_count: attributes.len() as u16,
            attributes,
        }
    }

    /// Reads the payload of a `Code` attribute.
    pub fn parse(attr: &AttributeInfo) -> Result<Self> {
        CodeAttribute::read(&mut Cursor::new(&attr.info)).map_err(malformed("Code"))
    }

    /// Serializes this payload back into a raw attribute.
    pub fn to_attribute(&self, attribute_name_index: u16) -> Result<AttributeInfo> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(&mut cursor).map_err(malformed("Code"))?;
        Ok(AttributeInfo::new(attribute_name_index, cursor.into_inner()))
    }

    /// The first `LocalVariableTable` sub-attribute, if any.
    pub fn local_variable_table(&self, const_pool: &ConstantPool) -> Result<Option<LocalVariableTableAttribute>> {
        for attr in &self.attributes {
            if attr.name(const_pool)? == "LocalVariableTable" {
                return LocalVariableTableAttribute::parse(attr).map(Some);
            }
        }
        Ok(None)
    }
}

impl LocalVariableTableAttribute {
    pub fn new(items: Vec<LocalVariableTableItem>) -> Self {
        LocalVariableTableAttribute {
            local_variable_table_length: items.len() as u16,
            items,
        }
    }

    pub fn parse(attr: &AttributeInfo) -> Result<Self> {
        LocalVariableTableAttribute::read(&mut Cursor::new(&attr.info)).map_err(malformed("LocalVariableTable"))
    }

    pub fn to_attribute(&self, attribute_name_index: u16) -> Result<AttributeInfo> {
        let mut cursor = Cursor::new(Vec::new());
        self.write(&mut cursor).map_err(malformed("LocalVariableTable"))?;
        Ok(AttributeInfo::new(attribute_name_index, cursor.into_inner()))
    }

    /// The entry naming `slot` at byte offset `pc`.
    pub fn find(&self, slot: u16, pc: u16) -> Option<&LocalVariableTableItem> {
        self.items.iter().find(|item| {
            item.index == slot && pc >= item.start_pc && (pc as u32) < item.start_pc as u32 + item.length as u32
        })
    }
}
