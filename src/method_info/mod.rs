mod types;

pub use self::types::*;

use crate::attribute_info::{AttributeInfo, CodeAttribute};
use crate::constant_info::ConstantPool;
use crate::decompile::{DecompileError, Result};

impl MethodInfo {
    pub fn new(
        access_flags: MethodAccessFlags,
        name_index: u16,
        descriptor_index: u16,
        attributes: Vec<AttributeInfo>,
    ) -> Self {
        MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes_count: attributes.len() as u16,
            attributes,
        }
    }

    pub fn name<'a>(&self, const_pool: &'a ConstantPool) -> Result<&'a str> {
        const_pool.utf8(self.name_index)
    }

    pub fn descriptor<'a>(&self, const_pool: &'a ConstantPool) -> Result<&'a str> {
        const_pool.utf8(self.descriptor_index)
    }

    /// Whether the method is declared without a body.
    pub fn is_bodyless(&self) -> bool {
        self.access_flags
            .intersects(MethodAccessFlags::ABSTRACT | MethodAccessFlags::NATIVE)
    }

    /// The parsed `Code` attribute. A method may carry at most one.
    pub fn code(&self, const_pool: &ConstantPool) -> Result<Option<CodeAttribute>> {
        let mut found = None;
        for attr in &self.attributes {
            if attr.name(const_pool)? != "Code" {
                continue;
            }
            if found.is_some() {
                return Err(DecompileError::DuplicateAttribute { name: "Code" });
            }
            found = Some(CodeAttribute::parse(attr)?);
        }
        Ok(found)
    }
}
