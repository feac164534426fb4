mod types;

pub use self::types::*;

use crate::attribute_info::AttributeInfo;
use crate::constant_info::ConstantPool;
use crate::decompile::Result;

impl FieldInfo {
    pub fn new(
        access_flags: FieldAccessFlags,
        name_index: u16,
        descriptor_index: u16,
        attributes: Vec<AttributeInfo>,
    ) -> Self {
        FieldInfo {
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
}
