use binrw::binrw;

#[derive(Clone, Debug, PartialEq)]
#[binrw]
#[brw(big)]
pub struct AttributeInfo {
    pub attribute_name_index: u16,
    pub attribute_length: u32,
    #[br(count = attribute_length as usize)]
    pub info: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
#[binrw]
#[brw(big)]
pub struct ExceptionEntry {
    pub start_pc: u16,
    pub end_pc: u16,
    pub handler_pc: u16,
    /// Class constant of the caught type, 0 for a catch-all handler.
    pub catch_type: u16,
}

#[derive(Clone, Debug, PartialEq)]
#[binrw]
#[brw(big)]
pub struct CodeAttribute {
    pub max_stack: u16,
    pub max_locals: u16,
    pub code_length: u32,
    #[br(count = code_length as usize)]
    pub code: Vec<u8>,
    pub exception_table_length: u16,
    #[br(count = exception_table_length)]
    pub exception_table: Vec<ExceptionEntry>,
    pub attributes_count: u16,
    #[br(count = attributes_count)]
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Clone, Debug, PartialEq)]
#[binrw]
#[brw(big)]
pub struct LocalVariableTableAttribute {
    pub local_variable_table_length: u16,
    #[br(count = local_variable_table_length)]
    pub items: Vec<LocalVariableTableItem>,
}

#[derive(Clone, Debug, PartialEq)]
#[binrw]
#[brw(big)]
pub struct LocalVariableTableItem {
    pub start_pc: u16,
    pub length: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub index: u16,
}
