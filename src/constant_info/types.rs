/// One entry of an already-parsed constant pool.
///
/// `Long` and `Double` occupy two pool slots; the second slot holds `Unusable`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstantInfo {
    Utf8(Utf8Constant),
    Integer(IntegerConstant),
    Float(FloatConstant),
    Long(LongConstant),
    Double(DoubleConstant),
    Class(ClassConstant),
    String(StringConstant),
    FieldRef(FieldRefConstant),
    MethodRef(MethodRefConstant),
    InterfaceMethodRef(InterfaceMethodRefConstant),
    NameAndType(NameAndTypeConstant),
    MethodHandle(MethodHandleConstant),
    MethodType(MethodTypeConstant),
    InvokeDynamic(InvokeDynamicConstant),
    Unusable,
}

impl ConstantInfo {
    /// Short tag used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConstantInfo::Utf8(_) => "Utf8",
            ConstantInfo::Integer(_) => "Integer",
            ConstantInfo::Float(_) => "Float",
            ConstantInfo::Long(_) => "Long",
            ConstantInfo::Double(_) => "Double",
            ConstantInfo::Class(_) => "Class",
            ConstantInfo::String(_) => "String",
            ConstantInfo::FieldRef(_) => "FieldRef",
            ConstantInfo::MethodRef(_) => "MethodRef",
            ConstantInfo::InterfaceMethodRef(_) => "InterfaceMethodRef",
            ConstantInfo::NameAndType(_) => "NameAndType",
            ConstantInfo::MethodHandle(_) => "MethodHandle",
            ConstantInfo::MethodType(_) => "MethodType",
            ConstantInfo::InvokeDynamic(_) => "InvokeDynamic",
            ConstantInfo::Unusable => "Unusable",
        }
    }

    /// Whether this entry takes two pool slots.
    pub fn is_wide(&self) -> bool {
        matches!(self, ConstantInfo::Long(_) | ConstantInfo::Double(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Utf8Constant {
    pub utf8_string: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegerConstant {
    pub value: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FloatConstant {
    pub value: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LongConstant {
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoubleConstant {
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassConstant {
    pub name_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StringConstant {
    pub string_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldRefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodRefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InterfaceMethodRefConstant {
    pub class_index: u16,
    pub name_and_type_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NameAndTypeConstant {
    pub name_index: u16,
    pub descriptor_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodHandleConstant {
    pub reference_kind: u8,
    pub reference_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodTypeConstant {
    pub descriptor_index: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct InvokeDynamicConstant {
    pub bootstrap_method_attr_index: u16,
    pub name_and_type_index: u16,
}
