//! Resolution of constant-pool reference chains into display names and types.

use crate::constant_info::{bad_reference, ConstantInfo, ConstantPool};

use super::descriptor::{class_constant_type, display_class_name, field_type, internal_to_source_name, method_type, JvmType};
use super::Result;

/// A resolved `Class` constant.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassRef {
    /// Element type name with dimensions stripped (`"int"`, `"String"`, `"a.b.C"`).
    pub name: String,
    pub array_dimensions: usize,
    pub ty: JvmType,
}

impl ClassRef {
    /// Full display name, dimensions included.
    pub fn type_name(&self) -> String {
        self.ty.display_name()
    }
}

/// A resolved `FieldRef` constant.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldRef {
    pub class_name: String,
    pub name: String,
    pub ty: JvmType,
}

/// A resolved `MethodRef`, `InterfaceMethodRef` or `InvokeDynamic` constant.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodRef {
    /// Dotted owner class. Empty for dynamic call sites.
    pub class_name: String,
    pub name: String,
    pub descriptor: String,
    pub arg_types: Vec<JvmType>,
    pub return_type: JvmType,
}

impl MethodRef {
    pub fn returns_void(&self) -> bool {
        self.return_type == JvmType::Void
    }
}

pub fn decode_class_ref(const_pool: &ConstantPool, index: u16) -> Result<ClassRef> {
    let ty = class_constant_type(const_pool.class_name(index)?)?;
    Ok(ClassRef {
        name: ty.base_type().display_name(),
        array_dimensions: ty.array_dimensions(),
        ty,
    })
}

pub fn decode_field_ref(const_pool: &ConstantPool, index: u16) -> Result<FieldRef> {
    let (class_index, name_and_type_index) = match const_pool.get(index)? {
        ConstantInfo::FieldRef(r) => (r.class_index, r.name_and_type_index),
        other => return Err(bad_reference(index, "FieldRef", other)),
    };
    let (name, descriptor) = const_pool.name_and_type(name_and_type_index)?;
    Ok(FieldRef {
        class_name: display_class_name(const_pool.class_name(class_index)?),
        name: name.to_string(),
        ty: field_type(descriptor)?,
    })
}

/// Resolves the target of `invokevirtual`, `invokespecial` or `invokestatic`.
/// Interface methods are accepted too, as the last two may name them.
pub fn decode_method_ref(const_pool: &ConstantPool, index: u16) -> Result<MethodRef> {
    match const_pool.get(index)? {
        ConstantInfo::MethodRef(r) => method_ref(const_pool, r.class_index, r.name_and_type_index),
        ConstantInfo::InterfaceMethodRef(r) => method_ref(const_pool, r.class_index, r.name_and_type_index),
        other => Err(bad_reference(index, "MethodRef", other)),
    }
}

pub fn decode_interface_method_ref(const_pool: &ConstantPool, index: u16) -> Result<MethodRef> {
    match const_pool.get(index)? {
        ConstantInfo::InterfaceMethodRef(r) => method_ref(const_pool, r.class_index, r.name_and_type_index),
        other => Err(bad_reference(index, "InterfaceMethodRef", other)),
    }
}

/// Resolves a dynamic call site through its name and type.
pub fn decode_invoke_dynamic(const_pool: &ConstantPool, index: u16) -> Result<MethodRef> {
    let name_and_type_index = match const_pool.get(index)? {
        ConstantInfo::InvokeDynamic(c) => c.name_and_type_index,
        other => return Err(bad_reference(index, "InvokeDynamic", other)),
    };
    let (name, descriptor) = const_pool.name_and_type(name_and_type_index)?;
    let (arg_types, return_type) = method_type(descriptor)?;
    Ok(MethodRef {
        class_name: String::new(),
        name: name.to_string(),
        descriptor: descriptor.to_string(),
        arg_types,
        return_type,
    })
}

fn method_ref(const_pool: &ConstantPool, class_index: u16, name_and_type_index: u16) -> Result<MethodRef> {
    let (name, descriptor) = const_pool.name_and_type(name_and_type_index)?;
    let (arg_types, return_type) = method_type(descriptor)?;
    Ok(MethodRef {
        class_name: internal_to_source_name(const_pool.class_name(class_index)?),
        name: name.to_string(),
        descriptor: descriptor.to_string(),
        arg_types,
        return_type,
    })
}
