use crate::attribute_info::AttributeInfo;
use crate::constant_info::ConstantPool;
use crate::decompile::Result;
use crate::field_info::FieldInfo;
use crate::method_info::MethodInfo;

/// A class as handed over by the class-file layer.
///
/// The container format itself is read elsewhere; this struct only holds the
/// pieces decompilation looks at.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassFile {
    pub minor_version: u16,
    pub major_version: u16,
    pub const_pool: ConstantPool,
    pub access_flags: ClassAccessFlags,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: Vec<u16>,
    pub fields: Vec<FieldInfo>,
    pub methods: Vec<MethodInfo>,
    pub attributes: Vec<AttributeInfo>,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClassAccessFlags(u16);

bitflags! {
    impl ClassAccessFlags: u16 {
        const PUBLIC = 0x0001;     //	Declared public; may be accessed from outside its package.
        const FINAL = 0x0010;      //	Declared final; no subclasses allowed.
        const SUPER = 0x0020;      //	Treat superclass methods specially when invoked by the invokespecial instruction.
        const INTERFACE = 0x0200;  //	Is an interface, not a class.
        const ABSTRACT = 0x0400;   //	Declared abstract; must not be instantiated.
        const SYNTHETIC = 0x1000;  //	Declared synthetic; not present in the source code.
        const ANNOTATION = 0x2000; //	Declared as an annotation type.
        const ENUM = 0x4000;       //	Declared as an enum type.
        const MODULE = 0x8000;     //	Declared as a module type.
    }
}

impl ClassFile {
    /// A class without interfaces, fields or methods.
    pub fn new(const_pool: ConstantPool, access_flags: ClassAccessFlags, this_class: u16, super_class: u16) -> Self {
        ClassFile {
            minor_version: 0,
            major_version: 52,
            const_pool,
            access_flags,
            this_class,
            super_class,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Internal (slash separated) name of this class.
    pub fn this_class_name(&self) -> Result<&str> {
        self.const_pool.class_name(self.this_class)
    }

    /// Internal name of the superclass, `None` for `java/lang/Object` itself.
    pub fn super_class_name(&self) -> Result<Option<&str>> {
        if self.super_class == 0 {
            return Ok(None);
        }
        self.const_pool.class_name(self.super_class).map(Some)
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodInfo> {
        self.methods
            .iter()
            .find(|m| m.name(&self.const_pool).map(|n| n == name).unwrap_or(false))
    }
}
