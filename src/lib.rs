//! Reconstructs readable pseudo-source from the method bytecode of
//! [Java Classfiles](https://docs.oracle.com/javase/specs/jvms/se10/html/jvms-4.html)
//!
//! ```rust
//! use classfile_decompiler::attribute_info::CodeAttribute;
//! use classfile_decompiler::code_attribute::opcodes::*;
//! use classfile_decompiler::constant_info::ConstantPool;
//! use classfile_decompiler::decompile::{decompile_code, DecompileOptions, MethodSignature};
//! use classfile_decompiler::method_info::MethodAccessFlags;
//!
//! let pool = ConstantPool::new();
//! let code = CodeAttribute::new(2, 0, vec![ICONST_2, ICONST_3, IADD, IRETURN], vec![], vec![]);
//! let signature = MethodSignature {
//!     class_name: "demo/Adder",
//!     access_flags: MethodAccessFlags::PUBLIC | MethodAccessFlags::STATIC,
//!     name: "five",
//!     descriptor: "()I",
//! };
//! let body = decompile_code(&signature, &code, &pool, &DecompileOptions::default()).unwrap();
//! assert!(body.contains("return 2 + 3;"));
//! ```

#[macro_use]
extern crate bitflags;

pub mod attribute_info;
pub mod constant_info;
pub mod field_info;
pub mod method_info;

pub mod code_attribute;

pub mod decompile;
pub mod types;

pub use decompile::{decompile_class, decompile_method, DecompileError, DecompileOptions, Decompiler};
pub use types::*;
