#![allow(dead_code)]

use classfile_decompiler::attribute_info::{AttributeInfo, CodeAttribute, ExceptionEntry};
use classfile_decompiler::constant_info::ConstantPool;
use classfile_decompiler::decompile::{decompile_code, DecompileOptions, MethodSignature, Result};
use classfile_decompiler::method_info::{MethodAccessFlags, MethodInfo};

pub const CLASS_NAME: &str = "demo/Sample";

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Default options without the `/* n */` instruction prefixes.
pub fn plain_options() -> DecompileOptions {
    DecompileOptions {
        instruction_comments: false,
        ..DecompileOptions::default()
    }
}

/// Big-endian 16-bit branch offset from the instruction at byte `from` to byte `to`.
pub fn jump(from: usize, to: usize) -> [u8; 2] {
    ((to as i64 - from as i64) as i16).to_be_bytes()
}

pub fn index(value: u16) -> [u8; 2] {
    value.to_be_bytes()
}

pub fn code(bytes: Vec<u8>) -> CodeAttribute {
    CodeAttribute::new(8, 8, bytes, vec![], vec![])
}

pub fn code_with_handlers(bytes: Vec<u8>, handlers: Vec<ExceptionEntry>) -> CodeAttribute {
    CodeAttribute::new(8, 8, bytes, handlers, vec![])
}

pub fn catch(start_pc: u16, end_pc: u16, handler_pc: u16, catch_type: u16) -> ExceptionEntry {
    ExceptionEntry {
        start_pc,
        end_pc,
        handler_pc,
        catch_type,
    }
}

pub fn decompile_with(
    pool: &ConstantPool,
    access_flags: MethodAccessFlags,
    descriptor: &str,
    code: &CodeAttribute,
    options: &DecompileOptions,
) -> Result<String> {
    init_logging();
    let signature = MethodSignature {
        class_name: CLASS_NAME,
        access_flags,
        name: "sample",
        descriptor,
    };
    decompile_code(&signature, code, pool, options)
}

/// Body of a static method, rendered without instruction prefixes.
pub fn decompile_static(pool: &ConstantPool, descriptor: &str, bytes: Vec<u8>) -> Result<String> {
    decompile_with(pool, MethodAccessFlags::STATIC, descriptor, &code(bytes), &plain_options())
}

/// Body of an instance method, rendered without instruction prefixes.
pub fn decompile_instance(pool: &ConstantPool, descriptor: &str, bytes: Vec<u8>) -> Result<String> {
    decompile_with(pool, MethodAccessFlags::PUBLIC, descriptor, &code(bytes), &plain_options())
}

/// A method carrying `code` as its `Code` attribute.
pub fn method(
    pool: &mut ConstantPool,
    access_flags: MethodAccessFlags,
    name: &str,
    descriptor: &str,
    code: Option<&CodeAttribute>,
) -> MethodInfo {
    let name_index = pool.add_utf8(name);
    let descriptor_index = pool.add_utf8(descriptor);
    let attributes: Vec<AttributeInfo> = match code {
        Some(code) => {
            let code_name = pool.add_utf8("Code");
            vec![code.to_attribute(code_name).unwrap()]
        }
        None => vec![],
    };
    MethodInfo::new(access_flags, name_index, descriptor_index, attributes)
}
