//! Per-method pipeline: decode, partition, evaluate, then assemble.

use log::debug;

use crate::attribute_info::{CodeAttribute, LocalVariableTableAttribute};
use crate::code_attribute::decode;
use crate::constant_info::ConstantPool;
use crate::method_info::{MethodAccessFlags, MethodInfo};

use super::cfg::{build_blocks, compute_bounds, resolve_exception_regions, validate_bounds};
use super::descriptor::{internal_to_source_name, method_type, simple_class_name};
use super::locals::LocalVariables;
use super::loops::detect_loops;
use super::stack_sim::{BlockEvaluator, MethodState};
use super::structuring::{referenced_blocks, Assembler};
use super::{DecompileError, DecompileOptions, Result};

/// What a method body needs to know about its declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSignature<'a> {
    /// Internal name of the declaring class, e.g. `a/b/Foo`.
    pub class_name: &'a str,
    pub access_flags: MethodAccessFlags,
    pub name: &'a str,
    pub descriptor: &'a str,
}

impl MethodSignature<'_> {
    pub fn is_static(&self) -> bool {
        self.access_flags.contains(MethodAccessFlags::STATIC)
    }
}

fn method_locals(
    signature: &MethodSignature,
    table: Option<&LocalVariableTableAttribute>,
    const_pool: &ConstantPool,
) -> Result<LocalVariables> {
    let (arg_types, _) = method_type(signature.descriptor)?;
    LocalVariables::for_method(
        signature.class_name,
        signature.is_static(),
        &arg_types,
        table.map(|t| (t, const_pool)),
    )
}

/// Decompiles a `Code` attribute into a braced method body.
pub fn decompile_code(
    signature: &MethodSignature,
    code: &CodeAttribute,
    const_pool: &ConstantPool,
    options: &DecompileOptions,
) -> Result<String> {
    debug!(
        "decompiling {}.{}{} ({} bytes)",
        signature.class_name,
        signature.name,
        signature.descriptor,
        code.code.len()
    );

    let instructions = decode(&code.code)?;
    let regions = resolve_exception_regions(code, &instructions, const_pool)?;
    let bounds = compute_bounds(&instructions, &regions)?;
    validate_bounds(&instructions, &regions, &bounds)?;
    let blocks = build_blocks(&instructions, &regions, &bounds)?;
    let loops = detect_loops(&instructions, &bounds)?;
    debug!(
        "{} instructions, {} blocks, {} loops",
        instructions.len(),
        blocks.len(),
        loops.len()
    );

    let table = if options.use_local_variable_table {
        code.local_variable_table(const_pool)?
    } else {
        None
    };
    let mut state = MethodState::new(method_locals(signature, table.as_ref(), const_pool)?);

    let class_name = internal_to_source_name(signature.class_name);
    let evaluator = BlockEvaluator {
        class_name: &class_name,
        const_pool,
        instructions: &instructions,
        labels: &bounds.labels,
        options,
    };
    let keep = referenced_blocks(&blocks);
    let mut block_lines = Vec::with_capacity(blocks.len());
    for (block, keep) in blocks.iter().zip(keep) {
        if keep {
            block_lines.push(evaluator.evaluate(block, &mut state)?);
        } else {
            debug!("skipping unreferenced block {}", block.label);
            block_lines.push(Vec::new());
        }
    }

    Assembler {
        instructions: &instructions,
        blocks: &blocks,
        loops: &loops,
        bounds: &bounds,
        options,
    }
    .assemble(block_lines)
}

/// `{flags} {ret} {name}(params)`, with constructors named after the class
/// and static initializers reduced to `static`.
pub fn method_header(
    signature: &MethodSignature,
    table: Option<&LocalVariableTableAttribute>,
    const_pool: &ConstantPool,
) -> Result<String> {
    if signature.name == "<clinit>" {
        return Ok("static".to_string());
    }
    let (arg_types, return_type) = method_type(signature.descriptor)?;
    let locals = method_locals(signature, table, const_pool)?;

    let mut params = Vec::with_capacity(arg_types.len());
    let mut slot = if signature.is_static() { 0 } else { 1 };
    for ty in &arg_types {
        let var = locals.require(slot)?;
        params.push(format!("{} {}", var.ty, var.name));
        slot += if ty.is_wide() { 2 } else { 1 };
    }

    let declaration = if signature.name == "<init>" {
        format!("{}({})", simple_class_name(signature.class_name), params.join(", "))
    } else {
        format!("{} {}({})", return_type.display_name(), signature.name, params.join(", "))
    };
    let mut parts: Vec<&str> = signature.access_flags.keywords();
    parts.push(&declaration);
    Ok(parts.join(" "))
}

/// Renders one method of `class_name` with its header.
///
/// Failures are wrapped in [`DecompileError::Method`] naming the method.
pub fn decompile_method(
    class_name: &str,
    method: &MethodInfo,
    const_pool: &ConstantPool,
    options: &DecompileOptions,
) -> Result<String> {
    let signature = MethodSignature {
        class_name,
        access_flags: method.access_flags,
        name: method.name(const_pool)?,
        descriptor: method.descriptor(const_pool)?,
    };
    render_method(&signature, method, const_pool, options).map_err(|source| DecompileError::Method {
        method: format!("{}{}", signature.name, signature.descriptor),
        source: Box::new(source),
    })
}

fn render_method(
    signature: &MethodSignature,
    method: &MethodInfo,
    const_pool: &ConstantPool,
    options: &DecompileOptions,
) -> Result<String> {
    let code = method.code(const_pool)?;
    let table = match &code {
        Some(code) if options.use_local_variable_table => code.local_variable_table(const_pool)?,
        _ => None,
    };
    let header = method_header(signature, table.as_ref(), const_pool)?;
    if method.is_bodyless() {
        return Ok(format!("{};", header));
    }
    let code = code.ok_or(DecompileError::MissingAttribute { name: "Code" })?;
    let body = decompile_code(signature, &code, const_pool, options)?;
    Ok(format!("{} {}", header, body))
}
