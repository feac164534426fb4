use std::collections::BTreeMap;

use log::{trace, warn};

use crate::code_attribute::opcodes::*;
use crate::code_attribute::DecodedInstruction;
use crate::constant_info::{bad_reference, ConstantInfo, ConstantPool};

use super::cfg::branch_target;
use super::cfg_types::{Block, Label};
use super::descriptor::{element_type_name, newarray_type, JvmType};
use super::expr::{CompareOp, Literal, StackValue};
use super::locals::LocalVariables;
use super::refs::{
    decode_class_ref, decode_field_ref, decode_interface_method_ref, decode_invoke_dynamic, decode_method_ref,
    MethodRef,
};
use super::{DecompileError, DecompileOptions, Result};

/// Name of the value pushed when an instruction finds the stack empty.
pub const MISSING_STACK_OBJECT: &str = "MISSING_STACK_OBJECT";

const NUMERIC_TYPES: [&str; 4] = ["int", "long", "float", "double"];
const ARITHMETIC_OPS: [&str; 5] = ["+", "-", "*", "/", "%"];
const SHIFT_OPS: [&str; 3] = ["<<", ">>", ">>>"];
const BITWISE_OPS: [&str; 3] = ["&", "|", "^"];
const COMPARE_OPS: [CompareOp; 6] = [
    CompareOp::Eq,
    CompareOp::Ne,
    CompareOp::Lt,
    CompareOp::Ge,
    CompareOp::Gt,
    CompareOp::Le,
];
/// Result types of `i2l` through `i2s`.
const CONVERSION_TYPES: [&str; 15] = [
    "long", "float", "double", "int", "float", "double", "int", "long", "double", "int", "long", "float", "byte",
    "char", "short",
];

/// State of one method that outlives a single block.
#[derive(Clone, Debug, Default)]
pub struct MethodState {
    pub locals: LocalVariables,
    next_object_id: usize,
}

impl MethodState {
    pub fn new(locals: LocalVariables) -> Self {
        MethodState {
            locals,
            next_object_id: 0,
        }
    }
}

/// Replays the instructions of one block against a symbolic operand stack,
/// producing at most one source line per instruction.
pub struct BlockEvaluator<'a> {
    /// Dotted name of the class owning the method.
    pub class_name: &'a str,
    pub const_pool: &'a ConstantPool,
    /// Every instruction of the method.
    pub instructions: &'a [DecodedInstruction],
    pub labels: &'a BTreeMap<usize, Label>,
    pub options: &'a DecompileOptions,
}

#[derive(Clone, Debug)]
struct Frame {
    stack: Vec<StackValue>,
    lines: Vec<Option<String>>,
    next_object_id: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Comparand {
    Zero,
    Null,
    Popped,
}

impl Frame {
    fn push(&mut self, value: StackValue) {
        self.stack.push(value);
    }

    fn pop(&mut self, instr: &DecodedInstruction) -> Result<StackValue> {
        self.stack
            .pop()
            .ok_or(DecompileError::StackUnderflow { offset: instr.offset })
    }

    fn next_object(&mut self) -> String {
        let name = format!("obj{}", self.next_object_id);
        self.next_object_id += 1;
        name
    }

    fn append_line(&mut self, index: usize, text: &str, separator: &str) {
        self.lines[index] = Some(match self.lines[index].take() {
            None => text.to_string(),
            Some(existing) => format!("{}{}{}", existing, separator, text),
        });
    }

    /// Writes every pending value onto the line of the instruction that produced it.
    fn flush(&mut self) {
        while let Some(value) = self.stack.pop() {
            self.append_line(value.origin(), &format!("{};", value.text()), " /* Same line */ ");
        }
    }
}

fn boolean_literal(ty: &str, value: &StackValue) -> Result<Option<&'static str>> {
    if ty != "boolean" {
        return Ok(None);
    }
    match value.int_constant() {
        None => Ok(None),
        Some(0) => Ok(Some("false")),
        Some(1) => Ok(Some("true")),
        Some(other) => Err(DecompileError::InvalidBooleanConstant { value: other }),
    }
}

/// Right-hand side of an assignment to something of type `ty`.
fn assigned_value(ty: &str, value: &StackValue) -> Result<String> {
    Ok(match boolean_literal(ty, value)? {
        Some(literal) => literal.to_string(),
        None => value.text(),
    })
}

impl<'a> BlockEvaluator<'a> {
    /// One optional line per instruction of `block`, indexed from the block start.
    pub fn evaluate(&self, block: &Block, state: &mut MethodState) -> Result<Vec<Option<String>>> {
        let code = block.instructions(self.instructions);
        let mut frame = Frame {
            stack: Vec::new(),
            lines: vec![None; code.len()],
            next_object_id: state.next_object_id,
        };
        if let Some(exception_type) = &block.handler_type {
            frame.push(StackValue::variable(0, "exception", exception_type.clone()));
        }

        let mut i = 0;
        while i < code.len() {
            let snapshot = frame.clone();
            match self.step(&mut frame, &mut state.locals, code, i) {
                Ok(()) => i += 1,
                Err(DecompileError::StackUnderflow { offset }) if self.options.recover_stack_underflow => {
                    warn!(
                        "operand stack underflow at offset {} ({}), retrying with a placeholder",
                        offset,
                        code[i].mnemonic()
                    );
                    frame = snapshot;
                    frame.push(StackValue::variable(i, MISSING_STACK_OBJECT, "Object"));
                }
                Err(e) => return Err(e),
            }
        }

        let ends_in_throw = code.last().map(|c| c.opcode() == ATHROW).unwrap_or(false);
        while let Some(value) = frame.stack.pop() {
            if frame.stack.is_empty() && ends_in_throw {
                break;
            }
            let text = value.text().replace(|c| c == '\r' || c == '\n', "~NEWLINE");
            frame.append_line(value.origin(), &format!("// UNHANDLED STACK OBJECT: {}", text), " ");
        }

        state.next_object_id = frame.next_object_id;
        Ok(frame.lines)
    }

    fn step(
        &self,
        frame: &mut Frame,
        locals: &mut LocalVariables,
        code: &[DecodedInstruction],
        i: usize,
    ) -> Result<()> {
        let instr = &code[i];
        let opcode = instr.opcode();
        trace!("{:>4}: {} {:?}", instr.index, instr.mnemonic(), instr.signed_args);

        match opcode {
            NOP => {}

            // ---- Constants ----
            ACONST_NULL => frame.push(StackValue::Null { origin: i }),
            ICONST_M1..=ICONST_5 => frame.push(constant(i, Literal::Int(opcode as i32 - ICONST_0 as i32))),
            LCONST_0 | LCONST_1 => frame.push(constant(i, Literal::Long((opcode - LCONST_0) as i64))),
            FCONST_0..=FCONST_2 => frame.push(constant(i, Literal::Float((opcode - FCONST_0) as f32))),
            DCONST_0 | DCONST_1 => frame.push(constant(i, Literal::Double((opcode - DCONST_0) as f64))),
            BIPUSH | SIPUSH => frame.push(constant(i, Literal::Int(instr.arg_i32(0)))),
            LDC | LDC_W => frame.push(self.load_constant(i, instr, false)?),
            LDC2_W => frame.push(self.load_constant(i, instr, true)?),

            // ---- Loads ----
            ILOAD => load(frame, locals, i, instr, instr.arg_u16(), "int"),
            LLOAD => load(frame, locals, i, instr, instr.arg_u16(), "long"),
            FLOAD => load(frame, locals, i, instr, instr.arg_u16(), "float"),
            DLOAD => load(frame, locals, i, instr, instr.arg_u16(), "double"),
            ALOAD => load_reference(frame, locals, i, instr.arg_u16())?,
            ILOAD_0..=ILOAD_3 => load(frame, locals, i, instr, (opcode - ILOAD_0) as u16, "int"),
            LLOAD_0..=LLOAD_3 => load(frame, locals, i, instr, (opcode - LLOAD_0) as u16, "long"),
            FLOAD_0..=FLOAD_3 => load(frame, locals, i, instr, (opcode - FLOAD_0) as u16, "float"),
            DLOAD_0..=DLOAD_3 => load(frame, locals, i, instr, (opcode - DLOAD_0) as u16, "double"),
            ALOAD_0..=ALOAD_3 => load_reference(frame, locals, i, (opcode - ALOAD_0) as u16)?,

            // ---- Array loads ----
            IALOAD => array_load(frame, i, instr, Some("int"))?,
            LALOAD => array_load(frame, i, instr, Some("long"))?,
            FALOAD => array_load(frame, i, instr, Some("float"))?,
            DALOAD => array_load(frame, i, instr, Some("double"))?,
            AALOAD => array_load(frame, i, instr, None)?,
            BALOAD => array_load(frame, i, instr, Some("byte"))?,
            CALOAD => array_load(frame, i, instr, Some("char"))?,
            SALOAD => array_load(frame, i, instr, Some("short"))?,

            // ---- Stores ----
            ISTORE | LSTORE | FSTORE | DSTORE | ASTORE => store(frame, locals, i, instr, instr.arg_u16(), None)?,
            ISTORE_0..=ISTORE_3 => store(frame, locals, i, instr, (opcode - ISTORE_0) as u16, Some("int"))?,
            LSTORE_0..=LSTORE_3 => store(frame, locals, i, instr, (opcode - LSTORE_0) as u16, Some("long"))?,
            FSTORE_0..=FSTORE_3 => store(frame, locals, i, instr, (opcode - FSTORE_0) as u16, Some("float"))?,
            DSTORE_0..=DSTORE_3 => store(frame, locals, i, instr, (opcode - DSTORE_0) as u16, Some("double"))?,
            ASTORE_0..=ASTORE_3 => store(frame, locals, i, instr, (opcode - ASTORE_0) as u16, None)?,
            IASTORE..=SASTORE => {
                let value = frame.pop(instr)?;
                let index = frame.pop(instr)?;
                let array = frame.pop(instr)?;
                let element = element_type_name(array.type_name()).unwrap_or("");
                let value = assigned_value(element, &value)?;
                frame.lines[i] = Some(format!("{}[{}] = {};", array.parenthesized(), index.text(), value));
            }

            // ---- Stack manipulation ----
            POP => {
                let value = frame.pop(instr)?;
                frame.lines[i] = Some(format!("{};", value.text()));
            }
            DUP => self.dup(frame, code, instr)?,
            DUP_X1 => {
                let top = frame.pop(instr)?;
                let second = frame.pop(instr)?;
                frame.push(top.clone());
                frame.push(second);
                frame.push(top);
            }
            DUP_X2 => {
                let top = frame.pop(instr)?;
                let second = frame.pop(instr)?;
                let third = frame.pop(instr)?;
                frame.push(top.clone());
                frame.push(third);
                frame.push(second);
                frame.push(top);
            }
            SWAP => {
                let top = frame.pop(instr)?;
                let second = frame.pop(instr)?;
                frame.push(top);
                frame.push(second);
            }

            // ---- Arithmetic ----
            IADD..=DREM => {
                let position = (opcode - IADD) as usize;
                binary(frame, i, instr, ARITHMETIC_OPS[position / 4], NUMERIC_TYPES[position % 4])?;
            }
            INEG..=DNEG => {
                let value = frame.pop(instr)?;
                let ty = NUMERIC_TYPES[(opcode - INEG) as usize];
                frame.push(StackValue::code(i, format!("- {}", value.parenthesized()), ty));
            }
            ISHL..=LUSHR => {
                let position = (opcode - ISHL) as usize;
                let amount = frame.pop(instr)?;
                let value = frame.pop(instr)?;
                let text = format!("({}) {} ({})", value.text(), SHIFT_OPS[position / 2], amount.text());
                frame.push(StackValue::code(i, text, NUMERIC_TYPES[position % 2]));
            }
            IAND..=LXOR => {
                let position = (opcode - IAND) as usize;
                binary(frame, i, instr, BITWISE_OPS[position / 2], NUMERIC_TYPES[position % 2])?;
            }
            IINC => {
                let var = locals.get_or_create(instr.arg_u16(), "int", instr.offset);
                let delta = instr.arg_i32(1);
                let text = match delta {
                    1 => format!("{}++;", var.name),
                    -1 => format!("{}--;", var.name),
                    d if d < 0 => format!("{} -= {};", var.name, -(d as i64)),
                    d => format!("{} += {};", var.name, d),
                };
                frame.lines[i] = Some(text);
            }
            I2L..=I2S => {
                let value = frame.pop(instr)?;
                let ty = CONVERSION_TYPES[(opcode - I2L) as usize];
                frame.push(StackValue::code(i, format!("({}) ({})", ty, value.text()), ty));
            }
            LCMP | FCMPL | FCMPG | DCMPL | DCMPG => {
                let right = frame.pop(instr)?;
                let left = frame.pop(instr)?;
                let owner = match opcode {
                    LCMP => "Long",
                    FCMPL | FCMPG => "Float",
                    _ => "Double",
                };
                let text = format!("{}.compare({}, {})", owner, left.text(), right.text());
                frame.push(StackValue::code(i, text, "int"));
            }

            // ---- Branches ----
            IFEQ..=IFLE => self.conditional(frame, i, instr, COMPARE_OPS[(opcode - IFEQ) as usize], Comparand::Zero)?,
            IF_ICMPEQ..=IF_ICMPLE => {
                self.conditional(frame, i, instr, COMPARE_OPS[(opcode - IF_ICMPEQ) as usize], Comparand::Popped)?
            }
            IF_ACMPEQ => self.conditional(frame, i, instr, CompareOp::Eq, Comparand::Popped)?,
            IF_ACMPNE => self.conditional(frame, i, instr, CompareOp::Ne, Comparand::Popped)?,
            IFNULL => self.conditional(frame, i, instr, CompareOp::Eq, Comparand::Null)?,
            IFNONNULL => self.conditional(frame, i, instr, CompareOp::Ne, Comparand::Null)?,
            GOTO | GOTO_W => {
                let label = self.target_label(instr)?;
                frame.lines[i] = Some(format!("goto {};", label));
            }
            LOOKUPSWITCH => {
                let key = frame.pop(instr)?;
                let table = instr.lookup_switch()?;
                let mut text = format!("lookupswitch({}):\n\tdefault: {:+}", key.text(), table.default);
                for (case, jump) in &table.pairs {
                    text.push_str(&format!("\n\t{}: {:+}", case, jump));
                }
                frame.lines[i] = Some(text);
            }

            // ---- Returns and throw ----
            IRETURN..=ARETURN => {
                let value = frame.pop(instr)?;
                frame.flush();
                frame.lines[i] = Some(format!("return {};", value.text()));
            }
            RETURN => {
                frame.flush();
                frame.lines[i] = Some("return;".to_string());
            }
            ATHROW => {
                let exception = frame.pop(instr)?;
                frame.flush();
                frame.lines[i] = Some(format!("throw {};", exception.text()));
                frame.push(exception);
            }

            // ---- Fields ----
            GETSTATIC => {
                let field = decode_field_ref(self.const_pool, instr.arg_u16())?;
                let ty = field.ty.display_name();
                let text = format!("({}) {}.{}", ty, field.class_name, field.name);
                frame.push(StackValue::code(i, text, ty));
            }
            PUTSTATIC => {
                let field = decode_field_ref(self.const_pool, instr.arg_u16())?;
                let value = frame.pop(instr)?;
                let value = assigned_value(&field.ty.display_name(), &value)?;
                frame.lines[i] = Some(format!("{}.{} = {};", field.class_name, field.name, value));
            }
            GETFIELD => {
                let field = decode_field_ref(self.const_pool, instr.arg_u16())?;
                let object = frame.pop(instr)?;
                let ty = field.ty.display_name();
                let text = format!("({}) ({}).{}", ty, object.text(), field.name);
                frame.push(StackValue::code(i, text, ty));
            }
            PUTFIELD => {
                let field = decode_field_ref(self.const_pool, instr.arg_u16())?;
                let value = frame.pop(instr)?;
                let object = frame.pop(instr)?;
                let value = assigned_value(&field.ty.display_name(), &value)?;
                frame.lines[i] = Some(format!("{}.{} = {};", object.parenthesized(), field.name, value));
            }

            // ---- Invocations ----
            INVOKEVIRTUAL | INVOKESPECIAL | INVOKEINTERFACE => {
                let method = if opcode == INVOKEINTERFACE {
                    decode_interface_method_ref(self.const_pool, instr.arg_u16())?
                } else {
                    decode_method_ref(self.const_pool, instr.arg_u16())?
                };
                let args = pop_arguments(frame, instr, &method.arg_types)?;
                let receiver = frame.pop(instr)?;
                if method.name == "<init>" {
                    self.constructor_call(frame, code, i, instr, &method, &receiver, args)?;
                } else {
                    let call = format!("{}.{}({})", receiver.parenthesized(), method.name, args);
                    finish_call(frame, i, &method, call);
                }
            }
            INVOKESTATIC => {
                let method = decode_method_ref(self.const_pool, instr.arg_u16())?;
                let args = pop_arguments(frame, instr, &method.arg_types)?;
                let call = format!("{}.{}({})", method.class_name, method.name, args);
                finish_call(frame, i, &method, call);
            }
            INVOKEDYNAMIC => {
                let method = decode_invoke_dynamic(self.const_pool, instr.arg_u16())?;
                let args = pop_arguments(frame, instr, &method.arg_types)?;
                let call = format!("{}({})", method.name, args);
                finish_call(frame, i, &method, call);
            }

            // ---- Objects and arrays ----
            NEW => {
                let class = decode_class_ref(self.const_pool, instr.arg_u16())?;
                let ty = class.type_name();
                let name = frame.next_object();
                frame.lines[i] = Some(format!("{} {} = new {}", ty, name, ty));
                frame.push(StackValue::variable(i, name, ty));
            }
            NEWARRAY => {
                let count = frame.pop(instr)?;
                let atype = instr.unsigned_args.first().copied().unwrap_or(0) as u8;
                let element = newarray_type(atype).ok_or_else(|| DecompileError::UnsupportedUsage {
                    mnemonic: instr.mnemonic(),
                    offset: instr.offset,
                    message: format!("unknown primitive array type {}", atype),
                })?;
                let ty = JvmType::Array(Box::new(element.clone())).display_name();
                let text = format!("new {}[{}]", element.display_name(), count.text());
                frame.push(StackValue::code(i, text, ty));
            }
            ANEWARRAY => {
                let class = decode_class_ref(self.const_pool, instr.arg_u16())?;
                let count = frame.pop(instr)?;
                let text = format!(
                    "new {}[{}]{}",
                    class.name,
                    count.text(),
                    "[]".repeat(class.array_dimensions)
                );
                frame.push(StackValue::code(i, text, format!("{}[]", class.type_name())));
            }
            MULTIANEWARRAY => {
                let class = decode_class_ref(self.const_pool, instr.arg_u16())?;
                let dimensions = instr.unsigned_args.get(1).copied().unwrap_or(0) as usize;
                if dimensions == 0 || dimensions > class.array_dimensions {
                    return Err(DecompileError::UnsupportedUsage {
                        mnemonic: instr.mnemonic(),
                        offset: instr.offset,
                        message: format!("{} dimensions requested for {}", dimensions, class.type_name()),
                    });
                }
                let mut sizes = Vec::with_capacity(dimensions);
                for _ in 0..dimensions {
                    sizes.push(frame.pop(instr)?);
                }
                let sized: String = sizes.iter().rev().map(|s| format!("[{}]", s.text())).collect();
                let text = format!(
                    "new {}{}{}",
                    class.name,
                    sized,
                    "[]".repeat(class.array_dimensions - dimensions)
                );
                frame.push(StackValue::code(i, text, class.type_name()));
            }
            ARRAYLENGTH => {
                let array = frame.pop(instr)?;
                frame.push(StackValue::code(i, format!("({}).length", array.text()), "int"));
            }
            CHECKCAST => {
                let class = decode_class_ref(self.const_pool, instr.arg_u16())?;
                let value = frame.pop(instr)?;
                let ty = class.type_name();
                frame.push(StackValue::code(i, format!("({}) {}", ty, value.parenthesized()), ty));
            }
            INSTANCEOF => {
                let class = decode_class_ref(self.const_pool, instr.arg_u16())?;
                let value = frame.pop(instr)?;
                let text = format!("{} instanceof {}", value.parenthesized(), class.type_name());
                frame.push(StackValue::code(i, text, "boolean"));
            }

            JSR | RET | JSR_W | TABLESWITCH | WIDE | POP2 | DUP2 | DUP2_X1 | DUP2_X2 | MONITORENTER
            | MONITOREXIT | BREAKPOINT | IMPDEP1 | IMPDEP2 => {
                return Err(DecompileError::UnsupportedInstruction {
                    mnemonic: instr.mnemonic(),
                    offset: instr.offset,
                })
            }
            _ => return Err(DecompileError::UnknownOpcode { opcode, offset: instr.offset }),
        }
        Ok(())
    }

    fn load_constant(&self, i: usize, instr: &DecodedInstruction, wide: bool) -> Result<StackValue> {
        let index = instr.arg_u16();
        let value = match (self.const_pool.get(index)?, wide) {
            (ConstantInfo::String(s), false) => Literal::String(self.const_pool.utf8(s.string_index)?.to_string()),
            (ConstantInfo::Integer(c), false) => Literal::Int(c.value),
            (ConstantInfo::Float(c), false) => Literal::Float(c.value),
            (ConstantInfo::Class(_), false) => {
                let class = decode_class_ref(self.const_pool, index)?;
                return Ok(StackValue::code(i, format!("{}.class", class.type_name()), "Class"));
            }
            (ConstantInfo::Long(c), true) => Literal::Long(c.value),
            (ConstantInfo::Double(c), true) => Literal::Double(c.value),
            (other, false) => return Err(bad_reference(index, "String, Integer, Float or Class", other)),
            (other, true) => return Err(bad_reference(index, "Long or Double", other)),
        };
        Ok(constant(i, value))
    }

    fn target_label(&self, instr: &DecodedInstruction) -> Result<Label> {
        let not_found = || DecompileError::BranchTargetNotFound {
            index: instr.index,
            target: instr.branch_target_offset().unwrap_or(-1),
        };
        let target = branch_target(self.instructions, instr)?.ok_or_else(not_found)?;
        self.labels.get(&target).copied().ok_or_else(not_found)
    }

    fn conditional(
        &self,
        frame: &mut Frame,
        i: usize,
        instr: &DecodedInstruction,
        op: CompareOp,
        comparand: Comparand,
    ) -> Result<()> {
        let right = match comparand {
            Comparand::Zero => "0".to_string(),
            Comparand::Null => "null".to_string(),
            Comparand::Popped => frame.pop(instr)?.parenthesized(),
        };
        let left = frame.pop(instr)?;
        let label = self.target_label(instr)?;

        let condition = if comparand == Comparand::Zero && left.type_name() == "boolean" {
            match op {
                CompareOp::Eq => format!("!{}", left.parenthesized()),
                CompareOp::Ne => left.text(),
                _ => {
                    return Err(DecompileError::UnsupportedUsage {
                        mnemonic: instr.mnemonic(),
                        offset: instr.offset,
                        message: format!("operator {} applied to a boolean", op.as_str()),
                    })
                }
            }
        } else {
            format!("{} {} {}", left.parenthesized(), op.as_str(), right)
        };
        frame.lines[i] = Some(format!("if({}) {{ goto {}; }}", condition, label));
        Ok(())
    }

    /// `dup` names a freshly allocated array so element stores can refer to it.
    fn dup(&self, frame: &mut Frame, code: &[DecodedInstruction], instr: &DecodedInstruction) -> Result<()> {
        let top = frame.pop(instr)?;
        let origin = top.origin();
        let allocation = matches!(code[origin].opcode(), NEWARRAY | ANEWARRAY | MULTIANEWARRAY);
        let top = if top.is_array() && allocation && frame.lines[origin].is_none() {
            let name = frame.next_object();
            frame.lines[origin] = Some(format!("{} {} = {};", top.type_name(), name, top.text()));
            StackValue::variable(origin, name, top.type_name())
        } else {
            top
        };
        frame.push(top.clone());
        frame.push(top);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn constructor_call(
        &self,
        frame: &mut Frame,
        code: &[DecodedInstruction],
        i: usize,
        instr: &DecodedInstruction,
        method: &MethodRef,
        receiver: &StackValue,
        args: String,
    ) -> Result<()> {
        let origin = receiver.origin();
        if let Some(declaration) = frame.lines[origin].take() {
            frame.lines[i] = Some(format!("{}({});", declaration, args));
        } else if code[origin].opcode() == ALOAD_0 {
            let keyword = if method.class_name == self.class_name {
                "this"
            } else {
                "super"
            };
            if keyword == "this" || !args.is_empty() {
                frame.lines[i] = Some(format!("{}({});", keyword, args));
            }
        } else {
            return Err(DecompileError::UnsupportedUsage {
                mnemonic: instr.mnemonic(),
                offset: instr.offset,
                message: "<init> invoked without a preceding new or aload_0".to_string(),
            });
        }
        Ok(())
    }
}

fn constant(origin: usize, value: Literal) -> StackValue {
    StackValue::Const { origin, value }
}

fn load(frame: &mut Frame, locals: &mut LocalVariables, i: usize, instr: &DecodedInstruction, slot: u16, ty: &str) {
    let var = locals.get_or_create(slot, ty, instr.offset);
    // Narrow int-sized declarations keep their type so booleans stay booleans.
    let ty = match var.ty.as_str() {
        "boolean" | "byte" | "char" | "short" if ty == "int" => var.ty.clone(),
        _ => ty.to_string(),
    };
    frame.push(StackValue::variable(i, var.name.clone(), ty));
}

fn load_reference(frame: &mut Frame, locals: &LocalVariables, i: usize, slot: u16) -> Result<()> {
    let var = locals.require(slot)?;
    frame.push(StackValue::variable(i, var.name.clone(), var.ty.clone()));
    Ok(())
}

fn store(
    frame: &mut Frame,
    locals: &mut LocalVariables,
    i: usize,
    instr: &DecodedInstruction,
    slot: u16,
    ty: Option<&str>,
) -> Result<()> {
    let value = frame.pop(instr)?;
    let ty = ty.unwrap_or_else(|| value.type_name()).to_string();
    let var = locals.get_or_create(slot, &ty, instr.offset + instr.encoded_len());
    let text = assigned_value(&var.ty, &value)?;
    frame.lines[i] = Some(format!("{} = {};", var.name, text));
    Ok(())
}

fn array_load(frame: &mut Frame, i: usize, instr: &DecodedInstruction, element: Option<&str>) -> Result<()> {
    let index = frame.pop(instr)?;
    let array = frame.pop(instr)?;
    let element = match element {
        Some(ty) => ty.to_string(),
        None => element_type_name(array.type_name())
            .ok_or_else(|| DecompileError::ExpectedArrayType {
                mnemonic: instr.mnemonic(),
                offset: instr.offset,
                found: array.type_name().to_string(),
            })?
            .to_string(),
    };
    let text = format!("{}[{}]", array.parenthesized(), index.text());
    frame.push(StackValue::code(i, text, element));
    Ok(())
}

fn binary(frame: &mut Frame, i: usize, instr: &DecodedInstruction, op: &str, ty: &str) -> Result<()> {
    let right = frame.pop(instr)?;
    let left = frame.pop(instr)?;
    let text = format!("{} {} {}", left.parenthesized(), op, right.parenthesized());
    frame.push(StackValue::code(i, text, ty));
    Ok(())
}

/// Pops one value per argument, last argument first.
fn pop_arguments(frame: &mut Frame, instr: &DecodedInstruction, arg_types: &[JvmType]) -> Result<String> {
    let mut args = Vec::with_capacity(arg_types.len());
    for ty in arg_types.iter().rev() {
        let value = frame.pop(instr)?;
        let ty = ty.display_name();
        let text = match boolean_literal(&ty, &value)? {
            Some(literal) => literal.to_string(),
            None => format!("({}) {}", ty, value.parenthesized()),
        };
        args.push(text);
    }
    args.reverse();
    Ok(args.join(", "))
}

fn finish_call(frame: &mut Frame, i: usize, method: &MethodRef, call: String) {
    if method.returns_void() {
        frame.lines[i] = Some(format!("{};", call));
    } else {
        frame.push(StackValue::code(i, call, method.return_type.display_name()));
    }
}

/// Prefixes each produced line with its method-wide instruction index when enabled.
pub fn render_lines(block: &Block, lines: &[Option<String>], options: &DecompileOptions) -> Vec<String> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(offset, line)| {
            line.as_ref().map(|code| {
                if options.instruction_comments {
                    format!("/*{:>3} */ {}", block.start + offset, code)
                } else {
                    code.clone()
                }
            })
        })
        .collect()
}
