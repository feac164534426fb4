use thiserror::Error;

/// Everything that can stop a method from being decompiled.
#[derive(Debug, Error)]
pub enum DecompileError {
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: usize },

    #[error("unsupported instruction {mnemonic} at offset {offset}")]
    UnsupportedInstruction { mnemonic: &'static str, offset: usize },

    #[error("unsupported use of {mnemonic} at offset {offset}: {message}")]
    UnsupportedUsage {
        mnemonic: &'static str,
        offset: usize,
        message: String,
    },

    #[error("instruction {mnemonic} at offset {offset} runs past the end of the code")]
    TruncatedInstruction { mnemonic: &'static str, offset: usize },

    #[error("constant pool entry {index} is a {found}, expected {expected}")]
    BadConstantPoolReference {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },

    #[error("constant pool index {index} out of range (pool has {len} entries)")]
    ConstantPoolIndexOutOfRange { index: u16, len: usize },

    #[error("malformed descriptor {descriptor:?}")]
    MalformedDescriptor { descriptor: String },

    #[error("local variable {slot} used before it was assigned")]
    LocalVariableNotFound { slot: u16 },

    #[error("branch at instruction {index} targets offset {target}, which starts no instruction")]
    BranchTargetNotFound { index: usize, target: i64 },

    #[error("unreachable code after instruction {index}")]
    UnreachableCode { index: usize },

    #[error("exception handler at instruction {handler} is entered by {cause}")]
    InvalidHandlerEntry { handler: usize, cause: String },

    #[error("invalid exception table entry [{start_pc}, {end_pc}) -> {handler_pc}: {reason}")]
    InvalidExceptionTable {
        start_pc: u16,
        end_pc: u16,
        handler_pc: u16,
        reason: &'static str,
    },

    #[error("block ending at instruction {index} has no terminator")]
    MissingTerminator { index: usize },

    #[error("loop start {start} is branched to by more than one loop (end {end})")]
    DuplicateLoopStart { start: usize, end: usize },

    #[error("no break target for loop [{start}, {end}]")]
    LoopBreakTargetNotFound { start: usize, end: usize },

    #[error("branch at instruction {index} jumps into the middle of a loop condition at {target}")]
    AmbiguousLoopCondition { index: usize, target: usize },

    #[error("branch at instruction {index} to instruction {target} cannot be structured")]
    UnstructuredBranch { index: usize, target: usize },

    #[error("{mnemonic} at offset {offset} expects an array, found {found}")]
    ExpectedArrayType {
        mnemonic: &'static str,
        offset: usize,
        found: String,
    },

    #[error("integer constant {value} cannot be used as a boolean")]
    InvalidBooleanConstant { value: i32 },

    #[error("operand stack underflow at offset {offset}")]
    StackUnderflow { offset: usize },

    #[error("duplicate {name} attribute")]
    DuplicateAttribute { name: &'static str },

    #[error("missing {name} attribute")]
    MissingAttribute { name: &'static str },

    #[error("malformed {name} attribute")]
    MalformedAttribute {
        name: &'static str,
        #[source]
        source: binrw::Error,
    },

    #[error("method {name} not found")]
    MethodNotFound { name: String },

    #[error("failed to decompile method {method}")]
    Method {
        method: String,
        #[source]
        source: Box<DecompileError>,
    },
}

impl DecompileError {
    /// The innermost error, unwrapping method context.
    pub fn root(&self) -> &DecompileError {
        match self {
            DecompileError::Method { source, .. } => source.root(),
            other => other,
        }
    }
}
