pub mod cfg;
pub mod cfg_types;
pub mod class_decompiler;
pub mod descriptor;
pub mod expr;
pub mod locals;
pub mod loops;
pub mod method;
pub mod refs;
pub mod stack_sim;
pub mod structuring;

mod error;

pub use self::class_decompiler::{decompile_class, Decompiler};
pub use self::error::DecompileError;
pub use self::method::{decompile_code, decompile_method, MethodSignature};

pub type Result<T> = std::result::Result<T, DecompileError>;

/// Knobs for method and class decompilation.
#[derive(Clone, Debug)]
pub struct DecompileOptions {
    /// Indent unit for each nesting level of a method body.
    pub indent: String,
    /// Prefix every line with the index of the instruction it came from.
    pub instruction_comments: bool,
    /// Retry an instruction with a placeholder operand when the stack runs dry.
    pub recover_stack_underflow: bool,
    pub use_local_variable_table: bool,
    /// Class level only: render a failing method as a comment and keep going.
    pub skip_failed_methods: bool,
}

impl Default for DecompileOptions {
    fn default() -> Self {
        DecompileOptions {
            indent: "\t".to_string(),
            instruction_comments: true,
            recover_stack_underflow: true,
            use_local_variable_table: true,
            skip_failed_methods: true,
        }
    }
}
