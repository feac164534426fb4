use super::opcodes::*;

/// How one operand of an instruction is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    Byte,
    Short,
    Int,
    ConstPoolIndexByte,
    ConstPoolIndexShort,
    VariableIndexByte,
}

impl PayloadKind {
    pub fn size(self) -> usize {
        match self {
            PayloadKind::Byte | PayloadKind::ConstPoolIndexByte | PayloadKind::VariableIndexByte => 1,
            PayloadKind::Short | PayloadKind::ConstPoolIndexShort => 2,
            PayloadKind::Int => 4,
        }
    }

    /// Pool and local variable indices are never sign-extended.
    pub fn is_index(self) -> bool {
        matches!(
            self,
            PayloadKind::ConstPoolIndexByte | PayloadKind::ConstPoolIndexShort | PayloadKind::VariableIndexByte
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Payload {
    Fixed(&'static [PayloadKind]),
    /// `tableswitch`, `lookupswitch` and `wide`.
    Variable,
}

/// Static description of one opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub mnemonic: &'static str,
    pub payload: Payload,
}

impl Instruction {
    /// Payload length in bytes, `None` when it depends on the instruction's position.
    pub fn payload_len(&self) -> Option<usize> {
        match self.payload {
            Payload::Fixed(kinds) => Some(kinds.iter().map(|k| k.size()).sum()),
            Payload::Variable => None,
        }
    }

    pub fn payload_kinds(&self) -> &'static [PayloadKind] {
        match self.payload {
            Payload::Fixed(kinds) => kinds,
            Payload::Variable => &[],
        }
    }

    pub fn is_branch(&self) -> bool {
        is_branch(self.opcode)
    }

    pub fn is_return(&self) -> bool {
        is_return(self.opcode)
    }

    pub fn is_unconditional_jump(&self) -> bool {
        is_unconditional_jump(self.opcode)
    }
}

/// All `if*` instructions, `goto`, `goto_w`, `jsr` and `jsr_w`.
pub fn is_branch(opcode: u8) -> bool {
    matches!(opcode, IFEQ..=JSR | IFNULL | IFNONNULL | GOTO_W | JSR_W)
}

/// All `*return` instructions.
pub fn is_return(opcode: u8) -> bool {
    matches!(opcode, IRETURN..=RETURN)
}

pub fn is_unconditional_jump(opcode: u8) -> bool {
    matches!(opcode, GOTO | GOTO_W)
}

/// Whether control never continues with the next instruction.
pub fn ends_flow(opcode: u8) -> bool {
    is_return(opcode) || is_unconditional_jump(opcode) || opcode == ATHROW
}

pub fn lookup(opcode: u8) -> Option<&'static Instruction> {
    INSTRUCTIONS
        .binary_search_by_key(&opcode, |i| i.opcode)
        .ok()
        .map(|i| &INSTRUCTIONS[i])
}

macro_rules! instruction {
    ($opcode:expr, $mnemonic:literal, variable) => {
        Instruction {
            opcode: $opcode,
            mnemonic: $mnemonic,
            payload: Payload::Variable,
        }
    };
    ($opcode:expr, $mnemonic:literal $(, $kind:ident)*) => {
        Instruction {
            opcode: $opcode,
            mnemonic: $mnemonic,
            payload: Payload::Fixed(&[$(PayloadKind::$kind),*]),
        }
    };
}

/// Every assigned opcode, sorted by value.
pub static INSTRUCTIONS: [Instruction; 205] = [
    instruction!(NOP, "nop"),
    instruction!(ACONST_NULL, "aconst_null"),
    instruction!(ICONST_M1, "iconst_m1"),
    instruction!(ICONST_0, "iconst_0"),
    instruction!(ICONST_1, "iconst_1"),
    instruction!(ICONST_2, "iconst_2"),
    instruction!(ICONST_3, "iconst_3"),
    instruction!(ICONST_4, "iconst_4"),
    instruction!(ICONST_5, "iconst_5"),
    instruction!(LCONST_0, "lconst_0"),
    instruction!(LCONST_1, "lconst_1"),
    instruction!(FCONST_0, "fconst_0"),
    instruction!(FCONST_1, "fconst_1"),
    instruction!(FCONST_2, "fconst_2"),
    instruction!(DCONST_0, "dconst_0"),
    instruction!(DCONST_1, "dconst_1"),
    instruction!(BIPUSH, "bipush", Byte),
    instruction!(SIPUSH, "sipush", Short),
    instruction!(LDC, "ldc", ConstPoolIndexByte),
    instruction!(LDC_W, "ldc_w", ConstPoolIndexShort),
    instruction!(LDC2_W, "ldc2_w", ConstPoolIndexShort),
    instruction!(ILOAD, "iload", VariableIndexByte),
    instruction!(LLOAD, "lload", VariableIndexByte),
    instruction!(FLOAD, "fload", VariableIndexByte),
    instruction!(DLOAD, "dload", VariableIndexByte),
    instruction!(ALOAD, "aload", VariableIndexByte),
    instruction!(ILOAD_0, "iload_0"),
    instruction!(ILOAD_1, "iload_1"),
    instruction!(ILOAD_2, "iload_2"),
    instruction!(ILOAD_3, "iload_3"),
    instruction!(LLOAD_0, "lload_0"),
    instruction!(LLOAD_1, "lload_1"),
    instruction!(LLOAD_2, "lload_2"),
    instruction!(LLOAD_3, "lload_3"),
    instruction!(FLOAD_0, "fload_0"),
    instruction!(FLOAD_1, "fload_1"),
    instruction!(FLOAD_2, "fload_2"),
    instruction!(FLOAD_3, "fload_3"),
    instruction!(DLOAD_0, "dload_0"),
    instruction!(DLOAD_1, "dload_1"),
    instruction!(DLOAD_2, "dload_2"),
    instruction!(DLOAD_3, "dload_3"),
    instruction!(ALOAD_0, "aload_0"),
    instruction!(ALOAD_1, "aload_1"),
    instruction!(ALOAD_2, "aload_2"),
    instruction!(ALOAD_3, "aload_3"),
    instruction!(IALOAD, "iaload"),
    instruction!(LALOAD, "laload"),
    instruction!(FALOAD, "faload"),
    instruction!(DALOAD, "daload"),
    instruction!(AALOAD, "aaload"),
    instruction!(BALOAD, "baload"),
    instruction!(CALOAD, "caload"),
    instruction!(SALOAD, "saload"),
    instruction!(ISTORE, "istore", Byte),
    instruction!(LSTORE, "lstore", Byte),
    instruction!(FSTORE, "fstore", Byte),
    instruction!(DSTORE, "dstore", Byte),
    instruction!(ASTORE, "astore", Byte),
    instruction!(ISTORE_0, "istore_0"),
    instruction!(ISTORE_1, "istore_1"),
    instruction!(ISTORE_2, "istore_2"),
    instruction!(ISTORE_3, "istore_3"),
    instruction!(LSTORE_0, "lstore_0"),
    instruction!(LSTORE_1, "lstore_1"),
    instruction!(LSTORE_2, "lstore_2"),
    instruction!(LSTORE_3, "lstore_3"),
    instruction!(FSTORE_0, "fstore_0"),
    instruction!(FSTORE_1, "fstore_1"),
    instruction!(FSTORE_2, "fstore_2"),
    instruction!(FSTORE_3, "fstore_3"),
    instruction!(DSTORE_0, "dstore_0"),
    instruction!(DSTORE_1, "dstore_1"),
    instruction!(DSTORE_2, "dstore_2"),
    instruction!(DSTORE_3, "dstore_3"),
    instruction!(ASTORE_0, "astore_0"),
    instruction!(ASTORE_1, "astore_1"),
    instruction!(ASTORE_2, "astore_2"),
    instruction!(ASTORE_3, "astore_3"),
    instruction!(IASTORE, "iastore"),
    instruction!(LASTORE, "lastore"),
    instruction!(FASTORE, "fastore"),
    instruction!(DASTORE, "dastore"),
    instruction!(AASTORE, "aastore"),
    instruction!(BASTORE, "bastore"),
    instruction!(CASTORE, "castore"),
    instruction!(SASTORE, "sastore"),
    instruction!(POP, "pop"),
    instruction!(POP2, "pop2"),
    instruction!(DUP, "dup"),
    instruction!(DUP_X1, "dup_x1"),
    instruction!(DUP_X2, "dup_x2"),
    instruction!(DUP2, "dup2"),
    instruction!(DUP2_X1, "dup2_x1"),
    instruction!(DUP2_X2, "dup2_x2"),
    instruction!(SWAP, "swap"),
    instruction!(IADD, "iadd"),
    instruction!(LADD, "ladd"),
    instruction!(FADD, "fadd"),
    instruction!(DADD, "dadd"),
    instruction!(ISUB, "isub"),
    instruction!(LSUB, "lsub"),
    instruction!(FSUB, "fsub"),
    instruction!(DSUB, "dsub"),
    instruction!(IMUL, "imul"),
    instruction!(LMUL, "lmul"),
    instruction!(FMUL, "fmul"),
    instruction!(DMUL, "dmul"),
    instruction!(IDIV, "idiv"),
    instruction!(LDIV, "ldiv"),
    instruction!(FDIV, "fdiv"),
    instruction!(DDIV, "ddiv"),
    instruction!(IREM, "irem"),
    instruction!(LREM, "lrem"),
    instruction!(FREM, "frem"),
    instruction!(DREM, "drem"),
    instruction!(INEG, "ineg"),
    instruction!(LNEG, "lneg"),
    instruction!(FNEG, "fneg"),
    instruction!(DNEG, "dneg"),
    instruction!(ISHL, "ishl"),
    instruction!(LSHL, "lshl"),
    instruction!(ISHR, "ishr"),
    instruction!(LSHR, "lshr"),
    instruction!(IUSHR, "iushr"),
    instruction!(LUSHR, "lushr"),
    instruction!(IAND, "iand"),
    instruction!(LAND, "land"),
    instruction!(IOR, "ior"),
    instruction!(LOR, "lor"),
    instruction!(IXOR, "ixor"),
    instruction!(LXOR, "lxor"),
    instruction!(IINC, "iinc", Byte, Byte),
    instruction!(I2L, "i2l"),
    instruction!(I2F, "i2f"),
    instruction!(I2D, "i2d"),
    instruction!(L2I, "l2i"),
    instruction!(L2F, "l2f"),
    instruction!(L2D, "l2d"),
    instruction!(F2I, "f2i"),
    instruction!(F2L, "f2l"),
    instruction!(F2D, "f2d"),
    instruction!(D2I, "d2i"),
    instruction!(D2L, "d2l"),
    instruction!(D2F, "d2f"),
    instruction!(I2B, "i2b"),
    instruction!(I2C, "i2c"),
    instruction!(I2S, "i2s"),
    instruction!(LCMP, "lcmp"),
    instruction!(FCMPL, "fcmpl"),
    instruction!(FCMPG, "fcmpg"),
    instruction!(DCMPL, "dcmpl"),
    instruction!(DCMPG, "dcmpg"),
    instruction!(IFEQ, "ifeq", Short),
    instruction!(IFNE, "ifne", Short),
    instruction!(IFLT, "iflt", Short),
    instruction!(IFGE, "ifge", Short),
    instruction!(IFGT, "ifgt", Short),
    instruction!(IFLE, "ifle", Short),
    instruction!(IF_ICMPEQ, "if_icmpeq", Short),
    instruction!(IF_ICMPNE, "if_icmpne", Short),
    instruction!(IF_ICMPLT, "if_icmplt", Short),
    instruction!(IF_ICMPGE, "if_icmpge", Short),
    instruction!(IF_ICMPGT, "if_icmpgt", Short),
    instruction!(IF_ICMPLE, "if_icmple", Short),
    instruction!(IF_ACMPEQ, "if_acmpeq", Short),
    instruction!(IF_ACMPNE, "if_acmpne", Short),
    instruction!(GOTO, "goto", Short),
    instruction!(JSR, "jsr", Short),
    instruction!(RET, "ret", VariableIndexByte),
    instruction!(TABLESWITCH, "tableswitch", variable),
    instruction!(LOOKUPSWITCH, "lookupswitch", variable),
    instruction!(IRETURN, "ireturn"),
    instruction!(LRETURN, "lreturn"),
    instruction!(FRETURN, "freturn"),
    instruction!(DRETURN, "dreturn"),
    instruction!(ARETURN, "areturn"),
    instruction!(RETURN, "return"),
    instruction!(GETSTATIC, "getstatic", ConstPoolIndexShort),
    instruction!(PUTSTATIC, "putstatic", ConstPoolIndexShort),
    instruction!(GETFIELD, "getfield", ConstPoolIndexShort),
    instruction!(PUTFIELD, "putfield", ConstPoolIndexShort),
    instruction!(INVOKEVIRTUAL, "invokevirtual", ConstPoolIndexShort),
    instruction!(INVOKESPECIAL, "invokespecial", ConstPoolIndexShort),
    instruction!(INVOKESTATIC, "invokestatic", ConstPoolIndexShort),
    instruction!(INVOKEINTERFACE, "invokeinterface", ConstPoolIndexShort, Byte, Byte),
    instruction!(INVOKEDYNAMIC, "invokedynamic", ConstPoolIndexShort, Byte, Byte),
    instruction!(NEW, "new", ConstPoolIndexShort),
    instruction!(NEWARRAY, "newarray", Byte),
    instruction!(ANEWARRAY, "anewarray", ConstPoolIndexShort),
    instruction!(ARRAYLENGTH, "arraylength"),
    instruction!(ATHROW, "athrow"),
    instruction!(CHECKCAST, "checkcast", ConstPoolIndexShort),
    instruction!(INSTANCEOF, "instanceof", ConstPoolIndexShort),
    instruction!(MONITORENTER, "monitorenter"),
    instruction!(MONITOREXIT, "monitorexit"),
    instruction!(WIDE, "wide", variable),
    instruction!(MULTIANEWARRAY, "multianewarray", ConstPoolIndexShort, Byte),
    instruction!(IFNULL, "ifnull", Short),
    instruction!(IFNONNULL, "ifnonnull", Short),
    instruction!(GOTO_W, "goto_w", Int),
    instruction!(JSR_W, "jsr_w", Int),
    instruction!(BREAKPOINT, "breakpoint"),
    instruction!(IMPDEP1, "impdep1"),
    instruction!(IMPDEP2, "impdep2"),];
