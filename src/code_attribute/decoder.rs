use std::io::Cursor;

use binrw::{binrw, BinRead};

use super::opcodes::{LOOKUPSWITCH, TABLESWITCH, WIDE};
use super::types::{lookup, Instruction, Payload};
use crate::decompile::{DecompileError, Result};

/// One instruction occurrence inside a method body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Byte offset in the code array.
    pub offset: usize,
    /// Ordinal position in the method, starting at 0.
    pub index: usize,
    pub instruction: &'static Instruction,
    /// Payload bytes as they appear after the opcode.
    pub raw_args: Vec<u8>,
    pub signed_args: Vec<i32>,
    pub unsigned_args: Vec<u32>,
}

/// The table following a `lookupswitch` opcode, after its alignment padding.
#[derive(Clone, Debug, PartialEq, Eq)]
#[binrw]
#[brw(big)]
pub struct LookupSwitchTable {
    pub default: i32,
    pub npairs: u32,
    #[br(count = npairs)]
    pub pairs: Vec<(i32, i32)>,
}

impl DecodedInstruction {
    pub fn opcode(&self) -> u8 {
        self.instruction.opcode
    }

    pub fn mnemonic(&self) -> &'static str {
        self.instruction.mnemonic
    }

    /// Total encoded size, opcode included.
    pub fn encoded_len(&self) -> usize {
        1 + self.raw_args.len()
    }

    /// Relative jump of a branch instruction.
    pub fn branch_offset(&self) -> Option<i32> {
        if self.instruction.is_branch() {
            self.signed_args.first().copied()
        } else {
            None
        }
    }

    /// Absolute byte offset a branch jumps to. May lie outside the method.
    pub fn branch_target_offset(&self) -> Option<i64> {
        self.branch_offset()
            .map(|relative| self.offset as i64 + relative as i64)
    }

    /// First unsigned argument, for pool and local indices.
    pub fn arg_u16(&self) -> u16 {
        self.unsigned_args.first().copied().unwrap_or(0) as u16
    }

    pub fn arg_i32(&self, position: usize) -> i32 {
        self.signed_args.get(position).copied().unwrap_or(0)
    }

    /// Opcode followed by the raw payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.push(self.instruction.opcode);
        bytes.extend_from_slice(&self.raw_args);
        bytes
    }

    pub fn lookup_switch(&self) -> Result<LookupSwitchTable> {
        let padding = lookupswitch_padding(self.offset);
        let table = self.raw_args.get(padding..).unwrap_or(&[]);
        LookupSwitchTable::read(&mut Cursor::new(table)).map_err(|_| DecompileError::TruncatedInstruction {
            mnemonic: self.mnemonic(),
            offset: self.offset,
        })
    }
}

/// Bytes between a `lookupswitch` opcode at `offset` and its 4-byte aligned table.
pub fn lookupswitch_padding(offset: usize) -> usize {
    3 - (offset % 4)
}

/// Splits a method's code bytes into instructions.
pub fn decode(code: &[u8]) -> Result<Vec<DecodedInstruction>> {
    let mut decoded = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        let opcode = code[offset];
        let instruction = lookup(opcode).ok_or(DecompileError::UnknownOpcode { opcode, offset })?;
        let truncated = || DecompileError::TruncatedInstruction {
            mnemonic: instruction.mnemonic,
            offset,
        };

        let payload_len = match instruction.payload {
            Payload::Fixed(_) => instruction.payload_len().unwrap_or(0),
            Payload::Variable if opcode == LOOKUPSWITCH => {
                let padding = lookupswitch_padding(offset);
                let npairs_at = offset + 1 + padding + 4;
                let npairs = code
                    .get(npairs_at..npairs_at + 4)
                    .map(|b| i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
                    .ok_or_else(truncated)?;
                let npairs = usize::try_from(npairs).map_err(|_| truncated())?;
                npairs
                    .checked_mul(8)
                    .and_then(|pairs| pairs.checked_add(padding + 8))
                    .ok_or_else(truncated)?
            }
            Payload::Variable => {
                debug_assert!(opcode == TABLESWITCH || opcode == WIDE);
                return Err(DecompileError::UnsupportedInstruction {
                    mnemonic: instruction.mnemonic,
                    offset,
                });
            }
        };

        let args_end = (offset + 1).checked_add(payload_len).ok_or_else(truncated)?;
        let raw_args = code.get(offset + 1..args_end).ok_or_else(truncated)?.to_vec();

        let mut signed_args = Vec::new();
        let mut unsigned_args = Vec::new();
        let mut pos = 0;
        for kind in instruction.payload_kinds() {
            let width = kind.size();
            let unsigned = raw_args[pos..pos + width]
                .iter()
                .fold(0u32, |acc, b| (acc << 8) | *b as u32);
            let shift = 32 - 8 * width as u32;
            let signed = ((unsigned << shift) as i32) >> shift;
            signed_args.push(if kind.is_index() { unsigned as i32 } else { signed });
            unsigned_args.push(unsigned);
            pos += width;
        }

        decoded.push(DecodedInstruction {
            offset,
            index: decoded.len(),
            instruction,
            raw_args,
            signed_args,
            unsigned_args,
        });
        offset = args_end;
    }
    Ok(decoded)
}
