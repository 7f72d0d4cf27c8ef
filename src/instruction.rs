//! Decoding of 16-bit instruction words.
//!
//!  Var   Bits  Location                  Description
//!  x     4     high byte, low nibble     register
//!  y     4     low byte, high nibble     register
//!  n     4     low byte, low nibble      sprite height / sub-op
//!  nn    8     low byte                  immediate
//!  nnn   12    low 12 bits               address
use std::fmt;

/// A decoded instruction. Register operands are indices 0x0..=0xF.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    Cls,
    /// 00EE
    Ret,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(u8, u8),
    /// 4XNN
    SkipNeImm(u8, u8),
    /// 5XY0
    SkipEqReg(u8, u8),
    /// 6XNN
    LoadImm(u8, u8),
    /// 7XNN, no carry
    AddImm(u8, u8),
    /// 8XY0
    Assign(u8, u8),
    /// 8XY1
    Or(u8, u8),
    /// 8XY2
    And(u8, u8),
    /// 8XY3
    Xor(u8, u8),
    /// 8XY4, VF = carry
    Add(u8, u8),
    /// 8XY5, VX = VX - VY, VF = not borrow
    Sub(u8, u8),
    /// 8XY6, VX >>= 1, VF = bit shifted out
    ShiftRight(u8, u8),
    /// 8XY7, VX = VY - VX, VF = not borrow
    SubReverse(u8, u8),
    /// 8XYE, VX <<= 1, VF = bit shifted out
    ShiftLeft(u8, u8),
    /// 9XY0
    SkipNeReg(u8, u8),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpV0(u16),
    /// CXNN
    Random(u8, u8),
    /// DXYN
    Draw(u8, u8, u8),
    /// EX9E
    SkipKeyPressed(u8),
    /// EXA1
    SkipKeyReleased(u8),
    /// FX07
    ReadDelay(u8),
    /// FX0A
    WaitKey(u8),
    /// FX15
    SetDelay(u8),
    /// FX18
    SetSound(u8),
    /// FX1E
    AddIndex(u8),
    /// FX29
    FontGlyph(u8),
    /// FX33
    Bcd(u8),
    /// FX55
    StoreRegs(u8),
    /// FX65
    LoadRegs(u8),
    /// FX75
    SaveFlags(u8),
    /// FX85
    RestoreFlags(u8),
}

impl Instruction {
    /// Decode one word. `None` means the word is not an instruction.
    pub fn decode(opcode: u16) -> Option<Instruction> {
        use Instruction::*;

        let c = ((opcode & 0xf000) >> 12) as u8;
        let x = ((opcode & 0x0f00) >> 8) as u8;
        let y = ((opcode & 0x00f0) >> 4) as u8;
        let n = (opcode & 0x000f) as u8;
        let nn = (opcode & 0x00ff) as u8;
        let nnn = opcode & 0x0fff;

        let instruction = match (c, x, y, n) {
            (0x0, 0x0, 0xe, 0x0) => Cls,
            (0x0, 0x0, 0xe, 0xe) => Ret,
            (0x1, _, _, _) => Jump(nnn),
            (0x2, _, _, _) => Call(nnn),
            (0x3, _, _, _) => SkipEqImm(x, nn),
            (0x4, _, _, _) => SkipNeImm(x, nn),
            (0x5, _, _, 0x0) => SkipEqReg(x, y),
            (0x6, _, _, _) => LoadImm(x, nn),
            (0x7, _, _, _) => AddImm(x, nn),
            (0x8, _, _, 0x0) => Assign(x, y),
            (0x8, _, _, 0x1) => Or(x, y),
            (0x8, _, _, 0x2) => And(x, y),
            (0x8, _, _, 0x3) => Xor(x, y),
            (0x8, _, _, 0x4) => Add(x, y),
            (0x8, _, _, 0x5) => Sub(x, y),
            (0x8, _, _, 0x6) => ShiftRight(x, y),
            (0x8, _, _, 0x7) => SubReverse(x, y),
            (0x8, _, _, 0xe) => ShiftLeft(x, y),
            (0x9, _, _, 0x0) => SkipNeReg(x, y),
            (0xa, _, _, _) => LoadIndex(nnn),
            (0xb, _, _, _) => JumpV0(nnn),
            (0xc, _, _, _) => Random(x, nn),
            (0xd, _, _, _) => Draw(x, y, n),
            (0xe, _, 0x9, 0xe) => SkipKeyPressed(x),
            (0xe, _, 0xa, 0x1) => SkipKeyReleased(x),
            (0xf, _, _, _) => match nn {
                0x07 => ReadDelay(x),
                0x0a => WaitKey(x),
                0x15 => SetDelay(x),
                0x18 => SetSound(x),
                0x1e => AddIndex(x),
                0x29 => FontGlyph(x),
                0x33 => Bcd(x),
                0x55 => StoreRegs(x),
                0x65 => LoadRegs(x),
                0x75 => SaveFlags(x),
                0x85 => RestoreFlags(x),
                _ => return None,
            },
            _ => return None,
        };
        Some(instruction)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            Cls => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump(a) => write!(f, "JP 0x{:03x}", a),
            Call(a) => write!(f, "CALL 0x{:03x}", a),
            SkipEqImm(x, nn) => write!(f, "SE V{:X}, 0x{:02x}", x, nn),
            SkipNeImm(x, nn) => write!(f, "SNE V{:X}, 0x{:02x}", x, nn),
            SkipEqReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm(x, nn) => write!(f, "LD V{:X}, 0x{:02x}", x, nn),
            AddImm(x, nn) => write!(f, "ADD V{:X}, 0x{:02x}", x, nn),
            Assign(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            Add(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(x, _) => write!(f, "SHR V{:X}", x),
            SubReverse(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(x, _) => write!(f, "SHL V{:X}", x),
            SkipNeReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(a) => write!(f, "LD I, 0x{:03x}", a),
            JumpV0(a) => write!(f, "JP V0, 0x{:03x}", a),
            Random(x, nn) => write!(f, "RND V{:X}, 0x{:02x}", x, nn),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed(x) => write!(f, "SKP V{:X}", x),
            SkipKeyReleased(x) => write!(f, "SKNP V{:X}", x),
            ReadDelay(x) => write!(f, "LD V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelay(x) => write!(f, "LD DT, V{:X}", x),
            SetSound(x) => write!(f, "LD ST, V{:X}", x),
            AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            FontGlyph(x) => write!(f, "LD F, V{:X}", x),
            Bcd(x) => write!(f, "LD B, V{:X}", x),
            StoreRegs(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegs(x) => write!(f, "LD V{:X}, [I]", x),
            SaveFlags(x) => write!(f, "LD R, V{:X}", x),
            RestoreFlags(x) => write!(f, "LD V{:X}, R", x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Instruction::*;
    use super::*;

    #[test]
    fn test_decode_families() {
        let cases = [
            (0x00e0, Cls),
            (0x00ee, Ret),
            (0x1abc, Jump(0xabc)),
            (0x2def, Call(0xdef)),
            (0x3a42, SkipEqImm(0xa, 0x42)),
            (0x4a42, SkipNeImm(0xa, 0x42)),
            (0x5120, SkipEqReg(1, 2)),
            (0x6f01, LoadImm(0xf, 0x01)),
            (0x7fff, AddImm(0xf, 0xff)),
            (0x9120, SkipNeReg(1, 2)),
            (0xa123, LoadIndex(0x123)),
            (0xb123, JumpV0(0x123)),
            (0xc30f, Random(3, 0x0f)),
            (0xd125, Draw(1, 2, 5)),
            (0xe59e, SkipKeyPressed(5)),
            (0xe5a1, SkipKeyReleased(5)),
        ];
        for (op, expected) in cases {
            assert_eq!(Instruction::decode(op), Some(expected), "{:04x}", op);
        }
    }

    #[test]
    fn test_decode_alu() {
        let expected = [
            (0x0, Assign(4, 5)),
            (0x1, Or(4, 5)),
            (0x2, And(4, 5)),
            (0x3, Xor(4, 5)),
            (0x4, Add(4, 5)),
            (0x5, Sub(4, 5)),
            (0x6, ShiftRight(4, 5)),
            (0x7, SubReverse(4, 5)),
            (0xe, ShiftLeft(4, 5)),
        ];
        for (n, instruction) in expected {
            assert_eq!(Instruction::decode(0x8450 | n), Some(instruction));
        }
        for n in [0x8, 0x9, 0xa, 0xb, 0xc, 0xd, 0xf] {
            assert_eq!(Instruction::decode(0x8450 | n), None);
        }
    }

    #[test]
    fn test_decode_f_family() {
        let expected = [
            (0x07, ReadDelay(7)),
            (0x0a, WaitKey(7)),
            (0x15, SetDelay(7)),
            (0x18, SetSound(7)),
            (0x1e, AddIndex(7)),
            (0x29, FontGlyph(7)),
            (0x33, Bcd(7)),
            (0x55, StoreRegs(7)),
            (0x65, LoadRegs(7)),
            (0x75, SaveFlags(7)),
            (0x85, RestoreFlags(7)),
        ];
        for (nn, instruction) in expected {
            assert_eq!(Instruction::decode(0xf700 | nn), Some(instruction));
        }
    }

    #[test]
    fn test_flag_ops_decode_for_any_register() {
        // range checking X is the engine's job, not the decoder's
        assert_eq!(Instruction::decode(0xfc75), Some(SaveFlags(0xc)));
        assert_eq!(Instruction::decode(0xf885), Some(RestoreFlags(8)));
    }

    #[test]
    fn test_illegal_words() {
        for op in [0x0000, 0x00e1, 0x0123, 0x5121, 0x912f, 0xe19f, 0xe1a2, 0xf000, 0xf1ff, 0xffff] {
            assert_eq!(Instruction::decode(op), None, "{:04x}", op);
        }
    }

    #[test]
    fn test_display_mnemonics() {
        assert_eq!(Cls.to_string(), "CLS");
        assert_eq!(Draw(0, 1, 0xf).to_string(), "DRW V0, V1, 15");
        assert_eq!(JumpV0(0x2a0).to_string(), "JP V0, 0x2a0");
        assert_eq!(SaveFlags(7).to_string(), "LD R, V7");
    }
}
