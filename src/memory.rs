use crate::error::Error;

// NB. addresses are u16 as per the chip-8; lengths are usize to stop endless casting

/// Represents the address space. Every address is taken modulo the size of
/// memory, so reads and writes near the top wrap round to 0x000.
pub trait MemoryMap {
    /// read one byte
    fn read_byte(&self, addr: u16) -> u8;

    /// write one byte
    fn write_byte(&mut self, addr: u16, value: u8);

    /// write a chunk of bytes, wrapping at the top of memory
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// read a chunk of bytes, wrapping at the top of memory
    fn read(&self, addr: u16, out: &mut [u8]) {
        for (offset, byte) in out.iter_mut().enumerate() {
            *byte = self.read_byte(addr.wrapping_add(offset as u16));
        }
    }

    /// get a big-endian two-byte word (instructions)
    fn get_word(&self, addr: u16) -> u16 {
        ((self.read_byte(addr) as u16) << 8) | (self.read_byte(addr.wrapping_add(1)) as u16)
    }
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// mask for the 12-bit address space
pub const CHIP8_ADDR_MASK: u16 = 0x0fff;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// largest program that fits between the load address and the top of RAM
pub const CHIP8_MAX_PROGRAM_LEN: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

/// where the built-in font lives; 5 bytes per glyph
pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 standard memory map
///   0x0000-0x01ff  interpreter (font at 0x0050)
///   0x0200-0x0fff  program
///
/// the stack, registers and display live outside of addressable memory
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chip8MemoryMap {
    bytes: [u8; CHIP8_RAM_SIZE_BYTES],
}

impl MemoryMap for Chip8MemoryMap {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[(addr & CHIP8_ADDR_MASK) as usize] = value;
    }
}

impl Default for Chip8MemoryMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8MemoryMap {
    /// zeroed memory with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8MemoryMap {
            bytes: [0u8; CHIP8_RAM_SIZE_BYTES],
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// load a CHIP-8 program at 0x200
    ///
    /// nothing is written if the program doesn't fit
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > CHIP8_MAX_PROGRAM_LEN {
            return Err(Error::ProgramTooLong);
        }
        let start = CHIP8_PROGRAM_ADDR as usize;
        self.bytes[start..start + program.len()].copy_from_slice(program);
        Ok(())
    }

    /// address of the glyph for the low nibble of `digit`
    pub fn font_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + CHIP8_FONT_GLYPH_BYTES * (digit & 0x0f) as u16
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_zeroed() {
        let m = Chip8MemoryMap::new();
        // NB. memory is zeroed from 0x200 because before that we bake in the font
        assert_eq!(m.bytes[0x200..], [0; 0xe00]);
    }

    #[test]
    fn test_font_baked_in() {
        let m = Chip8MemoryMap::new();
        let mut glyph = [0u8; 5];
        m.read(Chip8MemoryMap::font_addr(0xa), &mut glyph);
        assert_eq!(glyph, [0xF0, 0x90, 0xF0, 0x90, 0x90]);
    }

    #[test]
    fn test_font_addr_uses_low_nibble() {
        assert_eq!(Chip8MemoryMap::font_addr(0x00), 0x050);
        assert_eq!(Chip8MemoryMap::font_addr(0x01), 0x055);
        assert_eq!(Chip8MemoryMap::font_addr(0x1f), 0x09b);
    }

    #[test]
    fn test_write_slice_ok() {
        let mut dst = Chip8MemoryMap::new();
        dst.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x308);
        assert_eq!(
            dst.bytes[0x300..0x310],
            [0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 5, 6, 7]
        );
    }

    #[test]
    fn test_read_word() {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0, 1, 2, 3, 4, 5, 6, 7], 0x300);
        assert_eq!(m.get_word(0x304), 0x0405);
    }

    #[test]
    fn test_write_wraps_at_top() {
        let mut m = Chip8MemoryMap::new();
        m.write(&[0xaa, 0xbb, 0xcc], 0x0ffe);
        assert_eq!(m.read_byte(0x0ffe), 0xaa);
        assert_eq!(m.read_byte(0x0fff), 0xbb);
        assert_eq!(m.read_byte(0x0000), 0xcc);
    }

    #[test]
    fn test_word_wraps_at_top() {
        let mut m = Chip8MemoryMap::new();
        m.write_byte(0x0fff, 0x12);
        m.write_byte(0x0000, 0x34);
        assert_eq!(m.get_word(0x0fff), 0x1234);
    }

    #[test]
    fn test_addresses_above_12_bits_alias() {
        let mut m = Chip8MemoryMap::new();
        m.write_byte(0x1300, 0x42);
        assert_eq!(m.read_byte(0x0300), 0x42);
    }

    #[test]
    fn test_program_load_ok() -> Result<(), Error> {
        let mut dst = Chip8MemoryMap::new();
        dst.load_program(&[0x00, 0xe0])?; // clear screen
        assert_eq!(dst.get_word(0x200), 0x00e0);
        Ok(())
    }

    #[test]
    fn test_program_fills_memory() -> Result<(), Error> {
        let mut dst = Chip8MemoryMap::new();
        dst.load_program(&[0x11; CHIP8_MAX_PROGRAM_LEN])?;
        assert_eq!(dst.read_byte(0x0fff), 0x11);
        Ok(())
    }

    #[test]
    fn test_program_too_long() {
        let mut dst = Chip8MemoryMap::new();
        let prog = vec![0x11; CHIP8_MAX_PROGRAM_LEN + 1];
        assert_eq!(dst.load_program(&prog), Err(Error::ProgramTooLong));
        // font survives and nothing was loaded
        assert_eq!(dst, Chip8MemoryMap::new());
    }
}
