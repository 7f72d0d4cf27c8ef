use crate::error::Error;

pub const CHIP8_FLAG_COUNT: usize = 8;

/// The SUPER-CHIP style "RPL" flags: eight bytes that outlive a run if the
/// host saves them. Packed into a `u64` little-endian, so flag `i` is bits
/// `8 * i .. 8 * i + 8` both when loading and when reading back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlagStore {
    bytes: [u8; CHIP8_FLAG_COUNT],
    dirty: bool,
}

impl FlagStore {
    /// pre-load from a packed value; not dirty, the host already has it
    pub fn from_packed(packed: u64) -> Self {
        FlagStore {
            bytes: packed.to_le_bytes(),
            dirty: false,
        }
    }

    pub fn packed(&self) -> u64 {
        u64::from_le_bytes(self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8; CHIP8_FLAG_COUNT] {
        &self.bytes
    }

    /// copy `registers` into the first flags (FX75)
    pub fn save(&mut self, registers: &[u8]) -> Result<(), Error> {
        let dst = self
            .bytes
            .get_mut(..registers.len())
            .ok_or(Error::FlagOverflow)?;
        dst.copy_from_slice(registers);
        self.dirty = true;
        Ok(())
    }

    /// copy the first flags into `registers` (FX85)
    pub fn restore(&self, registers: &mut [u8]) -> Result<(), Error> {
        let src = self
            .bytes
            .get(..registers.len())
            .ok_or(Error::FlagOverflow)?;
        registers.copy_from_slice(src);
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packing_little_endian() {
        let f = FlagStore::from_packed(0x0807_0605_0403_0201);
        assert_eq!(f.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(f.packed(), 0x0807_0605_0403_0201);
        assert!(!f.is_dirty());
    }

    #[test]
    fn test_save_partial() -> Result<(), Error> {
        let mut f = FlagStore::from_packed(u64::MAX);
        f.save(&[0x10, 0x20])?;
        assert_eq!(f.as_bytes(), &[0x10, 0x20, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
        assert!(f.is_dirty());
        f.clear_dirty();
        assert!(!f.is_dirty());
        Ok(())
    }

    #[test]
    fn test_restore() -> Result<(), Error> {
        let f = FlagStore::from_packed(0x0807_0605_0403_0201);
        let mut regs = [0u8; 3];
        f.restore(&mut regs)?;
        assert_eq!(regs, [1, 2, 3]);
        Ok(())
    }

    #[test]
    fn test_overflow_is_rejected() {
        let mut f = FlagStore::from_packed(0);
        assert_eq!(f.save(&[1; 9]), Err(Error::FlagOverflow));
        assert_eq!(f.packed(), 0);
        assert!(!f.is_dirty());
        let mut regs = [0xaa; 9];
        assert_eq!(f.restore(&mut regs), Err(Error::FlagOverflow));
        assert_eq!(regs, [0xaa; 9]);
    }
}
