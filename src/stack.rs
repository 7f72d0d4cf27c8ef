use crate::error::Error;

/// how many return addresses fit on the stack
pub const CHIP8_STACK_DEPTH: usize = 16;

/// Fixed-depth call stack of 12-bit return addresses. A failed push or pop
/// leaves the stack exactly as it was.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallStack {
    frames: [u16; CHIP8_STACK_DEPTH],
    pointer: usize,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, addr: u16) -> Result<(), Error> {
        if self.pointer == CHIP8_STACK_DEPTH {
            return Err(Error::StackOverflow);
        }
        self.frames[self.pointer] = addr;
        self.pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16, Error> {
        if self.pointer == 0 {
            return Err(Error::BadReturn);
        }
        self.pointer -= 1;
        Ok(self.frames[self.pointer])
    }

    /// number of saved return addresses
    pub fn depth(&self) -> usize {
        self.pointer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_order() -> Result<(), Error> {
        let mut s = CallStack::new();
        s.push(0x202)?;
        s.push(0x304)?;
        assert_eq!(s.depth(), 2);
        assert_eq!(s.pop()?, 0x304);
        assert_eq!(s.pop()?, 0x202);
        assert_eq!(s.depth(), 0);
        Ok(())
    }

    #[test]
    fn test_overflow_leaves_stack_alone() -> Result<(), Error> {
        let mut s = CallStack::new();
        for i in 0..CHIP8_STACK_DEPTH as u16 {
            s.push(0x200 + 2 * i)?;
        }
        let before = s.clone();
        assert_eq!(s.push(0x400), Err(Error::StackOverflow));
        assert_eq!(s, before);
        assert_eq!(s.pop()?, 0x21e);
        Ok(())
    }

    #[test]
    fn test_pop_empty() {
        let mut s = CallStack::new();
        assert_eq!(s.pop(), Err(Error::BadReturn));
        assert_eq!(s.depth(), 0);
    }
}
