//! # interpreter
//!
//! The whole machine lives in one `Chip8Interpreter` value: memory, the
//! register file, stack, timers, display, flags, key latch and RNG. The host
//! drives it from outside:
//!
//!  * `step` runs exactly one instruction
//!  * `tick` counts the timers down, nominally at 60Hz
//!  * `set_keys` replaces the 16-key mask
//!
//! and polls the dirty bits to find out when the display or the flags need
//! attention. Nothing in here knows about wall-clock time, so a run is fully
//! determined by the program, the seed, the initial flags and the sequence of
//! calls made.
//!
//! Addresses are 12 bits. PC, I and every memory access through them wrap
//! modulo 4096 instead of failing.
use crate::display::{FrameBuffer, CHIP8_DISPLAY_BYTES};
use crate::error::Error;
use crate::flags::{FlagStore, CHIP8_FLAG_COUNT};
use crate::input::KeyLatch;
use crate::instruction::Instruction;
use crate::memory::{Chip8MemoryMap, MemoryMap, CHIP8_ADDR_MASK, CHIP8_PROGRAM_ADDR};
use crate::rng;
use crate::stack::CallStack;
use crate::timer::Timers;
use log::{debug, trace};

/// What happens to PC once an instruction has been carried out.
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

#[derive(Clone, Debug)]
pub struct Chip8Interpreter {
    memory: Chip8MemoryMap,
    registers: [u8; 16],
    program_counter: u16,
    i: u16,
    stack: CallStack,
    timers: Timers,
    display: FrameBuffer,
    flags: FlagStore,
    keys: KeyLatch,
    random: rng::Random,
    draw_bytes: u32,
}

/// bytes needed for one interpreter
pub const fn context_size() -> usize {
    std::mem::size_of::<Chip8Interpreter>()
}

impl Chip8Interpreter {
    /// Build an interpreter with `program` loaded at 0x200. `initial_flags`
    /// is the packed flag store, flag 0 in the least significant byte.
    pub fn new(program: &[u8], seed: u64, initial_flags: u64) -> Result<Self, Error> {
        let mut memory = Chip8MemoryMap::new();
        memory.load_program(program)?;
        debug!(
            "loaded {} byte program, seed 0x{:016x}, flags 0x{:016x}",
            program.len(),
            seed,
            initial_flags
        );
        Ok(Chip8Interpreter {
            memory,
            registers: [0; 16],
            program_counter: CHIP8_PROGRAM_ADDR,
            i: 0,
            stack: CallStack::new(),
            timers: Timers::default(),
            display: FrameBuffer::new(),
            flags: FlagStore::from_packed(initial_flags),
            keys: KeyLatch::default(),
            random: rng::Random::new(seed),
            draw_bytes: 0,
        })
    }

    /// Re-initialise in place. On error the previous state is kept as is;
    /// don't carry on stepping it as though the new program had loaded.
    pub fn reset(&mut self, program: &[u8], seed: u64, initial_flags: u64) -> Result<(), Error> {
        *self = Chip8Interpreter::new(program, seed, initial_flags)?;
        Ok(())
    }

    /// Execute one instruction. While waiting for a key (FX0A) this does
    /// nothing. On error nothing is changed, PC included, so stepping again
    /// reports the same error.
    pub fn step(&mut self) -> Result<(), Error> {
        if self.keys.is_waiting() {
            return Ok(());
        }
        let pc = self.program_counter;
        let opcode = self.memory.get_word(pc);
        let instruction = match Instruction::decode(opcode) {
            Some(instruction) => instruction,
            None => {
                debug!("illegal opcode 0x{:04x} at 0x{:03x}", opcode, pc);
                return Err(Error::IllegalOpcode);
            }
        };
        trace!("0x{:03x}: {:04x} {}", pc, opcode, instruction);

        let flow = self.execute(instruction).map_err(|e| {
            debug!("{} executing 0x{:04x} at 0x{:03x}", e, opcode, pc);
            e
        })?;
        self.program_counter = match flow {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Jump(addr) => addr,
        } & CHIP8_ADDR_MASK;
        Ok(())
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Flow, Error> {
        use Instruction::*;

        let flow = match instruction {
            Cls => {
                self.display.clear();
                Flow::Next
            }
            Ret => Flow::Jump(self.stack.pop()?),
            Jump(addr) => Flow::Jump(addr),
            Call(addr) => {
                self.stack.push(self.program_counter.wrapping_add(2) & CHIP8_ADDR_MASK)?;
                Flow::Jump(addr)
            }
            SkipEqImm(x, nn) => self.skip_if(self.v(x) == nn),
            SkipNeImm(x, nn) => self.skip_if(self.v(x) != nn),
            SkipEqReg(x, y) => self.skip_if(self.v(x) == self.v(y)),
            SkipNeReg(x, y) => self.skip_if(self.v(x) != self.v(y)),
            LoadImm(x, nn) => {
                self.set_v(x, nn);
                Flow::Next
            }
            AddImm(x, nn) => {
                self.set_v(x, self.v(x).wrapping_add(nn));
                Flow::Next
            }
            Assign(x, y) => {
                self.set_v(x, self.v(y));
                Flow::Next
            }
            Or(x, y) => {
                self.set_v(x, self.v(x) | self.v(y));
                Flow::Next
            }
            And(x, y) => {
                self.set_v(x, self.v(x) & self.v(y));
                Flow::Next
            }
            Xor(x, y) => {
                self.set_v(x, self.v(x) ^ self.v(y));
                Flow::Next
            }
            Add(x, y) => {
                let (val, carry) = self.v(x).overflowing_add(self.v(y));
                self.set_v_with_flag(x, val, carry);
                Flow::Next
            }
            Sub(x, y) => {
                let (val, borrow) = self.v(x).overflowing_sub(self.v(y));
                self.set_v_with_flag(x, val, !borrow);
                Flow::Next
            }
            SubReverse(x, y) => {
                let (val, borrow) = self.v(y).overflowing_sub(self.v(x));
                self.set_v_with_flag(x, val, !borrow);
                Flow::Next
            }
            ShiftRight(x, _) => {
                let vx = self.v(x);
                self.set_v_with_flag(x, vx >> 1, vx & 0x01 != 0);
                Flow::Next
            }
            ShiftLeft(x, _) => {
                let vx = self.v(x);
                self.set_v_with_flag(x, vx << 1, vx & 0x80 != 0);
                Flow::Next
            }
            LoadIndex(addr) => {
                self.i = addr;
                Flow::Next
            }
            JumpV0(addr) => Flow::Jump(addr.wrapping_add(self.v(0) as u16)),
            Random(x, nn) => {
                let byte = self.random.next_byte();
                self.set_v(x, byte & nn);
                Flow::Next
            }
            Draw(x, y, n) => {
                let mut rows = [0u8; 16];
                let rows = &mut rows[..n as usize];
                self.memory.read(self.i, rows);
                let collision = self.display.draw_sprite(self.v(x), self.v(y), rows);
                self.set_v(0xf, collision as u8);
                self.draw_bytes = self.draw_bytes.saturating_add(n as u32);
                Flow::Next
            }
            SkipKeyPressed(x) => self.skip_if(self.keys.is_pressed(self.v(x))),
            SkipKeyReleased(x) => self.skip_if(!self.keys.is_pressed(self.v(x))),
            ReadDelay(x) => {
                self.set_v(x, self.timers.delay);
                Flow::Next
            }
            WaitKey(x) => {
                self.keys.wait_for_key(x);
                Flow::Next
            }
            SetDelay(x) => {
                self.timers.delay = self.v(x);
                Flow::Next
            }
            SetSound(x) => {
                self.timers.sound = self.v(x);
                Flow::Next
            }
            AddIndex(x) => {
                self.i = self.i.wrapping_add(self.v(x) as u16) & CHIP8_ADDR_MASK;
                Flow::Next
            }
            FontGlyph(x) => {
                self.i = Chip8MemoryMap::font_addr(self.v(x));
                Flow::Next
            }
            Bcd(x) => {
                let vx = self.v(x);
                self.memory.write(&[vx / 100, vx / 10 % 10, vx % 10], self.i);
                Flow::Next
            }
            StoreRegs(x) => {
                self.memory.write(&self.registers[..=x as usize], self.i);
                Flow::Next
            }
            LoadRegs(x) => {
                self.memory.read(self.i, &mut self.registers[..=x as usize]);
                Flow::Next
            }
            SaveFlags(x) => {
                self.flags.save(&self.registers[..=x as usize])?;
                Flow::Next
            }
            RestoreFlags(x) => {
                self.flags.restore(&mut self.registers[..=x as usize])?;
                Flow::Next
            }
        };
        Ok(flow)
    }

    fn v(&self, x: u8) -> u8 {
        self.registers[(x & 0x0f) as usize]
    }

    fn set_v(&mut self, x: u8, val: u8) {
        self.registers[(x & 0x0f) as usize] = val;
    }

    /// VF is written last, so it holds the flag even when X is F
    fn set_v_with_flag(&mut self, x: u8, val: u8, flag: bool) {
        self.set_v(x, val);
        self.set_v(0xf, flag as u8);
    }

    fn skip_if(&self, cond: bool) -> Flow {
        if cond {
            Flow::Skip
        } else {
            Flow::Next
        }
    }

    /// replace the key mask, bit N is key N; may end a key wait
    pub fn set_keys(&mut self, mask: u16) {
        if let Some((x, key)) = self.keys.set_keys(mask) {
            self.set_v(x, key);
        }
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.keys.is_waiting()
    }

    /// one 60Hz timer tick
    pub fn tick(&mut self) {
        self.timers.tick();
    }

    pub fn display_is_dirty(&self) -> bool {
        self.display.is_dirty()
    }

    pub fn clear_display_dirty(&mut self) {
        self.display.clear_dirty();
    }

    /// packed display, see `FrameBuffer` for the layout
    pub fn get_display(&self) -> &[u8; CHIP8_DISPLAY_BYTES] {
        self.display.as_bytes()
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.display.get_pixel(x, y)
    }

    pub fn flags_are_dirty(&self) -> bool {
        self.flags.is_dirty()
    }

    pub fn clear_flags_dirty(&mut self) {
        self.flags.clear_dirty();
    }

    /// packed flag store, same layout as `initial_flags` in `new`
    pub fn get_flags(&self) -> u64 {
        self.flags.packed()
    }

    pub fn get_flag_bytes(&self) -> &[u8; CHIP8_FLAG_COUNT] {
        self.flags.as_bytes()
    }

    /// the word at PC, i.e. what `step` will execute next (or just failed on)
    pub fn get_instruction(&self) -> u16 {
        self.memory.get_word(self.program_counter)
    }

    pub fn get_program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn get_register(&self, x: u8) -> u8 {
        self.v(x)
    }

    pub fn get_index(&self) -> u16 {
        self.i
    }

    pub fn get_delay_timer(&self) -> u8 {
        self.timers.delay
    }

    pub fn get_sound_timer(&self) -> u8 {
        self.timers.sound
    }

    /// true while the sound timer is running
    pub fn is_sounding(&self) -> bool {
        self.timers.is_sounding()
    }

    /// the key mask last passed to `set_keys`
    pub fn get_keys(&self) -> u16 {
        self.keys.mask()
    }

    pub fn get_stack_depth(&self) -> usize {
        self.stack.depth()
    }

    /// sprite bytes drawn since the last reset
    pub fn get_draw_bytes(&self) -> u32 {
        self.draw_bytes
    }

    pub fn reset_draw_bytes(&mut self) {
        self.draw_bytes = 0;
    }

    pub fn get_memory(&self) -> &Chip8MemoryMap {
        &self.memory
    }
}
