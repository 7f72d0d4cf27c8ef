use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use log::{debug, warn};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

/// every key held down
pub const ALL_KEYS: u16 = 0xffff;

/// The 16-key latch as the engine sees it, plus the FX0A wait sub-state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyLatch {
    mask: u16,
    waiting: Option<u8>,
}

impl KeyLatch {
    pub fn is_pressed(&self, key: u8) -> bool {
        self.mask & (1 << (key & 0x0f)) != 0
    }

    pub fn mask(&self) -> u16 {
        self.mask
    }

    /// block until the next press, then deliver it to register `x`
    pub fn wait_for_key(&mut self, x: u8) {
        debug!("waiting for key into V{:X}", x);
        self.waiting = Some(x);
    }

    pub fn is_waiting(&self) -> bool {
        self.waiting.is_some()
    }

    /// Overwrite the latch. If a wait is pending and some key went from
    /// released to pressed, the wait ends and `(register, key)` comes back;
    /// the lowest newly pressed key wins.
    pub fn set_keys(&mut self, mask: u16) -> Option<(u8, u8)> {
        let pressed = mask & !self.mask;
        self.mask = mask;
        match self.waiting {
            Some(x) if pressed != 0 => {
                let key = pressed.trailing_zeros() as u8;
                debug!("key {:X} released wait on V{:X}", key, x);
                self.waiting = None;
                Some((x, key))
            }
            _ => None,
        }
    }
}

/// ditto using left-hand side of qwerty keyboard
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00), // x
    ('1', 0x01), // 1
    ('2', 0x02), // 2
    ('3', 0x03), // 3
    ('q', 0x04), // q
    ('w', 0x05), // w
    ('e', 0x06), // e
    ('a', 0x07), // a
    ('s', 0x08), // s
    ('d', 0x09), // d
    ('z', 0x0a), // z
    ('c', 0x0b), // c
    ('4', 0x0c), // 4
    ('r', 0x0d), // r
    ('f', 0x0e), // f
    ('v', 0x0f), // v
];

/// Terminals only report presses, so a key counts as held for this many
/// polls after its last press event (auto-repeat keeps it topped up).
const KEY_HOLD_POLLS: u8 = 6;

/// reads keypresses
pub trait Input {
    /// the keys held right now, one bit per key, bit 0 is key 0
    fn poll_keys(&mut self) -> Result<u16, io::Error>;

    /// whether the user has asked to stop
    fn quit_requested(&self) -> bool;
}

/// Input from the terminal keyboard, using Crossterm in raw mode. Space holds
/// every key; Esc or Ctrl-C asks to quit.
pub struct TermInput {
    keymap: HashMap<char, u8>,
    held: [u8; 16],
    all_held: u8,
    quit: bool,
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            held: [0; 16],
            all_held: 0,
            quit: false,
        })
    }

    fn read_events(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char(' ') => self.all_held = KEY_HOLD_POLLS,
                    KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                        Some(mapped_key) => self.held[*mapped_key as usize] = KEY_HOLD_POLLS,
                        None => warn!("can't map {:?} to a CHIP-8 key", key),
                    },
                    KeyCode::Esc => self.quit = true,
                    _ => debug!("ignoring key event {:?}", evt),
                },
                other => debug!("ignoring terminal event {:?}", other),
            }
        }
        Ok(())
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll_keys(&mut self) -> Result<u16, io::Error> {
        for h in self.held.iter_mut() {
            *h = h.saturating_sub(1);
        }
        self.all_held = self.all_held.saturating_sub(1);
        self.read_events()?;
        if self.all_held > 0 {
            return Ok(ALL_KEYS);
        }
        Ok(held_mask(&self.held))
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

fn held_mask(held: &[u8; 16]) -> u16 {
    held.iter()
        .enumerate()
        .filter(|(_, h)| **h > 0)
        .fold(0, |mask, (key, _)| mask | 1 << key)
}

/// dummy Input implementation for testing: plays back a fixed sequence of
/// masks, then reports no keys
pub struct DummyInput {
    masks: VecDeque<u16>,
}

impl DummyInput {
    pub fn new(masks: &[u16]) -> Self {
        DummyInput {
            masks: masks.iter().copied().collect(),
        }
    }
}

impl Input for DummyInput {
    fn poll_keys(&mut self) -> Result<u16, io::Error> {
        Ok(self.masks.pop_front().unwrap_or(0))
    }

    fn quit_requested(&self) -> bool {
        false
    }
}
