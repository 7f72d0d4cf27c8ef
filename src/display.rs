use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;
pub const CHIP8_DISPLAY_BYTES: usize = CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT / 8;

/// Packed monochrome framebuffer, row-major. Pixel (x, y) is bit
/// `(64 * y + x) % 8` of byte `(64 * y + x) / 8`, least-significant bit first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; CHIP8_DISPLAY_BYTES],
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer {
            bytes: [0u8; CHIP8_DISPLAY_BYTES],
            dirty: false,
        }
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn locate(x: usize, y: usize) -> (usize, u8) {
        let index = CHIP8_DISPLAY_WIDTH * (y % CHIP8_DISPLAY_HEIGHT) + (x % CHIP8_DISPLAY_WIDTH);
        (index / 8, 1 << (index % 8))
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        let (byte, mask) = Self::locate(x, y);
        self.bytes[byte] & mask != 0
    }

    /// blank the screen; always counts as a change
    pub fn clear(&mut self) {
        self.bytes = [0u8; CHIP8_DISPLAY_BYTES];
        self.dirty = true;
    }

    /// XOR a sprite onto the screen at (x, y). Each row is one byte, most
    /// significant bit leftmost. Coordinates wrap at the screen edges.
    ///
    /// Returns true if any lit pixel got turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..8 {
                if row & (0x80 >> dx) == 0 {
                    continue;
                }
                let (byte, mask) = Self::locate(x as usize + dx, y as usize + dy);
                if self.bytes[byte] & mask != 0 {
                    collision = true;
                }
                self.bytes[byte] ^= mask;
                self.dirty = true;
            }
        }
        collision
    }

    pub fn as_bytes(&self) -> &[u8; CHIP8_DISPLAY_BYTES] {
        &self.bytes
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

/// Display is used by the host to draw things on the screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work.
pub trait Display {
    /// draw a packed framebuffer (see `FrameBuffer` for the bit layout)
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error>;

    /// how big the display data should be
    fn get_display_size_bytes(&mut self) -> usize;
}

// store useful metadata about the terminal
struct Resolution(usize, usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }
    fn byte_count(&self) -> usize {
        self.0 * self.1 * self.2 / 8
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// lit (bitplane 1) or unlit (bitplane 0) pixels as canvas coordinates
    fn bitplane_from_data<'a>(
        &self,
        data: &'a [u8],
        bitplane: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let bit = 1 & (data[count / 8] >> (count % 8));
                if bit == bitplane {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(x, y, 1),
        })
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            data.len(),
            self.resolution.byte_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        let unlit = self.resolution.bitplane_from_data(data, 0).collect::<Vec<_>>();
        let lit = self.resolution.bitplane_from_data(data, 1).collect::<Vec<_>>();
        let size = Rect::new(
            0,
            0,
            2 + self.resolution.0 as u16,
            2 + self.resolution.1 as u16,
        );
        let x_bounds = self.resolution.x_bounds();
        let y_bounds = self.resolution.y_bounds();

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(x_bounds)
                .y_bounds(y_bounds)
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &unlit,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &lit,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn get_display_size_bytes(&mut self) -> usize {
        self.resolution.byte_count()
    }
}

/// useful for testing the host loop: remembers what it was asked to draw
#[derive(Default)]
pub struct DummyDisplay {
    pub frames: Vec<Vec<u8>>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        self.frames.push(data.to_vec());
        Ok(())
    }
    fn get_display_size_bytes(&mut self) -> usize {
        CHIP8_DISPLAY_BYTES
    }
}
