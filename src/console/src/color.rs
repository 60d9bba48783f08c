//! VGA colors and character cells.
//!
//! A hardware cell is a 16-bit value: the character in the low byte and the
//! attribute in the high byte (background nibble above foreground nibble).

/// Standard 16-color VGA palette for text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    /// Black.
    Black = 0,
    /// Blue.
    Blue = 1,
    /// Green.
    Green = 2,
    /// Cyan.
    Cyan = 3,
    /// Red.
    Red = 4,
    /// Magenta.
    Magenta = 5,
    /// Brown.
    Brown = 6,
    /// Light gray.
    LightGray = 7,
    /// Dark gray.
    DarkGray = 8,
    /// Light blue.
    LightBlue = 9,
    /// Light green.
    LightGreen = 10,
    /// Light cyan.
    LightCyan = 11,
    /// Light red.
    LightRed = 12,
    /// Pink.
    Pink = 13,
    /// Yellow.
    Yellow = 14,
    /// White.
    White = 15,
}

impl Color {
    const PALETTE: [Color; 16] = [
        Color::Black,
        Color::Blue,
        Color::Green,
        Color::Cyan,
        Color::Red,
        Color::Magenta,
        Color::Brown,
        Color::LightGray,
        Color::DarkGray,
        Color::LightBlue,
        Color::LightGreen,
        Color::LightCyan,
        Color::LightRed,
        Color::Pink,
        Color::Yellow,
        Color::White,
    ];

    /// Returns the color for the low four bits of `nibble`.
    pub const fn from_nibble(nibble: u8) -> Color {
        Self::PALETTE[(nibble & 0x0f) as usize]
    }

    /// Looks a color up by its lowercase name, e.g. `light_cyan`.
    pub fn from_name(name: &str) -> Option<Color> {
        let color = match name {
            "black" => Color::Black,
            "blue" => Color::Blue,
            "green" => Color::Green,
            "cyan" => Color::Cyan,
            "red" => Color::Red,
            "magenta" => Color::Magenta,
            "brown" => Color::Brown,
            "light_gray" => Color::LightGray,
            "dark_gray" => Color::DarkGray,
            "light_blue" => Color::LightBlue,
            "light_green" => Color::LightGreen,
            "light_cyan" => Color::LightCyan,
            "light_red" => Color::LightRed,
            "pink" => Color::Pink,
            "yellow" => Color::Yellow,
            "white" => Color::White,
            _ => return None,
        };
        Some(color)
    }
}

/// Foreground and background color of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Character color.
    pub fg: Color,
    /// Cell background.
    pub bg: Color,
}

impl Style {
    /// Light gray on black.
    pub const DEFAULT: Style = Style::new(Color::LightGray, Color::Black);

    /// Creates a style.
    pub const fn new(fg: Color, bg: Color) -> Style {
        Style { fg, bg }
    }

    /// Swaps foreground and background.
    pub const fn inverted(self) -> Style {
        Style {
            fg: self.bg,
            bg: self.fg,
        }
    }

    /// Packs the style into a VGA attribute byte.
    pub const fn attribute(self) -> u8 {
        (self.bg as u8) << 4 | (self.fg as u8)
    }

    /// Unpacks a VGA attribute byte.
    pub const fn from_attribute(attribute: u8) -> Style {
        Style {
            fg: Color::from_nibble(attribute),
            bg: Color::from_nibble(attribute >> 4),
        }
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::DEFAULT
    }
}

/// One character position on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// Code page 437 character.
    pub ch: u8,
    /// Colors.
    pub style: Style,
}

impl Cell {
    /// A space in the default style.
    pub const BLANK: Cell = Cell::blank(Style::DEFAULT);

    /// Creates a cell.
    pub const fn new(ch: u8, style: Style) -> Cell {
        Cell { ch, style }
    }

    /// A space in `style`.
    pub const fn blank(style: Style) -> Cell {
        Cell { ch: b' ', style }
    }

    /// Packs the cell into its 16-bit hardware form.
    pub const fn to_vga(self) -> u16 {
        (self.style.attribute() as u16) << 8 | self.ch as u16
    }

    /// Unpacks a 16-bit hardware cell.
    pub const fn from_vga(value: u16) -> Cell {
        Cell {
            ch: value as u8,
            style: Style::from_attribute((value >> 8) as u8),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::BLANK
    }
}

/// Marker drawn in the top-right corner while the view is scrolled back.
pub const SCROLL_INDICATOR: Cell = Cell::new(b'^', Style::new(Color::Yellow, Color::Black));
