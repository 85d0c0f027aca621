//! Named text colors understood by the dashboard.

use std::fmt;
use std::str::FromStr;

/// Console text color. Encoded on the wire as a CSS hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConsoleColor {
    Black,
    DarkBlue,
    DarkGreen,
    DarkCyan,
    DarkRed,
    DarkMagenta,
    DarkYellow,
    Gray,
    DarkGray,
    Blue,
    Green,
    Cyan,
    Red,
    Magenta,
    Yellow,
    White,
}

impl ConsoleColor {
    pub const ALL: [ConsoleColor; 16] = [
        ConsoleColor::Black,
        ConsoleColor::DarkBlue,
        ConsoleColor::DarkGreen,
        ConsoleColor::DarkCyan,
        ConsoleColor::DarkRed,
        ConsoleColor::DarkMagenta,
        ConsoleColor::DarkYellow,
        ConsoleColor::Gray,
        ConsoleColor::DarkGray,
        ConsoleColor::Blue,
        ConsoleColor::Green,
        ConsoleColor::Cyan,
        ConsoleColor::Red,
        ConsoleColor::Magenta,
        ConsoleColor::Yellow,
        ConsoleColor::White,
    ];

    /// The hex value written into the `c` field.
    pub fn as_hex(&self) -> &'static str {
        match self {
            ConsoleColor::Black => "#000000",
            ConsoleColor::DarkBlue => "#000080",
            ConsoleColor::DarkGreen => "#008000",
            ConsoleColor::DarkCyan => "#008080",
            ConsoleColor::DarkRed => "#800000",
            ConsoleColor::DarkMagenta => "#800080",
            ConsoleColor::DarkYellow => "#808000",
            ConsoleColor::Gray => "#c0c0c0",
            ConsoleColor::DarkGray => "#808080",
            ConsoleColor::Blue => "#0000ff",
            ConsoleColor::Green => "#00ff00",
            ConsoleColor::Cyan => "#00ffff",
            ConsoleColor::Red => "#ff0000",
            ConsoleColor::Magenta => "#ff00ff",
            ConsoleColor::Yellow => "#ffff00",
            ConsoleColor::White => "#ffffff",
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            ConsoleColor::Black => "black",
            ConsoleColor::DarkBlue => "darkblue",
            ConsoleColor::DarkGreen => "darkgreen",
            ConsoleColor::DarkCyan => "darkcyan",
            ConsoleColor::DarkRed => "darkred",
            ConsoleColor::DarkMagenta => "darkmagenta",
            ConsoleColor::DarkYellow => "darkyellow",
            ConsoleColor::Gray => "gray",
            ConsoleColor::DarkGray => "darkgray",
            ConsoleColor::Blue => "blue",
            ConsoleColor::Green => "green",
            ConsoleColor::Cyan => "cyan",
            ConsoleColor::Red => "red",
            ConsoleColor::Magenta => "magenta",
            ConsoleColor::Yellow => "yellow",
            ConsoleColor::White => "white",
        }
    }
}

impl fmt::Display for ConsoleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_hex())
    }
}

impl FromStr for ConsoleColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace(&['-', '_'][..], "");
        ConsoleColor::ALL
            .iter()
            .copied()
            .find(|c| c.name() == wanted || c.as_hex() == wanted)
            .ok_or_else(|| format!("unknown console color '{}'", s))
    }
}
