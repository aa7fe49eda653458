//! Mana costs and pools
//!
//! The core never pays costs (that is the rules engine's job); it reads
//! costs to judge curve fit, castability and activation overhead.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Mana colors in MTG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "W"),
            Color::Blue => write!(f, "U"),
            Color::Black => write!(f, "B"),
            Color::Red => write!(f, "R"),
            Color::Green => write!(f, "G"),
            Color::Colorless => write!(f, "C"),
        }
    }
}

/// Represents a mana cost (e.g., "2RR" = 2 generic + 2 red)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaCost {
    pub generic: u8,
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaCost {
    pub fn new() -> Self {
        ManaCost::default()
    }

    /// Parse a mana cost in either compact ("2RR") or braced ("{2}{R}{R}")
    /// notation. Digit runs are summed as generic mana per run, so
    /// "{1}{1}" is 2 generic, not 11. Unknown symbols are skipped;
    /// matching is uppercase-only so prose never reads as pips.
    pub fn from_string(s: &str) -> Self {
        let mut cost = ManaCost::new();
        let mut run: u32 = 0;
        let mut in_run = false;

        let flush = |cost: &mut ManaCost, run: &mut u32, in_run: &mut bool| {
            if *in_run {
                cost.generic = cost.generic.saturating_add((*run).min(u8::MAX as u32) as u8);
                *run = 0;
                *in_run = false;
            }
        };

        for c in s.chars() {
            if let Some(digit) = c.to_digit(10) {
                run = run.saturating_mul(10).saturating_add(digit);
                in_run = true;
                continue;
            }
            flush(&mut cost, &mut run, &mut in_run);
            match c {
                'W' => cost.white += 1,
                'U' => cost.blue += 1,
                'B' => cost.black += 1,
                'R' => cost.red += 1,
                'G' => cost.green += 1,
                'C' => cost.colorless += 1,
                _ => {}
            }
        }
        flush(&mut cost, &mut run, &mut in_run);

        cost
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u8 {
        self.generic + self.colored_pips() + self.colorless
    }

    pub fn is_free(&self) -> bool {
        self.cmc() == 0
    }

    /// Number of colored symbols; a proxy for how color-demanding the
    /// cost is to cast on curve
    pub fn colored_pips(&self) -> u8 {
        self.white + self.blue + self.black + self.red + self.green
    }

    /// Colors this cost pins the card to
    pub fn colors(&self) -> SmallVec<[Color; 2]> {
        let mut colors = SmallVec::new();
        if self.white > 0 {
            colors.push(Color::White);
        }
        if self.blue > 0 {
            colors.push(Color::Blue);
        }
        if self.black > 0 {
            colors.push(Color::Black);
        }
        if self.red > 0 {
            colors.push(Color::Red);
        }
        if self.green > 0 {
            colors.push(Color::Green);
        }
        colors
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 {
            write!(f, "{}", self.generic)?;
        }
        for (symbol, count) in [
            ('W', self.white),
            ('U', self.blue),
            ('B', self.black),
            ('R', self.red),
            ('G', self.green),
            ('C', self.colorless),
        ] {
            for _ in 0..count {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}

/// Mana pool for a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManaPool {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaPool {
    pub fn new() -> Self {
        ManaPool::default()
    }

    pub fn add_color(&mut self, color: Color) {
        match color {
            Color::White => self.white += 1,
            Color::Blue => self.blue += 1,
            Color::Black => self.black += 1,
            Color::Red => self.red += 1,
            Color::Green => self.green += 1,
            Color::Colorless => self.colorless += 1,
        }
    }

    pub fn clear(&mut self) {
        *self = ManaPool::new();
    }

    /// Check if this pool could cover the given cost: every colored and
    /// colorless pip individually, and the total including generic
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        let pips_covered = self.white >= cost.white
            && self.blue >= cost.blue
            && self.black >= cost.black
            && self.red >= cost.red
            && self.green >= cost.green
            && self.colorless >= cost.colorless;
        pips_covered && self.total() >= cost.cmc()
    }

    /// Total mana in pool
    pub fn total(&self) -> u8 {
        self.white + self.blue + self.black + self.red + self.green + self.colorless
    }
}
