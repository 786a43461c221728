//! Built-in color palettes.

use ratatui::style::Color;

/// An accent/background color pair, stored as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub id: u8,
    pub accent: &'static str,
    pub background: &'static str,
}

pub const PALETTES: [Palette; 6] = [
    Palette {
        id: 1,
        accent: "#e8a236",
        background: "#212121",
    },
    Palette {
        id: 2,
        accent: "#d596f7",
        background: "#370d8a",
    },
    Palette {
        id: 3,
        accent: "#baf2c5",
        background: "#5c1b68",
    },
    Palette {
        id: 4,
        accent: "#8bda59",
        background: "#1d4836",
    },
    Palette {
        id: 5,
        accent: "#e3a215",
        background: "#0d457c",
    },
    Palette {
        id: 6,
        accent: "#f0dc9b",
        background: "#7523ce",
    },
];

impl Default for Palette {
    fn default() -> Self {
        PALETTES[0]
    }
}

impl Palette {
    /// Palette with the given 1-based id.
    pub fn by_id(id: u8) -> Option<Palette> {
        PALETTES.iter().copied().find(|p| p.id == id)
    }

    /// The palette matching a stored color pair; anything else gets palette 1.
    pub fn matching(accent: Option<&str>, background: Option<&str>) -> Palette {
        let (Some(accent), Some(background)) = (accent, background) else {
            return Palette::default();
        };
        PALETTES
            .iter()
            .copied()
            .find(|p| {
                p.accent.eq_ignore_ascii_case(accent)
                    && p.background.eq_ignore_ascii_case(background)
            })
            .unwrap_or_default()
    }

    pub fn accent_color(&self) -> Color {
        parse_hex(self.accent).unwrap_or(Color::Yellow)
    }

    pub fn background_color(&self) -> Color {
        parse_hex(self.background).unwrap_or(Color::Reset)
    }
}

/// Parse `#rrggbb` into an RGB color.
pub fn parse_hex(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_pair_selects_its_palette_case_insensitively() {
        let p = Palette::matching(Some("#D596F7"), Some("#370D8A"));
        assert_eq!(p.id, 2);
    }

    #[test]
    fn unknown_or_partial_pair_falls_back_to_first_palette() {
        assert_eq!(Palette::matching(Some("#000000"), Some("#212121")).id, 1);
        assert_eq!(Palette::matching(Some("#d596f7"), None).id, 1);
        assert_eq!(Palette::matching(None, None).id, 1);
    }

    #[test]
    fn parse_hex_accepts_only_rrggbb() {
        assert_eq!(parse_hex("#e8a236"), Some(Color::Rgb(0xe8, 0xa2, 0x36)));
        assert_eq!(parse_hex("e8a236"), None);
        assert_eq!(parse_hex("#e8a23"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn palette_ids_are_one_based_and_contiguous() {
        for (i, p) in PALETTES.iter().enumerate() {
            assert_eq!(Palette::by_id(i as u8 + 1), Some(*p));
        }
        assert_eq!(Palette::by_id(0), None);
        assert_eq!(Palette::by_id(7), None);
    }
}
