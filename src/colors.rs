use indexmap::IndexMap;
use serde::Serialize;

use crate::models::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Qualitative palette, drawn in order and reused cyclically past ten labels.
pub const PALETTE: [Color; 10] = [
    Color::rgb(0x63, 0x6E, 0xFA),
    Color::rgb(0xEF, 0x55, 0x3B),
    Color::rgb(0x00, 0xCC, 0x96),
    Color::rgb(0xAB, 0x63, 0xFA),
    Color::rgb(0xFF, 0xA1, 0x5A),
    Color::rgb(0x19, 0xD3, 0xF3),
    Color::rgb(0xFF, 0x66, 0x92),
    Color::rgb(0xB6, 0xE8, 0x80),
    Color::rgb(0xFF, 0x97, 0xFF),
    Color::rgb(0xFE, 0xCB, 0x52),
];

/// Label -> color, iterating in first-seen label order.
pub type ColorMap = IndexMap<String, Color>;

/// Duplicates collapse onto their first occurrence, which fixes the palette slot.
pub fn assign<'a, I>(labels: I) -> ColorMap
where
    I: IntoIterator<Item = &'a str>,
{
    let mut map = ColorMap::new();
    for label in labels {
        if !map.contains_key(label) {
            let color = PALETTE[map.len() % PALETTE.len()];
            map.insert(label.to_string(), color);
        }
    }
    map
}

pub fn assign_for_tasks(tasks: &[Task]) -> ColorMap {
    assign(tasks.iter().map(|t| t.resource.as_str()))
}
