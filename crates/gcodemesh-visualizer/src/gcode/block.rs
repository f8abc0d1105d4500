//! Motion blocks as delivered by a G-code interpreter

use gcodemesh_core::MachineStatusSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default arc turn count when no P word is present
pub const DEFAULT_TURN_COUNT: f64 = 1.0;

/// Optional numeric words present on the current command, keyed by letter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldMap {
    fields: BTreeMap<char, f64>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a word; letters are stored upper case
    pub fn insert(&mut self, letter: char, value: f64) {
        self.fields.insert(letter.to_ascii_uppercase(), value);
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        self.fields.get(&letter.to_ascii_uppercase()).copied()
    }

    pub fn contains(&self, letter: char) -> bool {
        self.fields.contains_key(&letter.to_ascii_uppercase())
    }

    /// Arc center X offset from the arc start
    pub fn i(&self) -> Option<f64> {
        self.get('I')
    }

    /// Arc center Y offset from the arc start
    pub fn j(&self) -> Option<f64> {
        self.get('J')
    }

    /// Arc turn count, 1.0 when absent
    pub fn p(&self) -> f64 {
        self.get('P').unwrap_or(DEFAULT_TURN_COUNT)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(char, f64)> for FieldMap {
    fn from_iter<T: IntoIterator<Item = (char, f64)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (letter, value) in iter {
            map.insert(letter, value);
        }
        map
    }
}

/// One committed block: its words plus the machine status at block end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotionBlock {
    pub fields: FieldMap,
    pub status: MachineStatusSnapshot,
}

impl MotionBlock {
    /// Block without any extra words (linear moves)
    pub fn new(status: MachineStatusSnapshot) -> Self {
        Self {
            fields: FieldMap::new(),
            status,
        }
    }

    /// Arc block with center offsets `i`, `j`
    pub fn arc(status: MachineStatusSnapshot, i: f64, j: f64) -> Self {
        Self::new(status).with_field('I', i).with_field('J', j)
    }

    pub fn with_field(mut self, letter: char, value: f64) -> Self {
        self.fields.insert(letter, value);
        self
    }

    /// Arc turn count (P word)
    pub fn with_turns(self, turns: f64) -> Self {
        self.with_field('P', turns)
    }
}
