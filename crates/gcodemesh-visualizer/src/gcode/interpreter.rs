//! Minimal line-oriented G-code feed
//!
//! Turns program text into the `start_block` / `end_block` / `end_program`
//! callback sequence of a [`MachineController`]. Only the words that
//! influence the toolpath shape are interpreted; feed, spindle and tool
//! words are accepted and ignored.

use super::block::{FieldMap, MotionBlock};
use super::controller::MachineController;
use gcodemesh_core::{
    AxisPosition, GcodeError, MachineStatusSnapshot, MotionMode, OriginOffset, Result, Units,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

const AXIS_LETTERS: [char; 4] = ['X', 'Y', 'Z', 'A'];
const ARC_LETTERS: [char; 3] = ['I', 'J', 'P'];
const IGNORED_LETTERS: [char; 5] = ['N', 'F', 'S', 'T', 'O'];

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    COMMENT_REGEX.get_or_init(|| Regex::new(r"\([^)]*\)|;.*").expect("invalid regex pattern"))
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX.get_or_init(|| {
        Regex::new(r"([A-Za-z])\s*([-+]?[0-9]*\.?[0-9]*)").expect("invalid regex pattern")
    })
}

/// One letter/value pair on a line
#[derive(Debug, Clone, Copy, PartialEq)]
struct Word {
    letter: char,
    value: f64,
}

/// Modal state carried between lines
#[derive(Debug, Clone)]
pub struct ProgramInterpreter {
    position: AxisPosition,
    motion_mode: MotionMode,
    unit: Units,
    absolute: bool,
    origin_offset: OriginOffset,
}

impl Default for ProgramInterpreter {
    fn default() -> Self {
        Self {
            position: AxisPosition::default(),
            motion_mode: MotionMode::G0,
            unit: Units::MM,
            absolute: true,
            origin_offset: OriginOffset::default(),
        }
    }
}

impl ProgramInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> AxisPosition {
        self.position
    }

    pub fn motion_mode(&self) -> MotionMode {
        self.motion_mode
    }

    pub fn unit(&self) -> Units {
        self.unit
    }

    pub fn origin_offset(&self) -> OriginOffset {
        self.origin_offset
    }

    fn snapshot(&self) -> MachineStatusSnapshot {
        MachineStatusSnapshot::new(self.position, self.motion_mode)
            .with_unit(self.unit)
            .with_origin_offset(self.origin_offset)
    }

    /// Feed `program` into `controller`
    ///
    /// Modal state starts from the machine origin in G0/G21/G90. Returns the
    /// number of blocks delivered. `end_program` is called exactly once,
    /// at M2/M30 or at the end of the text.
    pub fn run<C: MachineController>(
        &mut self,
        program: &str,
        controller: &mut C,
    ) -> Result<usize> {
        *self = Self::default();
        let mut blocks = 0;

        for (index, line) in program.lines().enumerate() {
            let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
            let words = tokenize(line, line_number)?;
            if words.is_empty() {
                continue;
            }

            match self.apply_line(&words, line_number)? {
                LineAction::None => {}
                LineAction::Block(fields) => {
                    controller.start_block(&self.snapshot())?;
                    self.commit_axes(&words);
                    controller.end_block(&MotionBlock {
                        fields,
                        status: self.snapshot(),
                    })?;
                    blocks += 1;
                }
                LineAction::EndProgram => {
                    debug!("Program end at line {}", line_number);
                    controller.end_program()?;
                    return Ok(blocks);
                }
            }
        }

        controller.end_program()?;
        Ok(blocks)
    }

    /// Update modal state for one line and decide what it produces
    fn apply_line(&mut self, words: &[Word], line_number: u32) -> Result<LineAction> {
        let mut motion_word = false;
        let mut set_origin = false;

        for word in words.iter().filter(|w| w.letter == 'G' || w.letter == 'M') {
            if word.value < 0.0 || (word.letter == 'M' && word.value.fract() != 0.0) {
                return Err(GcodeError::InvalidParameter {
                    line_number,
                    param: word.letter.to_string(),
                    reason: format!("unsupported code {}", word.value),
                }
                .into());
            }
            if word.value.fract() != 0.0 {
                trace!("Ignoring G{} at line {}", word.value, line_number);
                continue;
            }

            let code = word.value as u32;
            match (word.letter, code) {
                ('G', 0..=3) => {
                    if let Some(mode) = MotionMode::from_gcode(code) {
                        self.motion_mode = mode;
                        motion_word = true;
                    }
                }
                ('G', 20 | 21) => {
                    if let Some(unit) = Units::from_gcode(code) {
                        self.unit = unit;
                    }
                }
                ('G', 90) => self.absolute = true,
                ('G', 91) => self.absolute = false,
                ('G', 92) => set_origin = true,
                ('M', 2 | 30) => return Ok(LineAction::EndProgram),
                (letter, code) => trace!("Ignoring {}{} at line {}", letter, code, line_number),
            }
        }

        let has_axis = words.iter().any(|w| AXIS_LETTERS.contains(&w.letter));
        if set_origin {
            self.set_origin(words);
            return Ok(LineAction::None);
        }
        if !has_axis && !motion_word {
            return Ok(LineAction::None);
        }

        let fields = words
            .iter()
            .filter(|w| ARC_LETTERS.contains(&w.letter) || AXIS_LETTERS.contains(&w.letter))
            .map(|w| (w.letter, w.value))
            .collect::<FieldMap>();
        Ok(LineAction::Block(fields))
    }

    fn commit_axes(&mut self, words: &[Word]) {
        for word in words {
            let axis = match word.letter {
                'X' => &mut self.position.x,
                'Y' => &mut self.position.y,
                'Z' => &mut self.position.z,
                'A' => &mut self.position.a,
                _ => continue,
            };
            if self.absolute {
                *axis = word.value;
            } else {
                *axis += word.value;
            }
        }
    }

    /// G92: the current point takes the given coordinates; the offset
    /// absorbs the difference so emitted geometry does not move
    fn set_origin(&mut self, words: &[Word]) {
        for word in words {
            match word.letter {
                'X' => {
                    self.origin_offset.x += self.position.x - word.value;
                    self.position.x = word.value;
                }
                'Y' => {
                    self.origin_offset.y += self.position.y - word.value;
                    self.position.y = word.value;
                }
                'Z' => {
                    self.origin_offset.z += self.position.z - word.value;
                    self.position.z = word.value;
                }
                'A' => self.position.a = word.value,
                _ => {}
            }
        }
        debug!(
            "Origin offset set to ({:.4}, {:.4}, {:.4})",
            self.origin_offset.x, self.origin_offset.y, self.origin_offset.z
        );
    }
}

enum LineAction {
    None,
    Block(FieldMap),
    EndProgram,
}

/// Split a line into words after removing comments
fn tokenize(line: &str, line_number: u32) -> Result<Vec<Word>> {
    let cleaned = comment_regex().replace_all(line, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || cleaned == "%" {
        return Ok(Vec::new());
    }

    let mut words = Vec::new();
    let mut consumed = 0;
    for captures in word_regex().captures_iter(cleaned) {
        let (Some(whole), Some(letter), Some(number)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };

        let gap = &cleaned[consumed..whole.start()];
        if !gap.trim().is_empty() {
            return Err(unexpected_text(gap, line_number));
        }
        consumed = whole.end();

        let letter = letter.as_str().chars().next().unwrap_or(' ').to_ascii_uppercase();
        let value: f64 = number.as_str().parse().map_err(|_| GcodeError::InvalidParameter {
            line_number,
            param: letter.to_string(),
            reason: format!("invalid number '{}'", number.as_str()),
        })?;

        if IGNORED_LETTERS.contains(&letter) {
            continue;
        }
        words.push(Word { letter, value });
    }

    let rest = &cleaned[consumed..];
    if !rest.trim().is_empty() {
        return Err(unexpected_text(rest, line_number));
    }
    Ok(words)
}

fn unexpected_text(text: &str, line_number: u32) -> gcodemesh_core::Error {
    GcodeError::InvalidSyntax {
        line_number,
        reason: format!("unexpected text '{}'", text.trim()),
    }
    .into()
}
