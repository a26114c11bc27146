//! Path data tokenizer.
//!
//! Tokens are command letters and numbers, separated by optional whitespace
//! or commas. Numbers may run together when the next one starts with a sign
//! or a second decimal point (`1-2`, `1.5.5`). Arc flags are single `0`/`1`
//! characters and may touch their neighbours (`a1 1 0 00 1 1`).

use super::{Number, PathCommand, pattern};
use crate::svg::error::PathError;

/// Parameter positions within an arc group that hold flags.
const ARC_FLAGS: [usize; 2] = [3, 4];

/// Byte cursor over path source text.
struct Cursor<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }

    /// Read `[+-]? (digits [. digits*]? | . digits) ([eE] [+-]? digits)?`.
    fn number(&mut self) -> Result<Number, PathError> {
        let start = self.pos;
        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.pos += 1;
        }

        let mut digits = self.skip_digits();
        if self.peek() == Some(b'.') {
            self.pos += 1;
            digits += self.skip_digits();
        }
        if digits == 0 {
            return Err(self.invalid_number(start));
        }

        // The exponent only counts when digits follow it.
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if self.skip_digits() == 0 {
                self.pos = mark;
            }
        }

        let literal = &self.source[start..self.pos];
        match literal.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Number::parsed(value, literal)),
            _ => Err(PathError::InvalidNumber {
                offset: start,
                text: literal.to_string(),
            }),
        }
    }

    fn flag(&mut self) -> Result<Number, PathError> {
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(Number::parsed(0.0, "0"))
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(Number::parsed(1.0, "1"))
            }
            _ => Err(PathError::InvalidArcFlag { offset: self.pos }),
        }
    }

    fn invalid_number(&self, start: usize) -> PathError {
        let end = (start + 1).min(self.source.len());
        PathError::InvalidNumber {
            offset: start,
            text: self.source.get(start..end).unwrap_or_default().to_string(),
        }
    }

    fn unexpected_char(&self) -> PathError {
        let ch = self.source[self.pos..].chars().next().unwrap_or('\0');
        PathError::UnexpectedChar {
            offset: self.pos,
            ch,
        }
    }
}

#[inline]
fn is_command_letter(b: u8) -> bool {
    b.is_ascii_alphabetic() && b != b'e' && b != b'E'
}

#[inline]
fn starts_number(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-')
}

/// Tokenize path data into command records.
pub(super) fn parse_commands(source: &str) -> Result<Vec<PathCommand>, PathError> {
    let mut cursor = Cursor::new(source);
    let mut commands: Vec<PathCommand> = Vec::new();

    loop {
        cursor.skip_separators();
        let Some(b) = cursor.peek() else { break };

        if is_command_letter(b) {
            commands.push(PathCommand::new(char::from(b)));
            cursor.pos += 1;
            continue;
        }
        if !starts_number(b) {
            return Err(cursor.unexpected_char());
        }

        let offset = cursor.pos;
        let command = commands
            .last_mut()
            .ok_or(PathError::MissingCommand { offset })?;
        let letter = command.letter();
        if group_is_empty(letter) {
            return Err(PathError::ParamsAfterClose { letter, offset });
        }

        let is_flag = letter.eq_ignore_ascii_case(&'a')
            && ARC_FLAGS.contains(&(command.params().len() % 7));
        let number = if is_flag {
            cursor.flag()?
        } else {
            cursor.number()?
        };
        command.push(number);
    }

    for command in &commands {
        check_arity(command)?;
    }
    Ok(commands)
}

fn group_is_empty(letter: char) -> bool {
    pattern::group_size(letter) == Some(0)
}

/// Known commands carry a positive multiple of their group size.
fn check_arity(command: &PathCommand) -> Result<(), PathError> {
    let Some(group) = pattern::group_size(command.letter()) else {
        return Ok(());
    };
    let count = command.params().len();
    if group > 0 && (count == 0 || count % group != 0) {
        return Err(PathError::ParamCount {
            letter: command.letter(),
            count,
            group,
        });
    }
    Ok(())
}

/// Parse a plain list of numbers (`points` attributes and the like).
pub fn parse_number_list(source: &str) -> Result<Vec<Number>, PathError> {
    let mut cursor = Cursor::new(source);
    let mut numbers = Vec::new();
    loop {
        cursor.skip_separators();
        match cursor.peek() {
            None => break,
            Some(b) if starts_number(b) => numbers.push(cursor.number()?),
            Some(_) => return Err(cursor.unexpected_char()),
        }
    }
    Ok(numbers)
}
