/// Line-based choice input that re-prompts until it gets a usable number.

use std::io::{BufRead, Write};
use tracing::warn;

use crate::core::engine::{ChoiceResult, InputSource};

/// Reads choices one line at a time.
///
/// Only the digits of a line are considered, so "(2)" and "2." both pick
/// option 2. Lines with no digits or an out-of-range number are answered
/// with a hint and a fresh prompt. End of input or a read error cancels.
pub struct LineInput<R: BufRead, W: Write> {
    reader: R,
    out: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, out: W) -> Self {
        Self { reader, out }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.out)
    }

    fn say(&mut self, text: &str) {
        if let Err(e) = write!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to write prompt");
        }
    }
}

/// Pull the digits out of `line`. `None` if there are none; numbers too
/// large for `usize` saturate so they fall out of range.
fn parse_digits(line: &str) -> Option<usize> {
    let digits: String = line.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse().unwrap_or(usize::MAX))
}

impl<R: BufRead, W: Write> InputSource for LineInput<R, W> {
    fn get_choice(&mut self, option_count: usize) -> ChoiceResult {
        loop {
            self.say("> ");

            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return ChoiceResult::Cancelled,
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "failed to read input");
                    return ChoiceResult::Cancelled;
                }
            }

            match parse_digits(&line) {
                None => self.say("Please enter a number matching an option.\n"),
                Some(n) if (1..=option_count).contains(&n) => return ChoiceResult::Picked(n),
                Some(_) => self.say("That isn't a valid option number, try again.\n"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn input(text: &str) -> LineInput<Cursor<Vec<u8>>, Vec<u8>> {
        LineInput::new(Cursor::new(text.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn reads_plain_number() {
        let mut src = input("2\n");
        assert_eq!(src.get_choice(3), ChoiceResult::Picked(2));
    }

    #[test]
    fn digits_are_extracted() {
        let mut src = input("option (3) please\n");
        assert_eq!(src.get_choice(3), ChoiceResult::Picked(3));
    }

    #[test]
    fn reprompts_on_garbage_and_out_of_range() {
        let mut src = input("left\n0\n9\n99999999999999999999999\n1\n");
        assert_eq!(src.get_choice(2), ChoiceResult::Picked(1));
        let (_, out) = src.into_inner();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("> ").count(), 5);
        assert_eq!(out.matches("Please enter a number").count(), 1);
        assert_eq!(out.matches("isn't a valid option").count(), 3);
    }

    #[test]
    fn end_of_input_cancels() {
        let mut src = input("");
        assert_eq!(src.get_choice(2), ChoiceResult::Cancelled);

        let mut src = input("nope\n");
        assert_eq!(src.get_choice(2), ChoiceResult::Cancelled);
    }

    #[test]
    fn parse_digits_cases() {
        assert_eq!(parse_digits("12"), Some(12));
        assert_eq!(parse_digits(" 1 2 "), Some(12));
        assert_eq!(parse_digits("abc"), None);
        assert_eq!(parse_digits(""), None);
    }
}
