//! Calculator keypad state machine.
//!
//! Models a pocket-calculator entry flow: digits accumulate in the display,
//! an operator stores the first operand, `=` evaluates locally. Pressing a
//! second operator before `=` evaluates the pending operation first, so
//! `2 + 3 * 4 =` yields `20`.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::evaluator::{self, EvalError, Operator};
use crate::models::Calculation;

/// Longest entry accepted from the digit keys, counted in digits.
pub const MAX_ENTRY_DIGITS: usize = 15;

/// A key on the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Digit `0..=9`; larger values are ignored, as are digits beyond
    /// [`MAX_ENTRY_DIGITS`].
    Digit(u8),
    Point,
    ToggleSign,
    Backspace,
    Clear,
    Operator(Operator),
    Equals,
}

/// Outcome of a key press that completed a calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeypadEvent {
    Calculated(Calculation),
    Failed(EvalError),
}

#[derive(Debug, Clone)]
pub struct Keypad {
    input: String,
    pending: Option<(Decimal, Operator)>,
    waiting_for_operand: bool,
    error: Option<EvalError>,
}

impl Default for Keypad {
    fn default() -> Self {
        Self {
            input: "0".to_owned(),
            pending: None,
            waiting_for_operand: false,
            error: None,
        }
    }
}

impl Keypad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown on the display.
    #[must_use]
    pub fn display(&self) -> &str {
        match self.error {
            Some(EvalError::DivisionByZero) => "Cannot divide by zero",
            Some(_) => "Error",
            None => &self.input,
        }
    }

    /// Operator waiting for its second operand, if any.
    #[must_use]
    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending.map(|(_, op)| op)
    }

    /// Apply a key press. Returns an event when a calculation ran.
    pub fn press(&mut self, key: Key) -> Option<KeypadEvent> {
        if self.error.is_some() {
            if matches!(key, Key::Digit(_) | Key::Point | Key::Clear) {
                *self = Self::default();
            } else {
                return None;
            }
        }

        match key {
            Key::Digit(digit) => {
                self.input_digit(digit);
                None
            }
            Key::Point => {
                self.input_point();
                None
            }
            Key::ToggleSign => {
                self.toggle_sign();
                None
            }
            Key::Backspace => {
                self.backspace();
                None
            }
            Key::Clear => {
                *self = Self::default();
                None
            }
            Key::Operator(op) => self.input_operator(op),
            Key::Equals => self.calculate(),
        }
    }

    fn input_digit(&mut self, digit: u8) {
        if digit > 9 {
            return;
        }
        let ch = char::from(b'0' + digit);
        if self.waiting_for_operand {
            self.input = ch.to_string();
            self.waiting_for_operand = false;
        } else if self.input == "0" {
            self.input = ch.to_string();
        } else if self.entry_digits() < MAX_ENTRY_DIGITS {
            self.input.push(ch);
        }
    }

    fn entry_digits(&self) -> usize {
        self.input.chars().filter(char::is_ascii_digit).count()
    }

    fn input_point(&mut self) {
        if self.waiting_for_operand {
            self.input = "0.".to_owned();
            self.waiting_for_operand = false;
        } else if !self.input.contains('.') {
            self.input.push('.');
        }
    }

    fn toggle_sign(&mut self) {
        if self.input == "0" {
            return;
        }
        if let Some(stripped) = self.input.strip_prefix('-') {
            self.input = stripped.to_owned();
        } else {
            self.input.insert(0, '-');
        }
    }

    fn backspace(&mut self) {
        if self.waiting_for_operand {
            return;
        }
        self.input.pop();
        if self.input.is_empty() || self.input == "-" {
            self.input = "0".to_owned();
        }
    }

    fn input_operator(&mut self, op: Operator) -> Option<KeypadEvent> {
        if self.waiting_for_operand {
            // Consecutive operators replace each other.
            if let Some((first, _)) = self.pending {
                self.pending = Some((first, op));
                return None;
            }
        }

        let event = self.calculate();
        if matches!(event, Some(KeypadEvent::Failed(_))) {
            return event;
        }

        let Some(value) = self.current_value() else {
            return Some(self.fail(EvalError::Overflow));
        };
        self.pending = Some((value, op));
        self.waiting_for_operand = true;
        event
    }

    fn calculate(&mut self) -> Option<KeypadEvent> {
        let (a, operator) = self.pending.take()?;
        let Some(b) = self.current_value() else {
            return Some(self.fail(EvalError::Overflow));
        };

        match evaluator::evaluate(a, b, operator) {
            Ok(result) => {
                self.input = result.to_string();
                self.waiting_for_operand = true;
                Some(KeypadEvent::Calculated(Calculation {
                    a,
                    b,
                    operator,
                    result,
                }))
            }
            Err(err) => Some(self.fail(err)),
        }
    }

    fn fail(&mut self, err: EvalError) -> KeypadEvent {
        self.pending = None;
        self.error = Some(err.clone());
        KeypadEvent::Failed(err)
    }

    /// The entry as a number; `None` if it cannot be represented.
    fn current_value(&self) -> Option<Decimal> {
        Decimal::from_str(self.input.trim_end_matches('.'))
            .ok()
            .map(|d| d.normalize())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn press_all(keypad: &mut Keypad, keys: &[Key]) -> Vec<KeypadEvent> {
        keys.iter().filter_map(|k| keypad.press(*k)).collect()
    }

    fn digits(s: &str) -> Vec<Key> {
        s.chars()
            .map(|c| match c {
                '.' => Key::Point,
                c => Key::Digit(u8::try_from(c.to_digit(10).unwrap()).unwrap()),
            })
            .collect()
    }

    #[test]
    fn test_initial_display_is_zero() {
        assert_eq!(Keypad::new().display(), "0");
    }

    #[test]
    fn test_digits_replace_leading_zero() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &digits("007"));
        assert_eq!(keypad.display(), "7");
    }

    #[test]
    fn test_simple_addition() {
        let mut keypad = Keypad::new();
        let mut keys = digits("5");
        keys.push(Key::Operator(Operator::Add));
        keys.extend(digits("3"));
        keys.push(Key::Equals);

        let events = press_all(&mut keypad, &keys);

        assert_eq!(keypad.display(), "8");
        assert_eq!(events.len(), 1);
        let KeypadEvent::Calculated(calc) = &events[0] else {
            panic!("expected a calculation");
        };
        assert_eq!(calc.to_string(), "5 + 3 = 8");
    }

    #[test]
    fn test_chained_operators_evaluate_left_to_right() {
        let mut keypad = Keypad::new();
        let mut keys = digits("2");
        keys.push(Key::Operator(Operator::Add));
        keys.extend(digits("3"));
        keys.push(Key::Operator(Operator::Multiply));
        assert_eq!(press_all(&mut keypad, &keys).len(), 1);
        assert_eq!(keypad.display(), "5");

        keypad.press(Key::Digit(4));
        keypad.press(Key::Equals);
        assert_eq!(keypad.display(), "20");
    }

    #[test]
    fn test_consecutive_operators_replace_pending() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit(9));
        keypad.press(Key::Operator(Operator::Add));
        keypad.press(Key::Operator(Operator::Subtract));
        assert_eq!(keypad.pending_operator(), Some(Operator::Subtract));
        keypad.press(Key::Digit(4));
        keypad.press(Key::Equals);
        assert_eq!(keypad.display(), "5");
    }

    #[test]
    fn test_decimal_point_and_formatting() {
        let mut keypad = Keypad::new();
        let mut keys = digits("1.5");
        keys.push(Key::Point);
        keys.push(Key::Operator(Operator::Multiply));
        keys.extend(digits("2"));
        keys.push(Key::Equals);
        press_all(&mut keypad, &keys);
        assert_eq!(keypad.display(), "3");
    }

    #[test]
    fn test_point_after_operator_starts_fraction() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit(1));
        keypad.press(Key::Operator(Operator::Add));
        keypad.press(Key::Point);
        assert_eq!(keypad.display(), "0.");
        keypad.press(Key::Digit(5));
        keypad.press(Key::Equals);
        assert_eq!(keypad.display(), "1.5");
    }

    #[test]
    fn test_toggle_sign_and_backspace() {
        let mut keypad = Keypad::new();
        keypad.press(Key::ToggleSign);
        assert_eq!(keypad.display(), "0");

        press_all(&mut keypad, &digits("42"));
        keypad.press(Key::ToggleSign);
        assert_eq!(keypad.display(), "-42");
        keypad.press(Key::Backspace);
        assert_eq!(keypad.display(), "-4");
        keypad.press(Key::Backspace);
        assert_eq!(keypad.display(), "0");
        keypad.press(Key::Backspace);
        assert_eq!(keypad.display(), "0");
    }

    #[test]
    fn test_division_by_zero_shows_error_until_reset() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit(8));
        keypad.press(Key::Operator(Operator::Divide));
        keypad.press(Key::Digit(0));
        let event = keypad.press(Key::Equals);

        assert_eq!(event, Some(KeypadEvent::Failed(EvalError::DivisionByZero)));
        assert_eq!(keypad.display(), "Cannot divide by zero");
        assert_eq!(keypad.press(Key::Equals), None);
        assert_eq!(keypad.display(), "Cannot divide by zero");

        keypad.press(Key::Digit(3));
        assert_eq!(keypad.display(), "3");
        assert_eq!(keypad.pending_operator(), None);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit(7));
        keypad.press(Key::Operator(Operator::Multiply));
        keypad.press(Key::Clear);
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.pending_operator(), None);
    }

    #[test]
    fn test_equals_without_operator_is_noop() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit(4));
        assert_eq!(keypad.press(Key::Equals), None);
        assert_eq!(keypad.display(), "4");
    }

    #[test]
    fn test_entry_is_capped_at_max_digits() {
        let mut keypad = Keypad::new();
        press_all(&mut keypad, &[Key::Digit(9); 30]);
        assert_eq!(keypad.display(), "9".repeat(MAX_ENTRY_DIGITS));

        keypad.press(Key::Point);
        keypad.press(Key::Digit(5));
        assert_eq!(keypad.display(), format!("{}.", "9".repeat(MAX_ENTRY_DIGITS)));
    }

    #[test]
    fn test_long_entry_never_evaluates_as_zero() {
        let mut keypad = Keypad::new();
        let mut keys = vec![Key::Digit(9); 30];
        keys.push(Key::Operator(Operator::Add));
        keys.push(Key::Digit(1));
        keys.push(Key::Equals);

        let events = press_all(&mut keypad, &keys);

        assert_eq!(events, vec![KeypadEvent::Failed(EvalError::Overflow)]);
        assert_eq!(keypad.display(), "Error");
        assert_eq!(keypad.pending_operator(), None);
    }

    #[test]
    fn test_largest_storable_entry_calculates() {
        let mut keypad = Keypad::new();
        let mut keys = digits("9999999.99999999");
        keys.push(Key::Operator(Operator::Subtract));
        keys.extend(digits("0.99999999"));
        keys.push(Key::Equals);

        let events = press_all(&mut keypad, &keys);

        assert_eq!(events.len(), 1);
        assert_eq!(keypad.display(), "9999999");
    }

    #[test]
    fn test_out_of_range_digit_is_ignored() {
        let mut keypad = Keypad::new();
        keypad.press(Key::Digit(12));
        assert_eq!(keypad.display(), "0");
    }
}
