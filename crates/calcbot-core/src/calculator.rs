//! Calculator state machine.
//!
//! A pure transition function: `(session, displayed text, button)` in,
//! `(session, new displayed text)` out. There is no operator precedence and no
//! error path; every button has a defined transition and unparseable display
//! text commits as `0`.

use std::{fmt, str::FromStr};

/// Arithmetic operator queued until the next commit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Operator {
    #[default]
    Add,
    Subtract,
}

impl Operator {
    fn apply(self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Operator::Add => lhs.saturating_add(rhs),
            Operator::Subtract => lhs.saturating_sub(rhs),
        }
    }
}

/// Keyboard button carried in callback data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    /// A single decimal digit, always `0..=9`.
    Digit(u8),
    Operator(Operator),
    Clear,
}

impl Button {
    /// Callback data / label used on the keyboard.
    pub fn label(self) -> String {
        self.to_string()
    }

    pub fn kind(self) -> ButtonKind {
        match self {
            Button::Digit(_) => ButtonKind::Digit,
            Button::Operator(_) => ButtonKind::Operator,
            Button::Clear => ButtonKind::Clear,
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Button::Digit(d) => write!(f, "{d}"),
            Button::Operator(Operator::Add) => f.write_str("+"),
            Button::Operator(Operator::Subtract) => f.write_str("-"),
            Button::Clear => f.write_str("AC"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown calculator button: {0:?}")]
pub struct UnknownButton(pub String);

impl FromStr for Button {
    type Err = UnknownButton;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AC" => Ok(Button::Clear),
            "+" => Ok(Button::Operator(Operator::Add)),
            "-" => Ok(Button::Operator(Operator::Subtract)),
            _ => match s.as_bytes() {
                [d @ b'0'..=b'9'] => Ok(Button::Digit(d - b'0')),
                _ => Err(UnknownButton(s.to_string())),
            },
        }
    }
}

/// Category of the most recently pressed button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ButtonKind {
    #[default]
    None,
    Digit,
    Operator,
    Clear,
}

/// Per-display calculator state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub accumulator: i64,
    pub pending_operator: Operator,
    pub last_button: ButtonKind,
}

/// Result of a single button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub session: Session,
    pub display: String,
}

pub fn apply(session: Session, displayed_text: &str, button: Button) -> Transition {
    match button {
        Button::Clear => Transition {
            session: Session::default(),
            display: "0".to_string(),
        },
        Button::Operator(op) => {
            let mut next = session;
            let display = if session.last_button == ButtonKind::Operator {
                // Two operators in a row: the newer one wins, nothing is committed.
                displayed_text.to_string()
            } else {
                let current = parse_leading_int(displayed_text);
                next.accumulator = session.pending_operator.apply(session.accumulator, current);
                next.accumulator.to_string()
            };
            next.pending_operator = op;
            next.last_button = button.kind();
            Transition {
                session: next,
                display,
            }
        }
        Button::Digit(d) => {
            let digit = char::from(b'0' + d.min(9));
            let display = if session.last_button == ButtonKind::Operator
                || displayed_text == "0"
            {
                digit.to_string()
            } else {
                let mut s = String::with_capacity(displayed_text.len() + 1);
                s.push_str(displayed_text);
                s.push(digit);
                s
            };
            Transition {
                session: Session {
                    last_button: button.kind(),
                    ..session
                },
                display,
            }
        }
    }
}

/// Parse the longest leading integer literal (`[ws][+-]digits`), `0` if none.
///
/// Out-of-range values saturate instead of failing.
pub fn parse_leading_int(text: &str) -> i64 {
    let s = text.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in rest.bytes().take_while(u8::is_ascii_digit) {
        let d = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }
    value
}
