use crate::{
    calculator::{Button, Operator},
    messaging::types::{InlineButton, InlineKeyboard},
};

/// The static calculator layout attached to every display:
///
/// ```text
/// AC + -
///  7 8 9
///  4 5 6
///  1 2 3
///    0
/// ```
pub fn calculator_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        row(&[
            Button::Clear,
            Button::Operator(Operator::Add),
            Button::Operator(Operator::Subtract),
        ]),
        row(&[Button::Digit(7), Button::Digit(8), Button::Digit(9)]),
        row(&[Button::Digit(4), Button::Digit(5), Button::Digit(6)]),
        row(&[Button::Digit(1), Button::Digit(2), Button::Digit(3)]),
        row(&[Button::Digit(0)]),
    ])
}

fn row(buttons: &[Button]) -> Vec<InlineButton> {
    buttons
        .iter()
        .map(|b| InlineButton::labelled(b.label()))
        .collect()
}
