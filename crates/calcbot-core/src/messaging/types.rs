/// Inline keyboard (buttons) attached to a calculator display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineButton {
    pub label: String,
    pub callback_data: String,
}

impl InlineButton {
    /// Button whose callback data equals its label.
    pub fn labelled(label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            callback_data: label.clone(),
            label,
        }
    }
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }

    #[cfg(test)]
    pub(crate) fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}
