use teloxide::types::{InlineKeyboardMarkup, KeyboardMarkup, ReplyMarkup};

use crate::{Control, KeyboardKind, LayoutError};

/// Split `items` into rows. Row `i` has `sizes[i]` items, after the sizes
/// run out the last one repeats. Empty `sizes` means one item per row. Last
/// row may be shorter
///
/// ```
/// # use sender::layout;
/// let rows = layout(vec![1, 2, 3, 4, 5, 6], &[2, 1]).unwrap();
/// assert_eq!(rows, vec![vec![1, 2], vec![3], vec![4], vec![5], vec![6]]);
/// ```
pub fn layout<T>(items: Vec<T>, sizes: &[usize]) -> Result<Vec<Vec<T>>, LayoutError> {
    if sizes.contains(&0) {
        return Err(LayoutError::ZeroRowSize);
    }

    let last = sizes.last().copied().unwrap_or(1);
    let mut row_sizes = sizes.iter().copied().chain(std::iter::repeat(last));

    let mut rows = Vec::new();
    let mut items = items.into_iter().peekable();
    while items.peek().is_some() {
        let size = row_sizes.next().unwrap_or(last);
        rows.push(items.by_ref().take(size).collect());
    }
    Ok(rows)
}

#[derive(Debug, Default, Clone)]
pub struct KeyboardBuilder {
    controls: Vec<Control>,
    sizes: Vec<usize>,
}

impl KeyboardBuilder {
    pub fn with_layout(sizes: impl Into<Vec<usize>>) -> Self {
        Self {
            controls: Vec::new(),
            sizes: sizes.into(),
        }
    }
    pub fn control(mut self, control: impl Into<Control>) -> Self {
        self.controls.push(control.into());
        self
    }
    pub fn controls(mut self, controls: impl IntoIterator<Item = Control>) -> Self {
        self.controls.extend(controls);
        self
    }
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
    /// Returns `None` when there is no buttons
    pub fn build(self) -> Result<Option<ReplyMarkup>, LayoutError> {
        let Some(kind) = self.controls.first().map(Control::kind) else {
            return Ok(None);
        };

        let markup = match kind {
            KeyboardKind::Inline => {
                let buttons = self
                    .controls
                    .into_iter()
                    .map(|c| match c {
                        Control::Inline(b) => Ok(b),
                        Control::Reply(_) => Err(LayoutError::MixedKinds),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(layout(buttons, &self.sizes)?))
            }
            KeyboardKind::Reply => {
                let buttons = self
                    .controls
                    .into_iter()
                    .map(|c| match c {
                        Control::Reply(b) => Ok(b),
                        Control::Inline(_) => Err(LayoutError::MixedKinds),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                ReplyMarkup::Keyboard(KeyboardMarkup::new(layout(buttons, &self.sizes)?).resize_keyboard())
            }
        };
        Ok(Some(markup))
    }
}
