use std::sync::Arc;

use crate::models::{ControlToken, RowBuffer, SharedAsset, Slot};

/// Groups control tokens followed by `items` into rows of exactly
/// `row_width` slots.
///
/// A row closes whenever the running slot index is a positive multiple of
/// `row_width`. The last row is padded with [`Slot::Empty`]; an empty
/// trailing row is never emitted. Returns no rows for a zero width.
pub fn group(
    items: &[SharedAsset],
    control_tokens: &[ControlToken],
    row_width: usize,
) -> Vec<RowBuffer> {
    if row_width == 0 {
        return Vec::new();
    }

    let slots = control_tokens
        .iter()
        .map(|token| Slot::Control(*token))
        .chain(items.iter().map(|item| Slot::Asset(Arc::clone(item))));

    let mut rows = Vec::with_capacity((control_tokens.len() + items.len()) / row_width + 1);
    let mut current: RowBuffer = Vec::with_capacity(row_width);

    for (index, slot) in slots.enumerate() {
        if index > 0 && index % row_width == 0 {
            rows.push(std::mem::replace(
                &mut current,
                Vec::with_capacity(row_width),
            ));
        }
        current.push(slot);
    }

    if !current.is_empty() {
        current.resize(row_width, Slot::Empty);
        rows.push(current);
    }

    rows
}
