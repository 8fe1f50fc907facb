//! Bibliography entry text from a style's reference layouts.

use crate::error::{Error, Result};
use crate::reference::{Record, RecordCollection, RecordFields};
use citemark_style::{LayoutRenderer, PlainRenderer, Style};

/// Render `record` with the layout for its entry type, falling back to the
/// default layout.
pub fn format_reference(
    style: &Style,
    record: &dyn Record,
    collection: &dyn RecordCollection,
) -> Result<String> {
    format_reference_with(&PlainRenderer, style, record, collection)
}

/// [`format_reference`] with a caller-supplied renderer, for layouts whose
/// formatter chains need a full implementation.
pub fn format_reference_with(
    renderer: &dyn LayoutRenderer,
    style: &Style,
    record: &dyn Record,
    collection: &dyn RecordCollection,
) -> Result<String> {
    style.check_valid()?;
    let entry_type = record.entry_type();
    let layout = style.reference_layout(&entry_type).ok_or_else(|| {
        Error::Internal(format!("valid style without a layout for '{}'", entry_type))
    })?;
    tracing::trace!(key = record.citation_key(), %entry_type, "formatting reference");
    Ok(renderer.render(layout, &RecordFields { record, collection }))
}
