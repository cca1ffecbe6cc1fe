use std::sync::Arc;

use zinc_core::manager::{ChangeFlags, ManagerMessage};

use crate::glyph::Glyph;

/// Changes to the glyphs of a [`GlyphModule`](super::GlyphModule).
#[derive(Debug, Clone)]
pub struct GlyphModuleEvent {
    summary: ChangeFlags,
    changes: Vec<(Arc<dyn Glyph>, ChangeFlags)>,
}

impl GlyphModuleEvent {
    pub(crate) fn from_message(message: &ManagerMessage<dyn Glyph>) -> Self {
        Self {
            summary: message.summary(),
            changes: message
                .changes()
                .map(|(glyph, flags)| (Arc::clone(glyph), flags))
                .collect(),
        }
    }

    /// Sent once when the module is dropped.
    pub(crate) fn module_destroyed() -> Self {
        Self {
            summary: ChangeFlags::FINAL,
            changes: Vec::new(),
        }
    }

    /// Union of the flags of every changed glyph.
    pub fn summary(&self) -> ChangeFlags {
        self.summary
    }

    /// Flags for `glyph`, empty if it did not change.
    pub fn glyph_change_flags(&self, glyph: &dyn Glyph) -> ChangeFlags {
        self.changes
            .iter()
            .find(|(changed, _)| std::ptr::addr_eq(Arc::as_ptr(changed), glyph as *const dyn Glyph))
            .map_or(ChangeFlags::empty(), |(_, flags)| *flags)
    }

    pub fn changes(&self) -> impl Iterator<Item = (&Arc<dyn Glyph>, ChangeFlags)> {
        self.changes.iter().map(|(glyph, flags)| (glyph, *flags))
    }

    pub fn is_final(&self) -> bool {
        self.summary.contains(ChangeFlags::FINAL)
    }
}
