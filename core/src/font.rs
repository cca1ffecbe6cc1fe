//! Fonts used to draw glyph labels.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::error::{CoreResult, invalid_argument};
use crate::manager::{
    ChangeFlags, Managed, Manager, ManagerLink, ManagerMessage, Subscription, check_rename,
};

/// Type face family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontTypeface {
    #[default]
    Default,
    Monospace,
    SansSerif,
    Serif,
}

#[derive(Debug, Clone, PartialEq)]
struct FontState {
    name: String,
    typeface: FontTypeface,
    point_size: u32,
    bold: bool,
    italic: bool,
}

/// A named label font.
#[derive(Debug)]
pub struct Font {
    state: RwLock<FontState>,
    link: ManagerLink<Font>,
}

impl Font {
    /// Create an unmanaged 12 point font.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(FontState {
                name: name.into(),
                typeface: FontTypeface::Default,
                point_size: 12,
                bold: false,
                italic: false,
            }),
            link: ManagerLink::new(),
        })
    }

    pub fn set_name(&self, name: &str) -> CoreResult<()> {
        if name.is_empty() {
            return Err(invalid_argument("font name must not be empty"));
        }
        if check_rename(self, name)? {
            self.state.write().name = name.to_string();
            self.link.object_changed(self, ChangeFlags::IDENTIFIER);
        }
        Ok(())
    }

    pub fn typeface(&self) -> FontTypeface {
        self.state.read().typeface
    }

    pub fn set_typeface(&self, typeface: FontTypeface) {
        self.update(|state| {
            let changed = state.typeface != typeface;
            state.typeface = typeface;
            changed
        });
    }

    pub fn point_size(&self) -> u32 {
        self.state.read().point_size
    }

    /// Set the point size; must be positive.
    pub fn set_point_size(&self, point_size: u32) -> CoreResult<()> {
        if point_size == 0 {
            return Err(invalid_argument("font point size must be positive"));
        }
        self.update(|state| {
            let changed = state.point_size != point_size;
            state.point_size = point_size;
            changed
        });
        Ok(())
    }

    pub fn is_bold(&self) -> bool {
        self.state.read().bold
    }

    pub fn set_bold(&self, bold: bool) {
        self.update(|state| {
            let changed = state.bold != bold;
            state.bold = bold;
            changed
        });
    }

    pub fn is_italic(&self) -> bool {
        self.state.read().italic
    }

    pub fn set_italic(&self, italic: bool) {
        self.update(|state| {
            let changed = state.italic != italic;
            state.italic = italic;
            changed
        });
    }

    fn update(&self, apply: impl FnOnce(&mut FontState) -> bool) {
        let changed = apply(&mut self.state.write());
        if changed {
            self.link.object_changed(self, ChangeFlags::DEFINITION);
        }
    }
}

impl Managed for Font {
    fn name(&self) -> String {
        self.state.read().name.clone()
    }

    fn manager_link(&self) -> &ManagerLink<Self> {
        &self.link
    }
}

/// Owns the managed fonts of one context.
pub struct FontModule {
    manager: Manager<Font>,
    default_font: Mutex<Option<Arc<Font>>>,
}

impl FontModule {
    pub fn new() -> Self {
        Self {
            manager: Manager::new(),
            default_font: Mutex::new(None),
        }
    }

    pub fn manager(&self) -> &Manager<Font> {
        &self.manager
    }

    pub fn create_font(&self, name: &str) -> CoreResult<Arc<Font>> {
        let font = Font::new(name);
        self.manager.add(Arc::clone(&font))?;
        Ok(font)
    }

    pub fn find_font_by_name(&self, name: &str) -> Option<Arc<Font>> {
        self.manager.find_by_name(name)
    }

    /// The default font, created as `default` on first request.
    pub fn default_font(&self) -> CoreResult<Arc<Font>> {
        if let Some(font) = self.default_font.lock().clone() {
            return Ok(font);
        }
        let font = match self.find_font_by_name("default") {
            Some(font) => font,
            None => self.create_font("default")?,
        };
        *self.default_font.lock() = Some(Arc::clone(&font));
        Ok(font)
    }

    pub fn set_default_font(&self, font: Option<Arc<Font>>) {
        *self.default_font.lock() = font;
    }

    pub fn subscribe(
        &self,
        callback: impl Fn(&ManagerMessage<Font>) + Send + Sync + 'static,
    ) -> Subscription {
        self.manager.subscribe(callback)
    }
}

impl Default for FontModule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_font_created_once() {
        let module = FontModule::new();
        let first = module.default_font().unwrap();
        let second = module.default_font().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.name(), "default");
        assert_eq!(module.manager().len(), 1);
    }

    #[test]
    fn test_point_size_validated() {
        let font = Font::new("f");
        assert!(font.set_point_size(0).is_err());
        assert!(font.set_point_size(20).is_ok());
        assert_eq!(font.point_size(), 20);
    }

    #[test]
    fn test_font_change_notifies() {
        let module = FontModule::new();
        let font = module.create_font("labels").unwrap();
        let received = Arc::new(Mutex::new(ChangeFlags::empty()));
        let sink = received.clone();
        let _subscription = module.subscribe(move |message| *sink.lock() |= message.summary());
        font.set_bold(true);
        assert_eq!(*received.lock(), ChangeFlags::DEFINITION);
    }
}
