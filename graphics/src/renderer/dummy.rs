//! Dummy renderer for testing and tools.
//!
//! Compiling only remembers the object's generation; executing records a
//! summary of every drawn object, including resolved glyph instances.

use std::collections::HashMap;

use zinc_core::graphics_object::{GlyphInstance, GraphicsObject};
use zinc_core::vertex_array::VertexAttribute;

use super::{RenderError, RenderResult, Renderer, chain_generation};

/// What the dummy renderer drew for one object of a chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutedObject {
    pub name: String,
    pub kind: &'static str,
    pub primitive_count: usize,
    pub vertex_count: usize,
    pub glyph_instances: Vec<GlyphInstance>,
}

/// Renderer that draws nothing.
///
/// Compiled objects are keyed by address, so a dropped object's slot can be
/// reused by a new one.
#[derive(Debug, Default)]
pub struct DummyRenderer {
    compiled: HashMap<usize, u64>,
    compile_count: usize,
    execute_count: usize,
    executed: Vec<ExecutedObject>,
}

fn key(object: &GraphicsObject) -> usize {
    object as *const GraphicsObject as usize
}

impl DummyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &'static str {
        "Dummy Renderer"
    }

    /// Number of compile calls, including those for instanced glyph objects.
    pub fn compile_count(&self) -> usize {
        self.compile_count
    }

    pub fn execute_count(&self) -> usize {
        self.execute_count
    }

    pub fn executed(&self) -> &[ExecutedObject] {
        &self.executed
    }

    pub fn take_executed(&mut self) -> Vec<ExecutedObject> {
        std::mem::take(&mut self.executed)
    }
}

impl Renderer for DummyRenderer {
    fn compile(&mut self, object: &GraphicsObject) -> RenderResult<()> {
        for member in object.chain() {
            if let Some(glyph_set) = member.glyph_set() {
                let glyph = glyph_set.glyph();
                if self.compiled_generation(glyph) != Some(chain_generation(glyph)) {
                    self.compile(glyph)?;
                }
            }
        }
        log::trace!(
            "DummyRenderer: compiling '{}' ({} objects)",
            object.name(),
            object.chain_len()
        );
        self.compiled.insert(key(object), chain_generation(object));
        self.compile_count += 1;
        Ok(())
    }

    fn execute(&mut self, object: &GraphicsObject) -> RenderResult<()> {
        if !self.compiled.contains_key(&key(object)) {
            return Err(RenderError::NotCompiled(object.name().to_string()));
        }
        log::trace!("DummyRenderer: executing '{}'", object.name());
        self.executed.extend(object.chain().map(|member| ExecutedObject {
            name: member.name().to_string(),
            kind: member.primitive().kind_name(),
            primitive_count: member.primitive_count(),
            vertex_count: member.vertices().number_of_vertices(VertexAttribute::Position),
            glyph_instances: member.glyph_instances(),
        }));
        self.execute_count += 1;
        Ok(())
    }

    fn compiled_generation(&self, object: &GraphicsObject) -> Option<u64> {
        self.compiled.get(&key(object)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use zinc_core::generators::{create_cross, create_line};
    use zinc_core::graphics_object::{GlyphPoint, GlyphSetParameters, GlyphSetPrimitive};

    #[test]
    fn test_execute_requires_compile() {
        let mut renderer = DummyRenderer::new();
        let cross = create_cross("cross").unwrap();
        assert_eq!(
            renderer.execute(&cross),
            Err(RenderError::NotCompiled("cross".to_string()))
        );
        renderer.render(&cross).unwrap();
        assert_eq!(renderer.executed()[0].vertex_count, 6);
    }

    #[test]
    fn test_recompiles_only_after_change() {
        let mut renderer = DummyRenderer::new();
        let line = create_line("line").unwrap();
        renderer.render(&line).unwrap();
        renderer.render(&line).unwrap();
        assert_eq!(renderer.compile_count(), 1);
        assert_eq!(renderer.execute_count(), 2);

        line.mark_changed();
        renderer.render(&line).unwrap();
        assert_eq!(renderer.compile_count(), 2);
    }

    #[test]
    fn test_glyph_set_compiles_glyph() {
        let mut renderer = DummyRenderer::new();
        let glyph = Arc::new(create_line("line").unwrap());
        let set = GlyphSetPrimitive::new(Arc::clone(&glyph), GlyphSetParameters::default())
            .into_object("points", &[GlyphPoint::default(); 4], None, 0)
            .unwrap();
        renderer.render(&set).unwrap();
        assert_eq!(renderer.compile_count(), 2);
        assert!(renderer.compiled_generation(&glyph).is_some());
        let executed = renderer.take_executed();
        assert_eq!(executed[0].kind, "glyph set");
        assert_eq!(executed[0].glyph_instances.len(), 4);
    }
}
