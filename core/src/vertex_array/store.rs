//! The buffer-of-buffers vertex attribute store.

use std::collections::BTreeMap;

use super::VertexAttribute;
use super::buffer::{AttributeBuffer, VertexBuffer, VertexValue};
use super::error::{VertexArrayError, VertexArrayResult};

/// Typed growable buffers keyed by attribute kind, plus an object-id index.
///
/// Every buffer fixes its value type and values-per-vertex on first use.
/// Requests that disagree with either fail without touching the buffer.
/// Counts of related kinds (for example `Position` and `Normal` of one point
/// set) are kept equal by the code writing them, not by the store.
#[derive(Debug, Clone, Default)]
pub struct VertexAttributeStore {
    buffers: BTreeMap<VertexAttribute, AttributeBuffer>,
    fast_search_ids: BTreeMap<i32, Vec<usize>>,
    fast_search_entries: usize,
}

impl VertexAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `count` vertices of `values_per_vertex` values each to the `kind` buffer.
    ///
    /// The buffer is created with headroom on first use. Only the first
    /// `values_per_vertex * count` entries of `values` are read.
    pub fn add_attribute<V: VertexValue>(
        &mut self,
        kind: VertexAttribute,
        values_per_vertex: usize,
        count: usize,
        values: &[V],
    ) -> VertexArrayResult<()> {
        let values = checked_values(kind, values_per_vertex, count, values)?;
        match self.buffers.get_mut(&kind) {
            Some(existing) => {
                let buffer = typed_buffer_mut::<V>(kind, existing)?;
                check_values_per_vertex(kind, buffer.values_per_vertex(), values_per_vertex)?;
                buffer.append(values)
            }
            None => {
                let mut buffer = VertexBuffer::with_headroom(values_per_vertex, count)?;
                buffer.append(values)?;
                self.buffers.insert(kind, V::wrap(buffer));
                Ok(())
            }
        }
    }

    pub fn add_float_attribute(
        &mut self,
        kind: VertexAttribute,
        values_per_vertex: usize,
        count: usize,
        values: &[f32],
    ) -> VertexArrayResult<()> {
        self.add_attribute(kind, values_per_vertex, count, values)
    }

    pub fn add_unsigned_attribute(
        &mut self,
        kind: VertexAttribute,
        values_per_vertex: usize,
        count: usize,
        values: &[u32],
    ) -> VertexArrayResult<()> {
        self.add_attribute(kind, values_per_vertex, count, values)
    }

    pub fn add_integer_attribute(
        &mut self,
        kind: VertexAttribute,
        values_per_vertex: usize,
        count: usize,
        values: &[i32],
    ) -> VertexArrayResult<()> {
        self.add_attribute(kind, values_per_vertex, count, values)
    }

    pub fn add_string_attribute(
        &mut self,
        kind: VertexAttribute,
        values_per_vertex: usize,
        count: usize,
        values: &[String],
    ) -> VertexArrayResult<()> {
        self.add_attribute(kind, values_per_vertex, count, values)
    }

    /// Overwrite `count` vertices of an existing buffer, starting at `start`.
    ///
    /// Fails if the range runs past the current vertex count.
    pub fn replace_attribute_at<V: VertexValue>(
        &mut self,
        kind: VertexAttribute,
        start: usize,
        values_per_vertex: usize,
        count: usize,
        values: &[V],
    ) -> VertexArrayResult<()> {
        let values = checked_values(kind, values_per_vertex, count, values)?;
        let existing = self
            .buffers
            .get_mut(&kind)
            .ok_or(VertexArrayError::MissingAttribute(kind))?;
        let buffer = typed_buffer_mut::<V>(kind, existing)?;
        check_values_per_vertex(kind, buffer.values_per_vertex(), values_per_vertex)?;
        let vertex_count = buffer.vertex_count();
        if start >= vertex_count || vertex_count - start < count {
            return Err(VertexArrayError::RangeOutOfBounds {
                kind,
                start,
                count,
                vertex_count,
            });
        }
        buffer.overwrite(start, values);
        Ok(())
    }

    /// Read-only view of the `kind` buffer, if it exists with value type `V`.
    pub fn vertex_buffer<V: VertexValue>(&self, kind: VertexAttribute) -> Option<&VertexBuffer<V>> {
        self.buffers.get(&kind).and_then(V::unwrap_ref)
    }

    /// Values of one vertex of the `kind` buffer.
    pub fn attribute<V: VertexValue>(&self, kind: VertexAttribute, vertex: usize) -> Option<&[V]> {
        self.vertex_buffer::<V>(kind)?.vertex(vertex)
    }

    /// First value of one vertex of the `kind` buffer.
    pub fn scalar<V: VertexValue>(&self, kind: VertexAttribute, vertex: usize) -> Option<V> {
        self.attribute::<V>(kind, vertex)?.first().cloned()
    }

    /// Current vertex count of the `kind` buffer, or 0 if absent.
    pub fn number_of_vertices(&self, kind: VertexAttribute) -> usize {
        self.buffers.get(&kind).map_or(0, AttributeBuffer::vertex_count)
    }

    /// Values per vertex of the `kind` buffer, or 0 if absent.
    pub fn values_per_vertex(&self, kind: VertexAttribute) -> usize {
        self.buffers.get(&kind).map_or(0, AttributeBuffer::values_per_vertex)
    }

    /// Allocated vertex capacity of the `kind` buffer, or 0 if absent.
    pub fn vertex_capacity(&self, kind: VertexAttribute) -> usize {
        self.buffers.get(&kind).map_or(0, AttributeBuffer::vertex_capacity)
    }

    pub fn contains(&self, kind: VertexAttribute) -> bool {
        self.buffers.contains_key(&kind)
    }

    /// Attribute kinds with a buffer, in enum order.
    pub fn attributes(&self) -> impl Iterator<Item = VertexAttribute> + '_ {
        self.buffers.keys().copied()
    }

    /// Index of the first vertex of a signed-integer buffer whose first value is `value`.
    pub fn find_first_location_of_integer_value(
        &self,
        kind: VertexAttribute,
        value: i32,
    ) -> Option<usize> {
        let buffer = self.vertex_buffer::<i32>(kind)?;
        buffer
            .values()
            .chunks_exact(buffer.values_per_vertex())
            .position(|vertex| vertex[0] == value)
    }

    /// Record the current id entry count as a location of `object_id`.
    ///
    /// Ids may repeat; each call records a new location.
    pub fn add_fast_search_id(&mut self, object_id: i32) {
        let location = self.fast_search_entries;
        self.fast_search_ids.entry(object_id).or_default().push(location);
        self.fast_search_entries += 1;
    }

    /// Location recorded by the first `add_fast_search_id(object_id)` call.
    pub fn find_first_fast_search_id_location(&self, object_id: i32) -> Option<usize> {
        self.fast_search_ids
            .get(&object_id)
            .and_then(|locations| locations.first().copied())
    }

    /// All locations recorded for `object_id`, in insertion order.
    pub fn all_fast_search_id_locations(&self, object_id: i32) -> &[usize] {
        self.fast_search_ids
            .get(&object_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reset every buffer to zero vertices, keeping capacity. Also drops the id index.
    pub fn clear_buffers(&mut self) {
        for buffer in self.buffers.values_mut() {
            buffer.clear();
        }
        self.fast_search_ids.clear();
        self.fast_search_entries = 0;
    }

    /// Reset one buffer to zero vertices, keeping capacity.
    pub fn clear_specified_buffer(&mut self, kind: VertexAttribute) {
        if let Some(buffer) = self.buffers.get_mut(&kind) {
            buffer.clear();
        }
    }
}

fn checked_values<V>(
    kind: VertexAttribute,
    values_per_vertex: usize,
    count: usize,
    values: &[V],
) -> VertexArrayResult<&[V]> {
    if values_per_vertex == 0 {
        return Err(VertexArrayError::InvalidArgument(format!(
            "{kind:?} needs at least one value per vertex"
        )));
    }
    let needed = values_per_vertex
        .checked_mul(count)
        .ok_or(VertexArrayError::AllocationFailed(usize::MAX))?;
    values.get(..needed).ok_or_else(|| {
        VertexArrayError::InvalidArgument(format!(
            "{kind:?} expected {needed} values, got {}",
            values.len()
        ))
    })
}

fn typed_buffer_mut<V: VertexValue>(
    kind: VertexAttribute,
    existing: &mut AttributeBuffer,
) -> VertexArrayResult<&mut VertexBuffer<V>> {
    let existing_type = existing.value_type();
    V::unwrap_mut(existing).ok_or_else(|| {
        log::error!("{kind:?} buffer holds {existing_type:?} values");
        VertexArrayError::ValueTypeMismatch {
            kind,
            existing: existing_type,
            requested: V::VALUE_TYPE,
        }
    })
}

fn check_values_per_vertex(
    kind: VertexAttribute,
    existing: usize,
    requested: usize,
) -> VertexArrayResult<()> {
    if existing == requested {
        Ok(())
    } else {
        log::error!("{kind:?} buffer has {existing} values per vertex, {requested} requested");
        Err(VertexArrayError::ValuesPerVertexMismatch {
            kind,
            existing,
            requested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(count: usize) -> Vec<f32> {
        (0..count * 3).map(|i| i as f32 * 0.5).collect()
    }

    #[test]
    fn test_add_and_read_back() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Position, 3, 2, &positions(2))
            .unwrap();

        let buffer = store.vertex_buffer::<f32>(VertexAttribute::Position).unwrap();
        assert_eq!(buffer.values_per_vertex(), 3);
        assert_eq!(buffer.vertex_count(), 2);
        assert_eq!(
            store.attribute::<f32>(VertexAttribute::Position, 1),
            Some(&[1.5, 2.0, 2.5][..])
        );
    }

    #[test]
    fn test_missing_buffer_sentinels() {
        let store = VertexAttributeStore::new();
        assert!(store.vertex_buffer::<f32>(VertexAttribute::Normal).is_none());
        assert_eq!(store.number_of_vertices(VertexAttribute::Normal), 0);
        assert_eq!(store.values_per_vertex(VertexAttribute::Normal), 0);
        assert_eq!(store.find_first_fast_search_id_location(4), None);
        assert!(store.all_fast_search_id_locations(4).is_empty());
    }

    #[test]
    fn test_batched_append_matches_single_append() {
        let all = positions(137);
        let mut single = VertexAttributeStore::new();
        single
            .add_float_attribute(VertexAttribute::Position, 3, 137, &all)
            .unwrap();

        for batch in [1usize, 2, 7, 50, 51, 136] {
            let mut batched = VertexAttributeStore::new();
            for chunk in all.chunks(batch * 3) {
                batched
                    .add_float_attribute(VertexAttribute::Position, 3, chunk.len() / 3, chunk)
                    .unwrap();
            }
            assert_eq!(
                batched.vertex_buffer::<f32>(VertexAttribute::Position).unwrap().values(),
                single.vertex_buffer::<f32>(VertexAttribute::Position).unwrap().values(),
                "batch size {batch}"
            );
        }
    }

    #[test]
    fn test_empty_append_creates_buffer() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Data, 2, 0, &[])
            .unwrap();
        assert!(store.contains(VertexAttribute::Data));
        assert_eq!(store.number_of_vertices(VertexAttribute::Data), 0);
        assert_eq!(store.values_per_vertex(VertexAttribute::Data), 2);
    }

    #[test]
    fn test_values_per_vertex_mismatch_rejected() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Normal, 3, 1, &[0.0, 0.0, 1.0])
            .unwrap();

        let err = store
            .add_float_attribute(VertexAttribute::Normal, 2, 1, &[0.0, 1.0])
            .unwrap_err();
        assert!(matches!(
            err,
            VertexArrayError::ValuesPerVertexMismatch { existing: 3, requested: 2, .. }
        ));
        assert_eq!(store.number_of_vertices(VertexAttribute::Normal), 1);
    }

    #[test]
    fn test_value_type_mismatch_rejected() {
        let mut store = VertexAttributeStore::new();
        store
            .add_unsigned_attribute(VertexAttribute::ElementIndexCount, 1, 1, &[4])
            .unwrap();
        assert!(store
            .add_integer_attribute(VertexAttribute::ElementIndexCount, 1, 1, &[4])
            .is_err());
        assert!(store.vertex_buffer::<i32>(VertexAttribute::ElementIndexCount).is_none());
        assert_eq!(store.number_of_vertices(VertexAttribute::ElementIndexCount), 1);
    }

    #[test]
    fn test_short_value_slice_rejected() {
        let mut store = VertexAttributeStore::new();
        assert!(store
            .add_float_attribute(VertexAttribute::Position, 3, 2, &[0.0; 5])
            .is_err());
        assert!(!store.contains(VertexAttribute::Position));
        assert!(store
            .add_float_attribute(VertexAttribute::Position, 0, 2, &[])
            .is_err());
    }

    #[test]
    fn test_replace_in_place() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Position, 3, 3, &positions(3))
            .unwrap();
        store
            .replace_attribute_at(VertexAttribute::Position, 1, 3, 2, &[9.0_f32; 6])
            .unwrap();
        let values = store.vertex_buffer::<f32>(VertexAttribute::Position).unwrap().values();
        assert_eq!(&values[0..3], &[0.0, 0.5, 1.0]);
        assert!(values[3..].iter().all(|&v| v == 9.0));
    }

    #[test]
    fn test_replace_out_of_range_rejected() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Position, 3, 2, &positions(2))
            .unwrap();
        let before = store.vertex_buffer::<f32>(VertexAttribute::Position).unwrap().clone();

        assert!(store
            .replace_attribute_at(VertexAttribute::Position, 1, 3, 2, &[1.0_f32; 6])
            .is_err());
        assert!(store
            .replace_attribute_at(VertexAttribute::Position, 2, 3, 0, &[] as &[f32])
            .is_err());
        assert!(store
            .replace_attribute_at(VertexAttribute::Position, 0, 2, 1, &[1.0_f32; 2])
            .is_err());
        assert!(store
            .replace_attribute_at(VertexAttribute::Normal, 0, 3, 1, &[1.0_f32; 3])
            .is_err());
        assert_eq!(store.vertex_buffer::<f32>(VertexAttribute::Position), Some(&before));
    }

    #[test]
    fn test_fast_search_id_round_trip() {
        let mut store = VertexAttributeStore::new();
        store.add_fast_search_id(7);
        store
            .add_float_attribute(VertexAttribute::Position, 3, 1, &[0.0; 3])
            .unwrap();
        store.add_fast_search_id(3);
        store.add_fast_search_id(7);
        store
            .add_integer_attribute(VertexAttribute::ObjectId, 1, 1, &[7])
            .unwrap();
        store.add_fast_search_id(7);

        assert_eq!(store.find_first_fast_search_id_location(7), Some(0));
        assert_eq!(store.find_first_fast_search_id_location(3), Some(1));
        assert_eq!(store.all_fast_search_id_locations(7), &[0, 2, 3]);
        assert_eq!(store.all_fast_search_id_locations(3), &[1]);
        assert_eq!(store.find_first_fast_search_id_location(8), None);
    }

    #[test]
    fn test_find_integer_value() {
        let mut store = VertexAttributeStore::new();
        store
            .add_integer_attribute(VertexAttribute::ObjectId, 1, 4, &[5, 9, 2, 9])
            .unwrap();
        assert_eq!(
            store.find_first_location_of_integer_value(VertexAttribute::ObjectId, 9),
            Some(1)
        );
        assert_eq!(store.find_first_location_of_integer_value(VertexAttribute::ObjectId, 4), None);
        assert_eq!(store.find_first_location_of_integer_value(VertexAttribute::VertexId, 9), None);
    }

    #[test]
    fn test_clear_buffers_retains_capacity() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Position, 3, 120, &positions(120))
            .unwrap();
        store
            .add_string_attribute(VertexAttribute::Label, 1, 1, &["x".to_string()])
            .unwrap();
        store.add_fast_search_id(1);
        let capacity = store.vertex_capacity(VertexAttribute::Position);

        store.clear_buffers();
        assert_eq!(store.number_of_vertices(VertexAttribute::Position), 0);
        assert_eq!(store.number_of_vertices(VertexAttribute::Label), 0);
        assert_eq!(store.vertex_capacity(VertexAttribute::Position), capacity);
        assert_eq!(store.find_first_fast_search_id_location(1), None);

        store.add_fast_search_id(1);
        assert_eq!(store.find_first_fast_search_id_location(1), Some(0));
    }

    #[test]
    fn test_clear_specified_buffer() {
        let mut store = VertexAttributeStore::new();
        store
            .add_float_attribute(VertexAttribute::Position, 3, 1, &[0.0; 3])
            .unwrap();
        store
            .add_float_attribute(VertexAttribute::Normal, 3, 1, &[0.0; 3])
            .unwrap();
        store.clear_specified_buffer(VertexAttribute::Normal);
        store.clear_specified_buffer(VertexAttribute::Tangent);
        assert_eq!(store.number_of_vertices(VertexAttribute::Position), 1);
        assert_eq!(store.number_of_vertices(VertexAttribute::Normal), 0);
    }
}
