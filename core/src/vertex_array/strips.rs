//! Triangle strip index tables for structured surfaces.

use super::VertexAttribute;
use super::error::VertexArrayResult;
use super::store::VertexAttributeStore;

/// Topology of the parameter domain of a surface primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ElementShape {
    /// Rectangular `n_xi1 × n_xi2` grid.
    #[default]
    Unspecified,
    /// Triangular domain with `n_xi1` points along each edge.
    Simplex,
}

impl VertexAttributeStore {
    /// Append strip tables for a surface whose points start at `vertex_start`.
    ///
    /// Writes one `StripStart` and one `NumberOfStrips` entry for the surface,
    /// then for each strip its `StripIndexStart`, `NumberOfPointsForStrip` and
    /// the strip's indices into `StripIndexArray`. Strip and index offsets
    /// continue from the tables of previously filled surfaces.
    pub fn fill_element_index(
        &mut self,
        vertex_start: u32,
        n_xi1: u32,
        n_xi2: u32,
        shape: ElementShape,
    ) -> VertexArrayResult<()> {
        let strip_start = self.next_strip_start();
        self.add_unsigned_attribute(VertexAttribute::StripStart, 1, 1, &[strip_start])?;

        let mut index_start = self.next_strip_index_start();
        let number_of_strips = n_xi1.saturating_sub(1);
        self.add_unsigned_attribute(VertexAttribute::NumberOfStrips, 1, 1, &[number_of_strips])?;

        match shape {
            ElementShape::Simplex => {
                for strip in 0..number_of_strips {
                    let points_per_strip = (n_xi1 - strip) * 2 - 1;
                    let mut index = strip;
                    let mut indices = Vec::with_capacity(points_per_strip as usize);
                    for j in 0..points_per_strip {
                        indices.push(index + vertex_start);
                        if j & 1 == 1 {
                            index += number_of_strips - (j >> 1);
                        } else {
                            index += 1;
                        }
                    }
                    self.push_strip(&indices, index_start)?;
                    index_start += points_per_strip;
                }
            }
            ElementShape::Unspecified => {
                let points_per_strip = 2 * n_xi2;
                if points_per_strip > 0 {
                    for strip in 0..number_of_strips {
                        let mut index = strip;
                        let mut indices = Vec::with_capacity(points_per_strip as usize);
                        for j in 0..points_per_strip {
                            indices.push(index + vertex_start);
                            if j & 1 == 1 {
                                index += number_of_strips;
                            } else {
                                index += 1;
                            }
                        }
                        self.push_strip(&indices, index_start)?;
                        index_start += points_per_strip;
                    }
                }
            }
        }
        Ok(())
    }

    fn next_strip_start(&self) -> u32 {
        let entries = self.number_of_vertices(VertexAttribute::StripStart);
        if entries == 0 {
            return 0;
        }
        let last_start = self.scalar::<u32>(VertexAttribute::StripStart, entries - 1);
        let last_strips = self.scalar::<u32>(VertexAttribute::NumberOfStrips, entries - 1);
        last_start.unwrap_or(0) + last_strips.unwrap_or(0)
    }

    fn next_strip_index_start(&self) -> u32 {
        let entries = self.number_of_vertices(VertexAttribute::StripIndexStart);
        if entries == 0 {
            return 0;
        }
        let last_start = self.scalar::<u32>(VertexAttribute::StripIndexStart, entries - 1);
        let last_points = self.scalar::<u32>(VertexAttribute::NumberOfPointsForStrip, entries - 1);
        last_start.unwrap_or(0) + last_points.unwrap_or(0)
    }

    fn push_strip(&mut self, indices: &[u32], index_start: u32) -> VertexArrayResult<()> {
        self.add_unsigned_attribute(VertexAttribute::StripIndexArray, 1, indices.len(), indices)?;
        self.add_unsigned_attribute(VertexAttribute::StripIndexStart, 1, 1, &[index_start])?;
        self.add_unsigned_attribute(
            VertexAttribute::NumberOfPointsForStrip,
            1,
            1,
            &[indices.len() as u32],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned(store: &VertexAttributeStore, kind: VertexAttribute) -> Vec<u32> {
        store
            .vertex_buffer::<u32>(kind)
            .map(|buffer| buffer.values().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_grid_strips() {
        let mut store = VertexAttributeStore::new();
        store
            .fill_element_index(0, 3, 2, ElementShape::Unspecified)
            .unwrap();

        assert_eq!(unsigned(&store, VertexAttribute::StripStart), vec![0]);
        assert_eq!(unsigned(&store, VertexAttribute::NumberOfStrips), vec![2]);
        assert_eq!(unsigned(&store, VertexAttribute::NumberOfPointsForStrip), vec![4, 4]);
        assert_eq!(unsigned(&store, VertexAttribute::StripIndexStart), vec![0, 4]);
        // zig-zag: +1 after even steps, +strips after odd steps
        assert_eq!(
            unsigned(&store, VertexAttribute::StripIndexArray),
            vec![0, 1, 3, 4, 1, 2, 4, 5]
        );
    }

    #[test]
    fn test_simplex_strips() {
        let mut store = VertexAttributeStore::new();
        store.fill_element_index(10, 3, 0, ElementShape::Simplex).unwrap();

        assert_eq!(unsigned(&store, VertexAttribute::NumberOfStrips), vec![2]);
        // strip i has 2 * (n_xi1 - i) - 1 points
        assert_eq!(unsigned(&store, VertexAttribute::NumberOfPointsForStrip), vec![5, 3]);
        assert_eq!(unsigned(&store, VertexAttribute::StripIndexStart), vec![0, 5]);
        assert_eq!(
            unsigned(&store, VertexAttribute::StripIndexArray),
            vec![10, 11, 13, 14, 15, 11, 12, 14]
        );
    }

    #[test]
    fn test_second_surface_continues_offsets() {
        let mut store = VertexAttributeStore::new();
        store
            .fill_element_index(0, 3, 2, ElementShape::Unspecified)
            .unwrap();
        store
            .fill_element_index(6, 2, 2, ElementShape::Unspecified)
            .unwrap();

        assert_eq!(unsigned(&store, VertexAttribute::StripStart), vec![0, 2]);
        assert_eq!(unsigned(&store, VertexAttribute::NumberOfStrips), vec![2, 1]);
        assert_eq!(unsigned(&store, VertexAttribute::StripIndexStart), vec![0, 4, 8]);
        let indices = unsigned(&store, VertexAttribute::StripIndexArray);
        assert_eq!(&indices[8..], &[6, 7, 8, 9]);
    }

    #[test]
    fn test_single_row_has_no_strips() {
        let mut store = VertexAttributeStore::new();
        store
            .fill_element_index(0, 1, 4, ElementShape::Unspecified)
            .unwrap();
        assert_eq!(unsigned(&store, VertexAttribute::NumberOfStrips), vec![0]);
        assert_eq!(store.number_of_vertices(VertexAttribute::StripIndexArray), 0);
    }
}
