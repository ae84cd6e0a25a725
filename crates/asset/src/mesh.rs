//! CPU-side mesh representation used by loaders.

/// Floats per interleaved vertex: position(3) + uv(2) + normal(3).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Vertex with position/uv/normal. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            uv,
            normal,
        }
    }

    /// Interleaved `(px, py, pz, u, v, nx, ny, nz)`.
    pub fn to_array(&self) -> [f32; FLOATS_PER_VERTEX] {
        let [px, py, pz] = self.position;
        let [u, v] = self.uv;
        let [nx, ny, nz] = self.normal;
        [px, py, pz, u, v, nx, ny, nz]
    }
}

/// Non-indexed triangle list: every 3 consecutive vertices form one triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>) -> Self {
        Self { vertices }
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Flat float array ready for upload, stride [`FLOATS_PER_VERTEX`].
    pub fn interleaved(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interleaves_in_position_uv_normal_order() {
        let v = MeshVertex::new([1.0, 2.0, 3.0], [0.25, 0.75], [0.0, 0.0, 1.0]);
        let data = MeshData::new(vec![v; 3]);
        let flat = data.interleaved();
        assert_eq!(flat.len(), 3 * FLOATS_PER_VERTEX);
        assert_eq!(&flat[..8], &[1.0, 2.0, 3.0, 0.25, 0.75, 0.0, 0.0, 1.0]);
        assert_eq!(data.triangle_count(), 1);
    }

    #[test]
    fn empty_mesh_has_no_triangles() {
        let data = MeshData::default();
        assert_eq!(data.triangle_count(), 0);
        assert!(data.interleaved().is_empty());
    }
}
