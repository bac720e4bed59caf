//! Mesh geometry types.

/// A vertex in the output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space, block-centred (one block spans -8..8).
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates in model texture space (0-16).
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// A triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Triangle indices (3 per triangle).
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single quad from four corners given in order around its edge.
    pub fn quad(positions: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) -> Self {
        let mut mesh = Self::new();
        let v: Vec<u32> = positions
            .iter()
            .zip(uvs.iter())
            .map(|(p, uv)| mesh.add_vertex(Vertex::new(*p, normal, *uv)))
            .collect();
        mesh.add_quad(v[0], v[1], v[2], v[3]);
        mesh
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a quad (two triangles) by vertex indices.
    /// Vertices are provided in order around the quad.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        // First triangle: 0, 2, 1
        self.add_triangle(i0, i2, i1);
        // Second triangle: 0, 3, 2
        self.add_triangle(i0, i3, i2);
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate triangles as vertex triples.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
        self.indices.chunks_exact(3).map(move |t| {
            [
                &self.vertices[t[0] as usize],
                &self.vertices[t[1] as usize],
                &self.vertices[t[2] as usize],
            ]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mut mesh = Mesh::new();
        assert!(mesh.is_empty());

        let v0 = mesh.add_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0]));

        mesh.add_triangle(v0, v1, v2);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn test_mesh_quad() {
        let mesh = Mesh::quad(
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
            [0.0, 1.0, 0.0],
            [[0.0, 0.0], [16.0, 0.0], [16.0, 16.0], [0.0, 16.0]],
        );

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 2, 1, 0, 3, 2]);
        assert_eq!(mesh.vertices[2].uv, [16.0, 16.0]);
    }
}
