//! # Vertex Module
//!
//! The vertex layout produced by mesh extraction, plus the per-chunk buffer
//! that collects it. The layout is `#[repr(C)]` and [`bytemuck`]-castable so
//! a consumer can upload the buffers directly without a conversion pass.

use bytemuck::{Pod, Zeroable};
use cgmath::Point2;

/// One vertex of an emitted block face.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FaceVertex {
    /// World-space position of the vertex.
    pub position: [f32; 3],
    /// Outward unit normal of the face this vertex belongs to.
    pub normal: [f32; 3],
    /// Texture coordinates into the atlas region for the face's texture.
    pub uv: [f32; 2],
    /// Ambient occlusion brightness in `[0, 1]`; 1 is fully unoccluded.
    pub ao: f32,
}

/// The extracted mesh of one chunk: a vertex buffer and an index buffer,
/// four vertices and six indices per visible face.
#[derive(Debug, Clone)]
pub struct FaceBuffer {
    /// Chunk coordinates of the chunk this mesh was extracted from.
    pub chunk_position: Point2<i32>,
    /// All face vertices, in emission order.
    pub vertices: Vec<FaceVertex>,
    /// Triangle list indices into `vertices`, two triangles per face.
    pub indices: Vec<u32>,
}

impl FaceBuffer {
    /// Creates an empty buffer for the given chunk.
    pub fn new(chunk_position: Point2<i32>) -> Self {
        FaceBuffer {
            chunk_position,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// True if no faces were emitted (a fully hidden or fully air chunk).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of emitted faces.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

impl Default for FaceBuffer {
    fn default() -> Self {
        FaceBuffer::new(Point2::new(0, 0))
    }
}
