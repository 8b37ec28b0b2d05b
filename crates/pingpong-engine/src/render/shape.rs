/// Fixed index topology of a renderable shape.
///
/// Indices are `u32` and describe a triangle list.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Shape {
    /// Two triangles over four vertices authored as top-right, bottom-left,
    /// bottom-right, top-left.
    Quad,
    Triangle,
}

const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 0, 3];
const TRIANGLE_INDICES: [u32; 3] = [0, 1, 2];

impl Shape {
    pub const fn indices(self) -> &'static [u32] {
        match self {
            Shape::Quad => &QUAD_INDICES,
            Shape::Triangle => &TRIANGLE_INDICES,
        }
    }

    pub const fn vertex_count(self) -> usize {
        match self {
            Shape::Quad => 4,
            Shape::Triangle => 3,
        }
    }

    pub const fn index_count(self) -> u32 {
        self.indices().len() as u32
    }

    pub const fn label(self) -> &'static str {
        match self {
            Shape::Quad => "quad",
            Shape::Triangle => "triangle",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_stay_within_vertex_count() {
        for shape in [Shape::Quad, Shape::Triangle] {
            assert!(shape.indices().iter().all(|&i| (i as usize) < shape.vertex_count()));
        }
    }

    #[test]
    fn index_counts() {
        assert_eq!(Shape::Quad.index_count(), 6);
        assert_eq!(Shape::Triangle.index_count(), 3);
        assert_eq!(Shape::Quad.indices(), &[0, 1, 2, 1, 0, 3]);
    }

    #[test]
    fn quad_triangles_are_distinct() {
        let i = Shape::Quad.indices();
        let mut a = [i[0], i[1], i[2]];
        let mut b = [i[3], i[4], i[5]];
        a.sort();
        b.sort();
        assert_ne!(a, b);
    }
}
