use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// Homogeneous 4-component vector.
///
/// Used for node positions and render offsets in clip space. `w` is carried
/// through unchanged by the shader; offsets normally keep it at `0.0`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vec4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vec4 {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Offset along the x axis only.
    #[inline]
    pub const fn x_axis(x: f32) -> Self {
        Self::new(x, 0.0, 0.0, 0.0)
    }

    /// Offset along the y axis only.
    #[inline]
    pub const fn y_axis(y: f32) -> Self {
        Self::new(0.0, y, 0.0, 0.0)
    }

    #[inline]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }
}

impl Add for Vec4 {
    type Output = Vec4;
    #[inline]
    fn add(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z, self.w + rhs.w)
    }
}

impl Sub for Vec4 {
    type Output = Vec4;
    #[inline]
    fn sub(self, rhs: Vec4) -> Vec4 {
        Vec4::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z, self.w - rhs.w)
    }
}

impl AddAssign for Vec4 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec4) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec4 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec4) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vec4 {
    type Output = Vec4;
    #[inline]
    fn mul(self, rhs: f32) -> Vec4 {
        Vec4::new(self.x * rhs, self.y * rhs, self.z * rhs, self.w * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_four_packed_floats() {
        assert_eq!(std::mem::size_of::<Vec4>(), 16);
        let v = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let bytes: &[u8] = bytemuck::bytes_of(&v);
        let floats: &[f32] = bytemuck::cast_slice(bytes);
        assert_eq!(floats, &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn sub_assign_moves_left() {
        let mut p = Vec4::zero();
        p -= Vec4::x_axis(0.25);
        assert_eq!(p, Vec4::new(-0.25, 0.0, 0.0, 0.0));
    }

    #[test]
    fn scale_and_add() {
        let v = Vec4::y_axis(0.5) * 0.1 + Vec4::x_axis(1.0);
        assert!((v.y - 0.05).abs() < 1e-6);
        assert_eq!(v.x, 1.0);
    }
}
