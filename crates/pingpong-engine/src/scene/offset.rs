use std::cell::Cell;
use std::rc::Rc;

use crate::coords::Vec4;

/// Position shared between a node and the components that render at it.
///
/// Cloning yields another handle to the same value; the value lives as long as
/// the last handle. Single-threaded by construction.
#[derive(Debug, Clone, Default)]
pub struct SharedOffset(Rc<Cell<Vec4>>);

impl SharedOffset {
    pub fn new(value: Vec4) -> Self {
        Self(Rc::new(Cell::new(value)))
    }

    #[inline]
    pub fn get(&self) -> Vec4 {
        self.0.get()
    }

    #[inline]
    pub fn set(&self, value: Vec4) {
        self.0.set(value);
    }

    /// Adds `delta` to the stored value.
    #[inline]
    pub fn translate(&self, delta: Vec4) {
        self.0.set(self.0.get() + delta);
    }

    /// True if both handles refer to the same value.
    pub fn same_as(&self, other: &SharedOffset) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_observe_writes() {
        let a = SharedOffset::default();
        let b = a.clone();
        a.translate(Vec4::x_axis(0.5));
        assert_eq!(b.get(), Vec4::new(0.5, 0.0, 0.0, 0.0));
        assert!(a.same_as(&b));
        assert!(!a.same_as(&SharedOffset::default()));
    }
}
