use std::ops::{
    Index,
    IndexMut,
    RangeBounds,
};

use nalgebra::{
    Point2,
    Vector2,
    Vector3,
};

use crate::util::{
    PointIter,
    iter_points,
};

/// Maps 2-D grid points to indices into a flat buffer, x fastest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strider {
    strides: Vector3<usize>,
    size: Vector2<usize>,
}

impl Strider {
    pub fn new(size: &Vector2<usize>) -> Self {
        Self {
            strides: strides_for_size(size),
            size: *size,
        }
    }

    pub fn square(side: usize) -> Self {
        Self::new(&Vector2::repeat(side))
    }

    pub fn point_unchecked(&self, index: usize) -> Point2<usize> {
        Point2::new(index % self.strides.y, index / self.strides.y)
    }

    pub fn point(&self, index: usize) -> Option<Point2<usize>> {
        (index < self.strides.z).then(|| self.point_unchecked(index))
    }

    pub fn index_unchecked(&self, point: &Point2<usize>) -> usize {
        point.coords.dot(&self.strides.xy())
    }

    pub fn index(&self, point: &Point2<usize>) -> Option<usize> {
        self.is_inside(point).then(|| self.index_unchecked(point))
    }

    pub fn size(&self) -> &Vector2<usize> {
        &self.size
    }

    /// Length of one row, i.e. the distance between `(x, y)` and `(x, y + 1)`
    /// in the buffer.
    pub fn row_len(&self) -> usize {
        self.strides.y
    }

    pub fn len(&self) -> usize {
        self.strides.z
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self, range: impl RangeBounds<Point2<usize>>) -> StriderIter {
        StriderIter {
            points: iter_points(range, self.size),
            strider: *self,
        }
    }

    pub fn is_inside(&self, point: &Point2<usize>) -> bool {
        point.x < self.size.x && point.y < self.size.y
    }
}

#[derive(Clone, Copy, Debug)]
pub struct StriderIter {
    points: PointIter,
    strider: Strider,
}

impl Iterator for StriderIter {
    type Item = (usize, Point2<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let point = self.points.next()?;
        let index = self.strider.index_unchecked(&point);
        Some((index, point))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.points.size_hint()
    }
}

impl ExactSizeIterator for StriderIter {}

pub fn strides_for_size(size: &Vector2<usize>) -> Vector3<usize> {
    let mut strides = Vector3::zeros();
    strides.x = 1;
    strides.y = strides.x * size.x;
    strides.z = strides.y * size.y;
    strides
}

/// Flat buffer of per-cell values. The layout is defined by a [`Strider`]
/// that is kept alongside.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice<T> {
    data: Box<[T]>,
}

impl<T> Lattice<T>
where
    T: Default,
{
    pub fn from_default(strider: &Strider) -> Self {
        Self::from_fn(strider, |_, _| Default::default())
    }
}

impl<T> Lattice<T>
where
    T: Clone,
{
    pub fn from_value(strider: &Strider, value: T) -> Self {
        Self {
            data: vec![value; strider.len()].into_boxed_slice(),
        }
    }
}

impl<T> Lattice<T> {
    pub fn from_fn(strider: &Strider, mut init: impl FnMut(usize, Point2<usize>) -> T) -> Self {
        let data = (0..strider.len())
            .map(|index| init(index, strider.point_unchecked(index)))
            .collect();
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_point(&self, strider: &Strider, point: &Point2<usize>) -> Option<&T> {
        let index = strider.index(point)?;
        self.data.get(index)
    }

    pub fn get_point_mut(&mut self, strider: &Strider, point: &Point2<usize>) -> Option<&mut T> {
        let index = strider.index(point)?;
        self.data.get_mut(index)
    }

    pub fn iter(
        &self,
        strider: &Strider,
        range: impl RangeBounds<Point2<usize>>,
    ) -> impl Iterator<Item = (usize, Point2<usize>, &T)> {
        strider
            .iter(range)
            .map(|(index, point)| (index, point, &self.data[index]))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T> Index<usize> for Lattice<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<T> IndexMut<usize> for Lattice<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.data[index]
    }
}
