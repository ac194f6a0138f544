use std::ops::{
    Bound,
    Range,
    RangeBounds,
};

use nalgebra::{
    Point2,
    Vector2,
};

pub fn format_size<T>(value: T) -> humansize::SizeFormatter<T, humansize::FormatSizeOptions>
where
    T: humansize::ToF64 + humansize::Unsigned,
{
    humansize::SizeFormatter::new(value, humansize::BINARY)
}

pub fn iter_points(range: impl RangeBounds<Point2<usize>>, size: Vector2<usize>) -> PointIter {
    let Range { start, end } = normalize_point_bounds(range, size);

    PointIter {
        x0: start.coords,
        x1: end.coords,
        x: (start.x < end.x && start.y < end.y).then_some(start.coords),
    }
}

pub fn normalize_point_bounds(
    range: impl RangeBounds<Point2<usize>>,
    size: Vector2<usize>,
) -> Range<Point2<usize>> {
    let start = match range.start_bound() {
        Bound::Included(start) => *start,
        Bound::Excluded(start) => start + Vector2::repeat(1),
        Bound::Unbounded => Point2::origin(),
    };

    let end = match range.end_bound() {
        Bound::Included(end) => end + Vector2::repeat(1),
        Bound::Excluded(end) => *end,
        Bound::Unbounded => size.into(),
    };

    let end = start
        .coords
        .zip_map(&end.coords, |x0, x1| x0.max(x1))
        .into();

    Range { start, end }
}

/// Iterates over the points of a rectangle, x fastest.
#[derive(Clone, Copy, Debug)]
pub struct PointIter {
    x0: Vector2<usize>,
    x1: Vector2<usize>,
    x: Option<Vector2<usize>>,
}

impl Iterator for PointIter {
    type Item = Point2<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let next = |mut x_n: Vector2<usize>| {
            x_n.x += 1;
            if x_n.x >= self.x1.x {
                x_n.x = self.x0.x;
                x_n.y += 1;
                if x_n.y >= self.x1.y {
                    return None;
                }
            }
            Some(x_n)
        };

        if let Some(x) = self.x {
            self.x = next(x);
            Some(Point2::from(x))
        }
        else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.x.map_or(0, |x| {
            let width = self.x1.x - self.x0.x;
            (self.x1.y - x.y - 1) * width + (self.x1.x - x.x)
        });
        (n, Some(n))
    }
}

impl ExactSizeIterator for PointIter {}
