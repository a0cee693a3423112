use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Scalar usable as a box coordinate.
pub trait Coordinate:
    Copy + PartialOrd + Default + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
}

impl Coordinate for i32 {}
impl Coordinate for f64 {}

fn min<T: Coordinate>(a: T, b: T) -> T {
    if b < a {
        b
    } else {
        a
    }
}

fn max<T: Coordinate>(a: T, b: T) -> T {
    if b > a {
        b
    } else {
        a
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Vector<T> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T> Vector<T> {
    pub const fn new(x: T, y: T, z: T) -> Self {
        Vector { x, y, z }
    }
}

impl<T: Coordinate> Vector<T> {
    fn zip_with(self, other: Self, f: impl Fn(T, T) -> T) -> Self {
        Vector::new(f(self.x, other.x), f(self.y, other.y), f(self.z, other.z))
    }
}

impl<T: Coordinate> Add for Vector<T> {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a + b)
    }
}

impl<T: Coordinate> Sub for Vector<T> {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a - b)
    }
}

impl<T: Coordinate> Mul for Vector<T> {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        self.zip_with(other, |a, b| a * b)
    }
}

impl<T> From<(T, T, T)> for Vector<T> {
    fn from((x, y, z): (T, T, T)) -> Self {
        Vector::new(x, y, z)
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Axis-aligned box described by its smallest corner and its size.
///
/// Values are immutable; every operation returns a new box.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BoundingBox<T = i32> {
    origin: Vector<T>,
    size: Vector<T>,
}

/// Box with floating point corners.
pub type FloatBox = BoundingBox<f64>;

impl<T: Coordinate> BoundingBox<T> {
    pub fn new(origin: impl Into<Vector<T>>, size: impl Into<Vector<T>>) -> Self {
        BoundingBox {
            origin: origin.into(),
            size: size.into(),
        }
    }

    /// The smallest position in the box.
    pub fn origin(&self) -> Vector<T> {
        self.origin
    }

    pub fn size(&self) -> Vector<T> {
        self.size
    }

    /// The dimension along the X axis.
    pub fn width(&self) -> T {
        self.size.x
    }

    /// The dimension along the Y axis.
    pub fn height(&self) -> T {
        self.size.y
    }

    /// The dimension along the Z axis.
    pub fn length(&self) -> T {
        self.size.z
    }

    pub fn min_x(&self) -> T {
        self.origin.x
    }

    pub fn min_y(&self) -> T {
        self.origin.y
    }

    pub fn min_z(&self) -> T {
        self.origin.z
    }

    pub fn max_x(&self) -> T {
        self.origin.x + self.size.x
    }

    pub fn max_y(&self) -> T {
        self.origin.y + self.size.y
    }

    pub fn max_z(&self) -> T {
        self.origin.z + self.size.z
    }

    /// The largest point of the box; origin plus size.
    pub fn maximum(&self) -> Vector<T> {
        self.origin + self.size
    }

    pub fn volume(&self) -> T {
        self.size.x * self.size.y * self.size.z
    }

    /// True when the box covers no cells.
    pub fn is_empty(&self) -> bool {
        let zero = T::default();
        !(self.size.x > zero && self.size.y > zero && self.size.z > zero)
    }

    /// Area both boxes have in common.
    ///
    /// Disjoint boxes yield a box of zero size on the separating axes.
    pub fn intersect(&self, other: &Self) -> Self {
        let origin = self.origin.zip_with(other.origin, max);
        let maximum = self.maximum().zip_with(other.maximum(), min);
        let size = (maximum - origin).zip_with(Vector::default(), max);

        BoundingBox { origin, size }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        let origin = self.origin.zip_with(other.origin, min);
        let maximum = self.maximum().zip_with(other.maximum(), max);

        BoundingBox {
            origin,
            size: maximum - origin,
        }
    }

    /// Grows the box by `d` on every side of every axis.
    pub fn expand(&self, d: T) -> Self {
        self.expand_xyz(d, d, d)
    }

    pub fn expand_xyz(&self, dx: T, dy: T, dz: T) -> Self {
        let delta = Vector::new(dx, dy, dz);

        BoundingBox {
            origin: self.origin - delta,
            size: self.size + delta + delta,
        }
    }

    /// Box with the same size moved to a new origin.
    pub fn with_origin(&self, origin: impl Into<Vector<T>>) -> Self {
        BoundingBox::new(origin, self.size)
    }

    pub fn contains(&self, position: impl Into<Vector<T>>) -> bool {
        let p = position.into();

        p.x >= self.min_x()
            && p.x < self.max_x()
            && p.y >= self.min_y()
            && p.y < self.max_y()
            && p.z >= self.min_z()
            && p.z < self.max_z()
    }
}

impl BoundingBox<i32> {
    /// The smallest chunk x coordinate touched by this box.
    pub fn min_chunk_x(&self) -> i32 {
        self.origin.x >> 4
    }

    pub fn min_chunk_z(&self) -> i32 {
        self.origin.z >> 4
    }

    /// One past the largest chunk x coordinate touched by this box.
    pub fn max_chunk_x(&self) -> i32 {
        ((self.max_x() - 1) >> 4) + 1
    }

    pub fn max_chunk_z(&self) -> i32 {
        ((self.max_z() - 1) >> 4) + 1
    }

    /// This box extended to chunk boundaries, spanning `height` vertically.
    pub fn chunk_box(&self, height: i32) -> BoundingBox {
        BoundingBox::new(
            (self.min_chunk_x() << 4, 0, self.min_chunk_z() << 4),
            (
                (self.max_chunk_x() - self.min_chunk_x()) << 4,
                height,
                (self.max_chunk_z() - self.min_chunk_z()) << 4,
            ),
        )
    }

    pub fn chunk_positions(&self) -> ChunkPositions {
        ChunkPositions::new(
            self.min_chunk_x(),
            self.max_chunk_x(),
            self.min_chunk_z(),
            self.max_chunk_z(),
        )
    }

    pub fn chunk_count(&self) -> usize {
        let width = (self.max_chunk_x() - self.min_chunk_x()).max(0) as usize;
        let length = (self.max_chunk_z() - self.min_chunk_z()).max(0) as usize;

        width * length
    }

    pub fn is_chunk_aligned(&self) -> bool {
        self.origin.x & 0xf == 0 && self.origin.z & 0xf == 0
    }

    /// Every integer cell inside the box, x innermost.
    pub fn positions(&self) -> Positions {
        Positions {
            bounds: *self,
            next: if self.is_empty() {
                None
            } else {
                Some(self.origin)
            },
        }
    }

    pub fn to_float(&self) -> FloatBox {
        let convert = |v: Vector<i32>| Vector::new(v.x as f64, v.y as f64, v.z as f64);

        BoundingBox::new(convert(self.origin), convert(self.size))
    }
}

impl<T: Coordinate + fmt::Display> fmt::Display for BoundingBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoundingBox({}, {})", self.origin, self.size)
    }
}

/// Chunk coordinates covered by a box, z outermost.
#[derive(Debug, Clone)]
pub struct ChunkPositions {
    min_x: i32,
    max_x: i32,
    max_z: i32,
    x: i32,
    z: i32,
}

impl ChunkPositions {
    fn new(min_x: i32, max_x: i32, min_z: i32, max_z: i32) -> Self {
        ChunkPositions {
            min_x,
            max_x,
            max_z,
            x: min_x,
            z: min_z,
        }
    }
}

impl Iterator for ChunkPositions {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        if self.min_x >= self.max_x || self.z >= self.max_z {
            return None;
        }

        let position = (self.x, self.z);

        self.x += 1;

        if self.x >= self.max_x {
            self.x = self.min_x;
            self.z += 1;
        }

        Some(position)
    }
}

/// Integer cells of a box.
#[derive(Debug, Clone)]
pub struct Positions {
    bounds: BoundingBox,
    next: Option<Vector<i32>>,
}

impl Iterator for Positions {
    type Item = Vector<i32>;

    fn next(&mut self) -> Option<Vector<i32>> {
        let current = self.next?;
        let mut following = current;

        following.x += 1;

        if following.x >= self.bounds.max_x() {
            following.x = self.bounds.min_x();
            following.y += 1;

            if following.y >= self.bounds.max_y() {
                following.y = self.bounds.min_y();
                following.z += 1;
            }
        }

        self.next = if following.z >= self.bounds.max_z() {
            None
        } else {
            Some(following)
        };

        Some(current)
    }
}
