use serde::{Deserialize, Serialize};

/// Axis-aligned pixel box with a top-left origin, stored as `[x, y, w, h]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }

    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    pub fn contains(&self, other: &Self) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.right() >= other.right()
            && self.bottom() >= other.bottom()
    }

    /// Union of every present box, `None` when the iterator yields nothing.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BoundingBox>) -> Option<Self> {
        boxes.into_iter().fold(None, |acc, bbox| match acc {
            Some(acc) => Some(bbox.union(&acc)),
            None => Some(*bbox),
        })
    }
}

impl From<[u32; 4]> for BoundingBox {
    fn from([x, y, width, height]: [u32; 4]) -> Self {
        Self::new(x, y, width, height)
    }
}

impl From<BoundingBox> for [u32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.x, bbox.y, bbox.width, bbox.height]
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<[i32; 2]> for Point {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Point> for [i32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Text baseline from `start` to `end`, stored as `[[x1, y1], [x2, y2]]`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(from = "[Point; 2]", into = "[Point; 2]")]
pub struct Baseline {
    pub start: Point,
    pub end: Point,
}

impl Baseline {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

impl From<[Point; 2]> for Baseline {
    fn from([start, end]: [Point; 2]) -> Self {
        Self::new(start, end)
    }
}

impl From<Baseline> for [Point; 2] {
    fn from(baseline: Baseline) -> Self {
        [baseline.start, baseline.end]
    }
}

pub fn pixel_to_cm(pixels: u32, ppi: u32) -> f64 {
    if ppi == 0 {
        return 0.0;
    }
    f64::from(pixels) / f64::from(ppi) * 2.54
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn computes_union() {
        let a = BoundingBox::new(0, 0, 10, 10);
        let b = BoundingBox::new(5, 5, 10, 10);
        assert_eq!(a.union(&b), BoundingBox::new(0, 0, 15, 15));
        assert!(a.union(&b).contains(&a));
    }

    #[test]
    fn union_all_of_nothing_is_none() {
        assert_eq!(BoundingBox::union_all(std::iter::empty()), None);
    }

    #[test]
    fn serializes_as_arrays() {
        let bbox = BoundingBox::new(1, 2, 3, 4);
        assert_eq!(serde_json::to_string(&bbox).unwrap(), "[1,2,3,4]");

        let baseline = Baseline::new(Point::new(1, 2), Point::new(3, 4));
        assert_eq!(serde_json::to_string(&baseline).unwrap(), "[[1,2],[3,4]]");
    }

    #[test]
    fn converts_pixels_to_centimetres() {
        assert_eq!(pixel_to_cm(300, 300), 2.54);
        assert_eq!(pixel_to_cm(300, 0), 0.0);
    }
}
