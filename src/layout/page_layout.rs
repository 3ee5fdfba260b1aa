use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::geometry::BoundingBox;
use crate::layout::error::{LayoutError, Result};
use crate::layout::ocr_box::{OcrBox, Ordered};

/// Ordered page regions plus the page extent and header/footer margins.
///
/// Every mutating operation leaves `boxes[i].order() == i` for all `i`.
/// Positions are always bounds-checked; nothing is clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout<B = OcrBox> {
    #[serde(default)]
    boxes: Vec<B>,
    #[serde(default)]
    pub region: BoundingBox,
    /// Header margin, measured from the top of `region`.
    #[serde(default)]
    pub header_y: u32,
    /// Footer margin, measured from the bottom of `region`.
    #[serde(default)]
    pub footer_y: u32,
}

impl<B> Default for PageLayout<B> {
    fn default() -> Self {
        Self {
            boxes: Vec::new(),
            region: BoundingBox::default(),
            header_y: 0,
            footer_y: 0,
        }
    }
}

impl<B: Ordered> PageLayout<B> {
    /// Wraps `boxes` as given; their `order` fields are left untouched so a
    /// recorded order can be applied with [`PageLayout::sort_by_order`].
    pub fn new(boxes: Vec<B>) -> Self {
        Self {
            boxes,
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: BoundingBox) -> Self {
        self.region = region;
        self
    }

    pub fn with_margins(mut self, header_y: u32, footer_y: u32) -> Self {
        self.header_y = header_y;
        self.footer_y = footer_y;
        self
    }

    pub fn boxes(&self) -> &[B] {
        &self.boxes
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, B> {
        self.boxes.iter()
    }

    fn out_of_range(&self, index: usize) -> LayoutError {
        LayoutError::IndexOutOfRange {
            index,
            len: self.boxes.len(),
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.boxes.len() {
            Ok(())
        } else {
            Err(self.out_of_range(index))
        }
    }

    fn update_order(&mut self) {
        for (index, item) in self.boxes.iter_mut().enumerate() {
            item.set_order(index);
        }
    }

    pub fn get(&self, index: usize) -> Result<&B> {
        self.boxes.get(index).ok_or_else(|| self.out_of_range(index))
    }

    /// Inserts at `index`, or appends when `index` is `None`.
    pub fn add(&mut self, item: B, index: Option<usize>) -> Result<()> {
        let index = index.unwrap_or(self.boxes.len());
        if index > self.boxes.len() {
            return Err(self.out_of_range(index));
        }
        self.boxes.insert(index, item);
        self.update_order();
        debug!(index, len = self.boxes.len(), "added layout box");
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<B> {
        self.check_index(index)?;
        let removed = self.boxes.remove(index);
        self.update_order();
        debug!(index, len = self.boxes.len(), "removed layout box");
        Ok(removed)
    }

    /// Moves the box at `index` so that it ends up at `new_index`.
    ///
    /// `new_index` is a position in the sequence after the box is taken out,
    /// so its valid range is `0..len`.
    pub fn move_box(&mut self, index: usize, new_index: usize) -> Result<()> {
        self.check_index(index)?;
        self.check_index(new_index)?;
        let item = self.boxes.remove(index);
        self.boxes.insert(new_index, item);
        self.update_order();
        debug!(from = index, to = new_index, "moved layout box");
        Ok(())
    }

    /// Overwrites the box at `index` and returns the previous one.
    pub fn replace(&mut self, index: usize, item: B) -> Result<B> {
        self.check_index(index)?;
        let previous = std::mem::replace(&mut self.boxes[index], item);
        self.update_order();
        Ok(previous)
    }

    pub fn set(&mut self, index: usize, item: B) -> Result<()> {
        self.replace(index, item).map(drop)
    }

    pub fn delete(&mut self, index: usize) -> Result<()> {
        self.remove(index).map(drop)
    }

    /// Stable-sorts by the boxes' current `order` fields, then renumbers.
    pub fn sort_by_order(&mut self) {
        self.boxes.sort_by_key(|item| item.order());
        self.update_order();
    }

    /// The content band between the header and footer margins.
    pub fn get_page_region(&self) -> Result<BoundingBox> {
        let height = i64::from(self.region.height)
            - i64::from(self.header_y)
            - i64::from(self.footer_y);
        if height <= 0 {
            warn!(
                region_height = self.region.height,
                header_y = self.header_y,
                footer_y = self.footer_y,
                "header and footer margins leave no content band"
            );
            return Err(LayoutError::DegenerateRegion { height });
        }
        // `height` is positive and at most `region.height`.
        let height = u32::try_from(height).unwrap_or(self.region.height);
        Ok(BoundingBox::new(
            self.region.x,
            self.header_y,
            self.region.width,
            height,
        ))
    }
}

impl<'a, B> IntoIterator for &'a PageLayout<B> {
    type Item = &'a B;
    type IntoIter = std::slice::Iter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.boxes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::ocr_box::BoxKind;
    use pretty_assertions::assert_eq;

    fn ocr_box(x: u32) -> OcrBox {
        OcrBox::new(BoundingBox::new(x, 0, 10, 10), BoxKind::Text)
    }

    fn layout(count: u32) -> PageLayout {
        let mut layout = PageLayout::new(Vec::new());
        for x in 0..count {
            layout.add(ocr_box(x), None).unwrap();
        }
        layout
    }

    fn xs(layout: &PageLayout) -> Vec<u32> {
        layout.iter().map(|b| b.bbox.x).collect()
    }

    fn assert_dense(layout: &PageLayout) {
        for (index, item) in layout.iter().enumerate() {
            assert_eq!(item.order, index);
        }
    }

    #[test]
    fn add_appends_or_inserts() {
        let mut layout = layout(2);
        layout.add(ocr_box(9), Some(1)).unwrap();
        assert_eq!(xs(&layout), vec![0, 9, 1]);
        layout.add(ocr_box(7), Some(3)).unwrap();
        assert_eq!(xs(&layout), vec![0, 9, 1, 7]);
        assert_dense(&layout);
    }

    #[test]
    fn add_past_end_is_rejected() {
        let mut layout = layout(2);
        let err = layout.add(ocr_box(9), Some(3)).unwrap_err();
        assert_eq!(err, LayoutError::IndexOutOfRange { index: 3, len: 2 });
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn remove_renumbers() {
        let mut layout = layout(3);
        let removed = layout.remove(0).unwrap();
        assert_eq!(removed.bbox.x, 0);
        assert_eq!(xs(&layout), vec![1, 2]);
        assert_dense(&layout);
        assert!(layout.remove(2).is_err());
    }

    #[test]
    fn move_forward_and_backward() {
        let mut layout = layout(4);
        layout.move_box(0, 3).unwrap();
        assert_eq!(xs(&layout), vec![1, 2, 3, 0]);
        layout.move_box(3, 1).unwrap();
        assert_eq!(xs(&layout), vec![1, 0, 2, 3]);
        assert_dense(&layout);
    }

    #[test]
    fn move_to_same_index_is_noop() {
        let mut layout = layout(3);
        let before = layout.clone();
        layout.move_box(0, 0).unwrap();
        assert_eq!(layout, before);
    }

    #[test]
    fn move_out_of_range_is_rejected() {
        let mut layout = layout(3);
        assert_eq!(
            layout.move_box(3, 0).unwrap_err(),
            LayoutError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            layout.move_box(0, 3).unwrap_err(),
            LayoutError::IndexOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(xs(&layout), vec![0, 1, 2]);
    }

    #[test]
    fn replace_keeps_neighbours() {
        let mut layout = layout(3);
        let previous = layout.replace(1, ocr_box(42).with_order(17)).unwrap();
        assert_eq!(previous.bbox.x, 1);
        assert_eq!(xs(&layout), vec![0, 42, 2]);
        assert_dense(&layout);
        assert!(layout.set(3, ocr_box(0)).is_err());
    }

    #[test]
    fn sort_by_order_applies_recorded_order() {
        let boxes = vec![
            ocr_box(0).with_order(2),
            ocr_box(1).with_order(0),
            ocr_box(2).with_order(5),
            ocr_box(3).with_order(0),
        ];
        let mut layout = PageLayout::new(boxes);
        layout.sort_by_order();
        assert_eq!(xs(&layout), vec![1, 3, 0, 2]);
        assert_dense(&layout);
    }

    #[test]
    fn indexed_access_is_checked() {
        let mut layout = layout(2);
        assert_eq!(layout.get(1).unwrap().bbox.x, 1);
        assert!(layout.get(2).is_err());
        layout.delete(0).unwrap();
        assert!(layout.delete(1).is_err());
        assert_eq!((&layout).into_iter().count(), 1);
    }

    #[test]
    fn computes_content_band() {
        let layout: PageLayout = PageLayout::new(Vec::new())
            .with_region(BoundingBox::new(0, 0, 800, 1000))
            .with_margins(50, 50);
        assert_eq!(
            layout.get_page_region().unwrap(),
            BoundingBox::new(0, 50, 800, 900)
        );
    }

    #[test]
    fn degenerate_content_band_is_reported() {
        let layout: PageLayout = PageLayout::new(Vec::new())
            .with_region(BoundingBox::new(0, 0, 800, 100))
            .with_margins(60, 40);
        assert_eq!(
            layout.get_page_region().unwrap_err(),
            LayoutError::DegenerateRegion { height: 0 }
        );
    }
}
