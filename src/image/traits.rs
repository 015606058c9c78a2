use image::GrayImage;

/// Size queries shared by raw and 8-bit planes.
pub trait ImageView {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn dims(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

impl ImageView for GrayImage {
    #[inline]
    fn width(&self) -> usize {
        self.dimensions().0 as usize
    }
    #[inline]
    fn height(&self) -> usize {
        self.dimensions().1 as usize
    }
}
