//! Grayscale downgrade applied to artwork before it is stored locally.
//!
//! Saved copies are a deliberately degraded offline fallback: same content,
//! no color.

use std::io::Cursor;

use image::ImageFormat;

use crate::model::ItemImage;

/// Convert to grayscale and re-encode as PNG.
pub fn downgrade(image: &ItemImage) -> Result<Vec<u8>, image::ImageError> {
    let gray = image.image().grayscale();
    let mut buf = Vec::new();
    gray.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::png_bytes;

    #[test]
    fn test_downgrade_removes_color() {
        let original = png_bytes(8, 4, [220, 40, 90]);
        let image = ItemImage::decode(&original).unwrap();

        let stored = downgrade(&image).unwrap();
        assert_ne!(stored, original);

        let decoded = ItemImage::decode(&stored).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
        for pixel in decoded.image().to_rgb8().pixels() {
            let [r, g, b] = pixel.0;
            assert!(r == g && g == b, "pixel {:?} is not gray", pixel.0);
        }
    }

    #[test]
    fn test_downgrade_preserves_content() {
        // Two distinct colors stay distinguishable after the transform
        let mut canvas = image::RgbImage::from_pixel(2, 1, image::Rgb([255, 255, 255]));
        canvas.put_pixel(1, 0, image::Rgb([0, 0, 0]));
        let image = ItemImage::from(image::DynamicImage::ImageRgb8(canvas));

        let decoded = ItemImage::decode(&downgrade(&image).unwrap()).unwrap();
        let luma = decoded.image().to_luma8();
        assert!(luma.get_pixel(0, 0).0[0] > luma.get_pixel(1, 0).0[0]);
    }
}
