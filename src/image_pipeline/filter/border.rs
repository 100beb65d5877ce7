//! Reflect-101 border padding
//!
//! imageproc's filters clamp to the edge pixel. Padding the image by the kernel
//! radius first and cropping the result back gives `gfedcb|abcdefgh|gfedcba`
//! borders instead.

use image::{Rgb32FImage, imageops};

/// Maps an out-of-range coordinate back inside `0..len` mirroring around the
/// edge pixel without repeating it.
pub(crate) fn reflect101_index(mut idx: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    // Images smaller than the kernel radius need more than one bounce
    while idx < 0 || idx >= len {
        idx = if idx < 0 { -idx } else { 2 * len - idx - 2 };
    }
    idx as u32
}

/// Pads by `rx` columns left and right and `ry` rows top and bottom.
pub(crate) fn pad_reflect101(image: &Rgb32FImage, rx: u32, ry: u32) -> Rgb32FImage {
    let (w, h) = image.dimensions();
    Rgb32FImage::from_fn(w + 2 * rx, h + 2 * ry, |x, y| {
        let sx = reflect101_index(x as i64 - rx as i64, w as i64);
        let sy = reflect101_index(y as i64 - ry as i64, h as i64);
        *image.get_pixel(sx, sy)
    })
}

/// Inverse of [`pad_reflect101`].
pub(crate) fn crop_padding(padded: &Rgb32FImage, rx: u32, ry: u32) -> Rgb32FImage {
    let (w, h) = padded.dimensions();
    imageops::crop_imm(padded, rx, ry, w - 2 * rx, h - 2 * ry).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_reflect101_index() {
        assert_eq!(reflect101_index(-1, 5), 1);
        assert_eq!(reflect101_index(-2, 5), 2);
        assert_eq!(reflect101_index(5, 5), 3);
        assert_eq!(reflect101_index(6, 5), 2);
        assert_eq!(reflect101_index(2, 5), 2);
        assert_eq!(reflect101_index(-7, 3), 1);
        assert_eq!(reflect101_index(4, 1), 0);
    }

    #[test]
    fn test_pad_then_crop_restores_image() {
        let img = Rgb32FImage::from_fn(5, 3, |x, y| Rgb([x as f32, y as f32, 7.0]));
        let padded = pad_reflect101(&img, 2, 4);
        assert_eq!(padded.dimensions(), (9, 11));
        // column -1 mirrors column 1
        assert_eq!(padded.get_pixel(1, 4), img.get_pixel(1, 0));
        assert_eq!(crop_padding(&padded, 2, 4), img);
    }
}
