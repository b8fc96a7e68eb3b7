use image::{imageops::FilterType, DynamicImage, GenericImageView};
use ndarray::Array4;

/// Side length of the square input the classifier expects.
pub const INPUT_SIZE: u32 = 224;

/// Convert an uploaded image into the model input tensor.
///
/// Direct resize to 224x224 (no crop, no aspect-ratio handling), RGB,
/// NCHW layout, pixel values scaled to [0, 1].
pub fn to_tensor(image: &DynamicImage) -> Array4<f32> {
    let resized = if image.width() == INPUT_SIZE && image.height() == INPUT_SIZE {
        image.clone()
    } else {
        image.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle)
    };
    let rgb = resized.to_rgb8();

    let mut tensor = Array4::<f32>::zeros((1, 3, INPUT_SIZE as usize, INPUT_SIZE as usize));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = pixel[c] as f32 / 255.0;
        }
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn gradient_image(width: u32, height: u32) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8]);
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn output_shape_and_range() {
        let tensor = to_tensor(&gradient_image(640, 480));
        assert_eq!(tensor.dim(), (1, 3, 224, 224));
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn already_sized_image_is_plain_normalization() {
        let image = gradient_image(INPUT_SIZE, INPUT_SIZE);
        let tensor = to_tensor(&image);

        let rgb = image.to_rgb8();
        for (x, y, pixel) in rgb.enumerate_pixels() {
            for c in 0..3 {
                let expected = pixel[c] as f32 / 255.0;
                let actual = tensor[[0, c, y as usize, x as usize]];
                assert!(
                    (actual - expected).abs() < 1e-6,
                    "mismatch at ({}, {}, {})",
                    x,
                    y,
                    c
                );
            }
        }
    }

    #[test]
    fn resize_is_stable_on_resized_output() {
        // Resizing an already-224x224 tensor source must not change it.
        let image = gradient_image(448, 448);
        let once = to_tensor(&image);
        let resized = image.resize_exact(INPUT_SIZE, INPUT_SIZE, FilterType::Triangle);
        let twice = to_tensor(&resized);
        for (a, b) in once.iter().zip(twice.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}
