use std::path::Path;

use tracing::{info, warn};

const FALLBACK_SIZE: u32 = 256;
const FALLBACK_CELL: u32 = 32;

/// RGBA8 checkerboard in two wood-ish tones, used when no texture file
/// can be decoded.
pub fn checkerboard_pixels(size: u32, cell: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let rgb: [u8; 3] = if light { [168, 125, 74] } else { [121, 85, 49] };
            pixels.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
    }
    pixels
}

/// Load the scene's diffuse texture. A missing or undecodable file is
/// reported and replaced with the checkerboard; rendering continues.
pub fn load_diffuse(device: &wgpu::Device, queue: &wgpu::Queue, path: &Path) -> wgpu::TextureView {
    let (pixels, width, height) = match image::open(path) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let (width, height) = rgba.dimensions();
            info!("loaded diffuse texture {} ({width}x{height})", path.display());
            (rgba.into_raw(), width, height)
        }
        Err(e) => {
            warn!("failed to load texture {}: {e}; using checkerboard", path.display());
            (
                checkerboard_pixels(FALLBACK_SIZE, FALLBACK_CELL),
                FALLBACK_SIZE,
                FALLBACK_SIZE,
            )
        }
    };

    let size = wgpu::Extent3d { width, height, depth_or_array_layers: 1 };
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("diffuse_texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_dimensions() {
        let pixels = checkerboard_pixels(64, 8);
        assert_eq!(pixels.len(), 64 * 64 * 4);
    }

    #[test]
    fn test_checkerboard_alternates() {
        let pixels = checkerboard_pixels(64, 8);
        let first = &pixels[0..3];
        // One cell to the right must differ, two cells must match
        let next_cell = &pixels[(8 * 4) as usize..(8 * 4 + 3) as usize];
        let same_cell = &pixels[(16 * 4) as usize..(16 * 4 + 3) as usize];
        assert_ne!(first, next_cell);
        assert_eq!(first, same_cell);
    }

    #[test]
    fn test_checkerboard_is_opaque() {
        let pixels = checkerboard_pixels(16, 4);
        assert!(pixels.chunks(4).all(|px| px[3] == 255));
    }
}
