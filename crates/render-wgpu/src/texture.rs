use cubefall_common::AssetConfig;
use cubefall_kernel::MaterialKind;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture {path} is empty")]
    Empty { path: PathBuf },
}

/// Decoded RGBA8 pixels, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl TextureImage {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let decoded = image::open(path)
            .map_err(|source| TextureError::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty {
                path: path.to_path_buf(),
            });
        }
        tracing::debug!("loaded texture {} ({width}x{height})", path.display());
        Ok(Self {
            width,
            height,
            rgba: decoded.into_raw(),
        })
    }

    /// `size x size` checkerboard with `cells` squares per side.
    pub fn checker(size: u32, cells: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = ((x / cell) + (y / cell)) % 2 == 0;
                rgba.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// Plank-like crate face: a light border around darker boards.
    pub fn crate_face(size: u32) -> Self {
        let size = size.max(8);
        let border = size / 8;
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let edge = x < border || y < border || x >= size - border || y >= size - border;
                let seam = (y / (size / 4).max(1)) % 2 == 0;
                let px = match (edge, seam) {
                    (true, _) => [196, 154, 96, 255],
                    (false, true) => [150, 104, 56, 255],
                    (false, false) => [132, 90, 48, 255],
                };
                rgba.extend_from_slice(&px);
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    pub fn solid(color: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: color.to_vec(),
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.rgba.get(i..i + 4)?.try_into().ok()
    }
}

/// Image bound for a material: the configured file if any, otherwise a
/// generated texture.
pub fn material_image(material: MaterialKind, assets: &AssetConfig) -> Result<TextureImage, TextureError> {
    let configured = match material {
        MaterialKind::Crate => assets.crate_texture.as_deref(),
        MaterialKind::Projectile => assets.projectile_texture.as_deref(),
        MaterialKind::Floor => assets.floor_texture.as_deref(),
        MaterialKind::Marker => None,
    };
    if let Some(path) = configured {
        return TextureImage::load(path);
    }
    Ok(match material {
        MaterialKind::Crate => TextureImage::crate_face(64),
        MaterialKind::Projectile => {
            TextureImage::checker(64, 8, [230, 230, 235, 255], [60, 90, 200, 255])
        }
        MaterialKind::Floor => {
            TextureImage::checker(128, 16, [170, 40, 40, 255], [140, 30, 30, 255])
        }
        MaterialKind::Marker => TextureImage::solid([200, 200, 200, 255]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_alternates() {
        let white = [255, 255, 255, 255];
        let black = [0, 0, 0, 255];
        let tex = TextureImage::checker(4, 2, white, black);
        assert_eq!(tex.rgba.len(), 4 * 4 * 4);
        assert_eq!(tex.pixel(0, 0), Some(white));
        assert_eq!(tex.pixel(2, 0), Some(black));
        assert_eq!(tex.pixel(2, 2), Some(white));
        assert_eq!(tex.pixel(4, 0), None);
    }

    #[test]
    fn generated_materials_are_nonempty() {
        let assets = AssetConfig::default();
        for material in [
            MaterialKind::Crate,
            MaterialKind::Projectile,
            MaterialKind::Floor,
            MaterialKind::Marker,
        ] {
            let tex = material_image(material, &assets).unwrap();
            assert_eq!(tex.rgba.len(), (tex.width * tex.height * 4) as usize);
        }
    }

    #[test]
    fn loads_configured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crate.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let assets = AssetConfig {
            crate_texture: Some(path),
            ..AssetConfig::default()
        };
        let tex = material_image(MaterialKind::Crate, &assets).unwrap();
        assert_eq!((tex.width, tex.height), (3, 2));
        assert_eq!(tex.pixel(2, 1), Some([10, 20, 30, 255]));
    }

    #[test]
    fn missing_file_is_an_error() {
        let assets = AssetConfig {
            floor_texture: Some(PathBuf::from("/definitely/not/here.png")),
            ..AssetConfig::default()
        };
        let err = material_image(MaterialKind::Floor, &assets).unwrap_err();
        assert!(matches!(err, TextureError::Load { .. }));
        assert!(err.to_string().contains("not/here.png"));
    }
}
