// Decoded wall, plane and sprite images, addressed by `TextureId`.
// Nothing outside the asset loader sees file names or image formats.

use std::collections::HashMap;

/// Index into a [`TextureBank`]. Ids never move once handed out.
pub type TextureId = u16;

/// Slot 0: the checkerboard every bank starts with.
pub const NO_TEXTURE: TextureId = 0;

/// Row-major ARGB pixels (`0xAARRGGBB`).
///
/// Alpha is a colour key only: the sprite pass skips texels whose alpha is
/// 0 and draws the rest opaque.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<u32>,
}

/// 8×8 grey checkerboard.
impl Default for Texture {
    fn default() -> Self {
        let pixels = (0..64)
            .map(|i| {
                let (x, y) = (i % 8, i / 8);
                if (x + y) % 2 == 0 { 0xFF_A0A0A0 } else { 0xFF_505050 }
            })
            .collect();
        Texture {
            name: "checker".into(),
            w: 8,
            h: 8,
            pixels,
        }
    }
}

impl Texture {
    /// Texel at integer coordinates; both axes wrap.
    #[inline]
    pub fn texel(&self, u: i32, v: i32) -> u32 {
        let u = u.rem_euclid(self.w as i32) as usize;
        let v = v.rem_euclid(self.h as i32) as usize;
        self.pixels[v * self.w + u]
    }

    #[inline]
    pub fn is_transparent(argb: u32) -> bool {
        argb >> 24 == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("texture `{0}` is already in the bank")]
    Duplicate(String),

    #[error("no texture with id {0}")]
    BadId(TextureId),

    #[error("cannot decode `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("texture `{0}` has zero width or height")]
    Empty(String),
}

/// Every image the level uses, one copy per file name.
///
/// Slot [`NO_TEXTURE`] always holds the checkerboard, so a bank is never
/// truly empty.
#[derive(Debug)]
pub struct TextureBank {
    data: Vec<Texture>,
    by_name: HashMap<String, TextureId>,
}

impl Default for TextureBank {
    fn default() -> Self {
        let checker = Texture::default();
        let by_name = HashMap::from([(checker.name.clone(), NO_TEXTURE)]);
        Self {
            data: vec![checker],
            by_name,
        }
    }
}

impl TextureBank {
    /// Stored textures, the checkerboard included.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True when nothing but the checkerboard is loaded.
    pub fn is_empty(&self) -> bool {
        self.data.len() <= 1
    }

    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(usize::from(id)).ok_or(TextureError::BadId(id))
    }

    /// Add `tex` under a fresh name. Empty images are refused.
    pub fn insert(&mut self, name: impl Into<String>, tex: Texture) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if tex.w == 0 || tex.h == 0 {
            return Err(TextureError::Empty(name));
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }

    /// Id of `name`, decoding it with `load` only the first time it is asked
    /// for. Manifests may list the same file more than once.
    pub fn insert_or_get(
        &mut self,
        name: impl Into<String>,
        load: impl FnOnce() -> Result<Texture, TextureError>,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        match self.id(&name) {
            Some(id) => Ok(id),
            None => {
                let tex = load()?;
                self.insert(name, tex)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(color: u32) -> Texture {
        Texture {
            name: "solid".into(),
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn new_bank_holds_only_the_checkerboard() {
        let bank = TextureBank::default();
        assert!(bank.is_empty());
        assert_eq!(bank.texture(NO_TEXTURE).unwrap().w, 8);
    }

    #[test]
    fn inserted_textures_get_fresh_ids() {
        let mut bank = TextureBank::default();
        let brick = bank.insert("brick.png", solid(0xFF_FF0000)).unwrap();
        let stone = bank.insert("stone.png", solid(0xFF_0000FF)).unwrap();

        assert_eq!((brick, stone), (1, 2));
        assert_eq!(bank.id("stone.png"), Some(stone));
        assert_eq!(bank.id("wood.png"), None);
        assert_eq!(bank.texture(brick).unwrap().pixels[0], 0xFF_FF0000);
        assert!(!bank.is_empty());
    }

    #[test]
    fn duplicates_and_empty_images_are_refused() {
        let mut bank = TextureBank::default();
        bank.insert("wood.png", solid(1)).unwrap();
        let err = bank.insert("wood.png", solid(2)).unwrap_err();
        assert!(matches!(err, TextureError::Duplicate(ref n) if n == "wood.png"));

        let blank = Texture {
            w: 0,
            pixels: Vec::new(),
            ..solid(0)
        };
        assert!(matches!(bank.insert("blank.png", blank), Err(TextureError::Empty(_))));
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn insert_or_get_decodes_once() {
        let mut bank = TextureBank::default();
        let a = bank.insert_or_get("wood.png", || Ok(solid(1))).unwrap();
        let b = bank
            .insert_or_get("wood.png", || panic!("decoded twice"))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_id_is_an_error() {
        let bank = TextureBank::default();
        assert!(matches!(bank.texture(9), Err(TextureError::BadId(9))));
    }

    #[test]
    fn texel_wraps_negative_coordinates() {
        let tex = Texture::default();
        assert_eq!(tex.texel(-1, -1), tex.texel(7, 7));
        assert_eq!(tex.texel(8, 0), tex.texel(0, 0));
    }
}
