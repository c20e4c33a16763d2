//=== Assets ==============================================================
//
// Named fonts and path-addressed textures.
//
// Image decoding is out of scope: a texture is its path plus whether the
// file exists. A missing file still yields a texture so draw calls keep
// working (and keep being recorded).

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};

//--- Texture -------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    path: String,
    loaded: bool,
}

impl Texture {
    /// Creates a texture from a file path, logging if the file is missing.
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let loaded = Path::new(&path).is_file();

        if loaded {
            debug!("Texture loaded: {}", path);
        } else {
            warn!("Texture file not found: {}", path);
        }

        Self { path, loaded }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}

//--- Font ----------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    name: String,
    size: u32,
}

impl Font {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u32 {
        self.size
    }
}

//--- Assets --------------------------------------------------------------

/// Fallback size for fonts looked up before registration.
const FALLBACK_FONT_SIZE: u32 = 15;

#[derive(Debug, Default)]
pub struct Assets {
    fonts: HashMap<String, Font>,
    textures: HashMap<String, Texture>,
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a font under `name`, replacing any previous one.
    pub fn register_font(&mut self, name: impl Into<String>, size: u32) {
        let name = name.into();
        debug!("Font registered: {} ({}px)", name, size);
        if self.fonts.insert(name.clone(), Font::new(name, size)).is_some() {
            debug!("Previous font with the same name replaced");
        }
    }

    pub fn font(&self, name: &str) -> Option<&Font> {
        self.fonts.get(name)
    }

    /// Registered font, or a default-sized stand-in when none exists.
    pub fn font_or_fallback(&self, name: &str) -> Font {
        match self.fonts.get(name) {
            Some(font) => font.clone(),
            None => {
                warn!("Font '{}' not registered, using {}px fallback", name, FALLBACK_FONT_SIZE);
                Font::new(name, FALLBACK_FONT_SIZE)
            }
        }
    }

    /// Texture for `path`, loaded on first use and cached afterwards.
    pub fn texture(&mut self, path: &str) -> Texture {
        self.textures
            .entry(path.to_owned())
            .or_insert_with(|| Texture::from_path(path))
            .clone()
    }

    pub fn cached_textures(&self) -> usize {
        self.textures.len()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
