//=== Title Config ========================================================
//
// Texts, asset paths, and timings of the title sequence.

/// Title sequence settings.
///
/// ```
/// use saketsudukero::title::TitleConfig;
///
/// let config = TitleConfig::builder()
///     .fade_frames(60)
///     .prompt("Push Any Key")
///     .build();
///
/// assert_eq!(config.fade_frames, 60);
/// assert_eq!(config.rest_y, 110.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TitleConfig {
    /// Legal line shown first.
    pub legal_text: String,
    /// Studio logo shown second.
    pub logo_path: String,
    /// Title artwork that rises into place.
    pub title_path: String,
    /// Font asset name used for both text stages.
    pub font: String,
    /// Length of every fade, in ticks.
    pub fade_frames: u32,
    /// Final y of the title artwork.
    pub rest_y: f32,
    /// Pixels the artwork rises per tick.
    pub rise: f32,
    pub prompt: String,
    /// Vertical offset of the prompt from the window centre.
    pub prompt_offset: f32,
}

impl TitleConfig {
    pub fn builder() -> TitleConfigBuilder {
        TitleConfigBuilder {
            config: Self::default(),
        }
    }
}

impl Default for TitleConfig {
    fn default() -> Self {
        Self {
            legal_text: "2016  @dorisol1019".to_owned(),
            logo_path: "Data/System/SRDG_Logo.png".to_owned(),
            title_path: "Data/System/Title.png".to_owned(),
            font: "font".to_owned(),
            fade_frames: 120,
            rest_y: 110.0,
            rise: 5.0,
            prompt: "Press Start".to_owned(),
            prompt_offset: 40.0,
        }
    }
}

//--- Builder -------------------------------------------------------------

pub struct TitleConfigBuilder {
    config: TitleConfig,
}

impl TitleConfigBuilder {
    pub fn legal_text(mut self, text: impl Into<String>) -> Self {
        self.config.legal_text = text.into();
        self
    }

    pub fn logo_path(mut self, path: impl Into<String>) -> Self {
        self.config.logo_path = path.into();
        self
    }

    pub fn title_path(mut self, path: impl Into<String>) -> Self {
        self.config.title_path = path.into();
        self
    }

    pub fn font(mut self, name: impl Into<String>) -> Self {
        self.config.font = name.into();
        self
    }

    /// # Panics
    ///
    /// Panics if `frames == 0`.
    pub fn fade_frames(mut self, frames: u32) -> Self {
        assert!(frames > 0, "Fade length must be positive");
        self.config.fade_frames = frames;
        self
    }

    pub fn rest_y(mut self, y: f32) -> Self {
        self.config.rest_y = y;
        self
    }

    /// # Panics
    ///
    /// Panics unless `pixels` is positive.
    pub fn rise(mut self, pixels: f32) -> Self {
        assert!(pixels > 0.0, "Rise speed must be positive");
        self.config.rise = pixels;
        self
    }

    pub fn prompt(mut self, text: impl Into<String>) -> Self {
        self.config.prompt = text.into();
        self
    }

    pub fn prompt_offset(mut self, offset: f32) -> Self {
        self.config.prompt_offset = offset;
        self
    }

    pub fn build(self) -> TitleConfig {
        self.config
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_shipped_game() {
        let config = TitleConfig::default();

        assert_eq!(config.legal_text, "2016  @dorisol1019");
        assert_eq!(config.logo_path, "Data/System/SRDG_Logo.png");
        assert_eq!(config.title_path, "Data/System/Title.png");
        assert_eq!(config.fade_frames, 120);
        assert_eq!((config.rest_y, config.rise, config.prompt_offset), (110.0, 5.0, 40.0));
        assert_eq!(config.prompt, "Press Start");
    }

    #[test]
    fn builder_overrides_fields() {
        let config = TitleConfig::builder()
            .legal_text("(c)")
            .font("mono")
            .rest_y(80.0)
            .rise(10.0)
            .build();

        assert_eq!(config.legal_text, "(c)");
        assert_eq!(config.font, "mono");
        assert_eq!((config.rest_y, config.rise), (80.0, 10.0));
        assert_eq!(config.fade_frames, 120);
    }

    #[test]
    #[should_panic(expected = "Fade length must be positive")]
    fn zero_fade_panics() {
        TitleConfig::builder().fade_frames(0);
    }

    #[test]
    #[should_panic(expected = "Rise speed must be positive")]
    fn non_positive_rise_panics() {
        TitleConfig::builder().rise(0.0);
    }
}
