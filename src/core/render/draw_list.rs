//=== Draw List ===========================================================
//
// Recording canvas. Cleared at the start of every tick.

use log::trace;

use super::{clamp_alpha, Canvas, Font, Texture, Vec2};

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Texture {
        path: String,
        center: Vec2,
        alpha: f32,
    },
    Text {
        font: String,
        text: String,
        center: Vec2,
        alpha: f32,
    },
}

impl DrawCommand {
    pub fn alpha(&self) -> f32 {
        match self {
            Self::Texture { alpha, .. } | Self::Text { alpha, .. } => *alpha,
        }
    }

    pub fn center(&self) -> Vec2 {
        match self {
            Self::Texture { center, .. } | Self::Text { center, .. } => *center,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// First recorded texture draw with the given path.
    pub fn find_texture(&self, path: &str) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|command| matches!(command, DrawCommand::Texture { path: p, .. } if p == path))
    }

    /// First recorded text draw with the given string.
    pub fn find_text(&self, text: &str) -> Option<&DrawCommand> {
        self.commands
            .iter()
            .find(|command| matches!(command, DrawCommand::Text { text: t, .. } if t == text))
    }
}

impl Canvas for DrawList {
    fn draw_texture_at(&mut self, texture: &Texture, center: Vec2, alpha: f32) {
        let alpha = clamp_alpha(alpha);
        trace!("draw texture {} at ({}, {}) a={:.3}", texture.path(), center.x, center.y, alpha);
        self.commands.push(DrawCommand::Texture {
            path: texture.path().to_owned(),
            center,
            alpha,
        });
    }

    fn draw_text_at(&mut self, font: &Font, text: &str, center: Vec2, alpha: f32) {
        let alpha = clamp_alpha(alpha);
        trace!("draw text {:?} [{}] at ({}, {}) a={:.3}", text, font.name(), center.x, center.y, alpha);
        self.commands.push(DrawCommand::Text {
            font: font.name().to_owned(),
            text: text.to_owned(),
            center,
            alpha,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_call_order_with_clamped_alpha() {
        let mut list = DrawList::new();
        let font = Font::new("font", 15);
        let texture = Texture::from_path("Data/System/Title.png");

        list.draw_text_at(&font, "Press Start", Vec2::new(480.0, 310.0), 2.0);
        list.draw_texture_at(&texture, Vec2::new(480.0, 110.0), -1.0);

        assert_eq!(list.len(), 2);
        assert_eq!(list.commands()[0].alpha(), 1.0);
        assert_eq!(list.commands()[1].alpha(), 0.0);
        assert_eq!(
            list.find_texture("Data/System/Title.png").map(DrawCommand::center),
            Some(Vec2::new(480.0, 110.0))
        );
        assert!(list.find_text("Press Start").is_some());
    }

    #[test]
    fn clear_empties_the_list() {
        let mut list = DrawList::new();
        list.draw_text_at(&Font::new("font", 15), "x", Vec2::ZERO, 1.0);

        list.clear();

        assert!(list.is_empty());
    }
}
