use cardfan_core::{Card, StatKind, Vec2 as TableVec2};
use macroquad::prelude::*;

#[derive(Debug, Clone)]
pub struct CardDrawConfig {
    pub glow_margin: f32,    // how far the glow extends past the card edge
    pub glow_color: Color,
    pub frame_margin: f32,   // frame border drawn behind the face
    pub frame_color: Color,
    pub stat_font_size: u16,
    pub stat_inset: f32,     // stat label distance from the card corner
    pub mana_color: Color,
    pub attack_color: Color,
    pub health_color: Color,
}

impl Default for CardDrawConfig {
    fn default() -> Self {
        Self {
            glow_margin: 10.0,
            glow_color: Color::new(1.0, 0.85, 0.25, 0.8),
            frame_margin: 3.0,
            frame_color: Color::new(0.08, 0.08, 0.1, 1.0),
            stat_font_size: 28,
            stat_inset: 18.0,
            mana_color: SKYBLUE,
            attack_color: ORANGE,
            health_color: RED,
        }
    }
}

/// Core tilts are counterclockwise-positive degrees; the y-down screen frame
/// draws them negated, in radians.
pub fn screen_rotation(rotation_degrees: f32) -> f32 {
    -rotation_degrees.to_radians()
}

/// True when `point` (table space) lies inside the card's rotated rectangle.
pub fn point_in_card(card: &Card, size: TableVec2, point: TableVec2) -> bool {
    let delta = point - card.position();
    let local = TableVec2::from_angle(card.rotation().to_radians()).rotate(delta);
    local.x.abs() <= size.x / 2.0 && local.y.abs() <= size.y / 2.0
}

pub fn draw_card(
    card: &Card,
    texture: &Texture2D,
    center_screen: Vec2,
    size: Vec2,
    config: &CardDrawConfig,
) {
    let rotation = screen_rotation(card.rotation());
    let alpha = card.opacity();

    if card.glow_visible() && card.glow_opacity() > 0.0 {
        let mut glow_color = config.glow_color;
        glow_color.a *= card.glow_opacity() * alpha;
        draw_rectangle_ex(
            center_screen.x,
            center_screen.y,
            size.x + config.glow_margin * 2.0,
            size.y + config.glow_margin * 2.0,
            DrawRectangleParams {
                offset: vec2(0.5, 0.5),
                rotation,
                color: glow_color,
            },
        );
    }

    // Frame behind the face, stroke-behind-fill.
    let mut frame_color = config.frame_color;
    frame_color.a *= alpha;
    draw_rectangle_ex(
        center_screen.x,
        center_screen.y,
        size.x + config.frame_margin * 2.0,
        size.y + config.frame_margin * 2.0,
        DrawRectangleParams {
            offset: vec2(0.5, 0.5),
            rotation,
            color: frame_color,
        },
    );

    draw_texture_ex(
        texture,
        center_screen.x - size.x / 2.0,
        center_screen.y - size.y / 2.0,
        Color::new(1.0, 1.0, 1.0, alpha),
        DrawTextureParams {
            dest_size: Some(size),
            rotation,
            ..Default::default()
        },
    );

    let inset = config.stat_inset;
    let corners = [
        (
            StatKind::ManaCost,
            vec2(-size.x / 2.0 + inset, -size.y / 2.0 + inset),
            config.mana_color,
        ),
        (
            StatKind::AttackPower,
            vec2(-size.x / 2.0 + inset, size.y / 2.0 - inset),
            config.attack_color,
        ),
        (
            StatKind::Health,
            vec2(size.x / 2.0 - inset, size.y / 2.0 - inset),
            config.health_color,
        ),
    ];
    for (kind, offset, base_color) in corners {
        let mut color = base_color;
        color.a *= alpha;
        let rotated = Vec2::from_angle(rotation).rotate(offset);
        let label = card.stat(kind).displayed().to_string();
        draw_text_ex(
            &label,
            center_screen.x + rotated.x,
            center_screen.y + rotated.y,
            TextParams {
                font_size: config.stat_font_size,
                rotation,
                color,
                ..Default::default()
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardfan_core::{CardId, Pose, Rng};

    fn settled_card(pose: Pose) -> Card {
        let mut card = Card::new(CardId(0), 0, &mut Rng::with_seed(1));
        card.move_to(pose, 0.0);
        for _ in 0..60 {
            card.advance(1.0 / 60.0);
        }
        card
    }

    #[test]
    fn hit_test_covers_the_unrotated_rectangle() {
        let card = settled_card(Pose {
            position: TableVec2::new(40.0, -10.0),
            rotation: 0.0,
        });
        let size = TableVec2::new(100.0, 150.0);
        assert!(point_in_card(&card, size, TableVec2::new(40.0, -10.0)));
        assert!(point_in_card(&card, size, TableVec2::new(89.0, 64.0)));
        assert!(!point_in_card(&card, size, TableVec2::new(91.0, -10.0)));
        assert!(!point_in_card(&card, size, TableVec2::new(40.0, 66.0)));
    }

    #[test]
    fn hit_test_follows_the_card_rotation() {
        let card = settled_card(Pose {
            position: TableVec2::ZERO,
            rotation: 90.0,
        });
        let size = TableVec2::new(100.0, 200.0);
        // A quarter turn lays the long axis along x.
        assert!(point_in_card(&card, size, TableVec2::new(90.0, 0.0)));
        assert!(!point_in_card(&card, size, TableVec2::new(0.0, 90.0)));
    }

    #[test]
    fn screen_rotation_negates_and_converts_to_radians() {
        assert!((screen_rotation(90.0) + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(screen_rotation(0.0), 0.0);
    }
}
