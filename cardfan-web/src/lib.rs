use c_gen_faces::layout;
use cardfan_core::{CardId, FrameScheduler, Rng, Table, TableConfig, Vec2 as TableVec2};
#[cfg(target_arch = "wasm32")]
use macroquad::miniquad;
use macroquad::prelude::*;

use crate::card_draw::{CardDrawConfig, draw_card, point_in_card};

mod card_draw;

const CONFIG_PATH: &str = "assets/table.json";
const FIXED_STEP_SECONDS: f32 = 1.0 / 60.0;
const CURVE_DEBUG_STEP: f32 = 0.05;
const CURVE_DEBUG_THICKNESS: f32 = 2.0;
const ZONE_OUTLINE_THICKNESS: f32 = 3.0;
const HUD_FONT_SIZE: f32 = 24.0;
const TABLE_BACKGROUND: Color = Color::new(0.09, 0.2, 0.13, 1.0);
const ZONE_OUTLINE_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.35);

fn log_ui_action(label: &str) {
    #[cfg(target_arch = "wasm32")]
    miniquad::info!("{}", label);
    #[cfg(not(target_arch = "wasm32"))]
    println!("{}", label);
}

fn screen_center() -> Vec2 {
    vec2(screen_width() / 2.0, screen_height() / 2.0)
}

/// Table space has its origin at the screen center, y growing downward like
/// the screen itself.
fn table_to_screen(position: TableVec2, center: Vec2) -> Vec2 {
    vec2(center.x + position.x, center.y + position.y)
}

fn screen_to_table(screen: Vec2, center: Vec2) -> TableVec2 {
    TableVec2::new(screen.x - center.x, screen.y - center.y)
}

/// Front-most card under `point`, scanning the render order back to front.
fn topmost_card_at(table: &Table, point: TableVec2) -> Option<CardId> {
    let size = table.config().card_size;
    table.render_order().iter().rev().copied().find(|id| {
        table
            .card(*id)
            .is_some_and(|card| point_in_card(card, size, point))
    })
}

async fn load_table_config() -> TableConfig {
    match load_string(CONFIG_PATH).await {
        Ok(raw) => serde_json::from_str(&raw)
            .unwrap_or_else(|err| panic!("invalid table config at {CONFIG_PATH}: {err}")),
        Err(_) => {
            log_ui_action("no table config override, using defaults");
            TableConfig::default()
        }
    }
}

struct FaceSet {
    textures: Vec<Texture2D>,
}

impl FaceSet {
    /// One request per face, in order; the whole batch is in hand before any
    /// card spawns. A face that fails to load is a fatal startup error.
    async fn load_from_assets(count: usize) -> Self {
        let mut textures = Vec::with_capacity(count);
        for index in 0..count {
            let path = layout::face_asset_path(index);
            let texture = load_texture(&path)
                .await
                .unwrap_or_else(|err| panic!("failed to load card face at {path}: {err}"));
            texture.set_filter(FilterMode::Linear);
            textures.push(texture);
        }
        Self { textures }
    }

    fn texture(&self, face: usize) -> &Texture2D {
        &self.textures[face % self.textures.len()]
    }
}

pub struct GameState {
    table: Table,
    scheduler: FrameScheduler<Table>,
    faces: FaceSet,
    card_draw: CardDrawConfig,
    pressed_card: Option<CardId>,
    show_curve: bool,
    fps: f32,
    fps_frame_count: u32,
    fps_last_update_time: f64,
}

impl GameState {
    pub async fn new() -> Self {
        let config = load_table_config().await;
        let mut table = Table::new(config, Rng::new())
            .unwrap_or_else(|err| panic!("invalid table configuration: {err}"));
        let deal = table.roll_start_count();
        let faces = FaceSet::load_from_assets(deal).await;
        table.spawn_hand(deal);

        let mut scheduler = FrameScheduler::new();
        scheduler.add_update(Box::new(|table: &mut Table, _, dt| table.advance(dt)));
        scheduler.add_fixed(Box::new(|table: &mut Table, _, _| table.sweep_retired()));

        Self {
            table,
            scheduler,
            faces,
            card_draw: CardDrawConfig::default(),
            pressed_card: None,
            show_curve: false,
            fps: 0.0,
            fps_frame_count: 0,
            fps_last_update_time: get_time(),
        }
    }

    fn handle_pointer(&mut self) {
        let center = screen_center();
        let (mouse_x, mouse_y) = mouse_position();
        let pointer = screen_to_table(vec2(mouse_x, mouse_y), center);
        self.table.set_pointer(pointer);

        if is_mouse_button_pressed(MouseButton::Left) {
            if let Some(id) = topmost_card_at(&self.table, pointer) {
                if self.table.pointer_down(id, &mut self.scheduler) {
                    self.pressed_card = Some(id);
                }
            }
        }

        // The release goes to the card that took the press, wherever the
        // pointer ended up.
        if is_mouse_button_released(MouseButton::Left) {
            if let Some(id) = self.pressed_card.take() {
                self.table.pointer_up(id, &mut self.scheduler);
            }
        }
    }

    fn handle_keys(&mut self) {
        if is_key_pressed(KeyCode::Space) {
            if let Some((_, kind, value)) = self.table.reroll_next_stat(&mut self.scheduler) {
                log_ui_action(&format!("rerolled {kind:?} to {value}"));
            }
        }
        if is_key_pressed(KeyCode::C) {
            self.show_curve = !self.show_curve;
        }
    }

    fn fixed_update(&mut self) {
        self.scheduler
            .fixed_tick(&mut self.table, FIXED_STEP_SECONDS);
    }

    fn frame_update(&mut self, frame_time: f32) {
        self.scheduler.tick(&mut self.table, frame_time);
    }

    fn update_fps_if_due(&mut self) {
        let now = get_time();
        self.fps_frame_count += 1;
        let elapsed = now - self.fps_last_update_time;
        if elapsed >= 1.0 {
            self.fps = self.fps_frame_count as f32 / elapsed as f32;
            self.fps_frame_count = 0;
            self.fps_last_update_time = now;
        }
    }

    fn render(&mut self) {
        clear_background(TABLE_BACKGROUND);
        let center = screen_center();

        self.draw_drop_zone(center);
        if self.show_curve {
            self.draw_curve_overlay(center);
        }

        let size = self.table.config().card_size;
        let card_size = vec2(size.x, size.y);

        for &id in self.table.drop_zone().cards() {
            if let Some(card) = self.table.card(id) {
                let position = table_to_screen(card.position(), center);
                draw_card(
                    card,
                    self.faces.texture(card.face()),
                    position,
                    card_size,
                    &self.card_draw,
                );
            }
        }

        for &id in self.table.render_order() {
            if let Some(card) = self.table.card(id) {
                let position = table_to_screen(card.position(), center);
                draw_card(
                    card,
                    self.faces.texture(card.face()),
                    position,
                    card_size,
                    &self.card_draw,
                );
            }
        }

        self.draw_hud();
    }

    fn draw_drop_zone(&self, center: Vec2) {
        let zone = self.table.config().drop_zone;
        let top_left = table_to_screen(zone.center - zone.size / 2.0, center);
        draw_rectangle_lines(
            top_left.x,
            top_left.y,
            zone.size.x,
            zone.size.y,
            ZONE_OUTLINE_THICKNESS,
            ZONE_OUTLINE_COLOR,
        );
    }

    fn draw_curve_overlay(&self, center: Vec2) {
        let fan = &self.table.config().fan;
        let mut t = 0.0_f32;
        while t < 1.0 {
            let previous = t;
            t += CURVE_DEBUG_STEP;
            let from = table_to_screen(fan.point_at(previous), center);
            let to = table_to_screen(fan.point_at(t), center);
            draw_line(from.x, from.y, to.x, to.y, CURVE_DEBUG_THICKNESS, GREEN);
        }
    }

    fn draw_hud(&self) {
        draw_text(
            &format!("hand: {}", self.table.hand().len()),
            20.0,
            40.0,
            HUD_FONT_SIZE,
            WHITE,
        );
        draw_text(
            &format!("played: {}", self.table.drop_zone().len()),
            20.0,
            64.0,
            HUD_FONT_SIZE,
            WHITE,
        );
        draw_text(
            &format!("fps: {:.1}", self.fps),
            20.0,
            88.0,
            HUD_FONT_SIZE,
            WHITE,
        );
        draw_text(
            "space: reroll a stat  |  c: curve  |  drag a card onto the zone",
            20.0,
            screen_height() - 16.0,
            20.0,
            LIGHTGRAY,
        );
    }
}

pub async fn run() {
    install_panic_hook();
    let mut game = GameState::new().await;
    let mut accumulator = 0.0_f32;

    loop {
        let frame_time = get_frame_time();
        // Consume real elapsed time in fixed-size simulation steps.
        accumulator += frame_time;
        while accumulator >= FIXED_STEP_SECONDS {
            game.fixed_update();
            accumulator -= FIXED_STEP_SECONDS;
        }

        game.handle_pointer();
        game.handle_keys();
        game.frame_update(frame_time);
        game.update_fps_if_due();
        game.render();

        next_frame().await;
    }
}

#[cfg(target_arch = "wasm32")]
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        let msg = info.to_string();
        if let Some(location) = info.location() {
            miniquad::error!("panic at {}:{}: {}", location.file(), location.line(), msg);
        } else {
            miniquad::error!("panic: {}", msg);
        }
    }));
}

#[cfg(not(target_arch = "wasm32"))]
fn install_panic_hook() {}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn screen_and_table_space_round_trip() {
        let center = vec2(640.0, 360.0);
        let table_point = TableVec2::new(-120.0, 45.0);
        let screen = table_to_screen(table_point, center);
        let back = screen_to_table(screen, center);
        assert!((back - table_point).length() < 1e-6);
        // Positive table y lands below the screen center.
        assert!(screen.y > center.y);
    }

    #[test]
    fn topmost_hit_prefers_the_raised_card() {
        let mut table = Table::new(TableConfig::default(), Rng::with_seed(2)).unwrap();
        table.spawn_hand(3);
        let mut scheduler = FrameScheduler::new();
        for _ in 0..60 {
            table.advance(DT);
        }

        let id = table.hand()[0];
        assert!(table.pointer_down(id, &mut scheduler));
        table.set_pointer(TableVec2::ZERO);
        scheduler.tick(&mut table, DT);

        // The held card rides the pointer and sits above everything else.
        assert_eq!(topmost_card_at(&table, TableVec2::ZERO), Some(id));
    }

    #[test]
    fn empty_table_space_hits_nothing() {
        let mut table = Table::new(TableConfig::default(), Rng::with_seed(3)).unwrap();
        table.spawn_hand(4);
        for _ in 0..60 {
            table.advance(DT);
        }
        assert!(topmost_card_at(&table, TableVec2::new(5_000.0, 5_000.0)).is_none());
    }
}
