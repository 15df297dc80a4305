use fastrand::Rng;
use glam::Vec2;

use crate::fan::Pose;
use crate::tween::Transition;

pub const STAT_MIN: i32 = 1;
pub const STAT_MAX: i32 = 9;
/// Lower bound used by the random reroll; it reaches below the normal minimum
/// so health can land on a lethal value.
pub const STAT_RANDOM_MIN: i32 = -2;

pub const STAT_LABEL_SECONDS: f32 = 0.5;
pub const MOVE_SECONDS: f32 = 0.5;
pub const ZONE_MOVE_SECONDS: f32 = 0.5;
pub const GLOW_IN_SECONDS: f32 = 0.5;
pub const GLOW_OUT_SECONDS: f32 = 0.3;
pub const DEMISE_SECONDS: f32 = 2.0;
pub const DEMISE_FALL_DISTANCE: f32 = 220.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatKind {
    ManaCost,
    AttackPower,
    Health,
}

/// A bounded integer stat with an animated display label.
///
/// The stored value changes immediately; the displayed value runs from the
/// previous value to the new one over `STAT_LABEL_SECONDS`. Setting again
/// mid-run drops the old run and starts from the previous stored value.
#[derive(Debug, Clone)]
pub struct StatValue {
    value: i32,
    label: Option<StatLabelRun>,
}

#[derive(Debug, Clone)]
struct StatLabelRun {
    from: i32,
    to: i32,
    progress: Transition<f32>,
}

impl StatValue {
    fn new(value: i32) -> Self {
        Self { value, label: None }
    }

    fn set(&mut self, value: i32) {
        let from = self.value;
        self.value = value;
        self.label = Some(StatLabelRun {
            from,
            to: value,
            progress: Transition::new(0.0, 1.0, STAT_LABEL_SECONDS),
        });
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    /// The integer currently shown on the card face. Truncates while the
    /// label run is in flight, exact once it finishes.
    pub fn displayed(&self) -> i32 {
        match &self.label {
            Some(run) => {
                let t = run.progress.value();
                (run.from as f32 + (run.to - run.from) as f32 * t) as i32
            }
            None => self.value,
        }
    }

    pub fn animating(&self) -> bool {
        self.label.is_some()
    }

    fn advance(&mut self, dt: f32) {
        if self
            .label
            .as_mut()
            .is_some_and(|run| run.progress.advance(dt))
        {
            self.label = None;
        }
    }
}

#[derive(Debug, Clone)]
struct Glow {
    visible: bool,
    opacity: f32,
    fade: Option<Transition<f32>>,
    hide_when_faded: bool,
}

#[derive(Debug, Clone)]
struct MoveRun {
    position: Transition<Vec2>,
    rotation: Transition<f32>,
}

#[derive(Debug, Clone)]
struct Demise {
    fall: Transition<Vec2>,
    fade: Transition<f32>,
}

/// Per-frame outcomes the owner reacts to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CardTick {
    pub demise_finished: bool,
}

/// One interactive card: three animated stats, a pose with a remembered hand
/// slot, a glow overlay while held, and a terminal fall-and-fade.
#[derive(Debug, Clone)]
pub struct Card {
    id: CardId,
    face: usize,
    mana_cost: StatValue,
    attack_power: StatValue,
    health: StatValue,
    position: Vec2,
    rotation: f32,
    opacity: f32,
    last_slot: Pose,
    movement: Option<MoveRun>,
    glow: Glow,
    committed: bool,
    demise: Option<Demise>,
    active: bool,
}

impl Card {
    /// A fresh card with each stat drawn independently and uniformly from
    /// `[STAT_MIN, STAT_MAX]`, glow hidden.
    pub fn new(id: CardId, face: usize, rng: &mut Rng) -> Self {
        Self {
            id,
            face,
            mana_cost: StatValue::new(rng.i32(STAT_MIN..=STAT_MAX)),
            attack_power: StatValue::new(rng.i32(STAT_MIN..=STAT_MAX)),
            health: StatValue::new(rng.i32(STAT_MIN..=STAT_MAX)),
            position: Vec2::ZERO,
            rotation: 0.0,
            opacity: 1.0,
            last_slot: Pose {
                position: Vec2::ZERO,
                rotation: 0.0,
            },
            movement: None,
            glow: Glow {
                visible: false,
                opacity: 0.0,
                fade: None,
                hide_when_faded: false,
            },
            committed: false,
            demise: None,
            active: true,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn face(&self) -> usize {
        self.face
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn last_slot(&self) -> Pose {
        self.last_slot
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_retiring(&self) -> bool {
        self.demise.is_some()
    }

    pub fn glow_visible(&self) -> bool {
        self.glow.visible
    }

    pub fn glow_opacity(&self) -> f32 {
        self.glow.opacity
    }

    pub fn stat(&self, kind: StatKind) -> &StatValue {
        match kind {
            StatKind::ManaCost => &self.mana_cost,
            StatKind::AttackPower => &self.attack_power,
            StatKind::Health => &self.health,
        }
    }

    /// Stores the new value immediately and starts the label run toward it,
    /// dropping any run already in flight for the same stat.
    pub fn set_stat(&mut self, kind: StatKind, value: i32) {
        let stat = match kind {
            StatKind::ManaCost => &mut self.mana_cost,
            StatKind::AttackPower => &mut self.attack_power,
            StatKind::Health => &mut self.health,
        };
        stat.set(value);
    }

    /// Rerolls one uniformly chosen stat from the widened range and reports
    /// what changed.
    pub fn reroll_random_stat(&mut self, rng: &mut Rng) -> (StatKind, i32) {
        let kind = match rng.usize(0..3) {
            0 => StatKind::ManaCost,
            1 => StatKind::AttackPower,
            _ => StatKind::Health,
        };
        let value = rng.i32(STAT_RANDOM_MIN..=STAT_MAX);
        self.set_stat(kind, value);
        (kind, value)
    }

    /// Starts a timed move of position and rotation toward `pose`, replacing
    /// any move in flight, and records the pose for later reverts.
    pub fn move_to(&mut self, pose: Pose, delay: f32) {
        self.movement = Some(MoveRun {
            position: Transition::with_delay(self.position, pose.position, MOVE_SECONDS, delay),
            rotation: Transition::with_delay(self.rotation, pose.rotation, MOVE_SECONDS, delay),
        });
        self.last_slot = pose;
    }

    /// Sends the card back to the slot it last occupied in the hand.
    pub fn reset_to_last_slot(&mut self) {
        self.move_to(self.last_slot, 0.0);
    }

    /// Position-only move used once the card belongs to the drop zone. Does
    /// not touch the remembered hand slot.
    pub fn move_committed(&mut self, position: Vec2) {
        self.movement = Some(MoveRun {
            position: Transition::new(self.position, position, ZONE_MOVE_SECONDS),
            rotation: Transition::new(self.rotation, self.rotation, ZONE_MOVE_SECONDS),
        });
    }

    pub fn set_committed(&mut self) {
        self.committed = true;
    }

    /// Pointer-down. Committed cards ignore the press entirely. Returns true
    /// when the press takes the card.
    pub fn press(&mut self) -> bool {
        if self.committed {
            return false;
        }
        // A fade still in flight snaps to its target before the new one starts.
        if let Some(fade) = self.glow.fade.take() {
            self.glow.opacity = fade.target();
        }
        self.glow.visible = true;
        self.glow.hide_when_faded = false;
        self.glow.fade = Some(Transition::new(self.glow.opacity, 1.0, GLOW_IN_SECONDS));
        true
    }

    /// Pointer-up: the glow fades out and hides itself once gone.
    pub fn release(&mut self) {
        self.glow.fade = Some(Transition::new(self.glow.opacity, 0.0, GLOW_OUT_SECONDS));
        self.glow.hide_when_faded = true;
    }

    /// Drag pick-up: the pointer takes over the pose, so the in-flight move
    /// stops and the tilt straightens out.
    pub fn begin_drag(&mut self) {
        self.movement = None;
        self.rotation = 0.0;
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Starts the terminal fall-and-fade. Runs to completion once started.
    pub fn begin_demise(&mut self) {
        if self.demise.is_some() {
            return;
        }
        self.movement = None;
        self.demise = Some(Demise {
            fall: Transition::new(
                self.position,
                self.position + Vec2::new(0.0, DEMISE_FALL_DISTANCE),
                DEMISE_SECONDS,
            ),
            fade: Transition::new(self.opacity, 0.0, DEMISE_SECONDS),
        });
    }

    /// Steps every running transition by `dt` seconds.
    pub fn advance(&mut self, dt: f32) -> CardTick {
        let mut tick = CardTick::default();

        self.mana_cost.advance(dt);
        self.attack_power.advance(dt);
        self.health.advance(dt);

        let mut move_done = false;
        if let Some(movement) = &mut self.movement {
            move_done = movement.position.advance(dt);
            movement.rotation.advance(dt);
            self.position = movement.position.value();
            self.rotation = movement.rotation.value();
        }
        if move_done {
            self.movement = None;
        }

        let mut glow_done = false;
        if let Some(fade) = &mut self.glow.fade {
            glow_done = fade.advance(dt);
            self.glow.opacity = fade.value();
        }
        if glow_done {
            self.glow.fade = None;
            if self.glow.hide_when_faded {
                self.glow.visible = false;
            }
        }

        let mut demise_done = false;
        if let Some(demise) = &mut self.demise {
            demise_done = demise.fade.advance(dt);
            demise.fall.advance(dt);
            self.position = demise.fall.value();
            self.opacity = demise.fade.value();
        }
        if demise_done {
            self.demise = None;
            self.active = false;
            tick.demise_finished = true;
        }

        tick
    }
}
