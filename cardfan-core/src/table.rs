use fastrand::Rng;
use glam::Vec2;

use crate::card::{Card, CardId, StatKind};
use crate::config::{ConfigError, TableConfig};
use crate::drop_zone::DropZone;
use crate::scheduler::{FrameScheduler, HandlerId};

/// Delay ripple between neighbouring cards when the hand re-lays out.
pub const RELAYOUT_STAGGER_SECONDS: f32 = 0.1;

#[derive(Debug, Clone, Copy)]
struct DragSession {
    card: CardId,
    render_slot: usize,
    follow: HandlerId,
}

/// The tabletop: the card arena, the fanned hand, the drop zone and the
/// single drag session. Every pointer and frame event funnels through here.
///
/// The hand list keeps insertion order and never reorders during a drag; a
/// separate render order carries the raise-to-front while a card is held.
pub struct Table {
    config: TableConfig,
    rng: Rng,
    next_card: u64,
    cards: Vec<Card>,
    hand: Vec<CardId>,
    render_order: Vec<CardId>,
    drop_zone: DropZone,
    reroll_cursor: usize,
    drag: Option<DragSession>,
    pointer: Vec2,
}

impl Table {
    pub fn new(config: TableConfig, rng: Rng) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            drop_zone: DropZone::new(config.drop_zone),
            config,
            rng,
            next_card: 0,
            cards: Vec::new(),
            hand: Vec::new(),
            render_order: Vec::new(),
            reroll_cursor: 0,
            drag: None,
            pointer: Vec2::ZERO,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn drop_zone(&self) -> &DropZone {
        &self.drop_zone
    }

    pub fn hand(&self) -> &[CardId] {
        &self.hand
    }

    /// Back-to-front draw order for the hand, including cards still playing
    /// out their demise.
    pub fn render_order(&self) -> &[CardId] {
        &self.render_order
    }

    pub fn dragged_card(&self) -> Option<CardId> {
        self.drag.map(|session| session.card)
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id() == id)
    }

    fn card_index(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id() == id)
    }

    fn card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.cards.iter_mut().find(|card| card.id() == id)
    }

    /// Rolls how many cards the opening deal should contain.
    pub fn roll_start_count(&mut self) -> usize {
        self.rng
            .usize(self.config.min_start_cards..=self.config.max_start_cards)
    }

    /// Builds the opening hand in one go: every card gets its pose from the
    /// final hand size and starts moving there immediately. The caller must
    /// have the full face batch ready; there is no partial deal.
    pub fn spawn_hand(&mut self, count: usize) {
        let poses = self.config.fan.poses(count);
        for (face, pose) in poses.into_iter().enumerate() {
            let id = CardId(self.next_card);
            self.next_card += 1;
            let mut card = Card::new(id, face, &mut self.rng);
            card.move_to(pose, 0.0);
            self.cards.push(card);
            self.hand.push(id);
            self.render_order.push(id);
        }
    }

    /// Recomputes the fan for the current hand size and sends every card to
    /// its new slot, rippling each move's start by its index.
    pub fn relayout(&mut self) {
        let poses = self.config.fan.poses(self.hand.len());
        let hand = self.hand.clone();
        for (index, (id, pose)) in hand.into_iter().zip(poses).enumerate() {
            if let Some(card) = self.card_mut(id) {
                card.move_to(pose, RELAYOUT_STAGGER_SECONDS * index as f32);
            }
        }
    }

    /// Rerolls one stat on the next hand card in round-robin order, wrapping
    /// the cursor over the current hand. Does nothing with an empty hand.
    pub fn reroll_next_stat(
        &mut self,
        scheduler: &mut FrameScheduler<Table>,
    ) -> Option<(CardId, StatKind, i32)> {
        if self.hand.is_empty() {
            return None;
        }
        self.reroll_cursor %= self.hand.len();
        let id = self.hand[self.reroll_cursor];
        self.reroll_cursor += 1;
        if self.reroll_cursor >= self.hand.len() {
            self.reroll_cursor = 0;
        }

        let Some(index) = self.card_index(id) else {
            return None;
        };
        let (kind, value) = self.cards[index].reroll_random_stat(&mut self.rng);
        self.check_lethal(id, kind, value, scheduler);
        Some((id, kind, value))
    }

    /// The single stat mutation path: the value lands immediately, the label
    /// animates after it, and a health value below 1 starts the card's
    /// removal (demise, hand removal, relayout).
    pub fn set_card_stat(
        &mut self,
        id: CardId,
        kind: StatKind,
        value: i32,
        scheduler: &mut FrameScheduler<Table>,
    ) {
        let Some(index) = self.card_index(id) else {
            return;
        };
        self.cards[index].set_stat(kind, value);
        self.check_lethal(id, kind, value, scheduler);
    }

    fn check_lethal(
        &mut self,
        id: CardId,
        kind: StatKind,
        value: i32,
        scheduler: &mut FrameScheduler<Table>,
    ) {
        if kind == StatKind::Health && value < 1 {
            self.remove_lethal(id, scheduler);
        }
    }

    fn remove_lethal(&mut self, id: CardId, scheduler: &mut FrameScheduler<Table>) {
        let Some(index) = self.card_index(id) else {
            return;
        };
        if self.cards[index].is_retiring() || !self.cards[index].is_active() {
            return;
        }
        // A card dying under the pointer ends the drag session with it.
        if let Some(session) = self.drag {
            if session.card == id {
                scheduler.remove(session.follow);
                self.drag = None;
            }
        }
        self.cards[index].begin_demise();
        self.hand.retain(|&other| other != id);
        self.relayout();
    }

    /// Pointer press routed to a card. Returns true when a drag session
    /// starts. Committed cards never react, and a second press while a
    /// session is active is rejected outright.
    pub fn pointer_down(&mut self, id: CardId, scheduler: &mut FrameScheduler<Table>) -> bool {
        if self.drag.is_some() || !self.hand.contains(&id) {
            return false;
        }
        let Some(index) = self.card_index(id) else {
            return false;
        };
        if !self.cards[index].press() {
            return false;
        }
        self.cards[index].begin_drag();

        let render_slot = self
            .render_order
            .iter()
            .position(|&other| other == id)
            .unwrap_or_else(|| self.render_order.len().saturating_sub(1));
        self.render_order.retain(|&other| other != id);
        self.render_order.push(id);

        let follow = scheduler.add_update(Box::new(|table: &mut Table, _, _| {
            table.follow_pointer();
        }));
        self.drag = Some(DragSession {
            card: id,
            render_slot,
            follow,
        });
        true
    }

    /// Writes the pointer's current table-space position; the follow handler
    /// reads it every frame while a drag is active.
    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = position;
    }

    /// Per-frame drag work: the held card rides the pointer.
    pub fn follow_pointer(&mut self) {
        let Some(id) = self.dragged_card() else {
            return;
        };
        let pointer = self.pointer;
        if let Some(card) = self.card_mut(id) {
            card.set_position(pointer);
        }
    }

    /// Pointer release routed to a card. The glow always fades out; drop
    /// handling runs only for the card the active session tracks; a stale
    /// release from any other card is ignored.
    pub fn pointer_up(&mut self, id: CardId, scheduler: &mut FrameScheduler<Table>) {
        if let Some(card) = self.card_mut(id) {
            card.release();
        }
        let Some(session) = self.drag else {
            return;
        };
        if session.card != id {
            return;
        }

        let position = self
            .card(id)
            .map(|card| card.position())
            .unwrap_or_default();
        if self.drop_zone.accepts(position) {
            self.commit_to_zone(id);
            self.hand.retain(|&other| other != id);
            self.render_order.retain(|&other| other != id);
            self.relayout();
        } else {
            self.render_order.retain(|&other| other != id);
            let slot = session.render_slot.min(self.render_order.len());
            self.render_order.insert(slot, id);
            if let Some(card) = self.card_mut(id) {
                card.reset_to_last_slot();
            }
        }

        scheduler.remove(session.follow);
        self.drag = None;
    }

    fn commit_to_zone(&mut self, id: CardId) {
        if let Some(card) = self.card_mut(id) {
            card.set_committed();
        }
        self.drop_zone.push(id);
        let committed = self.drop_zone.cards().to_vec();
        let count = committed.len();
        for (index, committed_id) in committed.into_iter().enumerate() {
            let position = self.drop_zone.slot_position(index, count);
            if let Some(card) = self.card_mut(committed_id) {
                card.move_committed(position);
            }
        }
    }

    /// Steps every live card's transitions. A card whose demise completes
    /// deactivates here and is reaped later by `sweep_retired`.
    pub fn advance(&mut self, dt: f32) {
        for card in &mut self.cards {
            if card.is_active() {
                card.advance(dt);
            }
        }
    }

    /// Drops deactivated cards from the arena and the render order. Runs on
    /// the fixed-cadence set so a burst of demises is reaped once per frame.
    pub fn sweep_retired(&mut self) {
        if self.cards.iter().all(|card| card.is_active()) {
            return;
        }
        let retired: Vec<CardId> = self
            .cards
            .iter()
            .filter(|card| !card.is_active())
            .map(|card| card.id())
            .collect();
        self.cards.retain(|card| card.is_active());
        self.render_order.retain(|id| !retired.contains(id));
    }
}
