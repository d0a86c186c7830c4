//! Dedicated clip player: per-clip actions advanced by frame time.
//!
//! A `ClipPlayer` tracks playback time only. Sampling keyframes and writing
//! poses stays with the host, which reads `ClipAction::local_time` and
//! `ClipAction::is_active` for every action it cares about.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::ids::{ClipId, PlayerId};
use crate::scene::Clip;

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum LoopMode {
    /// Play to the end once, ignoring repetitions.
    Once,
    /// Restart from the beginning until `repetitions` spans have played.
    Repeat,
    /// Alternate direction each span until `repetitions` spans have played.
    PingPong,
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionState {
    Stopped,
    Running,
    /// Finished and holding the last pose.
    Clamped,
    /// Finished and released; no longer contributes to the pose.
    Finished,
}

fn fmod(a: f32, b: f32) -> f32 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Reflect t into [0, span] with ping-pong behavior, where period = 2 * span.
fn ping_pong(t: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    let period = 2.0 * span;
    let m = fmod(t, period);
    if m <= span {
        m
    } else {
        period - m
    }
}

/// Playback state of one clip on one player.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipAction {
    clip: ClipId,
    duration: f32,
    /// Raw time since the last reset, unwrapped across repetitions.
    time: f32,
    loop_mode: LoopMode,
    repetitions: u32,
    clamp_when_finished: bool,
    state: ActionState,
}

impl ClipAction {
    fn new(clip: &Clip) -> Self {
        Self {
            clip: clip.id,
            duration: clip.duration.max(0.0),
            time: 0.0,
            loop_mode: LoopMode::Repeat,
            repetitions: u32::MAX,
            clamp_when_finished: false,
            state: ActionState::Stopped,
        }
    }

    pub fn clip(&self) -> ClipId {
        self.clip
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn state(&self) -> ActionState {
        self.state
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn repetitions(&self) -> u32 {
        self.repetitions
    }

    pub fn clamp_when_finished(&self) -> bool {
        self.clamp_when_finished
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn is_running(&self) -> bool {
        self.state == ActionState::Running
    }

    /// Whether the action currently affects the pose.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ActionState::Running | ActionState::Clamped)
    }

    /// Rewind to the start. A running action keeps running from zero; a
    /// finished one returns to `Stopped`.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        if self.state != ActionState::Running {
            self.state = ActionState::Stopped;
        }
        self
    }

    pub fn set_loop(&mut self, mode: LoopMode, repetitions: u32) -> &mut Self {
        self.loop_mode = mode;
        self.repetitions = repetitions.max(1);
        self
    }

    pub fn set_clamp_when_finished(&mut self, clamp: bool) -> &mut Self {
        self.clamp_when_finished = clamp;
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.state = ActionState::Running;
        self
    }

    pub fn stop(&mut self) -> &mut Self {
        self.state = ActionState::Stopped;
        self.time = 0.0;
        self
    }

    fn spans(&self) -> u32 {
        match self.loop_mode {
            LoopMode::Once => 1,
            LoopMode::Repeat | LoopMode::PingPong => self.repetitions,
        }
    }

    /// Time within the clip, in [0, duration].
    pub fn local_time(&self) -> f32 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        let end = self.duration * self.spans() as f32;
        if self.time >= end {
            // Exactly at the end of the last span; modulo would wrap to 0.
            return match self.loop_mode {
                LoopMode::PingPong if self.spans() % 2 == 0 => 0.0,
                _ => self.duration,
            };
        }
        match self.loop_mode {
            LoopMode::Once => self.time.clamp(0.0, self.duration),
            LoopMode::Repeat => fmod(self.time, self.duration),
            LoopMode::PingPong => ping_pong(self.time, self.duration),
        }
    }

    /// Advance by `dt` seconds. Returns true when the action finished during this step.
    fn advance(&mut self, dt: f32) -> bool {
        if self.state != ActionState::Running {
            return false;
        }
        let end = self.duration * self.spans() as f32;
        self.time += dt;
        if self.time >= end {
            self.time = end;
            self.state = if self.clamp_when_finished {
                ActionState::Clamped
            } else {
                ActionState::Finished
            };
            return true;
        }
        false
    }
}

/// Player created and owned by the registry for one entity.
#[derive(Clone, Debug)]
pub struct ClipPlayer {
    id: PlayerId,
    time: f32,
    time_scale: f32,
    actions: HashMap<ClipId, ClipAction>,
    /// Insertion order of `actions`, so iteration is deterministic.
    order: Vec<ClipId>,
}

impl ClipPlayer {
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            time: 0.0,
            time_scale: 1.0,
            actions: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Total scaled time this player has been advanced by.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
    }

    /// Create or obtain the action for `clip`.
    pub fn clip_action(&mut self, clip: &Clip) -> &mut ClipAction {
        if !self.actions.contains_key(&clip.id) {
            self.order.push(clip.id);
        }
        self.actions
            .entry(clip.id)
            .or_insert_with(|| ClipAction::new(clip))
    }

    pub fn action(&self, clip: ClipId) -> Option<&ClipAction> {
        self.actions.get(&clip)
    }

    /// Actions in creation order.
    pub fn actions(&self) -> impl Iterator<Item = &ClipAction> {
        self.order.iter().filter_map(|id| self.actions.get(id))
    }

    pub fn running_actions(&self) -> usize {
        self.actions.values().filter(|a| a.is_running()).count()
    }

    pub fn stop_all_actions(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advance by `dt` seconds (scaled by `time_scale`). Returns the clips whose
    /// actions finished during this step, in creation order.
    pub fn update(&mut self, dt: f32) -> Vec<ClipId> {
        let scaled = dt * self.time_scale;
        self.time += scaled;
        let mut finished = Vec::new();
        for id in &self.order {
            if let Some(action) = self.actions.get_mut(id) {
                if action.advance(scaled) {
                    finished.push(*id);
                }
            }
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(id: u32, duration: f32) -> Clip {
        Clip::new(ClipId(id), format!("clip{id}"), duration)
    }

    #[test]
    fn clip_action_is_created_once() {
        let mut p = ClipPlayer::new(PlayerId(0));
        let c = clip(1, 1.0);
        p.clip_action(&c).play();
        p.clip_action(&c);
        assert_eq!(p.actions().count(), 1);
        assert!(p.action(ClipId(1)).unwrap().is_running());
    }

    #[test]
    fn once_finishes_at_duration_without_clamp() {
        let mut p = ClipPlayer::new(PlayerId(0));
        let c = clip(1, 0.5);
        p.clip_action(&c)
            .reset()
            .set_loop(LoopMode::Once, 1)
            .set_clamp_when_finished(false)
            .play();

        assert!(p.update(0.3).is_empty());
        let a = p.action(ClipId(1)).unwrap();
        assert!((a.local_time() - 0.3).abs() < 1e-6);

        assert_eq!(p.update(0.3), vec![ClipId(1)]);
        let a = p.action(ClipId(1)).unwrap();
        assert_eq!(a.state(), ActionState::Finished);
        assert!(!a.is_active());
        assert!((a.local_time() - 0.5).abs() < 1e-6);

        // Further updates do not report it again.
        assert!(p.update(1.0).is_empty());
    }

    #[test]
    fn clamp_holds_last_pose() {
        let mut p = ClipPlayer::new(PlayerId(0));
        let c = clip(1, 0.5);
        p.clip_action(&c)
            .set_loop(LoopMode::Once, 1)
            .set_clamp_when_finished(true)
            .play();
        p.update(1.0);
        let a = p.action(ClipId(1)).unwrap();
        assert_eq!(a.state(), ActionState::Clamped);
        assert!(a.is_active());
    }

    #[test]
    fn repeat_wraps_until_repetitions_are_spent() {
        let mut p = ClipPlayer::new(PlayerId(0));
        let c = clip(1, 1.0);
        p.clip_action(&c).set_loop(LoopMode::Repeat, 2).play();

        assert!(p.update(1.25).is_empty());
        assert!((p.action(ClipId(1)).unwrap().local_time() - 0.25).abs() < 1e-5);
        assert_eq!(p.update(1.0), vec![ClipId(1)]);
        assert!((p.action(ClipId(1)).unwrap().local_time() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ping_pong_reflects() {
        let mut p = ClipPlayer::new(PlayerId(0));
        let c = clip(1, 1.0);
        p.clip_action(&c).set_loop(LoopMode::PingPong, 2).play();
        p.update(1.25);
        assert!((p.action(ClipId(1)).unwrap().local_time() - 0.75).abs() < 1e-5);
        p.update(1.0);
        // Two spans: forward then back, ends at the start.
        assert_eq!(p.action(ClipId(1)).unwrap().local_time(), 0.0);
    }

    #[test]
    fn zero_length_clip_finishes_on_first_update() {
        let mut p = ClipPlayer::new(PlayerId(0));
        p.clip_action(&clip(1, 0.0)).set_loop(LoopMode::Once, 1).play();
        assert_eq!(p.update(0.0), vec![ClipId(1)]);
    }

    #[test]
    fn stop_all_actions_stops_and_rewinds() {
        let mut p = ClipPlayer::new(PlayerId(0));
        p.clip_action(&clip(1, 2.0)).play();
        p.clip_action(&clip(2, 2.0)).play();
        p.update(0.5);
        assert_eq!(p.running_actions(), 2);

        p.stop_all_actions();
        assert_eq!(p.running_actions(), 0);
        assert!(p.actions().all(|a| a.state() == ActionState::Stopped && a.time() == 0.0));
    }

    #[test]
    fn reset_keeps_running_action_running() {
        let mut p = ClipPlayer::new(PlayerId(0));
        let c = clip(1, 2.0);
        p.clip_action(&c).play();
        p.update(1.0);
        p.clip_action(&c).reset();
        let a = p.action(ClipId(1)).unwrap();
        assert!(a.is_running());
        assert_eq!(a.time(), 0.0);
    }

    #[test]
    fn time_scale_applies_to_player_and_actions() {
        let mut p = ClipPlayer::new(PlayerId(0));
        p.set_time_scale(2.0);
        p.clip_action(&clip(1, 10.0)).play();
        p.update(0.5);
        assert!((p.time() - 1.0).abs() < 1e-6);
        assert!((p.action(ClipId(1)).unwrap().time() - 1.0).abs() < 1e-6);
    }
}
