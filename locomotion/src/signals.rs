//! Animation signal emission.
//!
//! The controller publishes its post-tick state to an external animation system as
//! named booleans, floats and fire-once triggers. Names are the parameter names the
//! character's animator expects.

use std::collections::HashMap;

use crate::{controller::LocomotionMode, types::Vec2};

pub const IS_GROUNDED: &str = "IsGrounded";
pub const IS_CLIMBING: &str = "IsClimbing";
pub const SPEED: &str = "Speed";
pub const CLIMB_VERTICAL: &str = "Climb_Vertical";
pub const CLIMB_HORIZONTAL: &str = "Climb_Horizontal";
pub const JUMP: &str = "Jump";
pub const LAND: &str = "Land";
pub const DO_VAULT: &str = "DoVault";

/// Consumer of animation parameters. Infallible and always available once configured.
pub trait AnimationSink {
    fn set_bool(&mut self, name: &'static str, value: bool);
    fn set_float(&mut self, name: &'static str, value: f32);
    fn trigger(&mut self, name: &'static str);
}

impl<A: AnimationSink + ?Sized> AnimationSink for Box<A> {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        (**self).set_bool(name, value)
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        (**self).set_float(name, value)
    }

    fn trigger(&mut self, name: &'static str) {
        (**self).trigger(name)
    }
}

/// Everything published for one tick, derived from the post-transition state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SignalFrame {
    pub grounded: bool,
    pub climbing: bool,
    /// Only published while Grounded.
    pub speed: Option<f32>,
    /// (horizontal, vertical) climb input, published while Climbing.
    pub climb_axis: Option<Vec2>,
    pub jump: bool,
    pub land: bool,
    pub vault: bool,
}

/// Inputs to [`SignalFrame::derive`] gathered by the controller at the end of a tick.
#[derive(Clone, Copy, Debug)]
pub struct SignalSource {
    pub mode: LocomotionMode,
    pub raw_grounded: bool,
    pub horizontal_speed: f32,
    pub sprinting: bool,
    pub sprint_anim_speed: f32,
    pub move_axis: Vec2,
    pub jumped: bool,
    pub landed: bool,
    pub vault_began: bool,
}

impl SignalFrame {
    pub fn derive(src: &SignalSource) -> Self {
        let speed = (src.mode == LocomotionMode::Grounded).then(|| {
            if src.sprinting {
                src.sprint_anim_speed
            } else {
                src.horizontal_speed
            }
        });
        let climbing = src.mode == LocomotionMode::Climbing;

        Self {
            grounded: src.raw_grounded,
            climbing,
            speed,
            climb_axis: climbing.then_some(src.move_axis),
            jump: src.jumped,
            land: src.landed,
            vault: src.vault_began,
        }
    }

    pub fn emit<A: AnimationSink + ?Sized>(&self, sink: &mut A) {
        sink.set_bool(IS_GROUNDED, self.grounded);
        sink.set_bool(IS_CLIMBING, self.climbing);
        if let Some(speed) = self.speed {
            sink.set_float(SPEED, speed);
        }
        if let Some(axis) = self.climb_axis {
            sink.set_float(CLIMB_VERTICAL, axis.y);
            sink.set_float(CLIMB_HORIZONTAL, axis.x);
        }

        for (fired, name) in [(self.jump, JUMP), (self.land, LAND), (self.vault, DO_VAULT)] {
            if fired {
                log::debug!("animation trigger {name}");
                sink.trigger(name);
            }
        }
    }
}

/// An [`AnimationSink`] that keeps the latest value of every parameter and queues
/// triggers until they are drained. Useful for hosts that poll, and for tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingSink {
    pub bools: HashMap<&'static str, bool>,
    pub floats: HashMap<&'static str, f32>,
    pub triggers: Vec<&'static str>,
}

impl RecordingSink {
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.bools.get(name).copied()
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        self.floats.get(name).copied()
    }

    pub fn fired(&self, name: &str) -> bool {
        self.triggers.iter().any(|t| *t == name)
    }

    pub fn take_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.triggers)
    }
}

impl AnimationSink for RecordingSink {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    fn trigger(&mut self, name: &'static str) {
        self.triggers.push(name);
    }
}
