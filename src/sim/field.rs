//! Field: the bounded registry that owns and advances the live boxes
//!
//! A body registers under the pixel slot `pos.x + pos.y * width` computed
//! from its position *at registration time*, one body per slot, and the slot
//! never moves as the body does. The slot table is purely a registration
//! invariant; stepping and drawing enumerate a dense list of handles kept in
//! ascending slot order, so iteration cost tracks the number of live bodies,
//! not the slot count.
//!
//! The field owns its bodies (an arena of never-reused indices); callers
//! hold [`BodyHandle`]s into it and mutate through [`Field::body_mut`].

use std::fmt;

use glam::IVec2;

use super::body::{Body, ReflectPolicy};

/// Stable handle to a body owned by a [`Field`].
///
/// Handles index an arena whose entries are never reused, so a handle stays
/// valid (and unambiguous) for the lifetime of the field even across
/// despawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(u32);

/// Errors from field construction and registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Width or height was zero or negative
    BadDimensions { width: i32, height: i32 },
    /// Body position (or size) does not fit inside the field
    OutOfBounds { pos: IVec2 },
    /// Another body is already registered at this slot
    SlotOccupied { slot: usize },
    /// Handle does not refer to a live body
    Unknown(BodyHandle),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::BadDimensions { width, height } => {
                write!(f, "bad field dimensions {width}x{height}")
            }
            FieldError::OutOfBounds { pos } => {
                write!(f, "body at ({}, {}) is outside the field", pos.x, pos.y)
            }
            FieldError::SlotOccupied { slot } => {
                write!(f, "slot {slot} is already occupied")
            }
            FieldError::Unknown(handle) => write!(f, "no live body for {handle:?}"),
        }
    }
}

impl std::error::Error for FieldError {}

/// Bounded registry of live bodies
#[derive(Debug, Clone)]
pub struct Field {
    width: i32,
    height: i32,
    policy: ReflectPolicy,
    /// Arena of bodies; entries become `None` on despawn, indices never reused
    bodies: Vec<Option<Body>>,
    /// One slot per field pixel, `pos.x + pos.y * width` at registration time
    slots: Vec<Option<BodyHandle>>,
    /// Occupied slots in ascending slot order; the step/draw iteration order
    registered: Vec<(usize, BodyHandle)>,
    tick_count: u64,
}

impl Field {
    /// Create an empty field with the default [`ReflectPolicy`].
    pub fn new(width: i32, height: i32) -> Result<Self, FieldError> {
        if width <= 0 || height <= 0 {
            return Err(FieldError::BadDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            policy: ReflectPolicy::default(),
            bodies: Vec::new(),
            slots: vec![None; (width as usize) * (height as usize)],
            registered: Vec::new(),
            tick_count: 0,
        })
    }

    /// Same field, different corner-hit resolution.
    pub fn with_policy(mut self, policy: ReflectPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total slot count (`width * height`)
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live bodies
    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Ticks elapsed since construction
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn slot_index(&self, pos: IVec2) -> Result<usize, FieldError> {
        if pos.x < 0 || pos.x >= self.width || pos.y < 0 || pos.y >= self.height {
            return Err(FieldError::OutOfBounds { pos });
        }
        Ok(pos.x as usize + pos.y as usize * self.width as usize)
    }

    /// Register a body, taking ownership of it.
    ///
    /// The registration slot is keyed by the body's position now; moving
    /// afterwards does not relocate it. Fails without mutating anything if
    /// the body's size is non-positive, its position is outside the field,
    /// or the slot is taken.
    pub fn spawn(&mut self, body: Body) -> Result<BodyHandle, FieldError> {
        if body.width <= 0 || body.height <= 0 {
            return Err(FieldError::BadDimensions {
                width: body.width,
                height: body.height,
            });
        }
        let slot = self.slot_index(body.pos)?;
        if self.slots[slot].is_some() {
            return Err(FieldError::SlotOccupied { slot });
        }

        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Some(body));
        self.slots[slot] = Some(handle);
        let at = self.registered.partition_point(|&(s, _)| s < slot);
        self.registered.insert(at, (slot, handle));
        Ok(handle)
    }

    /// Remove a body, returning it and freeing its registration slot.
    pub fn despawn(&mut self, handle: BodyHandle) -> Result<Body, FieldError> {
        let at = self
            .registered
            .iter()
            .position(|&(_, h)| h == handle)
            .ok_or(FieldError::Unknown(handle))?;
        let (slot, _) = self.registered.remove(at);
        self.slots[slot] = None;
        // Live entries in `registered` always have a body in the arena
        let body = self.bodies[handle.0 as usize].take();
        body.ok_or(FieldError::Unknown(handle))
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize)?.as_ref()
    }

    /// Mutable access for caller-driven changes (velocity, acceleration).
    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize)?.as_mut()
    }

    /// Live bodies in ascending registration-slot order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.registered
            .iter()
            .filter_map(move |&(_, h)| self.bodies[h.0 as usize].as_ref().map(|b| (h, b)))
    }

    /// Advance every live body one tick, then bump the tick counter.
    ///
    /// Single sweep in ascending slot order; a body updated earlier in the
    /// sweep is not revisited within the same tick. The counter increments
    /// even when the field is empty.
    pub fn step(&mut self) {
        for i in 0..self.registered.len() {
            let handle = self.registered[i].1;
            if let Some(body) = self.bodies[handle.0 as usize].as_mut() {
                body.update(self.width, self.height, self.policy);
            }
        }
        self.tick_count += 1;
    }
}
