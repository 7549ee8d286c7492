//! Invalid area tracking
//!
//! The tree only produces invalid areas; a display refresher drains them
//! with [`ObjTree::take_invalid`] and redraws each one.

use tracing::trace;

use crate::geom::Area;
use crate::obj::{ObjFlags, ObjId};
use crate::tree::ObjTree;

/// Queue of screen areas that need redrawing
#[derive(Debug)]
pub struct InvalidAreas {
    areas: Vec<Area>,
    capacity: usize,
    screen: Area,
}

impl InvalidAreas {
    pub fn new(screen: Area, capacity: usize) -> Self {
        Self {
            areas: Vec::new(),
            capacity: capacity.max(1),
            screen,
        }
    }

    /// Queue an area
    ///
    /// The area is clipped to the screen. An area inside a queued one is
    /// dropped and queued areas inside the new one are replaced by it. When
    /// the queue is full it collapses to a single full-screen area.
    pub fn submit(&mut self, area: Area) {
        let Some(area) = area.intersect(&self.screen) else {
            return;
        };
        if self.areas.iter().any(|queued| queued.includes(&area)) {
            return;
        }
        self.areas.retain(|queued| !area.includes(queued));
        if self.areas.len() >= self.capacity {
            trace!("invalid queue full, invalidating the whole screen");
            self.areas.clear();
            self.areas.push(self.screen);
            return;
        }
        self.areas.push(area);
    }

    /// Whether the whole screen is already queued
    pub fn is_full_screen(&self) -> bool {
        self.areas.first() == Some(&self.screen)
    }

    pub fn areas(&self) -> &[Area] {
        &self.areas
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }

    /// Take all queued areas
    pub fn take(&mut self) -> Vec<Area> {
        std::mem::take(&mut self.areas)
    }
}

impl ObjTree {
    /// Mark the drawn area of a node as needing redraw
    ///
    /// The area is clipped by every ancestor. Nothing is produced for a node
    /// that is hidden, has a hidden ancestor or is not on the active screen.
    pub fn invalidate(&mut self, obj: ObjId) {
        let Some(o) = self.objs.get(obj) else {
            return;
        };
        if o.flags.contains(ObjFlags::HIDDEN) {
            return;
        }
        let mut area = o.draw_area();
        let mut cur = o.parent;
        let mut root = obj;
        while let Some(p) = cur {
            let po = &self.objs[p];
            if po.flags.contains(ObjFlags::HIDDEN) {
                return;
            }
            area = match area.intersect(&po.coords) {
                Some(a) => a,
                None => return,
            };
            root = p;
            cur = po.parent;
        }
        if self.act_scr != Some(root) {
            return;
        }
        trace!("invalidate {:?}: {:?}", obj, area);
        self.invalid.submit(area);
    }

    /// Mark an arbitrary screen area as needing redraw
    pub fn invalidate_area(&mut self, area: Area) {
        self.invalid.submit(area);
    }

    /// Queued invalid areas
    pub fn invalid_areas(&self) -> &[Area] {
        self.invalid.areas()
    }

    /// Drain the invalid area queue
    pub fn take_invalid(&mut self) -> Vec<Area> {
        self.invalid.take()
    }
}
