//! Layered grid composition
//!
//! A [`Scene`] owns tile grids in an arena and links them into parent/child
//! trees through [`GridId`] handles. Grids never hold references to each
//! other, so the only way to form a cycle is through [`Scene::add_child`],
//! which rejects it.
//!
//! Children are drawn after their parent, in the order they were added, with
//! positions relative to the parent's origin.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::TileGrid;

/// Handle to a grid stored in a [`Scene`]
///
/// Handles of removed grids stay invalid: slots are reused with a new
/// generation, so an old handle never aliases a newer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    grid: TileGrid,
    parent: Option<GridId>,
    children: Vec<GridId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena of tile grids with parent/child composition
#[derive(Debug, Default)]
pub struct Scene {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live grids
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store a grid as a new root
    pub fn insert(&mut self, grid: TileGrid) -> GridId {
        let node = Node {
            grid,
            parent: None,
            children: Vec::new(),
        };
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return GridId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        GridId {
            index,
            generation: 0,
        }
    }

    /// Remove a grid from the arena.
    ///
    /// It is detached from its parent and its children become roots.
    pub fn remove(&mut self, id: GridId) -> Option<TileGrid> {
        let node = self.node(id)?;
        let parent = node.parent;
        let children = node.children.clone();

        if let Some(parent) = parent {
            self.detach(parent, id);
        }
        for child in children {
            if let Some(node) = self.node_mut(child) {
                node.parent = None;
            }
        }

        let slot = &mut self.slots[id.index as usize];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        self.len -= 1;
        Some(node.grid)
    }

    /// Whether `id` refers to a live grid
    pub fn contains(&self, id: GridId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: GridId) -> Option<&TileGrid> {
        self.node(id).map(|node| &node.grid)
    }

    pub fn get_mut(&mut self, id: GridId) -> Option<&mut TileGrid> {
        self.node_mut(id).map(|node| &mut node.grid)
    }

    /// Attach `child` as the topmost layer of `parent`.
    ///
    /// Returns `Ok(false)` without changes when `child` is not a live grid or
    /// is already a child of `parent`. A child owned by another parent is
    /// moved. Fails when `parent` is unknown or when `child` is `parent`
    /// itself or one of its ancestors.
    pub fn add_child(&mut self, parent: GridId, child: GridId) -> Result<bool> {
        if !self.contains(parent) {
            return Err(Error::UnknownGrid(parent));
        }
        let Some(current_parent) = self.node(child).map(|node| node.parent) else {
            log::trace!("ignoring absent child {:?} for {:?}", child, parent);
            return Ok(false);
        };
        if current_parent == Some(parent) {
            return Ok(false);
        }
        if self.ancestors(parent).any(|id| id == child) || child == parent {
            return Err(Error::CompositionCycle { parent, child });
        }

        if let Some(old) = current_parent {
            self.detach(old, child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        Ok(true)
    }

    /// Detach `child` from `parent`; it stays in the arena as a root
    pub fn remove_child(&mut self, parent: GridId, child: GridId) -> bool {
        if !self.contains_child(parent, child) {
            return false;
        }
        self.detach(parent, child);
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
        true
    }

    /// Whether `child` is a direct child of `parent`
    pub fn contains_child(&self, parent: GridId, child: GridId) -> bool {
        self.node(parent)
            .is_some_and(|node| node.children.contains(&child))
    }

    /// Direct children of `id`, bottom layer first
    pub fn children(&self, id: GridId) -> &[GridId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn parent(&self, id: GridId) -> Option<GridId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Live grids without a parent, in slot order
    pub fn roots(&self) -> Vec<GridId> {
        self.ids()
            .filter(|id| self.parent(*id).is_none())
            .collect()
    }

    /// All live grid handles, in slot order
    pub fn ids(&self) -> impl Iterator<Item = GridId> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.node.as_ref().map(|_| GridId {
                index: index as u32,
                generation: slot.generation,
            })
        })
    }

    /// Walk from the parent of `id` up to its root
    pub fn ancestors(&self, id: GridId) -> impl Iterator<Item = GridId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Paint order for the tree rooted at `root`.
    ///
    /// Pre-order: each grid comes before its children, children in layer
    /// order. Each entry carries the grid's absolute origin, the sum of its
    /// own position and those of its ancestors within this tree.
    pub fn draw_order(&self, root: GridId) -> Vec<(GridId, (usize, usize))> {
        let mut order = Vec::new();
        let Some(node) = self.node(root) else {
            return order;
        };

        let mut stack = vec![(root, node.grid.position())];
        while let Some((id, origin)) = stack.pop() {
            order.push((id, origin));
            for child in self.children(id).iter().rev() {
                if let Some(grid) = self.get(*child) {
                    let (x, y) = grid.position();
                    stack.push((*child, (origin.0.saturating_add(x), origin.1.saturating_add(y))));
                }
            }
        }
        order
    }

    fn detach(&mut self, parent: GridId, child: GridId) {
        if let Some(node) = self.node_mut(parent) {
            node.children.retain(|id| *id != child);
        }
    }

    fn node(&self, id: GridId) -> Option<&Node> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: GridId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }
}
