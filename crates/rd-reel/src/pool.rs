//! Generation-checked pool of symbol containers
//!
//! Containers are pooled visual placeholders, exclusively owned by one
//! reel. Handles carry a generation so a stale handle from a previous
//! acquire cycle can never mutate a recycled slot.

use log::warn;

/// A pooled visual placeholder bound to one logical symbol slot.
#[derive(Debug, Clone, Default)]
pub struct SymbolContainer {
    /// Current symbol id shown by this container
    pub symbol: String,
    /// Fixed local Y this container was placed at (rest layout)
    pub origin_y: f64,
    /// Blurred sprite variant active
    pub blurred: bool,
    /// Visual emphasis scale (1.0 = none); used by win highlighting
    pub scale: f64,
}

impl SymbolContainer {
    fn reset(&mut self) {
        self.symbol.clear();
        self.origin_y = 0.0;
        self.blurred = false;
        self.scale = 1.0;
    }
}

/// Handle to a pooled container. Invalidated on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerId {
    index: u32,
    generation: u32,
}

#[derive(Debug)]
struct Slot {
    container: SymbolContainer,
    generation: u32,
    in_use: bool,
}

/// Index-addressed arena of containers with explicit acquire/release.
#[derive(Debug, Default)]
pub struct ContainerPool {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl ContainerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate capacity for `n` containers
    pub fn with_capacity(n: usize) -> Self {
        Self {
            slots: Vec::with_capacity(n),
            free: Vec::new(),
        }
    }

    /// Acquire a container, recycling a released slot when available.
    pub fn acquire(&mut self) -> ContainerId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.in_use = true;
            slot.container.reset();
            return ContainerId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            container: SymbolContainer {
                scale: 1.0,
                ..Default::default()
            },
            generation: 0,
            in_use: true,
        });
        ContainerId {
            index,
            generation: 0,
        }
    }

    /// Release a container back to the pool. The handle (and any copy of
    /// it) becomes stale. A double release is a logged no-op.
    pub fn release(&mut self, id: ContainerId) {
        match self.slots.get_mut(id.index as usize) {
            Some(slot) if slot.in_use && slot.generation == id.generation => {
                slot.in_use = false;
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
            _ => warn!("release of stale container handle {id:?}"),
        }
    }

    /// Borrow a live container; None for stale handles.
    pub fn get(&self, id: ContainerId) -> Option<&SymbolContainer> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.in_use && slot.generation == id.generation)
            .map(|slot| &slot.container)
    }

    /// Mutably borrow a live container; None for stale handles.
    pub fn get_mut(&mut self, id: ContainerId) -> Option<&mut SymbolContainer> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.in_use && slot.generation == id.generation)
            .map(|slot| &mut slot.container)
    }

    /// Number of live containers
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.in_use).count()
    }
}
