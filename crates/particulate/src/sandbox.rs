//! Sandbox session - the world, its frame buffer and pointer state

use anyhow::Result;
use particulate_simulation::{Cell, CountingStats, Tool, World};

use crate::config::ParticulateConfig;
use crate::render::FrameBuffer;

/// An interactive falling sand session
///
/// Owns everything a frontend needs between frames. Frontends translate
/// their events into `pointer_*` calls and call `tick` once per frame.
pub struct Sandbox {
    world: World,
    frame: FrameBuffer,
    pointer_down: bool,
    stats: CountingStats,
    generation: u64,
}

impl Sandbox {
    pub fn new(config: &ParticulateConfig) -> Result<Self> {
        let world = World::new(config.world.width, config.world.height)?;
        let mut frame = FrameBuffer::new(world.width(), world.height(), config.render.cell_size);
        frame.render(&world);

        log::info!(
            "Sandbox ready: {}x{} cells, {}x{} pixels",
            world.width(),
            world.height(),
            frame.width(),
            frame.height()
        );

        Ok(Self {
            world,
            frame,
            pointer_down: false,
            stats: CountingStats::default(),
            generation: 0,
        })
    }

    /// Press: start a stroke and paint at once
    pub fn pointer_down(&mut self, cell: (i32, i32), brush: u32, tool: Tool) {
        self.pointer_down = true;
        self.world.paint(cell.0, cell.1, brush, tool);
    }

    /// Move: paint only while a stroke is in progress
    pub fn pointer_move(&mut self, cell: (i32, i32), brush: u32, tool: Tool) {
        if self.pointer_down {
            self.world.paint(cell.0, cell.1, brush, tool);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer_down = false;
    }

    /// The pointer left the canvas; ends any stroke
    pub fn pointer_leave(&mut self) {
        self.pointer_down = false;
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Step the simulation once and redraw. Returns the number of cells moved.
    pub fn tick(&mut self) -> u64 {
        let before = self.stats.cells_moved;
        self.world.step(&mut self.stats);
        self.frame.render(&self.world);
        self.generation += 1;
        self.stats.cells_moved - before
    }

    pub fn clear(&mut self) {
        self.world.clear();
        self.frame.render(&self.world);
        log::debug!("Sandbox cleared at generation {}", self.generation);
    }

    pub fn grain_count(&self) -> usize {
        self.world.count(Cell::Sand)
    }

    /// Total cells moved since the sandbox was created
    pub fn cells_moved(&self) -> u64 {
        self.stats.cells_moved
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn cell_size(&self) -> usize {
        self.frame.cell_size()
    }
}
