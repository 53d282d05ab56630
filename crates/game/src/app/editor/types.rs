/// Paints tiles into one map file.
pub(crate) struct EditorScene {
    paths: AppPaths,
    level: usize,
    palette: [TileKind; 5],
    tile_group: usize,
    tile_variant: usize,
    on_grid: bool,
    /// Cursor in display pixels, refreshed every tick.
    cursor: Option<Vec2>,
}

impl EditorScene {
    pub(crate) fn new(paths: AppPaths, level: usize) -> Self {
        Self {
            paths,
            level,
            palette: TileKind::ALL,
            tile_group: 0,
            tile_variant: 0,
            on_grid: true,
            cursor: None,
        }
    }

    pub(crate) fn current_tile(&self) -> (TileKind, usize) {
        (self.palette[self.tile_group], self.tile_variant)
    }

    /// Wheel up selects the previous entry. With the modifier held the
    /// variant cycles inside the current kind, otherwise the kind cycles
    /// and the variant restarts at 0.
    fn cycle_palette(&mut self, scroll_steps: i32, modifier: bool, variant_count: usize) {
        if scroll_steps == 0 {
            return;
        }
        let delta = -scroll_steps;
        if modifier {
            let count = variant_count.max(1) as i32;
            self.tile_variant = (self.tile_variant as i32 + delta).rem_euclid(count) as usize;
        } else {
            let count = self.palette.len() as i32;
            self.tile_group = (self.tile_group as i32 + delta).rem_euclid(count) as usize;
            self.tile_variant = 0;
        }
    }

    /// World pixel under the cursor, if the cursor is over the window.
    fn cursor_world(&self, world: &SceneWorld) -> Option<Vec2> {
        let scroll = world.camera().scroll;
        self.cursor
            .map(|display| Vec2::new(display.x + scroll.x, display.y + scroll.y))
    }

    fn cursor_cell(&self, world: &SceneWorld) -> Option<GridPos> {
        self.cursor_world(world)
            .map(|pixel| world.tilemap().cell_at_pixel(pixel))
    }

    fn paint(&mut self, input: &InputSnapshot, world: &mut SceneWorld) {
        let (Some(pixel), Some(cell)) = (self.cursor_world(world), self.cursor_cell(world)) else {
            return;
        };
        let (kind, variant) = self.current_tile();

        if input.left_click_pressed() && !self.on_grid {
            world
                .tilemap_mut()
                .push_offgrid(OffgridTile::new(kind, variant, pixel));
        }
        if input.left_mouse_down() && self.on_grid {
            world.tilemap_mut().place(Tile::new(kind, variant, cell));
        }
        if input.right_mouse_down() {
            let (tilemap, _, assets) = world.split_mut();
            let tile_size = tilemap.tile_size();
            tilemap.remove(cell);
            tilemap.remove_offgrid_at(pixel, |tile_kind, tile_variant| {
                assets.tile_extent(tile_kind, tile_variant, tile_size)
            });
        }
    }

    fn save(&self, world: &SceneWorld) {
        let path = self.paths.map_path(self.level);
        match world.tilemap().save(&path) {
            Ok(()) => info!(
                level = self.level,
                path = %path.display(),
                on_grid = world.tilemap().on_grid_len(),
                offgrid = world.tilemap().offgrid_len(),
                "level_saved"
            ),
            Err(error) => warn!(level = self.level, error = %error, "level_save_failed"),
        }
    }
}
