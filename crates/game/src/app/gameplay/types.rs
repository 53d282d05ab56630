/// Drives one play session: level progression, the player, enemies,
/// projectiles and the effect requests they raise.
pub(crate) struct GameScene {
    paths: AppPaths,
    level: usize,
    player: Player,
    enemies: Vec<Enemy>,
    leaf_spawners: Vec<LeafSpawner>,
    projectiles: Vec<Projectile>,
    effects: EffectQueue,
    rng: fastrand::Rng,
    /// 0 while alive, otherwise ticks since death.
    dead: u32,
    screenshake: u32,
    /// Negative while the level fades in, positive while it fades out.
    transition: i32,
    cosmetic_requests: u64,
}

impl GameScene {
    pub(crate) fn new(paths: AppPaths, level: usize) -> Self {
        Self::with_rng(paths, level, fastrand::Rng::new())
    }

    pub(crate) fn with_rng(paths: AppPaths, level: usize, rng: fastrand::Rng) -> Self {
        Self {
            paths,
            level,
            player: Player::new(PLAYER_START, &Default::default()),
            enemies: Vec::new(),
            leaf_spawners: Vec::new(),
            projectiles: Vec::new(),
            effects: EffectQueue::new(),
            rng,
            dead: 0,
            screenshake: 0,
            transition: TRANSITION_START,
            cosmetic_requests: 0,
        }
    }

    pub(crate) fn level(&self) -> usize {
        self.level
    }

    /// Highest level id that may be loaded. At least 0 even with no maps.
    fn last_level(&self) -> usize {
        self.paths.level_count().saturating_sub(1)
    }
}
