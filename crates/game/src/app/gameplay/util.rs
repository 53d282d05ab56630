impl GameScene {
    /// Random offset in `[-shake/2, shake/2)` on each axis.
    fn shake_offset(&mut self) -> (i32, i32) {
        if self.screenshake == 0 {
            return (0, 0);
        }
        let amount = self.screenshake as f32;
        let x = self.rng.f32() * amount - amount / 2.0;
        let y = self.rng.f32() * amount - amount / 2.0;
        (x as i32, y as i32)
    }
}

/// Current animation frame, or a flat box when the body has no frames.
fn draw_body(
    target: &mut dyn RenderTarget,
    body: &PhysicsBody,
    offset: (i32, i32),
    fallback: [u8; 4],
) {
    match body.animation().current() {
        Some(&sprite) => {
            let (x, y) = body.sprite_origin(offset);
            target.draw_sprite(sprite, ScreenPoint::new(x, y), body.flip);
        }
        None => {
            let rect = ScreenRect::new(
                body.position.x as i32 - offset.0,
                body.position.y as i32 - offset.1,
                body.size.0,
                body.size.1,
            );
            target.fill_rect(rect, fallback);
        }
    }
}

/// Gun held at the body's centre height, on the side it faces.
fn draw_gun(target: &mut dyn RenderTarget, body: &PhysicsBody, gun: SpriteId, offset: (i32, i32)) {
    let center = body.rect().center();
    let (gun_width, _) = target.sprite_size(gun).unwrap_or((0, 0));
    let x = if body.flip {
        center.x as i32 - GUN_BARREL_GAP - gun_width as i32
    } else {
        center.x as i32 + GUN_BARREL_GAP
    };
    let dest = ScreenPoint::new(x - offset.0, center.y as i32 - offset.1);
    target.draw_sprite(gun, dest, body.flip);
}

/// Projectile sprite centred on its position.
fn draw_projectile(
    target: &mut dyn RenderTarget,
    projectile: &Projectile,
    sprite: Option<SpriteId>,
    offset: (i32, i32),
) {
    let size = sprite
        .and_then(|sprite| target.sprite_size(sprite))
        .unwrap_or(PROJECTILE_FALLBACK_SIZE);
    let x = (projectile.pos.x - size.0 as f32 / 2.0) as i32 - offset.0;
    let y = (projectile.pos.y - size.1 as f32 / 2.0) as i32 - offset.1;
    match sprite {
        Some(sprite) => target.draw_sprite(sprite, ScreenPoint::new(x, y), false),
        None => target.fill_rect(
            ScreenRect::new(x, y, size.0, size.1),
            PROJECTILE_FALLBACK_COLOR,
        ),
    }
}

/// Rows of the level transition: everything outside a circle of `radius`
/// centred on the view is covered. A radius of 0 or less covers the view.
fn transition_spans(view: (u32, u32), radius: i32) -> Vec<(ScreenRect, [u8; 4])> {
    let (width, height) = view;
    if radius <= 0 {
        return vec![(ScreenRect::new(0, 0, width, height), TRANSITION_COLOR)];
    }

    let center_x = (width / 2) as f32;
    let center_y = (height / 2) as f32;
    let radius = radius as f32;
    let mut spans = Vec::new();
    for row in 0..height {
        let dy = row as f32 + 0.5 - center_y;
        if dy.abs() >= radius {
            spans.push((ScreenRect::new(0, row as i32, width, 1), TRANSITION_COLOR));
            continue;
        }
        let half = (radius * radius - dy * dy).sqrt();
        let left = (center_x - half).round().clamp(0.0, width as f32) as u32;
        let right = (center_x + half).round().clamp(0.0, width as f32) as u32;
        if left > 0 {
            spans.push((ScreenRect::new(0, row as i32, left, 1), TRANSITION_COLOR));
        }
        if right < width {
            spans.push((
                ScreenRect::new(right as i32, row as i32, width - right, 1),
                TRANSITION_COLOR,
            ));
        }
    }
    spans
}
