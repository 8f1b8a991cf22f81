use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

/// How long the overlay stays up once triggered.
pub const OVERLAY_DURATION: Duration = Duration::from_millis(4200);

const RAIN_COUNT: usize = 18;
const RAIN_SYMBOLS: [&str; 5] = ["🎉", "✨", "💪", "🔥", "🥳"];
pub const BANNER: &str = "SESSION COMPLETE!";

/// Rows per second a rain drop falls once released.
const FALL_SPEED: f64 = 4.0;
const GRAVITY: f64 = 3.0;
const SETTLE_RATE: f64 = 3.0;
/// Largest step the animation takes, so a stalled loop does not teleport particles.
const MAX_STEP: f64 = 0.25;

/// One piece of the emoji rain or of the banner.
#[derive(Debug, Clone)]
pub struct CelebrationParticle {
    pub x: f64,
    pub y: f64,
    pub vel_x: f64,
    pub vel_y: f64,
    pub symbol: String,
    pub color_index: usize,
    /// Seconds before the particle starts moving or showing.
    pub delay: f64,
    pub age: f64,
    pub is_text: bool,
    pub target_x: f64,
    pub target_y: f64,
}

impl CelebrationParticle {
    fn raindrop(x: f64, rng: &mut impl Rng) -> Self {
        Self {
            x,
            y: -1.0,
            vel_x: rng.gen_range(-0.5..0.5),
            vel_y: FALL_SPEED * rng.gen_range(0.8..1.3),
            symbol: RAIN_SYMBOLS
                .choose(rng)
                .copied()
                .unwrap_or("🎉")
                .to_string(),
            color_index: rng.gen_range(0..7),
            delay: rng.gen_range(0.0..0.6),
            age: 0.0,
            is_text: false,
            target_x: x,
            target_y: f64::MAX,
        }
    }

    fn letter(x: f64, y: f64, target_x: f64, target_y: f64, ch: char, color: usize) -> Self {
        Self {
            x,
            y,
            vel_x: 0.0,
            vel_y: 0.0,
            symbol: ch.to_string(),
            color_index: color,
            delay: 0.0,
            age: 0.0,
            is_text: true,
            target_x,
            target_y,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.age >= self.delay
    }

    fn update(&mut self, dt: f64) {
        self.age += dt;
        if !self.is_visible() {
            return;
        }

        if self.is_text {
            // Close a fixed share of the gap each second, then snap into place.
            let pull = (SETTLE_RATE * dt).min(1.0);
            self.x += (self.target_x - self.x) * pull;
            self.y += (self.target_y - self.y) * pull;
            let dist = ((self.target_x - self.x).powi(2) + (self.target_y - self.y).powi(2)).sqrt();
            if dist < 0.5 {
                self.x = self.target_x;
                self.y = self.target_y;
            }
        } else {
            self.x += self.vel_x * dt;
            self.y += self.vel_y * dt;
            self.vel_y += GRAVITY * dt;
        }
    }
}

/// Emoji rain plus a banner, shown for a fixed time after a session completes.
///
/// The overlay runs on its own clock. Starting a new session while it is up
/// does not touch it, and it never touches the timer.
#[derive(Debug)]
pub struct CelebrationAnimation {
    pub particles: Vec<CelebrationParticle>,
    pub banner: String,
    pub is_active: bool,
    started_at: Option<Instant>,
    last_update: Option<Instant>,
    width: f64,
    height: f64,
}

impl CelebrationAnimation {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            banner: String::new(),
            is_active: false,
            started_at: None,
            last_update: None,
            width: 80.0,
            height: 24.0,
        }
    }

    pub fn start(&mut self, width: u16, height: u16, now: Instant) {
        let mut rng = rand::thread_rng();

        self.particles.clear();
        self.is_active = true;
        self.started_at = Some(now);
        self.last_update = Some(now);
        self.width = width.max(1) as f64;
        self.height = height.max(1) as f64;
        self.banner = BANNER.to_string();

        for _ in 0..RAIN_COUNT {
            let x = rng.gen_range(0.0..self.width);
            self.particles.push(CelebrationParticle::raindrop(x, &mut rng));
        }

        let banner = self.banner.clone();
        self.spell(&banner, &mut rng);
    }

    fn spell(&mut self, text: &str, rng: &mut impl Rng) {
        let center_x = self.width / 2.0;
        let center_y = self.height / 2.0;
        let spacing = 2.0;
        let text_width = (text.chars().count() as f64 - 1.0) * spacing;
        let left = center_x - text_width / 2.0;

        for (i, ch) in text.chars().enumerate() {
            if ch == ' ' {
                continue;
            }
            let target_x = left + i as f64 * spacing;
            let start_x = center_x + rng.gen_range(-10.0..10.0);
            let start_y = center_y + rng.gen_range(-5.0..5.0);
            self.particles.push(CelebrationParticle::letter(
                start_x,
                start_y,
                target_x,
                center_y,
                ch,
                rng.gen_range(0..7),
            ));
        }
    }

    /// Advance the animation. Hides the overlay once its delay has passed.
    pub fn update(&mut self, now: Instant) {
        if !self.is_active {
            return;
        }
        let Some(started_at) = self.started_at else {
            return;
        };

        if now.saturating_duration_since(started_at) >= OVERLAY_DURATION {
            self.hide();
            return;
        }

        let dt = self
            .last_update
            .map(|last| now.saturating_duration_since(last).as_secs_f64())
            .unwrap_or(0.0)
            .min(MAX_STEP);
        self.last_update = Some(now);

        let height = self.height;
        self.particles.retain_mut(|particle| {
            particle.update(dt);
            particle.is_text || particle.y <= height + 2.0
        });
    }

    pub fn hide(&mut self) {
        self.is_active = false;
        self.particles.clear();
        self.started_at = None;
        self.last_update = None;
    }
}

impl Default for CelebrationAnimation {
    fn default() -> Self {
        Self::new()
    }
}
