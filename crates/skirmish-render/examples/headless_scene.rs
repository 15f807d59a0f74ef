//! Render one frame of a small skirmish on the recording backend and print
//! the draw log as JSON.
//!
//! Run with:
//!   cargo run --example headless_scene -p skirmish-render
//!
//! Set `RUST_LOG=skirmish_render=trace` to see the per-pass tracing output.

use skirmish_render::prelude::*;
use skirmish_world::prelude::*;

const LOCAL_PLAYER: PlayerId = PlayerId(1);

struct Body(Sprite);

impl ImageSource for Body {
    fn images(&self, actor: &Actor) -> Vec<Renderable> {
        vec![Renderable::new(self.0, actor.center - self.0.size * 0.5, 1)]
    }
}

struct Cargo(Vec<Pip>);

impl PipProvider for Cargo {
    fn pips(&self) -> Vec<Pip> {
        self.0.clone()
    }
}

struct Selected(ActorId);

impl OrderOverlay for Selected {
    fn render(&mut self, world: &World, overlay: &mut Overlay<'_>) {
        if let Some(actor) = world.get(self.0) {
            overlay.draw_selection_box(actor, Color::WHITE, true);
        }
    }
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let rules = Rules::from_json(r#"{ "general": { "condition_red": 0.2 } }"#)?;
    let sheet = SpriteSheet::standard_pips(SpriteId(100));
    let (mut renderer, log) = headless_renderer(rules, &sheet)?;

    let mut world = World::new();
    let harvester = world.spawn(
        Actor::new(Float2::new(60.0, 60.0), Float2::new(24.0, 24.0))
            .with_owner(LOCAL_PLAYER)
            .with_health(35, 100)
            .with_capability::<dyn ImageSource>(Box::new(Body(Sprite::new(
                SpriteId(1),
                16.0,
                16.0,
            ))))
            .with_capability::<dyn PipProvider>(Box::new(Cargo(vec![
                Pip::Yellow,
                Pip::Empty,
            ]))),
    );
    world.spawn(
        Actor::new(Float2::new(900.0, 60.0), Float2::new(24.0, 24.0))
            .with_capability::<dyn ImageSource>(Box::new(Body(Sprite::new(
                SpriteId(2),
                16.0,
                16.0,
            )))),
    );

    let viewport = Viewport::new(0.0, 0.0, 320.0, 200.0);
    let mut orders = Selected(harvester);
    let frame = Frame::new(&viewport, &world, LOCAL_PLAYER)
        .with_selection_box(SelectionBox::new(Float2::new(40.0, 40.0), Float2::new(80.0, 80.0)))
        .with_order_overlay(&mut orders);

    let stats = renderer.render_frame(frame, &RenderConfig::default());
    tracing::info!(
        submitted = stats.scene.submitted,
        culled = stats.scene.culled,
        boxed = stats.boxed_actors,
        "frame rendered"
    );

    println!("{}", log.to_json()?);
    Ok(())
}
