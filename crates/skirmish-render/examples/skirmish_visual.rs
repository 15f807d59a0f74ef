//! Interactive skirmish scene on the debug GPU backend.
//!
//! Run with:
//!   cargo run --example skirmish_visual --features renderer -p skirmish-render
//!
//! Controls:
//!   Left mouse drag -- box-select your units
//!   Arrow keys -- scroll the view
//!   P -- toggle unit path display
//!   Escape -- quit

use std::sync::Arc;

use skirmish_render::gpu::{GpuLineSink, GpuRenderer, GpuSpriteSink};
use skirmish_render::prelude::*;
use skirmish_world::prelude::*;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

const LOCAL_PLAYER: PlayerId = PlayerId(1);
const ENEMY: PlayerId = PlayerId(2);
const WINDOW_WIDTH: u32 = 1280;
const WINDOW_HEIGHT: u32 = 800;
const SCROLL_STEP: f32 = 12.0;

// ---------------------------------------------------------------------------
// Demo capabilities
// ---------------------------------------------------------------------------

/// One sprite centered on the actor.
struct Body {
    sprite: Sprite,
    palette: usize,
}

impl ImageSource for Body {
    fn images(&self, actor: &Actor) -> Vec<Renderable> {
        let position = actor.center - self.sprite.size * 0.5;
        vec![Renderable::new(self.sprite, position, self.palette)]
    }
}

/// A roof covering the top half of the building.
struct Roof {
    sprite: Sprite,
}

impl RoofRenderer for Roof {
    fn roof_images(&self, actor: &Actor) -> Vec<Renderable> {
        let offset = Float2::new(self.sprite.width() * 0.5, actor.selected_size.y * 0.5);
        let position = actor.center - offset;
        vec![Renderable::new(self.sprite, position, 0)]
    }
}

struct Cargo(Vec<Pip>);

impl PipProvider for Cargo {
    fn pips(&self) -> Vec<Pip> {
        self.0.clone()
    }
}

struct Marks(Vec<Tag>);

impl TagProvider for Marks {
    fn tags(&self) -> Vec<Tag> {
        self.0.clone()
    }
}

struct Route(Vec<Cell>);

impl PathProvider for Route {
    fn current_path(&self) -> Vec<Cell> {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// Overlays
// ---------------------------------------------------------------------------

/// Status frames for the current selection.
#[derive(Default)]
struct UnitOrders {
    selected: Vec<ActorId>,
}

impl OrderOverlay for UnitOrders {
    fn render(&mut self, world: &World, overlay: &mut Overlay<'_>) {
        for id in &self.selected {
            if let Some(actor) = world.get(*id) {
                overlay.draw_selection_box(actor, Color::WHITE, true);
            }
        }
    }
}

/// A rally beacon pinned to the map.
struct Beacon {
    image: Renderable,
}

impl UiOverlay for Beacon {
    fn draw(&mut self, sprites: &mut dyn SpriteSink) {
        sprites.draw_sprite(self.image.sprite, self.image.position, self.image.palette);
    }
}

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

type DemoRenderer = WorldRenderer<GpuSpriteSink, GpuLineSink>;

enum RenderState {
    Pending,
    Running {
        gpu: GpuRenderer,
        renderer: DemoRenderer,
    },
}

struct SkirmishApp {
    world: World,
    viewport: Viewport,
    config: RenderConfig,
    rules: Rules,
    orders: UnitOrders,
    render_state: RenderState,
    cursor: Float2,
    drag_start: Option<Float2>,
}

impl SkirmishApp {
    /// Window pixels to world units.
    fn to_world(&self, position: PhysicalPosition<f64>, window_width: u32) -> Float2 {
        let scale = self.viewport.width() / window_width.max(1) as f32;
        self.viewport.location + Float2::new(position.x as f32, position.y as f32) * scale
    }

    fn drag_box(&self) -> Option<SelectionBox> {
        self.drag_start
            .map(|start| SelectionBox::new(start, self.cursor))
    }
}

fn start_renderer(
    window: Arc<winit::window::Window>,
    rules: &Rules,
) -> Result<(GpuRenderer, DemoRenderer), anyhow::Error> {
    let gpu = GpuRenderer::new_blocking(window)?;
    let sheet = SpriteSheet::standard_pips(SpriteId(1000));
    let beacon = Beacon {
        image: Renderable::new(Sprite::new(SpriteId(2000), 6.0, 6.0), Float2::new(300.0, 60.0), 4),
    };
    let renderer = WorldRenderer::new(
        gpu.sprite_sink(),
        gpu.line_sink(),
        Box::new(gpu.terrain(rules.general.cell_size)),
        Box::new(beacon),
        rules.clone(),
        &sheet,
    )?;
    Ok((gpu, renderer))
}

impl ApplicationHandler for SkirmishApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if matches!(self.render_state, RenderState::Running { .. }) {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Skirmish -- drag to select, arrows to scroll, P for paths")
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let window = Arc::new(window);
                match start_renderer(window.clone(), &self.rules) {
                    Ok((gpu, renderer)) => {
                        window.request_redraw();
                        self.render_state = RenderState::Running { gpu, renderer };
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "renderer init failed -- exiting");
                        event_loop.exit();
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "window creation failed -- exiting");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let RenderState::Running { gpu, renderer } = &mut self.render_state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => gpu.resize(size),

            WindowEvent::CursorMoved { position, .. } => {
                let width = gpu.window().inner_size().width;
                self.cursor = self.to_world(position, width);
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => self.drag_start = Some(self.cursor),
                ElementState::Released => {
                    if let Some(drag) = self.drag_box() {
                        self.orders.selected = self
                            .world
                            .actors_in_box(drag.first, drag.second)
                            .into_iter()
                            .filter(|actor| actor.owner == LOCAL_PLAYER)
                            .map(Actor::id)
                            .collect();
                        tracing::info!(selected = self.orders.selected.len(), "selection changed");
                    }
                    self.drag_start = None;
                }
            },

            WindowEvent::KeyboardInput { event: key_ev, .. } => {
                if key_ev.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(code) = key_ev.physical_key else {
                    return;
                };
                match code {
                    KeyCode::ArrowLeft => self.viewport.scroll(Float2::new(-SCROLL_STEP, 0.0)),
                    KeyCode::ArrowRight => self.viewport.scroll(Float2::new(SCROLL_STEP, 0.0)),
                    KeyCode::ArrowUp => self.viewport.scroll(Float2::new(0.0, -SCROLL_STEP)),
                    KeyCode::ArrowDown => self.viewport.scroll(Float2::new(0.0, SCROLL_STEP)),
                    KeyCode::KeyP => {
                        self.config.show_unit_paths = !self.config.show_unit_paths;
                        tracing::info!(
                            show_unit_paths = self.config.show_unit_paths,
                            "path display toggled"
                        );
                    }
                    KeyCode::Escape => event_loop.exit(),
                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => {
                let mut frame = Frame::new(&self.viewport, &self.world, LOCAL_PLAYER)
                    .with_order_overlay(&mut self.orders);
                frame.selection_box = self
                    .drag_start
                    .map(|start| SelectionBox::new(start, self.cursor));

                let stats = renderer.render_frame(frame, &self.config);
                tracing::trace!(
                    submitted = stats.scene.submitted,
                    culled = stats.scene.culled,
                    "frame"
                );

                match gpu.present(&self.viewport) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        let size = gpu.window().inner_size();
                        gpu.resize(size);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        tracing::error!("GPU out of memory -- exiting");
                        event_loop.exit();
                    }
                    Err(e) => tracing::warn!(error = %e, "surface error during render"),
                }

                gpu.window().request_redraw();
            }

            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Scene setup
// ---------------------------------------------------------------------------

fn build_world() -> World {
    let mut world = World::new();

    let tank = |x: f32, y: f32, owner: PlayerId, health: u32| {
        let palette = if owner == LOCAL_PLAYER { 1 } else { 2 };
        Actor::new(Float2::new(x, y), Float2::new(20.0, 20.0))
            .with_owner(owner)
            .with_health(health, 100)
            .with_location(Cell::new((x / 24.0) as i32, (y / 24.0) as i32))
            .with_capability::<dyn ImageSource>(Box::new(Body {
                sprite: Sprite::new(SpriteId(10), 16.0, 16.0),
                palette,
            }))
    };

    world.spawn(
        tank(120.0, 140.0, LOCAL_PLAYER, 90)
            .with_capability::<dyn TagProvider>(Box::new(Marks(vec![Tag::Primary])))
            .with_capability::<dyn PathProvider>(Box::new(Route(vec![
                Cell::new(6, 5),
                Cell::new(7, 5),
                Cell::new(8, 6),
            ]))),
    );
    world.spawn(tank(150.0, 150.0, LOCAL_PLAYER, 40));
    world.spawn(tank(135.0, 190.0, LOCAL_PLAYER, 15));
    world.spawn(tank(420.0, 220.0, ENEMY, 100));

    world.spawn(
        Actor::new(Float2::new(260.0, 260.0), Float2::new(48.0, 48.0))
            .with_owner(LOCAL_PLAYER)
            .with_health(700, 1000)
            .with_capability::<dyn ImageSource>(Box::new(Body {
                sprite: Sprite::new(SpriteId(20), 48.0, 48.0),
                palette: 1,
            }))
            .with_capability::<dyn RoofRenderer>(Box::new(Roof {
                sprite: Sprite::new(SpriteId(21), 48.0, 20.0),
            }))
            .with_capability::<dyn PipProvider>(Box::new(Cargo(vec![
                Pip::Green,
                Pip::Green,
                Pip::Yellow,
                Pip::Empty,
                Pip::Empty,
            ])))
            .with_capability::<dyn TagProvider>(Box::new(Marks(vec![Tag::Fake]))),
    );

    world.add_effect(Box::new(StaticEffect::new(vec![Renderable::new(
        Sprite::new(SpriteId(30), 10.0, 10.0),
        Float2::new(200.0, 120.0),
        4,
    )])));

    world
}

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(winit::event_loop::ControlFlow::Poll);

    let mut app = SkirmishApp {
        world: build_world(),
        viewport: Viewport::default(),
        config: RenderConfig::default(),
        rules: Rules::default(),
        orders: UnitOrders::default(),
        render_state: RenderState::Pending,
        cursor: Float2::ZERO,
        drag_start: None,
    };

    event_loop.run_app(&mut app)?;
    Ok(())
}
