use std::path::PathBuf;

use glam::Vec2;
use rein2d::{Body, BodyHandle, DrawList, PhysicsConfig, PhysicsWorld, Scene, SceneRecord};

/// Frame time of the headless loop.
const FRAME_TIME: f64 = 1.0 / 60.0;

struct SandboxApp {
    physics: PhysicsWorld,
    scene: Scene,
    spawned: Vec<BodyHandle>,
}

impl SandboxApp {
    fn new(config: PhysicsConfig) -> Self {
        Self {
            physics: PhysicsWorld::new(config),
            scene: Scene::new(),
            spawned: Vec::new(),
        }
    }

    fn init(&mut self) -> anyhow::Result<()> {
        // Floor and two walls
        self.scene.add(Body::new_plane(Vec2::Y, -4.0)?);
        self.scene.add(Body::new_plane(Vec2::new(1.0, 0.0), -6.0)?);
        self.scene.add(Body::new_plane(Vec2::new(-1.0, 0.0), -6.0)?);
        // Tilted ramp
        self.scene.add(Body::new_plane(Vec2::new(0.3, 1.0), -2.5)?);
        Ok(())
    }

    /// Spawn a small circle (even) or box (odd), as a click would.
    fn spawn(&mut self, index: usize, at: Vec2) -> anyhow::Result<()> {
        let body = if index % 2 == 0 {
            Body::new_circle(at, Vec2::ZERO, 10.0, 0.25)?
        } else {
            Body::new_box(at, Vec2::ZERO, 4.0, 0.25, 0.25, (index as f32 * 15.0).to_radians())?
        };
        self.spawned.push(self.scene.add(body));
        Ok(())
    }

    fn update(&mut self, frame: usize) -> anyhow::Result<()> {
        // Drop a new body every quarter second for the first few seconds
        if frame % 15 == 0 && self.spawned.len() < 24 {
            let index = self.spawned.len();
            let x = (index % 8) as f32 - 3.5;
            self.spawn(index, Vec2::new(x, 5.0))?;
        }
        // Recycle the oldest body every three seconds
        if frame > 0 && frame % 180 == 0 && !self.spawned.is_empty() {
            let oldest = self.spawned.remove(0);
            self.scene.mark_for_removal(oldest)?;
        }
        self.physics.step(&mut self.scene, FRAME_TIME);
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seconds: f64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 5.0,
    };
    let output = args.next().map(PathBuf::from);

    let mut app = SandboxApp::new(PhysicsConfig::default());
    app.init()?;

    let frames = (seconds / FRAME_TIME).round() as usize;
    for frame in 0..frames {
        app.update(frame)?;
        if frame % 60 == 0 {
            let stats = app.physics.stats();
            log::info!(
                "t = {:.1}s: {} bodies, {} contacts",
                frame as f64 * FRAME_TIME,
                stats.bodies,
                stats.contacts
            );
        }
    }

    let mut draw = DrawList::new();
    app.physics.draw(&app.scene, &mut draw);
    log::info!("final frame: {} debug primitives", draw.len());

    let record: SceneRecord = app.scene.to_record();
    let json = serde_json::to_string_pretty(&record)?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)?;
            log::info!("scene written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
