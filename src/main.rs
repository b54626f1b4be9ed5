use arboard::Clipboard;
use macroquad::prelude::*;
use macroquad::window::Conf;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tile_raycast::config::Config;
use tile_raycast::snapshot::{impact_table, RaycastSnapshot};
use tile_raycast::{logging, traverse_with, Axis, CornerPolicy, Grid, Outcome, Ray, Traversal, TraversalOptions};

const GRID_LINE_COLOR: Color = Color::new(0.25, 0.25, 0.25, 1.0);
const BORDER_COLOR: Color = Color::new(0.0, 0.75, 0.0, 1.0);
const IMPACT_COLOR: Color = Color::new(0.0, 1.0, 0.0, 1.0);
const RAY_COLOR: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// Replay every snapshot in `dir`, printing one line per snapshot
fn run_snapshot_checks(dir: &Path) -> bool {
    println!("Replaying raycast snapshots from {}\n", dir.display());

    let entries = match RaycastSnapshot::load_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::error!("{}", e);
            return false;
        }
    };

    let mut passed = 0;
    let mut failures = Vec::new();

    for (path, snapshot) in entries {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        match snapshot.and_then(|s| s.verify()) {
            Ok(check) if check.passed() => {
                passed += 1;
                println!("✓ {} ({} impacts)", check.name, check.actual);
            }
            Ok(check) => {
                println!(
                    "✗ {} (expected {} impacts, got {})",
                    check.name, check.expected, check.actual
                );
                for mismatch in &check.mismatches {
                    println!("    {}", mismatch);
                }
                failures.push(file_name);
            }
            Err(e) => {
                println!("✗ {} ({})", file_name, e);
                failures.push(file_name);
            }
        }
    }

    println!("\n========================================");
    println!("Snapshot Results: {} passed, {} failed", passed, failures.len());
    println!("========================================");

    if !failures.is_empty() {
        println!("\nFailed snapshots:");
        for name in &failures {
            println!("  - {}", name);
        }
    }

    failures.is_empty()
}

/// Visualization state
struct VisState {
    grid: Grid,
    options: TraversalOptions,
    ray_origin: Vec2,
    ray_destination: Vec2,
    traversal: Traversal,
    background: Color,
    point_size: f32,
    margin: f32,
    snapshot_dir: PathBuf,
}

impl VisState {
    fn new(config: &Config, grid: Grid) -> Self {
        let ray = config.initial_ray();
        let options = config.traversal_options();
        let traversal = traverse_with(&grid, &ray, &options);

        VisState {
            grid,
            options,
            ray_origin: vec2(ray.origin.x, ray.origin.y),
            ray_destination: vec2(ray.destination().x, ray.destination().y),
            traversal,
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
            point_size: config.visual.point_size,
            margin: config.visual.margin,
            snapshot_dir: PathBuf::from(&config.snapshots.directory),
        }
    }

    fn ray(&self) -> Ray {
        Ray::between(
            glam::Vec2::new(self.ray_origin.x, self.ray_origin.y),
            glam::Vec2::new(self.ray_destination.x, self.ray_destination.y),
        )
    }

    /// World space has its origin at the bottom left with y pointing up
    fn world_to_screen(&self, x: f32, y: f32) -> Vec2 {
        let bounds = self.grid.bounds();
        vec2(
            self.margin + x - bounds.min.x,
            self.margin + bounds.max.y - y,
        )
    }

    fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let bounds = self.grid.bounds();
        vec2(
            screen.x - self.margin + bounds.min.x,
            bounds.max.y - (screen.y - self.margin),
        )
    }

    fn handle_mouse(&mut self) {
        let (mouse_x, mouse_y) = mouse_position();
        let world = self.screen_to_world(vec2(mouse_x, mouse_y));

        // Right button drags the origin, left button drags the end point
        if is_mouse_button_down(MouseButton::Right) {
            self.ray_origin = world;
        }
        if is_mouse_button_down(MouseButton::Left) {
            self.ray_destination = world;
        }
    }

    fn update_traversal(&mut self) {
        self.traversal = traverse_with(&self.grid, &self.ray(), &self.options);
    }

    fn toggle_corner_policy(&mut self) {
        self.options.corner_policy = match self.options.corner_policy {
            CornerPolicy::KeepBoth => CornerPolicy::Collapse,
            CornerPolicy::Collapse => CornerPolicy::KeepBoth,
        };
        log::info!("Corner policy: {:?}", self.options.corner_policy);
    }

    fn copy_to_clipboard(&self) {
        let table = impact_table(&self.traversal);
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&table) {
                    log::warn!("Failed to copy to clipboard: {}", e);
                } else {
                    log::info!("Copied {} impacts to clipboard", self.traversal.impacts.len());
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => {
                log::warn!("Failed to access clipboard: {}", e);
            }
        }
    }

    fn save_snapshot(&self) {
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let name = format!("raycast_{}", stamp);
        let path = self.snapshot_dir.join(format!("{}.json", name));

        let snapshot = RaycastSnapshot::capture(&name, &self.grid, &self.ray(), &self.options, &self.traversal);
        match snapshot.save_to_file(&path) {
            Ok(()) => log::info!("Saved snapshot to {}", path.display()),
            Err(e) => log::error!("{}", e),
        }
    }

    fn draw(&self) {
        clear_background(self.background);

        // Visited tiles, brightest first
        for (i, impact) in self.traversal.impacts.iter().enumerate() {
            if self.traversal.is_anomalous(i) {
                continue;
            }
            let (min, size) = self.grid.tile_rect(impact.tile);
            let top_left = self.world_to_screen(min.x, min.y + size.y);
            let shade = 1.0 - impact.time;
            draw_rectangle(top_left.x, top_left.y, size.x, size.y, Color::new(shade, shade, shade, 1.0));
        }

        self.draw_grid();

        let origin = self.world_to_screen(self.ray_origin.x, self.ray_origin.y);
        let destination = self.world_to_screen(self.ray_destination.x, self.ray_destination.y);
        draw_line(origin.x, origin.y, destination.x, destination.y, 2.0, RAY_COLOR);
        draw_circle(origin.x, origin.y, 6.0, RAY_COLOR);

        for impact in &self.traversal.impacts {
            let point = self.world_to_screen(impact.point.x, impact.point.y);
            draw_circle(point.x, point.y, self.point_size, IMPACT_COLOR);
        }

        self.draw_info();
    }

    fn draw_grid(&self) {
        let bounds = self.grid.bounds();
        let count = self.grid.tile_count();

        for row in 0..=count.y {
            let y = self.grid.line_coordinate(Axis::Y, row);
            let start = self.world_to_screen(bounds.min.x, y);
            let end = self.world_to_screen(bounds.max.x, y);
            draw_line(start.x, start.y, end.x, end.y, 1.0, GRID_LINE_COLOR);
        }
        for col in 0..=count.x {
            let x = self.grid.line_coordinate(Axis::X, col);
            let start = self.world_to_screen(x, bounds.min.y);
            let end = self.world_to_screen(x, bounds.max.y);
            draw_line(start.x, start.y, end.x, end.y, 1.0, GRID_LINE_COLOR);
        }

        let top_left = self.world_to_screen(bounds.min.x, bounds.max.y);
        let size = bounds.size();
        draw_rectangle_lines(top_left.x, top_left.y, size.x, size.y, 2.0, BORDER_COLOR);
    }

    fn draw_info(&self) {
        let outcome = match self.traversal.outcome {
            Outcome::Completed if self.traversal.is_truncated() => "truncated by step cap".to_string(),
            Outcome::Completed => "completed".to_string(),
            Outcome::OriginOutsideGrid => "origin outside grid".to_string(),
            Outcome::ImmediateExit { axis } => format!("{:?} crossing leaves grid immediately", axis),
        };

        let lines = [
            format!(
                "Origin: ({:.1}, {:.1})  End: ({:.1}, {:.1})  Length: {:.1}",
                self.ray_origin.x,
                self.ray_origin.y,
                self.ray_destination.x,
                self.ray_destination.y,
                self.ray().length()
            ),
            format!(
                "Impacts: {}  Anomalies: {}  Outcome: {}",
                self.traversal.impacts.len(),
                self.traversal.anomalies.len(),
                outcome
            ),
            format!("Corner policy: {:?}", self.options.corner_policy),
            "Right mouse: move origin  Left mouse: move end".to_string(),
            "C: copy impacts  S: save snapshot  K: corner policy  Esc: quit".to_string(),
        ];

        for (i, line) in lines.iter().enumerate() {
            draw_text(line, 10.0, 20.0 + i as f32 * 18.0, 18.0, WHITE);
        }
    }
}

fn window_conf() -> Conf {
    let config = Config::load();
    let size = config
        .grid()
        .map(|grid| grid.world_size())
        .unwrap_or(glam::Vec2::new(800.0, 600.0));
    let margin = config.visual.margin * 2.0;

    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: (size.x + margin).ceil() as i32,
        window_height: (size.y + margin).ceil() as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let config = Config::load();
    if let Err(e) = logging::install(&config.logging) {
        eprintln!("{}", e);
    }

    // Check command line arguments
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "--check" {
        let dir = args
            .get(2)
            .cloned()
            .unwrap_or_else(|| config.snapshots.directory.clone());
        let all_passed = run_snapshot_checks(Path::new(&dir));
        std::process::exit(if all_passed { 0 } else { 1 });
    }

    let grid = match config.grid() {
        Ok(grid) => grid,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Grid: {} x {} tiles of {} at {}",
        grid.tile_count().x,
        grid.tile_count().y,
        grid.tile_size(),
        grid.origin()
    );

    let mut state = VisState::new(&config, grid);

    loop {
        state.handle_mouse();

        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }
        if is_key_pressed(KeyCode::S) {
            state.save_snapshot();
        }
        if is_key_pressed(KeyCode::K) {
            state.toggle_corner_policy();
        }

        // Close window on Escape
        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        // The ray is recast from scratch every frame
        state.update_traversal();
        state.draw();

        next_frame().await
    }
}
