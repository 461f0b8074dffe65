//! Isolines - headless contour extraction
//!
//! Synthesizes the configured scalar field, runs the selected generator
//! once per iso level and logs what it captured.

use std::process::ExitCode;

use isolines::backend::Backend;
use isolines::config::AppConfig;
use isolines::presets::build_field;

fn main() -> ExitCode {
    let loaded = AppConfig::load();
    let log_level = match &loaded {
        Ok(config) => config.debug.log_level.clone(),
        Err(_) => "info".to_string(),
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    log::info!("Starting isolines");

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let (nx, ny) = (config.grid.nx, config.grid.ny);
    let field = build_field(&config.field, nx, ny);
    if let Some((min, max)) = field.min_max() {
        log::info!("{:?} field {}x{}, range [{}, {}]", config.field.preset, nx, ny, min, max);
    }

    let mut backend = match Backend::from_config(&config.backend, nx, ny) {
        Ok(backend) => backend,
        Err(e) => {
            log::error!("Failed to create isoline generator: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Backend: {}", backend.name());

    for &iso in &config.contour.levels {
        let points = match backend.contour(&field, iso) {
            Ok(points) => points,
            Err(e) => {
                log::error!("Update at iso {} failed: {}", iso, e);
                return ExitCode::FAILURE;
            }
        };

        log::info!("iso {}: {} points, {} segments", iso, points.len(), points.len() / 2);

        if config.debug.dump_points {
            for pair in points.chunks_exact(2) {
                log::info!(
                    "  ({:.5}, {:.5}) -> ({:.5}, {:.5})",
                    pair[0].x,
                    pair[0].y,
                    pair[1].x,
                    pair[1].y
                );
            }
        }
    }

    ExitCode::SUCCESS
}
