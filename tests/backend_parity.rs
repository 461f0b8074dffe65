//! Both backends report the same contours for the same field

use isolines::backend::Backend;
use isolines::config::{BackendConfig, BackendKind, FieldConfig, FieldPreset};
use isolines::presets::build_field;

fn backend(kind: BackendKind) -> Option<Backend> {
    let config = BackendConfig {
        kind,
        threads: 2,
        ..BackendConfig::default()
    };
    match Backend::from_config(&config, 48, 40) {
        Ok(backend) => Some(backend),
        Err(e) => {
            eprintln!("Skipping {:?} backend: {}", kind, e);
            None
        }
    }
}

#[test]
fn test_auto_always_yields_a_backend() {
    assert!(backend(BackendKind::Auto).is_some());
}

#[test]
fn test_gpu_and_cpu_counts_agree() {
    let Some(mut gpu) = backend(BackendKind::Gpu) else { return };
    let mut cpu = backend(BackendKind::Cpu).unwrap();

    for preset in [FieldPreset::Peak, FieldPreset::Ripple, FieldPreset::Saddle] {
        let field = build_field(
            &FieldConfig {
                preset,
                ..FieldConfig::default()
            },
            48,
            40,
        );
        for iso in [-0.3, 0.0, 0.25] {
            let gpu_points = gpu.contour(&field, iso).unwrap();
            let cpu_points = cpu.contour(&field, iso).unwrap();
            assert_eq!(gpu_points.len(), cpu_points.len(), "{:?} at iso {}", preset, iso);
            assert_eq!(cpu_points.len() % 2, 0);
        }
    }
}

#[test]
fn test_constant_field_on_cpu() {
    let mut cpu = backend(BackendKind::Cpu).unwrap();
    let field = build_field(
        &FieldConfig {
            preset: FieldPreset::Constant,
            value: 1.0,
            ..FieldConfig::default()
        },
        48,
        40,
    );
    assert!(cpu.contour(&field, 0.5).unwrap().is_empty());
    assert!(cpu.contour(&field, 1.5).unwrap().is_empty());
}
