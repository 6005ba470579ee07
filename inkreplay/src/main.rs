#![warn(clippy::pedantic)]

//! Scripted painting session on a software surface, exercising layer reconciliation: painting,
//! undo, redo, copying a stroke with a different brush, backgrounds, and duplicated layers.
//!
//! Optionally writes the final image of the first layer to the PNG path given as the first argument.

pub mod settings;

use anyhow::Result as AnyResult;
use inkreplay_core::brush::{Brush, StrokeRecorder};
use inkreplay_core::software::{DabSettings, MotionEvent, SoftwareSurface};
use inkreplay_core::surface::Background;
use inkreplay_core::{Document, Layer};

/// Strokes painted at the start of the session.
const STROKES: u32 = 24;

/// A wavy line across the surface, different for every `n`.
fn scribble(n: u32, size: [u32; 2]) -> impl Iterator<Item = MotionEvent> {
    let [width, height] = size.map(|v| v as f32);
    let row = (n as f32 * 0.618_034).fract() * height;
    (0..=32).map(move |i| {
        let t = i as f32 / 32.0;
        MotionEvent {
            position: [t * width, row + (t * 9.0 + n as f32).sin() * height * 0.05],
            // Pen up at the end, so the next stroke doesn't connect to this one.
            pressure: if i == 32 { 0.0 } else { 0.2 + 0.8 * (t * std::f32::consts::PI).sin() },
            dtime: 1.0 / 120.0,
        }
    })
}

/// Plan, log, and execute a reconcile.
fn reconcile_logged(layer: &mut Layer<SoftwareSurface>, what: &str) -> usize {
    let plan = layer.plan();
    let cost = layer.reconcile(false);
    log::info!(
        "{what}: {} strokes via {:?}, cost {cost}",
        layer.strokes.len(),
        plan.strategy
    );
    cost
}

fn write_png(path: &std::path::Path, surface: &SoftwareSurface) -> AnyResult<()> {
    let [width, height] = surface.size();
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    let mut encoder = png::Encoder::new(file, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(surface.as_bytes())?;
    writer.finish()?;
    Ok(())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let preferences = settings::Preferences::load();
    if preferences.did_fail_to_load() {
        if let Err(e) = preferences.save() {
            log::warn!("Failed to save preferences:\n{e:?}");
        }
    }
    // Paths are OSStrings, let the system handle character encoding restrictions.
    let output: Option<std::path::PathBuf> = std::env::args_os().nth(1).map(Into::into);
    let size = preferences.size;

    let mut document = Document::with_settings("session", preferences.cache);
    let new_surface = || {
        let mut surface = SoftwareSurface::new(size);
        surface.brush_mut().set_settings(preferences.brush.clone());
        surface
    };
    let base = document.add_layer(new_surface());

    // Paint live.
    for n in 0..STROKES {
        let stroke = document.new_stroke();
        let layer = document
            .layer_mut(base)
            .ok_or_else(|| anyhow::anyhow!("layer vanished"))?;
        let _ = layer.record_stroke(stroke, |surface| {
            surface.brush_mut().split_stroke();
            for event in scribble(n, size) {
                surface.motion(event);
            }
        });
    }
    let history = {
        let layer = document
            .layer(base)
            .ok_or_else(|| anyhow::anyhow!("layer vanished"))?;
        log::info!("painted {layer:?}");
        layer.strokes.clone()
    };
    let layer = document
        .layer_mut(base)
        .ok_or_else(|| anyhow::anyhow!("layer vanished"))?;

    // Undo a few, then most of the way, then redo it all.
    for keep in [STROKES - 3, STROKES / 3] {
        layer.strokes.truncate(keep as usize);
        reconcile_logged(layer, "undo");
    }
    layer.strokes.clone_from(&history);
    reconcile_logged(layer, "redo");

    // Repeat the last stroke in another color.
    let last = history
        .last()
        .ok_or_else(|| anyhow::anyhow!("nothing painted"))?;
    let mut copy = document.copy_stroke(last);
    let recolor = inkreplay_core::software::DabBrush::new(DabSettings {
        color: [220, 30, 30, 255],
        ..preferences.brush.clone()
    });
    copy.change_brush_settings(recolor.save_configuration());
    let layer = document
        .layer_mut(base)
        .ok_or_else(|| anyhow::anyhow!("layer vanished"))?;
    layer.strokes.push(copy.into());
    reconcile_logged(layer, "copy");

    // Paper.
    layer.background = Some(Background::solid(size, [250, 245, 230, 255]));
    reconcile_logged(layer, "background");

    // A second layer sharing the history, and some of its snapshots.
    let duplicate = document
        .duplicate_layer(base, new_surface())
        .ok_or_else(|| anyhow::anyhow!("layer vanished"))?;
    if let Some(layer) = document.layer_mut(duplicate) {
        layer.strokes.truncate(history.len() - 2);
    }
    let estimate = document.reconcile_all(true);
    let cost = document.reconcile_all(false);
    log::info!("duplicated: estimated {estimate}, cost {cost}");
    for layer in document.layers() {
        log::info!("{layer:?}");
    }

    if let Some(path) = output {
        let layer = document
            .layer(base)
            .ok_or_else(|| anyhow::anyhow!("layer vanished"))?;
        write_png(&path, layer.surface())?;
        log::info!("wrote {path:?}");
    }
    Ok(())
}
