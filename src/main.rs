// src/main.rs
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn pick_renderer() -> eframe::Renderer {
    match env::var("MOVIEREC_RENDERER").as_deref() {
        Ok("glow") => eframe::Renderer::Glow,
        Ok("wgpu") => eframe::Renderer::Wgpu,
        _ => {
            // Default: Windows = WGPU (DX12), Others = Glow (GL)
            #[cfg(target_os = "windows")]
            {
                eframe::Renderer::Wgpu
            }
            #[cfg(not(target_os = "windows"))]
            {
                eframe::Renderer::Glow
            }
        }
    }
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cfg = movierec::config::load_config();
    info!(
        "data dir {}, search debounce {} ms",
        cfg.data_dir.display(),
        cfg.search_debounce_ms
    );

    let options = eframe::NativeOptions {
        renderer: pick_renderer(),
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([420.0, 480.0]),
        ..Default::default()
    };

    match eframe::run_native(
        "MovieRec",
        options,
        Box::new(|_cc| Ok(Box::new(movierec::app::MovieRecApp::new(cfg)))),
    ) {
        Ok(_) => Ok(()),
        Err(e) => {
            error!("eframe failed to start: {e:?}");
            error!("Hint: try MOVIEREC_RENDERER=wgpu or glow.");
            Err(e)
        }
    }
}
