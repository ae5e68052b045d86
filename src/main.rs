mod audio;
mod core;
mod gui;
mod player;
mod remote;
mod status;

#[cfg(test)]
mod test_support;

use eframe::egui;
use gui::MusicPlayerApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 560.0])
            .with_min_inner_size([360.0, 420.0])
            .with_title("Music Player"),
        ..Default::default()
    };

    eframe::run_native(
        "Music Player",
        options,
        Box::new(|cc| {
            match MusicPlayerApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    log::error!("Failed to initialize app: {}", e);
                    eprintln!("Failed to initialize app: {}", e);
                    std::process::exit(1);
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
