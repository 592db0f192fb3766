//! Interactive orbit view built on eframe and egui_plot.

use std::time::{Duration, Instant};

use eframe::egui;
use egui_plot::{Legend, Line, MarkerShape, Plot, PlotPoint, Points, Text};
use orrery_animation::OrbitAnimation;
use orrery_ephem::PositionSource;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("failed to open the animation window: {0}")]
    Window(String),
}

const SUN_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 215, 0);
const STAR_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 200, 200);

/// Open a window and animate until it is closed.
pub fn run(
    animation: OrbitAnimation,
    source: Box<dyn PositionSource>,
    interval: Duration,
) -> Result<(), ViewerError> {
    info!(backend = source.label(), start = %animation.epoch(), "opening orbit view");
    let app = OrbitView {
        animation,
        source,
        interval,
        last_step: None,
        failure: None,
    };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([900.0, 900.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Solar System Orbits",
        options,
        Box::new(|_| Ok(Box::new(app))),
    )
    .map_err(|err| ViewerError::Window(err.to_string()))
}

struct OrbitView {
    animation: OrbitAnimation,
    source: Box<dyn PositionSource>,
    interval: Duration,
    last_step: Option<Instant>,
    failure: Option<String>,
}

impl OrbitView {
    fn step_if_due(&mut self) {
        if self.failure.is_some() {
            return;
        }
        let due = self
            .last_step
            .is_none_or(|last| last.elapsed() >= self.interval);
        if !due {
            return;
        }
        if let Err(err) = self.animation.advance(self.source.as_ref()) {
            error!(%err, "animation stopped");
            self.failure = Some(err.to_string());
        }
        self.last_step = Some(Instant::now());
    }
}

impl eframe::App for OrbitView {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.step_if_due();

        let limit = self.animation.axis_limit();
        let panel = egui::Frame::default().fill(egui::Color32::BLACK);
        egui::CentralPanel::default().frame(panel).show(ctx, |ui| {
            if let Some(message) = &self.failure {
                ui.colored_label(egui::Color32::LIGHT_RED, message);
            }
            Plot::new("orbits")
                .data_aspect(1.0)
                .include_x(-limit)
                .include_x(limit)
                .include_y(-limit)
                .include_y(limit)
                .show_axes(false)
                .show_grid(false)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .legend(Legend::default())
                .show(ui, |plot_ui| {
                    let stars: Vec<[f64; 2]> = self.animation.stars().to_vec();
                    plot_ui.points(
                        Points::new("", stars)
                            .color(STAR_COLOR)
                            .radius(0.8)
                            .filled(true),
                    );
                    plot_ui.points(
                        Points::new("Sun", vec![[0.0, 0.0]])
                            .color(SUN_COLOR)
                            .shape(MarkerShape::Circle)
                            .radius(9.0)
                            .filled(true),
                    );

                    for track in self.animation.tracks() {
                        let [r, g, b] = track.color;
                        let color = egui::Color32::from_rgb(r, g, b);
                        let trail: Vec<[f64; 2]> = track.trail().collect();
                        plot_ui.line(Line::new("", trail).color(color).width(1.0));
                        if let Some(position) = track.position() {
                            plot_ui.points(
                                Points::new(track.body.name(), vec![position])
                                    .color(color)
                                    .shape(MarkerShape::Circle)
                                    .radius(5.0)
                                    .filled(true),
                            );
                        }
                    }

                    plot_ui.text(
                        Text::new(
                            "date",
                            PlotPoint::new(-0.95 * limit, 0.95 * limit),
                            egui::RichText::new(self.animation.date_label())
                                .color(egui::Color32::WHITE)
                                .size(16.0),
                        )
                        .anchor(egui::Align2::LEFT_TOP),
                    );
                });
        });

        ctx.request_repaint_after(self.interval);
    }
}
