//! Desktop preview app for the stairlight controller
//!
//! Simulates the staircase installation in a window: a vertical run of
//! lights driven by the real scheduler/sequencer stack, with the two motion
//! sensors either held interactively (exercising the debounce) or bypassed
//! through direct trigger buttons.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant as StdInstant;

use eframe::egui::{self};
use stairlight::{
    CascadeSequencer, Duration, IgnoreReason, Instant, LightLine, LightRail, RailConfig,
    RailEvent, SensorGate, SensorLine, SequencePhase, StepScheduler, TriggerChannel,
    TriggerSender,
};

/// Maximum number of lights the sequencer supports
const MAX_LIGHTS: usize = 32;

/// Capacity of the trigger channel
const TRIGGER_CHANNEL_SIZE: usize = 8;

/// GPIO line per step, ordered from the top of the stairs to the bottom
const STAIR_LINE_IDS: [u8; 13] = [4, 5, 6, 17, 13, 19, 26, 22, 16, 20, 21, 18, 25];

/// Line for the sensor at the bottom of the stairs (starts the up cascade)
const UP_SENSOR_LINE: u8 = 24;

/// Line for the sensor at the top of the stairs (starts the down cascade)
const DOWN_SENSOR_LINE: u8 = 23;

/// Size of each light rectangle in pixels
const LIGHT_SIZE: f32 = 22.0;

/// Gap between lights
const LIGHT_GAP: f32 = 6.0;

/// Static trigger channel between the UI and the sequence executor
static TRIGGERS: TriggerChannel<TRIGGER_CHANNEL_SIZE> =
    TriggerChannel::<TRIGGER_CHANNEL_SIZE>::new();

/// Simulated light line; the rail's shadow state is what gets drawn.
struct SimLight;

impl LightLine for SimLight {
    type Error = std::convert::Infallible;

    fn set(&mut self, _on: bool) -> Result<(), Self::Error> {
        Ok(())
    }

    fn release(&mut self) {}
}

/// Simulated motion sensor whose raw level is a UI-owned flag.
struct SimSensor {
    level: Rc<Cell<bool>>,
}

impl SensorLine for SimSensor {
    fn is_active(&mut self) -> bool {
        self.level.get()
    }

    fn release(&mut self) {}
}

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([760.0, 620.0])
            .with_title("Stairlight Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "stairlight-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    /// The real controller stack running against simulated hardware
    scheduler: StepScheduler<'static, SimLight, SimSensor, MAX_LIGHTS, TRIGGER_CHANNEL_SIZE>,
    /// Direct trigger path, bypassing the sensors
    trigger_sender: TriggerSender<'static, TRIGGER_CHANNEL_SIZE>,
    /// Raw level of the bottom ("up") sensor, owned by the UI
    up_level: Rc<Cell<bool>>,
    /// Raw level of the top ("down") sensor, owned by the UI
    down_level: Rc<Cell<bool>>,

    /// Synthetic controller time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether the simulation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,
    /// Timestamped log lines, newest last
    log: Vec<String>,
}

impl PreviewApp {
    fn new() -> Self {
        let config = RailConfig::new(STAIR_LINE_IDS.len() as u8);

        let rail: LightRail<SimLight, MAX_LIGHTS> =
            LightRail::acquire(&STAIR_LINE_IDS, |_id| Ok(SimLight))
                .unwrap_or_else(|_| unreachable!("simulated lines always acquire"));

        let up_level = Rc::new(Cell::new(false));
        let down_level = Rc::new(Cell::new(false));
        let sensors = SensorGate::new(
            SimSensor {
                level: Rc::clone(&up_level),
            },
            SimSensor {
                level: Rc::clone(&down_level),
            },
            config.bounce_window,
            TRIGGERS.sender(),
        );

        let sequencer = CascadeSequencer::new(TRIGGERS.receiver(), config);
        let scheduler = StepScheduler::new(sensors, sequencer, rail);

        let mut app = Self {
            scheduler,
            trigger_sender: TRIGGERS.sender(),
            up_level,
            down_level,
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            log: Vec::new(),
        };
        app.log("--- Starting stairlight preview ---".to_owned());
        app.log(format!("{} lights initialized.", STAIR_LINE_IDS.len()));
        app.log(format!(
            "Sensor for 'go_up' sequence is active on line {UP_SENSOR_LINE}."
        ));
        app.log(format!(
            "Sensor for 'go_down' sequence is active on line {DOWN_SENSOR_LINE}."
        ));
        app
    }

    fn log(&mut self, message: String) {
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        self.log.push(format!("[{stamp}] {message}"));
    }

    fn log_event(&mut self, event: RailEvent) {
        let message = match event {
            RailEvent::Triggered(direction) => {
                format!("Triggering '{}' sequence.", direction.as_str())
            }
            RailEvent::TriggerIgnored { reason, .. } => match reason {
                IgnoreReason::Cooldown => {
                    "Sequence trigger ignored: system is in cooldown.".to_owned()
                }
                IgnoreReason::Busy => {
                    "Sequence trigger ignored: a sequence is already running.".to_owned()
                }
            },
            RailEvent::SequenceStarted(_) => "Sequence started.".to_owned(),
            RailEvent::SequenceFinished(_) => {
                "Sequence finished. Cooldown started.".to_owned()
            }
            RailEvent::SequenceAborted(_) => {
                "Sequence aborted: hardware write failed.".to_owned()
            }
        };
        self.log(message);
    }

    /// Advance synthetic time from the wall clock and run the controller.
    fn run_controller(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            let delta_ms_f64 = if delta_ms_f64.is_finite() {
                delta_ms_f64.clamp(0.0, u64::MAX as f64)
            } else {
                0.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = delta_ms_f64 as u64;
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }

        if let Err(err) = self.scheduler.tick(Instant::from_millis(self.t_ms)) {
            self.log(format!("Line {} write failed.", err.line));
        }
        while let Some(event) = self.scheduler.next_event() {
            self.log_event(event);
        }
    }

    fn status_line(&self) -> String {
        let now = Instant::from_millis(self.t_ms);
        let phase = match self.scheduler.sequencer().phase() {
            SequencePhase::Idle => "idle",
            SequencePhase::CascadeOn => "cascade on",
            SequencePhase::Hold => "hold",
            SequencePhase::CascadeOff => "cascade off",
        };
        let cooldown = self.scheduler.sequencer().cooldown_remaining(now);
        if cooldown > Duration::from_ticks(0) {
            format!("Phase: {phase} — cooldown {:.1} s", cooldown.as_millis() as f64 / 1000.0)
        } else {
            format!("Phase: {phase}")
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.run_controller();
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.playing = !self.playing;
                        }
                        let secs = self.t_ms / 1000;
                        let ms = self.t_ms % 1000;
                        ui.label(format!("Time: {secs}.{ms:03}s"));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(
                            egui::Slider::new(&mut self.time_scale, 0.1..=10.0)
                                .logarithmic(true),
                        );
                    });
                });
                // </PlaybackControls>

                ui.add_space(24.0);

                // <SensorControls>
                ui.vertical(|ui| {
                    let mut up_held = self.up_level.get();
                    ui.checkbox(
                        &mut up_held,
                        format!("Block bottom beam (line {UP_SENSOR_LINE})"),
                    );
                    self.up_level.set(up_held);

                    let mut down_held = self.down_level.get();
                    ui.checkbox(
                        &mut down_held,
                        format!("Block top beam (line {DOWN_SENSOR_LINE})"),
                    );
                    self.down_level.set(down_held);

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        if ui.button("⬆ Trigger go_up").clicked() {
                            self.trigger_sender.go_up();
                        }
                        if ui.button("⬇ Trigger go_down").clicked() {
                            self.trigger_sender.go_down();
                        }
                    });
                });
                // </SensorControls>
            });

            ui.add_space(8.0);
            ui.label(self.status_line());
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                // === Staircase ===
                let states: Vec<bool> = self.scheduler.rail().states().to_vec();
                let height = states.len() as f32 * (LIGHT_SIZE + LIGHT_GAP);
                let (response, painter) = ui.allocate_painter(
                    egui::vec2(220.0, height),
                    egui::Sense::hover(),
                );
                let origin = response.rect.min;

                for (i, on) in states.iter().enumerate() {
                    // Each step is inset a little further, stair-like.
                    let x = origin.x + i as f32 * 10.0;
                    let y = origin.y + i as f32 * (LIGHT_SIZE + LIGHT_GAP);
                    let rect = egui::Rect::from_min_size(
                        egui::pos2(x, y),
                        egui::vec2(LIGHT_SIZE * 3.0, LIGHT_SIZE),
                    );
                    let color = if *on {
                        egui::Color32::from_rgb(255, 196, 110)
                    } else {
                        egui::Color32::from_rgb(45, 45, 50)
                    };
                    painter.rect_filled(rect, 4.0, color);
                }

                ui.add_space(16.0);

                // === Event log ===
                ui.vertical(|ui| {
                    egui::ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .max_height(height)
                        .show(ui, |ui| {
                            for line in &self.log {
                                ui.monospace(line);
                            }
                        });
                });
            });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Shutdown path: sensors first, then lights; safe mid-cascade.
        self.scheduler.release();
    }
}
