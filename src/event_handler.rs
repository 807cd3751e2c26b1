use crate::app_state::State;
use crate::display::RenderQuality;
use crate::labels;
use crate::math::Point;
use crate::state::CLICK_SLOP;
use crate::state::UserInputState::{Idle, Panning, Pressed};

use winit::event::*;
use winit::keyboard::{KeyCode, PhysicalKey};

impl State {
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.config.width = new_size.width;
            self.gpu.config.height = new_size.height;
            self.gpu
                .surface
                .configure(&self.gpu.device, &self.gpu.config);
        }
    }

    pub fn input(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                match state {
                    ElementState::Pressed => {
                        self.input.state = Pressed;
                        self.input.press_pos = self.input.mouse_pos;
                        self.input.last_pos = self.input.mouse_pos;
                    }
                    ElementState::Released => {
                        if self.input.state == Pressed {
                            self.click(Point::from(self.input.mouse_pos));
                        }
                        self.input.state = Idle;
                    }
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input.mouse_pos = [position.x as f32, position.y as f32];

                if self.input.state == Pressed {
                    let moved = Point::from(self.input.mouse_pos)
                        .distance(Point::from(self.input.press_pos));
                    if moved > CLICK_SLOP {
                        self.input.state = Panning;
                    }
                }

                if self.input.state == Panning {
                    let delta = Point::from(self.input.mouse_pos) - Point::from(self.input.last_pos);
                    let viewport = self.viewport();
                    self.camera.pan(delta, viewport);
                    self.input.last_pos = self.input.mouse_pos;
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y * 0.1,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.001,
                };
                // Scrolling up zooms in, which lowers the ratio.
                let factor = 1.0 / (1.0 + scroll).max(0.1);

                let viewport = self.viewport();
                self.camera
                    .zoom(factor, Point::from(self.input.mouse_pos), viewport);
                true
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        ..
                    },
                ..
            } => self.key(*code),
            _ => false,
        }
    }

    fn key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::KeyQ => {
                let next = match self.quality {
                    RenderQuality::Fast => RenderQuality::Fine,
                    RenderQuality::Fine => RenderQuality::Fast,
                };
                self.quality_override = Some(next);
                log::info!("arrowhead quality: {:?}", next);
                true
            }
            KeyCode::KeyA => {
                self.quality_override = None;
                log::info!("arrowhead quality: automatic");
                true
            }
            KeyCode::KeyH => {
                let mut hidden = 0;
                for edge in self.scene.edges.iter_mut().filter(|e| e.selected) {
                    edge.hidden = !edge.hidden;
                    hidden += 1;
                }
                log::info!("toggled visibility of {hidden} selected edges");
                true
            }
            KeyCode::Digit0 => {
                self.camera = Default::default();
                true
            }
            _ => false,
        }
    }

    fn click(&mut self, point: Point) {
        let Some(id) = labels::hit_test(&self.labels, point) else {
            return;
        };

        if let Some(selected) = self.scene.toggle_selected(id) {
            log::info!(
                "edge {id} {}",
                if selected { "selected" } else { "deselected" }
            );
        }
    }
}
