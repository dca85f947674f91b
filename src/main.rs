mod camera;
mod error;
mod geometry;
mod motion;
mod shader;
mod shader_types;
mod state;

use std::path::Path;
use std::process;
use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::geometry::MeshRecord;
use crate::motion::{MotionClock, SPHERE_LAUNCH};
use crate::state::State;

const SCENE_FILE: &str = "assets/sphere.obj";
const WINDOW_TITLE: &str = "Sphere Flight";
const WINDOW_SIZE: u32 = 300;

struct App {
    records: Option<Vec<MeshRecord>>,
    clock: MotionClock,
    state: Option<State>,
}

impl App {
    fn new(records: Vec<MeshRecord>) -> Self {
        Self {
            records: Some(records),
            // The start timestamp is captured exactly once, here.
            clock: MotionClock::start(SPHERE_LAUNCH),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(records) = self.records.take() else {
            return;
        };

        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(WINDOW_TITLE)
                        .with_inner_size(LogicalSize::new(WINDOW_SIZE, WINDOW_SIZE)),
                )
                .unwrap(),
        );

        match pollster::block_on(State::new(window.clone(), records)) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                eprintln!("{err:#}");
                process::exit(1);
            }
        }

        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested; stopping");
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => state.render(),
            WindowEvent::Resized(size) => state.resize(size),
            _ => (),
        }
    }

    // The idle tick: sample the kinematic motion and, only while the sphere
    // is still above its baseline, publish the displacement and ask for a
    // repaint. A suppressed tick leaves the frame untouched.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        if let Some(delta) = self.clock.sample() {
            state.write_displacement(delta);
            state.get_window().request_redraw();
        }
    }
}

fn main() {
    env_logger::init();

    let records = match geometry::load_scene(Path::new(SCENE_FILE)) {
        Ok(records) => records,
        Err(err) => {
            eprintln!("{err:#}");
            process::exit(1);
        }
    };

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(records);
    event_loop.run_app(&mut app).unwrap();
}
