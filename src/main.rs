use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use mazeview::export::{export_wires, ExportFormat};
use mazeview::geometry::{obj, patch_file, wire_file};
use mazeview::prelude::*;
use mazeview::window::{WINDOW_HEIGHT, WINDOW_WIDTH};

#[derive(Debug, Parser)]
#[command(name = "mazeview", version, about = "Perspective viewer for maze line drawings and patches", long_about = None)]
struct Arguments {
    /// Geometry to show: `.dw` line list, `.dp` patch list or `.obj` mesh
    input: PathBuf,

    /// Render settings (RON)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Camera position
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_negative_numbers = true)]
    position: Option<Vec<f32>>,

    /// Camera heading in degrees, clockwise from +Y
    #[arg(long, allow_negative_numbers = true)]
    heading: Option<f32>,

    /// Camera pitch in degrees, positive looks up
    #[arg(long, allow_negative_numbers = true)]
    pitch: Option<f32>,

    /// Projection scale in pixels (defaults to the window width)
    #[arg(long)]
    scale: Option<f32>,

    /// Keep the camera pointed at the world origin
    #[arg(long, action = clap::ArgAction::SetTrue)]
    auto_aim: bool,

    /// Stereo mode, overriding the settings file
    #[arg(long, value_enum)]
    stereo: Option<StereoArg>,

    /// Render black and white only
    #[arg(long, action = clap::ArgAction::SetTrue)]
    mono: bool,

    /// Project raw camera space without lowering points by the horizon offset
    #[arg(long, action = clap::ArgAction::SetTrue)]
    no_horizon_bias: bool,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,

    /// Render one frame to this PNG file instead of opening a window
    #[arg(long)]
    png: Option<PathBuf>,

    /// Export the line drawing to an `.svg` or `.vec` file instead of
    /// opening a window
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StereoArg {
    Off,
    Side,
    Anaglyph,
}

impl From<StereoArg> for StereoMode {
    fn from(arg: StereoArg) -> Self {
        match arg {
            StereoArg::Off => StereoMode::Off,
            StereoArg::Side => StereoMode::SideBySide,
            StereoArg::Anaglyph => StereoMode::Anaglyph,
        }
    }
}

enum Geometry {
    Wires(WireList),
    Patches(PatchList),
}

impl Geometry {
    fn load(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let loaded = match ext.as_deref() {
            Some("dw") => wire_file::load_wires(path).map(Geometry::Wires),
            Some("dp") => patch_file::load_patches(path).map(Geometry::Patches),
            Some("obj") => obj::load_obj(path).map(Geometry::Patches),
            _ => return Err(format!("{}: unknown geometry format", path.display())),
        };
        loaded.map_err(|e| format!("{}: {}", path.display(), e))
    }

    fn scene(&self) -> Scene<'_> {
        match self {
            Geometry::Wires(list) => Scene::Wires(list),
            Geometry::Patches(list) => Scene::Patches(list),
        }
    }
}

fn next_stereo(mode: StereoMode) -> StereoMode {
    match mode {
        StereoMode::Off => StereoMode::SideBySide,
        StereoMode::SideBySide => StereoMode::Anaglyph,
        StereoMode::Anaglyph => StereoMode::Off,
    }
}

fn build_camera(args: &Arguments) -> Camera {
    let position = match args.position.as_deref() {
        Some(&[x, y, z]) => Vec3::new(x, y, z),
        _ => Vec3::new(0.0, -20.0, 5.0),
    };
    let mut camera = Camera::looking_at_origin(position)
        .with_projection_scale(args.scale.unwrap_or(args.width as f32));
    if let Some(heading) = args.heading {
        camera.heading = heading.to_radians();
    }
    if let Some(pitch) = args.pitch {
        camera.pitch = pitch.to_radians();
    }
    camera.auto_aim = args.auto_aim;
    camera
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Arguments::parse();

    let mut settings = match &args.settings {
        Some(path) => RenderSettings::load(path).map_err(|e| format!("{}: {}", path.display(), e))?,
        None => RenderSettings::default(),
    };
    if let Some(stereo) = args.stereo {
        settings.stereo.mode = stereo.into();
    }
    if args.no_horizon_bias {
        settings.horizon_bias = false;
    }

    let geometry = Geometry::load(&args.input)?;
    log::info!(
        "loaded {} primitives from {}",
        geometry.scene().len(),
        args.input.display()
    );

    let mut renderer = Renderer::new(settings);
    let mut camera = build_camera(&args);

    if args.png.is_some() || args.export.is_some() {
        return run_headless(&args, &mut renderer, &geometry, &camera);
    }

    let mut window = Window::new("mazeview", args.width, args.height)?;
    let mut frame = FrameBuffer::with_mode(args.width, args.height, !args.mono)
        .map_err(|e| e.to_string())?;
    let mut frame_limiter = FrameLimiter::new(&window);
    let controller = CameraController::default();

    loop {
        match window.poll_events() {
            WindowEvent::Quit => break,
            WindowEvent::Resize(w, h) => {
                window.resize(w, h)?;
                frame.resize(w, h).map_err(|e| e.to_string())?;
            }
            WindowEvent::ToggleAutoAim => {
                camera = camera.effective();
                camera.auto_aim = !camera.auto_aim;
                log::info!("auto-aim {}", if camera.auto_aim { "on" } else { "off" });
            }
            WindowEvent::CycleStereo => {
                let mut settings = renderer.settings().clone();
                settings.stereo.mode = next_stereo(settings.stereo.mode);
                log::info!("stereo {:?}", settings.stereo.mode);
                renderer.set_settings(settings);
            }
            WindowEvent::None => {}
        }

        let delta_time = frame_limiter.wait_and_get_delta(&window) as f32 / 1000.0;
        camera = controller.update(&camera, &window.camera_input(), delta_time);

        if let Err(e) = renderer.render(geometry.scene(), &camera, &mut frame) {
            log::error!("render failed: {}", e);
        }
        window.present(frame.as_bytes())?;
    }

    Ok(())
}

fn run_headless(
    args: &Arguments,
    renderer: &mut Renderer,
    geometry: &Geometry,
    camera: &Camera,
) -> Result<(), String> {
    if let Some(path) = &args.png {
        let mut frame = FrameBuffer::with_mode(args.width, args.height, !args.mono)
            .map_err(|e| e.to_string())?;
        let report = renderer
            .render(geometry.scene(), camera, &mut frame)
            .map_err(|e| e.to_string())?;
        frame.save_png(path).map_err(|e| e.to_string())?;
        log::info!(
            "{} of {} primitives drawn, written to {}",
            report.drawn,
            report.considered,
            path.display()
        );
    }

    if let Some(path) = &args.export {
        let Geometry::Wires(list) = geometry else {
            return Err("vector export needs a line list (.dw)".to_string());
        };
        let format = ExportFormat::from_path(path)
            .ok_or_else(|| format!("{}: expected a .svg or .vec file", path.display()))?;
        let written = export_wires(renderer, list, camera, args.width, args.height, format, path)
            .map_err(|e| e.to_string())?;
        log::info!("{} segments exported to {}", written, path.display());
    }
    Ok(())
}
