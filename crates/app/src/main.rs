//! ghostshot - capture a desktop window by title into a PNG

mod app;
mod commands;
mod logging;

fn main() -> anyhow::Result<()> {
    let matches = app::build_cli().get_matches();

    let verbose = matches.get_flag("verbose");
    logging::init_logging(!verbose);

    // Window bounds must be reported in physical pixels
    #[cfg(windows)]
    unsafe {
        use windows::Win32::UI::HiDpi::{
            SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
        };
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }

    commands::run(&matches)
}
