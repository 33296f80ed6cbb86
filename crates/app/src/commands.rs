use anyhow::{anyhow, Context};
use clap::ArgMatches;
use std::path::PathBuf;
use tracing::info;
use window_capture::{CaptureConfig, SessionOptions};

pub fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let title = matches
        .get_one::<String>("title")
        .ok_or_else(|| anyhow!("missing window title"))?;

    if matches.get_flag("list") {
        return list_windows(title);
    }

    let config = CaptureConfig::default()
        .with_compression_level(matches.get_one::<u8>("level").copied().unwrap_or(6))
        .with_output_dir(
            matches
                .get_one::<String>("dir")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        );
    let options = SessionOptions::new(title.as_str())
        .silent(matches.get_flag("silent"))
        .config(config);

    info!(
        event = "ghostshot.capture_started",
        title = title.as_str(),
        silent = options.silent
    );

    let mut session = window_capture::open(options)?;
    let name = match matches.get_one::<String>("output") {
        Some(name) => session.save(name)?,
        None => session.shot()?,
    };
    let path = session.output_path(&name);
    session
        .close()
        .context("failed to restore the captured window")?;

    info!(event = "ghostshot.capture_completed", path = %path.display());
    println!("{}", path.display());

    Ok(())
}

fn list_windows(query: &str) -> anyhow::Result<()> {
    info!(event = "ghostshot.list_started", query = query);

    let windows = window_capture::list(query)?;
    for window in &windows {
        println!("{:#x}\t{}", window.handle.raw(), window.title);
    }

    info!(event = "ghostshot.list_completed", count = windows.len());
    Ok(())
}
