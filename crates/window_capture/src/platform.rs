//! Platform selection

use crate::config::CaptureConfig;
use crate::session::WindowCapture;
use crate::window::BoundWindow;
use crate::{SessionError, SessionResult};
use tracing::debug;

/// Arguments handed unchanged to the platform session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Partial, case-insensitive window title
    pub title: String,
    /// Hide the window while capturing
    pub silent: bool,
    pub config: CaptureConfig,
}

impl SessionOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }
}

/// Bind a capture session for the running platform
pub fn open(options: SessionOptions) -> SessionResult<Box<dyn WindowCapture>> {
    open_for(std::env::consts::OS, options)
}

/// Bind a capture session for the platform named `os`
#[cfg_attr(not(windows), allow(unused_variables))]
pub fn open_for(os: &str, options: SessionOptions) -> SessionResult<Box<dyn WindowCapture>> {
    debug!(event = "window_capture.platform.open_started", os = os);

    match os {
        #[cfg(windows)]
        "windows" => {
            let session = crate::session::CaptureSession::bind(
                crate::win32::Win32Windows::new(),
                capture_gdi::GdiGrabber::new(),
                &options.title,
                options.silent,
                &options.config,
            )?;
            Ok(Box::new(session))
        }
        _ => Err(SessionError::UnsupportedPlatform {
            platform: os.to_string(),
        }),
    }
}

/// Windows the running platform would bind for `query`, in enumeration order
pub fn list(query: &str) -> SessionResult<Vec<BoundWindow>> {
    list_for(std::env::consts::OS, query)
}

#[cfg_attr(not(windows), allow(unused_variables))]
pub fn list_for(os: &str, query: &str) -> SessionResult<Vec<BoundWindow>> {
    match os {
        #[cfg(windows)]
        "windows" => Ok(crate::discovery::find_windows(
            &crate::win32::Win32Windows::new(),
            query,
        )),
        _ => Err(SessionError::UnsupportedPlatform {
            platform: os.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_platform_is_reported_by_name() {
        let err = open_for("linux", SessionOptions::new("notepad")).err().unwrap();

        match &err {
            SessionError::UnsupportedPlatform { platform } => assert_eq!(platform, "linux"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("linux"));
    }

    #[test]
    fn listing_on_unknown_platform_fails() {
        assert!(matches!(
            list_for("macos", "notepad"),
            Err(SessionError::UnsupportedPlatform { platform }) if platform == "macos"
        ));
    }

    #[cfg(not(windows))]
    #[test]
    fn running_platform_without_backend_is_unsupported() {
        let err = open(SessionOptions::new("notepad").silent(true)).err().unwrap();
        assert!(matches!(
            err,
            SessionError::UnsupportedPlatform { platform } if platform == std::env::consts::OS
        ));
    }

    #[test]
    fn options_builder_keeps_arguments() {
        let options = SessionOptions::new("Notepad")
            .silent(true)
            .config(CaptureConfig::default().with_compression_level(1));

        assert_eq!(options.title, "Notepad");
        assert!(options.silent);
        assert_eq!(options.config.compression_level, 1);
    }
}
