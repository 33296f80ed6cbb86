//! Window discovery by title

use crate::window::{BoundWindow, WindowHandle, WindowSystem};
use std::ops::ControlFlow;

/// Case-insensitive substring test; `query_lower` must already be lowercase
pub fn title_matches(title: &str, query_lower: &str) -> bool {
    !title.is_empty() && title.to_lowercase().contains(query_lower)
}

fn candidate<W: WindowSystem + ?Sized>(
    windows: &W,
    handle: WindowHandle,
    query_lower: &str,
) -> Option<BoundWindow> {
    if windows.is_minimized(handle) || !windows.is_visible(handle) {
        return None;
    }

    let title = windows.title(handle);
    title_matches(&title, query_lower).then_some(BoundWindow { handle, title })
}

/// First visible, non-minimized window whose title contains `query`
///
/// Enumeration stops at the first match. Which of several matching windows
/// wins depends on the OS enumeration order and may vary between runs.
pub fn find_window<W: WindowSystem + ?Sized>(windows: &W, query: &str) -> Option<BoundWindow> {
    let query_lower = query.to_lowercase();
    let mut found = None;

    windows.enumerate(&mut |handle| match candidate(windows, handle, &query_lower) {
        Some(window) => {
            found = Some(window);
            ControlFlow::Break(())
        }
        None => ControlFlow::Continue(()),
    });

    found
}

/// Every window `find_window` would accept, in enumeration order
pub fn find_windows<W: WindowSystem + ?Sized>(windows: &W, query: &str) -> Vec<BoundWindow> {
    let query_lower = query.to_lowercase();
    let mut found = Vec::new();

    windows.enumerate(&mut |handle| {
        if let Some(window) = candidate(windows, handle, &query_lower) {
            found.push(window);
        }
        ControlFlow::Continue(())
    });

    found
}
