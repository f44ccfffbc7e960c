//! Native window with an embedded browser view (tao + wry).

use tao::dpi::{LogicalSize, PhysicalPosition};
use tao::event::{Event, WindowEvent};
use tao::event_loop::{ControlFlow, EventLoop};
use tao::window::{Window, WindowBuilder};
use tracing::{debug, info};
use wry::WebViewBuilder;

use super::{centered_origin, PresentationError, PresentationHost};
use crate::domain::WindowSpec;

/// Opens one native window whose only content is a browser view.
///
/// `present` never returns normally: closing the window ends the process
/// from inside the event loop, as the platform toolkits require.
#[derive(Debug, Default)]
pub struct WebViewHost;

impl WebViewHost {
    pub fn new() -> Self {
        Self
    }
}

impl PresentationHost for WebViewHost {
    fn present(&self, spec: WindowSpec) -> Result<(), PresentationError> {
        let event_loop = EventLoop::new();
        let window = WindowBuilder::new()
            .with_title(&spec.title)
            .with_inner_size(LogicalSize::new(spec.width, spec.height))
            .with_resizable(spec.resizable)
            .build(&event_loop)
            .map_err(|e| PresentationError::Window(e.to_string()))?;

        if spec.centered {
            center_on_monitor(&window);
        }

        let builder = WebViewBuilder::new().with_url(spec.address.as_str());

        #[cfg(any(
            target_os = "windows",
            target_os = "macos",
            target_os = "ios",
            target_os = "android"
        ))]
        let webview = builder.build(&window);

        #[cfg(not(any(
            target_os = "windows",
            target_os = "macos",
            target_os = "ios",
            target_os = "android"
        )))]
        let webview = {
            use tao::platform::unix::WindowExtUnix;
            use wry::WebViewBuilderExtUnix;
            let vbox = window
                .default_vbox()
                .ok_or_else(|| PresentationError::WebView("window has no GTK container".into()))?;
            builder.build_gtk(vbox)
        };

        let webview = webview.map_err(|e| PresentationError::WebView(e.to_string()))?;
        info!("window '{}' showing {}", spec.title, spec.address);

        event_loop.run(move |event, _, control_flow| {
            *control_flow = ControlFlow::Wait;
            // Both must outlive the loop.
            let _ = (&window, &webview);

            if let Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } = event
            {
                debug!("window closed");
                *control_flow = ControlFlow::Exit;
            }
        })
    }
}

fn center_on_monitor(window: &Window) {
    let Some(monitor) = window.current_monitor() else {
        return;
    };
    let origin = monitor.position();
    let size = monitor.size();
    let outer = window.outer_size();
    let (x, y) = centered_origin(
        (origin.x, origin.y),
        (size.width, size.height),
        (outer.width, outer.height),
    );
    window.set_outer_position(PhysicalPosition::new(x, y));
}
