use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoopProxy};
use winit::window::{Window, WindowId};
use wry::http::Request;
use wry::WebViewBuilder;

use playground::messages::Msg;
use playground::runtime::Runtime;

use super::page::{self, PageBootstrap, PageEvent};
use super::webview::{palette_for, WebviewHost};

/// Longest sleep between checks for background results
const ASYNC_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Events delivered to the event loop from outside winit
#[derive(Debug, Clone)]
pub enum ShellEvent {
    Page(PageEvent),
}

pub struct ShellApp {
    // Drops before the window so the webview goes first
    runtime: Runtime<WebviewHost>,
    window: Option<Window>,
    proxy: EventLoopProxy<ShellEvent>,
    started: bool,
}

impl ShellApp {
    pub fn new(runtime: Runtime<WebviewHost>, proxy: EventLoopProxy<ShellEvent>) -> Self {
        Self {
            runtime,
            window: None,
            proxy,
            started: false,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), String> {
        let window_attributes = Window::default_attributes()
            .with_title("Ruby Formatting Playground")
            .with_inner_size(LogicalSize::new(1200, 760));
        let window = event_loop
            .create_window(window_attributes)
            .map_err(|e| format!("Failed to create window: {}", e))?;

        let model = self.runtime.model();
        let source = model.source();
        let palette =
            palette_for(model.theme).ok_or_else(|| "No usable palette".to_string())?;
        let html = page::render(&PageBootstrap::new(&source, model.theme, &palette))?;

        let proxy = self.proxy.clone();
        let webview = WebViewBuilder::new()
            .with_html(html)
            .with_ipc_handler(move |request: Request<String>| {
                match PageEvent::parse(request.body()) {
                    Ok(event) => {
                        if proxy.send_event(ShellEvent::Page(event)).is_err() {
                            tracing::debug!("Event loop closed, dropping page event");
                        }
                    }
                    Err(e) => tracing::warn!("{}", e),
                }
            })
            .with_navigation_handler(|url| {
                // Open external links in the default browser
                if url.starts_with("http://") || url.starts_with("https://") {
                    if let Err(e) = open::that(&url) {
                        tracing::warn!("Failed to open {}: {}", url, e);
                    }
                    false
                } else {
                    true
                }
            })
            .build(&window)
            .map_err(|e| format!("Failed to create webview: {}", e))?;

        self.runtime.host_mut().attach(webview);
        self.window = Some(window);
        Ok(())
    }

    fn handle_page_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::Ready => {
                self.runtime.host_mut().mark_ready();
                if !self.started {
                    self.started = true;
                    self.runtime.start();
                }
            }
            PageEvent::Edit { text } => self.runtime.dispatch(Msg::edit(text)),
            PageEvent::ToggleTheme => self.runtime.dispatch(Msg::toggle_theme()),
            PageEvent::CopyLink => self.copy_share_link(),
        }
    }

    fn copy_share_link(&mut self) {
        let Some(link) = self.runtime.host().share_link() else {
            return;
        };
        let copied = match arboard::Clipboard::new() {
            Ok(mut clipboard) => clipboard
                .set_text(link)
                .map_err(|e| tracing::warn!("Failed to copy share link: {}", e))
                .is_ok(),
            Err(e) => {
                tracing::warn!("Clipboard unavailable: {}", e);
                false
            }
        };
        self.runtime.host_mut().link_copied(copied);
    }

    fn resize_webview(&self, width: u32, height: u32) {
        let Some(webview) = self.runtime.host().webview() else {
            return;
        };
        let bounds = wry::Rect {
            position: wry::dpi::PhysicalPosition::new(0, 0).into(),
            size: wry::dpi::PhysicalSize::new(width, height).into(),
        };
        if let Err(e) = webview.set_bounds(bounds) {
            tracing::debug!("Failed to resize webview: {}", e);
        }
    }
}

impl ApplicationHandler<ShellEvent> for ShellApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                tracing::error!("{}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        if self.window.as_ref().map(Window::id) != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(link) = self.runtime.host().share_link() {
                    tracing::info!("Share link for this session: {}", link);
                    println!("{}", link);
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize_webview(size.width, size.height),
            _ => {}
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: ShellEvent) {
        match event {
            ShellEvent::Page(event) => self.handle_page_event(event),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.runtime.tick();
        self.runtime.process_async_messages();

        let poll_at = Instant::now() + ASYNC_POLL_INTERVAL;
        let wake_at = match self.runtime.next_deadline() {
            Some(deadline) => deadline.min(poll_at),
            None => poll_at,
        };
        event_loop.set_control_flow(ControlFlow::WaitUntil(wake_at));
    }
}
