use anyhow::{Result, anyhow};
use nback_core::{Key, Placed};
use nback_experiment::AbortToken;
use nback_render::{FontArc, SkiaRenderer};
use pixels::{Pixels, SurfaceTexture};
use std::sync::Arc;
use std::sync::mpsc::Sender;
use tracing::{debug, error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    keyboard::{Key as WinitKey, NamedKey},
    window::{Fullscreen, Window, WindowId},
};

use crate::bridge::{KeyEvent, UiCommand};

/// UI side: owns the window and renderer, shows frames the session sends and
/// forwards key presses back to it.
pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    renderer: Option<SkiaRenderer>,
    font: FontArc,
    frame: Vec<Placed>,
    /// Set while the session waits for `frame` to reach the screen
    frame_pending: bool,
    shown: Sender<()>,
    keys: Sender<KeyEvent>,
    abort: AbortToken,
    fullscreen: bool,
}

impl App {
    pub fn new(
        font: FontArc,
        shown: Sender<()>,
        keys: Sender<KeyEvent>,
        abort: AbortToken,
        fullscreen: bool,
    ) -> Self {
        Self {
            window: None,
            pixels: None,
            renderer: None,
            font,
            frame: Vec::new(),
            frame_pending: false,
            shown,
            keys,
            abort,
            fullscreen,
        }
    }

    fn create_window_and_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next())
            .ok_or_else(|| anyhow!("no monitor available"))?;

        let mut attributes = Window::default_attributes()
            .with_title("N-back")
            .with_resizable(!self.fullscreen);
        if self.fullscreen {
            attributes = attributes.with_fullscreen(Some(Fullscreen::Borderless(Some(monitor.clone()))));
        } else {
            attributes = attributes.with_inner_size(PhysicalSize::new(1280, 720));
        }

        let window = Arc::new(event_loop.create_window(attributes)?);
        let size = window.inner_size();
        info!(
            width = size.width,
            height = size.height,
            scale = window.scale_factor(),
            refresh_hz = ?monitor.refresh_rate_millihertz().map(|mhz| mhz as f64 / 1000.0),
            "display ready"
        );

        let surface = SurfaceTexture::new(size.width, size.height, window.clone());
        self.pixels = Some(Pixels::new(size.width, size.height, surface)?);
        self.renderer = Some(SkiaRenderer::new(size.width, size.height, self.font.clone())?);

        window.set_cursor_visible(false);
        window.request_redraw();
        self.window = Some(window);
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let (Some(pix), Some(renderer)) = (self.pixels.as_mut(), self.renderer.as_mut()) else {
            return Ok(());
        };
        let stats = renderer.render_frame(&self.frame, pix.frame_mut())?;
        pix.render()?;
        if std::mem::take(&mut self.frame_pending) {
            let _ = self.shown.send(());
        }
        debug!(
            items = stats.items,
            draw_ms = stats.draw.as_secs_f64() * 1e3,
            copy_ms = stats.copy.as_secs_f64() * 1e3,
            total_ms = stats.total.as_secs_f64() * 1e3,
            "frame rendered"
        );
        Ok(())
    }

    fn handle_resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        if let Some(pixels) = &mut self.pixels {
            if let Err(e) = pixels.resize_surface(size.width, size.height) {
                warn!(error = %e, "failed to resize surface");
            }
            if let Err(e) = pixels.resize_buffer(size.width, size.height) {
                warn!(error = %e, "failed to resize buffer");
            }
        }
        if let Some(renderer) = &mut self.renderer {
            if let Err(e) = renderer.resize(size.width, size.height) {
                warn!(error = %e, "failed to resize renderer");
            }
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        debug!(width = size.width, height = size.height, "display resized");
    }

    fn handle_key(&mut self, key: &WinitKey) {
        let Some(key) = translate(key) else {
            return;
        };
        if key == Key::Escape {
            info!("escape pressed, aborting session");
            self.abort.abort();
        }
        // The session thread may already be gone; nothing left to deliver to.
        let _ = self.keys.send(KeyEvent::now(key));
    }

    fn shutdown(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(true);
        }
        event_loop.exit();
    }
}

/// Maps a logical key to the session's key type; letters fold to lower case
pub fn translate(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(NamedKey::Space) => Some(Key::Space),
        WinitKey::Named(NamedKey::Enter) => Some(Key::Enter),
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Character(s) => s.chars().next().map(|c| Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

impl ApplicationHandler<UiCommand> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window_and_surface(event_loop) {
                error!(error = %e, "failed to create window and surface");
                self.abort.abort();
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, command: UiCommand) {
        match command {
            UiCommand::Present(items) => {
                self.frame = items;
                self.frame_pending = true;
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            UiCommand::Exit => self.shutdown(event_loop),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("window closed, aborting session");
                self.abort.abort();
                self.shutdown(event_loop);
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render() {
                    error!(error = %e, "render failed");
                    self.abort.abort();
                    self.shutdown(event_loop);
                }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state.is_pressed() && !event.repeat => {
                self.handle_key(&event.logical_key);
            }
            WindowEvent::Resized(size) => self.handle_resize(size),
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(window) = &self.window {
                    self.handle_resize(window.inner_size());
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_response_and_control_keys() {
        assert_eq!(translate(&WinitKey::Character("K".into())), Some(Key::Char('k')));
        assert_eq!(translate(&WinitKey::Character("9".into())), Some(Key::Char('9')));
        assert_eq!(translate(&WinitKey::Named(NamedKey::Space)), Some(Key::Space));
        assert_eq!(translate(&WinitKey::Named(NamedKey::Escape)), Some(Key::Escape));
        assert_eq!(translate(&WinitKey::Named(NamedKey::Shift)), None);
    }
}
