use std::{cell::RefCell, rc::Rc, time::Duration};

use eframe::egui;

use crate::{
    cv::{FrameSource, Matrix},
    error::Error,
    preview::Preview,
    result::Result,
};

/// Window showing the live composite until it is closed.
pub struct Gui<S: FrameSource> {
    title: String,
    wait: Duration,
    preview: Preview<S>,
}

struct App<S: FrameSource> {
    preview: Preview<S>,
    texture: egui::TextureHandle,
    wait: Duration,
    failure: Rc<RefCell<Option<Error>>>,
}

impl<S: FrameSource + 'static> Gui<S> {
    pub fn new(title: impl Into<String>, wait: Duration, preview: Preview<S>) -> Self {
        Self {
            title: title.into(),
            wait,
            preview,
        }
    }

    /// Blocks on the event loop. An error raised while streaming closes the
    /// window and is returned here.
    pub fn run(self) -> Result<()> {
        let Self {
            title,
            wait,
            preview,
        } = self;
        let first = egui::ColorImage::try_from(preview.canvas())?;
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(title.clone())
                .with_inner_size([first.size[0] as f32, first.size[1] as f32]),
            ..Default::default()
        };

        let failure = Rc::new(RefCell::new(None));
        let app_failure = Rc::clone(&failure);

        eframe::run_native(
            &title,
            options,
            Box::new(move |cc| {
                let texture =
                    cc.egui_ctx
                        .load_texture("preview_frame", first, egui::TextureOptions::default());
                Ok(Box::new(App {
                    preview,
                    texture,
                    wait,
                    failure: app_failure,
                }))
            }),
        )
        .map_err(Error::GuiError)?;

        match failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl<S: FrameSource> App<S> {
    fn refresh(&mut self) -> Result<()> {
        let composite: &Matrix = self.preview.next_composite()?;
        let image = egui::ColorImage::try_from(composite)?;
        self.texture.set(image, egui::TextureOptions::default());
        Ok(())
    }
}

impl<S: FrameSource> eframe::App for App<S> {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        if let Err(err) = self.refresh() {
            tracing::error!(error = %err, "preview stopped");
            *self.failure.borrow_mut() = Some(err);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.add(egui::Image::from_texture(
                    egui::load::SizedTexture::from_handle(&self.texture),
                ));
            });
        ctx.request_repaint_after(self.wait);
    }
}
