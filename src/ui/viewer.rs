//! Annotation-driven image viewer.
//!
//! The viewer holds an [`AnnotationIterator`] and shows one image per press
//! of "Next image". It is either able to advance or exhausted; exhaustion
//! disables the button until another annotation file is selected.

use iced::widget::image::Handle;
use iced::widget::{button, column, container, text, Column, Image};
use iced::{Alignment, ContentFit, Element, Length, Task, Theme};
use rfd::FileDialog;
use std::path::{Path, PathBuf};

use crate::annotation::{AnnotationIterator, AnnotationOptions};
use crate::imaging;

const PROMPT: &str = "Select file annotations";
const END_OF_DATASET: &str = "End of dataset";

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// User clicked "Select annotation file"
    SelectAnnotation,
    /// User clicked "Next image"
    NextImage,
    /// Background decode finished
    ImageLoaded(PathBuf, Result<Handle, String>),
}

/// Main application state
pub struct Viewer {
    images: Option<AnnotationIterator>,
    /// Image being decoded; results for any other path are stale.
    pending: Option<PathBuf>,
    current: Option<Handle>,
    status: String,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            images: None,
            pending: None,
            current: None,
            status: PROMPT.to_string(),
        }
    }
}

impl Viewer {
    /// Open the viewer window; blocks until it is closed.
    pub fn run() -> iced::Result {
        iced::application("Image Viewer", Viewer::update, Viewer::view)
            .theme(Viewer::theme)
            .window_size((800.0, 600.0))
            .centered()
            .run_with(|| (Viewer::default(), Task::none()))
    }

    /// Start iterating `annotation_file` and request its first image.
    pub fn open(&mut self, annotation_file: &Path) -> Task<Message> {
        match AnnotationIterator::open(annotation_file, &AnnotationOptions::leading_column()) {
            Ok(images) => {
                log::info!("Opened annotation file {}", annotation_file.display());
                self.images = Some(images);
                self.show_next_image()
            }
            Err(err) => {
                log::error!("Failed to open {}: {}", annotation_file.display(), err);
                self.images = None;
                self.current = None;
                self.status = format!("Failed to open annotation file: {err}");
                Task::none()
            }
        }
    }

    /// True while the annotation file may still hold rows.
    pub fn can_advance(&self) -> bool {
        self.images.as_ref().is_some_and(|images| !images.is_exhausted())
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn pending(&self) -> Option<&Path> {
        self.pending.as_deref()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::SelectAnnotation => {
                let file = FileDialog::new()
                    .set_title("Select Annotation File")
                    .add_filter("CSV Files", &["csv"])
                    .pick_file();

                match file {
                    Some(path) => self.open(&path),
                    None => Task::none(),
                }
            }
            Message::NextImage => self.show_next_image(),
            Message::ImageLoaded(path, result) => {
                if self.pending.as_deref() != Some(path.as_path()) {
                    return Task::none();
                }
                self.pending = None;

                match result {
                    Ok(handle) => {
                        self.current = Some(handle);
                        self.status = path.display().to_string();
                    }
                    Err(err) => {
                        log::warn!("Failed to decode {}: {}", path.display(), err);
                        self.current = None;
                        self.status = format!("Failed to load image: {}", path.display());
                    }
                }
                Task::none()
            }
        }
    }

    fn show_next_image(&mut self) -> Task<Message> {
        let Some(images) = self.images.as_mut() else {
            return Task::none();
        };

        match images.next() {
            Some(Ok(path)) => {
                if path.exists() {
                    self.status = format!("Loading {}...", path.display());
                    self.pending = Some(path.clone());
                    Task::perform(load_image(path.clone()), move |result| {
                        Message::ImageLoaded(path.clone(), result)
                    })
                } else {
                    self.current = None;
                    self.pending = None;
                    self.status = format!("File not found: {}", path.display());
                    Task::none()
                }
            }
            Some(Err(err)) => {
                log::error!("Failed to read annotation row: {}", err);
                self.current = None;
                self.pending = None;
                self.status = format!("Failed to read annotation file: {err}");
                Task::none()
            }
            None => {
                self.current = None;
                self.pending = None;
                self.status = END_OF_DATASET.to_string();
                Task::none()
            }
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let display: Element<'_, Message> = match &self.current {
            Some(handle) => Image::new(handle.clone())
                .content_fit(ContentFit::Contain)
                .width(Length::Fill)
                .height(Length::Fill)
                .into(),
            None => container(text(&self.status).size(18))
                .width(Length::Fill)
                .height(Length::Fill)
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into(),
        };

        let mut content: Column<Message> = column![display].spacing(12).padding(16).align_x(Alignment::Center);
        if self.current.is_some() {
            content = content.push(text(&self.status).size(14));
        }

        content
            .push(
                button("Select annotation file")
                    .on_press(Message::SelectAnnotation)
                    .padding(10)
                    .width(Length::Fill),
            )
            .push(
                button("Next image")
                    .on_press_maybe(self.can_advance().then_some(Message::NextImage))
                    .padding(10)
                    .width(Length::Fill),
            )
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Decode an image off the UI thread.
async fn load_image(path: PathBuf) -> Result<Handle, String> {
    tokio::task::spawn_blocking(move || {
        let rgba = imaging::read_image(&path).map_err(|e| e.to_string())?.to_rgba8();
        Ok(Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw()))
    })
    .await
    .map_err(|e| format!("Task join error: {}", e))?
}
