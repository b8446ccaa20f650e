use iced::widget::image::Handle;
use iced::widget::{button, canvas, column, container, row, text, Image};
use iced::{Alignment, ContentFit, Element, Length, Task, Theme};

use super::area_chart::AreaChart;
use super::histogram::ChannelChart;
use crate::imaging::ChannelHistogram;
use crate::profile::AreaHistogram;
use crate::Result;

/// Chart shown in a figure window.
#[derive(Debug, Clone)]
pub enum Plot {
    Channels(ChannelChart),
    Areas(AreaChart),
}

impl From<ChannelHistogram> for Plot {
    fn from(histogram: ChannelHistogram) -> Self {
        Plot::Channels(ChannelChart { histogram })
    }
}

impl From<AreaHistogram> for Plot {
    fn from(histogram: AreaHistogram) -> Self {
        Plot::Areas(AreaChart { histogram })
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    Close,
}

/// A window holding a chart, an image, or both side by side.
///
/// [`Figure::show`] blocks until the window is closed.
pub struct Figure {
    title: String,
    plot: Option<Plot>,
    image: Option<Handle>,
}

impl Figure {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            plot: None,
            image: None,
        }
    }

    pub fn with_plot(mut self, plot: impl Into<Plot>) -> Self {
        self.plot = Some(plot.into());
        self
    }

    pub fn with_image(mut self, image: &image::DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        self.image = Some(Handle::from_rgba(rgba.width(), rgba.height(), rgba.into_raw()));
        self
    }

    pub fn show(self) -> Result<()> {
        log::debug!("Opening figure '{}'", self.title);
        iced::application(Figure::title, Figure::update, Figure::view)
            .theme(Figure::theme)
            .window_size((1000.0, 600.0))
            .centered()
            .run_with(move || (self, Task::none()))?;
        Ok(())
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Close => iced::exit(),
        }
    }

    fn view(&self) -> Element<'_, Message> {
        let mut panels = row![].spacing(20).height(Length::Fill);

        if let Some(plot) = &self.plot {
            let chart: Element<'_, Message> = match plot {
                Plot::Channels(chart) => canvas(chart).width(Length::Fill).height(Length::Fill).into(),
                Plot::Areas(chart) => canvas(chart).width(Length::Fill).height(Length::Fill).into(),
            };
            panels = panels.push(chart);
        }

        if let Some(handle) = &self.image {
            panels = panels.push(
                Image::new(handle.clone())
                    .content_fit(ContentFit::Contain)
                    .width(Length::Fill)
                    .height(Length::Fill),
            );
        }

        let content = column![
            text(&self.title).size(20),
            panels,
            button("Close").on_press(Message::Close).padding(10),
        ]
        .spacing(16)
        .padding(20)
        .align_x(Alignment::Center);

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }
}
