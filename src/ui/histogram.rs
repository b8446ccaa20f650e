//! RGB histogram chart for the inspector.
use iced::widget::canvas::{self, Stroke};
use iced::{mouse, Color, Rectangle, Renderer, Theme};

use super::plot::{draw_axes, Labels, PlotArea};
use crate::imaging::histogram::{ChannelHistogram, BINS};

/// Line plot of the three channel histograms over intensity.
#[derive(Debug, Clone)]
pub struct ChannelChart {
    pub histogram: ChannelHistogram,
}

impl<Message> canvas::Program<Message> for ChannelChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<canvas::Geometry> {
        let mut frame = canvas::Frame::new(renderer, bounds.size());
        let area = PlotArea::new(bounds);

        // Normalise every channel against the tallest bin of any channel
        let max_value = self.histogram.max_count();
        let x_ticks: Vec<(f32, String)> = [0, 64, 128, 192, 256]
            .into_iter()
            .map(|level| (level as f32 / BINS as f32, level.to_string()))
            .collect();
        draw_axes(
            &mut frame,
            &area,
            &Labels {
                title: "Image histogram",
                x: "Intensity",
                y: "Frequency",
            },
            &x_ticks,
            max_value.to_string(),
        );

        if max_value == 0 {
            return vec![frame.into_geometry()];
        }

        let colors = [
            Color::from_rgb(0.9, 0.2, 0.2), // Red
            Color::from_rgb(0.2, 0.8, 0.2), // Green
            Color::from_rgb(0.2, 0.4, 1.0), // Blue
        ];

        for (channel_data, color) in self.histogram.data.iter().zip(colors) {
            let mut path_builder = canvas::path::Builder::new();

            for (i, &count) in channel_data.iter().enumerate() {
                let point = area.point(i as f32 / BINS as f32, count as f32 / max_value as f32);
                if i == 0 {
                    path_builder.move_to(point);
                } else {
                    path_builder.line_to(point);
                }
            }

            let path = path_builder.build();
            frame.stroke(&path, Stroke::default().with_color(color).with_width(1.5));
        }

        vec![frame.into_geometry()]
    }
}
