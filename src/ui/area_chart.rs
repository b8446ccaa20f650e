//! Area histogram chart for the profiler.
use iced::widget::canvas;
use iced::{mouse, Color, Point, Rectangle, Renderer, Size, Theme};

use super::plot::{draw_axes, Labels, PlotArea};
use crate::profile::AreaHistogram;

const BAR_COLOR: Color = Color::from_rgb(0.25, 0.5, 0.85);

/// One bar per histogram bin.
#[derive(Debug, Clone)]
pub struct AreaChart {
    pub histogram: AreaHistogram,
}

impl<Message> canvas::Program<Message> for AreaChart {
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

        let histogram = &self.histogram;
        let x_ticks = match (histogram.edges.first(), histogram.edges.last()) {
            (Some(first), Some(last)) => vec![
                (0.0, format!("{first:.0}")),
                (1.0, format!("{last:.0}")),
            ],
            _ => Vec::new(),
        };
        let max_count = histogram.max_count();
        draw_axes(
            &mut frame,
            &area,
            &Labels {
                title: "Histogram by area",
                x: "Area",
                y: "Count",
            },
            &x_ticks,
            max_count.to_string(),
        );

        if max_count == 0 {
            return vec![frame.into_geometry()];
        }

        let bins = histogram.counts.len() as f32;
        let bar_width = area.width / bins;
        for (i, &count) in histogram.counts.iter().enumerate() {
            if count == 0 {
                continue;
            }
            let top = area.point(i as f32 / bins, count as f32 / max_count as f32);
            let height = area.bottom() - top.y;
            frame.fill_rectangle(
                Point::new(top.x + 0.5, top.y),
                Size::new((bar_width - 1.0).max(1.0), height),
                BAR_COLOR,
            );
        }

        vec![frame.into_geometry()]
    }
}
