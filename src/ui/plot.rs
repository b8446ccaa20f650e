use iced::alignment::{Horizontal, Vertical};
use iced::widget::canvas::{self, Frame, Path, Stroke};
use iced::{Color, Pixels, Point, Rectangle};

const MARGIN_LEFT: f32 = 56.0;
const MARGIN_RIGHT: f32 = 16.0;
const MARGIN_TOP: f32 = 32.0;
const MARGIN_BOTTOM: f32 = 44.0;

const AXIS_COLOR: Color = Color::from_rgb(0.75, 0.75, 0.75);
const LABEL_SIZE: f32 = 13.0;

/// Titles of a chart.
pub struct Labels<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

/// Drawable region of a chart, inside the margins reserved for axes.
#[derive(Debug, Clone, Copy)]
pub struct PlotArea {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl PlotArea {
    pub fn new(bounds: Rectangle) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (bounds.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (bounds.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Map fractions of the axes (0.0..=1.0, origin bottom-left) to frame coordinates.
    pub fn point(&self, x: f32, y: f32) -> Point {
        Point::new(self.left + x * self.width, self.bottom() - y * self.height)
    }
}

fn label(frame: &mut Frame, content: String, position: Point, horizontal: Horizontal, vertical: Vertical) {
    frame.fill_text(canvas::Text {
        content,
        position,
        color: AXIS_COLOR,
        size: Pixels(LABEL_SIZE),
        horizontal_alignment: horizontal,
        vertical_alignment: vertical,
        ..canvas::Text::default()
    });
}

/// Draw axes, titles and tick labels around `area`.
///
/// `x_ticks` are `(fraction, text)` pairs along the x axis; the y axis is
/// labelled at zero and at `y_max`.
pub fn draw_axes(frame: &mut Frame, area: &PlotArea, labels: &Labels<'_>, x_ticks: &[(f32, String)], y_max: String) {
    let origin = area.point(0.0, 0.0);
    let axes = Path::new(|builder| {
        builder.move_to(area.point(0.0, 1.0));
        builder.line_to(origin);
        builder.line_to(area.point(1.0, 0.0));
    });
    frame.stroke(&axes, Stroke::default().with_color(AXIS_COLOR).with_width(1.0));

    label(
        frame,
        labels.title.to_string(),
        Point::new(area.left + area.width / 2.0, area.top / 2.0),
        Horizontal::Center,
        Vertical::Center,
    );
    label(
        frame,
        labels.x.to_string(),
        Point::new(area.left + area.width / 2.0, area.bottom() + 26.0),
        Horizontal::Center,
        Vertical::Top,
    );
    label(
        frame,
        labels.y.to_string(),
        Point::new(4.0, area.top / 2.0),
        Horizontal::Left,
        Vertical::Center,
    );

    for (fraction, text) in x_ticks {
        let at = area.point(*fraction, 0.0);
        frame.stroke(
            &Path::line(at, Point::new(at.x, at.y + 4.0)),
            Stroke::default().with_color(AXIS_COLOR).with_width(1.0),
        );
        label(frame, text.clone(), Point::new(at.x, at.y + 6.0), Horizontal::Center, Vertical::Top);
    }

    label(frame, "0".to_string(), Point::new(origin.x - 6.0, origin.y), Horizontal::Right, Vertical::Center);
    label(frame, y_max, Point::new(origin.x - 6.0, area.top), Horizontal::Right, Vertical::Center);
}
