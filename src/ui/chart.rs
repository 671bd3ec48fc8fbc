use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use crate::model::sample::Tick;

/// Line of dots for one series; the newest point sits at the right edge.
pub struct SeriesChart<'a> {
    title: String,
    points: Vec<Option<f64>>,
    first_tick: Tick,
    color: Color,
    guides: Vec<f64>,
    markers: &'a [Tick],
    precision: usize,
}

impl<'a> SeriesChart<'a> {
    pub fn new(title: impl Into<String>, points: Vec<Option<f64>>, first_tick: Tick) -> Self {
        Self {
            title: title.into(),
            points,
            first_tick,
            color: Color::Cyan,
            guides: Vec::new(),
            markers: &[],
            precision: 2,
        }
    }

    pub fn from_values(title: impl Into<String>, values: &[f64], first_tick: Tick) -> Self {
        Self::new(title, values.iter().copied().map(Some).collect(), first_tick)
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Horizontal reference lines, always kept inside the plotted range.
    pub fn guides(mut self, guides: Vec<f64>) -> Self {
        self.guides = guides;
        self
    }

    /// Ticks drawn in red. Must be sorted ascending.
    pub fn markers(mut self, markers: &'a [Tick]) -> Self {
        self.markers = markers;
        self
    }

    pub fn precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl Widget for SeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" {} ", self.title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 4 {
            return;
        }

        let chart_height = inner.height.saturating_sub(1) as usize; // leave 1 row for axis labels
        let chart_width = inner.width as usize;

        let start = self.points.len().saturating_sub(chart_width);
        let visible = &self.points[start..];

        let defined = visible.iter().flatten().copied().filter(|v| v.is_finite());
        let (mut min_v, mut max_v) = defined
            .chain(self.guides.iter().copied())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !visible.iter().flatten().any(|v| v.is_finite()) {
            buf.set_string(
                inner.x,
                inner.y,
                "no data",
                Style::default().fg(Color::DarkGray),
            );
            return;
        }
        if max_v - min_v <= f64::EPSILON {
            min_v -= 0.5;
            max_v += 0.5;
        }
        let range = max_v - min_v;

        let row_for = |value: f64| -> u16 {
            let normalized = (value - min_v) / range;
            let y_pos = chart_height - 1
                - ((normalized * (chart_height - 1) as f64) as usize).min(chart_height - 1);
            inner.y + y_pos as u16
        };

        for &guide in &self.guides {
            let y = row_for(guide);
            for x in inner.x..inner.x + inner.width {
                buf.set_string(x, y, "·", Style::default().fg(Color::DarkGray));
            }
        }

        // Axis labels
        let label_y = inner.y + inner.height - 1;
        let p = self.precision;
        buf.set_string(
            inner.x,
            inner.y,
            format!("{:.*}", p, max_v),
            Style::default().fg(Color::DarkGray),
        );
        buf.set_string(
            inner.x,
            label_y,
            format!("{:.*}", p, min_v),
            Style::default().fg(Color::DarkGray),
        );
        let last_tick = self.first_tick + self.points.len().saturating_sub(1) as Tick;
        let tick_label = format!("t={}", last_tick);
        let label_x = (inner.x + inner.width).saturating_sub(tick_label.len() as u16);
        buf.set_string(
            label_x.max(inner.x),
            label_y,
            &tick_label,
            Style::default().fg(Color::DarkGray),
        );

        for (i, point) in visible.iter().enumerate() {
            let Some(value) = point.filter(|v| v.is_finite()) else {
                continue;
            };
            let x = inner.x + i as u16;
            if x >= inner.x + inner.width {
                break;
            }
            let tick = self.first_tick + (start + i) as Tick;
            let (glyph, color) = if self.markers.binary_search(&tick).is_ok() {
                ("●", Color::Red)
            } else {
                ("•", self.color)
            };
            buf.set_string(x, row_for(value), glyph, Style::default().fg(color));
        }
    }
}
