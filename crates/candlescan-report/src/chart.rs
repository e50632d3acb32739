//! Terminal chart viewer.
//!
//! Three stacked panels: price with signal markers, the support/resistance
//! envelope and Bollinger bands; MACD; and ADX against its trend threshold.

use std::collections::HashMap;
use std::io;
use std::time::Duration;

use candlescan_indicators::{FrameRow, IndicatorFrame};
use candlescan_signals::{PatternType, ReportEvents, SignalReport};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use crate::format::format_timestamp;

/// ADX level above which a trend counts as strong.
pub const ADX_THRESHOLD: f64 = 25.0;

type Points = Vec<(f64, f64)>;

/// Plot-ready series, x = bar index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartData {
    pub close: Points,
    pub buys: Points,
    pub sells: Points,
    pub support: Points,
    pub resistance: Points,
    pub bb_upper: Points,
    pub bb_middle: Points,
    pub bb_lower: Points,
    pub macd: Points,
    pub macd_signal: Points,
    pub macd_histogram: Points,
    pub adx: Points,
    pub adx_threshold: Points,
    /// Formatted time of each bar, for axis labels
    pub times: Vec<String>,
}

fn collect(frame: &IndicatorFrame, value: impl Fn(&FrameRow) -> Option<f64>) -> Points {
    frame
        .iter()
        .enumerate()
        .filter_map(|(i, row)| value(row).map(|v| (i as f64, v)))
        .collect()
}

impl ChartData {
    /// Build the series for a frame and the report derived from it.
    ///
    /// Buy signals and bullish patterns mark the close as buys; sell signals
    /// and bearish patterns as sells.
    pub fn build(frame: &IndicatorFrame, report: &SignalReport) -> Self {
        let timeframe = report.window.timeframe();
        let index: HashMap<i64, usize> = frame
            .iter()
            .enumerate()
            .map(|(i, row)| (row.timestamp(), i))
            .collect();
        let point = |ts: i64, price: f64| index.get(&ts).map(|&i| (i as f64, price));

        let (buys, sells): (Points, Points) = match &report.events {
            ReportEvents::Combined(signals) => (
                signals
                    .iter()
                    .filter(|s| s.buy)
                    .filter_map(|s| point(s.timestamp, s.close))
                    .collect(),
                signals
                    .iter()
                    .filter(|s| s.sell)
                    .filter_map(|s| point(s.timestamp, s.close))
                    .collect(),
            ),
            ReportEvents::Scan(events) => (
                events
                    .iter()
                    .filter(|e| e.pattern_type == PatternType::Bullish)
                    .filter_map(|e| point(e.timestamp, e.closing_price))
                    .collect(),
                events
                    .iter()
                    .filter(|e| e.pattern_type == PatternType::Bearish)
                    .filter_map(|e| point(e.timestamp, e.closing_price))
                    .collect(),
            ),
        };

        let last = frame.len().saturating_sub(1) as f64;

        Self {
            close: collect(frame, |r| Some(r.bar.close)),
            buys,
            sells,
            support: collect(frame, |r| r.support),
            resistance: collect(frame, |r| r.resistance),
            bb_upper: collect(frame, |r| r.bands.map(|b| b.upper)),
            bb_middle: collect(frame, |r| r.bands.map(|b| b.middle)),
            bb_lower: collect(frame, |r| r.bands.map(|b| b.lower)),
            macd: collect(frame, |r| r.macd.map(|m| m.macd)),
            macd_signal: collect(frame, |r| r.macd.map(|m| m.signal)),
            macd_histogram: collect(frame, |r| r.macd.map(|m| m.histogram)),
            adx: collect(frame, |r| r.adx),
            adx_threshold: vec![(0.0, ADX_THRESHOLD), (last, ADX_THRESHOLD)],
            times: frame
                .iter()
                .map(|r| format_timestamp(r.timestamp(), timeframe))
                .collect(),
        }
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, self.times.len().saturating_sub(1).max(1) as f64]
    }

    fn x_labels(&self) -> Vec<Span<'static>> {
        let n = self.times.len();
        if n == 0 {
            return vec![];
        }
        [0, n / 2, n - 1]
            .iter()
            .map(|&i| Span::raw(self.times[i].clone()))
            .collect()
    }
}

/// Lower and upper bound over several series, padded by 5%.
pub fn y_bounds(series: &[&Points]) -> [f64; 2] {
    let (min, max) = series
        .iter()
        .flat_map(|s| s.iter().map(|(_, y)| *y))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let pad = ((max - min) * 0.05).max(max.abs() * 0.01).max(f64::EPSILON);
    [min - pad, max + pad]
}

fn y_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    vec![
        Span::raw(format!("{:.2}", bounds[0])),
        Span::raw(format!("{:.2}", (bounds[0] + bounds[1]) / 2.0)),
        Span::raw(format!("{:.2}", bounds[1])),
    ]
}

fn line<'a>(name: &'a str, data: &'a Points, color: Color) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

fn scatter<'a>(name: &'a str, data: &'a Points, color: Color) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(Marker::Block)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .data(data)
}

/// Interactive chart of one analysed symbol.
pub struct ChartView {
    title: String,
    data: ChartData,
}

impl ChartView {
    pub fn new(frame: &IndicatorFrame, report: &SignalReport) -> Self {
        Self {
            title: format!(
                " {} ({}) | {} | {} ",
                report.company,
                report.symbol,
                report.window.label(),
                report.variant()
            ),
            data: ChartData::build(frame, report),
        }
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Take over the terminal until `q` or `Esc` is pressed.
    pub fn run(&self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let res = self.run_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    fn run_loop(&self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press
                        && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
                    {
                        return Ok(());
                    }
                }
            }
        }
    }

    /// Draw all panels into a frame.
    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage(55), // Price
                Constraint::Percentage(22), // MACD
                Constraint::Percentage(22), // ADX
                Constraint::Length(1),      // Help
            ])
            .split(frame.area());

        self.render_price(frame, chunks[0]);
        self.render_macd(frame, chunks[1]);
        self.render_adx(frame, chunks[2]);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("q", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("/"),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" quit"),
        ]));
        frame.render_widget(help, chunks[3]);
    }

    fn render_price(&self, frame: &mut Frame, area: Rect) {
        let d = &self.data;
        let datasets = vec![
            line("Close", &d.close, Color::White),
            line("Support", &d.support, Color::Blue),
            line("Resistance", &d.resistance, Color::Yellow),
            line("BB Upper", &d.bb_upper, Color::DarkGray),
            line("BB Middle", &d.bb_middle, Color::Gray),
            line("BB Lower", &d.bb_lower, Color::DarkGray),
            scatter("Buy", &d.buys, Color::Green),
            scatter("Sell", &d.sells, Color::Red),
        ];
        let bounds = y_bounds(&[&d.close, &d.support, &d.resistance, &d.bb_upper, &d.bb_lower]);

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(self.title.as_str()))
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(d.x_bounds())
                    .labels(d.x_labels()),
            )
            .y_axis(
                Axis::default()
                    .title("Price")
                    .style(Style::default().fg(Color::Gray))
                    .bounds(bounds)
                    .labels(y_labels(bounds)),
            );
        frame.render_widget(chart, area);
    }

    fn render_macd(&self, frame: &mut Frame, area: Rect) {
        let d = &self.data;
        let datasets = vec![
            Dataset::default()
                .name("Histogram")
                .marker(Marker::Dot)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(Color::DarkGray))
                .data(&d.macd_histogram),
            line("MACD", &d.macd, Color::Blue),
            line("Signal", &d.macd_signal, Color::Rgb(255, 165, 0)),
        ];
        let bounds = y_bounds(&[&d.macd, &d.macd_signal, &d.macd_histogram]);

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(" MACD "))
            .x_axis(Axis::default().bounds(d.x_bounds()))
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(bounds)
                    .labels(y_labels(bounds)),
            );
        frame.render_widget(chart, area);
    }

    fn render_adx(&self, frame: &mut Frame, area: Rect) {
        let d = &self.data;
        let datasets = vec![
            line("ADX", &d.adx, Color::Magenta),
            line("Threshold", &d.adx_threshold, Color::DarkGray),
        ];
        let bounds = y_bounds(&[&d.adx, &d.adx_threshold]);

        let chart = Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL).title(" ADX "))
            .x_axis(Axis::default().bounds(d.x_bounds()))
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(Color::Gray))
                    .bounds(bounds)
                    .labels(y_labels(bounds)),
            );
        frame.render_widget(chart, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlescan_core::types::{Bar, BarSeries, RunConfig, Window};
    use candlescan_indicators::{CandlePattern, FrameSettings};
    use candlescan_signals::{CombinedSignal, PatternEvent};
    use ratatui::backend::TestBackend;

    const DAY: i64 = 86_400_000;

    fn frame(n: usize) -> IndicatorFrame {
        let bars = (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.1;
                Bar::new(i as i64 * DAY, base, base + 1.5, base - 1.5, base + 0.4, 1_000.0)
            })
            .collect();
        IndicatorFrame::compute(&BarSeries::from_bars("TEST", bars), &FrameSettings::default())
            .unwrap()
    }

    #[test]
    fn test_build_aligns_markers_to_bars() {
        let frame = frame(60);
        let run = RunConfig::new("TEST", Window::default());
        let close = frame.rows()[40].bar.close;
        let signal = CombinedSignal {
            timestamp: 40 * DAY,
            buy: true,
            sell: true,
            close,
            rsi: Some(20.0),
            macd: None,
            adx: None,
            patterns: vec![],
        };
        let report = SignalReport::new(&run, frame.len(), ReportEvents::Combined(vec![signal]));
        let data = ChartData::build(&frame, &report);

        assert_eq!(data.close.len(), 60);
        assert_eq!(data.buys, vec![(40.0, close)]);
        assert_eq!(data.sells, vec![(40.0, close)]);
        // Envelope starts once 20 bars are in, ADX after 27.
        assert_eq!(data.support.len(), 41);
        assert_eq!(data.adx.first().map(|p| p.0), Some(27.0));
        assert_eq!(data.adx_threshold, vec![(0.0, 25.0), (59.0, 25.0)]);
        assert_eq!(data.times[0], "1970-01-01");
    }

    #[test]
    fn test_scan_markers_split_by_direction() {
        let frame = frame(30);
        let run = RunConfig::new("TEST", Window::default());
        let events = ReportEvents::Scan(vec![
            PatternEvent::new(3 * DAY, CandlePattern::Hammer, 100, 101.0),
            PatternEvent::new(5 * DAY, CandlePattern::ShootingStar, -100, 102.0),
            PatternEvent::new(999 * DAY, CandlePattern::Doji, 100, 1.0),
        ]);
        let data = ChartData::build(&frame, &SignalReport::new(&run, 30, events));

        assert_eq!(data.buys, vec![(3.0, 101.0)]);
        assert_eq!(data.sells, vec![(5.0, 102.0)]);
    }

    #[test]
    fn test_y_bounds() {
        let a: Points = vec![(0.0, 10.0), (1.0, 20.0)];
        let empty: Points = vec![];
        let [lo, hi] = y_bounds(&[&a, &empty]);
        assert!(lo < 10.0 && hi > 20.0);
        assert_eq!(y_bounds(&[&empty]), [0.0, 1.0]);

        let flat: Points = vec![(0.0, 5.0), (1.0, 5.0)];
        let [lo, hi] = y_bounds(&[&flat]);
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn test_render_into_test_backend() {
        let frame = frame(80);
        let run = RunConfig::new("TEST", Window::default()).with_company("Test Corp");
        let report = SignalReport::new(&run, frame.len(), ReportEvents::Scan(vec![]));
        let view = ChartView::new(&frame, &report);

        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| view.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Test Corp (TEST)"));
        assert!(text.contains("MACD"));
        assert!(text.contains("ADX"));
    }
}
