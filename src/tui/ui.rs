//! Frame layout and panel rendering for the debugger.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use crate::cpu::memory::RAM_SIZE;
use crate::word::Word16;
use super::app::DebuggerApp;

/// Draw one frame.
///
/// ```text
/// +-------------+---------------------+
/// | disassembly | screen              |
/// |             |                     |
/// +-------------+---------------------+
/// | registers   | RAM                 |
/// | status      | help                |
/// +-------------+---------------------+
/// ```
pub fn draw(frame: &mut Frame, app: &DebuggerApp, typing: bool) {
    let [code_col, view_col] = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(60),
    ])
    .areas(frame.area());

    let [code, regs, status] = Layout::vertical([
        Constraint::Min(10),
        Constraint::Length(6),
        Constraint::Length(3),
    ])
    .areas(code_col);

    let [screen, ram, help] = Layout::vertical([
        Constraint::Percentage(60),
        Constraint::Min(6),
        Constraint::Length(4),
    ])
    .areas(view_col);

    draw_disassembly(frame, code, app);
    draw_registers(frame, regs, app, typing);
    frame.render_widget(
        Paragraph::new(app.status.as_str()).block(panel("Status", Color::White)),
        status,
    );
    draw_screen(frame, screen, app);
    draw_ram(frame, ram, app);
    draw_help(frame, help);
}

fn panel(title: &str, color: Color) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

/// Rows available inside a bordered panel.
fn inner_rows(area: Rect) -> usize {
    (area.height as usize).saturating_sub(2)
}

fn draw_disassembly(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let items: Vec<ListItem> = app
        .get_disassembly(inner_rows(area))
        .into_iter()
        .map(|(addr, text, current)| {
            let breakpoint = app.breakpoints.contains(&addr);
            let marker = match (breakpoint, current) {
                (true, true) => "●▶",
                (true, false) => "● ",
                (false, true) => " ▶",
                (false, false) => "  ",
            };
            let style = if current {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if breakpoint {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            ListItem::new(format!("{} {:05}  {}", marker, addr, text)).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(panel("Program", Color::Cyan)), area);
}

fn register_line(name: &str, value: Word16) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{:<3}", name)),
        Span::styled(value.to_string(), Style::default().fg(Color::White)),
        Span::styled(format!("  {:>6}", value.to_i16()), Style::default().fg(Color::Gray)),
    ])
}

fn draw_registers(frame: &mut Frame, area: Rect, app: &DebuggerApp, typing: bool) {
    let machine = &app.machine;
    let state_color = if machine.is_running() { Color::Green } else { Color::Red };
    let kbd_color = if typing { Color::Green } else { Color::Gray };

    let lines = vec![
        register_line("A", machine.cpu.a()),
        register_line("D", machine.cpu.d()),
        Line::from(vec![
            Span::raw("PC "),
            Span::styled(format!("{:05}", machine.cpu.pc()), Style::default().fg(Color::Yellow)),
            Span::raw("  KBD "),
            Span::styled(machine.keyboard().bits().to_string(), Style::default().fg(kbd_color)),
        ]),
        Line::from(vec![
            Span::raw(format!("{} cycles  ", machine.cycles)),
            Span::styled(format!("{:?}", machine.state), Style::default().fg(state_color)),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).block(panel("CPU", Color::Green)), area);
}

/// The 512x256 framebuffer, downsampled to whatever fits.
fn draw_screen(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let cols = (area.width as usize).saturating_sub(2);
    let lines: Vec<Line> = app
        .machine
        .screen()
        .render(cols, inner_rows(area))
        .into_iter()
        .map(|row| Line::from(row.chars().map(|c| if c == '#' { '█' } else { ' ' }).collect::<String>()))
        .collect();

    frame.render_widget(Paragraph::new(lines).block(panel("Screen", Color::Blue)), area);
}

fn draw_ram(frame: &mut Frame, area: Rect, app: &DebuggerApp) {
    let start = app.mem_scroll;
    let count = inner_rows(area).min(RAM_SIZE - start);
    let addressed = app.machine.cpu.address_m() as usize;

    let items: Vec<ListItem> = app
        .machine
        .mem
        .ram
        .dump(start, count)
        .into_iter()
        .map(|(addr, value)| {
            let style = match (addr == addressed, value.is_zero()) {
                (true, _) => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                (false, false) => Style::default().fg(Color::White),
                (false, true) => Style::default().fg(Color::DarkGray),
            };
            ListItem::new(format!("{:05}  {}  {:>6}", addr, value, value.to_i16())).style(style)
        })
        .collect();

    frame.render_widget(List::new(items).block(panel("RAM", Color::Magenta)), area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(vec![
        Line::from("s step  r run  p pause  b breakpoint  x reset  q quit"),
        Line::from("k type into KBD (Ctrl-K releases)  ↑↓ PgUp PgDn scroll RAM"),
    ])
    .style(Style::default().fg(Color::DarkGray))
    .block(panel("Keys", Color::DarkGray));

    frame.render_widget(help, area);
}
