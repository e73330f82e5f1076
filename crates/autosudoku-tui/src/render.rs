use crate::app::{App, MessageKind, ScreenState};
use crate::graph;
use autosudoku_core::{Position, ProgressSink};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Write};

/// Grid footprint: 9 cells of 3 chars plus 10 border columns
pub const GRID_WIDTH: u16 = 37;
/// 9 cell rows, 8 separators, top and bottom borders
pub const GRID_HEIGHT: u16 = 19;

/// Top-left corner of the grid for the current terminal size. The solve
/// progress bar is drawn relative to this as well.
pub fn grid_origin(term_width: u16, term_height: u16) -> (u16, u16) {
    // grid + gap + info panel
    let total_width = GRID_WIDTH + 25;
    let x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let y = if term_height > GRID_HEIGHT + 7 { 2 } else { 0 };
    (x, y)
}

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::Editing => render_editing(stdout, app, term_width, term_height)?,
        ScreenState::Graph => render_graph_screen(stdout, app, term_width, term_height)?,
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_editing(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let (grid_x, grid_y) = grid_origin(term_width, term_height);

    render_grid(stdout, app, grid_x, grid_y)?;

    let info_x = grid_x + GRID_WIDTH + 3;
    render_info_panel(stdout, app, info_x, grid_y)?;

    // One row below the grid stays free for the solve progress bar
    let controls_y = grid_y + GRID_HEIGHT + 2;
    render_controls(stdout, app, grid_x, controls_y)?;

    if let Some(ref message) = app.message {
        let color = match message.kind {
            MessageKind::Info => app.theme.info,
            MessageKind::Success => app.theme.success,
            MessageKind::Error => app.theme.error,
        };
        execute!(
            stdout,
            MoveTo(grid_x, controls_y + 3),
            SetForegroundColor(color),
            Print(&message.text)
        )?;
    }

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.box_border),
        Print("+===+===+===+===+===+===+===+===+===+")
    )?;

    for row in 0..9 {
        let cell_y = y + 1 + row as u16 * 2;
        execute!(stdout, MoveTo(x, cell_y))?;

        for col in 0..9 {
            // Thick borders at 3x3 boundaries
            if col % 3 == 0 {
                execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;
            } else {
                execute!(stdout, SetForegroundColor(theme.border), Print("│"))?;
            }
            render_cell(stdout, app, Position::new(row, col))?;
        }
        execute!(stdout, SetForegroundColor(theme.box_border), Print("║"))?;

        let sep_y = cell_y + 1;
        execute!(stdout, MoveTo(x, sep_y))?;
        if row == 8 || (row + 1) % 3 == 0 {
            execute!(
                stdout,
                SetForegroundColor(theme.box_border),
                Print("+===+===+===+===+===+===+===+===+===+")
            )?;
        } else {
            execute!(
                stdout,
                SetForegroundColor(theme.border),
                Print("+---+---+---+---+---+---+---+---+---+")
            )?;
        }
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position) -> io::Result<()> {
    let theme = &app.theme;

    let bg = if pos == app.cursor {
        theme.selected_bg
    } else {
        theme.bg
    };
    execute!(stdout, SetBackgroundColor(bg))?;

    match app.board.get(pos) {
        Some(value) => {
            // Without a solve result every entry is a user clue
            let is_clue = app.given.as_ref().map_or(true, |mask| mask.is_given(pos));
            let fg = if is_clue { theme.given } else { theme.solved };
            execute!(stdout, SetForegroundColor(fg), Print(format!(" {} ", value)))?;
        }
        None => {
            execute!(stdout, SetForegroundColor(Color::DarkGrey), Print(" · "))?;
        }
    }

    execute!(stdout, SetBackgroundColor(theme.bg))
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ AUTOSUDOKU ═══")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Filled: {:>2}/81", app.board.filled_count()))
    )?;

    let trace_name = app
        .trace_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| app.trace_file.display().to_string());
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print(format!("Trace: {}", trace_name))
    )?;

    if app.given.is_some() {
        execute!(
            stdout,
            MoveTo(x, y + 6),
            SetForegroundColor(theme.success),
            Print("Solved")
        )?;
    }

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let lines: [&[(&str, &str)]; 2] = [
        &[("1-9", " enter  "), ("0/Del", " clear  "), ("Bksp", " back")],
        &[
            ("s", " solve  "),
            ("g", " graph  "),
            ("r", " reset  "),
            ("t", " theme  "),
            ("q", " quit"),
        ],
    ];

    for (i, line) in lines.iter().enumerate() {
        execute!(stdout, MoveTo(x, y + i as u16))?;
        for (key, desc) in line.iter() {
            execute!(
                stdout,
                SetForegroundColor(app.theme.key),
                Print(key),
                SetForegroundColor(app.theme.info),
                Print(desc)
            )?;
        }
    }

    Ok(())
}

fn render_graph_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let view = match app.graph {
        Some(ref view) => view,
        None => return Ok(()),
    };

    let width = (term_width.saturating_sub(10) as usize).clamp(20, 72);
    let height = (term_height.saturating_sub(8) as usize).clamp(8, 20);
    let lines = graph::chart_lines(&view.counts, width, height);

    let x = 2;
    execute!(
        stdout,
        MoveTo(x, 1),
        SetForegroundColor(theme.key),
        Print(format!(
            "Solving process: {} steps ({})",
            view.counts.len(),
            view.source.display()
        ))
    )?;

    execute!(stdout, SetForegroundColor(theme.solved))?;
    for (i, line) in lines.iter().enumerate() {
        execute!(stdout, MoveTo(x, 3 + i as u16), Print(line))?;
    }

    execute!(
        stdout,
        MoveTo(x, 3 + lines.len() as u16 + 1),
        SetForegroundColor(theme.info),
        Print("Filled cells per step.  "),
        SetForegroundColor(theme.key),
        Print("Esc"),
        SetForegroundColor(theme.info),
        Print(" back  "),
        SetForegroundColor(theme.key),
        Print("q"),
        SetForegroundColor(theme.info),
        Print(" quit")
    )?;

    Ok(())
}

/// Progress bar drawn below the grid while the solver runs. The solver
/// reports after every assignment; the bar repaints only when the integer
/// percentage actually changes, which keeps the redraw cost negligible
/// next to the search itself.
pub struct SolveProgressBar<'a> {
    stdout: &'a mut io::Stdout,
    x: u16,
    y: u16,
    width: u16,
    fill: Color,
    text: Color,
    last: Option<u8>,
}

impl<'a> SolveProgressBar<'a> {
    pub fn new(
        stdout: &'a mut io::Stdout,
        x: u16,
        y: u16,
        width: u16,
        fill: Color,
        text: Color,
    ) -> Self {
        Self {
            stdout,
            x,
            y,
            width,
            fill,
            text,
            last: None,
        }
    }
}

impl ProgressSink for SolveProgressBar<'_> {
    fn report(&mut self, percent: u8) {
        if self.last == Some(percent) {
            return;
        }
        self.last = Some(percent);

        // "[", bar, "] 100%"
        let inner = self.width.saturating_sub(7) as usize;
        let filled = inner * percent as usize / 100;

        // Best effort: a failed repaint must not abort the solve
        let _ = execute!(
            self.stdout,
            MoveTo(self.x, self.y),
            SetForegroundColor(self.text),
            Print("["),
            SetForegroundColor(self.fill),
            Print("#".repeat(filled)),
            SetForegroundColor(self.text),
            Print(format!("{}] {:>3}%", "-".repeat(inner - filled), percent))
        );
        let _ = self.stdout.flush();
    }
}
