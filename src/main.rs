use std::path::PathBuf;
use std::rc::Rc;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::{Level, info, warn};

use term_dlg::components::{Button, ButtonKind, Label};
use term_dlg::drivers::console::ConsoleDriver;
use term_dlg::geometry::{PosFlags, Rect};
use term_dlg::history::FileHistory;
use term_dlg::window::{DefaultCallback, DialogSpec, InsertPos, WidgetHandle};
use term_dlg::{ResultCode, WindowManager, WmConfig, tracing_sub};

#[derive(Parser, Debug)]
#[command(
    name = "term-dlg",
    version = env!("CARGO_PKG_VERSION"),
    about = "Dialog stack demo: a fullscreen screen with a modal confirmation on top"
)]
struct Cli {
    /// Redraw only the top dialog instead of compositing the whole stack.
    #[arg(long)]
    fast_refresh: bool,

    /// Entries kept per input history list; 0 disables history.
    #[arg(long, value_name = "N", default_value_t = term_dlg::constants::DEFAULT_HISTORY_SIZE)]
    history_size: usize,

    /// Persist input history to this file.
    #[arg(long, value_name = "PATH")]
    history_file: Option<PathBuf>,

    /// Leave the mouse to the terminal.
    #[arg(long)]
    no_mouse: bool,

    /// Close dialogs with a left click outside of them.
    #[arg(long)]
    mouse_close_dialog: bool,

    /// Write logs to this file (nothing is logged otherwise).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// trace, debug, info, warn or error.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

impl TryFrom<&Cli> for WmConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let level: Level = cli
            .log_level
            .parse()
            .map_err(|_| format!("unknown log level '{}'", cli.log_level))?;
        if cli.history_size > 10_000 {
            return Err("history size must be at most 10000".to_string());
        }
        Ok(WmConfig::default()
            .with_fast_refresh(cli.fast_refresh)
            .with_history_size(cli.history_size)
            .with_mouse_enabled(!cli.no_mouse)
            .with_mouse_close_dialog(cli.mouse_close_dialog)
            .with_log_file(cli.log_file.clone())
            .with_log_level(level))
    }
}

fn main() -> term_dlg::Result<()> {
    let cli = Cli::parse();
    let config = match WmConfig::try_from(&cli) {
        Ok(config) => config,
        Err(msg) => Cli::command().error(ErrorKind::ValueValidation, msg).exit(),
    };
    tracing_sub::init_with(&config)?;

    let driver = ConsoleDriver::new(&config)?;
    let mut wm = WindowManager::new(Box::new(driver), config)?;
    if let Some(path) = cli.history_file.as_ref() {
        wm = wm.with_history(Box::new(FileHistory::new(path)));
    }

    wm.enter_terminal()?;
    let main_screen = build_main_screen(&mut wm);
    let result = wm.run(main_screen);
    wm.destroy_dialog(main_screen);
    wm.leave_terminal()?;

    let result = result?;
    info!(code = result.code(), "demo finished");
    println!(
        "{}",
        indoc::formatdoc!(
            "
            term-dlg demo closed.
            Result: {result:?} (code {code})
            ",
            code = result.code(),
        )
    );
    Ok(())
}

fn build_main_screen(wm: &mut WindowManager) -> WidgetHandle {
    let d = wm.create_dialog(
        DialogSpec::new(Rect::default())
            .pos_flags(PosFlags::FULLSCREEN)
            .title("term-dlg"),
        Rc::new(DefaultCallback),
    );

    let (intro, _) = Label::create(
        wm,
        1,
        2,
        "Tab moves focus, Enter presses, Esc quits.\nDrag a dialog by its top border.",
    );
    wm.add_widget(d, intro, InsertPos::Append);

    let (status_handle, status) =
        Label::create(wm, 4, 2, format!("{:<40}", "No question asked yet."));
    wm.add_widget(d, status_handle, InsertPos::Append);

    let ask = Button::new("&Ask", ResultCode::Exit)
        .kind(ButtonKind::Default)
        .on_press(Rc::new(move |wm: &mut WindowManager, _w: WidgetHandle| {
            let answer = ask_question(wm);
            status.set_text(wm, status_handle, format!("{:<40}", format!("Answer: {answer:?}")));
            true
        }))
        .create(wm, 6, 2);
    wm.add_widget(d, ask, InsertPos::Append);

    let quit = Button::new("&Quit", ResultCode::Cancel).create(wm, 6, 14);
    wm.add_widget(d, quit, InsertPos::Append);

    wm.select_widget(ask);
    d
}

fn ask_question(wm: &mut WindowManager) -> ResultCode {
    let d = wm.create_dialog(
        DialogSpec::new(Rect::new(0, 0, 7, 36))
            .pos_flags(PosFlags::CENTER)
            .modal(true)
            .title("Question")
            .help_ctx("[Question]"),
        Rc::new(DefaultCallback),
    );
    let (text, _) = Label::create(wm, 2, 4, "Is this a terminal dialog?");
    wm.add_widget(d, text, InsertPos::Append);

    let yes = Button::new("&Yes", ResultCode::Enter)
        .kind(ButtonKind::Default)
        .create(wm, 4, 8);
    wm.add_widget(d, yes, InsertPos::Append);
    let no = Button::new("&No", ResultCode::Cancel).create(wm, 4, 20);
    wm.add_widget(d, no, InsertPos::Append);

    let answer = match wm.run(d) {
        Ok(code) => code,
        Err(err) => {
            warn!(%err, "question dialog failed");
            ResultCode::Cancel
        }
    };
    wm.destroy_dialog(d);
    answer
}
