// hanoi-stack: Towers of Hanoi on a hand-built call stack

use std::io::{self, BufRead, BufWriter, Write};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use hanoi_stack::cli::{self, Options};
use hanoi_stack::machine::constants::{MAX_TUI_DISKS, SNAPSHOT_MEMORY_LIMIT};
use hanoi_stack::machine::engine::run_with;
use hanoi_stack::machine::errors::MachineError;
use hanoi_stack::machine::timeline::Timeline;
use hanoi_stack::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args
        .first()
        .map(|s| s.as_str())
        .unwrap_or("hanoi-stack")
        .to_string();

    let options = match cli::parse_args(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!();
            eprintln!("{}", cli::usage(&program_name));
            std::process::exit(1);
        }
    };

    if options.help {
        println!("{}", cli::usage(&program_name));
        return Ok(());
    }

    // Log lines would tear the alternate screen, so the stepper runs silent
    let level = if options.tui {
        log::LevelFilter::Off
    } else if options.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    simple_logger::SimpleLogger::new().with_level(level).init()?;

    let raw_disks = match &options.disks {
        Some(raw) => raw.clone(),
        None => {
            eprintln!("Enter the number of disks");
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    let disks = match cli::parse_disk_count(&raw_disks) {
        Ok(disks) => disks,
        Err(e) => fail(e),
    };

    if options.tui {
        run_tui(&options, disks)
    } else {
        run_print(&options, disks)
    }
}

fn fail(e: MachineError) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(e.exit_code());
}

/// Run to completion and print every move; nothing is printed on failure
fn run_print(options: &Options, disks: u32) -> Result<(), Box<dyn std::error::Error>> {
    log::debug!("using {} storage", options.storage);
    let moves = match run_with(
        options.storage.build(),
        i64::from(disks),
        options.source,
        options.temp,
        options.target,
    ) {
        Ok(moves) => moves,
        Err(e) => fail(e),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for mv in &moves {
        writeln!(out, "{}", mv)?;
    }
    writeln!(out, "completed hanoi")?;
    out.flush()?;
    Ok(())
}

fn run_tui(options: &Options, disks: u32) -> Result<(), Box<dyn std::error::Error>> {
    if i64::from(disks) > MAX_TUI_DISKS {
        fail(MachineError::InvalidArgument {
            message: format!(
                "the stepper records at most {} disks, got {}",
                MAX_TUI_DISKS, disks
            ),
        });
    }

    let timeline = match Timeline::record(
        options.storage.build(),
        i64::from(disks),
        options.source,
        options.temp,
        options.target,
        SNAPSHOT_MEMORY_LIMIT,
    ) {
        Ok(timeline) => timeline,
        Err(e) => fail(e),
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(timeline);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
