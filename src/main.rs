use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use lince::cursor::StreamCursor;
use lince::dump::{self, DEFAULT_DUMP_CELLS};
use lince::error::{Error, ErrorKind};
use lince::interpreter::{Config, Interpreter};
use lince::tape::{DEFAULT_TAPE_SIZE, Tape};

#[derive(Parser)]
#[command(
    name = "lince",
    version,
    about = "Run a Lince tape program straight from its source file"
)]
struct Cli {
    /// Program source file.
    source: PathBuf,

    /// Print the start of the tape once the run ends.
    #[arg(long)]
    debug: bool,

    /// Number of tape cells (at least 1).
    #[arg(long, default_value_t = DEFAULT_TAPE_SIZE, value_parser = parse_tape_size)]
    tape_size: usize,

    /// Cells shown by --debug.
    #[arg(long, default_value_t = DEFAULT_DUMP_CELLS)]
    dump_cells: usize,

    /// Abort after this many instructions.
    #[arg(long)]
    step_limit: Option<usize>,
}

/// Parse a tape size, which must leave the head at least one cell.
fn parse_tape_size(s: &str) -> Result<usize, String> {
    let size = s
        .parse::<usize>()
        .map_err(|e| format!("Invalid tape size: {e}"))?;
    if size == 0 {
        return Err("Tape size must be positive".to_string());
    }
    Ok(size)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e)
            if matches!(
                e.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
            ) =>
        {
            e.exit()
        }
        Err(e) => {
            // Without a usable source there is nothing to open.
            let _ = e.print();
            return ExitCode::from(ErrorKind::SourceUnavailable.exit_code());
        }
    };

    let config = Config {
        tape_size: cli.tape_size,
        step_limit: cli.step_limit,
    };

    let stdin = io::stdin();
    let (result, tape) = run_file(&cli.source, &config, stdin.lock(), io::stdout().lock());
    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    if cli.debug {
        let mut stdout = io::stdout().lock();
        if let Err(e) = write_dump(&mut stdout, &tape, cli.dump_cells) {
            log::warn!("could not write debug dump: {e}");
        }
    }

    ExitCode::from(exit_status(&result))
}

/// Open `path` and run it against the given devices.
///
/// A tape is always handed back so it can be dumped after a fault; if the
/// source never opened it is a fresh one.
fn run_file<R: BufRead, W: Write>(
    path: &Path,
    config: &Config,
    input: R,
    output: W,
) -> (Result<(), Error>, Tape) {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(source) => {
            let err = Error::SourceUnavailable {
                path: path.to_path_buf(),
                source,
            };
            return (Err(err), Tape::new(config.tape_size));
        }
    };
    let cursor = match StreamCursor::new(file) {
        Ok(cursor) => cursor,
        Err(e) => return (Err(e.into()), Tape::new(config.tape_size)),
    };
    log::debug!("running {}", path.display());

    let mut interpreter = Interpreter::new(cursor, input, output, config);
    let result = interpreter.run();
    (result, interpreter.tape().clone())
}

fn exit_status(result: &Result<(), Error>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => e.kind().exit_code(),
    }
}

fn write_dump<W: Write>(out: &mut W, tape: &Tape, cells: usize) -> io::Result<()> {
    writeln!(out, "\n --- Stack debug mode ---")?;
    write!(out, "{}", dump::render(tape, cells))?;
    out.flush()
}
