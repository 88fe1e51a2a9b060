pub mod ext;
pub mod config;
pub mod pop;
pub mod runner;
pub mod stages;
pub mod command;

mod err;
pub use err::Error;

use std::{
    fs::File,
    path::Path,
};

/// Opens log file for appending, keeping earlier runs.
fn open_log(log_file: &Path) -> Result<File, Error> {
    fern::log_file(log_file).map_err(err::add_path!(log_file))
}

/// Logs to stderr (info and above, colored) and to the log file (debug and above).
fn init_logger(log_file: &Path) -> Result<(), Error> {
    use fern::{
        Dispatch,
        colors::{Color, ColoredLevelConfig},
    };
    let colors = ColoredLevelConfig::default()
        .info(Color::Green)
        .debug(Color::Cyan);
    let stderr = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {:>5}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr());
    let file = Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {:>5}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Debug)
        .chain(open_log(log_file)?);
    Dispatch::new()
        .chain(stderr)
        .chain(file)
        .apply()
        .map_err(|e| Error::RuntimeError(format!("Cannot initialize logger: {}", e)))
}

fn main() {
    let argv: Vec<_> = std::env::args_os().skip(1).collect();
    let args = match command::parse_args(&argv) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e.display());
            std::process::exit(e.exit_code());
        }
    };
    if let Err(e) = init_logger(&args.log_file) {
        eprintln!("{}", e.display());
        std::process::exit(e.exit_code());
    }
    if let Err(e) = command::run(args) {
        log::error!("{}", e.display());
        std::process::exit(e.exit_code());
    }
}
