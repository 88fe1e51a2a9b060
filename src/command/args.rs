//! Command-line arguments.

use std::{
    ffi::OsString,
    path::PathBuf,
};
use colored::Colorize;
use const_format::str_repeat;
use crate::{
    Error,
    err::validate_param,
};

/// Log file, used if `-l` is not provided.
pub const DEFAULT_LOG_FILE: &str = "multi_population.log";
/// Configuration file, used if `--config-file` is not provided.
pub const DEFAULT_CONFIG_FILE: &str = "multi_population.cfg";

#[derive(Debug)]
pub struct Args {
    pub populations: Vec<PathBuf>,
    pub vcf: Option<PathBuf>,
    pub chrom: Option<String>,
    /// Configuration file, explicitly provided by the user.
    pub config: Option<PathBuf>,
    pub output: PathBuf,
    pub log_file: PathBuf,

    pub fst_window_size: u32,
    pub fst_window_step: u32,
    /// Additional arguments to the selection pipeline, passed as a single argument.
    pub extra_args: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            populations: Vec::new(),
            vcf: None,
            chrom: None,
            config: None,
            output: PathBuf::from("."),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),

            fst_window_size: 1000,
            fst_window_step: 1000,
            extra_args: None,
        }
    }
}

impl Args {
    /// Validate arguments, modifying some, if needed.
    fn validate(self) -> Result<Self, Error> {
        validate_param!(self.vcf.is_some(), "No VCF file has been specified as input (see -i/--vcf-input-file)");
        validate_param!(self.chrom.is_some(), "No chromosome has been specified (see -c/--chromosome)");
        validate_param!(!self.populations.is_empty(), "No population files are provided (see -p/--population)");
        validate_param!(self.fst_window_size > 0, "FST window size must be positive");
        validate_param!(self.fst_window_step > 0, "FST window step must be positive");
        Ok(self)
    }

    /// Configuration file that will be loaded.
    pub fn config_file(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

/// Print tool version.
pub fn print_version() {
    println!("{} {}", env!("CARGO_PKG_NAME").underline(), format!("v{}", env!("CARGO_PKG_VERSION")).green());
}

fn print_help() {
    const KEY: usize = 28;
    const VAL: usize = 4;
    const EMPTY: &'static str = str_repeat!(" ", KEY + VAL + 5);

    let defaults = Args::default();
    println!("{}", "Run the selection pipeline on several populations, and calculate pairwise FST and RSB.".yellow());

    println!("\n{} {} -i joint.vcf -c 22 -p pop1.txt -p pop2.txt [arguments]",
        "Usage:".bold(), env!("CARGO_PKG_NAME"));

    println!("\n{}", "Input/output arguments:".bold());
    println!("    {:KEY$} {:VAL$}  Input VCF file with samples from all populations.",
        "-i, --vcf-input-file".green(), "FILE".yellow());
    println!("    {:KEY$} {:VAL$}  Chromosome label. Does not have to correspond to a real chromosome,\n\
        {EMPTY}  but is used to name output files.",
        "-c, --chromosome".green(), "STR".yellow());
    println!("    {:KEY$} {:VAL$}  Population file: population name on the first line,\n\
        {EMPTY}  followed by one sample per line. Can be repeated.",
        "-p, --population".green(), "FILE".yellow());
    println!("    {:KEY$} {:VAL$}  Output directory [{}].",
        "-o, --output".green(), "DIR".yellow(), defaults.output.display());
    println!("    {:KEY$} {:VAL$}  Configuration file [{}].",
        "    --config-file".green(), "FILE".yellow(), DEFAULT_CONFIG_FILE);
    println!("    {:KEY$} {:VAL$}  Log file [{}].",
        "-l, --log-file".green(), "FILE".yellow(), defaults.log_file.display());

    println!("\n{}", "Optional parameters:".bold());
    println!("    {:KEY$} {:VAL$}  FST window size [{}].",
        "    --fst-window-size".green(), "INT".yellow(), defaults.fst_window_size);
    println!("    {:KEY$} {:VAL$}  FST window step [{}].",
        "    --fst-window-step".green(), "INT".yellow(), defaults.fst_window_step);
    println!("    {:KEY$} {:VAL$}  Additional arguments to the selection pipeline,\n\
        {EMPTY}  passed as a single argument.",
        "-a, --pipeline-args".green(), "STR".yellow());

    println!("\n{}", "Other parameters:".bold());
    println!("    {:KEY$} {:VAL$}  Show this help message.", "-h, --help".green(), "");
    println!("    {:KEY$} {:VAL$}  Show version.", "-V, --version".green(), "");
}

pub fn parse_args(argv: &[OsString]) -> Result<Args, Error> {
    use lexopt::prelude::*;
    let mut args = Args::default();
    let mut parser = lexopt::Parser::from_args(argv);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('p') | Long("population") => args.populations.push(parser.value()?.into()),
            Short('i') | Long("vcf-input-file") => args.vcf = Some(parser.value()?.into()),
            Short('c') | Long("chromosome") => args.chrom = Some(parser.value()?.string()?),
            Long("config-file") => args.config = Some(parser.value()?.into()),
            Short('o') | Long("output") => args.output = parser.value()?.into(),
            Short('l') | Long("log-file") => args.log_file = parser.value()?.into(),

            Long("fst-window-size") => args.fst_window_size = parser.value()?.parse()?,
            Long("fst-window-step") => args.fst_window_step = parser.value()?.parse()?,
            Short('a') | Long("pipeline-args") => args.extra_args = Some(parser.value()?.string()?),

            Short('V') | Long("version") => {
                print_version();
                std::process::exit(0);
            }
            Short('h') | Long("help") => {
                print_help();
                std::process::exit(0);
            }
            _ => Err(arg.unexpected())?,
        }
    }
    args.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Args, Error> {
        parse_args(&argv.iter().map(OsString::from).collect::<Vec<_>>())
    }

    #[test]
    fn defaults() {
        let args = parse(&["-i", "joint.vcf", "-c", "22", "-p", "a.txt", "--population", "b.txt"]).unwrap();
        assert_eq!(args.vcf, Some(PathBuf::from("joint.vcf")));
        assert_eq!(args.chrom.as_deref(), Some("22"));
        assert_eq!(args.populations, [PathBuf::from("a.txt"), PathBuf::from("b.txt")]);
        assert_eq!(args.fst_window_size, 1000);
        assert_eq!(args.fst_window_step, 1000);
        assert_eq!(args.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(args.config_file(), PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(args.output, PathBuf::from("."));
        assert!(args.extra_args.is_none());
    }

    #[test]
    fn all_options() {
        let args = parse(&["--vcf-input-file", "in.vcf", "--chromosome", "chrX", "-p", "a.txt",
            "--config-file", "my.cfg", "-l", "run.log", "-o", "out", "--fst-window-size", "5000",
            "--fst-window-step=2500", "-a", "--cores 4"]).unwrap();
        assert_eq!(args.config_file(), PathBuf::from("my.cfg"));
        assert_eq!(args.log_file, PathBuf::from("run.log"));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.fst_window_size, 5000);
        assert_eq!(args.fst_window_step, 2500);
        assert_eq!(args.extra_args.as_deref(), Some("--cores 4"));
    }

    #[test]
    fn invalid() {
        assert!(matches!(parse(&["-c", "22", "-p", "a.txt"]), Err(Error::InvalidInput(_))));
        assert!(matches!(parse(&["-i", "in.vcf", "-p", "a.txt"]), Err(Error::InvalidInput(_))));
        assert!(matches!(parse(&["-i", "in.vcf", "-c", "22"]), Err(Error::InvalidInput(_))));
        assert!(matches!(parse(&["-i", "in.vcf", "-c", "22", "-p", "a", "--fst-window-size", "0"]),
            Err(Error::InvalidInput(_))));
        assert!(matches!(parse(&["-i", "in.vcf", "-c", "22", "-p", "a", "--fst-window-step", "x"]),
            Err(Error::Lexopt(_))));
        assert!(matches!(parse(&["-i", "in.vcf", "--unknown"]), Err(Error::Lexopt(_))));
    }
}
