use std::io::{self, BufReader, Write};
#[cfg(unix)]
use std::mem::ManuallyDrop;
#[cfg(unix)]
use std::os::unix::io::FromRawFd;
use std::path::Path;
use std::process;

use anyhow::Context;
use clap::Parser;

use vcftools_rs::balance::{self, BalanceConfig};
use vcftools_rs::common::{self, io::read_file};

#[derive(Parser)]
#[command(
    name = "abcalc",
    about = "Calculate per-sample allele balance (ref/alt) from a VCF file"
)]
struct Cli {
    /// Input VCF file (uses mmap; reads stdin when omitted)
    #[arg(short = 'i', long = "input", value_name = "FILE")]
    input: Option<String>,

    /// Restrict output to these sample names, in the given order
    #[arg(
        short = 's',
        long = "samples",
        value_name = "NAMES",
        value_delimiter = ','
    )]
    samples: Vec<String>,

    /// Number of chunks to partition the input into (default: CPU count)
    #[arg(short = 't', long = "threads", value_name = "N")]
    threads: Option<usize>,

    /// Process partitioned chunks on worker threads
    #[arg(long = "parallel")]
    parallel: bool,

    /// Suppress informational messages
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Input VCF file (positional alternative to --input)
    #[arg(value_name = "FILE")]
    file: Option<String>,
}

/// Write to fd 1 directly. The pipeline batches everything through
/// OutputBuffer, so there is no point stacking a BufWriter on top.
#[cfg(unix)]
fn stdout_writer() -> impl Write {
    struct RawStdout(ManuallyDrop<std::fs::File>);
    impl Write for RawStdout {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            (&*self.0).write(buf)
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
    RawStdout(unsafe { ManuallyDrop::new(std::fs::File::from_raw_fd(1)) })
}

#[cfg(not(unix))]
fn stdout_writer() -> impl Write {
    io::stdout().lock()
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cfg = BalanceConfig {
        samples: cli.samples.clone(),
        workers: cli.threads,
        parallel: cli.parallel,
    };

    let input = cli.input.as_deref().or(cli.file.as_deref());
    let writer = stdout_writer();

    match input {
        Some(path) => {
            let data = read_file(Path::new(path))
                .map_err(|e| anyhow::anyhow!("{}: {}", path, common::io_error_msg(&e)))
                .context("cannot read input")?;
            if !cli.quiet {
                let workers = balance::resolve_workers(&cfg);
                let mode = if cli.parallel { "parallel" } else { "sequential" };
                eprintln!(
                    "Info: mapped input ({} bytes), target {} chunk(s), {} processing",
                    data.len(),
                    workers,
                    mode
                );
                describe_selection(&cfg);
            }
            balance::process_data(&data, &cfg, writer)?;
        }
        None => {
            if !cli.quiet {
                eprintln!("Info: streamed input (stdin), no partitioning");
                describe_selection(&cfg);
            }
            let reader = BufReader::new(io::stdin().lock());
            balance::process_reader(reader, &cfg, writer)?;
        }
    }
    Ok(())
}

fn describe_selection(cfg: &BalanceConfig) {
    if cfg.samples.is_empty() {
        eprintln!("Info: calculating allele balance for all samples");
    } else {
        eprintln!(
            "Info: calculating allele balance for {} requested sample(s)",
            cfg.samples.len()
        );
    }
}

fn main() {
    common::reset_sigpipe();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        // A reader downstream closing the pipe is a normal exit.
        // BalanceError::Io exposes the io::Error through source(), so the
        // anyhow chain surfaces it either way.
        let broken_pipe = e
            .chain()
            .filter_map(|c| c.downcast_ref::<io::Error>())
            .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe);
        if broken_pipe {
            process::exit(0);
        }
        eprintln!("{}: {:#}", common::tool_name(env!("CARGO_BIN_NAME")), e);
        process::exit(1);
    }
}
