use std::process::ExitCode;

use palc::Parser;
use tracing_subscriber::EnvFilter;
use zbfjit::cli::*;

fn main() -> ExitCode {
	tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();

	let runner = zbfjit::Runner;
	let cli = Cli::parse();
	let result = match &cli.mode {
		Mode::Run { path, .. } => runner.run_file(path, cli.mode.execution_mode()),
		Mode::Dump { path } => runner.dump_file(path, &mut std::io::stdout().lock()),
	};

	match result {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			eprintln!("Failed run file: {e}");
			ExitCode::FAILURE
		}
	}
}
