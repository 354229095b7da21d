use hackatime_doctor::cli::Cli;
use hackatime_doctor::config::Config;
use hackatime_doctor::core::debug_logger::get_debug_logger;
use hackatime_doctor::core::report::{JsonReporter, Reporter, TerminalReporter};
use hackatime_doctor::core::runner::{has_failures, standard_checks};
use hackatime_doctor::core::Doctor;
use std::io;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse_args();

    if cli.init {
        let path = Config::init()?;
        println!("Config at {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    if cli.print {
        config.print()?;
        return Ok(());
    }

    config.check()?;
    if cli.check {
        println!("✓ Configuration valid");
        return Ok(());
    }

    let logger = Arc::new(get_debug_logger());
    let project_root = std::env::current_dir()?;
    let doctor = Doctor::new(standard_checks(&config, &project_root, logger.clone()))
        .with_logger(logger);

    let stdout = io::stdout();
    let mut reporter: Box<dyn Reporter> = if cli.json {
        Box::new(JsonReporter::new(stdout.lock()))
    } else {
        let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();
        Box::new(TerminalReporter::new(stdout.lock(), color))
    };

    let results = doctor.run(reporter.as_mut());
    drop(reporter);

    // Failures are reported but only change the exit status on request
    if cli.fail_on_error && has_failures(&results) {
        std::process::exit(1);
    }

    Ok(())
}
