//! aptbundle - Main entry point

use aptbundle::backend::AptBackend;
use aptbundle::cli::Cli;
use aptbundle::installer::Installer;
use aptbundle::{logging, sanity};
use tracing::{debug, error};

fn main() {
    let cli = Cli::parse_args();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{:#}", e);
    }
    debug!("CLI arguments parsed: {:?}", cli);

    let options = match cli.into_options() {
        Ok(options) => options,
        Err(e) => {
            error!("{}", e);
            eprintln!("✗ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let backend = AptBackend::new();
    let preflight = sanity::verify_environment(&backend, !options.dry_run);

    let installer = Installer::new(options, &backend);
    let mut stdout = std::io::stdout().lock();
    match installer.run(preflight, &mut stdout) {
        Ok(outcome) => debug!("Finished: {:?}", outcome),
        Err(e) => {
            error!("{}", e);
            eprintln!("✗ {}", e);
            if e.is_preflight() {
                eprintln!("  No package commands were run.");
            }
            std::process::exit(e.exit_code());
        }
    }
}
