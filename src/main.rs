use clap::Parser as _;

use focus_backdrop::{app, cli, logging, platform};

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    if platform::running_as_root() {
        eprintln!("This app should not be run as root/superuser.");
        std::process::exit(1);
    }

    logging::init();
    platform::install_signal_handlers();
    app::run(cli.preferences)
}
