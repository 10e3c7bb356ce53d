//! CLI argument definitions.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "focus_backdrop")]
#[command(about = "Full-screen backdrop behind your application windows", long_about = None)]
pub struct Cli {
    /// Open the preferences dialog on launch.
    #[arg(long)]
    pub preferences: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preferences_flag_is_optional() {
        let cli = Cli::try_parse_from(["focus_backdrop"]).unwrap();
        assert!(!cli.preferences);

        let cli = Cli::try_parse_from(["focus_backdrop", "--preferences"]).unwrap();
        assert!(cli.preferences);
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(Cli::try_parse_from(["focus_backdrop", "--startup"]).is_err());
        assert!(Cli::try_parse_from(["focus_backdrop", "image.png"]).is_err());
    }
}
