use super::args::*;

pub mod inspect;
pub mod report;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const RENDER_FAILED: i32 = 1;
    pub const INPUT_ERROR: i32 = 2;
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.cmd {
        Command::Report(args) => report::run(args).await,
        Command::Inspect(args) => inspect::run(args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(exit_codes::OK)
        }
    }
}
