use cliproc::{Cli, ExitCode};
use std::env;
use winpath::Wp;

fn main() -> ExitCode {
    Cli::default().parse(env::args()).go::<Wp>()
}
