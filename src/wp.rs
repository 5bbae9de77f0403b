use super::config::Config;
use super::error::Error;
use super::help;
use super::path::{WinPath, EXT_SEP};
use super::vars::{Var, VarMap};
use cliproc::{cli, proc, stage::*};
use cliproc::{Arg, Cli, Command, Help};
use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

type AnyError = Box<dyn std::error::Error>;

#[derive(Debug, PartialEq)]
pub struct Wp {
    path: WinPath,
    joins: Vec<String>,
    variables: Vec<Var>,
    expand: bool,
    list: bool,
    ext: Option<String>,
    info: bool,
    verbose: bool,
}

impl Command for Wp {
    fn interpret(cli: &mut Cli<Memory>) -> cli::Result<Self> {
        cli.help(Help::with(help::SHORT_HELP))?;
        let verbose = cli.check(Arg::flag("verbose"))?;
        if verbose == true {
            cli.help(Help::with(help::LONG_HELP))?;
        }
        cli.raise_help()?;
        cli.lower_help();
        cli.help(Help::with(help::VERSION).flag("version"))?;
        cli.raise_help()?;
        cli.lower_help();
        cli.help(Help::with(help::SHORT_HELP))?;
        Ok(Self {
            verbose: verbose,
            expand: cli.check(Arg::flag("expand"))?,
            list: cli.check(Arg::flag("ls"))?,
            info: cli.check(Arg::flag("info"))?,
            ext: cli.get(Arg::option("ext").value("ext"))?,
            joins: cli
                .get_all(Arg::option("join").switch('j').value("segment"))?
                .unwrap_or_default(),
            variables: cli
                .get_all(Arg::option("var").switch('v').value("key=value"))?
                .unwrap_or_default(),
            path: cli.require(Arg::positional("path"))?,
        })
    }

    fn execute(self) -> proc::Result {
        init_logging(self.verbose);
        self.run()
    }
}

/// Installs the diagnostic subscriber. `RUST_LOG` takes precedence over the
/// verbosity flag.
fn init_logging(verbose: bool) {
    let level = match verbose {
        true => "debug",
        false => "warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

impl Wp {
    fn run(&self) -> Result<(), AnyError> {
        self.check_flags()?;
        let path = self.resolve()?;
        if self.list == true {
            self.list_entries(&path)?;
        } else if self.info == true {
            self.print_info(&path);
        } else {
            println!("{}", path);
        }
        Ok(())
    }

    /// Rejects option combinations where one option would be ignored.
    fn check_flags(&self) -> Result<(), Error> {
        if self.ext.is_some() == true && self.list == false {
            return Err(Error::FlagConflict(String::from(
                "option '--ext' requires flag '--ls'",
            )));
        }
        if self.list == true && self.info == true {
            return Err(Error::FlagConflict(String::from(
                "flags '--ls' and '--info' cannot be used together",
            )));
        }
        Ok(())
    }

    /// Appends the joined segments, then expands the result when requested.
    fn resolve(&self) -> Result<WinPath, Error> {
        let path = self.path.join_all(&self.joins);
        match self.expand {
            true => {
                let vars = self.collect_vars(Config::from_home()?);
                Ok(path.expand_user().expand_vars_with(&vars))
            }
            false => Ok(path),
        }
    }

    /// Combines the configured variables with the ones given on the command
    /// line, letting the command line win.
    fn collect_vars(&self, config: Config) -> VarMap {
        let mut vars = config.vars();
        debug!("loaded {} variables from {:?}", vars.len(), config.root());
        vars.merge(VarMap::from(&self.variables));
        vars
    }

    fn list_entries(&self, dir: &WinPath) -> Result<(), Error> {
        for entry in dir.ls()? {
            let entry = entry?;
            if let Some(ext) = &self.ext {
                if Self::matches_ext(&entry, ext) == false {
                    continue;
                }
            }
            match entry.is_dir() {
                true => println!("{}", entry.to_string().blue().bold()),
                false => println!("{}", entry),
            }
        }
        Ok(())
    }

    /// Checks the extension of `entry` against `ext`, which may be given
    /// with or without its leading dot.
    fn matches_ext(entry: &WinPath, ext: &str) -> bool {
        let ext = ext.trim_start_matches(EXT_SEP);
        let found = entry.ext().trim_start_matches(EXT_SEP);
        found.is_empty() == false && found.eq_ignore_ascii_case(ext)
    }

    fn print_info(&self, path: &WinPath) {
        let rows = [
            ("path", path.to_string()),
            ("base", path.basename().to_string()),
            ("ext", path.ext().to_string()),
            ("parent", path.parent().to_string()),
            ("is_file", path.is_file().to_string()),
            ("is_dir", path.is_dir().to_string()),
        ];
        for (key, value) in rows {
            println!("{} {}", format!("{:<8}", key).bold(), value);
        }
    }
}
