pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SHORT_HELP: &str = "\
Winpath inspects and joins Windows-style filesystem paths.

Usage:
    wp [options] <path>

Arguments:
    <path>          windows-style path to work with

Options:
    --join, -j <segment>...   append a segment onto the path
    --var, -v <key=value>...  define a variable for expansion
    --expand                  expand '~' and variables in the path
    --ls                      list the entries of the directory
    --ext <ext>               with --ls, only list entries with this extension
    --info                    print the properties of the path (not with --ls)
    --verbose                 use verbose output
    --version                 print version information and exit
    --help, -h                print this help information and exit

Use 'wp --help --verbose' for more information about winpath.
";

pub const LONG_HELP: &str = "\
Winpath inspects and joins Windows-style filesystem paths.

Paths are normalized as they are read: '/' becomes '\\', repeated separators
collapse, and '.' and '..' segments are resolved. Segments given with --join
are appended in order, even when they look absolute.

With --expand, a leading '~' becomes the home directory and '%NAME%', '$NAME'
and '${NAME}' are replaced by environment variables. Variables that are not
in the environment are read from --var definitions and then from
'~/.winpath/vars.toml', a table of NAME = \"value\" entries.

Set RUST_LOG to control diagnostic output (default 'warn', or 'debug' with
--verbose).
";
