pub const USAGE: &str = "\
Usage: pidchain -pid=234
  where 234 is the id of the process whose ancestry to print

Options:
  -pid=<id>         process to start from (required)
  -d=<delimiter>    separator between entries, defaults to ' <- '
  -s                suppress the leading text
  -n                show process names instead of ids
  -r                reverse order, root first
  -config=<path>    load further options from an INI file; its values win
  -verbose, -v      print diagnostics to stderr
  -log-file=<path>  write diagnostics to a file instead
  -help, -h         show this message

  -config, -verbose and -log-file are read from the command line only.

Example:
  $ pidchain -s -r -d=', ' -n -pid=3648
  systemd, systemd, plasmashell, desktopapp";

pub fn display_usage() {
    println!("{USAGE}");
}
