//! Banner and log level helpers

const BANNER: &str = r#"
        _
 __   _(_) ___ ___  _ __
 \ \ / / |/ __/ _ \| '_ \
  \ V /| | (_| (_) | | | |
   \_/ |_|\___\___/|_| |_|
"#;

pub fn banner() -> String {
    format!("{}  media conversion, described in words\n", BANNER.trim_start_matches('\n'))
}

pub fn print_banner() {
    println!("{}", banner());
}

/// Get the log level filter for the given verbosity
pub fn get_log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,reqwest=debug", // -vvv shows everything including dependencies
    }
}

/// Usage hint printed by a bare `vicon`.
pub fn ready_message() -> &'static str {
    "Ready. Describe a conversion, for example:\n  vicon convert all mov files to mp4\n  vicon make a gif from intro.mp4\n\nRun `vicon setup` to choose an AI provider."
}
