use clap::{value_parser, Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("ghostshot")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Capture a desktop window by title into a PNG file")
        .long_about(
            "ghostshot finds the first visible, non-minimized window whose title contains \
             TITLE (case-insensitive) and saves a screenshot of it as <name>.png. With \
             --silent the window is made invisible while it is captured and restored \
             when ghostshot exits.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("title")
                .help("Part of the window title to look for")
                .required(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Hide the window while capturing it")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("NAME")
                .help("Base name of the PNG file (default: the window title)"),
        )
        .arg(
            Arg::new("level")
                .short('l')
                .long("level")
                .help("PNG compression level: 0-3 fast, 4-6 default, 7-9 best (0 still compresses)")
                .value_parser(value_parser!(u8).range(0..=9))
                .default_value("6"),
        )
        .arg(
            Arg::new("dir")
                .short('d')
                .long("dir")
                .value_name("DIR")
                .help("Directory to write the PNG into")
                .default_value("."),
        )
        .arg(
            Arg::new("list")
                .long("list")
                .help("List matching windows instead of capturing")
                .action(ArgAction::SetTrue)
                .conflicts_with_all(["silent", "output"]),
        )
}
