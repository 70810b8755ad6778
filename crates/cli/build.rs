use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("inkdrop")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Ink Drop Contributors")
        .about("Turn social threads into clean e-ink articles")
        .arg(clap::arg!(<INPUT> "Thread URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (html, text, markdown, json)")
                .value_name("FORMAT")
                .default_value("html")
                .value_parser(["html", "text", "markdown", "json"]),
        )
        .arg(clap::arg!(--width <COLS> "Wrap plain text output at this many columns").default_value("0"))
        .arg(
            clap::Arg::new("nav_timeout")
                .long("nav-timeout")
                .value_name("SECS")
                .help("Overall navigation timeout in seconds"),
        )
        .arg(
            clap::Arg::new("content_timeout")
                .long("content-timeout")
                .value_name("SECS")
                .help("How long to wait for thread content to appear"),
        )
        .arg(
            clap::Arg::new("settle_ms")
                .long("settle-ms")
                .value_name("MS")
                .help("Extra delay after load for client-side rendering"),
        )
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "inkdrop", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "inkdrop", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "inkdrop", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "inkdrop", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
