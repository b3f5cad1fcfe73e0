use holdem_service::{LogFormat, init_logging};

fn main() {
    // the terminal belongs to the game; logs only when asked for
    if std::env::var_os("RUST_LOG").is_some() {
        init_logging(LogFormat::Text);
    }
    let code = holdem_cli::run(std::env::args(), &mut std::io::stdout(), &mut std::io::stderr());
    std::process::exit(code);
}
