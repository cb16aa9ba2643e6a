fn main() {
    if let Err(err) = sysviz::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
