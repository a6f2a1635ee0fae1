fn main() {
    if let Err(err) = frame_prep::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
