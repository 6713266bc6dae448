fn main() {
    env_logger::init();
    if let Err(err) = poi_labels::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
