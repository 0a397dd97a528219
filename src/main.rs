fn main() {
    if let Err(err) = lead_inspector::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
