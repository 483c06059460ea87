fn main() {
    if let Err(err) = docviz::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
